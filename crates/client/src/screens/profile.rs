use std::sync::Arc;

use recicla_core::{LoadState, Notification, PhotoPayload, SubmittedReport};
use thiserror::Error;
use tracing::{error, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::notice::{Notice, Notifier};
use crate::session::SessionStore;
use crate::storage::StorageError;

/// How many notifications the profile shows.
const NOTIFICATION_PREVIEW: usize = 3;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Sign in to see your profile")]
    NotSignedIn,

    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Could not save the profile: {0}")]
    Storage(#[from] StorageError),
}

/// The signed-in user's profile, reports and latest notifications.
pub struct ProfileScreen {
    api: ApiClient,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    pub reports: LoadState<Vec<SubmittedReport>>,
    pub notifications: LoadState<Vec<Notification>>,
}

impl ProfileScreen {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            reports: LoadState::Idle,
            notifications: LoadState::Idle,
        }
    }

    /// Replace the cached user with the server's copy and reload the lists.
    ///
    /// The three requests run together. A failed profile fetch keeps the
    /// cached user; failed lists land in their [`LoadState`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotSignedIn`] when there is no cached user,
    /// or a storage error if the refreshed user cannot be saved.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ProfileError> {
        let Some(user) = self.session.current_user() else {
            return Err(ProfileError::NotSignedIn);
        };
        self.reports = LoadState::Loading;
        self.notifications = LoadState::Loading;

        let (profile, reports, notifications) = tokio::join!(
            self.api.get_user(&user.id),
            self.api.user_reports(&user.id),
            self.api.notifications(&user.id),
        );

        self.reports = LoadState::from_result(
            reports.map_err(|e| e.user_message("Could not load your reports")),
        );
        self.notifications = LoadState::from_result(
            notifications.map_err(|e| e.user_message("Could not load notifications")),
        )
        .map(|mut list| {
            list.truncate(NOTIFICATION_PREVIEW);
            list
        });

        match profile {
            Ok(fresh) => self.session.replace_user(fresh).await?,
            Err(e) => warn!(error = %e, "Keeping cached profile"),
        }
        Ok(())
    }

    /// Upload a new profile photo.
    ///
    /// # Errors
    ///
    /// Returns error when signed out, when the upload fails or when the
    /// updated user cannot be saved. Upload failures are also raised as
    /// notices.
    #[instrument(skip(self, photo))]
    pub async fn update_photo(&self, photo: &PhotoPayload) -> Result<(), ProfileError> {
        let Some(user) = self.session.current_user() else {
            return Err(ProfileError::NotSignedIn);
        };
        if let Err(source) = self.api.update_profile_photo(&user.id, photo.as_str()).await {
            error!(error = %source, "Profile photo upload failed");
            let message = source.user_message("Could not update the photo");
            self.notifier.notify(Notice::error(message.clone()));
            return Err(ProfileError::Remote { message, source });
        }
        self.session.set_photo(photo.as_str().to_owned()).await?;
        self.notifier
            .notify(Notice::success("Photo updated", "Your profile photo was updated."));
        Ok(())
    }

    /// Delete a notification on the server and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns error if the server rejects the request.
    pub async fn dismiss_notification(&mut self, notification_id: i64) -> Result<(), ProfileError> {
        self.api
            .dismiss_notification(notification_id)
            .await
            .map_err(|source| ProfileError::Remote {
                message: source.user_message("Could not remove the notification"),
                source,
            })?;
        if let LoadState::Ready(list) = &mut self.notifications {
            list.retain(|n| n.id != notification_id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProfileScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileScreen")
            .field("reports", &self.reports.ready().map(Vec::len))
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use recicla_core::{CachedUser, Email, Points, UserId};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::notice::NoticeLog;
    use crate::storage::{MemoryStore, keys};

    async fn screen(server: &MockServer) -> (ProfileScreen, Arc<MemoryStore>) {
        let api = ApiClient::new(Url::parse(&server.base_url()).unwrap(), None).unwrap();
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        session
            .replace_user(CachedUser {
                id: UserId::new("u1"),
                name: "Ana".into(),
                email: Email::parse("ana@mail.pe").unwrap(),
                points: Points::new(25),
                reports_submitted: 1,
                achievements: Vec::new(),
                photo: None,
            })
            .await
            .unwrap();
        (
            ProfileScreen::new(api, session, Arc::new(NoticeLog::new())),
            storage,
        )
    }

    #[tokio::test]
    async fn test_refresh_overwrites_cached_user() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/usuarios/u1");
                then.status(200).json_body(json!({
                    "id": "u1", "nombre": "Ana", "email": "ana@mail.pe",
                    "puntos": 45, "reportes_enviados": 2, "logros": ["Primer Reporte"]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/reportes/u1");
                then.status(200).json_body(json!({"reportes": [
                    {"descripcion": "Desmonte", "latitud": -11.87, "longitud": -77.13, "fecha": "2024-01-15"}
                ]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/notificaciones/u1");
                then.status(200).json_body(json!({"notificaciones": [
                    {"id": 1, "mensaje": "a"}, {"id": 2, "mensaje": "b"},
                    {"id": 3, "mensaje": "c"}, {"id": 4, "mensaje": "d"}
                ]}));
            })
            .await;
        let (mut screen, storage) = screen(&server).await;

        screen.refresh().await.unwrap();

        assert_eq!(screen.session.current_user().unwrap().points, Points::new(45));
        let stored: CachedUser =
            serde_json::from_str(&storage.snapshot(keys::USER).unwrap()).unwrap();
        assert_eq!(stored.reports_submitted, 2);
        assert_eq!(screen.reports.ready().unwrap().len(), 1);
        assert_eq!(screen.notifications.ready().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_cache() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(400).json_body(json!({"detail": "ID de usuario inválido"}));
            })
            .await;
        let (mut screen, _) = screen(&server).await;

        screen.refresh().await.unwrap();

        assert_eq!(screen.session.current_user().unwrap().points, Points::new(25));
        assert_eq!(screen.reports.error(), Some("ID de usuario inválido"));
    }

    #[tokio::test]
    async fn test_update_photo() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/usuarios/u1");
                then.status(200).json_body(json!({"message": "ok"}));
            })
            .await;
        let (screen, _) = screen(&server).await;
        let photo = PhotoPayload::from_base64("image/jpeg", "/9j/4AAQ").unwrap();

        screen.update_photo(&photo).await.unwrap();

        assert_eq!(
            screen.session.current_user().unwrap().photo.as_deref(),
            Some("data:image/jpeg;base64,/9j/4AAQ")
        );
    }

    #[tokio::test]
    async fn test_dismiss_notification() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/notificaciones/2");
                then.status(200).json_body(json!({"message": "Notificación eliminada"}));
            })
            .await;
        let (mut screen, _) = screen(&server).await;
        screen.notifications = LoadState::Ready(vec![
            Notification { id: 1, message: "a".into(), date: String::new(), read: false },
            Notification { id: 2, message: "b".into(), date: String::new(), read: true },
        ]);

        screen.dismiss_notification(2).await.unwrap();

        assert_eq!(screen.notifications.ready().unwrap().len(), 1);
    }
}
