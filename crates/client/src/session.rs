//! The signed-in session: bearer token plus cached user.
//!
//! [`SessionStore`] is the single owner of the cached user. Views read the
//! current value or subscribe to changes; every mutation updates memory,
//! notifies subscribers and then writes the new value to storage. Writes
//! are last-write-wins.

use std::sync::Arc;

use parking_lot::RwLock;
use recicla_core::{CachedUser, Points};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::storage::{KeyValueStore, StorageError, keys};

/// Observable session state backed by a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<dyn KeyValueStore>,
    user_tx: watch::Sender<Option<CachedUser>>,
    token: RwLock<Option<SecretString>>,
}

impl SessionStore {
    /// A signed-out session over `storage`. Nothing is read.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                storage,
                user_tx,
                token: RwLock::new(None),
            }),
        }
    }

    /// Restore the session persisted in `storage`.
    ///
    /// A user blob that no longer parses is discarded with a warning rather
    /// than failing startup.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read.
    #[instrument(skip(storage))]
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let token = storage.get(keys::TOKEN).await?.map(SecretString::from);
        let user = match storage.get(keys::USER).await? {
            Some(raw) => match serde_json::from_str::<CachedUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cached user");
                    None
                }
            },
            None => None,
        };
        debug!(
            has_token = token.is_some(),
            has_user = user.is_some(),
            "Session restored"
        );

        let session = Self::new(storage);
        *session.inner.token.write() = token;
        session.inner.user_tx.send_replace(user);
        Ok(session)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<CachedUser> {
        self.inner.user_tx.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.token.read().clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner.user_tx.borrow().is_some()
    }

    /// Receive the cached user every time it changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CachedUser>> {
        self.inner.user_tx.subscribe()
    }

    /// Store a fresh token and user after registration or login.
    ///
    /// # Errors
    ///
    /// Returns error if either value cannot be persisted.
    #[instrument(skip(self, token, user), fields(user_id = %user.id))]
    pub async fn sign_in(&self, token: SecretString, user: CachedUser) -> Result<(), StorageError> {
        let raw_token = token.expose_secret().to_owned();
        *self.inner.token.write() = Some(token);
        self.inner.user_tx.send_replace(Some(user.clone()));

        self.inner.storage.set(keys::TOKEN, &raw_token).await?;
        self.persist_user(&user).await
    }

    /// Overwrite the cached user with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns error if the user cannot be persisted.
    pub async fn replace_user(&self, user: CachedUser) -> Result<(), StorageError> {
        self.inner.user_tx.send_replace(Some(user.clone()));
        self.persist_user(&user).await
    }

    /// Add `award` to the cached balance. Returns the updated user, or
    /// `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns error if the user cannot be persisted. Memory is already
    /// updated at that point.
    pub async fn award_points(&self, award: Points) -> Result<Option<CachedUser>, StorageError> {
        self.update_user(|user| user.with_points_awarded(award))
            .await
    }

    /// Take `cost` from the cached balance, stopping at zero.
    ///
    /// # Errors
    ///
    /// Returns error if the user cannot be persisted.
    pub async fn spend_points(&self, cost: Points) -> Result<Option<CachedUser>, StorageError> {
        self.update_user(|user| user.with_points_spent(cost)).await
    }

    /// Record a new profile photo data URI.
    ///
    /// # Errors
    ///
    /// Returns error if the user cannot be persisted.
    pub async fn set_photo(&self, photo: String) -> Result<Option<CachedUser>, StorageError> {
        self.update_user(move |user| CachedUser {
            photo: Some(photo),
            ..user.clone()
        })
        .await
    }

    /// Forget the token and user, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be cleared.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), StorageError> {
        *self.inner.token.write() = None;
        self.inner.user_tx.send_replace(None);

        self.inner.storage.remove(keys::TOKEN).await?;
        self.inner.storage.remove(keys::USER).await?;
        debug!("Signed out");
        Ok(())
    }

    async fn update_user(
        &self,
        change: impl FnOnce(&CachedUser) -> CachedUser,
    ) -> Result<Option<CachedUser>, StorageError> {
        let mut updated = None;
        self.inner.user_tx.send_if_modified(|slot| {
            let Some(user) = slot.as_ref() else {
                return false;
            };
            let next = change(user);
            updated = Some(next.clone());
            *slot = Some(next);
            true
        });

        if let Some(user) = &updated {
            self.persist_user(user).await?;
        }
        Ok(updated)
    }

    async fn persist_user(&self, user: &CachedUser) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user).map_err(|e| StorageError::Corrupt {
            key: keys::USER.to_owned(),
            message: e.to_string(),
        })?;
        self.inner.storage.set(keys::USER, &raw).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &*self.inner.user_tx.borrow())
            .field("token", &self.inner.token.read().as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recicla_core::{Email, UserId};

    use super::*;
    use crate::storage::MemoryStore;

    fn user(points: u32) -> CachedUser {
        CachedUser {
            id: UserId::new("u1"),
            name: "Ana".into(),
            email: Email::parse("ana@mail.pe").unwrap(),
            points: Points::new(points),
            reports_submitted: 0,
            achievements: Vec::new(),
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_load_empty_storage() {
        let session = SessionStore::load(Arc::new(MemoryStore::new())).await.unwrap();
        assert!(session.current_user().is_none());
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_load_discards_corrupt_user() {
        let storage = Arc::new(MemoryStore::with_values([
            (keys::TOKEN, "tok"),
            (keys::USER, "{not json"),
        ]));
        let session = SessionStore::load(storage).await.unwrap();
        assert!(session.current_user().is_none());
        assert_eq!(session.token().unwrap().expose_secret(), "tok");
    }

    #[tokio::test]
    async fn test_award_points_persists_and_notifies() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        session
            .sign_in(SecretString::from("tok"), user(5))
            .await
            .unwrap();
        let mut rx = session.subscribe();

        let updated = session.award_points(Points::new(10)).await.unwrap().unwrap();

        assert_eq!(updated.points, Points::new(15));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().points, Points::new(15));

        let stored: CachedUser =
            serde_json::from_str(&storage.snapshot(keys::USER).unwrap()).unwrap();
        assert_eq!(stored.points, Points::new(15));
    }

    #[tokio::test]
    async fn test_award_points_signed_out_is_noop() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        assert!(session.award_points(Points::new(10)).await.unwrap().is_none());
        assert!(storage.snapshot(keys::USER).is_none());
    }

    #[tokio::test]
    async fn test_spend_points_saturates() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session.replace_user(user(30)).await.unwrap();
        let updated = session.spend_points(Points::new(50)).await.unwrap().unwrap();
        assert_eq!(updated.points, Points::ZERO);
    }

    #[tokio::test]
    async fn test_sign_out_clears_storage() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        session
            .sign_in(SecretString::from("tok"), user(0))
            .await
            .unwrap();
        assert_eq!(storage.snapshot(keys::TOKEN).as_deref(), Some("tok"));

        session.sign_out().await.unwrap();

        assert!(!session.is_signed_in());
        assert!(storage.snapshot(keys::TOKEN).is_none());
        assert!(storage.snapshot(keys::USER).is_none());
    }

    #[tokio::test]
    async fn test_debug_redacts_token() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session
            .sign_in(SecretString::from("very-secret"), user(0))
            .await
            .unwrap();
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}
