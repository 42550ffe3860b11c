use recicla_core::PhotoPayload;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::ReportWorkflow;
use crate::media::{MediaError, encode_photo};
use crate::notice::Notice;
use crate::platform::{CaptureSource, PermissionKind, PickOutcome, PlatformError};

/// What a capture attempt did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The draft now holds the new photo.
    Replaced,
    /// The user backed out; the draft is unchanged.
    Cancelled,
}

#[derive(Debug, Error)]
pub enum CaptureFailure {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("Photo encoding task failed: {0}")]
    Task(String),
}

/// A failed capture. The message is what the user sees.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Could not take the photo")]
    Camera(#[source] CaptureFailure),

    #[error("Could not select the image")]
    Gallery(#[source] CaptureFailure),
}

impl CaptureError {
    fn new(source: CaptureSource, failure: CaptureFailure) -> Self {
        match source {
            CaptureSource::Camera => Self::Camera(failure),
            CaptureSource::Gallery => Self::Gallery(failure),
        }
    }

    #[must_use]
    pub const fn failure(&self) -> &CaptureFailure {
        match self {
            Self::Camera(failure) | Self::Gallery(failure) => failure,
        }
    }
}

impl ReportWorkflow {
    /// Take or pick a photo and make it the draft's only photo.
    ///
    /// The camera or photo library permission is asked for again on every
    /// attempt, since it may have been revoked since acquisition.
    ///
    /// # Errors
    ///
    /// Returns error if the permission is denied, the picker fails or the
    /// image cannot be encoded. The error is also raised as a notice and the
    /// held photo is kept.
    #[instrument(skip(self))]
    pub async fn capture_photo(
        &self,
        source: CaptureSource,
    ) -> Result<CaptureOutcome, CaptureError> {
        match self.take_photo(source).await {
            Ok(Some(photo)) => {
                debug!(?photo, "Photo captured");
                self.state.lock().draft.set_photo(photo);
                Ok(CaptureOutcome::Replaced)
            }
            Ok(None) => {
                debug!("Capture cancelled");
                Ok(CaptureOutcome::Cancelled)
            }
            Err(failure) => {
                warn!(error = %failure, "Capture failed");
                let err = CaptureError::new(source, failure);
                self.notifier.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn take_photo(
        &self,
        source: CaptureSource,
    ) -> Result<Option<PhotoPayload>, CaptureFailure> {
        let kind = source.permission();
        let status = self.platform.permissions.request(kind).await;
        if kind == PermissionKind::Camera {
            self.state.lock().camera = Some(status);
        }
        if !status.is_granted() {
            return Err(PlatformError::PermissionDenied(kind).into());
        }

        let raw = match self.platform.picker.pick(source, &self.capture).await? {
            PickOutcome::Picked(raw) => raw,
            PickOutcome::Cancelled => return Ok(None),
        };

        let options = self.capture;
        let photo = tokio::task::spawn_blocking(move || encode_photo(&raw.bytes, &options))
            .await
            .map_err(|e| CaptureFailure::Task(e.to_string()))??;
        Ok(Some(photo))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::platform::{PermissionStatus, RawImage, StaticPermissions};
    use crate::workflow::testing::{Fixture, png};

    #[tokio::test]
    async fn test_capture_sets_photo() {
        let fx = Fixture::new().await;
        fx.picker.push_image(png(640, 480));

        let outcome = fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();

        assert_eq!(outcome, CaptureOutcome::Replaced);
        let draft = fx.workflow.draft();
        let photo = draft.photo().unwrap();
        assert!(photo.as_str().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_second_capture_replaces_first() {
        let fx = Fixture::new().await;
        fx.picker.push_image(png(640, 480));
        fx.picker.push_image(png(400, 300));

        fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();
        let first = fx.workflow.draft().photo().cloned().unwrap();
        fx.workflow.capture_photo(CaptureSource::Gallery).await.unwrap();
        let second = fx.workflow.draft().photo().cloned().unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_cancel_keeps_photo() {
        let fx = Fixture::new().await;
        fx.picker.push_image(png(640, 480));
        fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();
        let before = fx.workflow.draft();

        let outcome = fx.workflow.capture_photo(CaptureSource::Gallery).await.unwrap();

        assert_eq!(outcome, CaptureOutcome::Cancelled);
        assert_eq!(fx.workflow.draft(), before);
        assert!(fx.notices.is_empty());
    }

    #[tokio::test]
    async fn test_picker_failure_notifies_and_keeps_photo() {
        let fx = Fixture::new().await;
        fx.picker.push_image(png(640, 480));
        fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();
        let before = fx.workflow.draft();

        fx.picker.push(Err(PlatformError::Unavailable("camera busy".into())));
        let err = fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap_err();

        assert!(matches!(err, CaptureError::Camera(CaptureFailure::Platform(_))));
        assert_eq!(fx.workflow.draft(), before);
        let notice = fx.notices.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Could not take the photo");
    }

    #[tokio::test]
    async fn test_denied_library_blocks_gallery_only() {
        let fx = Fixture::builder()
            .permissions(StaticPermissions::granted().with_media_library(PermissionStatus::Denied))
            .build()
            .await;
        fx.picker.push_image(png(640, 480));

        let err = fx.workflow.capture_photo(CaptureSource::Gallery).await.unwrap_err();

        assert!(matches!(
            err,
            CaptureError::Gallery(CaptureFailure::Platform(PlatformError::PermissionDenied(
                PermissionKind::MediaLibrary
            )))
        ));
        assert!(fx.workflow.draft().photo().is_none());
        assert_eq!(fx.notices.last().unwrap().message, "Could not select the image");

        // The queued image was never consumed, so the camera still gets it.
        let outcome = fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();
        assert_eq!(outcome, CaptureOutcome::Replaced);
    }

    #[tokio::test]
    async fn test_denied_camera_is_recorded() {
        let fx = Fixture::builder()
            .permissions(StaticPermissions::granted().with_camera(PermissionStatus::Denied))
            .build()
            .await;
        fx.picker.push_image(png(640, 480));

        let err = fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap_err();

        assert!(matches!(err, CaptureError::Camera(CaptureFailure::Platform(_))));
        assert!(fx.workflow.draft().photo().is_none());
        assert_eq!(fx.workflow.permissions().0, Some(PermissionStatus::Denied));
        assert_eq!(fx.notices.last().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_undecodable_gallery_image() {
        let fx = Fixture::new().await;
        fx.picker.push(Ok(PickOutcome::Picked(RawImage {
            bytes: b"GIF89a-broken".to_vec(),
        })));

        let err = fx.workflow.capture_photo(CaptureSource::Gallery).await.unwrap_err();

        assert!(matches!(err.failure(), CaptureFailure::Media(_)));
        assert!(fx.workflow.draft().photo().is_none());
        assert_eq!(fx.notices.last().unwrap().message, "Could not select the image");
    }

    #[tokio::test]
    async fn test_remove_photo() {
        let fx = Fixture::new().await;
        fx.picker.push_image(png(640, 480));
        fx.workflow.capture_photo(CaptureSource::Camera).await.unwrap();

        fx.workflow.remove_photo();

        assert!(fx.workflow.draft().photo().is_none());
    }
}
