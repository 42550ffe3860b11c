//! Non-interactive capability implementations for headless frontends.

use std::path::PathBuf;

use async_trait::async_trait;
use recicla_core::Coordinates;
use tracing::debug;

use super::{
    Accuracy, CaptureSource, ImagePicker, LocationProvider, PermissionKind, PermissionStatus,
    Permissions, PickOutcome, PlatformError, RawImage,
};
use crate::media::CaptureOptions;

/// Answers every permission request from a fixed table.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub camera: PermissionStatus,
    pub media_library: PermissionStatus,
    pub location: PermissionStatus,
}

impl StaticPermissions {
    #[must_use]
    pub const fn granted() -> Self {
        Self {
            camera: PermissionStatus::Granted,
            media_library: PermissionStatus::Granted,
            location: PermissionStatus::Granted,
        }
    }

    #[must_use]
    pub const fn with_location(mut self, status: PermissionStatus) -> Self {
        self.location = status;
        self
    }

    #[must_use]
    pub const fn with_camera(mut self, status: PermissionStatus) -> Self {
        self.camera = status;
        self
    }

    #[must_use]
    pub const fn with_media_library(mut self, status: PermissionStatus) -> Self {
        self.media_library = status;
        self
    }
}

#[async_trait]
impl Permissions for StaticPermissions {
    async fn request(&self, kind: PermissionKind) -> PermissionStatus {
        match kind {
            PermissionKind::Camera => self.camera,
            PermissionKind::MediaLibrary => self.media_library,
            PermissionKind::Location => self.location,
        }
    }
}

/// Reports the same position on every read, or fails when unset.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, PlatformError> {
        self.0
            .ok_or_else(|| PlatformError::Unavailable("no position configured".to_owned()))
    }
}

/// Reads a photo from disk for either source. No path means the user
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    path: Option<PathBuf>,
}

impl FilePicker {
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for FilePicker {
    async fn pick(
        &self,
        source: CaptureSource,
        _options: &CaptureOptions,
    ) -> Result<PickOutcome, PlatformError> {
        let Some(path) = &self.path else {
            return Ok(PickOutcome::Cancelled);
        };
        let bytes = tokio::fs::read(path).await?;
        debug!(?source, path = %path.display(), len = bytes.len(), "Read photo file");
        Ok(PickOutcome::Picked(RawImage { bytes }))
    }
}
