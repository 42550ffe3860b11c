//! Device capabilities the client depends on.
//!
//! The workflow only sees these traits. A mobile shell backs them with the
//! OS dialogs and sensors; the CLI backs them with flags and files.

mod fixed;

pub use fixed::{FilePicker, FixedLocation, StaticPermissions};

use std::sync::Arc;

use async_trait::async_trait;
use recicla_core::{Coordinates, Placemark};
use thiserror::Error;

use crate::media::CaptureOptions;

/// Capabilities guarded by a runtime permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Camera,
    MediaLibrary,
    Location,
}

/// Outcome of a permission request. A dismissed dialog is `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Requested precision for a position fix. Reports always ask for the
/// best fix the device can give.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accuracy {
    #[default]
    High,
}

/// Where a photo comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Camera,
    Gallery,
}

impl CaptureSource {
    /// The permission a capture from this source needs.
    #[must_use]
    pub const fn permission(self) -> PermissionKind {
        match self {
            Self::Camera => PermissionKind::Camera,
            Self::Gallery => PermissionKind::MediaLibrary,
        }
    }
}

/// Undecoded image bytes straight from the picker.
#[derive(Clone)]
pub struct RawImage {
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PickOutcome {
    Picked(RawImage),
    Cancelled,
}

/// Errors raised by device capabilities.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Permission denied: {0:?}")]
    PermissionDenied(PermissionKind),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Geocoding failed: {0}")]
    Geocoding(String),
}

#[async_trait]
pub trait Permissions: Send + Sync {
    async fn request(&self, kind: PermissionKind) -> PermissionStatus;
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, PlatformError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Name the place at `at`. `Ok(None)` means nothing is known there.
    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<Placemark>, PlatformError>;
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(
        &self,
        source: CaptureSource,
        options: &CaptureOptions,
    ) -> Result<PickOutcome, PlatformError>;
}

/// The set of capabilities one workflow runs against.
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn Permissions>,
    pub location: Arc<dyn LocationProvider>,
    pub geocoder: Option<Arc<dyn Geocoder>>,
    pub picker: Arc<dyn ImagePicker>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("geocoder", &self.geocoder.is_some())
            .finish_non_exhaustive()
    }
}
