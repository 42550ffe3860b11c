//! Encoded photo payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors that can occur when parsing a [`PhotoPayload`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// The value does not start with `data:`.
    #[error("photo must be a data URI")]
    NotDataUri,
    /// The data URI is not base64-encoded.
    #[error("photo data URI must be base64-encoded")]
    NotBase64,
    /// The media type is not an image.
    #[error("photo media type must be image/*, got {0}")]
    NotImage(String),
    /// There is no data after the marker.
    #[error("photo data is empty")]
    Empty,
}

/// A photo encoded as a base64 data URI, e.g. `data:image/jpeg;base64,...`.
///
/// This is the representation the backend stores in `foto_base64` and the
/// one views render directly. Construction goes through [`Self::from_base64`]
/// or [`Self::parse`], so a value of this type is always a well-formed image
/// data URI.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoPayload(String);

impl PhotoPayload {
    /// Build a payload from a media type and already-encoded base64 data.
    ///
    /// # Errors
    ///
    /// Returns an error if the media type is not `image/*` or the data is empty.
    pub fn from_base64(media_type: &str, data: &str) -> Result<Self, PhotoError> {
        if !media_type.starts_with("image/") {
            return Err(PhotoError::NotImage(media_type.to_owned()));
        }
        if data.is_empty() {
            return Err(PhotoError::Empty);
        }
        Ok(Self(format!("{DATA_URI_PREFIX}{media_type}{BASE64_MARKER}{data}")))
    }

    /// Parse a full data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a base64 image data URI.
    pub fn parse(uri: &str) -> Result<Self, PhotoError> {
        let rest = uri
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or(PhotoError::NotDataUri)?;
        let (media_type, data) = rest.split_once(BASE64_MARKER).ok_or(PhotoError::NotBase64)?;
        Self::from_base64(media_type, data)
    }

    /// The full data URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The media type, e.g. `image/jpeg`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.split().0
    }

    /// The base64 data after the marker.
    #[must_use]
    pub fn base64_data(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        self.0
            .strip_prefix(DATA_URI_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .unwrap_or(("", ""))
    }
}

impl fmt::Debug for PhotoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads run to hundreds of kilobytes; log the shape only.
        f.debug_struct("PhotoPayload")
            .field("media_type", &self.media_type())
            .field("base64_len", &self.base64_data().len())
            .finish()
    }
}

impl TryFrom<String> for PhotoPayload {
    type Error = PhotoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhotoPayload> for String {
    fn from(photo: PhotoPayload) -> Self {
        photo.0
    }
}
