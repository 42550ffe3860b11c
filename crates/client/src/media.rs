//! Photo normalisation.
//!
//! Whatever the picker returns is centre-cropped to the report aspect
//! ratio, scaled down to a bounded size and re-encoded as a JPEG data URI.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use recicla_core::{PhotoError, PhotoPayload};
use thiserror::Error;

/// How captured photos are shaped before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Width and height ratio, e.g. `(4, 3)`.
    pub aspect: (u32, u32),
    /// JPEG quality, 1 to 100.
    pub quality: u8,
    /// Longest allowed side in pixels.
    pub max_dimension: u32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            aspect: (4, 3),
            quality: 80,
            max_dimension: 1280,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image is empty")]
    Empty,

    #[error("Could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid capture options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Payload(#[from] PhotoError),
}

/// Decode `bytes`, shape them per `options` and wrap the JPEG as a data URI.
///
/// CPU-bound; async callers should run it on a blocking thread.
///
/// # Errors
///
/// Returns error if the bytes are not a decodable image or the options are
/// degenerate.
pub fn encode_photo(bytes: &[u8], options: &CaptureOptions) -> Result<PhotoPayload, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }
    let (aspect_w, aspect_h) = options.aspect;
    if aspect_w == 0 || aspect_h == 0 || options.max_dimension == 0 {
        return Err(MediaError::InvalidOptions(format!("{options:?}")));
    }
    let quality = options.quality.clamp(1, 100);

    let img = image::load_from_memory(bytes).map_err(MediaError::Decode)?;
    let img = crop_to_aspect(&img, aspect_w, aspect_h);
    let img = if img.width() > options.max_dimension || img.height() > options.max_dimension {
        img.resize(options.max_dimension, options.max_dimension, FilterType::Triangle)
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(MediaError::Encode)?;

    let data = STANDARD.encode(buf.into_inner());
    Ok(PhotoPayload::from_base64("image/jpeg", &data)?)
}

/// Largest centred region of `img` with the given aspect ratio.
fn crop_to_aspect(img: &DynamicImage, aspect_w: u32, aspect_h: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (w, h) = (u64::from(width), u64::from(height));
    let (aw, ah) = (u64::from(aspect_w), u64::from(aspect_h));

    let (crop_w, crop_h) = if w * ah > h * aw {
        (h * aw / ah, h)
    } else {
        (w, w * ah / aw)
    };
    let crop_w = u32::try_from(crop_w).unwrap_or(width).max(1);
    let crop_h = u32::try_from(crop_h).unwrap_or(height).max(1);
    if crop_w == width && crop_h == height {
        return img.clone();
    }

    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;
    img.crop_imm(x, y, crop_w, crop_h)
}
