//! Image normalizer - produces model-ready grayscale thumbnails
//!
//! Decodes an arbitrary image, converts it to single-channel grayscale,
//! resizes it to a fixed width while keeping the aspect ratio, and encodes
//! the result as PNG.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::config::DEFAULT_THUMBNAIL_WIDTH;
use crate::error::{RelayError, Result};
use crate::models::Thumbnail;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Image normalizer
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    target_width: u32,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }
}

impl ImageNormalizer {
    /// Create a normalizer for the given thumbnail width
    pub fn new(target_width: u32) -> Result<Self> {
        if target_width == 0 {
            return Err(RelayError::Config(
                "thumbnail width must be positive".to_string(),
            ));
        }
        Ok(Self { target_width })
    }

    /// Normalize the given image bytes (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `normalize_async` instead.
    pub fn normalize(&self, raw: &[u8]) -> Result<Thumbnail> {
        let img = image::load_from_memory(raw).map_err(|e| RelayError::Decode(e.to_string()))?;

        let gray = img.into_luma8();
        let (orig_w, orig_h) = gray.dimensions();
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            "Normalizing image"
        );

        let (new_w, new_h) = target_dimensions(orig_w, orig_h, self.target_width);

        // Already canonical: re-encode without resampling so output is stable
        let thumb = if (orig_w, orig_h) == (new_w, new_h) {
            gray
        } else {
            image::imageops::resize(&gray, new_w, new_h, FilterType::Lanczos3)
        };

        let data = encode_png(thumb)?;

        debug!(
            width = new_w,
            height = new_h,
            size = data.len(),
            "Thumbnail generated"
        );

        Ok(Thumbnail {
            data,
            width: new_w,
            height: new_h,
        })
    }

    /// Normalize on the blocking thread pool
    pub async fn normalize_async(self: Arc<Self>, raw: Bytes) -> Result<Thumbnail> {
        tokio::task::spawn_blocking(move || self.normalize(&raw))
            .await
            .map_err(|e| RelayError::Internal(format!("Normalizer task panicked: {e}")))?
    }
}

/// Width is fixed; height keeps the aspect ratio, rounded, at least one pixel
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let scaled = (height as f64 * target_width as f64 / width as f64).round();
    (target_width, (scaled as u32).max(1))
}

fn encode_png(img: GrayImage) -> Result<Bytes> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .map_err(|e| RelayError::Encode(e.to_string()))?;
    Ok(Bytes::from(buf))
}
