//! Image upload onto the drawing surface.
//!
//! Decodes a user-supplied image file off the host thread and, only once the
//! decode has succeeded, replaces the drawing with the image stretched to the
//! full surface. A failed decode never touches the surface.

use std::path::{Path, PathBuf};

use cairo::{Format, ImageSurface};
use image::RgbaImage;
use thiserror::Error;
use tokio::task;

use crate::draw::{DrawingSurface, SurfaceError};

/// Errors that can occur while ingesting an image.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No image file provided")]
    NoInputProvided,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    DecodeFailure(#[from] image::ImageError),

    #[error("Failed to paint image: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Loads image files onto the drawing surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageIngestor;

impl ImageIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Reads and decodes `file`, then paints it over the whole surface.
    ///
    /// Returns [`IngestError::NoInputProvided`] when `file` is `None`; callers
    /// treat that as a silent no-op.
    pub async fn load(
        &self,
        file: Option<&Path>,
        surface: &mut DrawingSurface,
    ) -> Result<(), IngestError> {
        let path = file.ok_or(IngestError::NoInputProvided)?.to_path_buf();
        log::debug!("Decoding image {}", path.display());

        let image = task::spawn_blocking(move || decode_file(&path))
            .await
            .map_err(|e| IngestError::Task(e.to_string()))??;

        log::info!(
            "Decoded {}x{} image, painting onto surface",
            image.width(),
            image.height()
        );
        paint_decoded(surface, &image)
    }
}

/// Reads and decodes an image file.
pub fn decode_file(path: &Path) -> Result<RgbaImage, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes)
}

/// Decodes in-memory image bytes (format sniffed from the content).
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, IngestError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Clears the surface and paints `image` stretched to cover it.
pub fn paint_decoded(surface: &mut DrawingSurface, image: &RgbaImage) -> Result<(), IngestError> {
    let source = to_cairo_surface(image)?;
    surface.paint_image(&source)?;
    Ok(())
}

/// Converts straight-alpha RGBA into Cairo's premultiplied native-endian ARGB32.
fn to_cairo_surface(image: &RgbaImage) -> Result<ImageSurface, SurfaceError> {
    let (width, height) = image.dimensions();
    let invalid = || SurfaceError::InvalidDimensions {
        width: width.try_into().unwrap_or(i32::MAX),
        height: height.try_into().unwrap_or(i32::MAX),
    };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let cairo_width = i32::try_from(width).map_err(|_| invalid())?;
    let cairo_height = i32::try_from(height).map_err(|_| invalid())?;

    let stride = Format::ARgb32.stride_for_width(width)?;
    let mut data = vec![0u8; stride as usize * height as usize];
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let word = (a as u32) << 24
            | premultiply(r, a) << 16
            | premultiply(g, a) << 8
            | premultiply(b, a);
        let offset = y as usize * stride as usize + x as usize * 4;
        data[offset..offset + 4].copy_from_slice(&word.to_ne_bytes());
    }

    Ok(ImageSurface::create_for_data(
        data,
        Format::ARgb32,
        cairo_width,
        cairo_height,
        stride,
    )?)
}

fn premultiply(channel: u8, alpha: u8) -> u32 {
    (channel as u32 * alpha as u32 + 127) / 255
}
