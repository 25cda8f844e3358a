//! The persistent drawing surface shared by stroke capture and image ingestion.

use super::color::BLACK;
use super::stroke::StrokeStyle;
use cairo::{Context, Extend, Filter, Format, ImageSurface, Operator, SurfacePattern};
use thiserror::Error;

/// Canonical width and height of the drawing surface, in pixels.
pub const SURFACE_SIZE: i32 = 280;

/// Errors raised while touching the Cairo-backed surfaces.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo operation failed: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface pixels unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
}

/// A point in surface-local coordinates (origin at the top-left pixel).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Opaque raster buffer holding the user's current drawing.
///
/// Backed by an `RGB24` image surface, so there is no alpha channel to leave
/// partially transparent: every pixel is either background black, stroke white
/// or an antialiased gray in between. The surface is painted black on creation
/// and never exposes an uninitialized state.
///
/// Mutators ([`clear`](Self::clear), [`stroke_segment`](Self::stroke_segment),
/// [`paint_image`](Self::paint_image)) take `&mut self`; readers such as
/// [`extract_sample`](super::extract_sample) only need `&self`.
pub struct DrawingSurface {
    surface: ImageSurface,
}

impl DrawingSurface {
    /// Creates a canonical 280×280 surface filled with black.
    pub fn new() -> Result<Self, SurfaceError> {
        Self::with_size(SURFACE_SIZE, SURFACE_SIZE)
    }

    /// Creates a surface of arbitrary size filled with black.
    pub fn with_size(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }

        let surface = ImageSurface::create(Format::Rgb24, width, height)?;
        let mut drawing = Self { surface };
        drawing.clear()?;
        Ok(drawing)
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Resets every pixel to the background color.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(Operator::Source);
        BLACK.apply(&ctx);
        ctx.paint()?;
        Ok(())
    }

    /// Paints a single line segment between two points with the given pen.
    pub fn stroke_segment(
        &mut self,
        from: SurfacePoint,
        to: SurfacePoint,
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        style.apply(&ctx);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.stroke()?;
        Ok(())
    }

    /// Replaces the drawing with `image`, stretched to cover the whole surface.
    ///
    /// The surface is cleared to black first, so transparent regions of the
    /// image end up black. Aspect ratio is not preserved.
    pub fn paint_image(&mut self, image: &ImageSurface) -> Result<(), SurfaceError> {
        let (image_width, image_height) = (image.width(), image.height());
        if image_width <= 0 || image_height <= 0 {
            return Err(SurfaceError::InvalidDimensions {
                width: image_width,
                height: image_height,
            });
        }

        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(Operator::Source);
        BLACK.apply(&ctx);
        ctx.paint()?;

        ctx.set_operator(Operator::Over);
        ctx.scale(
            self.width() as f64 / image_width as f64,
            self.height() as f64 / image_height as f64,
        );
        let pattern = SurfacePattern::create(image);
        pattern.set_filter(Filter::Good);
        pattern.set_extend(Extend::Pad);
        ctx.set_source(&pattern)?;
        ctx.paint()?;
        Ok(())
    }

    /// Reads the RGB value of one pixel, or `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Result<Option<[u8; 3]>, SurfaceError> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return Ok(None);
        }

        let stride = self.surface.stride() as usize;
        let mut rgb = None;
        self.surface.with_data(|data| {
            rgb = Some(rgb_at(data, stride, x as usize, y as usize));
        })?;
        Ok(rgb)
    }

    pub(crate) fn cairo_surface(&self) -> &ImageSurface {
        &self.surface
    }
}

/// Decodes one native-endian `RGB24`/`ARGB32` pixel into its color bytes.
pub(crate) fn rgb_at(data: &[u8], stride: usize, x: usize, y: usize) -> [u8; 3] {
    let offset = y * stride + x * 4;
    let word = u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]);
    [(word >> 16) as u8, (word >> 8) as u8, word as u8]
}
