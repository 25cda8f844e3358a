//! Drawing surface, stroke style, and downsampling (Cairo-based).
//!
//! This module defines the raster side of the sketch pad:
//! - [`DrawingSurface`]: the persistent 280×280 opaque canvas strokes land on
//! - [`StrokeStyle`]: the fixed pen used for freehand input
//! - [`extract_sample`]: area-averaged reduction of the canvas to a 28×28 [`Sample`]

pub mod color;
pub mod raster;
pub mod stroke;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use raster::{SAMPLE_LEN, SAMPLE_SIDE, Sample, extract_sample};
pub use stroke::{DEFAULT_STROKE_WIDTH, StrokeStyle};
pub use surface::{DrawingSurface, SURFACE_SIZE, SurfaceError, SurfacePoint};
