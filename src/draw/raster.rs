//! Downsampling of the drawing surface into the classifier's input sample.

use super::surface::{DrawingSurface, SurfaceError, rgb_at};
use cairo::{Context, Extend, Filter, Format, ImageSurface, Operator, SurfacePattern};
use serde::Serialize;

/// Width and height of the sample grid, in cells.
pub const SAMPLE_SIDE: i32 = 28;

/// Number of cells in a sample (28 × 28).
pub const SAMPLE_LEN: usize = (SAMPLE_SIDE * SAMPLE_SIDE) as usize;

/// Grayscale intensities of the 28×28 downsampled surface, row-major.
///
/// Always exactly [`SAMPLE_LEN`] values. Serializes as a plain JSON array of
/// integers, which is the `pixels` field of the prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sample(Vec<u8>);

impl Sample {
    /// Wraps raw cells, returning `None` unless there are exactly 784 of them.
    pub fn from_cells(cells: Vec<u8>) -> Option<Self> {
        (cells.len() == SAMPLE_LEN).then_some(Self(cells))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Intensity at `(col, row)`, or `None` outside the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        let side = SAMPLE_SIDE as usize;
        if col >= side || row >= side {
            return None;
        }
        self.0.get(row * side + col).copied()
    }

    /// Iterates over the 28 rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.0.chunks(SAMPLE_SIDE as usize)
    }
}

/// Reduces the full surface to a [`Sample`].
///
/// The whole surface is scaled onto a 28×28 off-screen buffer with Cairo's
/// box filter, so every sample cell is the average of the 10×10 block of
/// surface pixels it covers rather than a single picked pixel. Edges are
/// padded so border cells are not darkened by sampling outside the surface.
///
/// The surface is strictly grayscale, so only the red channel is read back.
pub fn extract_sample(surface: &DrawingSurface) -> Result<Sample, SurfaceError> {
    let target = ImageSurface::create(Format::Rgb24, SAMPLE_SIDE, SAMPLE_SIDE)?;

    {
        let ctx = Context::new(&target)?;
        ctx.scale(
            SAMPLE_SIDE as f64 / surface.width() as f64,
            SAMPLE_SIDE as f64 / surface.height() as f64,
        );
        let pattern = SurfacePattern::create(surface.cairo_surface());
        pattern.set_filter(Filter::Good);
        pattern.set_extend(Extend::Pad);
        ctx.set_operator(Operator::Source);
        ctx.set_source(&pattern)?;
        ctx.paint()?;
    }

    let side = SAMPLE_SIDE as usize;
    let stride = target.stride() as usize;
    let mut cells = Vec::with_capacity(SAMPLE_LEN);
    target.with_data(|data| {
        for row in 0..side {
            for col in 0..side {
                cells.push(rgb_at(data, stride, col, row)[0]);
            }
        }
    })?;

    log::trace!(
        "Extracted sample: {} lit cells",
        cells.iter().filter(|&&v| v > 0).count()
    );

    Ok(Sample(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{StrokeStyle, SurfacePoint};

    #[test]
    fn blank_surface_yields_all_background() {
        let surface = DrawingSurface::new().unwrap();
        let sample = extract_sample(&surface).unwrap();
        assert_eq!(sample.len(), SAMPLE_LEN);
        assert!(sample.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn fully_white_surface_is_saturated_everywhere() {
        let mut surface = DrawingSurface::new().unwrap();
        let image = ImageSurface::create(Format::Rgb24, 2, 2).unwrap();
        {
            let ctx = Context::new(&image).unwrap();
            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint().unwrap();
        }
        surface.paint_image(&image).unwrap();

        let sample = extract_sample(&surface).unwrap();
        assert!(
            sample.as_slice().iter().all(|&v| v >= 250),
            "border cells should not be darkened: {:?}",
            sample.rows().next()
        );
    }

    #[test]
    fn stroke_maps_onto_matching_cells() {
        let mut surface = DrawingSurface::new().unwrap();
        // Horizontal bar across the upper third of the surface.
        surface
            .stroke_segment(
                SurfacePoint::new(50.0, 95.0),
                SurfacePoint::new(230.0, 95.0),
                &StrokeStyle::default(),
            )
            .unwrap();

        let sample = extract_sample(&surface).unwrap();
        // Surface row 95 lands in sample row 9, surface column 140 in column 14.
        assert!(sample.get(14, 9).unwrap() > 200);
        assert_eq!(sample.get(14, 25).unwrap(), 0);
        assert_eq!(sample.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn extraction_does_not_mutate_surface() {
        let mut surface = DrawingSurface::new().unwrap();
        surface
            .stroke_segment(
                SurfacePoint::new(100.0, 100.0),
                SurfacePoint::new(180.0, 180.0),
                &StrokeStyle::default(),
            )
            .unwrap();
        let before = surface.pixel(140, 140).unwrap();

        let first = extract_sample(&surface).unwrap();
        let second = extract_sample(&surface).unwrap();
        assert_eq!(first, second);
        assert_eq!(surface.pixel(140, 140).unwrap(), before);
    }

    #[test]
    fn sample_from_cells_enforces_length() {
        assert!(Sample::from_cells(vec![0; SAMPLE_LEN - 1]).is_none());
        let sample = Sample::from_cells(vec![7; SAMPLE_LEN]).unwrap();
        assert_eq!(sample.rows().count(), SAMPLE_SIDE as usize);
        assert_eq!(sample.get(SAMPLE_SIDE as usize, 0), None);
    }

    #[test]
    fn sample_serializes_as_number_array() {
        let sample = Sample::from_cells(vec![0; SAMPLE_LEN]).unwrap();
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json.as_array().unwrap().len(), SAMPLE_LEN);
        assert_eq!(json[0], serde_json::json!(0));
    }
}
