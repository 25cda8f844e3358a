//! Pen settings for freehand strokes.

use super::color::{Color, WHITE};

/// Default pen width in surface pixels.
///
/// Wide enough that a stroke survives the 10× reduction to the 28×28 sample
/// as a solid line a few cells thick.
pub const DEFAULT_STROKE_WIDTH: f64 = 30.0;

/// How freehand segments are painted onto the [`DrawingSurface`](super::DrawingSurface).
///
/// Caps and joins are always round so consecutive segments merge into a
/// continuous line without notches at the joints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Ink color
    pub color: Color,
    /// Line width in surface pixels
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: WHITE,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl StrokeStyle {
    /// White pen with a custom width.
    pub fn with_width(width: f64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, ctx: &cairo::Context) {
        self.color.apply(ctx);
        ctx.set_line_width(self.width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
    }
}
