//! Freehand stroke capture.

use crate::draw::{DrawingSurface, StrokeStyle, SurfaceError, SurfacePoint};
use crate::session::SessionState;

/// Stroke capture state machine.
///
/// `Idle` between strokes; `Drawing` while the button is held or the finger
/// is down, remembering where the previous segment ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState {
    /// Not drawing - move events are ignored
    Idle,
    /// A stroke is in progress
    Drawing {
        /// End of the last painted segment (or the stroke start)
        last: SurfacePoint,
    },
}

/// Turns resolved pointer positions into segments on the [`DrawingSurface`].
///
/// Coordinates must already be surface-local; see
/// [`InputEvent::resolve`](super::InputEvent::resolve).
#[derive(Debug)]
pub struct StrokeCapture {
    state: CaptureState,
    style: StrokeStyle,
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(StrokeStyle::default())
    }
}

impl StrokeCapture {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            state: CaptureState::Idle,
            style,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Starts a new stroke at `point`. Nothing is painted until the first move.
    pub fn begin(&mut self, point: SurfacePoint) {
        log::trace!("Stroke begin at ({:.1}, {:.1})", point.x, point.y);
        self.state = CaptureState::Drawing { last: point };
    }

    /// Extends the current stroke to `point`.
    ///
    /// Returns `Ok(false)` without touching the surface when no stroke is in
    /// progress.
    pub fn extend(
        &mut self,
        surface: &mut DrawingSurface,
        point: SurfacePoint,
    ) -> Result<bool, SurfaceError> {
        let CaptureState::Drawing { last } = self.state else {
            return Ok(false);
        };

        surface.stroke_segment(last, point, &self.style)?;
        self.state = CaptureState::Drawing { last: point };
        Ok(true)
    }

    /// Finishes the current stroke. Calling it while idle does nothing.
    pub fn end(&mut self) {
        if self.is_drawing() {
            log::trace!("Stroke end");
        }
        self.state = CaptureState::Idle;
    }

    /// Wipes the surface back to black and drops the session's result and error.
    pub fn clear(
        &mut self,
        surface: &mut DrawingSurface,
        session: &mut SessionState,
    ) -> Result<(), SurfaceError> {
        self.end();
        surface.clear()?;
        session.clear();
        log::debug!("Surface cleared");
        Ok(())
    }
}
