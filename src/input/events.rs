//! Device-neutral input events and coordinate resolution.

use crate::draw::SurfacePoint;
use serde::{Deserialize, Serialize};

/// A positional input event as reported by the host.
///
/// Mouse events already carry coordinates relative to the surface (the host
/// translates them); touch events carry viewport coordinates that still need
/// the surface origin subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum InputEvent {
    /// Mouse/pen pointer with a surface-relative offset.
    Pointer { offset_x: f64, offset_y: f64 },
    /// Touch point in viewport coordinates.
    Touch { client_x: f64, client_y: f64 },
}

/// Where the drawing surface currently sits in the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Viewport X of the surface's left edge
    #[serde(default)]
    pub left: f64,
    /// Viewport Y of the surface's top edge
    #[serde(default)]
    pub top: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Stroke lifecycle transition carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokePhase {
    /// Button pressed / finger placed
    Down,
    /// Pointer or finger moved
    Move,
    /// Button released / finger lifted
    Up,
    /// Pointer left the surface
    Leave,
}

impl InputEvent {
    /// Resolves the event into surface-local coordinates.
    ///
    /// # Arguments
    /// * `bounds` - Current viewport position of the surface (only used for touch)
    pub fn resolve(&self, bounds: SurfaceBounds) -> SurfacePoint {
        match *self {
            InputEvent::Pointer { offset_x, offset_y } => SurfacePoint::new(offset_x, offset_y),
            InputEvent::Touch { client_x, client_y } => {
                SurfacePoint::new(client_x - bounds.left, client_y - bounds.top)
            }
        }
    }
}
