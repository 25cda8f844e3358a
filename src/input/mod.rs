//! Input handling and the stroke capture state machine.
//!
//! Host pointer and touch events arrive as [`InputEvent`]s, are resolved to
//! surface-local coordinates by [`InputEvent::resolve`], and then drive
//! [`StrokeCapture`], which paints freehand segments onto the drawing surface.

pub mod capture;
pub mod events;
pub mod script;

// Re-export commonly used types at module level
pub use capture::{CaptureState, StrokeCapture};
pub use events::{InputEvent, StrokePhase, SurfaceBounds};
pub use script::{ScriptError, ScriptStep, StrokeScript};
