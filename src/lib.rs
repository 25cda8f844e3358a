//! Digit sketch pad: freehand capture, 28×28 downsampling and remote
//! classification.
//!
//! The library holds everything a host needs; the `digitscriber` binary is a
//! headless host that replays recorded strokes or ingests an image and prints
//! the prediction.

pub mod app;
pub mod config;
pub mod draw;
pub mod inference;
pub mod ingest;
pub mod input;
pub mod session;
pub mod ui;

pub use app::{App, AppOptions};
pub use config::Config;
