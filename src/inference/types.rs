//! Data types for the remote classifier exchange.

use crate::draw::{Sample, SurfaceError};
use crate::session::{Generation, PredictionResult, SessionError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Preprocessing strategy the classifier applies before predicting.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    /// Raw intensities scaled to 0-1
    #[default]
    F1,
    /// Edge detector response
    F2,
    /// Averages over pixel blocks
    F3,
    /// Thresholded black/white pixels
    F4,
    /// Row and column projections
    F5,
}

impl FeatureMode {
    /// All modes in menu order.
    pub const ALL: [FeatureMode; 5] = [
        FeatureMode::F1,
        FeatureMode::F2,
        FeatureMode::F3,
        FeatureMode::F4,
        FeatureMode::F5,
    ];

    /// Wire identifier (`"f1"` .. `"f5"`).
    pub fn id(&self) -> &'static str {
        match self {
            FeatureMode::F1 => "f1",
            FeatureMode::F2 => "f2",
            FeatureMode::F3 => "f3",
            FeatureMode::F4 => "f4",
            FeatureMode::F5 => "f5",
        }
    }

    /// Human-readable name for menus and the result view.
    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureMode::F1 => "Normalized Pixels",
            FeatureMode::F2 => "Edge Features",
            FeatureMode::F3 => "Block Averaging",
            FeatureMode::F4 => "Binarized Pixels",
            FeatureMode::F5 => "Projection",
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// JSON body of the prediction POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub pixels: Sample,
    pub feature_type: FeatureMode,
}

/// JSON body returned by the classifier on success.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PredictionResponse {
    /// Predicted digit label; integral floats such as `7.0` are accepted
    pub result: f64,
    /// Confidence score, 0-100
    pub confidence: f64,
}

impl PredictionResponse {
    /// Checks the response against the expected ranges.
    ///
    /// A label outside 0-9 or a non-finite confidence counts as a malformed
    /// response.
    pub fn into_result(self) -> Result<PredictionResult, InferenceError> {
        let digit = self.result;
        if !(digit.is_finite() && digit.fract() == 0.0 && (0.0..=9.0).contains(&digit)) {
            return Err(InferenceError::InvalidResponse(format!(
                "label {} is not a digit",
                digit
            )));
        }
        let label = digit as u8;

        if !self.confidence.is_finite() {
            return Err(InferenceError::InvalidResponse(format!(
                "confidence {} is not a number",
                self.confidence
            )));
        }

        Ok(PredictionResult::new(label, self.confidence))
    }
}

/// Outcome of one prediction attempt, tagged with the session generation it
/// was started in.
#[derive(Debug)]
pub struct PredictionOutcome {
    pub generation: Generation,
    pub result: Result<PredictionResult, InferenceError>,
}

/// Errors that can occur while talking to the classifier.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Prediction worker not running")]
    WorkerStopped,
}

/// Reasons a predict action could not be started.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to rasterize surface: {0}")]
    Surface(#[from] SurfaceError),
}
