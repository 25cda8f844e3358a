//! Session state: the single record the result view renders from.
//!
//! Holds the selected feature mode, the last prediction, the in-flight phase
//! and the user-facing error message. All transitions go through the methods
//! here so the phase can never be left stuck in `Predicting`.

use crate::inference::FeatureMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Fixed message shown whenever a prediction attempt fails.
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Server connection error! Make sure the backend is running.";

/// Monotonic counter bumped on every clear. Requests are tagged with the
/// generation they were started in.
pub type Generation = u64;

/// Label and confidence returned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// Predicted digit (0-9)
    pub label: u8,
    /// Confidence score (0-100)
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(label: u8, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

/// Whether a prediction request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request in flight - predict is allowed
    Idle,
    /// A request is in flight; prior result/error stay visible but stale
    Predicting {
        /// Generation the request was started in
        generation: Generation,
    },
}

/// What to do with an outcome whose request started before the last clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StaleResponsePolicy {
    /// Write the late outcome into the session anyway
    #[default]
    Apply,
    /// Drop the late outcome; only the phase returns to idle
    Discard,
}

/// Errors from session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A prediction is already in flight")]
    AlreadyInFlight,
}

/// Single mutable record mediating between capture, inference and the view.
#[derive(Debug, Clone)]
pub struct SessionState {
    feature_mode: FeatureMode,
    result: Option<PredictionResult>,
    phase: SessionPhase,
    error: Option<String>,
    generation: Generation,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(FeatureMode::default())
    }
}

impl SessionState {
    pub fn new(feature_mode: FeatureMode) -> Self {
        Self {
            feature_mode,
            result: None,
            phase: SessionPhase::Idle,
            error: None,
            generation: 0,
        }
    }

    pub fn feature_mode(&self) -> FeatureMode {
        self.feature_mode
    }

    /// Changes the feature mode. Allowed in any phase.
    pub fn set_feature_mode(&mut self, mode: FeatureMode) {
        if self.feature_mode != mode {
            log::debug!("Feature mode changed: {} -> {}", self.feature_mode, mode);
        }
        self.feature_mode = mode;
    }

    pub fn result(&self) -> Option<PredictionResult> {
        self.result
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_predicting(&self) -> bool {
        matches!(self.phase, SessionPhase::Predicting { .. })
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// `Idle -> Predicting`. Fails without changing anything when a request is
    /// already in flight.
    ///
    /// Returns the generation to tag the outgoing request with.
    pub fn begin_predict(&mut self) -> Result<Generation, SessionError> {
        if self.is_predicting() {
            return Err(SessionError::AlreadyInFlight);
        }
        self.phase = SessionPhase::Predicting {
            generation: self.generation,
        };
        Ok(self.generation)
    }

    /// `Predicting -> Idle` after a successful response.
    ///
    /// Stores the result and clears the error unless the outcome is stale and
    /// `policy` says to discard it.
    pub fn complete_success(
        &mut self,
        generation: Generation,
        result: PredictionResult,
        policy: StaleResponsePolicy,
    ) {
        self.phase = SessionPhase::Idle;
        if self.should_discard(generation, policy) {
            return;
        }
        self.result = Some(result);
        self.error = None;
    }

    /// `Predicting -> Idle` after a failed attempt.
    ///
    /// Keeps the previous result and sets the fixed connectivity message.
    pub fn complete_failure(&mut self, generation: Generation, policy: StaleResponsePolicy) {
        self.phase = SessionPhase::Idle;
        if self.should_discard(generation, policy) {
            return;
        }
        self.error = Some(CONNECTIVITY_ERROR_MESSAGE.to_string());
    }

    /// Drops the result and error and starts a new generation.
    ///
    /// The phase and feature mode are left alone; an in-flight request still
    /// completes and goes through the stale policy.
    pub fn clear(&mut self) {
        self.result = None;
        self.error = None;
        self.generation += 1;
    }

    fn should_discard(&self, generation: Generation, policy: StaleResponsePolicy) -> bool {
        let stale = generation != self.generation;
        if stale {
            match policy {
                StaleResponsePolicy::Apply => {
                    log::debug!(
                        "Applying outcome from generation {} (current {})",
                        generation,
                        self.generation
                    );
                }
                StaleResponsePolicy::Discard => {
                    log::info!(
                        "Discarding stale outcome from generation {} (current {})",
                        generation,
                        self.generation
                    );
                    return true;
                }
            }
        }
        false
    }
}
