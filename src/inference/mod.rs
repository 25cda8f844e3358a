//! Remote inference client.
//!
//! This module provides the request/response lifecycle of a prediction:
//! - Wire types for the classifier's JSON schema
//! - A pluggable [`InferenceTransport`] with the reqwest-backed [`HttpTransport`]
//! - [`PredictionManager`], which runs requests on a background task and hands
//!   outcomes back to the single-threaded host

pub mod transport;
pub mod types;

mod manager;
mod pipeline;
#[cfg(test)]
pub(crate) mod mock;

pub use manager::PredictionManager;
pub use transport::{DEFAULT_ENDPOINT, HttpTransport, InferenceTransport};
pub use types::{
    FeatureMode, InferenceError, PredictError, PredictionOutcome, PredictionRequest,
    PredictionResponse,
};
