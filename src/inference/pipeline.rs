use std::sync::Arc;

use crate::inference::{
    transport::InferenceTransport,
    types::{InferenceError, PredictionRequest},
};
use crate::session::{Generation, PredictionResult};

#[derive(Debug, Clone)]
pub(crate) struct PredictionJob {
    pub(crate) generation: Generation,
    pub(crate) request: PredictionRequest,
}

pub(crate) async fn perform_prediction(
    job: &PredictionJob,
    transport: Arc<dyn InferenceTransport>,
) -> Result<PredictionResult, InferenceError> {
    log::info!(
        "Sending prediction request (generation={}, feature_type={})",
        job.generation,
        job.request.feature_type
    );

    let response = transport.send(&job.request).await?;
    log::debug!("Classifier responded: {:?}", response);

    response.into_result()
}
