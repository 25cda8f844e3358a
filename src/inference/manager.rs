use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::inference::{
    pipeline::{PredictionJob, perform_prediction},
    transport::InferenceTransport,
    types::{InferenceError, PredictionOutcome, PredictionRequest},
};
use crate::session::Generation;

/// Runs prediction requests off the host thread.
///
/// Requests are queued to a background task which sends them one at a time;
/// outcomes come back over a channel for the host to apply to its
/// [`SessionState`](crate::session::SessionState).
pub struct PredictionManager {
    /// Channel for sending prediction jobs.
    request_tx: mpsc::UnboundedSender<PredictionJob>,
    /// Completed attempts waiting to be applied.
    outcome_rx: mpsc::UnboundedReceiver<PredictionOutcome>,
}

impl PredictionManager {
    /// Create a new prediction manager.
    ///
    /// This spawns a background task that owns the transport.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    /// * `transport` - How requests reach the classifier
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        transport: Arc<dyn InferenceTransport>,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<PredictionJob>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<PredictionOutcome>();
        runtime_handle.spawn(async move {
            while let Some(job) = request_rx.recv().await {
                let result = perform_prediction(&job, transport.clone()).await;
                match &result {
                    Ok(prediction) => {
                        log::info!(
                            "Prediction succeeded: {} ({:.1}%)",
                            prediction.label,
                            prediction.confidence
                        );
                    }
                    Err(e) => log::error!("Prediction failed: {}", e),
                }

                let outcome = PredictionOutcome {
                    generation: job.generation,
                    result,
                };
                if outcome_tx.send(outcome).is_err() {
                    log::debug!("Prediction outcome dropped: host no longer listening");
                }
            }
            log::debug!("Prediction worker stopped");
        });

        Self {
            request_tx,
            outcome_rx,
        }
    }

    /// Queue a prediction request.
    ///
    /// This is non-blocking; the outcome is delivered later through
    /// [`try_take_outcome`](Self::try_take_outcome) or
    /// [`next_outcome`](Self::next_outcome).
    pub fn request_prediction(
        &self,
        generation: Generation,
        request: PredictionRequest,
    ) -> Result<(), InferenceError> {
        self.request_tx
            .send(PredictionJob {
                generation,
                request,
            })
            .map_err(|_| InferenceError::WorkerStopped)
    }

    /// Take a completed outcome without waiting (non-blocking).
    ///
    /// `Ok(None)` means nothing has finished yet; [`InferenceError::WorkerStopped`]
    /// means the worker is gone and no further outcome will arrive.
    pub fn try_take_outcome(&mut self) -> Result<Option<PredictionOutcome>, InferenceError> {
        match self.outcome_rx.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(InferenceError::WorkerStopped),
        }
    }

    /// Wait for the next completed outcome.
    ///
    /// Returns `None` once the worker has stopped.
    pub async fn next_outcome(&mut self) -> Option<PredictionOutcome> {
        self.outcome_rx.recv().await
    }
}

#[cfg(test)]
impl PredictionManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<PredictionJob>();
        drop(rx);
        let (_outcome_tx, outcome_rx) = mpsc::unbounded_channel::<PredictionOutcome>();
        Self {
            request_tx: tx,
            outcome_rx,
        }
    }
}
