use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::{Duration, sleep};

use super::{
    transport::InferenceTransport,
    types::{FeatureMode, InferenceError, PredictionRequest, PredictionResponse},
};

/// What the mock classifier answers with.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MockReply {
    Respond { result: i64, confidence: f64 },
    Status(u16),
    /// Unwinds inside `send`, taking the worker task down with it.
    Panic,
}

/// Scripted transport that records every request it sees.
#[derive(Clone)]
pub(crate) struct MockTransport {
    pub(crate) replies: Arc<Mutex<Vec<MockReply>>>,
    pub(crate) delay: Duration,
    pub(crate) seen: Arc<Mutex<Vec<(FeatureMode, Vec<u8>)>>>,
}

impl MockTransport {
    /// Replies are consumed in order; the last one repeats.
    pub(crate) fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceTransport for MockTransport {
    async fn send(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, InferenceError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.feature_type, request.pixels.as_slice().to_vec()));
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                replies.remove(0)
            } else {
                replies[0]
            }
        };
        match reply {
            MockReply::Respond { result, confidence } => {
                Ok(PredictionResponse {
                    result: result as f64,
                    confidence,
                })
            }
            MockReply::Status(code) => Err(InferenceError::Status(code)),
            MockReply::Panic => panic!("mock transport crashed"),
        }
    }
}
