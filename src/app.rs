//! One drawing session: surface, stroke capture, session state and the
//! prediction worker, plus the user actions a host wires to its controls.

use std::path::Path;

use crate::config::Config;
use crate::draw::{DrawingSurface, StrokeStyle, SurfaceError, extract_sample};
use crate::inference::{
    FeatureMode, InferenceError, PredictError, PredictionManager, PredictionOutcome,
    PredictionRequest,
};
use crate::ingest::{ImageIngestor, IngestError};
use crate::input::{InputEvent, StrokeCapture, StrokePhase, StrokeScript, SurfaceBounds};
use crate::session::{
    Generation, SessionError, SessionPhase, SessionState, StaleResponsePolicy,
};

/// Settings an [`App`] is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppOptions {
    pub stroke_width: f64,
    pub feature_mode: FeatureMode,
    pub stale_policy: StaleResponsePolicy,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            stroke_width: crate::draw::DEFAULT_STROKE_WIDTH,
            feature_mode: FeatureMode::default(),
            stale_policy: StaleResponsePolicy::default(),
        }
    }
}

impl AppOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stroke_width: config.canvas.stroke_width,
            feature_mode: config.inference.default_feature,
            stale_policy: config.inference.stale_responses,
        }
    }
}

/// Owns everything one drawing session touches.
///
/// Lives on the host thread; only the network call leaves it, via the
/// [`PredictionManager`].
pub struct App {
    surface: DrawingSurface,
    capture: StrokeCapture,
    bounds: SurfaceBounds,
    session: SessionState,
    ingestor: ImageIngestor,
    predictions: PredictionManager,
    stale_policy: StaleResponsePolicy,
}

impl App {
    pub fn new(options: AppOptions, predictions: PredictionManager) -> Result<Self, SurfaceError> {
        Ok(Self {
            surface: DrawingSurface::new()?,
            capture: StrokeCapture::new(StrokeStyle::with_width(options.stroke_width)),
            bounds: SurfaceBounds::default(),
            session: SessionState::new(options.feature_mode),
            ingestor: ImageIngestor::new(),
            predictions,
            stale_policy: options.stale_policy,
        })
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Records where the surface sits in the viewport (for touch input).
    pub fn set_surface_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    /// Routes one host input event into stroke capture.
    ///
    /// `Down` and `Move` without a position are ignored.
    pub fn handle_input(
        &mut self,
        phase: StrokePhase,
        event: Option<InputEvent>,
    ) -> Result<(), SurfaceError> {
        let point = event.map(|event| event.resolve(self.bounds));
        match (phase, point) {
            (StrokePhase::Down, Some(point)) => self.capture.begin(point),
            (StrokePhase::Move, Some(point)) => {
                self.capture.extend(&mut self.surface, point)?;
            }
            (StrokePhase::Up | StrokePhase::Leave, _) => self.capture.end(),
            (phase, None) => log::debug!("Ignoring {:?} without a position", phase),
        }
        Ok(())
    }

    pub fn pointer_down(&mut self, event: InputEvent) -> Result<(), SurfaceError> {
        self.handle_input(StrokePhase::Down, Some(event))
    }

    pub fn pointer_move(&mut self, event: InputEvent) -> Result<(), SurfaceError> {
        self.handle_input(StrokePhase::Move, Some(event))
    }

    pub fn pointer_up(&mut self) -> Result<(), SurfaceError> {
        self.handle_input(StrokePhase::Up, None)
    }

    /// Feeds every step of `script` through [`handle_input`](Self::handle_input).
    pub fn replay(&mut self, script: &StrokeScript) -> Result<(), SurfaceError> {
        self.set_surface_bounds(script.bounds);
        for step in &script.steps {
            self.handle_input(step.phase, step.event)?;
        }
        // A script that stops mid-stroke behaves like the pointer leaving.
        self.capture.end();
        Ok(())
    }

    /// Wipes the drawing and the displayed result/error.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        self.capture.clear(&mut self.surface, &mut self.session)
    }

    pub fn select_feature(&mut self, mode: FeatureMode) {
        self.session.set_feature_mode(mode);
    }

    /// Whether the predict control should be enabled.
    pub fn can_predict(&self) -> bool {
        !self.session.is_predicting()
    }

    /// Rasterizes the surface and queues one prediction request.
    ///
    /// Refuses while a request is in flight. Returns the generation the
    /// request was tagged with.
    pub fn predict(&mut self) -> Result<Generation, PredictError> {
        if self.session.is_predicting() {
            return Err(SessionError::AlreadyInFlight.into());
        }

        let pixels = extract_sample(&self.surface)?;
        let generation = self.session.begin_predict()?;
        let request = PredictionRequest {
            pixels,
            feature_type: self.session.feature_mode(),
        };
        log::info!(
            "Requesting prediction with {} ({})",
            request.feature_type,
            request.feature_type.display_name()
        );

        if let Err(e) = self.predictions.request_prediction(generation, request) {
            log::error!("Prediction could not be queued: {}", e);
            self.session.complete_failure(generation, self.stale_policy);
        }
        Ok(generation)
    }

    /// Applies a finished outcome if one is ready. Returns whether the session
    /// changed.
    ///
    /// If the worker has gone away while a request is in flight, the attempt
    /// is failed so the session does not stay stuck in `Predicting`.
    pub fn poll_outcome(&mut self) -> bool {
        match self.predictions.try_take_outcome() {
            Ok(Some(outcome)) => {
                self.apply_outcome(outcome);
                true
            }
            Ok(None) => false,
            Err(e) => self.fail_in_flight(&e),
        }
    }

    /// Waits for the in-flight request to finish and applies its outcome.
    ///
    /// Returns immediately when nothing is in flight.
    pub async fn wait_for_outcome(&mut self) {
        if !self.session.is_predicting() {
            return;
        }
        match self.predictions.next_outcome().await {
            Some(outcome) => self.apply_outcome(outcome),
            None => {
                self.fail_in_flight(&InferenceError::WorkerStopped);
            }
        }
    }

    /// Loads an image file onto the surface.
    ///
    /// No file is a silent no-op. Other failures leave the surface as it was
    /// and are logged, not shown in the session.
    pub async fn load_image(&mut self, file: Option<&Path>) -> Result<(), IngestError> {
        match self.ingestor.load(file, &mut self.surface).await {
            Ok(()) => Ok(()),
            Err(IngestError::NoInputProvided) => Ok(()),
            Err(e) => {
                log::warn!("Image upload failed: {}", e);
                Err(e)
            }
        }
    }

    /// Fails the outstanding request, if any, with the generation it was
    /// started in. Returns whether the session changed.
    fn fail_in_flight(&mut self, error: &InferenceError) -> bool {
        let SessionPhase::Predicting { generation } = self.session.phase() else {
            return false;
        };
        log::error!("Prediction attempt lost: {}", error);
        self.session.complete_failure(generation, self.stale_policy);
        true
    }

    fn apply_outcome(&mut self, outcome: PredictionOutcome) {
        let generation = outcome.generation;
        match outcome.result {
            Ok(result) => {
                self.session
                    .complete_success(generation, result, self.stale_policy);
            }
            Err(e) => {
                log::warn!("Prediction attempt failed: {}", e);
                self.session.complete_failure(generation, self.stale_policy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::SAMPLE_LEN;
    use crate::inference::mock::{MockReply, MockTransport};
    use crate::session::{CONNECTIVITY_ERROR_MESSAGE, PredictionResult};
    use std::sync::Arc;
    use std::time::Duration;

    fn app_with(mock: &MockTransport, options: AppOptions) -> App {
        let manager = PredictionManager::new(
            &tokio::runtime::Handle::current(),
            Arc::new(mock.clone()),
        );
        App::new(options, manager).unwrap()
    }

    #[tokio::test]
    async fn blank_surface_prediction_end_to_end() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 7,
            confidence: 42.5,
        }]);
        let mut app = app_with(&mock, AppOptions::default());
        app.select_feature(FeatureMode::F3);

        app.predict().unwrap();
        assert!(app.session().is_predicting());
        assert!(!app.can_predict());
        app.wait_for_outcome().await;

        assert_eq!(app.session().result(), Some(PredictionResult::new(7, 42.5)));
        assert!(app.session().error().is_none());
        assert!(!app.session().is_predicting());

        let seen = mock.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, FeatureMode::F3);
        assert_eq!(seen[0].1, vec![0u8; SAMPLE_LEN]);
    }

    #[tokio::test]
    async fn server_error_keeps_previous_result() {
        let mock = MockTransport::new(vec![
            MockReply::Respond {
                result: 4,
                confidence: 91.0,
            },
            MockReply::Status(500),
        ]);
        let mut app = app_with(&mock, AppOptions::default());

        app.predict().unwrap();
        app.wait_for_outcome().await;
        assert_eq!(app.session().result(), Some(PredictionResult::new(4, 91.0)));

        app.predict().unwrap();
        app.wait_for_outcome().await;
        assert!(!app.session().is_predicting());
        assert_eq!(app.session().error(), Some(CONNECTIVITY_ERROR_MESSAGE));
        assert_eq!(app.session().result(), Some(PredictionResult::new(4, 91.0)));
    }

    #[tokio::test]
    async fn second_predict_while_in_flight_is_refused() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 1,
            confidence: 60.0,
        }])
        .with_delay(Duration::from_millis(50));
        let mut app = app_with(&mock, AppOptions::default());

        app.predict().unwrap();
        for _ in 0..3 {
            assert!(matches!(
                app.predict(),
                Err(PredictError::Session(SessionError::AlreadyInFlight))
            ));
        }
        app.wait_for_outcome().await;

        assert_eq!(mock.calls(), 1);
        assert_eq!(app.session().result(), Some(PredictionResult::new(1, 60.0)));
    }

    #[tokio::test]
    async fn clear_during_flight_applies_late_result_by_default() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 2,
            confidence: 70.0,
        }])
        .with_delay(Duration::from_millis(20));
        let mut app = app_with(&mock, AppOptions::default());

        app.predict().unwrap();
        app.clear().unwrap();
        assert!(app.session().is_predicting());
        app.wait_for_outcome().await;

        assert_eq!(app.session().result(), Some(PredictionResult::new(2, 70.0)));
    }

    #[tokio::test]
    async fn clear_during_flight_discards_when_configured() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 2,
            confidence: 70.0,
        }])
        .with_delay(Duration::from_millis(20));
        let options = AppOptions {
            stale_policy: StaleResponsePolicy::Discard,
            ..AppOptions::default()
        };
        let mut app = app_with(&mock, options);

        app.predict().unwrap();
        app.clear().unwrap();
        app.wait_for_outcome().await;

        assert!(!app.session().is_predicting());
        assert!(app.session().result().is_none());
        assert!(app.predict().is_ok());
    }

    async fn poll_until_changed(app: &mut App) {
        for _ in 0..200 {
            if app.poll_outcome() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no outcome arrived");
    }

    #[tokio::test]
    async fn polling_applies_outcome() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 5,
            confidence: 83.0,
        }])
        .with_delay(Duration::from_millis(10));
        let mut app = app_with(&mock, AppOptions::default());

        assert!(!app.poll_outcome());
        app.predict().unwrap();
        assert!(!app.poll_outcome());
        poll_until_changed(&mut app).await;

        assert!(app.can_predict());
        assert_eq!(app.session().result(), Some(PredictionResult::new(5, 83.0)));
        assert!(app.session().error().is_none());
    }

    #[tokio::test]
    async fn polling_recovers_when_worker_crashes() {
        let mock = MockTransport::new(vec![MockReply::Panic]);
        let mut app = app_with(&mock, AppOptions::default());

        app.predict().unwrap();
        app.clear().unwrap();
        poll_until_changed(&mut app).await;

        assert!(app.can_predict());
        // Failed with the request's own generation, so the default policy
        // still surfaces the error after the clear.
        assert_eq!(app.session().error(), Some(CONNECTIVITY_ERROR_MESSAGE));
        assert!(!app.poll_outcome());
    }

    #[tokio::test]
    async fn crashed_worker_is_discarded_as_stale_after_clear() {
        let mock = MockTransport::new(vec![MockReply::Panic]);
        let options = AppOptions {
            stale_policy: StaleResponsePolicy::Discard,
            ..AppOptions::default()
        };
        let mut app = app_with(&mock, options);

        app.predict().unwrap();
        app.clear().unwrap();
        app.wait_for_outcome().await;

        assert!(app.can_predict());
        assert!(app.session().error().is_none());
    }

    #[tokio::test]
    async fn stopped_worker_fails_immediately() {
        let mut app = App::new(
            AppOptions::default(),
            PredictionManager::with_closed_channel_for_test(),
        )
        .unwrap();

        app.predict().unwrap();
        assert!(!app.session().is_predicting());
        assert_eq!(app.session().error(), Some(CONNECTIVITY_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn replayed_strokes_reach_the_sample() {
        let mock = MockTransport::new(vec![MockReply::Respond {
            result: 1,
            confidence: 99.0,
        }]);
        let mut app = app_with(&mock, AppOptions::default());
        let script = StrokeScript::parse(
            r#"{
                "bounds": { "left": 100, "top": 50 },
                "steps": [
                    { "phase": "down", "event": { "source": "touch", "client_x": 240, "client_y": 80 } },
                    { "phase": "move", "event": { "source": "touch", "client_x": 240, "client_y": 300 } },
                    { "phase": "up" }
                ]
            }"#,
        )
        .unwrap();

        app.replay(&script).unwrap();
        assert_eq!(app.surface().pixel(140, 140).unwrap(), Some([255, 255, 255]));
        assert_eq!(app.surface().pixel(40, 140).unwrap(), Some([0, 0, 0]));

        app.predict().unwrap();
        app.wait_for_outcome().await;
        let seen = mock.seen.lock().unwrap();
        let column: Vec<u8> = (0..28).map(|row| seen[0].1[row * 28 + 14]).collect();
        assert!(column[10..20].iter().all(|v| *v > 200));
    }

    #[tokio::test]
    async fn moves_after_leave_do_not_paint() {
        let mock = MockTransport::new(vec![]);
        let mut app = app_with(&mock, AppOptions::default());
        app.pointer_down(InputEvent::Pointer {
            offset_x: 20.0,
            offset_y: 20.0,
        })
        .unwrap();
        app.handle_input(StrokePhase::Leave, None).unwrap();
        app.pointer_move(InputEvent::Pointer {
            offset_x: 260.0,
            offset_y: 260.0,
        })
        .unwrap();
        assert_eq!(app.surface().pixel(140, 140).unwrap(), Some([0, 0, 0]));
        app.pointer_up().unwrap();
    }

    #[tokio::test]
    async fn missing_upload_is_silent() {
        let mock = MockTransport::new(vec![]);
        let mut app = app_with(&mock, AppOptions::default());
        app.load_image(None).await.unwrap();
        assert!(app.session().error().is_none());
    }
}
