use cairo::{Context, ImageSurface};
use digitscriber::draw::{SAMPLE_LEN, Sample};
use digitscriber::session::{PredictionResult, SessionState, StaleResponsePolicy};

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

/// Counts pixels whose color channels are not all equal (i.e. the colored bar).
fn colored_pixels(surface: &mut ImageSurface) -> usize {
    let data = surface.data().unwrap();
    data.chunks(4)
        .filter(|px| !(px[0] == px[1] && px[1] == px[2]))
        .count()
}

fn lit_pixels(surface: &mut ImageSurface) -> usize {
    let data = surface.data().unwrap();
    data.chunks(4)
        .filter(|px| px[0] > 0 || px[1] > 0 || px[2] > 0)
        .count()
}

#[test]
fn render_result_without_prediction_draws_placeholder() {
    let session = SessionState::default();
    let (mut surface, ctx) = surface_with_context(320, 240);
    digitscriber::ui::render_result(&ctx, &session, 320, 240);
    drop(ctx);

    assert!(lit_pixels(&mut surface) > 0, "placeholder should render");
}

#[test]
fn render_result_fills_confidence_bar() {
    let mut session = SessionState::default();
    let generation = session.begin_predict().unwrap();
    session.complete_success(
        generation,
        PredictionResult::new(7, 95.0),
        StaleResponsePolicy::Apply,
    );

    let (mut with_result, ctx) = surface_with_context(320, 240);
    digitscriber::ui::render_result(&ctx, &session, 320, 240);
    drop(ctx);

    let (mut empty, ctx) = surface_with_context(320, 240);
    digitscriber::ui::render_result(&ctx, &SessionState::default(), 320, 240);
    drop(ctx);

    assert!(colored_pixels(&mut with_result) > colored_pixels(&mut empty));
}

#[test]
fn sample_preview_has_one_line_per_row() {
    let sample = Sample::from_cells(vec![128; SAMPLE_LEN]).unwrap();
    let preview = digitscriber::ui::sample_preview(&sample);
    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), 28);
    assert!(lines.iter().all(|line| line.chars().count() == 28));
}
