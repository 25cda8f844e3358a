//! Result view: predicted digit, confidence bar and sample preview
use crate::draw::color::{BLACK, CONFIDENT_GREEN, Color, DOUBTFUL_YELLOW, WHITE};
use crate::draw::{SAMPLE_SIDE, Sample};
use crate::session::SessionState;

// ============================================================================
// Layout constants (not configurable)
// ============================================================================

/// Outer padding around the result panel
const PANEL_PADDING: f64 = 16.0;
/// Height of the confidence bar
const BAR_HEIGHT: f64 = 14.0;
/// Track color behind the confidence bar
const BAR_TRACK: Color = Color::new(0.25, 0.25, 0.25, 1.0);
/// Confidence above which the bar turns green
const CONFIDENT_THRESHOLD: f64 = 80.0;

/// Shading ramp for [`sample_preview`], darkest first.
const PREVIEW_RAMP: [char; 5] = [' ', '.', ':', '+', '#'];

/// Bar fill color for a confidence score.
pub fn confidence_color(confidence: f64) -> Color {
    if confidence > CONFIDENT_THRESHOLD {
        CONFIDENT_GREEN
    } else {
        DOUBTFUL_YELLOW
    }
}

/// Fraction of the bar to fill, clamped to 0-1.
pub fn bar_fraction(confidence: f64) -> f64 {
    if confidence.is_finite() {
        (confidence / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Render the result panel into `ctx`.
///
/// Shows the predicted label (or `?` when there is none), the confidence
/// bar and the feature mode name. An error message, when present, is drawn
/// under the bar; a stale result stays visible alongside it.
pub fn render_result(ctx: &cairo::Context, session: &SessionState, width: u32, height: u32) {
    ctx.save().ok();

    let width = width as f64;
    let height = height as f64;
    BLACK.apply(ctx);
    ctx.rectangle(0.0, 0.0, width, height);
    let _ = ctx.fill();

    let result = session.result();
    let label = match result {
        Some(result) => result.label.to_string(),
        None => "?".to_string(),
    };

    // Big digit
    let label_size = (height * 0.35).max(12.0);
    let label_bottom = draw_text(
        ctx,
        &label,
        &format!("Sans Bold {}", label_size as i32),
        WHITE,
        PANEL_PADDING,
        PANEL_PADDING,
    );

    // Confidence bar
    let bar_y = label_bottom + PANEL_PADDING;
    let bar_width = (width - PANEL_PADDING * 2.0).max(0.0);
    BAR_TRACK.apply(ctx);
    ctx.rectangle(PANEL_PADDING, bar_y, bar_width, BAR_HEIGHT);
    let _ = ctx.fill();

    let mut caption = session.feature_mode().display_name().to_string();
    if let Some(result) = result {
        confidence_color(result.confidence).apply(ctx);
        ctx.rectangle(
            PANEL_PADDING,
            bar_y,
            bar_width * bar_fraction(result.confidence),
            BAR_HEIGHT,
        );
        let _ = ctx.fill();
        caption = format!("{:.1}% - {}", result.confidence, caption);
    }
    if session.is_predicting() {
        caption.push_str("  (predicting...)");
    }

    let caption_bottom = draw_text(
        ctx,
        &caption,
        "Sans 12",
        WHITE,
        PANEL_PADDING,
        bar_y + BAR_HEIGHT + PANEL_PADDING / 2.0,
    );

    if let Some(error) = session.error() {
        draw_text(
            ctx,
            error,
            "Sans 11",
            DOUBTFUL_YELLOW,
            PANEL_PADDING,
            caption_bottom + PANEL_PADDING / 2.0,
        );
    }

    ctx.restore().ok();
}

/// Draws one line of text with its top-left at (x, y) and returns its bottom edge.
fn draw_text(ctx: &cairo::Context, text: &str, font: &str, color: Color, x: f64, y: f64) -> f64 {
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(font);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let (_ink_rect, logical_rect) = layout.extents();
    let text_height = logical_rect.height() as f64 / pango::SCALE as f64;

    color.apply(ctx);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);
    y + text_height
}

/// Text rendering of a sample, one line per row.
pub fn sample_preview(sample: &Sample) -> String {
    let side = SAMPLE_SIDE as usize;
    let mut out = String::with_capacity(side * (side + 1));
    for row in sample.rows() {
        for &value in row {
            let index = value as usize * PREVIEW_RAMP.len() / 256;
            out.push(PREVIEW_RAMP[index]);
        }
        out.push('\n');
    }
    out
}
