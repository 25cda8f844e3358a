//! RGBA color type and the fixed palette used by the sketch pad.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use digitscriber::draw::Color;
/// let green = Color::from_rgb8(0x4a, 0xde, 0x80);
/// assert_eq!(green.a, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 0-255 channel values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Sets this color as the source of `ctx`.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

/// Surface background.
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Stroke ink.
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Confidence bar fill for confident predictions (#4ade80).
pub const CONFIDENT_GREEN: Color = Color::new(
    0x4a as f64 / 255.0,
    0xde as f64 / 255.0,
    0x80 as f64 / 255.0,
    1.0,
);

/// Confidence bar fill for doubtful predictions (#facc15).
pub const DOUBTFUL_YELLOW: Color = Color::new(
    0xfa as f64 / 255.0,
    0xcc as f64 / 255.0,
    0x15 as f64 / 255.0,
    1.0,
);
