use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

use crate::components::tools::PaintMode;

// ============================================================================
// RGB COLOR
// ============================================================================

/// An opaque 8-bit RGB color. Cells carry no alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color of a single cell. `None` means the cell is unpainted.
pub type CellColor = Option<Rgb>;

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or the short `#rgb` form.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // "#abc" expands to "#aabbcc"
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| err())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(err()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Subtract `amount` from every channel, clamping at 0.
    pub fn darkened(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A color string that is not a valid hex triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}': expected #rrggbb", self.0)
    }
}

impl std::error::Error for ColorParseError {}

// ============================================================================
// COLOR ENGINE
// ============================================================================

/// Color a darken stroke gives to an unpainted cell.
pub const DARKEN_FIRST_TOUCH: Rgb = Rgb::new(230, 230, 230);
/// Per-channel amount removed by each further darken touch.
pub const DARKEN_STEP: u8 = 25;
/// The sweep wraps after this many gradient paints (cursor step of 0.01).
pub const GRADIENT_STEPS: u32 = 100;
pub const GRADIENT_START: Rgb = Rgb::BLACK;
pub const GRADIENT_END: Rgb = Rgb::WHITE;

/// Computes the next color of a cell for the active paint mode.
///
/// Holds the two pieces of state the color math needs: the gradient cursor,
/// which is shared by the whole session so that separate strokes continue the
/// same sweep, and the random source used by rainbow mode.
pub struct ColorEngine {
    gradient_start: Rgb,
    gradient_end: Rgb,
    /// Cursor position in hundredths, always `< GRADIENT_STEPS`.
    gradient_step: u32,
    rng: StdRng,
}

impl Default for ColorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEngine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic rainbow sequence, for tests and reproducible sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            gradient_start: GRADIENT_START,
            gradient_end: GRADIENT_END,
            gradient_step: 0,
            rng,
        }
    }

    /// Next color for a cell currently colored `old`.
    ///
    /// `solid` is the picker color used by [`PaintMode::Normal`]. Only gradient
    /// mode mutates the engine (the cursor advances one step).
    pub fn compute_color(&mut self, mode: PaintMode, solid: Rgb, old: CellColor) -> CellColor {
        match mode {
            PaintMode::Eraser => None,
            PaintMode::Rainbow => Some(self.random_color()),
            PaintMode::Gradient => Some(self.next_gradient_color()),
            PaintMode::Darken => Some(darken(old)),
            PaintMode::Normal => Some(solid),
        }
    }

    pub fn random_color(&mut self) -> Rgb {
        Rgb::new(self.rng.r#gen(), self.rng.r#gen(), self.rng.r#gen())
    }

    /// Color at the current cursor, then advance the cursor by 0.01 (mod 1).
    pub fn next_gradient_color(&mut self) -> Rgb {
        let color = self.gradient_color_at(self.gradient_step);
        self.gradient_step = (self.gradient_step + 1) % GRADIENT_STEPS;
        color
    }

    fn gradient_color_at(&self, step: u32) -> Rgb {
        let lerp = |start: u8, end: u8| -> u8 {
            let delta = (end as i64 - start as i64) * step as i64;
            let value = start as f64 + (delta as f64 / GRADIENT_STEPS as f64).floor();
            value.clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            lerp(self.gradient_start.r, self.gradient_end.r),
            lerp(self.gradient_start.g, self.gradient_end.g),
            lerp(self.gradient_start.b, self.gradient_end.b),
        )
    }

    /// Cursor position in `[0, 1)`.
    pub fn gradient_position(&self) -> f32 {
        self.gradient_step as f32 / GRADIENT_STEPS as f32
    }

    pub fn reset_gradient(&mut self) {
        self.gradient_step = 0;
    }

    pub fn set_gradient_endpoints(&mut self, start: Rgb, end: Rgb) {
        self.gradient_start = start;
        self.gradient_end = end;
    }
}

/// Darken rule: first touch on an unpainted cell gives light gray, every
/// later touch removes [`DARKEN_STEP`] from each channel.
pub fn darken(old: CellColor) -> Rgb {
    match old {
        None => DARKEN_FIRST_TOUCH,
        Some(c) => c.darkened(DARKEN_STEP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn formats_as_css() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(c.to_string(), "rgb(1, 2, 3)");
        assert_eq!(c.to_hex(), "#010203");
    }

    #[test]
    fn eraser_always_unsets() {
        let mut engine = ColorEngine::with_seed(1);
        assert_eq!(engine.compute_color(PaintMode::Eraser, Rgb::BLACK, Some(Rgb::WHITE)), None);
        assert_eq!(engine.compute_color(PaintMode::Eraser, Rgb::BLACK, None), None);
    }

    #[test]
    fn normal_uses_solid_color() {
        let mut engine = ColorEngine::with_seed(1);
        let red = Rgb::new(255, 0, 0);
        assert_eq!(engine.compute_color(PaintMode::Normal, red, None), Some(red));
        assert_eq!(engine.compute_color(PaintMode::Normal, red, Some(Rgb::WHITE)), Some(red));
    }

    #[test]
    fn darken_sequence_clamps_at_zero() {
        assert_eq!(darken(None), Rgb::new(230, 230, 230));
        assert_eq!(darken(Some(Rgb::new(230, 230, 230))), Rgb::new(205, 205, 205));
        assert_eq!(darken(Some(Rgb::new(10, 10, 10))), Rgb::BLACK);
        assert_eq!(darken(Some(Rgb::new(100, 20, 0))), Rgb::new(75, 0, 0));
    }

    #[test]
    fn gradient_sweeps_and_wraps() {
        let mut engine = ColorEngine::with_seed(1);
        let first = engine.next_gradient_color();
        assert_eq!(first, Rgb::BLACK);
        assert!((engine.gradient_position() - 0.01).abs() < 1e-6);

        let second = engine.next_gradient_color();
        // floor(255 * 0.01) = 2
        assert_eq!(second, Rgb::new(2, 2, 2));

        for _ in 2..GRADIENT_STEPS {
            engine.next_gradient_color();
        }
        assert_eq!(engine.gradient_position(), 0.0);
        assert_eq!(engine.next_gradient_color(), first);
    }

    #[test]
    fn gradient_last_step_stays_below_end() {
        let mut engine = ColorEngine::with_seed(1);
        let mut last = Rgb::BLACK;
        for _ in 0..GRADIENT_STEPS {
            last = engine.next_gradient_color();
        }
        // floor(255 * 0.99) = 252
        assert_eq!(last, Rgb::new(252, 252, 252));
    }

    #[test]
    fn gradient_handles_descending_endpoints() {
        let mut engine = ColorEngine::with_seed(1);
        engine.set_gradient_endpoints(Rgb::WHITE, Rgb::BLACK);
        assert_eq!(engine.next_gradient_color(), Rgb::WHITE);
        // 255 + floor(-255 * 0.01) = 255 - 3
        assert_eq!(engine.next_gradient_color(), Rgb::new(252, 252, 252));
    }

    #[test]
    fn reset_gradient_rewinds_cursor() {
        let mut engine = ColorEngine::with_seed(1);
        for _ in 0..7 {
            engine.next_gradient_color();
        }
        engine.reset_gradient();
        assert_eq!(engine.gradient_position(), 0.0);
        assert_eq!(engine.next_gradient_color(), Rgb::BLACK);
    }

    #[test]
    fn rainbow_is_reproducible_with_seed() {
        let mut a = ColorEngine::with_seed(42);
        let mut b = ColorEngine::with_seed(42);
        for _ in 0..10 {
            assert_eq!(
                a.compute_color(PaintMode::Rainbow, Rgb::BLACK, None),
                b.compute_color(PaintMode::Rainbow, Rgb::BLACK, None)
            );
        }
    }

    #[test]
    fn only_gradient_moves_cursor() {
        let mut engine = ColorEngine::with_seed(3);
        engine.compute_color(PaintMode::Rainbow, Rgb::BLACK, None);
        engine.compute_color(PaintMode::Darken, Rgb::BLACK, None);
        engine.compute_color(PaintMode::Normal, Rgb::BLACK, None);
        engine.compute_color(PaintMode::Eraser, Rgb::BLACK, None);
        assert_eq!(engine.gradient_position(), 0.0);
        engine.compute_color(PaintMode::Gradient, Rgb::BLACK, None);
        assert!(engine.gradient_position() > 0.0);
    }
}
