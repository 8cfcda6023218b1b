use std::fmt;

use crate::components::colors::Rgb;

// ============================================================================
// PAINT MODE
// ============================================================================

/// The coloring behavior applied to every cell a stroke touches.
///
/// Exactly one mode is active at a time; `Normal` paints the picker color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PaintMode {
    #[default]
    Normal,
    Rainbow,
    Gradient,
    Darken,
    Eraser,
}

impl PaintMode {
    /// The special modes, in toolbar order.
    pub const SPECIAL: [PaintMode; 4] = [
        PaintMode::Rainbow,
        PaintMode::Gradient,
        PaintMode::Darken,
        PaintMode::Eraser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaintMode::Normal => "Normal",
            PaintMode::Rainbow => "Rainbow",
            PaintMode::Gradient => "Gradient",
            PaintMode::Darken => "Darken",
            PaintMode::Eraser => "Eraser",
        }
    }
}

impl fmt::Display for PaintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// MODE CONTROLLER
// ============================================================================

/// What a mode switch did, so the caller can react (e.g. rewind the gradient).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeChange {
    pub previous: PaintMode,
    pub current: PaintMode,
}

impl ModeChange {
    /// True when gradient mode was (re)activated by this change.
    pub fn entered_gradient(&self) -> bool {
        self.current == PaintMode::Gradient
    }
}

/// Tracks the active paint mode, the solid picker color, and the
/// draw-enabled switch (which is independent of the mode).
#[derive(Clone, Debug)]
pub struct ModeController {
    mode: PaintMode,
    solid_color: Rgb,
    draw_enabled: bool,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(Rgb::BLACK)
    }
}

impl ModeController {
    pub fn new(solid_color: Rgb) -> Self {
        Self {
            mode: PaintMode::Normal,
            solid_color,
            draw_enabled: true,
        }
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn is_active(&self, mode: PaintMode) -> bool {
        self.mode == mode
    }

    pub fn solid_color(&self) -> Rgb {
        self.solid_color
    }

    pub fn draw_enabled(&self) -> bool {
        self.draw_enabled
    }

    /// Activate `mode`, deactivating every other one.
    pub fn select(&mut self, mode: PaintMode) -> ModeChange {
        let previous = self.mode;
        self.mode = mode;
        ModeChange { previous, current: mode }
    }

    /// Toolbar button behavior: pressing the active mode's button switches
    /// back to `Normal`, pressing any other button activates that mode.
    pub fn toggle(&mut self, mode: PaintMode) -> ModeChange {
        if self.mode == mode {
            self.select(PaintMode::Normal)
        } else {
            self.select(mode)
        }
    }

    /// Picking a solid color always returns to `Normal`.
    pub fn choose_solid_color(&mut self, color: Rgb) -> ModeChange {
        self.solid_color = color;
        self.select(PaintMode::Normal)
    }

    pub fn toggle_draw(&mut self) -> bool {
        self.draw_enabled = !self.draw_enabled;
        self.draw_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_normal_with_drawing_enabled() {
        let modes = ModeController::default();
        assert_eq!(modes.mode(), PaintMode::Normal);
        assert!(modes.draw_enabled());
        assert_eq!(modes.solid_color(), Rgb::BLACK);
    }

    #[test]
    fn eraser_then_rainbow_leaves_only_rainbow() {
        let mut modes = ModeController::default();
        modes.toggle(PaintMode::Eraser);
        modes.toggle(PaintMode::Rainbow);
        assert_eq!(modes.mode(), PaintMode::Rainbow);
        assert!(!modes.is_active(PaintMode::Eraser));
    }

    #[test]
    fn toggling_active_mode_returns_to_normal() {
        let mut modes = ModeController::default();
        modes.toggle(PaintMode::Darken);
        let change = modes.toggle(PaintMode::Darken);
        assert_eq!(change.previous, PaintMode::Darken);
        assert_eq!(modes.mode(), PaintMode::Normal);
    }

    #[test]
    fn exclusion_holds_over_many_toggles() {
        let mut modes = ModeController::default();
        let sequence = [
            PaintMode::Gradient,
            PaintMode::Eraser,
            PaintMode::Eraser,
            PaintMode::Darken,
            PaintMode::Rainbow,
            PaintMode::Gradient,
        ];
        for m in sequence {
            modes.toggle(m);
        }
        let active: Vec<_> = PaintMode::SPECIAL
            .iter()
            .filter(|m| modes.is_active(**m))
            .collect();
        assert_eq!(active, vec![&PaintMode::Gradient]);
    }

    #[test]
    fn solid_color_clears_special_modes() {
        let mut modes = ModeController::default();
        modes.toggle(PaintMode::Rainbow);
        let red = Rgb::new(255, 0, 0);
        modes.choose_solid_color(red);
        assert_eq!(modes.mode(), PaintMode::Normal);
        assert_eq!(modes.solid_color(), red);
    }

    #[test]
    fn draw_toggle_is_independent_of_mode() {
        let mut modes = ModeController::default();
        modes.toggle(PaintMode::Eraser);
        assert!(!modes.toggle_draw());
        assert_eq!(modes.mode(), PaintMode::Eraser);
        assert!(modes.toggle_draw());
    }

    #[test]
    fn reports_gradient_entry() {
        let mut modes = ModeController::default();
        assert!(modes.toggle(PaintMode::Gradient).entered_gradient());
        assert!(!modes.toggle(PaintMode::Gradient).entered_gradient());
        assert!(modes.select(PaintMode::Gradient).entered_gradient());
    }
}
