use crate::canvas::{CellGrid, CellId, GridError, Shape, parse_grid_size, validate_grid_size};
use crate::components::colors::{CellColor, ColorEngine, Rgb};
use crate::components::history::HistoryLog;
use crate::components::tools::{ModeController, PaintMode};
use crate::{log_info, log_warn};

// ============================================================================
// EVENTS & EFFECTS
// ============================================================================

/// Primitive input coming from the rendering/input layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    CellDragStart(CellId),
    CellEntered(CellId),
    CellDragEnd,
    ModeToggled(PaintMode),
    SolidColorChosen(Rgb),
    DrawToggled,
    ShapeChanged(Shape),
    /// Raw text from the size field; validated here.
    GridResizeRequested(String),
    ResetRequested,
    UndoRequested,
    RedoRequested,
}

/// What the rendering layer has to show as a result of an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ApplyColor { cell: CellId, color: CellColor },
    RegenerateGrid { size: usize, shape: Shape },
    InvalidInput(String),
}

// ============================================================================
// PAINT SESSION
// ============================================================================

/// The in-memory drawing state and the rules that change it.
///
/// Every handler runs to completion and reports its visible outcome as a list
/// of [`Effect`]s; empty means nothing changed.
pub struct PaintSession {
    grid: CellGrid,
    modes: ModeController,
    engine: ColorEngine,
    history: HistoryLog,
    dragging: bool,
}

/// Starting configuration for a [`PaintSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub grid_size: usize,
    pub shape: Shape,
    pub solid_color: Rgb,
    /// `None` for unlimited undo.
    pub max_undo_steps: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: crate::canvas::DEFAULT_GRID_SIZE,
            shape: Shape::Square,
            solid_color: Rgb::BLACK,
            max_undo_steps: None,
        }
    }
}

impl Default for PaintSession {
    fn default() -> Self {
        Self::new(SessionConfig::default(), ColorEngine::new())
    }
}

impl PaintSession {
    /// Build a session. An out-of-range size in `config` falls back to the default.
    pub fn new(config: SessionConfig, engine: ColorEngine) -> Self {
        let size = validate_grid_size(config.grid_size).unwrap_or_else(|e| {
            log_warn!("session: {}, using {}", e, crate::canvas::DEFAULT_GRID_SIZE);
            crate::canvas::DEFAULT_GRID_SIZE
        });
        Self {
            grid: CellGrid::new(size, config.shape),
            modes: ModeController::new(config.solid_color),
            engine,
            history: HistoryLog::new(config.max_undo_steps),
            dragging: false,
        }
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn engine(&self) -> &ColorEngine {
        &self.engine
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::CellDragStart(cell) => self.drag_start(cell),
            SessionEvent::CellEntered(cell) => self.cell_entered(cell),
            SessionEvent::CellDragEnd => {
                self.drag_end();
                Vec::new()
            }
            SessionEvent::ModeToggled(mode) => {
                self.toggle_mode(mode);
                Vec::new()
            }
            SessionEvent::SolidColorChosen(color) => {
                self.choose_solid_color(color);
                Vec::new()
            }
            SessionEvent::DrawToggled => {
                self.toggle_draw();
                Vec::new()
            }
            SessionEvent::ShapeChanged(shape) => self.set_shape(shape),
            SessionEvent::GridResizeRequested(input) => match self.resize(&input) {
                Ok(effects) => effects,
                Err(e) => vec![Effect::InvalidInput(e.user_message())],
            },
            SessionEvent::ResetRequested => self.reset(),
            SessionEvent::UndoRequested => self.undo().into_iter().collect(),
            SessionEvent::RedoRequested => self.redo().into_iter().collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------------

    pub fn drag_start(&mut self, cell: CellId) -> Vec<Effect> {
        self.dragging = true;
        self.cell_entered(cell)
    }

    /// Paint `cell` if a stroke is in progress and drawing is enabled.
    pub fn cell_entered(&mut self, cell: CellId) -> Vec<Effect> {
        if !self.dragging || !self.modes.draw_enabled() {
            return Vec::new();
        }
        self.paint(cell).into_iter().collect()
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
    }

    fn paint(&mut self, cell: CellId) -> Option<Effect> {
        let old = self.grid.color(cell)?;
        let new = self
            .engine
            .compute_color(self.modes.mode(), self.modes.solid_color(), old);
        if new == old {
            return None;
        }
        self.history.record(cell, old);
        self.grid.set_color(cell, new);
        Some(Effect::ApplyColor { cell, color: new })
    }

    // ------------------------------------------------------------------------
    // Modes
    // ------------------------------------------------------------------------

    pub fn toggle_mode(&mut self, mode: PaintMode) {
        let change = self.modes.toggle(mode);
        if change.entered_gradient() {
            self.engine.reset_gradient();
        }
    }

    pub fn choose_solid_color(&mut self, color: Rgb) {
        self.modes.choose_solid_color(color);
    }

    pub fn toggle_draw(&mut self) -> bool {
        self.modes.toggle_draw()
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn undo(&mut self) -> Option<Effect> {
        self.history
            .undo(&mut self.grid)
            .map(|a| Effect::ApplyColor { cell: a.cell, color: a.color })
    }

    pub fn redo(&mut self) -> Option<Effect> {
        self.history
            .redo(&mut self.grid)
            .map(|a| Effect::ApplyColor { cell: a.cell, color: a.color })
    }

    // ------------------------------------------------------------------------
    // Grid
    // ------------------------------------------------------------------------

    /// Validate `input` and regenerate an N×N blank grid. On error nothing changes.
    pub fn resize(&mut self, input: &str) -> Result<Vec<Effect>, GridError> {
        let size = parse_grid_size(input).inspect_err(|e| log_warn!("session: {}", e))?;
        Ok(self.regenerate(size, self.grid.shape()))
    }

    pub fn set_shape(&mut self, shape: Shape) -> Vec<Effect> {
        self.regenerate(self.grid.size(), shape)
    }

    /// Blank grid at the current size and shape, with empty history.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.regenerate(self.grid.size(), self.grid.shape())
    }

    fn regenerate(&mut self, size: usize, shape: Shape) -> Vec<Effect> {
        self.grid.regenerate(size, shape);
        // Old cell ids no longer exist, so their history entries are meaningless.
        self.history.clear();
        self.dragging = false;
        log_info!("grid regenerated: {}x{} {}", size, size, shape);
        vec![Effect::RegenerateGrid { size, shape }]
    }
}
