//! PixelGrid: a cell-grid drawing canvas with undo/redo and several
//! coloring modes.
//!
//! The drawing rules live in [`session::PaintSession`] and have no
//! dependency on the GUI; [`app::PixelGridApp`] is the egui front end that
//! turns pointer input into session events and paints the grid.

pub mod logger;

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod session;
pub mod settings;

pub use canvas::{CellGrid, CellId, GridError, GridLayout, Shape};
pub use components::colors::{CellColor, ColorEngine, Rgb};
pub use components::history::HistoryLog;
pub use components::tools::{ModeController, PaintMode};
pub use session::{Effect, PaintSession, SessionConfig, SessionEvent};
