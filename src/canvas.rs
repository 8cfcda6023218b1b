use eframe::egui;
use egui::{Pos2, Rect, Vec2};
use std::fmt;
use std::str::FromStr;

use crate::components::colors::CellColor;

pub const MIN_GRID_SIZE: usize = 1;
pub const MAX_GRID_SIZE: usize = 100;
pub const DEFAULT_GRID_SIZE: usize = 16;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Grid size that is non-numeric or outside `1..=100`.
    InvalidSize(String),
    UnknownShape(String),
}

impl GridError {
    /// Text shown to the user in the blocking notice.
    pub fn user_message(&self) -> String {
        match self {
            GridError::InvalidSize(_) => "Please enter a valid number between 1 and 100.".to_string(),
            GridError::UnknownShape(name) => format!("Unknown cell shape '{}'.", name),
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidSize(input) => write!(
                f,
                "invalid grid size '{}': expected an integer between {} and {}",
                input, MIN_GRID_SIZE, MAX_GRID_SIZE
            ),
            GridError::UnknownShape(name) => write!(
                f,
                "unknown shape '{}': expected square, circle, triangle or diamond",
                name
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Parse a user-typed grid size. Surrounding whitespace is ignored.
pub fn parse_grid_size(input: &str) -> Result<usize, GridError> {
    let size = input
        .trim()
        .parse::<usize>()
        .map_err(|_| GridError::InvalidSize(input.to_string()))?;
    validate_grid_size(size).map_err(|_| GridError::InvalidSize(input.to_string()))
}

pub fn validate_grid_size(size: usize) -> Result<usize, GridError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(GridError::InvalidSize(size.to_string()))
    }
}

// ============================================================================
// SHAPE
// ============================================================================

/// How each cell is drawn inside its square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    Square,
    Circle,
    Triangle,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Square, Shape::Circle, Shape::Triangle, Shape::Diamond];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Diamond => "diamond",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::Square => "Square",
            Shape::Circle => "Circle",
            Shape::Triangle => "Triangle",
            Shape::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GridError::UnknownShape(s.to_string()))
    }
}

// ============================================================================
// CELL GRID
// ============================================================================

/// Identity of one cell. The generation changes every time the grid is
/// regenerated, so ids handed out before a resize never match a new cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub generation: u64,
    pub index: usize,
}

/// The N×N cell matrix in row-major order.
#[derive(Clone, Debug)]
pub struct CellGrid {
    size: usize,
    shape: Shape,
    generation: u64,
    cells: Vec<CellColor>,
}

impl Default for CellGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, Shape::Square)
    }
}

impl CellGrid {
    /// Callers are expected to pass a validated size; see [`validate_grid_size`].
    pub fn new(size: usize, shape: Shape) -> Self {
        Self {
            size,
            shape,
            generation: 0,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Replace every cell with a fresh unpainted one.
    pub fn regenerate(&mut self, size: usize, shape: Shape) {
        self.size = size;
        self.shape = shape;
        self.generation += 1;
        self.cells = vec![None; size * size];
    }

    pub fn cell_id(&self, index: usize) -> Option<CellId> {
        (index < self.cells.len()).then_some(CellId {
            generation: self.generation,
            index,
        })
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellId> {
        if row < self.size && col < self.size {
            self.cell_id(row * self.size + col)
        } else {
            None
        }
    }

    pub fn contains(&self, id: CellId) -> bool {
        id.generation == self.generation && id.index < self.cells.len()
    }

    /// Current color of a live cell; `None` if the id is stale.
    pub fn color(&self, id: CellId) -> Option<CellColor> {
        if self.contains(id) {
            Some(self.cells[id.index])
        } else {
            None
        }
    }

    /// Set a live cell's color. Returns false for a stale id.
    pub fn set_color(&mut self, id: CellId, color: CellColor) -> bool {
        if self.contains(id) {
            self.cells[id.index] = color;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, CellColor)> + '_ {
        let generation = self.generation;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, color)| (CellId { generation, index }, *color))
    }

    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Screen placement of the grid: square cells sized to fit the viewport,
/// grid centered. Recomputed whenever the viewport changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub origin: Pos2,
    pub cell_size: f32,
    pub size: usize,
}

impl GridLayout {
    pub fn fit(viewport: Rect, size: usize) -> Self {
        let size = size.max(1);
        let cell_size = (viewport.width().min(viewport.height()) / size as f32).max(0.0);
        let extent = cell_size * size as f32;
        let origin = viewport.center() - Vec2::splat(extent / 2.0);
        Self {
            origin,
            cell_size,
            size,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.origin, Vec2::splat(self.cell_size * self.size as f32))
    }

    /// Index of the cell whose bounding square contains `pos`.
    pub fn cell_at(&self, pos: Pos2) -> Option<usize> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = pos - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let col = (local.x / self.cell_size) as usize;
        let row = (local.y / self.cell_size) as usize;
        if col < self.size && row < self.size {
            Some(row * self.size + col)
        } else {
            None
        }
    }

    pub fn cell_rect(&self, index: usize) -> Rect {
        let row = index / self.size;
        let col = index % self.size;
        let min = self.origin + Vec2::new(col as f32, row as f32) * self.cell_size;
        Rect::from_min_size(min, Vec2::splat(self.cell_size))
    }
}
