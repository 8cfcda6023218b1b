use std::collections::VecDeque;

use crate::canvas::{CellGrid, CellId};
use crate::components::colors::CellColor;
use crate::log_warn;

// ============================================================================
// ACTION
// ============================================================================

/// A reversible edit: the cell and the color it should get back.
///
/// On the undo stack `color` is the color before the paint; on the redo stack
/// it is the color the undo removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub cell: CellId,
    pub color: CellColor,
}

/// A color change made by [`HistoryLog::undo`] or [`HistoryLog::redo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Applied {
    pub cell: CellId,
    pub color: CellColor,
}

// ============================================================================
// HISTORY LOG
// ============================================================================

/// Undo and redo stacks of single-cell color edits.
pub struct HistoryLog {
    undo_stack: VecDeque<Action>,
    redo_stack: VecDeque<Action>,
    /// `None` keeps every edit.
    max_history_size: Option<usize>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HistoryLog {
    pub fn new(max_history_size: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_history_size,
        }
    }

    /// Record a paint that changed `cell` away from `old_color`.
    ///
    /// Callers only record real changes. Any new edit invalidates the redo stack.
    pub fn record(&mut self, cell: CellId, old_color: CellColor) {
        self.redo_stack.clear();
        self.undo_stack.push_back(Action {
            cell,
            color: old_color,
        });
        self.prune();
    }

    /// Restore the most recent edit. Returns `None` when there is nothing
    /// (live) to undo.
    pub fn undo(&mut self, grid: &mut CellGrid) -> Option<Applied> {
        let applied = Self::transfer(&mut self.undo_stack, &mut self.redo_stack, grid);
        self.prune();
        applied
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, grid: &mut CellGrid) -> Option<Applied> {
        let applied = Self::transfer(&mut self.redo_stack, &mut self.undo_stack, grid);
        self.prune();
        applied
    }

    /// Pop from `from`, remember the cell's present color on `to`, then put
    /// the popped color back on the cell.
    fn transfer(
        from: &mut VecDeque<Action>,
        to: &mut VecDeque<Action>,
        grid: &mut CellGrid,
    ) -> Option<Applied> {
        while let Some(action) = from.pop_back() {
            let Some(current) = grid.color(action.cell) else {
                log_warn!(
                    "history: dropping entry for cell {} of discarded grid generation {}",
                    action.cell.index,
                    action.cell.generation
                );
                continue;
            };
            to.push_back(Action {
                cell: action.cell,
                color: current,
            });
            grid.set_color(action.cell, action.color);
            return Some(Applied {
                cell: action.cell,
                color: action.color,
            });
        }
        None
    }

    fn prune(&mut self) {
        if let Some(max) = self.max_history_size {
            while self.undo_stack.len() > max {
                self.undo_stack.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Shape;
    use crate::components::colors::Rgb;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn paint(grid: &mut CellGrid, history: &mut HistoryLog, cell: CellId, color: CellColor) {
        let old = grid.color(cell).unwrap();
        if old != color {
            history.record(cell, old);
            grid.set_color(cell, color);
        }
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut grid = CellGrid::new(2, Shape::Square);
        let mut history = HistoryLog::default();
        assert_eq!(history.undo(&mut grid), None);
        assert_eq!(history.redo(&mut grid), None);
        assert!(grid.is_blank());
    }

    #[test]
    fn undo_restores_previous_color_and_redo_reapplies() {
        let mut grid = CellGrid::new(2, Shape::Square);
        let mut history = HistoryLog::default();
        let cell = grid.cell_id(0).unwrap();

        paint(&mut grid, &mut history, cell, Some(RED));
        paint(&mut grid, &mut history, cell, Some(BLUE));

        let undone = history.undo(&mut grid).unwrap();
        assert_eq!(undone.color, Some(RED));
        assert_eq!(grid.color(cell), Some(Some(RED)));
        assert!(history.can_redo());

        let redone = history.redo(&mut grid).unwrap();
        assert_eq!(redone.color, Some(BLUE));
        assert_eq!(grid.color(cell), Some(Some(BLUE)));
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn undo_all_returns_to_blank() {
        let mut grid = CellGrid::new(3, Shape::Square);
        let mut history = HistoryLog::default();
        for i in 0..9 {
            let cell = grid.cell_id(i).unwrap();
            paint(&mut grid, &mut history, cell, Some(RED));
        }
        let cell = grid.cell_id(4).unwrap();
        paint(&mut grid, &mut history, cell, None);

        while history.undo(&mut grid).is_some() {}
        assert!(grid.is_blank());
        assert_eq!(history.redo_count(), 10);
    }

    #[test]
    fn new_record_clears_redo() {
        let mut grid = CellGrid::new(2, Shape::Square);
        let mut history = HistoryLog::default();
        let a = grid.cell_id(0).unwrap();
        let b = grid.cell_id(1).unwrap();

        paint(&mut grid, &mut history, a, Some(RED));
        paint(&mut grid, &mut history, a, Some(BLUE));
        history.undo(&mut grid);
        history.undo(&mut grid);
        assert_eq!(history.redo_count(), 2);

        paint(&mut grid, &mut history, b, Some(RED));
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut grid), None);
    }

    #[test]
    fn capacity_drops_oldest_entries() {
        let mut grid = CellGrid::new(4, Shape::Square);
        let mut history = HistoryLog::new(Some(3));
        for i in 0..5 {
            let cell = grid.cell_id(i).unwrap();
            paint(&mut grid, &mut history, cell, Some(RED));
        }
        assert_eq!(history.undo_count(), 3);
        while history.undo(&mut grid).is_some() {}
        // The two oldest paints can no longer be undone.
        assert_eq!(grid.painted_count(), 2);
    }

    #[test]
    fn stale_entries_are_skipped() {
        let mut grid = CellGrid::new(2, Shape::Square);
        let mut history = HistoryLog::default();
        let old_cell = grid.cell_id(0).unwrap();
        paint(&mut grid, &mut history, old_cell, Some(RED));

        grid.regenerate(2, Shape::Square);
        let new_cell = grid.cell_id(1).unwrap();
        paint(&mut grid, &mut history, new_cell, Some(BLUE));

        assert_eq!(history.undo(&mut grid).map(|a| a.cell), Some(new_cell));
        assert_eq!(history.undo(&mut grid), None);
        assert!(!history.can_undo());
        assert!(grid.is_blank());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut grid = CellGrid::new(2, Shape::Square);
        let mut history = HistoryLog::default();
        let cell = grid.cell_id(0).unwrap();
        paint(&mut grid, &mut history, cell, Some(RED));
        paint(&mut grid, &mut history, cell, Some(BLUE));
        history.undo(&mut grid);

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
