//! The grid matrix and item placement.

use std::collections::HashSet;

use tracing::trace;

use super::cell::GridCell;
use super::view::{Cursor, GridView};
use crate::property::GridFlow;
use crate::LayoutError;

/// Enumeration order of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOrder {
    RowMajor,
    ColumnMajor,
}

/// A matrix of placed cells.
///
/// Cells live in an arena; every matrix slot a cell covers holds the cell's
/// arena index.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<GridCell>,
    /// `matrix[row][column]`
    matrix: Vec<Vec<Option<usize>>>,
    columns: usize,
    flow: GridFlow,
    /// Track counts defined by the templates, kept even when unoccupied.
    min_width: usize,
    min_height: usize,
}

impl Grid {
    /// An empty grid with the explicit track counts of the templates.
    pub fn new(rows: usize, columns: usize, flow: GridFlow) -> Self {
        Self {
            cells: Vec::new(),
            matrix: vec![vec![None; columns]; rows],
            columns,
            flow,
            min_width: columns,
            min_height: rows,
        }
    }

    /// Build a grid and place `cells` in placement order: cells fixed on both
    /// axes, then column-fixed, then row-fixed, then automatic ones.
    pub fn with_cells(
        rows: usize,
        columns: usize,
        flow: GridFlow,
        cells: Vec<GridCell>,
    ) -> Result<Self, LayoutError> {
        let mut grid = Self::new(rows, columns, flow);
        let (both, rest): (Vec<_>, Vec<_>) = cells
            .into_iter()
            .partition(|c| c.is_row_fixed() && c.is_column_fixed());
        let (column_only, rest): (Vec<_>, Vec<_>) =
            rest.into_iter().partition(|c| c.is_column_fixed());
        let (row_only, auto): (Vec<_>, Vec<_>) = rest.into_iter().partition(|c| c.is_row_fixed());

        let mut cursor = Cursor::default();
        for cell in both.into_iter().chain(column_only).chain(row_only).chain(auto) {
            cursor = grid.add_cell(cell, cursor)?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn min_width(&self) -> usize {
        self.min_width
    }

    pub fn min_height(&self) -> usize {
        self.min_height
    }

    pub fn flow(&self) -> GridFlow {
        self.flow
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &GridCell {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut GridCell {
        &mut self.cells[index]
    }

    /// Arena index of the cell covering a slot.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<usize> {
        self.matrix.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Number of columns reached by any cell.
    pub fn occupied_columns(&self) -> usize {
        self.cells.iter().map(GridCell::column_end).max().unwrap_or(0)
    }

    /// Number of rows reached by any cell.
    pub fn occupied_rows(&self) -> usize {
        self.cells.iter().map(GridCell::row_end).max().unwrap_or(0)
    }

    /// Resize the matrix. Never shrinks below the extent of placed cells.
    pub fn resize(&mut self, rows: usize, columns: usize) {
        let rows = rows.max(self.occupied_rows());
        let columns = columns.max(self.occupied_columns());
        for row in &mut self.matrix {
            row.resize(columns, None);
        }
        self.matrix.resize(rows, vec![None; columns]);
        self.columns = columns;
    }

    fn ensure_size(&mut self, rows: usize, columns: usize) {
        if rows > self.rows() || columns > self.columns {
            self.resize(rows.max(self.rows()), columns.max(self.columns));
        }
    }

    /// Whether a `row_span x column_span` block at the position is free.
    /// Slots outside the matrix are free.
    fn is_free(&self, row: usize, column: usize, row_span: usize, column_span: usize) -> bool {
        (row..row + row_span)
            .all(|r| (column..column + column_span).all(|c| self.cell_at(r, c).is_none()))
    }

    fn write(&mut self, index: usize) {
        let cell = &self.cells[index];
        let (row, column) = (cell.row_start(), cell.column_start());
        let (row_end, column_end) = (cell.row_end(), cell.column_end());
        self.ensure_size(row_end, column_end);
        for r in row..row_end {
            for c in column..column_end {
                self.matrix[r][c] = Some(index);
            }
        }
    }

    /// Place a cell and return the cursor for the next automatic placement.
    pub fn add_cell(&mut self, mut cell: GridCell, cursor: Cursor) -> Result<Cursor, LayoutError> {
        let (row_span, column_span) = (cell.row_span(), cell.column_span());
        let mut next_cursor = cursor;

        match (cell.is_row_fixed(), cell.is_column_fixed()) {
            (true, true) => {
                for r in cell.row_start()..cell.row_end() {
                    for c in cell.column_start()..cell.column_end() {
                        if self.cell_at(r, c).is_some() {
                            return Err(LayoutError::OverlappingCells { row: r, column: c });
                        }
                    }
                }
            }
            (false, true) => {
                let column = cell.column_start();
                let found = GridView::column(column)
                    .find(|pos| self.is_free(pos.y, column, row_span, column_span));
                if let Some(pos) = found {
                    cell.set_position(pos.y, column);
                }
            }
            (true, false) => {
                let row = cell.row_start();
                let found = GridView::row(row)
                    .find(|pos| self.is_free(row, pos.x, row_span, column_span));
                if let Some(pos) = found {
                    cell.set_position(row, pos.x);
                }
            }
            (false, false) => {
                let (limit, span) = if self.flow.is_row() {
                    self.ensure_size(0, column_span);
                    (self.columns, column_span)
                } else {
                    self.ensure_size(row_span, 0);
                    (self.rows(), row_span)
                };
                let start = if self.flow.is_dense() {
                    Cursor::default()
                } else {
                    cursor
                };
                let found = GridView::auto(self.flow, start, limit, span)
                    .find(|pos| self.is_free(pos.y, pos.x, row_span, column_span));
                if let Some(pos) = found {
                    cell.set_position(pos.y, pos.x);
                    next_cursor = if self.flow.is_row() {
                        Cursor::new(pos.x + column_span, pos.y)
                    } else {
                        Cursor::new(pos.x, pos.y + row_span)
                    };
                }
            }
        }

        trace!(
            item = cell.item(),
            row = cell.row_start(),
            column = cell.column_start(),
            row_span,
            column_span,
            "grid cell placed"
        );
        self.cells.push(cell);
        self.write(self.cells.len() - 1);
        Ok(next_cursor)
    }

    /// Every placed cell once, in row-major or column-major slot order.
    pub fn unique_cells(&self, order: GridOrder) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut result = Vec::with_capacity(self.cells.len());
        let (outer, inner) = match order {
            GridOrder::RowMajor => (self.rows(), self.columns),
            GridOrder::ColumnMajor => (self.columns, self.rows()),
        };
        for a in 0..outer {
            for b in 0..inner {
                let slot = match order {
                    GridOrder::RowMajor => self.cell_at(a, b),
                    GridOrder::ColumnMajor => self.cell_at(b, a),
                };
                if let Some(index) = slot {
                    if seen.insert(index) {
                        result.push(index);
                    }
                }
            }
        }
        result
    }

    /// Closest cell to the left of a cell, see [`Grid::closest_top_neighbor`].
    pub fn closest_left_neighbor(&self, index: usize) -> Option<usize> {
        let cell = &self.cells[index];
        let rows = cell.row_start()..cell.row_end();
        (0..cell.column_start()).rev().find_map(|c| {
            let candidates = rows.clone().filter_map(|r| self.cell_at(r, c));
            self.pick_neighbor(index, candidates, |n| n.row_start() >= cell.row_start())
        })
    }

    /// Closest cell above a cell.
    ///
    /// Rows are scanned upward from the cell's top edge. In the first row that
    /// holds any candidate, a cell starting at or after the target's column
    /// wins over a wider cell that only crosses the scan line. Ties go to the
    /// first candidate in scan order.
    pub fn closest_top_neighbor(&self, index: usize) -> Option<usize> {
        let cell = &self.cells[index];
        let columns = cell.column_start()..cell.column_end();
        (0..cell.row_start()).rev().find_map(|r| {
            let candidates = columns.clone().filter_map(|c| self.cell_at(r, c));
            self.pick_neighbor(index, candidates, |n| n.column_start() >= cell.column_start())
        })
    }

    fn pick_neighbor(
        &self,
        target: usize,
        candidates: impl Iterator<Item = usize>,
        is_exact: impl Fn(&GridCell) -> bool,
    ) -> Option<usize> {
        let mut crossing = None;
        for candidate in candidates.filter(|c| *c != target) {
            if is_exact(&self.cells[candidate]) {
                return Some(candidate);
            }
            crossing.get_or_insert(candidate);
        }
        crossing
    }
}
