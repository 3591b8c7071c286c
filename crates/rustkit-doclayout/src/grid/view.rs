//! Placement cursor and the scan order of candidate positions.

use crate::property::GridFlow;

/// A matrix position: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restriction {
    None,
    /// Scan rows inside a fixed column.
    Column(usize),
    /// Scan columns inside a fixed row.
    Row(usize),
}

/// An endless iterator over candidate start positions for one cell.
///
/// Unrestricted views walk the matrix in the flow's major order, wrapping so
/// that the cell's span never crosses the cross-axis size. Positions past the
/// current matrix are free, so a scan always ends once the matrix runs out.
#[derive(Debug, Clone)]
pub struct GridView {
    flow: GridFlow,
    restriction: Restriction,
    /// Number of positions along the wrapping axis.
    limit: usize,
    /// Span of the cell along the wrapping axis.
    span: usize,
    next: Cursor,
}

impl GridView {
    /// Rows of a fixed column, top to bottom.
    pub fn column(column: usize) -> Self {
        Self {
            flow: GridFlow::Column,
            restriction: Restriction::Column(column),
            limit: usize::MAX,
            span: 1,
            next: Cursor::new(column, 0),
        }
    }

    /// Columns of a fixed row, left to right.
    pub fn row(row: usize) -> Self {
        Self {
            flow: GridFlow::Row,
            restriction: Restriction::Row(row),
            limit: usize::MAX,
            span: 1,
            next: Cursor::new(0, row),
        }
    }

    /// Auto-placement scan starting at `start`. For row flow `limit` is the
    /// column count and `span` the cell's column span; column flow swaps axes.
    pub fn auto(flow: GridFlow, start: Cursor, limit: usize, span: usize) -> Self {
        let mut view = Self {
            flow,
            restriction: Restriction::None,
            limit: limit.max(span),
            span,
            next: start,
        };
        if view.major(start) + span > view.limit {
            view.next = view.wrap(start);
        }
        view
    }

    fn major(&self, cursor: Cursor) -> usize {
        if self.flow.is_row() {
            cursor.x
        } else {
            cursor.y
        }
    }

    /// First position of the next line.
    fn wrap(&self, cursor: Cursor) -> Cursor {
        if self.flow.is_row() {
            Cursor::new(0, cursor.y + 1)
        } else {
            Cursor::new(cursor.x + 1, 0)
        }
    }

    fn advance(&self, cursor: Cursor) -> Cursor {
        match self.restriction {
            Restriction::Column(_) => Cursor::new(cursor.x, cursor.y + 1),
            Restriction::Row(_) => Cursor::new(cursor.x + 1, cursor.y),
            Restriction::None => {
                if self.major(cursor) + 1 + self.span > self.limit {
                    self.wrap(cursor)
                } else if self.flow.is_row() {
                    Cursor::new(cursor.x + 1, cursor.y)
                } else {
                    Cursor::new(cursor.x, cursor.y + 1)
                }
            }
        }
    }
}

impl Iterator for GridView {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        let current = self.next;
        self.next = self.advance(current);
        Some(current)
    }
}
