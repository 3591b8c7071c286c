//! Grid items.

use crate::property::{Properties, Property};
use crate::Rect;

/// One grid item. Positions are 0-based track indices; the renderer
/// properties use 1-based grid lines.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Index of the item's renderer among the container's children.
    item: usize,
    column_start: usize,
    row_start: usize,
    column_span: usize,
    row_span: usize,
    column_fixed: bool,
    row_fixed: bool,
    /// Position and size relative to the container's content box.
    pub layout_area: Rect,
    /// Size of each spanned row, every entry after the first including the
    /// preceding row gap.
    pub row_sizes: Vec<f32>,
}

/// Start track, span and whether the start was given, for one axis.
fn resolve_lines(start: Option<i32>, end: Option<i32>, span: Option<i32>) -> (usize, usize, bool) {
    let start = start.filter(|line| *line >= 1);
    let end = end.filter(|line| *line >= 1);
    let span = span.filter(|span| *span >= 1).unwrap_or(1);

    match (start, end) {
        (Some(start), Some(end)) => {
            let (low, high) = if end < start { (end, start) } else { (start, end) };
            ((low - 1) as usize, ((high - low).max(1)) as usize, true)
        }
        (Some(start), None) => ((start - 1) as usize, span as usize, true),
        (None, Some(end)) => {
            let start = (end - span).max(1);
            ((start - 1) as usize, (end - start).max(1) as usize, true)
        }
        (None, None) => (0, span as usize, false),
    }
}

impl GridCell {
    /// An auto-placed 1x1 cell.
    pub fn new(item: usize) -> Self {
        Self {
            item,
            column_start: 0,
            row_start: 0,
            column_span: 1,
            row_span: 1,
            column_fixed: false,
            row_fixed: false,
            layout_area: Rect::zero(),
            row_sizes: Vec::new(),
        }
    }

    /// Build a cell from the grid placement properties of a renderer.
    pub fn from_properties(item: usize, properties: &Properties) -> Self {
        let (column_start, column_span, column_fixed) = resolve_lines(
            properties.integer(Property::GridColumnStart),
            properties.integer(Property::GridColumnEnd),
            properties.integer(Property::GridColumnSpan),
        );
        let (row_start, row_span, row_fixed) = resolve_lines(
            properties.integer(Property::GridRowStart),
            properties.integer(Property::GridRowEnd),
            properties.integer(Property::GridRowSpan),
        );
        Self {
            column_start,
            row_start,
            column_span,
            row_span,
            column_fixed,
            row_fixed,
            ..Self::new(item)
        }
    }

    /// Fix the column to the given 0-based track.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column_start = column;
        self.column_fixed = true;
        self
    }

    /// Fix the row to the given 0-based track.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row_start = row;
        self.row_fixed = true;
        self
    }

    pub fn with_spans(mut self, row_span: usize, column_span: usize) -> Self {
        self.row_span = row_span.max(1);
        self.column_span = column_span.max(1);
        self
    }

    pub fn item(&self) -> usize {
        self.item
    }

    pub fn column_start(&self) -> usize {
        self.column_start
    }

    pub fn row_start(&self) -> usize {
        self.row_start
    }

    pub fn column_span(&self) -> usize {
        self.column_span
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn column_end(&self) -> usize {
        self.column_start + self.column_span
    }

    pub fn row_end(&self) -> usize {
        self.row_start + self.row_span
    }

    pub fn is_column_fixed(&self) -> bool {
        self.column_fixed
    }

    pub fn is_row_fixed(&self) -> bool {
        self.row_fixed
    }

    /// Move an auto-placed cell during placement.
    pub(crate) fn set_position(&mut self, row: usize, column: usize) {
        self.row_start = row;
        self.column_start = column;
    }
}
