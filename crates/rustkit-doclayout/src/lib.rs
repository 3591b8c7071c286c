//! # RustKit Document Layout
//!
//! Paged layout for RustKit documents. Given a tree of renderers and a page
//! area, containers compute concrete rectangles for every child, split content
//! that does not fit and hand the remainder on as an overflow renderer.
//!
//! ## Design Goals
//!
//! 1. **Grid layout**: template resolution with `repeat()`, sparse/dense
//!    auto-placement and intrinsic/flexible track sizing
//! 2. **Page splitting**: grid items that only partially fit are re-placed on
//!    the next page with consistent row numbering
//! 3. **Column balancing**: multicol and column containers choose a column
//!    height iteratively within a bounded relayout budget
//! 4. **Explicit ownership**: grid cells live in an arena and the matrix holds
//!    indices, overflow renderers are fresh copies rather than shared graphs

pub mod column_container;
pub mod columns;
pub mod config;
pub mod flex;
pub mod flow;
pub mod grid;
pub mod multicol;
pub mod property;
pub mod renderer;

pub use column_container::ColumnContainerRenderer;
pub use columns::{calculate_column_count_and_width, MulticolLayoutResult};
pub use config::LayoutConfig;
pub use flex::{
    BottomToTopDirector, FlexItemMainDirector, FlexJustify, LeftToRightDirector,
    RightToLeftDirector, TopToBottomDirector,
};
pub use flow::{BlockRenderer, LineRenderer};
pub use grid::{
    AutoRepeatMode, Cursor, Grid, GridCell, GridContainerRenderer, GridOrder, GridSizer,
    GridSizingResult, GridTemplateResolver, GridValue, GridView, TrackContribution, TrackSizer,
    TrackSizes,
};
pub use multicol::MulticolRenderer;
pub use property::{GridFlow, Properties, Property, PropertyValue, UnitValue};
pub use renderer::{
    LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer, RendererId,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in layout.
///
/// Every variant is a configuration error: layout stops and the error
/// propagates to whoever started the layout pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Grid cells overlap at row {row}, column {column}")]
    OverlappingCells { row: usize, column: usize },

    #[error("Invalid child renderers: {0}")]
    InvalidChildren(String),
}

/// A 2D rectangle. The origin is the top-left corner and y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Translate the rectangle in place.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Shrink the rectangle by the given edges (`reverse == false`) or grow it
    /// back out (`reverse == true`).
    pub fn apply_edges(&mut self, edges: &EdgeSizes, reverse: bool) {
        let sign = if reverse { -1.0 } else { 1.0 };
        self.x += sign * edges.left;
        self.y += sign * edges.top;
        self.width -= sign * edges.horizontal();
        self.height -= sign * edges.vertical();
    }
}

/// Edge sizes (margin, padding, border).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Margin, border and padding of a renderer, read from its properties.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSpacing {
    pub margin: EdgeSizes,
    pub border: EdgeSizes,
    pub padding: EdgeSizes,
}

impl BoxSpacing {
    /// Read the spacing edges of a property set.
    pub fn from_properties(properties: &Properties) -> Self {
        use Property::*;
        let edges = |top, right, bottom, left| {
            EdgeSizes::new(
                properties.number(top).unwrap_or(0.0),
                properties.number(right).unwrap_or(0.0),
                properties.number(bottom).unwrap_or(0.0),
                properties.number(left).unwrap_or(0.0),
            )
        };
        Self {
            margin: edges(MarginTop, MarginRight, MarginBottom, MarginLeft),
            border: edges(BorderTop, BorderRight, BorderBottom, BorderLeft),
            padding: edges(PaddingTop, PaddingRight, PaddingBottom, PaddingLeft),
        }
    }

    pub fn top(&self) -> f32 {
        self.margin.top + self.border.top + self.padding.top
    }

    pub fn bottom(&self) -> f32 {
        self.margin.bottom + self.border.bottom + self.padding.bottom
    }

    pub fn left(&self) -> f32 {
        self.margin.left + self.border.left + self.padding.left
    }

    pub fn right(&self) -> f32 {
        self.margin.right + self.border.right + self.padding.right
    }

    pub fn horizontal(&self) -> f32 {
        self.left() + self.right()
    }

    /// Shrink an outer area down to the content box.
    pub fn content_box(&self, outer: Rect) -> Rect {
        let mut rect = outer;
        rect.apply_edges(&self.margin, false);
        rect.apply_edges(&self.border, false);
        rect.apply_edges(&self.padding, false);
        rect
    }
}
