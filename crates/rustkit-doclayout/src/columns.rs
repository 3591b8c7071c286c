//! Column geometry and the column-by-column layout pass shared by the
//! multi-column containers.

use tracing::trace;

use crate::property::{Properties, Property};
use crate::renderer::{LayoutContext, LayoutStatus, Renderer, RendererId};
use crate::{LayoutError, Rect};

/// Column count and width for the available width.
///
/// - width only: `count = max(1, floor((available + gap) / (width + gap)))`
/// - count only: that count
/// - both: the smaller of the two counts
/// - neither: one column
///
/// The column width is `max(0, (available + gap) / count - gap)`.
pub fn calculate_column_count_and_width(
    available: f32,
    column_count: Option<i32>,
    column_width: Option<f32>,
    gap: f32,
) -> Result<(u32, f32), LayoutError> {
    if gap < 0.0 {
        return Err(LayoutError::InvalidConfiguration(format!(
            "negative column gap {gap}"
        )));
    }
    if let Some(count) = column_count.filter(|count| *count <= 0) {
        return Err(LayoutError::InvalidConfiguration(format!(
            "column count must be positive, got {count}"
        )));
    }
    if let Some(width) = column_width.filter(|width| *width < 0.0) {
        return Err(LayoutError::InvalidConfiguration(format!(
            "negative column width {width}"
        )));
    }

    let from_width = column_width.map(|width| {
        let fitting = ((available + gap) / (width + gap)).floor();
        if fitting.is_finite() && fitting >= 1.0 {
            fitting as u32
        } else {
            1
        }
    });
    let count = match (column_count.map(|c| c as u32), from_width) {
        (Some(count), Some(fitting)) => count.min(fitting),
        (Some(count), None) => count,
        (None, Some(fitting)) => fitting,
        (None, None) => 1,
    };
    let width = ((available + gap) / count as f32 - gap).max(0.0);
    Ok((count, width))
}

/// Column layout parameters of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColumnGeometry {
    pub count: u32,
    pub width: f32,
    pub gap: f32,
}

impl ColumnGeometry {
    pub fn from_properties(properties: &Properties, available: f32) -> Result<Self, LayoutError> {
        let gap = properties.number(Property::ColumnGap).unwrap_or(0.0);
        let (count, width) = calculate_column_count_and_width(
            available,
            properties.integer(Property::ColumnCount),
            properties.number(Property::ColumnWidth),
            gap,
        )?;
        Ok(Self { count, width, gap })
    }

    /// Area of the column at `index` inside `content`.
    pub fn column_area(&self, content: Rect, index: u32, height: f32) -> Rect {
        Rect::new(
            content.x + index as f32 * (self.width + self.gap),
            content.y,
            self.width,
            height,
        )
    }
}

/// Outcome of one pass over all columns.
#[derive(Debug, Default)]
pub struct MulticolLayoutResult {
    /// Laid-out parts, one per filled column.
    pub split_renderers: Vec<Box<dyn Renderer>>,
    /// Content left over after the last column.
    pub overflow_renderer: Option<Box<dyn Renderer>>,
    /// Renderer that could not be placed in a column at all.
    pub cause_of_nothing: Option<RendererId>,
}

/// Lay a fresh copy of `content` out column after column at the given height.
/// Whatever overflows one column is the input of the next.
pub(crate) fn layout_in_columns(
    content: &dyn Renderer,
    context: &LayoutContext,
    area: Rect,
    geometry: ColumnGeometry,
    height: f32,
) -> Result<MulticolLayoutResult, LayoutError> {
    let mut result = MulticolLayoutResult::default();
    let mut current = Some(content.clone_renderer());

    for index in 0..geometry.count {
        let Some(mut renderer) = current.take() else {
            break;
        };
        let bbox = geometry.column_area(area, index, height);
        let layout = renderer.layout(&context.with_bbox(bbox))?;
        match layout.status {
            LayoutStatus::Full => result.split_renderers.push(renderer),
            LayoutStatus::Partial => {
                result.split_renderers.extend(layout.split_renderer);
                current = layout.overflow_renderer;
            }
            LayoutStatus::Nothing => {
                result.cause_of_nothing = layout.cause_of_nothing;
                current = Some(layout.overflow_renderer.unwrap_or(renderer));
                break;
            }
        }
    }

    trace!(
        height,
        columns = result.split_renderers.len(),
        overflow = current.is_some(),
        "columns laid out"
    );
    result.overflow_renderer = current;
    Ok(result)
}
