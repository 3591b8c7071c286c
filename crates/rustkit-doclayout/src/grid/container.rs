//! Grid container: placement, sizing, per-cell layout and page splitting.

use tracing::{debug, trace};

use super::cell::GridCell;
use super::matrix::{Grid, GridOrder};
use super::sizer::{AxisTemplate, GridSizer};
use super::template::GridTemplateResolver;
use super::track_sizer::{TrackContribution, TrackSizer};
use super::value::GridValue;
use crate::property::{Properties, Property, PropertyValue};
use crate::renderer::{
    clone_all, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer,
    RendererId,
};
use crate::{BoxSpacing, LayoutError, Rect};

/// A grid container.
///
/// Every layout builds a fresh [`Grid`] from the children's placement
/// properties. Items that do not fit continue in an overflow container whose
/// row lines are renumbered so the first unfinished row becomes row 1.
#[derive(Debug)]
pub struct GridContainerRenderer {
    id: RendererId,
    properties: Properties,
    children: Vec<Box<dyn Renderer>>,
    occupied: Option<LayoutArea>,
}

/// First row, at or after the cell's start, that the split content did not
/// complete.
fn split_row(cell: &GridCell, split_height: f32, epsilon: f32) -> usize {
    let mut accumulated = 0.0;
    let mut row = cell.row_start();
    for size in &cell.row_sizes {
        accumulated += size;
        if accumulated > split_height + epsilon {
            break;
        }
        row += 1;
    }
    row
}

/// Pin an overflow item to its cell's columns and to the rows from
/// `row_start` on. When no row is left to continue in, the row lines are
/// cleared and the item falls back to automatic placement on the next page.
fn pin_to_cell(renderer: &mut dyn Renderer, cell: &GridCell, row_start: usize) {
    renderer.properties_mut().remove(Property::FillAvailableArea);
    renderer.set_property(
        Property::GridColumnStart,
        PropertyValue::Integer(cell.column_start() as i32 + 1),
    );
    renderer.set_property(
        Property::GridColumnEnd,
        PropertyValue::Integer(cell.column_end() as i32 + 1),
    );
    if cell.row_end() > row_start {
        renderer.set_property(Property::GridRowStart, PropertyValue::Integer(row_start as i32 + 1));
        renderer.set_property(
            Property::GridRowEnd,
            PropertyValue::Integer(cell.row_end() as i32 + 1),
        );
    } else {
        renderer.properties_mut().remove(Property::GridRowStart);
        renderer.properties_mut().remove(Property::GridRowEnd);
    }
}

/// Move pinned row lines up by `rows`.
fn shift_rows(renderer: &mut dyn Renderer, rows: usize) {
    for key in [Property::GridRowStart, Property::GridRowEnd] {
        if let Some(line) = renderer.properties().integer(key) {
            renderer.set_property(key, PropertyValue::Integer((line - rows as i32).max(1)));
        }
    }
}

fn in_document_order(mut items: Vec<(usize, Box<dyn Renderer>)>) -> Vec<Box<dyn Renderer>> {
    items.sort_by_key(|(item, _)| *item);
    items.into_iter().map(|(_, renderer)| renderer).collect()
}

impl GridContainerRenderer {
    pub fn new(properties: Properties, children: Vec<Box<dyn Renderer>>) -> Self {
        Self {
            id: RendererId::new(),
            properties,
            children,
            occupied: None,
        }
    }

    fn part(&self, children: Vec<Box<dyn Renderer>>, occupied: Option<LayoutArea>) -> Self {
        Self {
            id: self.id,
            properties: self.properties.clone(),
            children,
            occupied,
        }
    }

    /// Resolve the templates and place every child.
    fn build_grid(
        &self,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<(Grid, AxisTemplate, AxisTemplate), LayoutError> {
        let column_gap = self.properties.number(Property::ColumnGap).unwrap_or(0.0);
        let row_gap = self.properties.number(Property::RowGap).unwrap_or(0.0);
        let flow = self.properties.flow(Property::GridFlow).unwrap_or_default();

        let mut column_resolver = GridTemplateResolver::new(width, column_gap);
        let mut column_template = self
            .properties
            .template(Property::GridTemplateColumns)
            .and_then(|t| column_resolver.resolve_template(t))
            .unwrap_or_default();
        let mut row_resolver = GridTemplateResolver::new(height, row_gap);
        let mut row_template = self
            .properties
            .template(Property::GridTemplateRows)
            .and_then(|t| row_resolver.resolve_template(t))
            .unwrap_or_default();

        let cells = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| GridCell::from_properties(i, child.properties()))
            .collect();
        let mut grid = Grid::with_cells(row_template.len(), column_template.len(), flow, cells)?;

        if column_resolver.is_auto_fit() {
            column_template = column_resolver.shrink_to_fit(grid.occupied_columns());
            grid.resize(grid.rows(), column_template.len());
        }
        if row_resolver.is_auto_fit() {
            row_template = row_resolver.shrink_to_fit(grid.occupied_rows());
            grid.resize(row_template.len(), grid.columns());
        }

        let columns = AxisTemplate {
            template: column_template,
            auto: self
                .properties
                .track(Property::GridAutoColumns)
                .cloned()
                .unwrap_or(GridValue::Auto),
            gap: column_gap,
            space: width,
        };
        let rows = AxisTemplate {
            template: row_template,
            auto: self
                .properties
                .track(Property::GridAutoRows)
                .cloned()
                .unwrap_or(GridValue::Auto),
            gap: row_gap,
            space: height,
        };
        Ok((grid, columns, rows))
    }
}

impl Renderer for GridContainerRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn layout(&mut self, context: &LayoutContext) -> Result<LayoutResult, LayoutError> {
        let outer = context.area.bbox;
        let spacing = BoxSpacing::from_properties(&self.properties);
        let mut content = spacing.content_box(outer);
        if let Some(width) = self
            .properties
            .length(Property::Width)
            .and_then(|w| w.resolve(Some(content.width)))
        {
            content.width = width;
        }
        let explicit_height = self.properties.number(Property::Height);

        debug!(
            grid = self.id.raw(),
            children = self.children.len(),
            width = content.width,
            height = content.height,
            "grid layout start"
        );

        let (mut grid, columns, rows) = self.build_grid(Some(content.width), explicit_height)?;
        let sizing = GridSizer::new(&mut grid, &self.children, context, columns, rows).size()?;

        let epsilon = context.config.height_epsilon;
        let mut children: Vec<Option<Box<dyn Renderer>>> =
            self.children.drain(..).map(Some).collect();
        let mut laid_out: Vec<(usize, Box<dyn Renderer>)> = Vec::new();
        let mut overflow: Vec<(usize, Box<dyn Renderer>)> = Vec::new();
        let mut min_overflow_row: Option<usize> = None;
        let mut cause: Option<RendererId> = None;

        for index in grid.unique_cells(GridOrder::RowMajor) {
            let cell = grid.cell(index);
            let item = cell.item();
            let Some(mut child) = children[item].take() else {
                continue;
            };

            let top = content.y + cell.layout_area.y;
            let available = content.bottom() - top;
            let result = if available <= 0.0 && cell.layout_area.height > 0.0 {
                LayoutResult::nothing(child.clone_renderer(), child.id())
            } else {
                let cell_area = Rect::new(
                    content.x + cell.layout_area.x,
                    top,
                    cell.layout_area.width,
                    cell.layout_area.height.min(available).max(0.0),
                );
                child.set_property(Property::FillAvailableArea, PropertyValue::Flag(true));
                let result = child.layout(&context.with_bbox(cell_area))?;
                child.properties_mut().remove(Property::FillAvailableArea);
                result
            };

            trace!(
                item,
                row = cell.row_start(),
                column = cell.column_start(),
                status = ?result.status,
                "grid cell laid out"
            );

            match result.status {
                LayoutStatus::Full => laid_out.push((item, child)),
                LayoutStatus::Nothing => {
                    let mut rest = result
                        .overflow_renderer
                        .unwrap_or_else(|| child.clone_renderer());
                    pin_to_cell(rest.as_mut(), cell, cell.row_start());
                    min_overflow_row = Some(
                        min_overflow_row.map_or(cell.row_start(), |row| row.min(cell.row_start())),
                    );
                    if cause.is_none() {
                        cause = Some(result.cause_of_nothing.unwrap_or_else(|| child.id()));
                    }
                    children[item] = Some(child);
                    overflow.push((item, rest));
                }
                LayoutStatus::Partial => {
                    let split_height = result.occupied_height();
                    if let Some(split) = result.split_renderer {
                        laid_out.push((item, split));
                    }
                    let row = split_row(cell, split_height, epsilon);
                    let mut rest = result
                        .overflow_renderer
                        .unwrap_or_else(|| child.clone_renderer());
                    pin_to_cell(rest.as_mut(), cell, row);
                    min_overflow_row = Some(min_overflow_row.map_or(row, |min| min.min(row)));
                    overflow.push((item, rest));
                }
            }
        }

        if overflow.is_empty() {
            self.children = in_document_order(laid_out);
            let content_height = self
                .properties
                .constrain_height(sizing.rows.original_total())
                .min(content.height.max(0.0));
            let occupied = LayoutArea::new(
                context.area.page_number,
                Rect::new(
                    outer.x,
                    outer.y,
                    outer.width,
                    spacing.top() + content_height + spacing.bottom(),
                ),
            );
            self.occupied = Some(occupied);
            debug!(grid = self.id.raw(), height = occupied.bbox.height, "grid layout full");
            return Ok(LayoutResult::full(occupied));
        }

        if laid_out.is_empty() {
            self.children = children.into_iter().flatten().collect();
            self.occupied = None;
            debug!(grid = self.id.raw(), "grid layout nothing");
            return Ok(LayoutResult::nothing(
                self.clone_renderer(),
                cause.unwrap_or(self.id),
            ));
        }

        let shift = min_overflow_row.unwrap_or(0);
        let mut overflow_children = in_document_order(overflow);
        for child in &mut overflow_children {
            shift_rows(child.as_mut(), shift);
        }
        let mut overflow_properties = self.properties.clone();
        overflow_properties.remove(Property::GridTemplateRows);

        let occupied = LayoutArea::new(
            context.area.page_number,
            Rect::new(outer.x, outer.y, outer.width, content.bottom() - outer.y),
        );
        let split = self.part(in_document_order(laid_out), Some(occupied));
        let rest = Self {
            id: self.id,
            properties: overflow_properties,
            children: overflow_children,
            occupied: None,
        };
        self.children = children.into_iter().flatten().collect();
        self.occupied = Some(occupied);

        debug!(
            grid = self.id.raw(),
            laid_out = split.children.len(),
            overflow = rest.children.len(),
            shift,
            "grid layout partial"
        );
        Ok(LayoutResult::partial(occupied, Box::new(split), Box::new(rest)))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.occupied
    }

    fn child_renderers(&self) -> &[Box<dyn Renderer>] {
        &self.children
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        if let Some(area) = self.occupied.as_mut() {
            area.bbox.move_by(dx, dy);
        }
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
    }

    /// Widths from sizing the columns with every item's minimum, then maximum,
    /// content width.
    fn min_max_width(&self) -> MinMaxWidth {
        let horizontal = BoxSpacing::from_properties(&self.properties).horizontal();
        if let Some(width) = self.properties.number(Property::Width) {
            return MinMaxWidth::new(width, width).grow(horizontal);
        }

        let Ok((grid, columns, _)) = self.build_grid(None, None) else {
            return self
                .children
                .iter()
                .map(|child| child.min_max_width())
                .fold(MinMaxWidth::default(), MinMaxWidth::union)
                .grow(horizontal);
        };

        let values = columns.values(grid.columns());
        let mut min_sizer = TrackSizer::new(values.clone(), columns.gap);
        let mut max_sizer = TrackSizer::new(values, columns.gap);
        for cell in grid.cells() {
            let widths = self.children[cell.item()].min_max_width();
            let (start, span) = (cell.column_start(), cell.column_span());
            min_sizer.contribute(TrackContribution::new(start, span, widths.min, widths.min));
            max_sizer.contribute(TrackContribution::new(start, span, widths.max, widths.max));
        }
        MinMaxWidth::new(min_sizer.size().total(), max_sizer.size().total()).grow(horizontal)
    }

    fn clone_renderer(&self) -> Box<dyn Renderer> {
        Box::new(self.part(clone_all(&self.children), None))
    }
}
