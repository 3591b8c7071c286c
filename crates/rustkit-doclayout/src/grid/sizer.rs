//! Column and row sizing for a placed grid.

use tracing::debug;

use super::matrix::Grid;
use super::track_sizer::{TrackContribution, TrackSizer, TrackSizes};
use super::value::GridValue;
use crate::property::Property;
use crate::renderer::{LayoutContext, Renderer};
use crate::{LayoutError, Rect};

/// Template and spacing of one grid axis.
#[derive(Debug, Clone)]
pub struct AxisTemplate {
    /// Resolved explicit tracks.
    pub template: Vec<GridValue>,
    /// Sizing of implicit tracks past the template.
    pub auto: GridValue,
    pub gap: f32,
    /// Definite size of the axis, `None` when indefinite.
    pub space: Option<f32>,
}

impl AxisTemplate {
    pub(crate) fn values(&self, count: usize) -> Vec<GridValue> {
        (0..count)
            .map(|i| self.template.get(i).cloned().unwrap_or_else(|| self.auto.clone()))
            .collect()
    }
}

/// Resolved track sizes of both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSizingResult {
    pub columns: TrackSizes,
    pub rows: TrackSizes,
}

/// Sizes a grid's tracks and assigns each cell its layout area.
pub struct GridSizer<'a> {
    grid: &'a mut Grid,
    children: &'a [Box<dyn Renderer>],
    context: &'a LayoutContext,
    columns: AxisTemplate,
    rows: AxisTemplate,
}

impl<'a> GridSizer<'a> {
    pub fn new(
        grid: &'a mut Grid,
        children: &'a [Box<dyn Renderer>],
        context: &'a LayoutContext,
        columns: AxisTemplate,
        rows: AxisTemplate,
    ) -> Self {
        Self {
            grid,
            children,
            context,
            columns,
            rows,
        }
    }

    pub fn size(mut self) -> Result<GridSizingResult, LayoutError> {
        let columns = self.size_columns();
        let positions = columns.positions();
        for index in 0..self.grid.cells().len() {
            let cell = self.grid.cell_mut(index);
            cell.layout_area.x = positions.get(cell.column_start()).copied().unwrap_or(0.0);
            cell.layout_area.width = columns.span_size(cell.column_start(), cell.column_span());
        }

        let rows = self.size_rows()?;
        let positions = rows.positions();
        for index in 0..self.grid.cells().len() {
            let cell = self.grid.cell_mut(index);
            let (start, span) = (cell.row_start(), cell.row_span());
            cell.layout_area.y = positions.get(start).copied().unwrap_or(0.0);
            cell.layout_area.height = rows.span_size(start, span);
            cell.row_sizes = (start..(start + span).min(rows.len()))
                .enumerate()
                .map(|(i, row)| if i == 0 { rows.sizes[row] } else { rows.gap + rows.sizes[row] })
                .collect();
        }

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            width = columns.total(),
            height = rows.original_total(),
            "grid sized"
        );
        Ok(GridSizingResult { columns, rows })
    }

    fn size_columns(&self) -> TrackSizes {
        let mut sizer = TrackSizer::new(self.columns.values(self.grid.columns()), self.columns.gap)
            .with_available(self.columns.space);
        for cell in self.grid.cells() {
            let widths = self.children[cell.item()].min_max_width();
            sizer.contribute(TrackContribution::new(
                cell.column_start(),
                cell.column_span(),
                widths.min,
                widths.max,
            ));
        }
        sizer.size()
    }

    /// Row contributions come from a trial layout of every item at its
    /// column width and an unbounded height.
    fn size_rows(&self) -> Result<TrackSizes, LayoutError> {
        let mut sizer = TrackSizer::new(self.rows.values(self.grid.rows()), self.rows.gap)
            .with_available(self.rows.space);
        for cell in self.grid.cells() {
            let mut trial = self.children[cell.item()].clone_renderer();
            trial.properties_mut().remove(Property::FillAvailableArea);
            let bbox = Rect::new(0.0, 0.0, cell.layout_area.width, self.context.config.unbounded_height);
            let height = trial.layout(&self.context.with_bbox(bbox))?.occupied_height();
            sizer.contribute(TrackContribution::new(
                cell.row_start(),
                cell.row_span(),
                height,
                height,
            ));
        }
        Ok(sizer.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{BlockRenderer, LineRenderer};
    use crate::grid::cell::GridCell;
    use crate::property::GridFlow;
    use crate::renderer::LayoutArea;

    fn axis(template: Vec<GridValue>, gap: f32, space: Option<f32>) -> AxisTemplate {
        AxisTemplate {
            template,
            auto: GridValue::Auto,
            gap,
            space,
        }
    }

    fn block(lines: usize) -> Box<dyn Renderer> {
        Box::new(BlockRenderer::new(
            (0..lines)
                .map(|_| Box::new(LineRenderer::new(20.0, 10.0)) as Box<dyn Renderer>)
                .collect(),
        ))
    }

    #[test]
    fn test_cells_get_layout_areas() {
        let children = vec![block(1), block(3), block(2)];
        let cells = (0..3).map(GridCell::new).collect();
        let mut grid = Grid::with_cells(0, 2, GridFlow::Row, cells).unwrap();
        let context = LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, 210.0, 500.0)));

        let result = GridSizer::new(
            &mut grid,
            &children,
            &context,
            axis(vec![GridValue::Fixed(100.0), GridValue::Fixed(100.0)], 10.0, Some(210.0)),
            axis(vec![], 5.0, None),
        )
        .size()
        .unwrap();

        assert_eq!(result.columns.sizes, vec![100.0, 100.0]);
        assert_eq!(result.rows.sizes, vec![30.0, 20.0]);

        let third = &grid.cells()[2];
        assert_eq!(third.layout_area, Rect::new(0.0, 35.0, 100.0, 20.0));
        assert_eq!(grid.cells()[1].layout_area.x, 110.0);
    }

    #[test]
    fn test_row_sizes_include_gaps() {
        let children = vec![block(2), block(1), block(1)];
        let cells = vec![
            GridCell::new(0).with_spans(2, 1),
            GridCell::new(1),
            GridCell::new(2),
        ];
        let mut grid = Grid::with_cells(0, 2, GridFlow::Row, cells).unwrap();
        let context = LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, 200.0, 500.0)));

        let result = GridSizer::new(
            &mut grid,
            &children,
            &context,
            axis(vec![GridValue::Flex(1.0), GridValue::Flex(1.0)], 0.0, Some(200.0)),
            axis(vec![], 4.0, None),
        )
        .size()
        .unwrap();

        assert_eq!(result.columns.sizes, vec![100.0, 100.0]);
        assert_eq!(result.rows.sizes, vec![10.0, 10.0]);
        assert_eq!(grid.cells()[0].row_sizes, vec![10.0, 14.0]);
        assert_eq!(grid.cells()[0].layout_area.height, 24.0);
    }
}
