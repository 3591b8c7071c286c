//! Column container: any number of children flowed through columns.

use tracing::{debug, trace, warn};

use crate::columns::{layout_in_columns, ColumnGeometry, MulticolLayoutResult};
use crate::flow::BlockRenderer;
use crate::property::{Properties, Property};
use crate::renderer::{
    clone_all, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer, RendererId,
};
use crate::{BoxSpacing, LayoutError, Rect};

/// Vertical extent of a laid-out leaf renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    top: f32,
    bottom: f32,
}

/// Collect the extents of the laid-out leaves under `renderer`, depth first.
fn collect_leaves(renderer: &dyn Renderer, leaves: &mut Vec<Extent>) {
    let children = renderer.child_renderers();
    if children.is_empty() {
        if let Some(area) = renderer.occupied_area() {
            leaves.push(Extent {
                top: area.bbox.y,
                bottom: area.bbox.bottom(),
            });
        }
        return;
    }
    for child in children {
        collect_leaves(child.as_ref(), leaves);
    }
}

/// Smallest column height, starting from `height`, at which the leaves fit
/// into `count` columns.
///
/// Leaves are walked in order. A leaf that does not fit the current column
/// records its overflow in that column's bucket and starts the next column.
/// While the last column overflows, the smallest recorded overflow is added
/// and the walk restarts.
fn balance_content_between_columns(
    leaves: &[Extent],
    count: usize,
    mut height: f32,
    epsilon: f32,
) -> f32 {
    let (Some(first), Some(last)) = (leaves.first(), leaves.last()) else {
        return height;
    };
    let total = last.bottom - first.top;
    let count = count.max(1);

    while height + epsilon < total {
        let mut overflow = vec![0.0_f32; count];
        let mut column = 0;
        let mut column_top = first.top;

        for leaf in leaves {
            let excess = leaf.bottom - column_top - height;
            if excess <= epsilon {
                continue;
            }
            overflow[column] = excess;
            if column + 1 == count {
                break;
            }
            column += 1;
            column_top = leaf.top;
            let excess = leaf.bottom - column_top - height;
            if excess > epsilon {
                overflow[column] = excess;
                if column + 1 == count {
                    break;
                }
            }
        }

        if overflow[count - 1] <= epsilon {
            break;
        }
        let increment = overflow
            .iter()
            .copied()
            .filter(|excess| *excess > epsilon)
            .fold(f32::INFINITY, f32::min);
        trace!(height, increment, "column balancing retry");
        height += increment;
    }
    height.min(total)
}

/// Flows its children through equal-width columns as one block.
///
/// The column height comes from walking the lines of an unbounded trial
/// layout rather than from repeated column passes.
#[derive(Debug)]
pub struct ColumnContainerRenderer {
    id: RendererId,
    properties: Properties,
    children: Vec<Box<dyn Renderer>>,
    occupied: Option<LayoutArea>,
}

impl ColumnContainerRenderer {
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

    /// Lay `flow` out in columns, starting at the balanced `height`.
    ///
    /// The leaf walk does not see spacing that a continued block applies
    /// again, so while the last column overflows and there is room left the
    /// height grows by a share of the overflow's height. Returns the final
    /// pass and the height it used.
    fn fit_columns(
        &self,
        flow: &dyn Renderer,
        context: &LayoutContext,
        area: Rect,
        geometry: ColumnGeometry,
        mut height: f32,
        ceiling: f32,
    ) -> Result<(MulticolLayoutResult, f32), LayoutError> {
        let epsilon = context.config.height_epsilon;
        let mut remaining = context.config.max_relayouts;
        let mut result = layout_in_columns(flow, context, area, geometry, height)?;

        while let Some(overflow) = result.overflow_renderer.as_ref() {
            if height + epsilon >= ceiling {
                break;
            }
            if remaining == 0 {
                warn!(
                    container = self.id.raw(),
                    height,
                    "relayout budget exhausted, continuing overflow on the next area"
                );
                break;
            }

            let mut rest = overflow.clone_renderer();
            let overflow_height = rest
                .layout(&context.unbounded(geometry.width))?
                .occupied_height();
            let delta = overflow_height / remaining as f32;
            if delta < epsilon {
                break;
            }
            height = (height + delta).min(ceiling);
            remaining -= 1;
            trace!(container = self.id.raw(), height, remaining, "column container retry");
            result = layout_in_columns(flow, context, area, geometry, height)?;
        }
        Ok((result, height))
    }
}

impl Renderer for ColumnContainerRenderer {
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
        let mut area = spacing.content_box(outer);
        if let Some(width) = self
            .properties
            .length(Property::Width)
            .and_then(|w| w.resolve(Some(area.width)))
        {
            area.width = width;
        }
        let geometry = ColumnGeometry::from_properties(&self.properties, area.width)?;
        let flow = BlockRenderer::new(clone_all(&self.children));

        let mut trial = flow.clone_renderer();
        let mut trial_context = context.unbounded(geometry.width);
        trial_context.area.bbox.x = area.x;
        trial_context.area.bbox.y = area.y;
        let trial_result = trial.layout(&trial_context)?;
        if !trial_result.is_full() {
            self.occupied = None;
            let cause = trial_result.cause_of_nothing.unwrap_or(self.id);
            return Ok(LayoutResult::nothing(self.clone_renderer(), cause));
        }

        let mut leaves = Vec::new();
        collect_leaves(trial.as_ref(), &mut leaves);
        let approximate = trial_result.occupied_height() / geometry.count as f32;
        let ceiling = self
            .properties
            .height_limit()
            .map_or(area.height, |limit| limit.min(area.height));
        let balanced = balance_content_between_columns(
            &leaves,
            geometry.count as usize,
            approximate,
            context.config.height_epsilon,
        )
        .min(ceiling);

        debug!(
            container = self.id.raw(),
            columns = geometry.count,
            leaves = leaves.len(),
            height = balanced,
            "column container layout"
        );

        let (result, height) = self.fit_columns(&flow, context, area, geometry, balanced, ceiling)?;
        if result.split_renderers.is_empty() {
            self.occupied = None;
            let cause = result.cause_of_nothing.unwrap_or(self.id);
            return Ok(LayoutResult::nothing(self.clone_renderer(), cause));
        }

        match result.overflow_renderer {
            None => {
                let content_height = self.properties.constrain_height(height).min(area.height);
                let occupied = LayoutArea::new(
                    context.area.page_number,
                    Rect::new(
                        outer.x,
                        outer.y,
                        outer.width,
                        spacing.top() + content_height + spacing.bottom(),
                    ),
                );
                self.children = result.split_renderers;
                self.occupied = Some(occupied);
                Ok(LayoutResult::full(occupied))
            }
            Some(overflow) => {
                let occupied = LayoutArea::new(
                    context.area.page_number,
                    Rect::new(outer.x, outer.y, outer.width, area.bottom() - outer.y),
                );
                let split = self.part(result.split_renderers, Some(occupied));
                let rest = self.part(vec![overflow], None);
                self.occupied = Some(occupied);
                Ok(LayoutResult::partial(occupied, Box::new(split), Box::new(rest)))
            }
        }
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

    fn min_max_width(&self) -> MinMaxWidth {
        let horizontal = BoxSpacing::from_properties(&self.properties).horizontal();
        if let Some(width) = self.properties.number(Property::Width) {
            return MinMaxWidth::new(width, width).grow(horizontal);
        }
        let count = self.properties.integer(Property::ColumnCount).unwrap_or(1).max(1) as f32;
        let gaps = self.properties.number(Property::ColumnGap).unwrap_or(0.0) * (count - 1.0);
        let widest = self
            .children
            .iter()
            .map(|child| child.min_max_width())
            .fold(MinMaxWidth::default(), MinMaxWidth::union);
        MinMaxWidth::new(widest.min * count + gaps, widest.max * count + gaps).grow(horizontal)
    }

    fn clone_renderer(&self) -> Box<dyn Renderer> {
        Box::new(self.part(clone_all(&self.children), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::LineRenderer;
    use crate::property::PropertyValue;
    use crate::renderer::LayoutStatus;

    fn extents(heights: &[f32]) -> Vec<Extent> {
        let mut top = 0.0;
        heights
            .iter()
            .map(|height| {
                let extent = Extent {
                    top,
                    bottom: top + height,
                };
                top += height;
                extent
            })
            .collect()
    }

    fn paragraph(lines: usize) -> Box<dyn Renderer> {
        Box::new(BlockRenderer::new(
            (0..lines)
                .map(|_| Box::new(LineRenderer::new(40.0, 10.0)) as Box<dyn Renderer>)
                .collect(),
        ))
    }

    fn context(height: f32) -> LayoutContext {
        LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, 210.0, height)))
    }

    fn two_columns() -> Properties {
        Properties::new()
            .with(Property::ColumnCount, PropertyValue::Integer(2))
            .with(Property::ColumnGap, PropertyValue::Number(10.0))
    }

    #[test]
    fn test_balance_even_lines() {
        let leaves = extents(&[10.0; 6]);
        assert_eq!(balance_content_between_columns(&leaves, 2, 30.0, 1e-4), 30.0);
    }

    #[test]
    fn test_balance_adds_smallest_overflow() {
        let leaves = extents(&[10.0; 5]);
        assert_eq!(balance_content_between_columns(&leaves, 2, 25.0, 1e-4), 30.0);

        let leaves = extents(&[10.0, 30.0, 10.0]);
        assert_eq!(balance_content_between_columns(&leaves, 2, 25.0, 1e-4), 40.0);
    }

    #[test]
    fn test_balance_single_column_takes_everything() {
        let leaves = extents(&[10.0, 20.0, 5.0]);
        assert_eq!(balance_content_between_columns(&leaves, 1, 10.0, 1e-4), 35.0);
        assert_eq!(balance_content_between_columns(&[], 3, 12.0, 1e-4), 12.0);
    }

    #[test]
    fn test_collect_leaves_depth_first() {
        let mut flow = BlockRenderer::new(vec![paragraph(2), paragraph(1)]);
        flow.layout(&context(1000.0)).unwrap();
        let mut leaves = Vec::new();
        collect_leaves(&flow, &mut leaves);
        let tops: Vec<f32> = leaves.iter().map(|leaf| leaf.top).collect();
        assert_eq!(tops, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_children_flow_through_columns() {
        let mut container =
            ColumnContainerRenderer::new(two_columns(), vec![paragraph(3), paragraph(2)]);
        let result = container.layout(&context(1000.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full);
        assert_eq!(result.occupied_height(), 30.0);

        let columns = container.child_renderers();
        assert_eq!(columns.len(), 2);
        let second = columns[1].occupied_area().unwrap().bbox;
        assert_eq!((second.x, second.y), (110.0, 0.0));
    }

    #[test]
    fn test_repeated_padding_grows_columns() {
        let padded: Box<dyn Renderer> = Box::new(BlockRenderer::with_properties(
            Properties::new().with(Property::PaddingTop, PropertyValue::Number(10.0)),
            (0..4)
                .map(|_| Box::new(LineRenderer::new(40.0, 10.0)) as Box<dyn Renderer>)
                .collect(),
        ));
        let mut container = ColumnContainerRenderer::new(two_columns(), vec![padded]);
        let result = container.layout(&context(1000.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full);
        assert_eq!(result.occupied_height(), 32.5);

        // The continued paragraph repeats its padding in the second column.
        let columns = container.child_renderers();
        assert_eq!(columns[0].child_renderers()[0].child_renderers().len(), 2);
        assert_eq!(columns[1].child_renderers()[0].child_renderers().len(), 2);
    }

    #[test]
    fn test_min_and_max_height() {
        let properties = two_columns().with(Property::MinHeight, PropertyValue::Number(80.0));
        let mut container =
            ColumnContainerRenderer::new(properties, vec![paragraph(3), paragraph(2)]);
        assert_eq!(container.layout(&context(1000.0)).unwrap().occupied_height(), 80.0);

        let properties = two_columns().with(Property::Height, PropertyValue::Number(500.0));
        let mut container = ColumnContainerRenderer::new(properties, vec![paragraph(2)]);
        let result = container.layout(&context(100.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full);
        assert_eq!(result.occupied_height(), 100.0);

        let properties = two_columns().with(Property::MaxHeight, PropertyValue::Number(20.0));
        let mut container = ColumnContainerRenderer::new(properties, vec![paragraph(10)]);
        let result = container.layout(&context(1000.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        let split = result.split_renderer.unwrap();
        assert_eq!(split.child_renderers()[1].child_renderers()[0].child_renderers().len(), 2);
    }

    #[test]
    fn test_short_area_overflows() {
        let mut container = ColumnContainerRenderer::new(two_columns(), vec![paragraph(10)]);
        let result = container.layout(&context(20.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        let mut rest = result.overflow_renderer.unwrap();
        assert_eq!(rest.id(), container.id());

        let next = rest.layout(&context(1000.0)).unwrap();
        assert_eq!(next.status, LayoutStatus::Full);
        assert_eq!(next.occupied_height(), 30.0);
    }
}
