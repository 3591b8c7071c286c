//! Multi-column container with height balancing.

use tracing::{debug, trace, warn};

use crate::columns::{layout_in_columns, ColumnGeometry, MulticolLayoutResult};
use crate::property::{Properties, Property};
use crate::renderer::{
    clone_all, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer, RendererId,
};
use crate::{BoxSpacing, LayoutError, Rect};

/// Lays its single child out in equal-width columns.
///
/// The column height starts at the child's unbounded height divided by the
/// column count and grows until the content fits, the area height is reached
/// or the relayout budget is spent. After a full layout the children are the
/// laid-out column parts.
#[derive(Debug)]
pub struct MulticolRenderer {
    id: RendererId,
    properties: Properties,
    children: Vec<Box<dyn Renderer>>,
    occupied: Option<LayoutArea>,
}

impl MulticolRenderer {
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

    fn content(&self) -> Result<&dyn Renderer, LayoutError> {
        match self.children.as_slice() {
            [child] => Ok(child.as_ref()),
            children => Err(LayoutError::InvalidChildren(format!(
                "multicol expects exactly one child, got {}",
                children.len()
            ))),
        }
    }

    /// Run the balancing loop and return the final column pass together
    /// with the balanced height.
    fn balance(
        &self,
        content: &dyn Renderer,
        context: &LayoutContext,
        area: Rect,
        geometry: ColumnGeometry,
        total_height: f32,
    ) -> Result<(MulticolLayoutResult, f32), LayoutError> {
        let config = context.config;
        let height_limit = self.properties.height_limit();
        let ceiling = area.height;
        let mut balanced = total_height / geometry.count as f32;
        let mut remaining = config.max_relayouts;

        loop {
            let mut working = balanced.min(ceiling);
            if let Some(height) = height_limit.filter(|h| *h < working) {
                working = height;
            }

            let result = layout_in_columns(content, context, area, geometry, working)?;
            trace!(
                multicol = self.id.raw(),
                working,
                balanced,
                remaining,
                "multicol balancing pass"
            );

            let Some(overflow) = result.overflow_renderer.as_ref() else {
                return Ok((result, balanced));
            };
            if working + config.height_epsilon >= ceiling
                || height_limit.is_some_and(|h| h <= working + config.height_epsilon)
            {
                return Ok((result, balanced));
            }
            if remaining == 0 {
                warn!(
                    multicol = self.id.raw(),
                    height = working,
                    "relayout budget exhausted, continuing overflow on the next area"
                );
                return Ok((result, balanced));
            }

            let mut rest = overflow.clone_renderer();
            let overflow_height = rest
                .layout(&context.unbounded(geometry.width))?
                .occupied_height();
            let delta = overflow_height / remaining as f32;
            if delta < config.height_epsilon {
                return Ok((result, balanced));
            }
            balanced += delta;
            remaining -= 1;
        }
    }
}

impl Renderer for MulticolRenderer {
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
        let content_renderer = self.content()?;
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

        let mut trial = content_renderer.clone_renderer();
        let mut trial_context = context.unbounded(geometry.width);
        trial_context.area.bbox.x = area.x;
        trial_context.area.bbox.y = area.y;
        let trial_result = trial.layout(&trial_context)?;
        if !trial_result.is_full() {
            debug!(multicol = self.id.raw(), "multicol content does not fit a column");
            self.occupied = None;
            let cause = trial_result.cause_of_nothing.unwrap_or(self.id);
            return Ok(LayoutResult::nothing(self.clone_renderer(), cause));
        }
        let total_height = trial_result.occupied_height();

        debug!(
            multicol = self.id.raw(),
            columns = geometry.count,
            column_width = geometry.width,
            total_height,
            "multicol layout start"
        );

        let (result, balanced) =
            self.balance(content_renderer, context, area, geometry, total_height)?;

        if result.split_renderers.is_empty() {
            self.occupied = None;
            let cause = result.cause_of_nothing.unwrap_or(self.id);
            return Ok(LayoutResult::nothing(self.clone_renderer(), cause));
        }

        match result.overflow_renderer {
            None => {
                let content_height = self.properties.constrain_height(balanced).min(area.height);
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
                debug!(multicol = self.id.raw(), height = content_height, "multicol layout full");
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
                debug!(
                    multicol = self.id.raw(),
                    columns = split.children.len(),
                    "multicol layout partial"
                );
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

    /// Every column needs the child's width.
    fn min_max_width(&self) -> MinMaxWidth {
        let horizontal = BoxSpacing::from_properties(&self.properties).horizontal();
        if let Some(width) = self.properties.number(Property::Width) {
            return MinMaxWidth::new(width, width).grow(horizontal);
        }
        let count = self.properties.integer(Property::ColumnCount).unwrap_or(1).max(1) as f32;
        let gap = self.properties.number(Property::ColumnGap).unwrap_or(0.0);
        let child = self
            .children
            .iter()
            .map(|child| child.min_max_width())
            .fold(MinMaxWidth::default(), MinMaxWidth::union);
        let gaps = gap * (count - 1.0);
        MinMaxWidth::new(child.min * count + gaps, child.max * count + gaps).grow(horizontal)
    }

    fn clone_renderer(&self) -> Box<dyn Renderer> {
        Box::new(self.part(clone_all(&self.children), None))
    }
}
