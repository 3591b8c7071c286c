//! Basic flow renderers: unbreakable lines and vertically stacked blocks.

use tracing::trace;

use crate::property::{Properties, Property, PropertyValue};
use crate::renderer::{
    clone_all, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer,
    RendererId,
};
use crate::{BoxSpacing, LayoutError, Rect};

// ==================== Line ====================

/// An unbreakable line box of fixed size.
#[derive(Debug)]
pub struct LineRenderer {
    id: RendererId,
    properties: Properties,
    width: f32,
    height: f32,
    occupied: Option<LayoutArea>,
}

impl LineRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            id: RendererId::new(),
            properties: Properties::new(),
            width,
            height,
            occupied: None,
        }
    }
}

impl Renderer for LineRenderer {
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
        let bbox = context.area.bbox;
        if self.height > bbox.height + context.config.height_epsilon {
            self.occupied = None;
            return Ok(LayoutResult::nothing(self.clone_renderer(), self.id));
        }

        let area = LayoutArea::new(
            context.area.page_number,
            Rect::new(bbox.x, bbox.y, self.width, self.height),
        );
        self.occupied = Some(area);
        Ok(LayoutResult::full(area))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.occupied
    }

    fn child_renderers(&self) -> &[Box<dyn Renderer>] {
        &[]
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        if let Some(area) = self.occupied.as_mut() {
            area.bbox.move_by(dx, dy);
        }
    }

    fn min_max_width(&self) -> MinMaxWidth {
        MinMaxWidth::new(self.width, self.width)
    }

    fn clone_renderer(&self) -> Box<dyn Renderer> {
        Box::new(Self {
            id: self.id,
            properties: self.properties.clone(),
            width: self.width,
            height: self.height,
            occupied: None,
        })
    }
}

// ==================== Block ====================

/// A vertical stack of child renderers.
///
/// A block splits between children or inside a splittable child. Bottom
/// margin, border and padding are only added when everything fit.
#[derive(Debug)]
pub struct BlockRenderer {
    id: RendererId,
    properties: Properties,
    children: Vec<Box<dyn Renderer>>,
    occupied: Option<LayoutArea>,
}

impl BlockRenderer {
    pub fn new(children: Vec<Box<dyn Renderer>>) -> Self {
        Self::with_properties(Properties::new(), children)
    }

    pub fn with_properties(properties: Properties, children: Vec<Box<dyn Renderer>>) -> Self {
        Self {
            id: RendererId::new(),
            properties,
            children,
            occupied: None,
        }
    }

    /// A part of this block holding the given children.
    fn part(&self, children: Vec<Box<dyn Renderer>>, occupied: Option<LayoutArea>) -> Self {
        Self {
            id: self.id,
            properties: self.properties.clone(),
            children,
            occupied,
        }
    }
}

impl Renderer for BlockRenderer {
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

        let mut cursor_y = content.y;
        for index in 0..self.children.len() {
            let child_area = Rect::new(
                content.x,
                cursor_y,
                content.width,
                (content.bottom() - cursor_y).max(0.0),
            );
            let result = self.children[index].layout(&context.with_bbox(child_area))?;

            match result.status {
                LayoutStatus::Full => {
                    cursor_y = result
                        .occupied_area
                        .map_or(cursor_y, |area| area.bbox.bottom());
                }
                LayoutStatus::Partial | LayoutStatus::Nothing => {
                    if result.status == LayoutStatus::Nothing && index == 0 {
                        trace!(block = self.id.raw(), "block: first child does not fit");
                        self.occupied = None;
                        let cause = result.cause_of_nothing.unwrap_or(self.id);
                        return Ok(LayoutResult::nothing(self.clone_renderer(), cause));
                    }

                    let mut rest: Vec<Box<dyn Renderer>> = self.children.drain(index..).collect();
                    let mut laid_out: Vec<Box<dyn Renderer>> = self.children.drain(..).collect();
                    let mut overflow_children = Vec::with_capacity(rest.len());

                    let failed = rest.remove(0);
                    if let Some(split) = result.split_renderer {
                        cursor_y = split
                            .occupied_area()
                            .map_or(cursor_y, |area| area.bbox.bottom());
                        laid_out.push(split);
                    }
                    overflow_children.push(result.overflow_renderer.unwrap_or(failed));
                    overflow_children.extend(rest);

                    trace!(
                        block = self.id.raw(),
                        laid_out = laid_out.len(),
                        overflow = overflow_children.len(),
                        "block: split"
                    );

                    let occupied = LayoutArea::new(
                        context.area.page_number,
                        Rect::new(outer.x, outer.y, outer.width, cursor_y - outer.y),
                    );
                    let split = self.part(laid_out, Some(occupied));
                    let overflow = self.part(overflow_children, None);
                    self.occupied = Some(occupied);
                    return Ok(LayoutResult::partial(
                        occupied,
                        Box::new(split),
                        Box::new(overflow),
                    ));
                }
            }
        }

        let content_height = self.properties.constrain_height(cursor_y - content.y);
        let mut height = spacing.top() + content_height + spacing.bottom();
        let epsilon = context.config.height_epsilon;
        if height > outer.height + epsilon {
            if outer.height <= epsilon {
                self.occupied = None;
                return Ok(LayoutResult::nothing(self.clone_renderer(), self.id));
            }

            // The children fit but the box does not: the rest of the content
            // height continues as an empty part.
            let remaining = (content_height - content.height.max(0.0)).max(0.0);
            let mut rest_properties = self.properties.clone();
            rest_properties.set(Property::Height, PropertyValue::Number(remaining));
            rest_properties.remove(Property::MinHeight);
            rest_properties.remove(Property::MaxHeight);

            trace!(block = self.id.raw(), height, remaining, "block: taller than its area");

            let occupied = LayoutArea::new(context.area.page_number, outer);
            let laid_out: Vec<Box<dyn Renderer>> = self.children.drain(..).collect();
            let split = self.part(laid_out, Some(occupied));
            let rest = Self {
                id: self.id,
                properties: rest_properties,
                children: Vec::new(),
                occupied: None,
            };
            self.occupied = Some(occupied);
            return Ok(LayoutResult::partial(occupied, Box::new(split), Box::new(rest)));
        }
        if self.properties.flag(Property::FillAvailableArea) {
            height = height.max(outer.height);
        }
        let occupied = LayoutArea::new(
            context.area.page_number,
            Rect::new(outer.x, outer.y, outer.width, height),
        );
        self.occupied = Some(occupied);
        Ok(LayoutResult::full(occupied))
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
        self.children
            .iter()
            .map(|child| child.min_max_width())
            .fold(MinMaxWidth::default(), MinMaxWidth::union)
            .grow(horizontal)
    }

    fn clone_renderer(&self) -> Box<dyn Renderer> {
        Box::new(self.part(clone_all(&self.children), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(height: f32) -> LayoutContext {
        LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, 100.0, height)))
    }

    fn lines(count: usize, height: f32) -> Vec<Box<dyn Renderer>> {
        (0..count)
            .map(|_| Box::new(LineRenderer::new(50.0, height)) as Box<dyn Renderer>)
            .collect()
    }

    #[test]
    fn test_line_fits_or_nothing() {
        let mut line = LineRenderer::new(40.0, 20.0);
        let result = line.layout(&context(30.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full);
        assert_eq!(result.occupied_height(), 20.0);

        let result = line.layout(&context(10.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.cause_of_nothing, Some(line.id()));
        assert!(result.overflow_renderer.is_some());
    }

    #[test]
    fn test_block_stacks_children() {
        let mut block = BlockRenderer::new(lines(3, 10.0));
        let result = block.layout(&context(100.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full);
        assert_eq!(result.occupied_height(), 30.0);

        let tops: Vec<f32> = block
            .child_renderers()
            .iter()
            .map(|c| c.occupied_area().unwrap().bbox.y)
            .collect();
        assert_eq!(tops, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_block_splits_between_lines() {
        let mut block = BlockRenderer::new(lines(5, 10.0));
        let result = block.layout(&context(25.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        assert_eq!(result.occupied_height(), 20.0);

        let split = result.split_renderer.unwrap();
        let overflow = result.overflow_renderer.unwrap();
        assert_eq!(split.child_renderers().len(), 2);
        assert_eq!(overflow.child_renderers().len(), 3);
        assert_eq!(split.id(), overflow.id());
    }

    #[test]
    fn test_block_nothing_when_first_child_fails() {
        let mut block = BlockRenderer::new(lines(2, 10.0));
        let first = block.child_renderers()[0].id();
        let result = block.layout(&context(5.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.cause_of_nothing, Some(first));
        assert_eq!(result.overflow_renderer.unwrap().child_renderers().len(), 2);
    }

    #[test]
    fn test_block_spacing_and_height_limits() {
        let properties = Properties::new()
            .with(Property::PaddingTop, PropertyValue::Number(4.0))
            .with(Property::MarginBottom, PropertyValue::Number(6.0))
            .with(Property::MinHeight, PropertyValue::Number(50.0));
        let mut block = BlockRenderer::with_properties(properties, lines(2, 10.0));
        let result = block.layout(&context(200.0)).unwrap();
        assert_eq!(result.occupied_height(), 4.0 + 50.0 + 6.0);
        assert_eq!(block.child_renderers()[0].occupied_area().unwrap().bbox.y, 4.0);
    }

    #[test]
    fn test_block_taller_than_area_continues() {
        let properties = Properties::new().with(Property::MinHeight, PropertyValue::Number(50.0));
        let mut block = BlockRenderer::with_properties(properties, lines(1, 10.0));
        let result = block.layout(&context(20.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        assert_eq!(result.occupied_height(), 20.0);

        let split = result.split_renderer.unwrap();
        assert_eq!(split.child_renderers().len(), 1);
        let mut rest = result.overflow_renderer.unwrap();
        assert_eq!(rest.id(), block.id());
        assert!(rest.child_renderers().is_empty());

        let next = rest.layout(&context(100.0)).unwrap();
        assert_eq!(next.status, LayoutStatus::Full);
        assert_eq!(next.occupied_height(), 30.0);
    }

    #[test]
    fn test_explicit_height_and_spacing_must_fit() {
        let properties = Properties::new()
            .with(Property::Height, PropertyValue::Number(40.0))
            .with(Property::PaddingBottom, PropertyValue::Number(8.0));
        let mut block = BlockRenderer::with_properties(properties, lines(1, 10.0));
        let result = block.layout(&context(30.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        assert_eq!(result.occupied_height(), 30.0);

        // 22 of the 40 fit above the padding.
        let mut rest = result.overflow_renderer.unwrap();
        let next = rest.layout(&context(100.0)).unwrap();
        assert_eq!(next.status, LayoutStatus::Full);
        assert_eq!(next.occupied_height(), 18.0 + 8.0);

        let mut empty = BlockRenderer::with_properties(
            Properties::new().with(Property::Height, PropertyValue::Number(10.0)),
            Vec::new(),
        );
        let result = empty.layout(&context(0.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.cause_of_nothing, Some(empty.id()));
    }

    #[test]
    fn test_block_fills_available_area() {
        let mut block = BlockRenderer::new(lines(1, 10.0));
        block.set_property(Property::FillAvailableArea, PropertyValue::Flag(true));
        let result = block.layout(&context(80.0)).unwrap();
        assert_eq!(result.occupied_height(), 80.0);
    }

    #[test]
    fn test_block_min_max_width() {
        let children: Vec<Box<dyn Renderer>> = vec![
            Box::new(LineRenderer::new(30.0, 10.0)),
            Box::new(LineRenderer::new(70.0, 10.0)),
        ];
        let block = BlockRenderer::with_properties(
            Properties::new().with(Property::PaddingLeft, PropertyValue::Number(5.0)),
            children,
        );
        assert_eq!(block.min_max_width(), MinMaxWidth::new(75.0, 75.0));
    }

    #[test]
    fn test_move_by_moves_children() {
        let mut block = BlockRenderer::new(lines(1, 10.0));
        block.layout(&context(100.0)).unwrap();
        block.move_by(3.0, 4.0);
        let child = block.child_renderers()[0].occupied_area().unwrap().bbox;
        assert_eq!((child.x, child.y), (3.0, 4.0));
    }
}
