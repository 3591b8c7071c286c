//! Main-axis directors for flex containers.
//!
//! A director decides in which order the items of a flex line are visited
//! from the physical main-start edge (left or top) and where `justify-content`
//! puts them. Reversed directions visit the line back to front and treat the
//! physical end edge as flex-start.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::renderer::Renderer;
use crate::Rect;

/// Main-axis alignment of flex items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexJustify {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Direction of a flex container's main axis.
pub trait FlexItemMainDirector: fmt::Debug {
    /// True when the main axis runs vertically.
    fn is_vertical(&self) -> bool;

    /// True when flex-start is the physical right or bottom edge.
    fn is_reversed(&self) -> bool;

    /// Order the items of one line from the physical main-start edge.
    fn apply_direction_for_line(&self, line: &mut [Box<dyn Renderer>]) {
        if self.is_reversed() {
            line.reverse();
        }
    }

    /// Flatten flex lines into layout order.
    fn apply_direction(&self, lines: Vec<Vec<Box<dyn Renderer>>>) -> Vec<Box<dyn Renderer>> {
        let mut ordered = Vec::with_capacity(lines.iter().map(Vec::len).sum());
        for mut line in lines {
            self.apply_direction_for_line(&mut line);
            ordered.extend(line);
        }
        ordered
    }

    /// Main-axis size of an area.
    fn main_size(&self, area: Rect) -> f32 {
        if self.is_vertical() {
            area.height
        } else {
            area.width
        }
    }

    /// Move a renderer along the main axis.
    fn move_along_main(&self, renderer: &mut dyn Renderer, offset: f32) {
        if self.is_vertical() {
            renderer.move_by(0.0, offset);
        } else {
            renderer.move_by(offset, 0.0);
        }
    }

    /// Offset of every item from the physical main-start edge.
    ///
    /// `sizes` are the outer main sizes of the items in the order produced by
    /// [`apply_direction_for_line`](Self::apply_direction_for_line).
    fn apply_justify_content(
        &self,
        justify: FlexJustify,
        container_main: f32,
        gap: f32,
        sizes: &[f32],
    ) -> Vec<f32> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let count = sizes.len();
        let total: f32 = sizes.iter().sum();
        let gaps = gap * (count - 1) as f32;
        let free_space = (container_main - total - gaps).max(0.0);

        let justify = match (justify, self.is_reversed()) {
            (FlexJustify::FlexStart, true) => FlexJustify::FlexEnd,
            (FlexJustify::FlexEnd, true) => FlexJustify::FlexStart,
            (justify, _) => justify,
        };
        let (initial, spacing) = match justify {
            FlexJustify::FlexStart => (0.0, gap),
            FlexJustify::FlexEnd => (free_space, gap),
            FlexJustify::Center => (free_space / 2.0, gap),
            FlexJustify::SpaceBetween if count > 1 => {
                (0.0, free_space / (count - 1) as f32 + gap)
            }
            FlexJustify::SpaceBetween => (0.0, gap),
            FlexJustify::SpaceAround => {
                let space = free_space / count as f32;
                (space / 2.0, space + gap)
            }
            FlexJustify::SpaceEvenly => {
                let space = free_space / (count + 1) as f32;
                (space, space + gap)
            }
        };

        trace!(?justify, free_space, initial, spacing, "justify flex line");

        let mut position = initial;
        sizes
            .iter()
            .map(|size| {
                let offset = position;
                position += size + spacing;
                offset
            })
            .collect()
    }
}

/// `flex-direction: row` in a left-to-right context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftToRightDirector;

impl FlexItemMainDirector for LeftToRightDirector {
    fn is_vertical(&self) -> bool {
        false
    }

    fn is_reversed(&self) -> bool {
        false
    }
}

/// `flex-direction: row-reverse`, or `row` in a right-to-left context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RightToLeftDirector;

impl FlexItemMainDirector for RightToLeftDirector {
    fn is_vertical(&self) -> bool {
        false
    }

    fn is_reversed(&self) -> bool {
        true
    }
}

/// `flex-direction: column`. Items stay in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopToBottomDirector;

impl FlexItemMainDirector for TopToBottomDirector {
    fn is_vertical(&self) -> bool {
        true
    }

    fn is_reversed(&self) -> bool {
        false
    }
}

/// `flex-direction: column-reverse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomToTopDirector;

impl FlexItemMainDirector for BottomToTopDirector {
    fn is_vertical(&self) -> bool {
        true
    }

    fn is_reversed(&self) -> bool {
        true
    }
}
