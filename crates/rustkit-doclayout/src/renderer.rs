//! The renderer contract shared by every layout participant.
//!
//! A renderer is laid out into a [`LayoutContext`] and answers with a
//! [`LayoutResult`]:
//!
//! - `Full`: the renderer itself is the laid-out part and keeps its occupied area.
//! - `Partial`: `split_renderer` holds the part that fit, `overflow_renderer`
//!   the part that continues in the next area.
//! - `Nothing`: `overflow_renderer` is a fresh copy of the whole renderer and
//!   `cause_of_nothing` names the renderer that could not be placed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::LayoutConfig;
use crate::property::{Properties, Property, PropertyValue};
use crate::{LayoutError, Rect};

/// Process-unique identifier of a renderer. Clones and split parts of a
/// renderer keep the identifier of the renderer they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(u64);

impl RendererId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for RendererId {
    fn default() -> Self {
        Self::new()
    }
}

/// A rectangle on a given page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutArea {
    pub page_number: u32,
    pub bbox: Rect,
}

impl LayoutArea {
    pub fn new(page_number: u32, bbox: Rect) -> Self {
        Self { page_number, bbox }
    }
}

/// Everything a renderer needs to lay itself out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub area: LayoutArea,
    pub config: LayoutConfig,
}

impl LayoutContext {
    pub fn new(area: LayoutArea) -> Self {
        Self {
            area,
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// A context for a nested layout on the same page with the same config.
    pub fn with_bbox(&self, bbox: Rect) -> Self {
        Self {
            area: LayoutArea::new(self.area.page_number, bbox),
            config: self.config,
        }
    }

    /// A context with the given width and an effectively unbounded height,
    /// used for trial layouts.
    pub fn unbounded(&self, width: f32) -> Self {
        let bbox = self.area.bbox;
        self.with_bbox(Rect::new(bbox.x, bbox.y, width, self.config.unbounded_height))
    }
}

/// Outcome of a layout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    Full,
    Partial,
    Nothing,
}

/// The result of laying out a renderer.
#[derive(Debug)]
pub struct LayoutResult {
    pub status: LayoutStatus,
    pub occupied_area: Option<LayoutArea>,
    pub split_renderer: Option<Box<dyn Renderer>>,
    pub overflow_renderer: Option<Box<dyn Renderer>>,
    pub cause_of_nothing: Option<RendererId>,
}

impl LayoutResult {
    pub fn full(occupied_area: LayoutArea) -> Self {
        Self {
            status: LayoutStatus::Full,
            occupied_area: Some(occupied_area),
            split_renderer: None,
            overflow_renderer: None,
            cause_of_nothing: None,
        }
    }

    pub fn partial(
        occupied_area: LayoutArea,
        split_renderer: Box<dyn Renderer>,
        overflow_renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            status: LayoutStatus::Partial,
            occupied_area: Some(occupied_area),
            split_renderer: Some(split_renderer),
            overflow_renderer: Some(overflow_renderer),
            cause_of_nothing: None,
        }
    }

    pub fn nothing(overflow_renderer: Box<dyn Renderer>, cause: RendererId) -> Self {
        Self {
            status: LayoutStatus::Nothing,
            occupied_area: None,
            split_renderer: None,
            overflow_renderer: Some(overflow_renderer),
            cause_of_nothing: Some(cause),
        }
    }

    pub fn is_full(&self) -> bool {
        self.status == LayoutStatus::Full
    }

    /// Height of the occupied area, zero when nothing was placed.
    pub fn occupied_height(&self) -> f32 {
        self.occupied_area.map_or(0.0, |area| area.bbox.height)
    }
}

/// Minimum and maximum content width of a renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MinMaxWidth {
    pub min: f32,
    pub max: f32,
}

impl MinMaxWidth {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Widest of two contributions.
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.max(other.min), self.max.max(other.max))
    }

    /// Grow both bounds by a fixed amount.
    pub fn grow(self, amount: f32) -> Self {
        Self::new(self.min + amount, self.max + amount)
    }
}

/// A layout participant.
pub trait Renderer: fmt::Debug {
    fn id(&self) -> RendererId;

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    fn get_property(&self, key: Property) -> Option<&PropertyValue> {
        self.properties().get(key)
    }

    fn set_property(&mut self, key: Property, value: PropertyValue) {
        self.properties_mut().set(key, value);
    }

    fn layout(&mut self, context: &LayoutContext) -> Result<LayoutResult, LayoutError>;

    /// Area occupied by the last successful layout.
    fn occupied_area(&self) -> Option<LayoutArea>;

    fn child_renderers(&self) -> &[Box<dyn Renderer>];

    /// Translate the renderer and everything laid out inside it.
    fn move_by(&mut self, dx: f32, dy: f32);

    fn min_max_width(&self) -> MinMaxWidth;

    /// A fresh copy with the same id and properties and no layout state.
    fn clone_renderer(&self) -> Box<dyn Renderer>;
}

/// Clone a list of renderers, dropping their layout state.
pub(crate) fn clone_all(renderers: &[Box<dyn Renderer>]) -> Vec<Box<dyn Renderer>> {
    renderers.iter().map(|r| r.clone_renderer()).collect()
}
