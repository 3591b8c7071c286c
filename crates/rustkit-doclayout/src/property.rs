//! Renderer properties read by the layout containers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::GridValue;

/// Property keys recognized by the layout containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    ColumnCount,
    ColumnWidth,
    ColumnGap,
    RowGap,
    GridTemplateRows,
    GridTemplateColumns,
    GridAutoRows,
    GridAutoColumns,
    GridFlow,
    GridRowStart,
    GridRowEnd,
    GridRowSpan,
    GridColumnStart,
    GridColumnEnd,
    GridColumnSpan,
    Height,
    MinHeight,
    MaxHeight,
    Width,
    MinWidth,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    /// Set by grid containers so an item stretches to its cell.
    FillAvailableArea,
}

/// A length in points or a percentage of some reference length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitValue {
    Point(f32),
    Percent(f32),
}

impl UnitValue {
    /// Resolve against a reference length. Percentages of an indefinite
    /// reference resolve to `None`.
    pub fn resolve(self, reference: Option<f32>) -> Option<f32> {
        match self {
            Self::Point(value) => Some(value),
            Self::Percent(pct) => reference.map(|r| r * pct / 100.0),
        }
    }
}

/// Auto-placement flow of a grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridFlow {
    #[default]
    Row,
    RowDense,
    Column,
    ColumnDense,
}

impl GridFlow {
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowDense)
    }

    pub fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f32),
    Integer(i32),
    Length(UnitValue),
    Track(GridValue),
    Template(Vec<GridValue>),
    Flow(GridFlow),
    Flag(bool),
}

/// A renderer's property set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    values: HashMap<Property, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: Property, value: PropertyValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: Property, value: PropertyValue) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: Property) -> Option<PropertyValue> {
        self.values.remove(&key)
    }

    pub fn get(&self, key: Property) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: Property) -> bool {
        self.values.contains_key(&key)
    }

    /// A numeric property in points. Integers are widened and point lengths
    /// are unwrapped.
    pub fn number(&self, key: Property) -> Option<f32> {
        match self.get(key)? {
            PropertyValue::Number(value) => Some(*value),
            PropertyValue::Integer(value) => Some(*value as f32),
            PropertyValue::Length(UnitValue::Point(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, key: Property) -> Option<i32> {
        match self.get(key)? {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn length(&self, key: Property) -> Option<UnitValue> {
        match self.get(key)? {
            PropertyValue::Length(value) => Some(*value),
            PropertyValue::Number(value) => Some(UnitValue::Point(*value)),
            _ => None,
        }
    }

    pub fn track(&self, key: Property) -> Option<&GridValue> {
        match self.get(key)? {
            PropertyValue::Track(value) => Some(value),
            _ => None,
        }
    }

    pub fn template(&self, key: Property) -> Option<&[GridValue]> {
        match self.get(key)? {
            PropertyValue::Template(values) => Some(values),
            _ => None,
        }
    }

    pub fn flow(&self, key: Property) -> Option<GridFlow> {
        match self.get(key)? {
            PropertyValue::Flow(flow) => Some(*flow),
            _ => None,
        }
    }

    pub fn flag(&self, key: Property) -> bool {
        matches!(self.get(key), Some(PropertyValue::Flag(true)))
    }

    /// Content height after `HEIGHT`, `MAX_HEIGHT` and `MIN_HEIGHT` are
    /// applied, in that order. An explicit height replaces the content height
    /// and the minimum wins over the maximum.
    pub fn constrain_height(&self, content_height: f32) -> f32 {
        let mut height = self.number(Property::Height).unwrap_or(content_height);
        if let Some(max) = self.number(Property::MaxHeight) {
            height = height.min(max);
        }
        if let Some(min) = self.number(Property::MinHeight) {
            height = height.max(min);
        }
        height
    }

    /// Upper bound on the content height from `HEIGHT` and `MAX_HEIGHT`.
    pub fn height_limit(&self) -> Option<f32> {
        [Property::Height, Property::MaxHeight]
            .into_iter()
            .filter_map(|key| self.number(key))
            .reduce(f32::min)
    }
}
