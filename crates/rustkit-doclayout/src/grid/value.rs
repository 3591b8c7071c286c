//! Track size values.

use serde::{Deserialize, Serialize};

use crate::property::UnitValue;
use crate::LayoutError;

/// How an automatic `repeat()` treats repetitions that end up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoRepeatMode {
    /// Empty repetitions collapse once placement is known.
    AutoFit,
    /// Empty repetitions keep their size.
    AutoFill,
}

/// A track sizing value as written in a grid template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridValue {
    /// Fixed length in points.
    Fixed(f32),
    /// Percentage of the container size (0.0-100.0).
    Percent(f32),
    MinContent,
    MaxContent,
    Auto,
    /// Flexible fraction (`fr`).
    Flex(f32),
    FitContent(UnitValue),
    MinMax(Box<GridValue>, Box<GridValue>),
    FixedRepeat(u32, Vec<GridValue>),
    AutoRepeat(AutoRepeatMode, Vec<GridValue>),
}

impl GridValue {
    pub fn minmax(min: GridValue, max: GridValue) -> Self {
        Self::MinMax(Box::new(min), Box::new(max))
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self, Self::FixedRepeat(..) | Self::AutoRepeat(..))
    }

    pub fn is_flexible(&self) -> bool {
        matches!(self, Self::Flex(_))
    }

    /// Content-based or flexible sizing somewhere in this value.
    pub fn is_intrinsic_or_flexible(&self) -> bool {
        match self {
            Self::Auto | Self::MinContent | Self::MaxContent | Self::Flex(_) | Self::FitContent(_) => {
                true
            }
            Self::MinMax(min, max) => {
                max.is_intrinsic_or_flexible() || min.is_intrinsic_or_flexible()
            }
            Self::Fixed(_) | Self::Percent(_) => false,
            Self::FixedRepeat(_, values) | Self::AutoRepeat(_, values) => {
                values.iter().any(GridValue::is_intrinsic_or_flexible)
            }
        }
    }

    /// Size of the value when it does not depend on content.
    ///
    /// For `minmax()` the maximum is used if definite, the minimum otherwise.
    /// Percentages of an indefinite `space` are not definite.
    pub fn definite_size(&self, space: Option<f32>) -> Option<f32> {
        match self {
            Self::Fixed(size) => Some(*size),
            Self::Percent(pct) => space.map(|s| s * pct / 100.0),
            Self::MinMax(min, max) => max.definite_size(space).or_else(|| min.definite_size(space)),
            _ => None,
        }
    }

    /// Flex factor of a flexible track or of a `minmax()` with a flexible maximum.
    pub fn flex_factor(&self) -> Option<f32> {
        match self {
            Self::Flex(factor) => Some(*factor),
            Self::MinMax(_, max) => max.flex_factor(),
            _ => None,
        }
    }

    /// Reject values no template may contain.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            Self::Fixed(size) if *size < 0.0 => Err(LayoutError::InvalidConfiguration(format!(
                "negative track size {size}"
            ))),
            Self::Flex(factor) if *factor < 0.0 => Err(LayoutError::InvalidConfiguration(
                format!("negative flex factor {factor}"),
            )),
            Self::MinMax(min, max) => {
                if min.is_flexible() {
                    return Err(LayoutError::InvalidConfiguration(
                        "minmax() minimum cannot be a flexible fraction".to_string(),
                    ));
                }
                if min.is_repeat() || max.is_repeat() {
                    return Err(LayoutError::InvalidConfiguration(
                        "repeat() is not allowed inside minmax()".to_string(),
                    ));
                }
                min.validate()?;
                max.validate()
            }
            Self::FixedRepeat(_, values) | Self::AutoRepeat(_, values) => {
                if values.is_empty() {
                    return Err(LayoutError::InvalidConfiguration(
                        "repeat() needs at least one track".to_string(),
                    ));
                }
                if let Self::FixedRepeat(0, _) = self {
                    return Err(LayoutError::InvalidConfiguration(
                        "repeat() count must be positive".to_string(),
                    ));
                }
                for value in values {
                    if value.is_repeat() {
                        return Err(LayoutError::InvalidConfiguration(
                            "nested repeat()".to_string(),
                        ));
                    }
                    value.validate()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
