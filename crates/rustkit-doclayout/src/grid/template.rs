//! Template resolution: expanding `repeat()` into a flat track list.

use tracing::{debug, trace, warn};

use super::value::{AutoRepeatMode, GridValue};
use crate::LayoutError;

/// An automatic repeat found while walking a template.
#[derive(Debug, Clone)]
struct AutoRepeat {
    /// Index in the resolved list where the repetitions start.
    start: usize,
    mode: AutoRepeatMode,
    values: Vec<GridValue>,
    /// Number of repetitions currently in the resolved list.
    count: usize,
}

/// Expands a grid template along one axis into one value per track.
///
/// Every appended track consumes its definite size plus one gap. The leftover
/// space, with the trailing gap given back, decides how many times an
/// automatic repeat fits.
#[derive(Debug, Clone)]
pub struct GridTemplateResolver {
    /// Available space, `None` when indefinite.
    space: Option<f32>,
    gap: f32,
    used_space: f32,
    contains_intrinsic_or_flexible: bool,
    auto_repeat: Option<AutoRepeat>,
    result: Vec<GridValue>,
}

impl GridTemplateResolver {
    /// A resolver for the given available space. Negative space is treated as
    /// indefinite.
    pub fn new(space: Option<f32>, gap: f32) -> Self {
        Self {
            space: space.filter(|s| *s >= 0.0),
            gap,
            used_space: 0.0,
            contains_intrinsic_or_flexible: false,
            auto_repeat: None,
            result: Vec::new(),
        }
    }

    /// Resolve a template, degrading to "no explicit template" on error.
    pub fn resolve_template(&mut self, template: &[GridValue]) -> Option<Vec<GridValue>> {
        match self.try_resolve_template(template) {
            Ok(values) => Some(values),
            Err(err) => {
                warn!(%err, "grid template ignored");
                self.reset();
                None
            }
        }
    }

    /// Resolve a template, reporting configuration errors.
    pub fn try_resolve_template(
        &mut self,
        template: &[GridValue],
    ) -> Result<Vec<GridValue>, LayoutError> {
        self.reset();

        for value in template {
            match value {
                GridValue::FixedRepeat(count, values) => {
                    value.validate()?;
                    for _ in 0..*count {
                        for inner in values {
                            self.append(inner)?;
                        }
                    }
                }
                GridValue::AutoRepeat(mode, values) => {
                    value.validate()?;
                    if self.auto_repeat.is_some() {
                        return Err(LayoutError::InvalidConfiguration(
                            "only one automatic repeat() is allowed per template".to_string(),
                        ));
                    }
                    if values.iter().any(GridValue::is_intrinsic_or_flexible) {
                        self.contains_intrinsic_or_flexible = true;
                    }
                    self.auto_repeat = Some(AutoRepeat {
                        start: self.result.len(),
                        mode: *mode,
                        values: values.clone(),
                        count: 0,
                    });
                }
                _ => self.append(value)?,
            }
        }

        self.resolve_auto_repeat();
        self.check_fit();
        Ok(self.result.clone())
    }

    fn reset(&mut self) {
        self.used_space = 0.0;
        self.contains_intrinsic_or_flexible = false;
        self.auto_repeat = None;
        self.result.clear();
    }

    fn append(&mut self, value: &GridValue) -> Result<(), LayoutError> {
        value.validate()?;
        let size = match value {
            GridValue::Fixed(_) | GridValue::Percent(_) => value.definite_size(self.space).unwrap_or(0.0),
            GridValue::MinMax(..) => match value.definite_size(self.space) {
                Some(size) => {
                    if value.is_intrinsic_or_flexible() {
                        self.contains_intrinsic_or_flexible = true;
                    }
                    size
                }
                None => {
                    self.contains_intrinsic_or_flexible = true;
                    0.0
                }
            },
            _ => {
                self.contains_intrinsic_or_flexible = true;
                0.0
            }
        };
        self.used_space += size + self.gap;
        self.result.push(value.clone());
        Ok(())
    }

    /// Space left for automatic repetitions, `None` when indefinite.
    fn leftover_space(&self) -> Option<f32> {
        self.space
            .map(|space| space - self.used_space + self.gap)
            .filter(|leftover| *leftover >= 0.0)
    }

    fn resolve_auto_repeat(&mut self) {
        let leftover = self.leftover_space();
        let space = self.space;
        let gap = self.gap;
        let Some(repeat) = self.auto_repeat.as_mut() else {
            return;
        };

        let iteration: f32 = repeat
            .values
            .iter()
            .map(|v| v.definite_size(space).unwrap_or(0.0) + gap)
            .sum();

        let count = match leftover {
            Some(leftover) if iteration > 0.0 => {
                let mut count = 0;
                let mut used = 0.0;
                while used + iteration <= leftover {
                    used += iteration;
                    count += 1;
                }
                count.max(1)
            }
            _ => 1,
        };

        trace!(
            count,
            iteration,
            leftover = leftover.unwrap_or(-1.0),
            "auto-repeat resolved"
        );

        let insert: Vec<GridValue> = (0..count)
            .flat_map(|_| repeat.values.iter().cloned())
            .collect();
        let start = repeat.start;
        repeat.count = count;
        self.used_space += iteration * count as f32;
        self.result.splice(start..start, insert);
    }

    fn check_fit(&self) {
        if self.contains_intrinsic_or_flexible {
            return;
        }
        if let Some(leftover) = self.space.map(|s| s - self.used_space + self.gap) {
            if leftover < 0.0 {
                debug!(overflow = -leftover, "fixed grid tracks exceed the available space");
            }
        }
    }

    pub fn auto_repeat_mode(&self) -> Option<AutoRepeatMode> {
        self.auto_repeat.as_ref().map(|r| r.mode)
    }

    pub fn is_auto_fit(&self) -> bool {
        self.auto_repeat_mode() == Some(AutoRepeatMode::AutoFit)
    }

    /// Number of automatic repetitions in the resolved list.
    pub fn repeat_count(&self) -> usize {
        self.auto_repeat.as_ref().map_or(0, |r| r.count)
    }

    /// Shrink the automatic repetitions so the resolved list has at most
    /// `size_to_fit` tracks, keeping whole repetition groups. An indefinite
    /// originating space allows at most one repetition.
    ///
    /// Returns the resolved list, changed or not.
    pub fn shrink_to_fit(&mut self, size_to_fit: usize) -> Vec<GridValue> {
        let indefinite = self.space.is_none();
        let total = self.result.len();
        let Some(repeat) = self.auto_repeat.as_mut() else {
            return self.result.clone();
        };
        if total <= size_to_fit {
            return self.result.clone();
        }

        let group = repeat.values.len();
        let non_repeat = total - group * repeat.count;
        let mut count = size_to_fit.saturating_sub(non_repeat) / group;
        if indefinite {
            count = count.min(1);
        }
        if count >= repeat.count {
            return self.result.clone();
        }

        trace!(from = repeat.count, to = count, "auto-repeat shrunk to fit");
        let keep_end = repeat.start + count * group;
        let old_end = repeat.start + repeat.count * group;
        repeat.count = count;
        self.result.drain(keep_end..old_end);
        self.result.clone()
    }
}
