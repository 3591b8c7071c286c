//! Track sizing along one axis.
//!
//! Resolution order:
//! 1. Fixed and percentage tracks take their size directly
//! 2. Content-sized tracks grow to the contributions of single-track items,
//!    then of items spanning several tracks
//! 3. Free space goes to flexible tracks by flex factor, deflating tracks whose
//!    content floor exceeds their share
//! 4. Leftover space stretches `auto` tracks

use std::collections::HashSet;

use tracing::trace;

use super::value::GridValue;

const EPSILON: f32 = 1e-4;

/// Size needs of one grid item along the sized axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackContribution {
    pub start: usize,
    pub span: usize,
    pub min_content: f32,
    pub max_content: f32,
}

impl TrackContribution {
    pub fn new(start: usize, span: usize, min_content: f32, max_content: f32) -> Self {
        Self {
            start,
            span,
            min_content,
            max_content,
        }
    }
}

/// Resolved track sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSizes {
    pub sizes: Vec<f32>,
    /// Sizes before percentage tracks were expanded against an indefinite
    /// container's resulting size.
    pub original_sizes: Vec<f32>,
    pub gap: f32,
}

fn total_of(sizes: &[f32], gap: f32) -> f32 {
    sizes.iter().sum::<f32>() + gap * sizes.len().saturating_sub(1) as f32
}

impl TrackSizes {
    /// Offset of every track from the start of the axis.
    pub fn positions(&self) -> Vec<f32> {
        let mut position = 0.0;
        self.sizes
            .iter()
            .map(|size| {
                let start = position;
                position += size + self.gap;
                start
            })
            .collect()
    }

    /// Size of `span` tracks from `start`, gaps included.
    pub fn span_size(&self, start: usize, span: usize) -> f32 {
        let end = (start + span).min(self.sizes.len());
        if start >= end {
            return 0.0;
        }
        total_of(&self.sizes[start..end], self.gap)
    }

    pub fn total(&self) -> f32 {
        total_of(&self.sizes, self.gap)
    }

    pub fn original_total(&self) -> f32 {
        total_of(&self.original_sizes, self.gap)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// A resolved sizing function.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    Fixed(f32),
    MinContent,
    MaxContent,
    Auto,
    Flex(f32),
    FitContent(f32),
}

fn min_sizing(value: &GridValue, space: Option<f32>) -> Sizing {
    match value {
        GridValue::Fixed(size) => Sizing::Fixed(*size),
        GridValue::Percent(_) => value.definite_size(space).map_or(Sizing::Auto, Sizing::Fixed),
        GridValue::MinContent => Sizing::MinContent,
        GridValue::MaxContent => Sizing::MaxContent,
        GridValue::MinMax(min, _) => min_sizing(min, space),
        _ => Sizing::Auto,
    }
}

fn max_sizing(value: &GridValue, space: Option<f32>) -> Sizing {
    match value {
        GridValue::Fixed(size) => Sizing::Fixed(*size),
        GridValue::Percent(_) => value.definite_size(space).map_or(Sizing::Auto, Sizing::Fixed),
        GridValue::MinContent => Sizing::MinContent,
        GridValue::MaxContent => Sizing::MaxContent,
        GridValue::Flex(factor) => Sizing::Flex(*factor),
        GridValue::FitContent(limit) => limit
            .resolve(space)
            .map_or(Sizing::MaxContent, Sizing::FitContent),
        GridValue::MinMax(_, max) => max_sizing(max, space),
        _ => Sizing::Auto,
    }
}

#[derive(Debug, Clone)]
struct Track {
    min: Sizing,
    max: Sizing,
    base: f32,
    /// Growth limit, infinite until a contribution sets it.
    limit: f32,
    /// Percentage to expand against the resulting size of an indefinite axis.
    percent: Option<f32>,
}

impl Track {
    fn new(value: &GridValue, space: Option<f32>) -> Self {
        let min = min_sizing(value, space);
        let max = max_sizing(value, space);
        let base = match min {
            Sizing::Fixed(size) => size,
            _ => 0.0,
        };
        let limit = match max {
            Sizing::Fixed(size) => size.max(base),
            Sizing::Flex(_) => base,
            _ => f32::INFINITY,
        };
        let percent = match (value, space) {
            (GridValue::Percent(pct), None) => Some(*pct),
            _ => None,
        };
        Self {
            min,
            max,
            base,
            limit,
            percent,
        }
    }

    fn flex_factor(&self) -> Option<f32> {
        match self.max {
            Sizing::Flex(factor) => Some(factor),
            _ => None,
        }
    }

    fn has_intrinsic_min(&self) -> bool {
        matches!(self.min, Sizing::MinContent | Sizing::MaxContent | Sizing::Auto)
    }

    fn has_intrinsic_max(&self) -> bool {
        matches!(
            self.max,
            Sizing::MinContent | Sizing::MaxContent | Sizing::Auto | Sizing::FitContent(_)
        )
    }

    fn raise_limit(&mut self, value: f32) {
        self.limit = if self.limit.is_infinite() {
            value
        } else {
            self.limit.max(value)
        };
    }

    /// The limit, or the base size while the limit is still infinite.
    fn finite_limit(&self) -> f32 {
        if self.limit.is_infinite() {
            self.base
        } else {
            self.limit
        }
    }
}

/// Sizes the tracks of one axis from their sizing values and item
/// contributions.
#[derive(Debug, Clone)]
pub struct TrackSizer {
    values: Vec<GridValue>,
    gap: f32,
    /// Definite available space, `None` when the axis is indefinite.
    available: Option<f32>,
    contributions: Vec<TrackContribution>,
}

impl TrackSizer {
    pub fn new(values: Vec<GridValue>, gap: f32) -> Self {
        Self {
            values,
            gap,
            available: None,
            contributions: Vec::new(),
        }
    }

    pub fn with_available(mut self, available: Option<f32>) -> Self {
        self.available = available.filter(|a| *a >= 0.0);
        self
    }

    pub fn contribute(&mut self, contribution: TrackContribution) {
        self.contributions.push(contribution);
    }

    fn range(&self, contribution: &TrackContribution, count: usize) -> std::ops::Range<usize> {
        let start = contribution.start.min(count);
        start..(contribution.start + contribution.span.max(1)).min(count)
    }

    fn gaps(&self, tracks: usize) -> f32 {
        self.gap * tracks.saturating_sub(1) as f32
    }

    pub fn size(&self) -> TrackSizes {
        let mut tracks: Vec<Track> = self
            .values
            .iter()
            .map(|value| Track::new(value, self.available))
            .collect();
        let count = tracks.len();
        if count == 0 {
            return TrackSizes {
                gap: self.gap,
                ..TrackSizes::default()
            };
        }

        let crosses_flex = |tracks: &[Track], range: std::ops::Range<usize>| {
            range.into_iter().any(|i| tracks[i].flex_factor().is_some())
        };

        // Single-track items in non-flexible tracks.
        for contribution in self.contributions.iter().filter(|c| c.span <= 1) {
            let Some(track) = tracks.get_mut(contribution.start) else {
                continue;
            };
            if track.flex_factor().is_some() {
                continue;
            }
            match track.min {
                Sizing::MinContent | Sizing::Auto => {
                    track.base = track.base.max(contribution.min_content)
                }
                Sizing::MaxContent => track.base = track.base.max(contribution.max_content),
                _ => {}
            }
            match track.max {
                Sizing::MinContent => track.raise_limit(contribution.min_content),
                Sizing::MaxContent | Sizing::Auto => track.raise_limit(contribution.max_content),
                Sizing::FitContent(limit) => track.raise_limit(
                    contribution.max_content.min(limit).max(contribution.min_content),
                ),
                _ => {}
            }
        }

        // Spanning items outside flexible tracks, smallest spans first.
        let mut spanning: Vec<&TrackContribution> = self
            .contributions
            .iter()
            .filter(|c| c.span > 1 && !crosses_flex(&tracks, self.range(c, count)))
            .collect();
        spanning.sort_by_key(|c| c.span);
        for contribution in spanning {
            let range = self.range(contribution, count);
            let gaps = self.gaps(range.len());

            let current: f32 = tracks[range.clone()].iter().map(|t| t.base).sum::<f32>() + gaps;
            let extra = contribution.min_content - current;
            let targets: Vec<usize> = range.clone().filter(|i| tracks[*i].has_intrinsic_min()).collect();
            if extra > 0.0 && !targets.is_empty() {
                let share = extra / targets.len() as f32;
                for i in &targets {
                    tracks[*i].base += share;
                }
            }

            let current: f32 =
                tracks[range.clone()].iter().map(Track::finite_limit).sum::<f32>() + gaps;
            let extra = contribution.max_content - current;
            let targets: Vec<usize> = range.filter(|i| tracks[*i].has_intrinsic_max()).collect();
            if extra > 0.0 && !targets.is_empty() {
                let share = extra / targets.len() as f32;
                for i in targets {
                    let limit = tracks[i].finite_limit();
                    tracks[i].limit = limit + share;
                }
            }
        }

        // Items crossing flexible tracks grow them by flex factor.
        for contribution in &self.contributions {
            let range = self.range(contribution, count);
            if !crosses_flex(&tracks, range.clone()) {
                continue;
            }
            let current: f32 =
                tracks[range.clone()].iter().map(|t| t.base).sum::<f32>() + self.gaps(range.len());
            let extra = contribution.min_content - current;
            if extra <= 0.0 {
                continue;
            }
            let flex: Vec<(usize, f32)> = range
                .filter_map(|i| tracks[i].flex_factor().map(|f| (i, f)))
                .collect();
            let factor_sum: f32 = flex.iter().map(|(_, f)| f).sum();
            for (i, factor) in &flex {
                let share = if factor_sum > 0.0 {
                    extra * factor / factor_sum
                } else {
                    extra / flex.len() as f32
                };
                tracks[*i].base += share;
            }
        }

        for track in tracks.iter_mut() {
            if track.limit.is_infinite() {
                track.limit = track.base;
            }
            if let Sizing::FitContent(limit) = track.max {
                track.limit = track.limit.min(limit);
            }
            track.limit = track.limit.max(track.base);
        }

        self.maximize(&mut tracks);
        self.expand_flexible_tracks(&mut tracks);
        self.stretch_auto_tracks(&mut tracks);

        let original_sizes: Vec<f32> = tracks.iter().map(|t| t.base).collect();
        let mut sizes = original_sizes.clone();
        if tracks.iter().any(|t| t.percent.is_some()) {
            let total = total_of(&original_sizes, self.gap);
            for (size, track) in sizes.iter_mut().zip(&tracks) {
                if let Some(pct) = track.percent {
                    *size = size.max(total * pct / 100.0);
                }
            }
        }

        trace!(
            tracks = count,
            total = total_of(&sizes, self.gap),
            available = self.available.unwrap_or(-1.0),
            "tracks sized"
        );

        TrackSizes {
            sizes,
            original_sizes,
            gap: self.gap,
        }
    }

    /// Grow non-flexible tracks toward their limits.
    fn maximize(&self, tracks: &mut [Track]) {
        let Some(available) = self.available else {
            for track in tracks.iter_mut().filter(|t| t.flex_factor().is_none()) {
                track.base = track.limit;
            }
            return;
        };

        let mut free = available - self.used(tracks);
        while free > EPSILON {
            let growable: Vec<usize> = (0..tracks.len())
                .filter(|i| {
                    tracks[*i].flex_factor().is_none() && tracks[*i].limit - tracks[*i].base > EPSILON
                })
                .collect();
            if growable.is_empty() {
                break;
            }
            let share = free / growable.len() as f32;
            let mut distributed = 0.0;
            for i in growable {
                let grow = share.min(tracks[i].limit - tracks[i].base);
                tracks[i].base += grow;
                distributed += grow;
            }
            free -= distributed;
        }
    }

    fn expand_flexible_tracks(&self, tracks: &mut [Track]) {
        let flexible: Vec<usize> = (0..tracks.len())
            .filter(|i| tracks[*i].flex_factor().is_some())
            .collect();
        if flexible.is_empty() {
            return;
        }

        let fraction = match self.available {
            Some(available) => Self::find_fraction(tracks, &flexible, available - self.gaps(tracks.len())),
            None => self.indefinite_fraction(tracks, &flexible),
        };
        trace!(fraction, flexible = flexible.len(), "flex fraction resolved");

        for i in flexible {
            let factor = tracks[i].flex_factor().unwrap_or(0.0);
            tracks[i].base = tracks[i].base.max(factor * fraction);
        }
    }

    /// Size of one `fr`, treating tracks whose base exceeds their share as
    /// inflexible until the result is stable.
    fn find_fraction(tracks: &[Track], flexible: &[usize], space: f32) -> f32 {
        let mut flexible: HashSet<usize> = flexible.iter().copied().collect();
        loop {
            let inflexible: f32 = (0..tracks.len())
                .filter(|i| !flexible.contains(i))
                .map(|i| tracks[i].base)
                .sum();
            let factor_sum: f32 = flexible
                .iter()
                .map(|i| tracks[*i].flex_factor().unwrap_or(0.0))
                .sum();
            let fraction = (space - inflexible).max(0.0) / factor_sum.max(1.0);

            let violating: Vec<usize> = flexible
                .iter()
                .copied()
                .filter(|i| tracks[*i].base > tracks[*i].flex_factor().unwrap_or(0.0) * fraction)
                .collect();
            if violating.is_empty() {
                return fraction;
            }
            for i in violating {
                flexible.remove(&i);
            }
            if flexible.is_empty() {
                return 0.0;
            }
        }
    }

    fn indefinite_fraction(&self, tracks: &[Track], flexible: &[usize]) -> f32 {
        let mut fraction: f32 = flexible
            .iter()
            .map(|i| {
                let factor = tracks[*i].flex_factor().unwrap_or(0.0);
                if factor > 1.0 {
                    tracks[*i].base / factor
                } else {
                    tracks[*i].base
                }
            })
            .fold(0.0, f32::max);

        for contribution in &self.contributions {
            let range = self.range(contribution, tracks.len());
            let mut fixed = self.gaps(range.len());
            let mut factor_sum = 0.0;
            for track in &tracks[range] {
                match track.flex_factor() {
                    Some(factor) => factor_sum += factor,
                    None => fixed += track.base,
                }
            }
            if factor_sum > 0.0 {
                let needed = (contribution.max_content - fixed).max(0.0) / f32::max(factor_sum, 1.0);
                fraction = fraction.max(needed);
            }
        }
        fraction
    }

    fn stretch_auto_tracks(&self, tracks: &mut [Track]) {
        if tracks.iter().any(|t| t.flex_factor().is_some()) {
            return;
        }
        let Some(available) = self.available else {
            return;
        };
        let free = available - self.used(tracks);
        let autos: Vec<usize> = (0..tracks.len())
            .filter(|i| tracks[*i].max == Sizing::Auto)
            .collect();
        if free <= EPSILON || autos.is_empty() {
            return;
        }
        let share = free / autos.len() as f32;
        for i in autos {
            tracks[i].base += share;
        }
    }

    fn used(&self, tracks: &[Track]) -> f32 {
        tracks.iter().map(|t| t.base).sum::<f32>() + self.gaps(tracks.len())
    }
}
