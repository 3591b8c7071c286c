//! # Grid Layout
//!
//! Grid containers for paged documents.
//!
//! ## Overview
//!
//! A layout pass runs through these stages:
//! - [`GridTemplateResolver`] flattens `repeat()` into one value per track
//! - [`Grid`] places items: explicit positions first, then the auto-placement
//!   scan driven by [`GridView`]
//! - [`GridSizer`] sizes columns from content widths and rows from trial
//!   layouts, using [`TrackSizer`] for each axis
//! - [`GridContainerRenderer`] lays out every cell and splits across pages

mod cell;
mod container;
mod matrix;
mod sizer;
mod template;
mod track_sizer;
mod value;
mod view;

pub use cell::GridCell;
pub use container::GridContainerRenderer;
pub use matrix::{Grid, GridOrder};
pub use sizer::{AxisTemplate, GridSizer, GridSizingResult};
pub use template::GridTemplateResolver;
pub use track_sizer::{TrackContribution, TrackSizer, TrackSizes};
pub use value::{AutoRepeatMode, GridValue};
pub use view::{Cursor, GridView};
