//! Layout integration tests
//!
//! - `grid_placement`: placement and template resolution through the container
//! - `column_balancing`: balanced column heights and relayout budgets
//! - `page_splitting`: continuation of grids and columns on following pages

mod column_balancing;
mod grid_placement;
mod page_splitting;
