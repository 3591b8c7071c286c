//! Column balancing integration tests
//!
//! These tests verify that multi-column containers:
//! - Derive column count and width from the column properties
//! - Balance content to roughly equal column heights
//! - Stop within the relayout budget

use rustkit_doclayout::{
    calculate_column_count_and_width, ColumnContainerRenderer, LayoutConfig, LayoutStatus,
    MulticolRenderer, Renderer,
};

use crate::support::{columns, init_tracing, page_context, paragraph, LINE_HEIGHT};

fn column_heights(renderer: &dyn Renderer) -> Vec<f32> {
    renderer
        .child_renderers()
        .iter()
        .map(|column| column.child_renderers().len() as f32 * LINE_HEIGHT)
        .collect()
}

#[test]
fn test_column_formula() {
    let (count, width) = calculate_column_count_and_width(100.0, None, Some(30.0), 10.0).unwrap();
    assert_eq!(count, 3);
    assert!((width - 26.666_666).abs() < 1e-3);

    let (count, width) = calculate_column_count_and_width(210.0, Some(2), None, 10.0).unwrap();
    assert_eq!((count, width), (2, 100.0));
}

#[test]
fn test_multicol_balances_two_columns() {
    init_tracing();
    let mut multicol = MulticolRenderer::new(columns(2, 10.0), vec![paragraph(30)]);
    let result = multicol.layout(&page_context(1, 210.0, 800.0)).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert!((result.occupied_height() - 150.0).abs() < 0.01);
    assert_eq!(column_heights(&multicol), vec![150.0, 150.0]);

    let second = multicol.child_renderers()[1].occupied_area().unwrap().bbox;
    assert_eq!(second.x, 110.0);
    assert_eq!(second.width, 100.0);
}

#[test]
fn test_multicol_converges_within_budget() {
    init_tracing();
    for lines in [7, 19, 25, 31] {
        let mut multicol = MulticolRenderer::new(columns(3, 5.0), vec![paragraph(lines)]);
        let result = multicol.layout(&page_context(1, 300.0, 800.0)).unwrap();
        assert_eq!(result.status, LayoutStatus::Full, "{lines} lines");

        let placed: f32 = column_heights(&multicol).iter().sum();
        assert_eq!(placed, lines as f32 * LINE_HEIGHT);
        let lower_bound = lines as f32 * LINE_HEIGHT / 3.0;
        assert!(result.occupied_height() >= lower_bound - 0.01);
    }
}

#[test]
fn test_exhausted_budget_leaves_overflow() {
    init_tracing();
    let context = page_context(1, 210.0, 800.0).with_config(LayoutConfig::default().with_max_relayouts(0));
    let mut multicol = MulticolRenderer::new(columns(2, 10.0), vec![paragraph(25)]);
    let result = multicol.layout(&context).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    let rest = result.overflow_renderer.unwrap();
    assert_eq!(rest.child_renderers()[0].child_renderers().len(), 1);
}

#[test]
fn test_column_container_flows_several_children() {
    init_tracing();
    let children = vec![paragraph(4), paragraph(3), paragraph(5)];
    let mut container = ColumnContainerRenderer::new(columns(3, 10.0), children);
    let result = container.layout(&page_context(1, 320.0, 800.0)).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert_eq!(result.occupied_height(), 40.0);
    let columns = container.child_renderers();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[2].occupied_area().unwrap().bbox.x, 220.0);
}
