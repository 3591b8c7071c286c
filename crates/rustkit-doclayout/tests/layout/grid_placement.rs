//! Grid placement integration tests
//!
//! These tests verify that a grid container:
//! - Auto-places items in row-major order and grows implicit rows
//! - Resolves `repeat(auto-fit, ...)` against the available width
//! - Honours dense packing and explicit lines

use rustkit_doclayout::{
    AutoRepeatMode, Grid, GridCell, GridContainerRenderer, GridFlow, GridOrder,
    GridTemplateResolver, GridValue, LayoutStatus, Property, PropertyValue, Rect, Renderer,
};

use crate::support::{fixed_columns, init_tracing, page_context, paragraph};

fn origins(renderer: &dyn Renderer) -> Vec<(f32, f32)> {
    renderer
        .child_renderers()
        .iter()
        .map(|child| {
            let bbox = child.occupied_area().expect("child was laid out").bbox;
            (bbox.x, bbox.y)
        })
        .collect()
}

#[test]
fn test_sparse_row_flow_fills_rows_in_order() {
    init_tracing();
    let cells = (0..3).map(GridCell::new).collect();
    let grid = Grid::with_cells(0, 2, GridFlow::Row, cells).unwrap();

    assert_eq!(grid.rows(), 2);
    let positions: Vec<(usize, usize)> = grid
        .cells()
        .iter()
        .map(|cell| (cell.row_start(), cell.column_start()))
        .collect();
    assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0)]);
    assert_eq!(grid.unique_cells(GridOrder::RowMajor).len(), 3);
}

#[test]
fn test_container_places_three_items_on_two_rows() {
    init_tracing();
    let mut grid = GridContainerRenderer::new(
        fixed_columns(&[100.0, 100.0]),
        vec![paragraph(1), paragraph(1), paragraph(1)],
    );
    let result = grid.layout(&page_context(1, 200.0, 500.0)).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert_eq!(result.occupied_height(), 20.0);
    assert_eq!(origins(&grid), vec![(0.0, 0.0), (100.0, 0.0), (0.0, 10.0)]);
}

#[test]
fn test_auto_fit_repeat_count() {
    let template = [GridValue::AutoRepeat(
        AutoRepeatMode::AutoFit,
        vec![GridValue::Fixed(50.0)],
    )];
    let mut resolver = GridTemplateResolver::new(Some(220.0), 10.0);
    let resolved = resolver.resolve_template(&template).unwrap();

    assert_eq!(resolved, vec![GridValue::Fixed(50.0); 3]);
    assert_eq!(resolver.repeat_count(), 3);

    let mut narrower = GridTemplateResolver::new(Some(229.0), 10.0);
    assert_eq!(narrower.resolve_template(&template).unwrap().len(), 3);
    let mut wider = GridTemplateResolver::new(Some(230.0), 10.0);
    assert_eq!(wider.resolve_template(&template).unwrap().len(), 4);
}

#[test]
fn test_auto_fit_container_wraps_after_three_tracks() {
    init_tracing();
    let properties = rustkit_doclayout::Properties::new()
        .with(
            Property::GridTemplateColumns,
            PropertyValue::Template(vec![GridValue::AutoRepeat(
                AutoRepeatMode::AutoFit,
                vec![GridValue::Fixed(50.0)],
            )]),
        )
        .with(Property::ColumnGap, PropertyValue::Number(10.0));
    let children = (0..4).map(|_| paragraph(1)).collect();
    let mut grid = GridContainerRenderer::new(properties, children);
    grid.layout(&page_context(1, 220.0, 500.0)).unwrap();

    assert_eq!(
        origins(&grid),
        vec![(0.0, 0.0), (60.0, 0.0), (120.0, 0.0), (0.0, 10.0)]
    );
}

#[test]
fn test_dense_flow_backfills_holes() {
    init_tracing();
    let build = |flow: GridFlow| {
        let properties =
            fixed_columns(&[50.0, 50.0, 50.0]).with(Property::GridFlow, PropertyValue::Flow(flow));
        let mut wide = paragraph(1);
        wide.set_property(Property::GridColumnSpan, PropertyValue::Integer(2));
        let mut also_wide = paragraph(1);
        also_wide.set_property(Property::GridColumnSpan, PropertyValue::Integer(2));
        GridContainerRenderer::new(properties, vec![wide, also_wide, paragraph(1)])
    };

    let mut sparse = build(GridFlow::Row);
    sparse.layout(&page_context(1, 150.0, 500.0)).unwrap();
    assert_eq!(origins(&sparse)[2], (100.0, 10.0));

    let mut dense = build(GridFlow::RowDense);
    dense.layout(&page_context(1, 150.0, 500.0)).unwrap();
    assert_eq!(origins(&dense)[2], (100.0, 0.0));
}

#[test]
fn test_explicit_lines_place_before_auto_items() {
    init_tracing();
    let mut pinned = paragraph(1);
    pinned.set_property(Property::GridRowStart, PropertyValue::Integer(1));
    pinned.set_property(Property::GridColumnStart, PropertyValue::Integer(1));
    let mut grid = GridContainerRenderer::new(
        fixed_columns(&[100.0, 100.0]),
        vec![paragraph(1), pinned],
    );
    grid.layout(&page_context(1, 200.0, 500.0)).unwrap();

    let areas: Vec<Rect> = grid
        .child_renderers()
        .iter()
        .map(|child| child.occupied_area().unwrap().bbox)
        .collect();
    assert_eq!((areas[0].x, areas[0].y), (100.0, 0.0));
    assert_eq!((areas[1].x, areas[1].y), (0.0, 0.0));
}
