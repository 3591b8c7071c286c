//! Page splitting integration tests
//!
//! These tests verify that content which does not fit a page:
//! - Continues on the next page with renumbered grid rows
//! - Keeps its column tracks across pages
//! - Is fully placed once enough pages are laid out

use rustkit_doclayout::{
    ColumnContainerRenderer, GridContainerRenderer, LayoutConfig, LayoutStatus, MulticolRenderer,
    Property, Renderer,
};

use crate::support::{columns, fixed_columns, init_tracing, paginate, paragraph};

fn count_lines(renderer: &dyn Renderer) -> usize {
    let children = renderer.child_renderers();
    if children.is_empty() {
        return 1;
    }
    children.iter().map(|child| count_lines(child.as_ref())).sum()
}

#[test]
fn test_grid_continues_on_second_page() {
    init_tracing();
    let children = (0..6).map(|_| paragraph(2)).collect();
    let grid = GridContainerRenderer::new(fixed_columns(&[100.0, 100.0]), children);
    let pages = paginate(Box::new(grid), 200.0, 30.0, LayoutConfig::default()).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].status, LayoutStatus::Partial);
    assert_eq!(pages[1].status, LayoutStatus::Full);

    let first = pages[0].content.child_renderers();
    assert_eq!(first.len(), 4);
    assert_eq!(first[2].occupied_area().unwrap().bbox.height, 10.0);

    let second = &pages[1].content;
    assert!(second.properties().get(Property::GridTemplateColumns).is_some());
    assert!(second.properties().get(Property::GridTemplateRows).is_none());
    let continued = second.child_renderers();
    assert_eq!(continued.len(), 4);

    let origins: Vec<(f32, f32)> = continued
        .iter()
        .map(|child| {
            let bbox = child.occupied_area().unwrap().bbox;
            (bbox.x, bbox.y)
        })
        .collect();
    assert_eq!(origins, vec![(0.0, 0.0), (100.0, 0.0), (0.0, 10.0), (100.0, 10.0)]);
    assert!(continued.iter().all(|child| child.occupied_area().unwrap().page_number == 2));
}

#[test]
fn test_every_line_is_placed_exactly_once() {
    init_tracing();
    let children = (0..7).map(|i| paragraph(1 + i % 3)).collect();
    let grid = GridContainerRenderer::new(fixed_columns(&[100.0, 100.0]), children);
    let pages = paginate(Box::new(grid), 200.0, 35.0, LayoutConfig::default()).unwrap();

    assert!(pages.len() > 1);
    let placed: usize = pages.iter().map(|page| count_lines(page.content.as_ref())).sum();
    assert_eq!(placed, (0..7).map(|i| 1 + i % 3).sum::<usize>());
    assert_eq!(pages.last().unwrap().status, LayoutStatus::Full);
}

#[test]
fn test_multicol_continues_on_next_page() {
    init_tracing();
    let multicol = MulticolRenderer::new(columns(2, 10.0), vec![paragraph(30)]);
    let pages = paginate(Box::new(multicol), 210.0, 100.0, LayoutConfig::default()).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(count_lines(pages[0].content.as_ref()), 20);
    assert_eq!(count_lines(pages[1].content.as_ref()), 10);
    let id = pages[0].content.id();
    assert_eq!(pages[1].content.id(), id);
}

#[test]
fn test_column_container_continues_on_next_page() {
    init_tracing();
    let children = vec![paragraph(6), paragraph(6)];
    let container = ColumnContainerRenderer::new(columns(2, 10.0), children);
    let pages = paginate(Box::new(container), 210.0, 40.0, LayoutConfig::default()).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(count_lines(pages[0].content.as_ref()), 8);
    assert_eq!(count_lines(pages[1].content.as_ref()), 4);
}
