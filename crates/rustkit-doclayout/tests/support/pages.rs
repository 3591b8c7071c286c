//! Page-by-page layout driver.

use rustkit_doclayout::{
    LayoutArea, LayoutConfig, LayoutContext, LayoutError, LayoutStatus, Rect, Renderer,
};

const MAX_PAGES: u32 = 50;

/// One laid-out page.
#[derive(Debug)]
pub struct Page {
    pub number: u32,
    pub status: LayoutStatus,
    pub content: Box<dyn Renderer>,
}

/// Context for a page of the given size.
pub fn page_context(page: u32, width: f32, height: f32) -> LayoutContext {
    LayoutContext::new(LayoutArea::new(page, Rect::new(0.0, 0.0, width, height)))
}

/// Lay `renderer` out on pages of the given size until everything is placed.
///
/// Panics when a page places nothing at all, since the next page would fail
/// the same way.
pub fn paginate(
    renderer: Box<dyn Renderer>,
    width: f32,
    height: f32,
    config: LayoutConfig,
) -> Result<Vec<Page>, LayoutError> {
    let mut pages = Vec::new();
    let mut current = renderer;

    for number in 1..=MAX_PAGES {
        let context = page_context(number, width, height).with_config(config);
        let result = current.layout(&context)?;
        match result.status {
            LayoutStatus::Full => {
                pages.push(Page {
                    number,
                    status: result.status,
                    content: current,
                });
                return Ok(pages);
            }
            LayoutStatus::Partial => {
                let split = result.split_renderer.expect("partial result has a split part");
                pages.push(Page {
                    number,
                    status: result.status,
                    content: split,
                });
                current = result
                    .overflow_renderer
                    .expect("partial result has an overflow part");
            }
            LayoutStatus::Nothing => panic!("page {number} placed nothing"),
        }
    }
    panic!("content did not finish within {MAX_PAGES} pages")
}
