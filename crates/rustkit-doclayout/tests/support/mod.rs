//! Test support utilities for layout integration tests
//!
//! - `init_tracing`: routes `RUST_LOG` to the test output
//! - document builders for lines, paragraphs and grids
//! - `paginate`: lays a renderer out page after page

mod documents;
mod pages;

pub use documents::*;
pub use pages::*;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
