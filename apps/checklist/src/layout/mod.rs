// Layout engine: label measurement, column geometry, category packing, fill analysis.
// Pure and synchronous; computed once per run, then handed to the renderer.

pub mod font_metrics;
pub mod geometry;
pub mod packing;
pub mod page_fill;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the public API consumed by main and the renderer.
pub use geometry::LayoutConfig;
pub use packing::{pack, Column, TracingObserver};
pub use page_fill::{analyze_page_fill, check_page_limit, PageFillAnalysis};
pub use settings::LayoutSettings;
