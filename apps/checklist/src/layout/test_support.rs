//! Fixtures shared by the layout and render tests.

use crate::layout::geometry::{LabelExtents, LayoutConfig};
use crate::layout::packing::PackingStrategy;
use crate::layout::settings::LayoutSettings;
use crate::models::CategoryCollection;

/// 300 × 200 pt page, 10 pt margins, Courier 10 pt everywhere.
pub fn points_settings() -> LayoutSettings {
    LayoutSettings {
        page_width: 300.0,
        page_height: 200.0,
        left_margin: 10.0,
        right_margin: 10.0,
        top_margin: 10.0,
        bottom_margin: 10.0,
        header_font: "Courier".to_string(),
        header_font_size: 10.0,
        item_font: "Courier".to_string(),
        item_font_size: 10.0,
        row_spacing: 2.0,
        header_spacing: 0.5,
        category_spacing: 0.5,
        item_padding: 2.5,
        col_spacing_factor: 1.0,
        checkbox_factor: 0.9,
        strategy: PackingStrategy::BestFit,
    }
}

pub fn collection(entries: Vec<(&str, Vec<&str>)>) -> CategoryCollection {
    entries
        .into_iter()
        .map(|(name, items)| (name, items.into_iter().map(str::to_string).collect()))
        .collect()
}

/// A category named `name` with `count` generated items.
pub fn numbered_items(name: &str, count: usize) -> (String, Vec<String>) {
    let items = (1..=count).map(|i| format!("{name} item {i}")).collect();
    (name.to_string(), items)
}

/// Geometry where a category with `n` items is exactly `2 + 2n` tall and a column
/// holds `budget` points.
pub fn unit_config(budget: f32, num_columns: usize, strategy: PackingStrategy) -> LayoutConfig {
    let settings = LayoutSettings {
        page_height: budget,
        top_margin: 0.0,
        bottom_margin: 0.0,
        header_font_size: 2.0,
        item_font_size: 2.0,
        row_spacing: 0.0,
        header_spacing: 0.0,
        category_spacing: 0.0,
        strategy,
        ..points_settings()
    };
    let mut config = LayoutConfig::from_extents(
        &settings,
        &LabelExtents {
            max_item_width: 40.0,
            max_header_width: 40.0,
        },
    );
    config.num_columns = num_columns;
    config
}

/// Directory holding the TrueType fixtures used by the font tests.
pub fn fixture_font_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/fonts")
}
