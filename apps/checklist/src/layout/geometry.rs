//! Derived page and column geometry.
//!
//! `LayoutConfig` is computed once per run from the resolved settings and the measured
//! label widths, then treated as read-only by the packing engine and the renderer.
//!
//! Conventions:
//! - usable width is `page_width - left_margin - right_margin`,
//! - the column gutter is counted once, inside `col_width`,
//! - `num_columns` is never less than 1.

use tracing::debug;

use crate::errors::AppError;
use crate::layout::font_metrics::FontMetrics;
use crate::layout::packing::PackingStrategy;
use crate::layout::settings::LayoutSettings;
use crate::models::{Category, CategoryCollection};

/// Widest labels in the collection, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelExtents {
    pub max_item_width: f32,
    pub max_header_width: f32,
}

impl LabelExtents {
    /// Measures every item in the item font and every category name in the header font.
    ///
    /// Fails on an empty collection: there is nothing to size the columns from.
    pub fn measure(
        categories: &CategoryCollection,
        settings: &LayoutSettings,
        header_metrics: &dyn FontMetrics,
        item_metrics: &dyn FontMetrics,
    ) -> Result<Self, AppError> {
        if categories.is_empty() {
            return Err(AppError::EmptyCollection);
        }

        let max_item_width = categories
            .iter()
            .flat_map(|c| c.items.iter())
            .map(|item| item_metrics.text_width(item, settings.item_font_size))
            .fold(0.0_f32, f32::max);
        let max_header_width = categories
            .iter()
            .map(|c| header_metrics.text_width(&c.name, settings.header_font_size))
            .fold(0.0_f32, f32::max);

        Ok(LabelExtents {
            max_item_width,
            max_header_width,
        })
    }

    pub fn max_label_width(&self) -> f32 {
        self.max_item_width.max(self.max_header_width)
    }
}

/// Fully resolved layout parameters. All lengths in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub header_font: String,
    pub header_font_size: f32,
    pub item_font: String,
    pub item_font_size: f32,
    pub row_spacing: f32,
    pub header_spacing: f32,
    pub category_spacing: f32,
    pub item_padding: f32,
    pub col_spacing: f32,
    pub col_width: f32,
    pub num_columns: usize,
    pub checkbox_size: f32,
    pub strategy: PackingStrategy,
}

impl LayoutConfig {
    /// Measures the collection and derives column count, width and checkbox size.
    pub fn derive(
        settings: &LayoutSettings,
        categories: &CategoryCollection,
        header_metrics: &dyn FontMetrics,
        item_metrics: &dyn FontMetrics,
    ) -> Result<Self, AppError> {
        let extents = LabelExtents::measure(categories, settings, header_metrics, item_metrics)?;
        let config = Self::from_extents(settings, &extents);
        debug!(
            max_item_width = extents.max_item_width,
            max_header_width = extents.max_header_width,
            col_spacing = config.col_spacing,
            col_width = config.col_width,
            num_columns = config.num_columns,
            "Derived layout geometry"
        );
        Ok(config)
    }

    pub fn from_extents(settings: &LayoutSettings, extents: &LabelExtents) -> Self {
        let col_spacing = settings.col_spacing_factor * settings.item_font_size;
        let col_width = extents.max_label_width() + col_spacing;

        let mut config = LayoutConfig {
            page_width: settings.page_width,
            page_height: settings.page_height,
            left_margin: settings.left_margin,
            right_margin: settings.right_margin,
            top_margin: settings.top_margin,
            bottom_margin: settings.bottom_margin,
            header_font: settings.header_font.clone(),
            header_font_size: settings.header_font_size,
            item_font: settings.item_font.clone(),
            item_font_size: settings.item_font_size,
            row_spacing: settings.row_spacing,
            header_spacing: settings.header_spacing,
            category_spacing: settings.category_spacing,
            item_padding: settings.item_padding,
            col_spacing,
            col_width,
            num_columns: 1,
            checkbox_size: settings.checkbox_factor * settings.item_font_size,
            strategy: settings.strategy.clone(),
        };
        config.num_columns = determine_columns(config.usable_width(), col_width);
        config
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.left_margin - self.right_margin
    }

    /// The packing budget of a single column.
    pub fn usable_height(&self) -> f32 {
        self.page_height - self.top_margin - self.bottom_margin
    }

    /// Height of the header block: header line, its row gap, and the spacing below the
    /// header and after the category.
    pub fn header_block_height(&self) -> f32 {
        (1.0 + self.header_spacing + self.category_spacing) * self.header_font_size
            + self.row_spacing
    }

    pub fn item_row_height(&self) -> f32 {
        self.item_font_size + self.row_spacing
    }

    /// Vertical space a category consumes in a column. Recomputed on every call.
    pub fn category_height(&self, category: &Category) -> f32 {
        self.header_block_height() + category.items.len() as f32 * self.item_row_height()
    }
}

/// `floor(usable_width / col_width)`, at least 1.
pub fn determine_columns(usable_width: f32, col_width: f32) -> usize {
    if col_width <= 0.0 || usable_width <= 0.0 {
        return 1;
    }
    ((usable_width / col_width).floor() as usize).max(1)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::StandardFont;
    use crate::layout::test_support::{collection, points_settings};

    #[test]
    fn test_extents_use_respective_fonts() {
        let categories = collection(vec![("Dairy", vec!["Milk", "Cheddar"])]);
        let settings = points_settings();
        let extents = LabelExtents::measure(
            &categories,
            &settings,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        // Courier: 6pt per character at 10pt.
        assert!((extents.max_item_width - 42.0).abs() < 1e-3);
        assert!((extents.max_header_width - 30.0).abs() < 1e-3);
        assert!((extents.max_label_width() - 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_collection_is_a_validation_failure() {
        let settings = points_settings();
        let err = LabelExtents::measure(
            &CategoryCollection::new(),
            &settings,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::EmptyCollection));
    }

    #[test]
    fn test_category_without_items_is_measured_by_header() {
        let categories = collection(vec![("Household", vec![])]);
        let settings = points_settings();
        let extents = LabelExtents::measure(
            &categories,
            &settings,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        assert_eq!(extents.max_item_width, 0.0);
        assert!((extents.max_header_width - 54.0).abs() < 1e-3);
    }

    #[test]
    fn test_derive_column_geometry() {
        // Longest label "Cheddar" = 42pt, col_spacing = 10pt -> col_width = 52pt.
        // Usable width 280pt -> floor(280 / 52) = 5 columns.
        let categories = collection(vec![("Dairy", vec!["Milk", "Cheddar"])]);
        let config = LayoutConfig::derive(
            &points_settings(),
            &categories,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        assert!((config.col_spacing - 10.0).abs() < 1e-4);
        assert!((config.col_width - 52.0).abs() < 1e-3);
        assert_eq!(config.num_columns, 5);
        assert!((config.checkbox_size - 9.0).abs() < 1e-4);
        assert!((config.usable_width() - 280.0).abs() < 1e-4);
        assert!((config.usable_height() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_columns_never_below_one() {
        assert_eq!(determine_columns(100.0, 500.0), 1);
        assert_eq!(determine_columns(-20.0, 50.0), 1);
        assert_eq!(determine_columns(100.0, 0.0), 1);
        assert_eq!(determine_columns(100.0, 50.0), 2);
        assert_eq!(determine_columns(99.9, 50.0), 1);
    }

    #[test]
    fn test_narrow_page_with_wide_content_yields_one_column() {
        let mut settings = points_settings();
        settings.page_width = 40.0;
        let categories = collection(vec![(
            "A very long category name",
            vec!["An even longer item label"],
        )]);
        let config = LayoutConfig::derive(
            &settings,
            &categories,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        assert_eq!(config.num_columns, 1);
    }

    #[test]
    fn test_category_height_formula() {
        let categories = collection(vec![("Dairy", vec!["Milk", "Cheddar", "Butter"])]);
        let config = LayoutConfig::derive(
            &points_settings(),
            &categories,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        // Header block: (1 + 0.5 + 0.5) * 10 + 2 = 22; items: 3 * (10 + 2) = 36.
        let dairy = categories.get("Dairy").unwrap();
        assert!((config.category_height(dairy) - 58.0).abs() < 1e-4);
    }

    #[test]
    fn test_category_height_tracks_config_changes() {
        let categories = collection(vec![("Dairy", vec!["Milk"])]);
        let mut config = LayoutConfig::derive(
            &points_settings(),
            &categories,
            &StandardFont::Courier,
            &StandardFont::Courier,
        )
        .unwrap();
        let dairy = categories.get("Dairy").unwrap();
        let before = config.category_height(dairy);
        config.item_font_size = 20.0;
        assert!((config.category_height(dairy) - before - 10.0).abs() < 1e-4);
    }
}
