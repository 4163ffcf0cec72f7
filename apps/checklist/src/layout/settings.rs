//! Typed view over the raw `settings` map of the input document.
//!
//! Page geometry (width, height, margins) is given in the document's `unit`
//! (`in` by default, `mm` or `pt`). Font sizes, `row_spacing` and `item_padding` are
//! always points. Everything is converted to points here; downstream code never sees
//! another unit.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::layout::packing::PackingStrategy;

pub const POINTS_PER_INCH: f32 = 72.0;
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

const DEFAULT_COL_SPACING_FACTOR: f32 = 1.0;
const DEFAULT_CHECKBOX_FACTOR: f32 = 0.9;
/// Gap between checkbox and label, as a fraction of the item font size.
const DEFAULT_ITEM_PADDING_FACTOR: f32 = 0.25;

// ────────────────────────────────────────────────────────────────────────────
// Units
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Inch,
    Millimetre,
    Point,
}

impl LengthUnit {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" | "inch" => Some(LengthUnit::Inch),
            "mm" => Some(LengthUnit::Millimetre),
            "pt" => Some(LengthUnit::Point),
            _ => None,
        }
    }

    pub fn to_points(&self, value: f32) -> f32 {
        match self {
            LengthUnit::Inch => value * POINTS_PER_INCH,
            LengthUnit::Millimetre => value * POINTS_PER_MM,
            LengthUnit::Point => value,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolved settings
// ────────────────────────────────────────────────────────────────────────────

/// Resolved layout inputs. Every length is in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
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
    /// Absolute gap after every header and item row.
    pub row_spacing: f32,
    /// Extra space below a header, in header font-size units.
    pub header_spacing: f32,
    /// Extra space after a category, in header font-size units.
    pub category_spacing: f32,
    pub item_padding: f32,
    /// Column gutter in item font-size units.
    pub col_spacing_factor: f32,
    /// Checkbox edge in item font-size units.
    pub checkbox_factor: f32,
    pub strategy: PackingStrategy,
}

impl LayoutSettings {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, AppError> {
        let unit = match map.get("unit") {
            None => LengthUnit::default(),
            Some(value) => value
                .as_str()
                .and_then(LengthUnit::from_name)
                .ok_or_else(|| invalid("unit", "expected one of \"in\", \"mm\", \"pt\""))?,
        };

        let length = |key: &str| -> Result<f32, AppError> {
            Ok(unit.to_points(require_number(map, key)?))
        };

        let page_width = positive("page_width", length("page_width")?)?;
        let page_height = positive("page_height", length("page_height")?)?;
        let left_margin = non_negative("left_margin", length("left_margin")?)?;
        let right_margin = non_negative("right_margin", length("right_margin")?)?;
        let top_margin = non_negative("top_margin", length("top_margin")?)?;
        let bottom_margin = non_negative("bottom_margin", length("bottom_margin")?)?;

        let header_font = require_string(map, "header_font")?;
        let header_font_size = positive("header_font_size", require_number(map, "header_font_size")?)?;
        let item_font = require_string(map, "item_font")?;
        let item_font_size = positive("item_font_size", require_number(map, "item_font_size")?)?;

        let row_spacing = non_negative("row_spacing", require_number(map, "row_spacing")?)?;
        let header_spacing = non_negative("header_spacing", require_number(map, "header_spacing")?)?;
        let category_spacing =
            non_negative("category_spacing", require_number(map, "category_spacing")?)?;

        let item_padding = match optional_number(map, "item_padding")? {
            Some(v) => non_negative("item_padding", v)?,
            None => DEFAULT_ITEM_PADDING_FACTOR * item_font_size,
        };
        let col_spacing_factor = match optional_number(map, "col_spacing_factor")? {
            Some(v) => non_negative("col_spacing_factor", v)?,
            None => DEFAULT_COL_SPACING_FACTOR,
        };
        let checkbox_factor = match optional_number(map, "checkbox_factor")? {
            Some(v) => positive("checkbox_factor", v)?,
            None => DEFAULT_CHECKBOX_FACTOR,
        };

        let fit_method = match map.get("fit_method") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.as_str()),
            Some(other) => {
                warn!("Invalid fit method {other}, defaulting to 'best_fit'");
                None
            }
        };
        let category_order = optional_string_list(map, "category_order")?;
        let strategy = PackingStrategy::resolve(fit_method, category_order);

        Ok(LayoutSettings {
            page_width,
            page_height,
            left_margin,
            right_margin,
            top_margin,
            bottom_margin,
            header_font,
            header_font_size,
            item_font,
            item_font_size,
            row_spacing,
            header_spacing,
            category_spacing,
            item_padding,
            col_spacing_factor,
            checkbox_factor,
            strategy,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Key helpers
// ────────────────────────────────────────────────────────────────────────────

fn invalid(key: &str, reason: impl Into<String>) -> AppError {
    AppError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn require<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a Value, AppError> {
    map.get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::MissingSetting(key.to_string()))
}

fn as_number(key: &str, value: &Value) -> Result<f32, AppError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, format!("expected a finite number, got {value}")))
}

fn require_number(map: &Map<String, Value>, key: &str) -> Result<f32, AppError> {
    as_number(key, require(map, key)?)
}

fn optional_number(map: &Map<String, Value>, key: &str) -> Result<Option<f32>, AppError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_number(key, value).map(Some),
    }
}

fn require_string(map: &Map<String, Value>, key: &str) -> Result<String, AppError> {
    match require(map, key)? {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        other => Err(invalid(key, format!("expected a non-empty string, got {other}"))),
    }
}

fn optional_string_list(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, AppError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, format!("expected strings, got {v}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(invalid(key, format!("expected a list of strings, got {other}"))),
    }
}

fn positive(key: &str, value: f32) -> Result<f32, AppError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(key, format!("must be greater than zero, got {value}")))
    }
}

fn non_negative(key: &str, value: f32) -> Result<f32, AppError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(key, format!("must not be negative, got {value}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn letter_settings() -> Map<String, Value> {
        let value = json!({
            "page_width": 8.5,
            "page_height": 11,
            "left_margin": 0.5,
            "right_margin": 0.5,
            "top_margin": 0.5,
            "bottom_margin": 0.5,
            "header_font": "Helvetica-Bold",
            "header_font_size": 12,
            "item_font": "Helvetica",
            "item_font_size": 10,
            "row_spacing": 2,
            "header_spacing": 0.2,
            "category_spacing": 0.5
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_inches_are_converted_to_points() {
        let settings = LayoutSettings::from_map(&letter_settings()).unwrap();
        assert!((settings.page_width - 612.0).abs() < 1e-3);
        assert!((settings.page_height - 792.0).abs() < 1e-3);
        assert!((settings.left_margin - 36.0).abs() < 1e-3);
        // Font sizes and row spacing stay in points.
        assert_eq!(settings.item_font_size, 10.0);
        assert_eq!(settings.row_spacing, 2.0);
    }

    #[test]
    fn test_millimetre_unit() {
        let mut map = letter_settings();
        map.insert("unit".into(), json!("mm"));
        map.insert("page_width".into(), json!(210));
        let settings = LayoutSettings::from_map(&map).unwrap();
        assert!((settings.page_width - 595.2756).abs() < 1e-2);
    }

    #[test]
    fn test_defaults_for_optional_keys() {
        let settings = LayoutSettings::from_map(&letter_settings()).unwrap();
        assert_eq!(settings.col_spacing_factor, 1.0);
        assert!((settings.checkbox_factor - 0.9).abs() < 1e-6);
        assert!((settings.item_padding - 2.5).abs() < 1e-6);
        assert_eq!(settings.strategy, PackingStrategy::BestFit);
    }

    #[test]
    fn test_missing_required_key_is_named() {
        for key in ["page_height", "item_font", "row_spacing", "category_spacing"] {
            let mut map = letter_settings();
            map.remove(key);
            match LayoutSettings::from_map(&map) {
                Err(AppError::MissingSetting(missing)) => assert_eq!(missing, key),
                other => panic!("expected MissingSetting({key}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_type_is_invalid_setting() {
        let mut map = letter_settings();
        map.insert("item_font_size".into(), json!("ten"));
        assert!(matches!(
            LayoutSettings::from_map(&map),
            Err(AppError::InvalidSetting { key, .. }) if key == "item_font_size"
        ));
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let mut map = letter_settings();
        map.insert("top_margin".into(), json!(-1));
        assert!(matches!(
            LayoutSettings::from_map(&map),
            Err(AppError::InvalidSetting { key, .. }) if key == "top_margin"
        ));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let mut map = letter_settings();
        map.insert("unit".into(), json!("furlong"));
        assert!(LayoutSettings::from_map(&map).is_err());
    }

    #[test]
    fn test_custom_strategy_with_order() {
        let mut map = letter_settings();
        map.insert("fit_method".into(), json!("custom"));
        map.insert("category_order".into(), json!(["Dairy", "Produce"]));
        let settings = LayoutSettings::from_map(&map).unwrap();
        assert_eq!(
            settings.strategy,
            PackingStrategy::Custom {
                order: Some(vec!["Dairy".to_string(), "Produce".to_string()])
            }
        );
    }

    #[test]
    fn test_unknown_fit_method_falls_back_to_best_fit() {
        let mut map = letter_settings();
        map.insert("fit_method".into(), json!("box-fit"));
        let settings = LayoutSettings::from_map(&map).unwrap();
        assert_eq!(settings.strategy, PackingStrategy::BestFit);
    }

    #[test]
    fn test_category_order_must_hold_strings() {
        let mut map = letter_settings();
        map.insert("category_order".into(), json!(["Dairy", 3]));
        assert!(matches!(
            LayoutSettings::from_map(&map),
            Err(AppError::InvalidSetting { key, .. }) if key == "category_order"
        ));
    }

    #[test]
    fn test_non_string_fit_method_falls_back_to_best_fit() {
        for value in [json!(3), json!(true), json!(["custom"])] {
            let mut map = letter_settings();
            map.insert("fit_method".into(), value.clone());
            map.insert("category_order".into(), json!(["Dairy"]));
            let settings = LayoutSettings::from_map(&map).unwrap();
            assert_eq!(settings.strategy, PackingStrategy::BestFit, "fit_method {value}");
        }
    }

    #[test]
    fn test_point_unit_is_identity() {
        let mut map = letter_settings();
        map.insert("unit".into(), json!("pt"));
        map.insert("page_width".into(), json!(612));
        let settings = LayoutSettings::from_map(&map).unwrap();
        assert_eq!(settings.page_width, 612.0);
        assert_eq!(LengthUnit::Point.to_points(12.5), 12.5);
    }
}
