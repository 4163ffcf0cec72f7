//! Page Fill Analysis — how well the packed columns use the page.
//!
//! Runs after packing and before rendering. Produces a per-column fill fraction and
//! verdict plus the page count, which drive the run summary and the `--max-pages` check.
//!
//! # Column fill rules
//! - Fill > 100%  → overflow (a single category taller than the column)
//! - Fill < 92%   → too much whitespace
//! - otherwise    → acceptable

use serde::Serialize;

use crate::errors::AppError;
use crate::layout::geometry::LayoutConfig;
use crate::layout::packing::Column;

const MIN_ACCEPTABLE_FILL: f32 = 0.92;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFillVerdict {
    Acceptable,
    TooMuchWhitespace,
    Overflow,
}

/// Fill of a single packed column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnFill {
    /// 0-based page the column is rendered on.
    pub page: usize,
    pub categories: Vec<String>,
    pub used_height: f32,
    pub available_height: f32,
    pub fill_fraction: f32,
    pub verdict: ColumnFillVerdict,
}

/// Fill analysis for a whole layout.
#[derive(Debug, Clone, Serialize)]
pub struct PageFillAnalysis {
    pub strategy: &'static str,
    pub num_columns: usize,
    pub col_width: f32,
    pub pages: usize,
    /// Used height over available height, across all columns.
    pub overall_fill: f32,
    pub overflow_columns: usize,
    pub columns: Vec<ColumnFill>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Pages needed for `column_count` columns at `num_columns` per page.
pub fn page_count(column_count: usize, num_columns: usize) -> usize {
    column_count.div_ceil(num_columns.max(1))
}

pub fn analyze_page_fill(columns: &[Column<'_>], config: &LayoutConfig) -> PageFillAnalysis {
    let available = config.usable_height();
    let per_page = config.num_columns.max(1);

    let fills: Vec<ColumnFill> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let fill_fraction = if available > 0.0 {
                column.height() / available
            } else {
                f32::INFINITY
            };
            ColumnFill {
                page: index / per_page,
                categories: column.names().into_iter().map(str::to_string).collect(),
                used_height: column.height(),
                available_height: available,
                fill_fraction,
                verdict: column_verdict(fill_fraction),
            }
        })
        .collect();

    let used: f32 = columns.iter().map(|c| c.height()).sum();
    let capacity = available * columns.len() as f32;
    let overall_fill = if capacity > 0.0 { used / capacity } else { 0.0 };

    PageFillAnalysis {
        strategy: config.strategy.name(),
        num_columns: config.num_columns,
        col_width: config.col_width,
        pages: page_count(columns.len(), config.num_columns),
        overall_fill,
        overflow_columns: fills
            .iter()
            .filter(|f| f.verdict == ColumnFillVerdict::Overflow)
            .count(),
        columns: fills,
    }
}

/// Fails when the layout needs more pages than `limit`.
pub fn check_page_limit(analysis: &PageFillAnalysis, limit: Option<usize>) -> Result<(), AppError> {
    match limit {
        Some(limit) if analysis.pages > limit => Err(AppError::PageLimitExceeded {
            pages: analysis.pages,
            limit,
        }),
        _ => Ok(()),
    }
}

fn column_verdict(fill_fraction: f32) -> ColumnFillVerdict {
    if fill_fraction > 1.0 {
        ColumnFillVerdict::Overflow
    } else if fill_fraction < MIN_ACCEPTABLE_FILL {
        ColumnFillVerdict::TooMuchWhitespace
    } else {
        ColumnFillVerdict::Acceptable
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
