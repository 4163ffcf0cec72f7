//! Renderer — walks the packed columns and emits draw calls.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page. The cursor
//! marks the top of the next line box, so every category consumes exactly its
//! CategoryHeight and content stays inside the margins. A new page starts after every
//! `num_columns` columns.

pub mod pdf;

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::layout::{Column, LayoutConfig};
use crate::models::Category;

/// Checkbox offset below the item baseline, as a fraction of its size.
const CHECKBOX_DESCENT: f32 = 0.125;

// ────────────────────────────────────────────────────────────────────────────
// Surface
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextRole {
    Header,
    Item,
}

/// The drawing primitives the renderer needs.
pub trait DrawSurface {
    fn begin_page(&mut self) -> Result<(), AppError>;
    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(
        &mut self,
        role: TextRole,
        text: &str,
        size: f32,
        x: f32,
        y: f32,
    ) -> Result<(), AppError>;
    /// Draws an empty checkbox with its bottom-left corner at `(x, y)`.
    fn draw_checkbox(&mut self, x: f32, y: f32, size: f32) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    BeginPage,
    Text {
        role: TextRole,
        text: String,
        size: f32,
        x: f32,
        y: f32,
    },
    Checkbox {
        x: f32,
        y: f32,
        size: f32,
    },
}

/// Keeps every draw call in memory instead of producing a document.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BeginPage))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_page(&mut self) -> Result<(), AppError> {
        self.commands.push(DrawCommand::BeginPage);
        Ok(())
    }

    fn draw_text(
        &mut self,
        role: TextRole,
        text: &str,
        size: f32,
        x: f32,
        y: f32,
    ) -> Result<(), AppError> {
        self.commands.push(DrawCommand::Text {
            role,
            text: text.to_string(),
            size,
            x,
            y,
        });
        Ok(())
    }

    fn draw_checkbox(&mut self, x: f32, y: f32, size: f32) -> Result<(), AppError> {
        self.commands.push(DrawCommand::Checkbox { x, y, size });
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub pages: usize,
    pub columns: usize,
    pub categories: usize,
    pub items: usize,
}

/// Draws `columns` onto `surface`. Zero columns draw nothing and produce zero pages.
pub fn render<S: DrawSurface + ?Sized>(
    columns: &[Column<'_>],
    config: &LayoutConfig,
    surface: &mut S,
) -> Result<RenderSummary, AppError> {
    let mut summary = RenderSummary::default();
    if columns.is_empty() {
        return Ok(summary);
    }

    let origin_x = config.left_margin;
    let origin_y = config.page_height - config.top_margin;
    let per_page = config.num_columns.max(1);

    surface.begin_page()?;
    summary.pages = 1;
    let mut x = origin_x;

    for (index, column) in columns.iter().enumerate() {
        debug!(column = index + 1, x, y = origin_y, "Drawing column");
        let mut y = origin_y;
        for category in column.categories() {
            y = draw_category(surface, category, x, y, config)?;
            summary.categories += 1;
            summary.items += category.items.len();
        }
        summary.columns += 1;

        let page_full = (index + 1) % per_page == 0;
        if page_full && index + 1 < columns.len() {
            surface.begin_page()?;
            summary.pages += 1;
            x = origin_x;
        } else {
            x += config.col_width;
        }
    }

    Ok(summary)
}

/// Draws one header and its items starting at cursor `y`; returns the cursor below them.
fn draw_category<S: DrawSurface + ?Sized>(
    surface: &mut S,
    category: &Category,
    x: f32,
    mut y: f32,
    config: &LayoutConfig,
) -> Result<f32, AppError> {
    let header_size = config.header_font_size;
    surface.draw_text(TextRole::Header, &category.name, header_size, x, y - header_size)?;
    y -= header_size + config.row_spacing;
    y -= config.header_spacing * header_size;

    let item_size = config.item_font_size;
    let checkbox = config.checkbox_size;
    for item in &category.items {
        let baseline = y - item_size;
        surface.draw_checkbox(x, baseline - CHECKBOX_DESCENT * checkbox, checkbox)?;
        surface.draw_text(
            TextRole::Item,
            item,
            item_size,
            x + checkbox + config.item_padding,
            baseline,
        )?;
        y -= item_size + config.row_spacing;
    }

    y -= config.category_spacing * header_size;
    Ok(y)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
