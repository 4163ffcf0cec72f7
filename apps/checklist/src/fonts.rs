//! Font resource resolution.
//!
//! A font identifier from the settings is either one of the PDF standard fonts
//! (`Helvetica`, `Helvetica-Bold`, `Courier`) or the stem of a TrueType file in the font
//! directory (`<font_dir>/<identifier>.ttf`). Fonts are loaded before anything is
//! measured or drawn so a missing file fails the run early.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::layout::font_metrics::{FontMetrics, StandardFont, TrueTypeMetrics};

/// Where a loaded font's glyphs come from.
#[derive(Debug, Clone)]
pub enum FontSource {
    Standard(StandardFont),
    TrueType(TrueTypeMetrics),
}

/// A font ready for measuring and embedding.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub id: String,
    pub source: FontSource,
}

impl FontMetrics for LoadedFont {
    fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        match &self.source {
            FontSource::Standard(font) => font.text_width(text, size_pt),
            FontSource::TrueType(metrics) => metrics.text_width(text, size_pt),
        }
    }
}

/// The header and item fonts of one run.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub header: LoadedFont,
    pub item: LoadedFont,
}

impl FontSet {
    pub fn load(font_dir: &Path, header_font: &str, item_font: &str) -> Result<Self, AppError> {
        Ok(FontSet {
            header: load_font(font_dir, header_font)?,
            item: load_font(font_dir, item_font)?,
        })
    }
}

/// Path a non-standard font identifier resolves to.
pub fn font_path(font_dir: &Path, id: &str) -> PathBuf {
    font_dir.join(format!("{id}.ttf"))
}

pub fn load_font(font_dir: &Path, id: &str) -> Result<LoadedFont, AppError> {
    if let Some(standard) = StandardFont::from_name(id) {
        info!("Using standard PDF font {id}");
        return Ok(LoadedFont {
            id: id.to_string(),
            source: FontSource::Standard(standard),
        });
    }

    let path = font_path(font_dir, id);
    let data = std::fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::FontNotFound {
            font: id.to_string(),
            path: path.clone(),
        },
        _ => AppError::Io(e),
    })?;

    let metrics = TrueTypeMetrics::from_bytes(data).map_err(|e| AppError::InvalidFont {
        font: id.to_string(),
        reason: e.to_string(),
    })?;
    info!("Registered font {id} from {}", path.display());

    Ok(LoadedFont {
        id: id.to_string(),
        source: FontSource::TrueType(metrics),
    })
}
