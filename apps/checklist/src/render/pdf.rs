//! PDF drawing surface backed by `printpdf`.
//!
//! The document is built in memory and written to a temporary file next to the
//! destination, which is persisted onto the output path only after a successful save.
//! Any failure drops the temporary file, so no partial PDF is left behind.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::anyhow;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use tracing::info;

use crate::errors::AppError;
use crate::fonts::{FontSet, FontSource, LoadedFont};
use crate::layout::font_metrics::StandardFont;
use crate::layout::{Column, LayoutConfig};
use crate::render::{render, DrawSurface, RenderSummary, TextRole};

const LAYER_NAME: &str = "Layer 1";
const CHECKBOX_LINE_WIDTH: f32 = 0.5;
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

pub struct PdfSurface {
    doc: PdfDocumentReference,
    /// The page printpdf creates with the document, handed out by the first `begin_page`.
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    header_font: IndirectFontRef,
    item_font: IndirectFontRef,
    page_width: Mm,
    page_height: Mm,
}

impl PdfSurface {
    pub fn new(title: &str, config: &LayoutConfig, fonts: &FontSet) -> Result<Self, AppError> {
        let page_width = mm(config.page_width);
        let page_height = mm(config.page_height);
        let (doc, page, layer) = PdfDocument::new(title, page_width, page_height, LAYER_NAME);

        let header_font = add_font(&doc, &fonts.header)?;
        let item_font = add_font(&doc, &fonts.item)?;

        Ok(PdfSurface {
            doc,
            first_page: Some((page, layer)),
            layer: None,
            header_font,
            item_font,
            page_width,
            page_height,
        })
    }

    /// Writes the document to `path`.
    ///
    /// A new file gets the usual `0o666 & !umask` mode; an existing file keeps its mode.
    pub fn save(self, path: &Path) -> Result<(), AppError> {
        let output_error = |reason: String| AppError::Output {
            path: path.to_path_buf(),
            reason,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".checklist-").suffix(".pdf");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Applied at creation, so the process umask still filters it.
            builder.permissions(std::fs::Permissions::from_mode(NEW_FILE_MODE));
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|e| output_error(e.to_string()))?;

        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| output_error(e.to_string()))?;
        }

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.doc
                .save(&mut writer)
                .map_err(|e| output_error(e.to_string()))?;
            writer.flush().map_err(|e| output_error(e.to_string()))?;
        }

        tmp.persist(path)
            .map_err(|e| output_error(e.error.to_string()))?;
        Ok(())
    }

    fn current_layer(&self) -> Result<&PdfLayerReference, AppError> {
        self.layer
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow!("draw call before the first page was started")))
    }
}

impl DrawSurface for PdfSurface {
    fn begin_page(&mut self) -> Result<(), AppError> {
        let (page, layer) = match self.first_page.take() {
            Some(first) => first,
            None => self
                .doc
                .add_page(self.page_width, self.page_height, LAYER_NAME),
        };
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
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
        let font = match role {
            TextRole::Header => &self.header_font,
            TextRole::Item => &self.item_font,
        };
        self.current_layer()?.use_text(text, size, mm(x), mm(y), font);
        Ok(())
    }

    fn draw_checkbox(&mut self, x: f32, y: f32, size: f32) -> Result<(), AppError> {
        let layer = self.current_layer()?;
        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(CHECKBOX_LINE_WIDTH);

        let corners = [(x, y), (x + size, y), (x + size, y + size), (x, y + size)];
        let points = corners
            .iter()
            .map(|&(px, py)| (Point::new(mm(px), mm(py)), false))
            .collect();
        layer.add_line(Line {
            points,
            is_closed: true,
        });
        Ok(())
    }
}

fn add_font(doc: &PdfDocumentReference, font: &LoadedFont) -> Result<IndirectFontRef, AppError> {
    let added = match &font.source {
        FontSource::Standard(standard) => doc.add_builtin_font(builtin_font(*standard)),
        FontSource::TrueType(metrics) => doc.add_external_font(metrics.data()),
    };
    added.map_err(|e| AppError::InvalidFont {
        font: font.id.clone(),
        reason: e.to_string(),
    })
}

fn builtin_font(font: StandardFont) -> BuiltinFont {
    match font {
        StandardFont::Helvetica => BuiltinFont::Helvetica,
        StandardFont::HelveticaBold => BuiltinFont::HelveticaBold,
        StandardFont::Courier => BuiltinFont::Courier,
    }
}

/// Renders `columns` into a new PDF at `path`.
pub fn write_pdf(
    path: &Path,
    columns: &[Column<'_>],
    config: &LayoutConfig,
    fonts: &FontSet,
) -> Result<RenderSummary, AppError> {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Checklist");
    let mut surface = PdfSurface::new(title, config, fonts)?;
    let summary = render(columns, config, &mut surface)?;
    surface.save(path)?;
    info!(
        pages = summary.pages,
        columns = summary.columns,
        "Wrote {}",
        path.display()
    );
    Ok(summary)
}
