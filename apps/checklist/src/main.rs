mod config;
mod errors;
mod fonts;
mod input;
mod layout;
mod models;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::fonts::FontSet;
use crate::input::read_input_file;
use crate::layout::page_fill::ColumnFillVerdict;
use crate::layout::{
    analyze_page_fill, check_page_limit, pack, LayoutConfig, LayoutSettings, PageFillAnalysis,
    TracingObserver,
};
use crate::render::pdf::write_pdf;
use crate::render::{render, RecordingSurface};

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a multi-column checkbox list PDF from a JSON file")]
struct Args {
    /// Input JSON file
    input_file: PathBuf,

    /// Output PDF file
    output_file: PathBuf,

    /// Directory holding `<font>.ttf` files (overrides CHECKLIST_FONT_DIR)
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Fail without writing if the layout needs more than this many pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Compute the layout and print it as JSON instead of writing the PDF
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize structured logging (stderr, so --dry-run output stays clean)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting checklist v{}", env!("CARGO_PKG_VERSION"));

    run(&args, &config).with_context(|| {
        format!(
            "Failed to generate checklist from '{}'",
            args.input_file.display()
        )
    })?;

    Ok(())
}

fn run(args: &Args, config: &Config) -> Result<(), AppError> {
    let document = read_input_file(&args.input_file)?;
    let settings = LayoutSettings::from_map(&document.settings)?;

    // Fonts load before anything is measured or drawn.
    let font_dir = args.font_dir.as_ref().unwrap_or(&config.font_dir);
    let fonts = FontSet::load(font_dir, &settings.header_font, &settings.item_font)?;

    let layout = LayoutConfig::derive(&settings, &document.categories, &fonts.header, &fonts.item)?;
    info!(
        strategy = layout.strategy.name(),
        num_columns = layout.num_columns,
        col_width_pt = layout.col_width,
        usable_height_pt = layout.usable_height(),
        "Layout configured"
    );

    let columns = pack(&document.categories, &layout, &mut TracingObserver)?;
    let analysis = analyze_page_fill(&columns, &layout);
    log_fill(&analysis);
    check_page_limit(&analysis, args.max_pages.or(config.max_pages))?;

    if args.dry_run {
        let mut surface = RecordingSurface::new();
        let summary = render(&columns, &layout, &mut surface)?;
        let plan = serde_json::to_string_pretty(&analysis).map_err(anyhow::Error::from)?;
        println!("{plan}");
        info!(
            pages = surface.pages(),
            columns = summary.columns,
            items = summary.items,
            draw_calls = surface.commands.len(),
            "Dry run: no PDF written"
        );
        return Ok(());
    }

    write_pdf(&args.output_file, &columns, &layout, &fonts)?;
    Ok(())
}

fn log_fill(analysis: &PageFillAnalysis) {
    for (index, column) in analysis.columns.iter().enumerate() {
        if column.verdict == ColumnFillVerdict::Overflow {
            warn!(
                column = index + 1,
                page = column.page + 1,
                used_pt = column.used_height,
                available_pt = column.available_height,
                "Column overflows the page: {}",
                column.categories.join(", ")
            );
        }
    }
    info!(
        pages = analysis.pages,
        columns = analysis.columns.len(),
        overall_fill = format!("{:.1}%", analysis.overall_fill * 100.0),
        "Packed categories"
    );
}
