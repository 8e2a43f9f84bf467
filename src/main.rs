//! Command-line front end
//!
//! ```bash
//! pdfpane render paper.pdf --page 0 --width 1750 --height 2430 --out page.png
//! pdfpane toc paper.pdf --links
//! pdfpane search paper.pdf --page 3 "lemma"
//! pdfpane strip paper.pdf --page 4 --top 1200 --out view.png
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use pdfpane::pdf::parsing::toc_links::{has_links, parse_toc_links};
use pdfpane::pdf::{BYTES_PER_PIXEL, MupdfEngine, PdfDocument, Rgba};
use pdfpane::settings::{self, Settings};
use pdfpane::viewport::{ScrollDirection, ScrollPosition, compose_window};

const GAP_COLOR: Rgba = Rgba::opaque(0, 0, 0);

/// Render pages, dump outlines and search text in PDF files
#[derive(Parser, Debug)]
#[command(name = "pdfpane")]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (defaults to <config dir>/pdfpane/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the log to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize one page to PNG
    Render {
        pdf: String,
        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: usize,
        #[arg(long, default_value = "1750")]
        width: u32,
        #[arg(long, default_value = "2430")]
        height: u32,
        /// Horizontal inset in page units (negative crops margins)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x_offset: f32,
        #[arg(short, long, default_value = "page.png")]
        out: PathBuf,
    },

    /// Print the flattened outline
    Toc {
        pdf: String,
        /// Only list entries that carry a jump target
        #[arg(long)]
        links: bool,
    },

    /// Print the raw text of a page
    Text {
        pdf: String,
        #[arg(short, long, default_value = "0")]
        page: usize,
    },

    /// Print match rectangles for a query
    Search {
        pdf: String,
        #[arg(short, long, default_value = "0")]
        page: usize,
        query: String,
    },

    /// Compose the continuous-scroll window at a position into one PNG
    Strip {
        pdf: String,
        #[arg(short, long, default_value = "0")]
        page: usize,
        /// Rows of the page already scrolled past
        #[arg(long, default_value = "0")]
        top: u32,
        /// Extra scroll steps to apply (negative scrolls up)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        steps: i32,
        #[arg(short, long, default_value = "view.png")]
        out: PathBuf,
    },
}

fn init_logging(args: &Args, settings: &Settings) -> Result<()> {
    let level = match args.verbose {
        0 => settings.level_filter(),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match &args.log_file {
        Some(path) => WriteLogger::init(
            level,
            Config::default(),
            File::create(path).with_context(|| format!("creating log file {path:?}"))?,
        )?,
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

fn open_document(path: &str, settings: &Settings) -> Result<PdfDocument<MupdfEngine>> {
    let engine = MupdfEngine::open(path)
        .with_context(|| format!("opening {path}"))?
        .with_search_hit_max(settings.search_hit_max);
    Ok(PdfDocument::from_engine(engine).with_options(settings.document_options()))
}

fn save_png(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<()> {
    let Some(img) = image::RgbaImage::from_raw(width, height, pixels) else {
        bail!("pixel buffer does not match {width}x{height}");
    };
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn render(
    doc: &PdfDocument<MupdfEngine>,
    page: usize,
    width: u32,
    height: u32,
    x_offset: f32,
    out: &Path,
) -> Result<()> {
    let mut pixels = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];
    let rendered = doc
        .render_page(page, &mut pixels, width, height, x_offset)
        .with_context(|| format!("rendering page {page}"))?;
    debug!("Rendered page {page} at {width}x{rendered}");
    save_png(out, width, height, pixels)
}

fn toc(doc: &PdfDocument<MupdfEngine>, links: bool) -> Result<()> {
    let text = doc.toc().context("reading outline")?;
    if links {
        if !has_links(&text) {
            info!("Outline has no named destinations to jump to");
        }
        for link in parse_toc_links(&text) {
            println!("{}\t{}", link.label.trim_start(), link.target);
        }
    } else {
        print!("{text}");
    }
    Ok(())
}

fn strip(
    doc: &PdfDocument<MupdfEngine>,
    settings: &Settings,
    page: usize,
    top: u32,
    steps: i32,
    out: &Path,
) -> Result<()> {
    let viewer = settings.viewer;
    let geometry = viewer.geometry();
    let page_count = doc.page_count()?;

    let mut position = ScrollPosition::new(page, top);
    let direction = if steps < 0 {
        ScrollDirection::Up
    } else {
        ScrollDirection::Down
    };
    position.scroll(
        direction,
        viewer.scroll_step,
        steps.unsigned_abs(),
        geometry.page_height,
    );
    position.clamp_to(page_count);

    let window = compose_window(
        doc,
        &geometry,
        &position,
        -(viewer.x_offset as f32),
        GAP_COLOR,
    )?;

    info!("Window at page {} row {}", position.page, position.top);
    save_png(out, geometry.window_width, geometry.window_height, window)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        if !path.exists() {
            bail!("settings file {} does not exist", path.display());
        }
    }
    settings::load_settings(args.config.as_deref());
    let settings = settings::current();
    init_logging(&args, &settings)?;

    match &args.command {
        Command::Render {
            pdf,
            page,
            width,
            height,
            x_offset,
            out,
        } => render(
            &open_document(pdf, &settings)?,
            *page,
            *width,
            *height,
            *x_offset,
            out,
        ),
        Command::Toc { pdf, links } => toc(&open_document(pdf, &settings)?, *links),
        Command::Text { pdf, page } => {
            let text = open_document(pdf, &settings)?
                .page_text(*page)
                .with_context(|| format!("extracting text of page {page}"))?;
            print!("{text}");
            Ok(())
        }
        Command::Search { pdf, page, query } => {
            let rects = open_document(pdf, &settings)?
                .text_selection(*page, query)
                .with_context(|| format!("searching page {page} for {query:?}"))?;
            println!("{}", rects.trim_end());
            Ok(())
        }
        Command::Strip {
            pdf,
            page,
            top,
            steps,
            out,
        } => strip(
            &open_document(pdf, &settings)?,
            &settings,
            *page,
            *top,
            *steps,
            out,
        ),
    }
}
