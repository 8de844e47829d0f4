#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_rs::{Document, FolioConverter, FontConfig, RenderConfig};
use std::path::{Path, PathBuf};

/// folio: render JSON page descriptions to PNG and PDF
#[derive(Parser, Debug)]
#[command(name = "folio", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a document to PNG or PDF
    Render {
        /// Path to input document
        #[arg(short, long)]
        input: String,

        /// Path to output file to be created
        #[arg(short, long)]
        output: String,

        /// Output format. Taken from the output file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Device pixels per user unit (PNG only)
        #[arg(short, long, default_value = "1.0")]
        scale: f32,

        /// Pixels per inch recorded in the PNG metadata
        #[arg(long)]
        ppi: Option<f32>,

        /// Fail when any element fails to draw
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        fonts: FontArgs,
    },

    /// Print the page size and content bounds of a document as JSON
    Measure {
        /// Path to input document
        #[arg(short, long)]
        input: String,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        fonts: FontArgs,
    },

    /// Report elements that fail to draw; exits non-zero if there are any
    Check {
        /// Path to input document
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        fonts: FontArgs,
    },
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Additional directory to scan for font files
    #[arg(long)]
    font_dir: Vec<PathBuf>,

    /// Do not load system fonts
    #[arg(long)]
    no_system_fonts: bool,
}

impl FontArgs {
    fn font_config(&self) -> FontConfig {
        FontConfig {
            load_system_fonts: !self.no_system_fonts,
            font_dirs: self.font_dir.clone(),
            ..FontConfig::default()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Png,
    Pdf,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            format,
            scale,
            ppi,
            strict,
            fonts,
        } => {
            let doc = read_document(&input)?;
            let format = match format {
                Some(format) => format,
                None => format_from_extension(&output)?,
            };
            let converter = FolioConverter::with_font_config(&fonts.font_config())
                .with_render_config(RenderConfig {
                    strict,
                    ..RenderConfig::default()
                });
            let data = match format {
                OutputFormat::Png => converter.document_to_png(&doc, Some(scale), ppi)?,
                OutputFormat::Pdf => converter.document_to_pdf(&doc)?,
            };
            write_output(&output, &data)?;
        }
        Commands::Measure {
            input,
            pretty,
            fonts,
        } => {
            let doc = read_document(&input)?;
            let converter = FolioConverter::with_font_config(&fonts.font_config());
            let measurement = converter.measure(&doc)?;
            let json = if pretty {
                serde_json::to_string_pretty(&measurement)?
            } else {
                serde_json::to_string(&measurement)?
            };
            println!("{}", json);
        }
        Commands::Check { input, fonts } => {
            let doc = read_document(&input)?;
            let converter = FolioConverter::with_font_config(&fonts.font_config());
            let report = converter.check(&doc)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.failures.is_empty() {
                for failure in &report.failures {
                    log::error!("{}: {}", failure.id, failure.message);
                }
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn read_document(path: &str) -> Result<Document, anyhow::Error> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => bail!("Failed to read input file: {}\n{}", path, err),
    };
    Document::from_json(&json).map_err(|err| anyhow!("Failed to parse {}: {}", path, err))
}

fn format_from_extension(output: &str) -> Result<OutputFormat, anyhow::Error> {
    let extension = Path::new(output)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => Ok(OutputFormat::Png),
        Some("pdf") => Ok(OutputFormat::Pdf),
        _ => bail!(
            "Cannot infer output format from {}, pass --format png or --format pdf",
            output
        ),
    }
}

fn write_output(path: &str, data: &[u8]) -> Result<(), anyhow::Error> {
    if let Err(err) = std::fs::write(path, data) {
        bail!("Failed to write output file: {}\n{}", path, err);
    }
    Ok(())
}
