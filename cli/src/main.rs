//! ofd2pdf CLI - OFD document conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use ofd2pdf::model::GraphicObject;
use ofd2pdf::{
    ExportOptions, JsonFormat, OfdDocument, OfdParser, PageSelection, ReadOptions,
};

#[derive(Parser)]
#[command(name = "ofd2pdf")]
#[command(version)]
#[command(about = "Convert OFD documents to PDF, text, and JSON", long_about = None)]
struct Cli {
    /// Input OFD file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file (defaults to FILE with a .pdf extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert OFD to PDF
    Pdf {
        /// Input OFD file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to FILE with a .pdf extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Do not draw annotations
        #[arg(long)]
        no_annotations: bool,

        /// Do not draw seal stamps
        #[arg(long)]
        no_seals: bool,

        /// Do not write bookmarks
        #[arg(long)]
        no_outline: bool,

        /// Do not embed attachments
        #[arg(long)]
        no_attachments: bool,

        /// Keep going past malformed pages
        #[arg(long, env = "OFD2PDF_LENIENT")]
        lenient: bool,
    },

    /// Extract plain text
    Text {
        /// Input OFD file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Dump the document model as JSON
    Json {
        /// Input OFD file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input OFD file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

struct PdfArgs<'a> {
    input: &'a Path,
    output: Option<&'a Path>,
    pages: Option<&'a str>,
    annotations: bool,
    seals: bool,
    outline: bool,
    attachments: bool,
    lenient: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Pdf {
            input,
            output,
            pages,
            no_annotations,
            no_seals,
            no_outline,
            no_attachments,
            lenient,
        }) => cmd_pdf(PdfArgs {
            input: &input,
            output: output.as_deref(),
            pages: pages.as_deref(),
            annotations: !no_annotations,
            seals: !no_seals,
            outline: !no_outline,
            attachments: !no_attachments,
            lenient,
        }),
        Some(Commands::Text {
            input,
            output,
            pages,
        }) => cmd_text(&input, output.as_deref(), pages.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_pdf(PdfArgs {
                    input: &input,
                    output: cli.output.as_deref(),
                    pages: None,
                    annotations: true,
                    seals: true,
                    outline: true,
                    attachments: true,
                    lenient: false,
                })
            } else {
                println!("{}", "Usage: ofd2pdf <FILE> [OUTPUT]".yellow());
                println!("       ofd2pdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

fn cmd_pdf(args: PdfArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let output = args
        .output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| args.input.with_extension("pdf"));
    let page_selection = parse_pages(args.pages)?;

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing OFD...");
    let mut read = ReadOptions::new()
        .with_pages(page_selection.clone())
        .with_annotations(args.annotations)
        .with_seals(args.seals)
        .with_attachments(args.attachments);
    if args.lenient {
        read = read.lenient();
    }
    let doc = OfdDocument::open_with_options(args.input, read)?;
    pb.inc(1);

    pb.set_message("Writing PDF...");
    let options = ExportOptions::new()
        .with_pages(page_selection)
        .with_annotations(args.annotations)
        .with_seals(args.seals)
        .with_outline(args.outline)
        .with_attachments(args.attachments);
    doc.export_with_options(&output, &options)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = parse_pages(pages)?;
    let options = ReadOptions::new()
        .text_only()
        .with_pages(page_selection.clone());
    let doc = OfdParser::open_with_options(input, options)?.parse()?;

    let export = ExportOptions::new().with_pages(page_selection);
    let text = ofd2pdf::render::to_text(&doc, &export)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ReadOptions::new().with_media(false);
    let doc = OfdDocument::open_with_options(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = doc.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient: show metadata even if some pages are malformed
    let options = ReadOptions::new().lenient().with_media(false);
    let handle = OfdDocument::open_with_options(input, options)?;
    let doc = handle.document();
    let meta = &doc.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} {}", "Format".bold(), meta.doc_type, meta.ofd_version);
    println!("{}: {}", "Pages".bold(), handle.page_count());

    let fields = [
        ("DocID", meta.doc_id.as_deref()),
        ("Title", meta.title.as_deref()),
        ("Author", meta.author.as_deref()),
        ("Subject", meta.subject.as_deref()),
        ("Creator", meta.creator.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label.bold(), value);
        }
    }
    if let Some(keywords) = meta.keywords_joined() {
        println!("{}: {}", "Keywords".bold(), keywords);
    }
    if let Some(ref created) = meta.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = meta.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let (mut texts, mut paths, mut images) = (0usize, 0usize, 0usize);
    for page in &doc.pages {
        page.walk_objects(&mut |object| match object {
            GraphicObject::Text(_) => texts += 1,
            GraphicObject::Path(_) => paths += 1,
            GraphicObject::Image(_) => images += 1,
            _ => {}
        });
    }
    let text = doc.plain_text();
    let annotations: usize = doc.pages.iter().map(|p| p.annotations.len()).sum();

    println!("{}: {}", "Text objects".bold(), texts);
    println!("{}: {}", "Path objects".bold(), paths);
    println!("{}: {}", "Image objects".bold(), images);
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Fonts".bold(), doc.resources.fonts.len());
    println!("{}: {}", "Templates".bold(), doc.templates.len());
    println!("{}: {}", "Annotations".bold(), annotations);
    println!("{}: {}", "Attachments".bold(), doc.attachments.len());

    if let Some(ref outline) = doc.outline {
        println!("{}: {}", "Bookmarks".bold(), outline.total_items());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "ofd2pdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OFD to PDF conversion tool");
    println!();
    println!("License: MIT");
}
