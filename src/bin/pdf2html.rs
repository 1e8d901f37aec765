//! CLI binary for pdf2html.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionOptions` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2html::{convert, convert_to_file, inspect, ConversionOptions, DocumentInput};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  pdf2html document.pdf

  # Convert to file
  pdf2html document.pdf -o document.html

  # Read the PDF from stdin
  cat document.pdf | pdf2html - -o document.html

  # Cap the output size at 10 MiB
  pdf2html --max-buffer 10M report.pdf -o report.html

  # Force the subprocess engine
  pdf2html --engine pdftohtml document.pdf

  # Inline page images as base64 data URIs
  pdf2html --embed-images scan.pdf -o scan.html

  # Inspect PDF metadata, no conversion
  pdf2html --inspect-only document.pdf
  pdf2html --inspect-only --json document.pdf

ENGINES:
  pdfium     In-process text extraction via the pdfium shared library.
  pdftohtml  Subprocess wrapper around poppler's pdftohtml binary.

  When --engine is not given, pdfium is preferred if its library binds,
  falling back to pdftohtml if the binary is on PATH.

ENVIRONMENT VARIABLES:
  PDF2HTML_ENGINE   Override engine selection (pdfium, pdftohtml)
  PDFIUM_LIB_PATH   Directory containing an existing libpdfium copy
"#;

/// Convert PDF documents to standalone HTML.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2html",
    version,
    about = "Convert PDF documents to standalone HTML",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path, or '-' to read the document from stdin.
    input: String,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "PDF2HTML_OUTPUT")]
    output: Option<PathBuf>,

    /// Converter engine: pdfium or pdftohtml. Auto-detected if not set.
    #[arg(long, env = "PDF2HTML_ENGINE")]
    engine: Option<String>,

    /// Byte ceiling on conversion output. Accepts K/M/G suffixes.
    #[arg(long, env = "PDF2HTML_MAX_BUFFER", default_value = "64M")]
    max_buffer: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2HTML_PASSWORD")]
    password: Option<String>,

    /// Emit only the page fragments, without the HTML shell and CSS.
    #[arg(long)]
    bare: bool,

    /// Inline page images as base64 PNG data URIs (pdfium engine only).
    #[arg(long)]
    embed_images: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// With --inspect-only, print metadata as JSON.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2HTML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let input = read_input(&cli.input)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build options ────────────────────────────────────────────────────
    let max_buffer = parse_byte_size(&cli.max_buffer)
        .with_context(|| format!("Invalid --max-buffer value '{}'", cli.max_buffer))?;

    let mut builder = ConversionOptions::builder()
        .max_buffer(max_buffer)
        .include_styles(!cli.bare)
        .embed_images(cli.embed_images);
    if let Some(ref engine) = cli.engine {
        builder = builder.engine_name(engine.as_str());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.as_str());
    }
    let options = builder.build().context("Invalid options")?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let bytes = convert_to_file(input, output_path, &options)
            .await
            .context("Conversion failed")?;
        if !cli.quiet {
            eprintln!("Wrote {} bytes to {}", bytes, output_path.display());
        }
    } else {
        let html = convert(input, &options).await.context("Conversion failed")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(html.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Map the positional argument to a [`DocumentInput`].
///
/// `-` reads the whole document from stdin into a buffer; anything else
/// is treated as a file path.
fn read_input(arg: &str) -> Result<DocumentInput> {
    if arg == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read PDF from stdin")?;
        Ok(DocumentInput::bytes(bytes))
    } else {
        Ok(DocumentInput::path(arg))
    }
}

/// Parse a byte size with an optional K/M/G suffix (binary multiples).
fn parse_byte_size(s: &str) -> Result<usize> {
    let s = s.trim();
    let (digits, multiplier) = match s.chars().last() {
        Some('k') | Some('K') => (&s[..s.len() - 1], 1024),
        Some('m') | Some('M') => (&s[..s.len() - 1], 1024 * 1024),
        Some('g') | Some('G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    let n: usize = digits.trim().parse().context("not a number")?;
    n.checked_mul(multiplier)
        .context("byte size does not fit in usize")
}
