//! CLI binary for pdfstitch.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `StitchConfig` and prints the batch summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfstitch::{
    stitch_folder, BatchProgressCallback, BatchReport, DocumentError, DocumentOutcome,
    ProgressCallback, StitchConfig,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar anchored at the bottom of the terminal
/// plus one status line per document.
///
/// Status lines go to `out` with the bar suspended, so they are written even
/// when indicatif has hidden the bar.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Wall-clock start of the document currently being stitched.
    started: Mutex<Option<Instant>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        // length set in on_batch_start
        Self::with_output(ProgressBar::new(0), Box::new(io::stderr()))
    }

    fn with_output(bar: ProgressBar, out: Box<dyn Write + Send>) -> Arc<Self> {
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Listing folder…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
            out: Mutex::new(out),
        })
    }

    fn emit(&self, line: String) {
        self.bar.suspend(|| {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{line}");
            }
        });
    }

    fn elapsed(&self) -> String {
        let ms = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        dim(&format!("{:.1}s", ms as f64 / 1000.0))
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_prefix("Stitching");
        self.bar.reset_eta();
        self.emit(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Stitching {total_documents} PDF(s)…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, name: &str) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(
        &self,
        index: usize,
        total: usize,
        name: &str,
        outcome: &DocumentOutcome,
    ) {
        let line = match outcome {
            DocumentOutcome::Written {
                page_count,
                width,
                height,
                ..
            } => format!(
                "  {} {:>3}/{:<3} {}  {}  {}",
                green("✓"),
                index,
                total,
                name,
                dim(&format!("{page_count} pages → {width}x{height} px")),
                self.elapsed(),
            ),
            DocumentOutcome::Empty => format!(
                "  {} {:>3}/{:<3} {}  {}",
                cyan("○"),
                index,
                total,
                name,
                dim("no pages found, skipped"),
            ),
        };
        self.emit(line);
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, name: &str, error: &DocumentError) {
        let error = error.to_string();
        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(100) {
            Some((cut, _)) => format!("{}\u{2026}", &error[..cut]),
            None => error,
        };

        self.emit(format!(
            "  {} {:>3}/{:<3} {}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg),
            self.elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Stitch every PDF in ./scans into ./stitched at 200 DPI
  pdfstitch scans stitched

  # Higher resolution, deterministic processing order
  pdfstitch --dpi 300 --sorted scans stitched

  # Machine-readable summary
  pdfstitch --json scans stitched > report.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (or the directory holding it)
  RUST_LOG                Override log filtering (e.g. pdfstitch=debug)
"#;

/// Stitch the pages of each PDF in a folder into one tall single-page PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdfstitch",
    version,
    about = "Convert multi-page PDFs into single long-page PDFs by stitching pages vertically",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input folder containing PDFs (flat structure).
    input_folder: PathBuf,

    /// Output folder where stitched PDFs will be saved (created if missing).
    output_folder: PathBuf,

    /// DPI resolution for rasterising pages and sizing the output page.
    #[arg(long, env = "PDFSTITCH_DPI", default_value_t = pdfstitch::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// File extension that selects documents (case-insensitive).
    #[arg(long, env = "PDFSTITCH_EXTENSION", default_value = pdfstitch::DEFAULT_EXTENSION)]
    extension: String,

    /// Process files in name order instead of directory-listing order.
    #[arg(long, env = "PDFSTITCH_SORTED")]
    sorted: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDFSTITCH_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSTITCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSTITCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except warnings (per-document failures) and errors.
    #[arg(short, long, env = "PDFSTITCH_QUIET")]
    quiet: bool,
}

/// Default tracing filter when `RUST_LOG` is unset.
///
/// The progress bar prints its own per-document lines, so library logs drop
/// to errors while it is on. Quiet mode keeps `warn` so failure causes stay
/// visible.
fn log_filter(verbose: bool, quiet: bool, show_progress: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else if show_progress {
        "error"
    } else {
        "info"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The bar only draws on a terminal; redirected runs get plain log lines.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let filter = log_filter(cli.verbose, cli.quiet, show_progress);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = StitchConfig::builder()
        .dpi(cli.dpi)
        .extension(cli.extension.clone())
        .sorted(cli.sorted);

    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = stitch_folder(&cli.input_folder, &cli.output_folder, &config)
        .await
        .with_context(|| {
            format!(
                "Failed to stitch '{}' into '{}'",
                cli.input_folder.display(),
                cli.output_folder.display()
            )
        })?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} written, {} empty, {} failed of {} PDF(s)  {}ms  →  {}",
            if report.is_clean() {
                green("✔")
            } else {
                red("✘")
            },
            bold(&report.written.to_string()),
            report.empty,
            report.failed_count(),
            report.selected,
            report.duration_ms,
            bold(&cli.output_folder.display().to_string()),
        );
    }

    Ok(())
}
