use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use pdftext_core::Strategy;
use pdftext_core::config_file;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod output;
mod settings;

use output::{ColorMode, ProgressReporter};
use settings::BackendKind;

/// Extract the text of a PDF into a plain UTF-8 text file
#[derive(Parser, Debug)]
#[command(name = "pdftext", version, about, long_about = None)]
pub struct Cli {
    /// PDF file to read (or PDFTEXT_SOURCE / paths.source in the config)
    pub source: Option<PathBuf>,

    /// Text file to write, overwritten if present (or PDFTEXT_DEST / paths.dest)
    pub dest: Option<PathBuf>,

    /// Output layout: per-page (header and page markers) or whole-document
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// PDF library to extract with
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Config file to use instead of .pdftext.toml and the platform config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fraction of page height at the top to skip (mupdf only)
    #[arg(long)]
    pub header_exclusion: Option<f32>,

    /// Fraction of page height at the bottom to skip (mupdf only)
    #[arg(long)]
    pub footer_exclusion: Option<f32>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not show a progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let mut stdout = std::io::stdout();

    match run(&cli) {
        Ok(dest) => {
            let _ = output::print_success(&mut stdout, &dest, color);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "extraction failed");
            let _ = output::print_error(&mut stdout, &e, color);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<PathBuf> {
    let config = match cli.config {
        Some(ref path) => config_file::load_strict(path)?,
        None => config_file::load_config(),
    };
    let settings = settings::resolve(cli, |key| std::env::var(key).ok(), &config)?;
    let options = settings.extract_options();
    let backend = settings.backend();

    tracing::info!(
        source = %options.source_path.display(),
        dest = %options.dest_path.display(),
        strategy = %options.strategy,
        backend = backend.name(),
        "starting extraction"
    );

    let reporter = ProgressReporter::new(!cli.quiet)?;
    let result = pdftext_core::extract(&options, backend.as_ref(), |event| {
        reporter.handle(event)
    });
    reporter.abandon();

    let pages = result?;
    tracing::info!(pages, "extraction complete");

    Ok(options.dest_path)
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
