use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use pdftext_core::config_file::ConfigFile;
use pdftext_core::{ExtractOptions, PdfBackend, Strategy};
use pdftext_mupdf::MupdfBackend;
use pdftext_pure::PureBackend;

use crate::Cli;

/// Which PDF library does the extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// MuPDF (default)
    #[default]
    Mupdf,
    /// pdf-extract, pure Rust
    Pure,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub strategy: Strategy,
    pub backend: BackendKind,
    pub header_exclusion: f32,
    pub footer_exclusion: f32,
}

impl Settings {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            source_path: self.source.clone(),
            dest_path: self.dest.clone(),
            strategy: self.strategy,
        }
    }

    pub fn backend(&self) -> Box<dyn PdfBackend> {
        match self.backend {
            BackendKind::Mupdf => Box::new(
                MupdfBackend::new()
                    .with_header_exclusion(self.header_exclusion)
                    .with_footer_exclusion(self.footer_exclusion),
            ),
            BackendKind::Pure => Box::new(PureBackend::new()),
        }
    }
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
pub fn resolve<E>(cli: &Cli, env: E, config: &ConfigFile) -> anyhow::Result<Settings>
where
    E: Fn(&str) -> Option<String>,
{
    let source = cli
        .source
        .clone()
        .or_else(|| env("PDFTEXT_SOURCE").map(PathBuf::from))
        .or_else(|| config.source())
        .context("no source PDF given (pass SOURCE, set PDFTEXT_SOURCE, or add paths.source to the config)")?;

    let dest = cli
        .dest
        .clone()
        .or_else(|| env("PDFTEXT_DEST").map(PathBuf::from))
        .or_else(|| config.dest())
        .context("no destination given (pass DEST, set PDFTEXT_DEST, or add paths.dest to the config)")?;

    let strategy = match (cli.strategy, env("PDFTEXT_STRATEGY")) {
        (Some(s), _) => s,
        (None, Some(s)) => s.parse::<Strategy>().context("invalid PDFTEXT_STRATEGY")?,
        (None, None) => config.strategy().unwrap_or_default(),
    };

    let backend = match (cli.backend, env("PDFTEXT_BACKEND")) {
        (Some(b), _) => b,
        (None, Some(b)) => parse_backend(&b).context("invalid PDFTEXT_BACKEND")?,
        (None, None) => match config.backend() {
            Some(b) => parse_backend(b).context("invalid extraction.backend in config")?,
            None => BackendKind::default(),
        },
    };

    let header_exclusion = exclusion_ratio(
        "header",
        cli.header_exclusion.or_else(|| config.header_exclusion()),
    )?;
    let footer_exclusion = exclusion_ratio(
        "footer",
        cli.footer_exclusion.or_else(|| config.footer_exclusion()),
    )?;

    Ok(Settings {
        source,
        dest,
        strategy,
        backend,
        header_exclusion,
        footer_exclusion,
    })
}

/// A fraction of the page height: finite and in `[0.0, 1.0)`.
fn exclusion_ratio(which: &str, value: Option<f32>) -> anyhow::Result<f32> {
    let ratio = value.unwrap_or(0.0);
    if !ratio.is_finite() || !(0.0..1.0).contains(&ratio) {
        anyhow::bail!("invalid {which} exclusion {ratio} (expected 0.0 <= ratio < 1.0)");
    }
    Ok(ratio)
}

fn parse_backend(s: &str) -> anyhow::Result<BackendKind> {
    BackendKind::from_str(s.trim(), true).map_err(|e| anyhow::anyhow!(e))
}
