use std::io::Write;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pdftext_core::ExtractProgress;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One-line confirmation naming the output file.
pub fn print_success(w: &mut dyn Write, dest: &Path, color: ColorMode) -> std::io::Result<()> {
    let msg = format!("Successfully extracted PDF to: {}", dest.display());
    if color.enabled() {
        writeln!(w, "{}", msg.green())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// One-line failure message carrying the full cause chain. Causes that span
/// several lines are folded onto one.
pub fn print_error(
    w: &mut dyn Write,
    err: &anyhow::Error,
    color: ColorMode,
) -> std::io::Result<()> {
    let cause = format!("{:#}", err);
    let cause = cause
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".bold().red(), cause)
    } else {
        writeln!(w, "Error: {}", cause)
    }
}

/// Progress bar driven by [`ExtractProgress`] events. Drawn on stderr.
pub struct ProgressReporter {
    bar: ProgressBar,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> anyhow::Result<Self> {
        let bar_style = ProgressStyle::with_template(
            "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len}",
        )?
        .progress_chars("=> ");
        let spinner_style = ProgressStyle::with_template("{spinner:.green} {msg}")?;

        let bar = if enabled {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(spinner_style);
        bar.set_message("Opening document...");

        Ok(Self { bar, bar_style })
    }

    pub fn handle(&self, event: ExtractProgress) {
        match event {
            ExtractProgress::Opened { pages } => {
                self.bar.set_length(pages as u64);
                self.bar.set_style(self.bar_style.clone());
                self.bar.set_message("Extracting pages");
            }
            ExtractProgress::Page { number, .. } => {
                self.bar.set_position(number as u64);
            }
            ExtractProgress::Written { .. } => {
                self.bar.finish_and_clear();
            }
        }
    }

    /// Remove the bar without waiting for a `Written` event.
    pub fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
