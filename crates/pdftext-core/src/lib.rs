use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod error;
pub mod extract;
#[cfg(any(test, feature = "test-util"))]
pub mod fixture;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod render;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use error::ExtractionError;
pub use extract::{ExtractOptions, ExtractProgress, PageCount, extract};

/// Text of a single page, numbered from 1 in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub number: usize,
    pub text: String,
}

/// How the extracted text is laid out in the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Header with the page count, then one delimited section per page.
    #[default]
    PerPage,
    /// The backend's full-document text, verbatim.
    WholeDocument,
}

#[derive(Error, Debug)]
#[error("unknown strategy {0:?} (expected \"per-page\" or \"whole-document\")")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-page" | "pages" => Ok(Strategy::PerPage),
            "whole-document" | "document" => Ok(Strategy::WholeDocument),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::PerPage => f.write_str("per-page"),
            Strategy::WholeDocument => f.write_str("whole-document"),
        }
    }
}
