use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Strategy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `message` is toml's own one-line description, without the source
    /// excerpt it adds to its `Display` output.
    #[error("failed to parse config {} (line {line}): {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub source: Option<String>,
    pub dest: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub strategy: Option<Strategy>,
    pub backend: Option<String>,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

impl ConfigFile {
    pub fn source(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.source.as_ref())
            .map(PathBuf::from)
    }

    pub fn dest(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.dest.as_ref())
            .map(PathBuf::from)
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.extraction.as_ref().and_then(|e| e.strategy)
    }

    pub fn backend(&self) -> Option<&str> {
        self.extraction.as_ref().and_then(|e| e.backend.as_deref())
    }

    pub fn header_exclusion(&self) -> Option<f32> {
        self.extraction.as_ref().and_then(|e| e.header_exclusion)
    }

    pub fn footer_exclusion(&self) -> Option<f32> {
        self.extraction.as_ref().and_then(|e| e.footer_exclusion)
    }
}

/// Platform config directory path: `<config_dir>/pdftext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdftext").join("config.toml"))
}

/// Load config by cascading CWD `.pdftext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdftext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match load_strict(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            None
        }
    }
}

/// Load a config the user asked for explicitly. Any failure is an error.
pub fn load_strict(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        line: e
            .span()
            .and_then(|span| content.get(..span.start))
            .map_or(1, |before| before.matches('\n').count() + 1),
        message: e.message().trim().to_string(),
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_paths = base.paths.unwrap_or_default();
    let overlay_paths = overlay.paths.unwrap_or_default();
    let base_extraction = base.extraction.unwrap_or_default();
    let overlay_extraction = overlay.extraction.unwrap_or_default();

    ConfigFile {
        paths: Some(PathsConfig {
            source: overlay_paths.source.or(base_paths.source),
            dest: overlay_paths.dest.or(base_paths.dest),
        }),
        extraction: Some(ExtractionConfig {
            strategy: overlay_extraction.strategy.or(base_extraction.strategy),
            backend: overlay_extraction.backend.or(base_extraction.backend),
            header_exclusion: overlay_extraction
                .header_exclusion
                .or(base_extraction.header_exclusion),
            footer_exclusion: overlay_extraction
                .footer_exclusion
                .or(base_extraction.footer_exclusion),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let toml_str = r#"
[paths]
source = "Promotion Criteria.pdf"
dest = "out/criteria.txt"

[extraction]
strategy = "whole-document"
backend = "pure"
footer_exclusion = 0.05
"#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.source(), Some(PathBuf::from("Promotion Criteria.pdf")));
        assert_eq!(parsed.dest(), Some(PathBuf::from("out/criteria.txt")));
        assert_eq!(parsed.strategy(), Some(Strategy::WholeDocument));
        assert_eq!(parsed.backend(), Some("pure"));
        assert_eq!(parsed.footer_exclusion(), Some(0.05));
        assert_eq!(parsed.header_exclusion(), None);
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let parsed: ConfigFile = toml::from_str("[paths]\nsource = \"a.pdf\"\n").unwrap();
        assert!(parsed.extraction.is_none());
        assert_eq!(parsed.strategy(), None);
        assert_eq!(parsed.dest(), None);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            paths: Some(PathsConfig {
                source: Some("/base/in.pdf".to_string()),
                dest: Some("/base/out.txt".to_string()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            paths: Some(PathsConfig {
                dest: Some("/overlay/out.txt".to_string()),
                ..Default::default()
            }),
            extraction: Some(ExtractionConfig {
                strategy: Some(Strategy::WholeDocument),
                ..Default::default()
            }),
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.source(), Some(PathBuf::from("/base/in.pdf")));
        assert_eq!(merged.dest(), Some(PathBuf::from("/overlay/out.txt")));
        assert_eq!(merged.strategy(), Some(Strategy::WholeDocument));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                backend: Some("pure".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.backend(), Some("pure"));
    }

    #[test]
    fn load_from_path_ignores_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[paths\nsource =").unwrap();
        assert!(load_from_path(&bad).is_none());
    }

    #[test]
    fn load_strict_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[extraction]\nstrategy = \"sideways\"\n").unwrap();

        let err = load_strict(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
        let message = err.to_string();
        assert!(message.starts_with("failed to parse config"));
        assert!(message.contains("(line 2)"));
        assert!(!message.contains('\n'), "{message:?}");
    }

    #[test]
    fn syntax_errors_are_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[paths]\nsource = \"a.pdf\"\n[extraction\n").unwrap();

        let err = load_strict(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line, .. } if line >= 3));
        assert!(!err.to_string().contains('\n'));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn read_errors_keep_the_io_cause() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_strict(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
