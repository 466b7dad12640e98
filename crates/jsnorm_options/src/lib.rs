//! jsnorm_options: `jsnorm.json` parsing and source discovery.
//!
//! A project file names the scripts to normalize and tunes the engine:
//!
//! ```json
//! {
//!   "normalizeOptions": { "indentWidth": 2, "maxRewrites": 10000 },
//!   "include": ["src/**/*.js"],
//!   "exclude": ["src/vendor"],
//!   "outDir": "dist"
//! }
//! ```
//!
//! Every field is optional. Flags given on the command line override the
//! values read here.

mod discover;

pub use discover::{collect_js_files, discover_source_files, DEFAULT_INCLUDE, SKIPPED_DIRECTORIES};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The conventional file name of a project file.
pub const CONFIG_FILE_NAME: &str = "jsnorm.json";

/// Widest accepted indentation, in spaces.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Engine and printer settings, matching the `normalizeOptions` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Re-parse emitted text and compare it with the normalized tree.
    pub verify_round_trip: Option<bool>,
    /// Run the canonical-form checker after the fixpoint.
    pub check_canonical: Option<bool>,
    /// Append a bare `return;` to bodies that can fall off the end.
    pub explicit_returns: Option<bool>,
    /// Write assigned globals through the global object rather than
    /// declaring them.
    pub reference_errors: Option<bool>,
    /// Route every `return` through a single final one.
    pub unify_returns: Option<bool>,
    /// Split two-branch `if` statements.
    pub unfold_ifs: Option<bool>,
    /// Spaces per indentation level in emitted text.
    pub indent_width: Option<usize>,
    /// Upper bound on rule applications per file.
    pub max_rewrites: Option<usize>,
}

/// The `jsnorm.json` file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsnormConfig {
    pub normalize_options: Option<NormalizeOptions>,
    /// Explicit file list. When present, `include` and `exclude` are ignored.
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub out_dir: Option<String>,
}

impl JsnormConfig {
    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(options) = &self.normalize_options else {
            return Ok(());
        };
        if let Some(width) = options.indent_width {
            if width == 0 || width > MAX_INDENT_WIDTH {
                return Err(ConfigError::InvalidOption {
                    option: "indentWidth",
                    reason: format!("expected 1 to {MAX_INDENT_WIDTH}, found {width}"),
                });
            }
        }
        if options.max_rewrites == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "maxRewrites",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// `outDir` resolved against the directory holding the project file.
    pub fn out_dir_in(&self, root: &Path) -> Option<PathBuf> {
        self.out_dir.as_ref().map(|dir| root.join(dir))
    }
}

/// Errors raised while loading a project file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a valid jsnorm.json: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for '{option}': {reason}")]
    InvalidOption { option: &'static str, reason: String },
}

/// Parse a `jsnorm.json` file from a string.
pub fn parse_config(content: &str) -> Result<JsnormConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read, parse and validate a `jsnorm.json` file.
pub fn parse_config_file(path: &Path) -> Result<JsnormConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// The directory relative paths in a project file are resolved against.
pub fn config_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_all_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, JsnormConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_root() {
        assert_eq!(config_root(Path::new("jsnorm.json")), PathBuf::from("."));
        assert_eq!(config_root(Path::new("app/jsnorm.json")), PathBuf::from("app"));
    }

    #[test]
    fn test_out_dir_is_relative_to_root() {
        let config = JsnormConfig {
            out_dir: Some("dist".to_string()),
            ..Default::default()
        };
        assert_eq!(config.out_dir_in(Path::new("app")), Some(PathBuf::from("app/dist")));
        assert_eq!(JsnormConfig::default().out_dir_in(Path::new("app")), None);
    }
}
