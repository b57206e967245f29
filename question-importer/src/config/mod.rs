//! Importer configuration
//!
//! Settings come from an optional TOML file and are overridden by command
//! line flags. The file lives at `~/.config/question-importer/config.toml`
//! unless `--config` points elsewhere:
//!
//! ```toml
//! source_path = "wctquestionscombined.xlsx"
//! store_path = "questions.db"
//! difficulty_policy = "strict-null"   # or "default-medium"
//! commit_mode = "atomic"              # or "per-batch"
//! batch_size = 100
//! ```
//!
//! Relative paths in the file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::import::store::DEFAULT_QUESTION_TYPE_COLUMN;
use crate::import::{CommitMode, DifficultyPolicy};

pub const DEFAULT_BATCH_SIZE: usize = 100;

const APP_DIR: &str = "question-importer";
const CONFIG_FILE: &str = "config.toml";

/// Partial settings, as read from a file or collected from flags
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub sheet: Option<String>,
    pub difficulty_policy: Option<DifficultyPolicy>,
    pub commit_mode: Option<CommitMode>,
    pub batch_size: Option<usize>,
    pub question_type_column: Option<String>,
}

impl ConfigFile {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Parse a config file, resolving relative paths against its directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.source_path = config.source_path.map(|p| resolve_relative(base, p));
            config.store_path = config.store_path.map(|p| resolve_relative(base, p));
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicitly requested file, or the default file if it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file does not exist: {}", path.display());
            }
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: ConfigFile) -> ConfigFile {
        ConfigFile {
            source_path: overrides.source_path.or(self.source_path),
            store_path: overrides.store_path.or(self.store_path),
            sheet: overrides.sheet.or(self.sheet),
            difficulty_policy: overrides.difficulty_policy.or(self.difficulty_policy),
            commit_mode: overrides.commit_mode.or(self.commit_mode),
            batch_size: overrides.batch_size.or(self.batch_size),
            question_type_column: overrides.question_type_column.or(self.question_type_column),
        }
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() && !base.as_os_str().is_empty() {
        base.join(path)
    } else {
        path
    }
}

/// Fully resolved settings handed to the importer
#[derive(Debug, Clone, PartialEq)]
pub struct ImporterConfig {
    pub source_path: PathBuf,
    pub store_path: PathBuf,
    /// Worksheet to read; first sheet when `None`
    pub sheet: Option<String>,
    pub difficulty_policy: DifficultyPolicy,
    pub commit_mode: CommitMode,
    pub batch_size: usize,
    /// Store column receiving the normalized Question Type
    pub question_type_column: String,
    /// Read and normalize only
    pub dry_run: bool,
    /// Suppress per-batch progress lines
    pub quiet: bool,
}

impl ImporterConfig {
    /// Validate merged settings
    pub fn from_settings(settings: ConfigFile, dry_run: bool, quiet: bool) -> Result<Self> {
        let Some(source_path) = settings.source_path else {
            bail!("No source spreadsheet configured. Pass --source or set source_path in the config file.");
        };
        let Some(store_path) = settings.store_path else {
            bail!("No question store configured. Pass --store or set store_path in the config file.");
        };

        let batch_size = settings.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            bail!("batch_size must be at least 1");
        }

        let question_type_column = settings
            .question_type_column
            .unwrap_or_else(|| DEFAULT_QUESTION_TYPE_COLUMN.to_string());
        if question_type_column.trim().is_empty() {
            bail!("question_type_column cannot be empty");
        }

        Ok(Self {
            source_path,
            store_path,
            sheet: settings.sheet,
            difficulty_policy: settings.difficulty_policy.unwrap_or_default(),
            commit_mode: settings.commit_mode.unwrap_or_default(),
            batch_size,
            question_type_column,
            dry_run,
            quiet,
        })
    }
}
