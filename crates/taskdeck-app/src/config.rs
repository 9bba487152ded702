use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_core::{FilterOptions, ImportanceLevel, ProgressState};

/// Directory holding taskdeck state under a workdir.
pub const CONFIG_DIR: &str = ".taskdeck";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_STORE_FILE: &str = "store.json";

/// Top-level configuration loaded from `.taskdeck/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where the document store lives (`[store]`).
    #[serde(default)]
    pub store: StoreConfig,
    /// Filters applied when the task list loads (`[filters]`).
    #[serde(default)]
    pub filters: FiltersConfig,
}

impl AppConfig {
    /// Load configuration from `workdir`, falling back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed, or validated.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Location of the document file, resolved against `workdir`.
    pub fn store_path(&self, workdir: impl AsRef<Path>) -> PathBuf {
        let configured = self.store.path();
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            workdir.as_ref().join(configured)
        }
    }

    /// Initial filters for a new session.
    ///
    /// # Errors
    /// Returns an error naming the field when an enum token is not recognised.
    pub fn filter_options(&self) -> Result<FilterOptions> {
        self.filters.to_options()
    }

    fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().to_string_lossy().trim().is_empty() {
            bail!("store.path must not be blank");
        }
        self.filters.to_options().map(|_| ())
    }
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_path")]
    path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl StoreConfig {
    fn default_path() -> PathBuf {
        Path::new(CONFIG_DIR).join(DEFAULT_STORE_FILE)
    }

    /// Configured path, possibly relative.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `[filters]` block. Enum tokens accept the same spellings as the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    importance: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    sort_by_completion_date: bool,
    #[serde(default)]
    search: Option<String>,
}

impl FiltersConfig {
    fn to_options(&self) -> Result<FilterOptions> {
        let importance_filter = self
            .importance
            .as_deref()
            .map(str::parse::<ImportanceLevel>)
            .transpose()
            .context("filters.importance")?;
        let status_filter = self
            .status
            .as_deref()
            .map(str::parse::<ProgressState>)
            .transpose()
            .context("filters.status")?;
        Ok(FilterOptions {
            search_query: self.search.clone().unwrap_or_default(),
            importance_filter,
            status_filter,
            sort_by_completion_date: self.sort_by_completion_date,
        })
    }
}
