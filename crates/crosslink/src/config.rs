//! Optional `crosslink.toml` settings.
//!
//! Relative paths in the file are resolved against the repository root.
//! Command-line flags take precedence over anything set here.

use crate::cli::CliError;
use crosslink_graph::NamespacePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the repository root when `--config` is not given.
pub const CONFIG_FILE: &str = "crosslink.toml";

/// Settings read from `crosslink.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Circular-dependency allowlist used by `tidylist`.
    pub allow_circular: Option<PathBuf>,
    /// Skip-list used by `tidylist`.
    pub skip: Option<PathBuf>,
    /// Modules left untouched by `insert` and `prune`.
    pub exclude: Vec<String>,
    /// Always validate tidy schedules.
    pub verify: bool,
    /// How module identifiers are matched against the root namespace.
    pub namespace_policy: NamespacePolicy,
}

impl FileConfig {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `source` if the TOML is invalid
    /// or contains unknown keys.
    pub fn from_toml(text: &str, source: &Path) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| {
            CliError::config_with_help(
                format!("Invalid configuration in {}: {e}", source.display()),
                "Known keys are allow_circular, skip, exclude, verify and namespace_policy",
            )
        })
    }

    /// Load the configuration for `root`.
    ///
    /// An explicit path must exist; the default `crosslink.toml` is optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an explicit file is missing, or if
    /// any file found cannot be read or parsed.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = explicit.map_or_else(|| root.join(CONFIG_FILE), Path::to_path_buf);
        if !path.is_file() {
            if explicit.is_some() {
                return Err(CliError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "No configuration file");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            CliError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text, &path)?;
        debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Allowlist location, with `flag` taking precedence.
    #[must_use]
    pub fn allow_circular_path(&self, root: &Path, flag: Option<&Path>) -> Option<PathBuf> {
        resolve(root, flag, self.allow_circular.as_deref())
    }

    /// Skip-list location, with `flag` taking precedence.
    #[must_use]
    pub fn skip_path(&self, root: &Path, flag: Option<&Path>) -> Option<PathBuf> {
        resolve(root, flag, self.skip.as_deref())
    }

    /// Exclusions from the command line, or from the file if none were given.
    #[must_use]
    pub fn exclusions(&self, flag: &[String]) -> Vec<String> {
        if flag.is_empty() {
            self.exclude.clone()
        } else {
            flag.to_vec()
        }
    }
}

fn resolve(root: &Path, flag: Option<&Path>, file: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        file.map(|p| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        })
    })
}
