//! Settings file loading for replanet.
//!
//! Discovers and loads `replanet.toml` from the working directory (or an
//! explicit path). Merges file settings with CLI arguments (CLI takes
//! precedence).

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use replanet_core::{ConvertOptions, ProductPolicy};
use replanet_data::{Format, default_output_path, detect_format};
use serde::Deserialize;
use tracing::debug;

/// The settings file name to search for.
pub const SETTINGS_FILE_NAME: &str = "replanet.toml";

/// Top-level settings from replanet.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the catalog tables.
    pub catalog_dir: Option<PathBuf>,

    /// Format (`ron`, `json`, `toml`) for the default output path.
    pub output_format: Option<Format>,

    /// Conversion tunables.
    pub convert: ConvertOptions,
}

/// Discover replanet.toml in `dir`. Returns `None` if there is none.
pub fn discover_settings(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(SETTINGS_FILE_NAME);
    if path.exists() {
        debug!("found settings file at {}", path.display());
        Some(path)
    } else {
        debug!("no settings file found at {}", path.display());
        None
    }
}

/// Load and parse a settings file.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    parse_settings(&contents).with_context(|| format!("parse settings file {}", path.display()))
}

/// Parse settings from a string.
pub fn parse_settings(contents: &str) -> anyhow::Result<Settings> {
    let settings: Settings = toml::from_str(contents).context("invalid TOML")?;
    Ok(settings)
}

/// Load the explicit settings file, or discover one in `dir`, or fall back to defaults.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Settings> {
    if let Some(path) = explicit {
        return load_settings(path);
    }
    match discover_settings(dir) {
        Some(path) => load_settings(&path),
        None => Ok(Settings::default()),
    }
}

/// Settings after CLI overrides.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub catalog_dir: PathBuf,
    pub output_format: Option<Format>,
    pub options: ConvertOptions,
}

impl Resolved {
    /// Where the converted configuration goes: `explicit`, or the default
    /// sibling of `input` in the configured format. Fails when the path has
    /// no supported extension.
    pub fn output_path(&self, input: &Path, explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let path = default_output_path(input);
                match self.output_format {
                    Some(format) => path.with_extension(format.extension()),
                    None => path,
                }
            }
        };
        detect_format(&path).with_context(|| format!("output {}", path.display()))?;
        Ok(path)
    }
}

impl Settings {
    /// Apply CLI arguments on top of the file settings.
    pub fn merge(
        self,
        cli_catalog: Option<PathBuf>,
        cli_policy: Option<ProductPolicy>,
    ) -> anyhow::Result<Resolved> {
        let Some(catalog_dir) = cli_catalog.or(self.catalog_dir) else {
            bail!(
                "no catalog directory: pass --catalog or set catalog_dir in {SETTINGS_FILE_NAME}"
            );
        };
        let mut options = self.convert;
        if let Some(policy) = cli_policy {
            options.product_policy = policy;
        }
        Ok(Resolved {
            catalog_dir,
            output_format: self.output_format,
            options,
        })
    }
}
