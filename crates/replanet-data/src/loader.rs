//! Resolution pipeline: reads catalog files, builds the frozen catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers used by catalog and configuration loading.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use replanet_core::catalog::{Catalog, CatalogBuilder, CatalogError, RecipeLine};
use tracing::debug;

use crate::schema::{EnvironmentData, FacilityData, MaterialData, RecipeData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A serialization error occurred.
    #[error("could not write {file}: {detail}")]
    Serialize { file: PathBuf, detail: String },

    /// The catalog files parsed but do not form a consistent catalog.
    #[error("invalid catalog in {dir}: {source}")]
    Catalog { dir: PathBuf, source: CatalogError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats, named by their extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for format in [Format::Ron, Format::Toml, Format::Json] {
        let candidate = dir.join(format!("{base_name}.{}", format.extension()));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .get(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
        .clone();
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Catalog loading
// ===========================================================================

pub const MATERIALS_FILE: &str = "materials";
pub const ENVIRONMENTS_FILE: &str = "environments";
pub const FACILITIES_FILE: &str = "facilities";
pub const RECIPES_FILE: &str = "recipes";

/// Load the four catalog tables from `dir` and freeze them into a [`Catalog`].
///
/// Entries keep the order they have in their files; that order is the
/// catalog order used for tie-breaks.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let materials: Vec<MaterialData> =
        deserialize_list(&require_data_file(dir, MATERIALS_FILE)?, MATERIALS_FILE)?;
    let environments: Vec<EnvironmentData> =
        deserialize_list(&require_data_file(dir, ENVIRONMENTS_FILE)?, ENVIRONMENTS_FILE)?;
    let facilities: Vec<FacilityData> =
        deserialize_list(&require_data_file(dir, FACILITIES_FILE)?, FACILITIES_FILE)?;
    let recipes: Vec<RecipeData> =
        deserialize_list(&require_data_file(dir, RECIPES_FILE)?, RECIPES_FILE)?;

    debug!(
        dir = %dir.display(),
        materials = materials.len(),
        environments = environments.len(),
        facilities = facilities.len(),
        recipes = recipes.len(),
        "catalog files parsed"
    );

    let mut builder = CatalogBuilder::new();
    for m in materials {
        builder.register_material(m.id, m.tier, &m.description);
    }
    for e in environments {
        builder.register_environment(e.id, &e.name, e.basic_products, e.raw_resources);
    }
    for f in facilities {
        builder.register_facility(f.id, f.tier, f.environment, &f.description);
    }
    for r in recipes {
        let lines = r
            .lines
            .into_iter()
            .map(|l| RecipeLine {
                material: l.material,
                is_output: l.is_output,
            })
            .collect();
        builder.register_recipe(&r.name, lines);
    }

    builder.build().map_err(|source| DataLoadError::Catalog {
        dir: dir.to_path_buf(),
        source,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
