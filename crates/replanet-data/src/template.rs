//! Reading and writing configuration (template) files.
//!
//! The file format follows the extension, the same way catalog files do.

use std::path::{Path, PathBuf};

use replanet_core::configuration::Configuration;
use tracing::debug;

use crate::loader::{DataLoadError, Format, deserialize_file, detect_format};

/// Read a configuration file. Structural validation is left to the engine.
pub fn load_configuration(path: &Path) -> Result<Configuration, DataLoadError> {
    let config: Configuration = deserialize_file(path)?;
    debug!(
        file = %path.display(),
        environment = %config.environment,
        facilities = config.facilities.len(),
        routes = config.routes.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Render a configuration in `format`.
pub fn render_configuration(config: &Configuration, format: Format) -> Result<String, String> {
    match format {
        Format::Ron => ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
            .map_err(|e| e.to_string()),
        Format::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        Format::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
    }
}

/// Write a configuration to `path` in the format its extension names.
pub fn save_configuration(path: &Path, config: &Configuration) -> Result<(), DataLoadError> {
    let format = detect_format(path)?;
    let mut content = render_configuration(config, format).map_err(|detail| {
        DataLoadError::Serialize {
            file: path.to_path_buf(),
            detail,
        }
    })?;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    std::fs::write(path, content)?;
    debug!(file = %path.display(), "configuration saved");
    Ok(())
}

/// `<stem>.converted.<ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("configuration");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("json");
    input.with_file_name(format!("{stem}.converted.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use replanet_core::id::MaterialId;
    use replanet_core::test_utils::ladder_config;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "replanet_template_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_json_template() {
        let dir = make_test_dir("load_json");
        let path = dir.join("t.json");
        fs::write(
            &path,
            r#"{
                "environment": 2016,
                "comment": "mech parts",
                "facilities": [
                    {"facility_type": 2848, "output": 2267},
                    {"facility_type": 2541}
                ],
                "routes": [{"path": [1, 2], "quantity": 3000, "material": 2267}]
            }"#,
        )
        .unwrap();

        let config = load_configuration(&path).unwrap();
        assert_eq!(config.facilities.len(), 2);
        assert_eq!(config.facilities[0].output, Some(MaterialId(2267)));
        assert_eq!(config.facilities[1].output, None);
        assert!(config.links.is_empty());
        assert_eq!(config.level, 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_then_load_preserves_configuration() {
        let dir = make_test_dir("save_load");
        for ext in ["ron", "json", "toml"] {
            let path = dir.join(format!("t.{ext}"));
            save_configuration(&path, &ladder_config()).unwrap();
            let loaded = load_configuration(&path).unwrap();
            assert_eq!(loaded, ladder_config(), "format {ext}");
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_to_unknown_extension_fails_without_writing() {
        let dir = make_test_dir("save_bad");
        let path = dir.join("t.yaml");
        assert!(matches!(
            save_configuration(&path, &ladder_config()),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(!path.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unassigned_output_is_omitted_from_json() {
        let text = render_configuration(&ladder_config(), Format::Json).unwrap();
        let storage = text.split("\"facility_type\": 13").nth(1).unwrap();
        assert!(!storage.split('}').next().unwrap().contains("output"));
    }

    #[test]
    fn default_output_path_keeps_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/barren.json")),
            PathBuf::from("/tmp/barren.converted.json")
        );
        assert_eq!(
            default_output_path(Path::new("plan.ron")),
            PathBuf::from("plan.converted.ron")
        );
    }
}
