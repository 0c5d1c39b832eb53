//! Configuration loading for extraction runs
//!
//! Config documents may be TOML, JSON or YAML; the format is picked from the
//! file extension. Every document is normalised into a `serde_json::Value`
//! so that file values and command-line overrides merge the same way.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration loader that supports TOML, JSON, and YAML
#[derive(Debug, Default)]
pub struct ConfigLoader {
    configs: HashMap<String, serde_json::Value>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file (auto-detects format), keyed by file stem
    pub fn load_file(&mut self, path: &Path) -> crate::Result<&serde_json::Value> {
        let value = read_document(path)?;
        let config_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("default")
            .to_string();

        let slot = self.configs.entry(config_name).or_insert(serde_json::Value::Null);
        *slot = value;
        Ok(slot)
    }
}

fn read_document(path: &Path) -> crate::Result<serde_json::Value> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = std::fs::read_to_string(path)?;

    match extension.as_str() {
        "toml" => {
            let toml_value: toml::Value = toml::from_str(&content)
                .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {e}")))?;
            serde_json::to_value(toml_value)
                .map_err(|e| crate::UtilError::Config(format!("TOML conversion error: {e}")))
        }
        "json" => serde_json::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {e}"))),
        "yml" | "yaml" => serde_yaml::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {e}"))),
        _ => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {extension}"
        ))),
    }
}

/// Deep-merge two JSON values; `overlay` wins on conflicts
pub fn merge_configs(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(overlay_obj)) => {
            for (key, value) in overlay_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_configs(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, overlay_value) => *base_value = overlay_value,
    }
}

/// Settings for one extraction run.
///
/// Inputs are processed in the listed order; later inputs override earlier
/// ones ability-by-ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub parallel: bool,
    pub log_level: Option<String>,
}

impl ExtractConfig {
    /// Read an extraction config; an `[extract]` table takes precedence over
    /// the document root.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let mut loader = ConfigLoader::new();
        let document = loader.load_file(path)?;
        let section = document.get("extract").unwrap_or(document).clone();
        serde_json::from_value(section)
            .map_err(|e| crate::UtilError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply another config on top of this one.
    pub fn merged_with(&self, overlay: serde_json::Value) -> crate::Result<Self> {
        let mut base = serde_json::to_value(self)
            .map_err(|e| crate::UtilError::Serialization(e.to_string()))?;
        merge_configs(&mut base, overlay);
        serde_json::from_value(base).map_err(|e| crate::UtilError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.inputs.is_empty() {
            return Err(crate::UtilError::Config("no input modules configured".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(crate::UtilError::Config("no output path configured".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_loader() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("run.json");
        std::fs::write(&config_path, r#"{"extract": {"output": "out.json", "parallel": true}}"#)?;

        let mut loader = ConfigLoader::new();
        let document = loader.load_file(&config_path)?;

        assert_eq!(document["extract"]["output"], "out.json");
        assert_eq!(document["extract"]["parallel"], true);
        assert!(document["extract"].get("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_extract_section_from_toml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("hookscan.toml");
        std::fs::write(
            &config_path,
            r#"
[extract]
inputs = ["data/abilities.ts", "data/mods/gen9/abilities.ts"]
output = "abilities_hooks.json"
"#,
        )?;

        let config = ExtractConfig::from_file(&config_path)?;
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.inputs[1], PathBuf::from("data/mods/gen9/abilities.ts"));
        assert_eq!(config.output, PathBuf::from("abilities_hooks.json"));
        assert!(!config.parallel);
        config.validate()
    }

    #[test]
    fn test_root_level_yaml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("hookscan.yaml");
        std::fs::write(&config_path, "inputs:\n  - a.ts\noutput: out.json\nlog_level: debug\n")?;

        let config = ExtractConfig::from_file(&config_path)?;
        assert_eq!(config.inputs, vec![PathBuf::from("a.ts")]);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let config = ExtractConfig {
            output: PathBuf::from("out.json"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_overlay_wins() -> crate::Result<()> {
        let base = ExtractConfig {
            inputs: vec![PathBuf::from("a.ts")],
            output: PathBuf::from("a.json"),
            parallel: false,
            log_level: None,
        };
        let merged = base.merged_with(serde_json::json!({"output": "b.json", "parallel": true}))?;
        assert_eq!(merged.inputs, vec![PathBuf::from("a.ts")]);
        assert_eq!(merged.output, PathBuf::from("b.json"));
        assert!(merged.parallel);
        Ok(())
    }

    #[test]
    fn test_unsupported_extension() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("hookscan.ini");
        std::fs::write(&config_path, "output=x")?;
        assert!(ExtractConfig::from_file(&config_path).is_err());
        Ok(())
    }
}
