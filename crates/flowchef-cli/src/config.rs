use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchefConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Directory holding the recipe collection and preferences.
    pub data_dir: PathBuf,
    /// Where exports are written when no `--out` is given. Added in v1;
    /// `None` means the current directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    pub created_at: jiff::Timestamp,
}

impl FlowchefConfig {
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Set a field by its CLI name. An empty `export-dir` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> eyre::Result<()> {
        match key {
            "data-dir" if value.is_empty() => {
                return Err(eyre::eyre!("data-dir cannot be empty"));
            }
            "data-dir" => self.data_dir = PathBuf::from(value),
            "export-dir" if value.is_empty() => self.export_dir = None,
            "export-dir" => self.export_dir = Some(PathBuf::from(value)),
            other => {
                return Err(eyre::eyre!(
                    "unknown config key {other:?} (expected data-dir or export-dir)"
                ));
            }
        }
        Ok(())
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("flowchef"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flowchef")
}

pub fn default_config() -> FlowchefConfig {
    FlowchefConfig {
        config_version: CURRENT_VERSION,
        data_dir: default_data_dir(),
        export_dir: None,
        created_at: jiff::Timestamp::now(),
    }
}

/// Load the config from its standard location, or defaults if there is none.
pub fn load_or_default() -> eyre::Result<FlowchefConfig> {
    let path = config_path()?;
    if path.exists() {
        load_config_from(&path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(default_config())
    }
}

pub fn load_config_from(path: &Path) -> eyre::Result<FlowchefConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: FlowchefConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update flowchef."
        ));
    }

    // v0 → v1: add export_dir
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("export_dir").or_insert(serde_json::Value::Null);
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added export_dir)");
    }

    Ok(json)
}

pub fn save_config(config: &FlowchefConfig) -> eyre::Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &FlowchefConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v0_gains_export_dir_and_version() {
        let v0 = json!({
            "data_dir": "/tmp/flowchef",
            "created_at": "2024-01-01T00:00:00Z"
        });
        let migrated = migrate(v0, 0).unwrap();
        assert_eq!(migrated["config_version"], 1);
        assert!(migrated["export_dir"].is_null());

        let config: FlowchefConfig = serde_json::from_value(migrated).unwrap();
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn newer_versions_are_refused() {
        assert!(migrate(json!({}), CURRENT_VERSION + 1).is_err());
    }

    #[test]
    fn set_updates_known_keys_only() {
        let mut config = default_config();
        config.set("export-dir", "/tmp/out").unwrap();
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/out"));
        config.set("export-dir", "").unwrap();
        assert_eq!(config.export_dir, None);
        config.set("data-dir", "/tmp/data").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/data"));

        assert!(config.set("data-dir", "").is_err());
        assert!(config.set("colour", "blue").is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let mut config = default_config();
        config.config_version = 0;
        config.export_dir = Some(dir.path().join("exports"));

        save_config_to(&path, &config).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.config_version, CURRENT_VERSION);
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.export_dir, config.export_dir);
        assert_eq!(loaded.created_at, config.created_at);
    }
}
