use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::presence::Activity;

const SETTINGS_FILE: &str = "settings.json";

pub const MIN_PUMP_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_PUMP_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub application_id: String,
    pub pump_interval_ms: u64,
    pub activity: Activity,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            pump_interval_ms: MIN_PUMP_INTERVAL.as_millis() as u64,
            activity: Activity::default(),
        }
    }
}

impl BridgeSettings {
    /// Callback pump cadence, kept within 1-2 seconds
    pub fn pump_interval(&self) -> Duration {
        Duration::from_millis(self.pump_interval_ms).clamp(MIN_PUMP_INTERVAL, MAX_PUMP_INTERVAL)
    }
}

pub fn default_settings_path() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir().ok_or("Failed to get config directory")?;
    Ok(config_dir.join("presence-bridge").join(SETTINGS_FILE))
}

pub fn load_settings(path: &Path) -> Result<BridgeSettings, String> {
    tracing::debug!("Loading settings from {}", path.display());

    if !path.exists() {
        return Ok(BridgeSettings::default());
    }

    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read settings file: {}", e))?;

    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
}

pub fn save_settings(path: &Path, settings: &BridgeSettings) -> Result<(), String> {
    tracing::debug!("Saving settings to {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    fs::write(path, contents).map_err(|e| format!("Failed to write settings file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("missing.json")).unwrap();

        assert!(settings.application_id.is_empty());
        assert_eq!(settings.pump_interval(), MIN_PUMP_INTERVAL);
        assert_eq!(settings.activity, Activity::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let settings = BridgeSettings {
            application_id: "1383904378154651768".to_string(),
            pump_interval_ms: 1500,
            activity: Activity::builder()
                .details("In a match")
                .start_timestamp(0)
                .build(),
        };
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.application_id, settings.application_id);
        assert_eq!(loaded.pump_interval(), Duration::from_millis(1500));
        assert_eq!(loaded.activity, settings.activity);
    }

    #[test]
    fn test_pump_interval_is_clamped() {
        let fast = BridgeSettings {
            pump_interval_ms: 10,
            ..Default::default()
        };
        let slow = BridgeSettings {
            pump_interval_ms: 60_000,
            ..Default::default()
        };

        assert_eq!(fast.pump_interval(), MIN_PUMP_INTERVAL);
        assert_eq!(slow.pump_interval(), MAX_PUMP_INTERVAL);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"));
    }
}
