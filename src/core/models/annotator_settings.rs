use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::global_constants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub color_rgb: [u8; 3],
    pub line_thickness: u32,
    #[serde(default)]
    pub label_font_path: Option<PathBuf>,
    pub label_font_size: f32,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            color_rgb: global_constants::DEFAULT_BOX_COLOR_RGB,
            line_thickness: global_constants::DEFAULT_BOX_LINE_THICKNESS,
            label_font_path: None,
            label_font_size: global_constants::DEFAULT_LABEL_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorSettings {
    pub vision_api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub box_style: BoxStyle,
}

fn default_max_results() -> u32 {
    global_constants::DEFAULT_MAX_RESULTS
}

fn default_request_timeout_seconds() -> u64 {
    global_constants::DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self {
            vision_api_url: global_constants::VISION_API_URL.to_string(),
            api_key: None,
            max_results: default_max_results(),
            request_timeout_seconds: default_request_timeout_seconds(),
            box_style: BoxStyle::default(),
        }
    }
}

impl AnnotatorSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Reads settings from `settings_path`, writing defaults there first if the file is missing.
    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!(
                "[SETTINGS] No settings file at {:?}, writing defaults",
                settings_path
            );
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: AnnotatorSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!("[SETTINGS] Vision API URL: {}", settings.vision_api_url);
        log::debug!(
            "[SETTINGS] max_results={}, timeout={}s",
            settings.max_results,
            settings.request_timeout_seconds
        );

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    pub fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(std::env::var(global_constants::API_KEY_ENV_VAR).ok())
    }

    /// The environment value wins over the settings file; blank values count as unset.
    pub fn resolve_api_key_with(&self, env_value: Option<String>) -> anyhow::Result<String> {
        let from_env = env_value.filter(|key| !key.trim().is_empty());
        let from_file = self.api_key.clone().filter(|key| !key.trim().is_empty());

        match (from_env, from_file) {
            (Some(key), _) => {
                log::debug!("[SETTINGS] Using API key from {}", global_constants::API_KEY_ENV_VAR);
                Ok(key.trim().to_string())
            }
            (None, Some(key)) => {
                log::debug!("[SETTINGS] Using API key from settings file");
                Ok(key.trim().to_string())
            }
            (None, None) => anyhow::bail!(
                "No vision API key configured: set {} or `api_key` in the settings file",
                global_constants::API_KEY_ENV_VAR
            ),
        }
    }
}
