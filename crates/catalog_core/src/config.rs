use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub base_url: String,
    pub api_key: String,
    pub page_size: Option<u32>,
    pub request_timeout_secs: u64,
    pub scroll_epsilon: f64,
    pub presentation: PresentationSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    pub initial_placeholder_cells: usize,
    pub trailing_placeholder_cells: usize,
    pub popular_games_shown: usize,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            initial_placeholder_cells: 8,
            trailing_placeholder_cells: 4,
            popular_games_shown: 3,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.rawg.io/api".into(),
            api_key: String::new(),
            page_size: None,
            request_timeout_secs: 30,
            scroll_epsilon: 1.0,
            presentation: PresentationSettings::default(),
        }
    }
}

impl CatalogSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    base_url: Option<String>,
    api_key: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    scroll_epsilon: Option<f64>,
    presentation: Option<PresentationSettings>,
}

/// Builds settings from defaults, then the TOML file, then the environment.
///
/// An explicitly passed `path` must exist; without one, `catalog.toml` in the
/// working directory is read only if present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<CatalogSettings> {
    let mut settings = CatalogSettings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };

    if let Some(raw) = raw {
        apply_file_settings(&mut settings, &raw)?;
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file_settings(settings: &mut CatalogSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid catalog config")?;

    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.api_key {
        settings.api_key = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.scroll_epsilon {
        settings.scroll_epsilon = v;
    }
    if let Some(v) = file_cfg.presentation {
        settings.presentation = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut CatalogSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("RAWG_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("RAWG_API_KEY") {
        settings.api_key = v;
    }
    if let Some(v) = env("APP__API_KEY") {
        settings.api_key = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = Some(parsed);
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
