use bracket_engine::LayoutOptions;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Viewer settings, loaded from a JSON config file. Missing file or fields
/// fall back to defaults; a broken file is reported but never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub full_screen: bool,
    /// "off" | "error" | "warn" | "info" | "debug" | "trace"
    pub log_level: Option<String>,
    /// Partial layout options merged over the engine defaults on every
    /// scene recompute.
    pub layout: LayoutOptions,
}

impl AppSettings {
    pub fn load() -> Self {
        let path = settings_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("ignoring invalid settings at {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.log_level.as_deref().and_then(|s| s.parse().ok())
    }
}

fn settings_path() -> PathBuf {
    if let Ok(path) = std::env::var("BRKT_CONFIG")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("brkt").join("config.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("brkt")
            .join("config.json");
    }
    PathBuf::from("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_parse_partial_json() {
        let settings: AppSettings = serde_json::from_str(
            r#"{"log_level": "debug", "layout": {"orientation": "top-to-bottom"}}"#,
        )
        .unwrap();
        assert_eq!(settings.level_filter(), Some(LevelFilter::Debug));
        assert_eq!(
            settings.layout.orientation,
            Some(bracket_engine::Orientation::TopToBottom)
        );
        assert!(!settings.full_screen);
        assert_eq!(settings.layout.node_width, None);
    }

    #[test]
    fn test_unknown_log_level_is_ignored() {
        let settings = AppSettings {
            log_level: Some("loud".into()),
            ..Default::default()
        };
        assert_eq!(settings.level_filter(), None);
    }
}
