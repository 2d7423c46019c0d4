use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MAX_RECENT_REPOS: usize = 10;

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_ui_scale() -> f32 {
    1.0
}

/// Persisted application settings. Unknown fields from newer versions are
/// ignored and missing ones fall back to defaults, so the file survives
/// upgrades in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_ui_scale")]
    pub ui_scale: f32,
    /// Most recently analyzed repository URLs, newest first.
    #[serde(default)]
    pub recent_repos: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            ui_scale: default_ui_scale(),
            recent_repos: Vec::new(),
        }
    }
}

impl AppSettings {
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("codeviz").join("settings.json"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "settings file is corrupt, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory on this platform"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Record an analyzed repository URL, moving repeats to the top.
    pub fn remember_repo(&mut self, url: &str) {
        self.recent_repos.retain(|existing| existing != url);
        self.recent_repos.insert(0, url.to_string());
        self.recent_repos.truncate(MAX_RECENT_REPOS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AppSettings::default();
        settings.backend_url = "http://analysis.internal:9000".to_string();
        settings.remember_repo("https://github.com/a/b");
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded.backend_url, "http://analysis.internal:9000");
        assert_eq!(loaded.recent_repos, vec!["https://github.com/a/b"]);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppSettings::load_from(&dir.path().join("nope.json"));
        assert_eq!(loaded.backend_url, "http://localhost:8000");
    }

    #[test]
    fn test_remember_repo_dedupes_and_caps() {
        let mut settings = AppSettings::default();
        for i in 0..12 {
            settings.remember_repo(&format!("https://github.com/a/r{i}"));
        }
        settings.remember_repo("https://github.com/a/r5");

        assert_eq!(settings.recent_repos.len(), MAX_RECENT_REPOS);
        assert_eq!(settings.recent_repos[0], "https://github.com/a/r5");
        assert_eq!(
            settings
                .recent_repos
                .iter()
                .filter(|r| r.as_str() == "https://github.com/a/r5")
                .count(),
            1
        );
    }
}
