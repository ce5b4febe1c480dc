use crate::constants::DEFAULT_BACKEND_URL;
use crate::models::Session;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.yaml";
const SESSION_FILE: &str = "session.yaml";

/// On-disk application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer key for the movie metadata API
    #[serde(default)]
    pub tmdb_api_key: String,
    /// Endpoint of the account & saved-movies backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Backend project id, sent with every backend request
    #[serde(default)]
    pub backend_project: String,
}

fn default_backend_url() -> String {
    String::from(DEFAULT_BACKEND_URL)
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tmdb_api_key: String::new(),
            backend_url: default_backend_url(),
            backend_project: String::new(),
        }
    }
}

/// Manages config and the persisted session under `~/.marquee`
pub struct Storage {
    pub config: AppConfig,
    config_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".marquee");
        Self::with_dir(config_dir)
    }

    /// Open storage rooted at an explicit directory
    pub fn with_dir(config_dir: PathBuf) -> Self {
        let mut storage = Storage {
            config: AppConfig::default(),
            config_dir,
        };

        if let Err(e) = storage.load_config() {
            tracing::warn!("failed to load config: {}", e);
        }
        storage.apply_env_overrides();
        storage
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Load `config.yaml` if present
    fn load_config(&mut self) -> Result<()> {
        let path = self.config_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(path)?;
        self.config = serde_yaml::from_str(&content)?;
        Ok(())
    }

    /// Environment variables win over file values
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("MARQUEE_TMDB_API_KEY") {
            self.config.tmdb_api_key = key;
        }
        if let Ok(url) = std::env::var("MARQUEE_BACKEND_URL") {
            self.config.backend_url = url;
        }
        if let Ok(project) = std::env::var("MARQUEE_BACKEND_PROJECT") {
            self.config.backend_project = project;
        }
    }

    /// Write the current config back to disk
    pub fn save_config(&self) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_yaml::to_string(&self.config)?;
        fs::write(self.config_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }

    /// The session persisted by the last sign-in, if any
    pub fn load_session(&self) -> Option<Session> {
        let path = self.config_dir.join(SESSION_FILE);
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Persist a session so the next launch can resume it
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_yaml::to_string(session)?;
        fs::write(self.config_dir.join(SESSION_FILE), content)?;
        Ok(())
    }

    /// Forget the persisted session (sign-out)
    pub fn clear_session(&self) -> Result<()> {
        let path = self.config_dir.join(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        assert!(storage.load_session().is_none());

        let session = Session {
            id: String::from("sess_1"),
            token: String::from("secret"),
        };
        storage.save_session(&session).unwrap();
        assert_eq!(storage.load_session(), Some(session));

        storage.clear_session().unwrap();
        assert!(storage.load_session().is_none());
        // Clearing twice is fine
        storage.clear_session().unwrap();
    }

    #[test]
    fn test_config_roundtrip_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(storage.config.backend_url, DEFAULT_BACKEND_URL);

        storage.config.tmdb_api_key = String::from("k123");
        storage.config.backend_project = String::from("marquee");
        storage.save_config().unwrap();

        let reloaded = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.config.tmdb_api_key, "k123");
        assert_eq!(reloaded.config.backend_project, "marquee");
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "not: [valid").unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(storage.config.backend_url, DEFAULT_BACKEND_URL);
    }
}
