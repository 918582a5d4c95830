//! Shortcut configuration
//!
//! Bindings live in a TOML file under the user's config directory
//! (`~/.config/gamepad-shortcuts/config.toml` on Linux). A default file with
//! media-player bindings is written on first start so there is something to
//! edit.
//!
//! ```toml
//! device = "/dev/input/js0"
//! shell = "/bin/sh"
//!
//! [[buttons]]
//! id = 0
//! command = "curl -s -X POST http://localhost:8080/play"
//! label = "Play"
//! ```
//!
//! The file is read once at startup. The resulting [`ButtonMapping`] is
//! immutable for the lifetime of the process.

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::executor::shell::DEFAULT_SHELL;
use crate::mapping::{ButtonMapping, MappingError};

const CONFIG_DIR: &str = "gamepad-shortcuts";
const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DEVICE: &str = "/dev/input/js0";

/// One button → command binding
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ButtonBinding {
    /// Joystick button number as reported by the driver
    pub id: u8,
    /// Shell command line to run on press
    pub command: String,
    /// Human readable name for the startup listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ButtonBinding {
    fn new(id: u8, command: &str, label: &str) -> Self {
        Self {
            id,
            command: command.to_string(),
            label: Some(label.to_string()),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ShortcutConfig {
    #[serde(default = "default_device")]
    pub device: PathBuf,
    #[serde(default = "default_shell")]
    pub shell: PathBuf,
    #[serde(default)]
    pub buttons: Vec<ButtonBinding>,
}

fn default_device() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE)
}

fn default_shell() -> PathBuf {
    PathBuf::from(DEFAULT_SHELL)
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            shell: default_shell(),
            buttons: vec![
                ButtonBinding::new(0, "curl -s -X POST http://localhost:8080/play", "Play"),
                ButtonBinding::new(1, "curl -s -X POST http://localhost:8080/next", "Next"),
                ButtonBinding::new(2, "curl -s -X POST http://localhost:8080/prev", "Previous"),
                ButtonBinding::new(3, "killall mpv", "Stop"),
                ButtonBinding::new(6, "curl -s -X POST http://localhost:8080/voldown", "Volume Down"),
                ButtonBinding::new(7, "curl -s -X POST http://localhost:8080/volup", "Volume Up"),
            ],
        }
    }
}

impl ShortcutConfig {
    /// `<config dir>/gamepad-shortcuts/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine the user config directory"))?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| eyre!("Failed to parse config: {}", e))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| eyre!("Failed to write config file {}: {}", path.display(), e))
    }

    /// Writes the default config to `path` unless a file is already there.
    pub async fn ensure_default_config(path: &Path) -> Result<()> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| eyre!("Failed to check if config file exists: {}", e))?;

        if !exists {
            info!("No config found, writing defaults to {}", path.display());
            Self::default().save(path).await?;
        }
        Ok(())
    }

    /// Loads `explicit` if given, otherwise the default location, creating it
    /// on first use. Returns the config together with the path it came from.
    pub async fn load_or_init(explicit: Option<&Path>) -> Result<(Self, PathBuf)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_path()?;
                Self::ensure_default_config(&path).await?;
                path
            }
        };

        let config = Self::load(&path).await?;
        Ok((config, path))
    }

    pub fn button_mapping(&self) -> Result<ButtonMapping, MappingError> {
        ButtonMapping::new(self.buttons.iter().map(|b| (b.id, b.command.as_str())))
    }

    pub fn label(&self, id: u8) -> Option<&str> {
        self.buttons
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| b.label.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bindings() {
        let config = ShortcutConfig::from_toml(
            r#"
            device = "/dev/input/js1"

            [[buttons]]
            id = 0
            command = "cmd-play"
            label = "Play"

            [[buttons]]
            id = 3
            command = "cmd-stop"
            "#,
        )
        .unwrap();

        assert_eq!(config.device, PathBuf::from("/dev/input/js1"));
        assert_eq!(config.shell, PathBuf::from(DEFAULT_SHELL));
        assert_eq!(config.label(0), Some("Play"));
        assert_eq!(config.label(3), None);

        let mapping = config.button_mapping().unwrap();
        assert_eq!(mapping.command(3), Some("cmd-stop"));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn empty_file_uses_defaults_without_bindings() {
        let config = ShortcutConfig::from_toml("").unwrap();
        assert_eq!(config.device, PathBuf::from(DEFAULT_DEVICE));
        assert!(config.button_mapping().unwrap().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let config = ShortcutConfig::from_toml(
            r#"
            [[buttons]]
            id = 1
            command = "a"

            [[buttons]]
            id = 1
            command = "b"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.button_mapping().unwrap_err(),
            MappingError::DuplicateButton(1)
        );
    }

    #[test]
    fn out_of_range_id_fails_to_parse() {
        let result = ShortcutConfig::from_toml(
            r#"
            [[buttons]]
            id = 300
            command = "a"
            "#,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn default_config_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        ShortcutConfig::ensure_default_config(&path).await.unwrap();
        let loaded = ShortcutConfig::load(&path).await.unwrap();
        assert_eq!(loaded, ShortcutConfig::default());
        assert_eq!(loaded.button_mapping().unwrap().len(), 6);

        std::fs::write(&path, "device = \"/dev/input/js2\"\n").unwrap();
        ShortcutConfig::ensure_default_config(&path).await.unwrap();
        let kept = ShortcutConfig::load(&path).await.unwrap();
        assert_eq!(kept.device, PathBuf::from("/dev/input/js2"));
    }

    #[tokio::test]
    async fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(ShortcutConfig::load_or_init(Some(&missing)).await.is_err());
    }
}
