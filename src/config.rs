//! Configuration management for nowshare

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::format::{self, FormatPattern, FormatPatternModifier};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Share-text settings
    pub sharing: SharingConfig,

    /// Player filtering
    pub players: PlayerConfig,

    /// Where rendered share text goes
    pub output: OutputConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Data directory (default: ~/.local/share/nowshare)
    pub data_dir: Option<PathBuf>,
}

/// Share-text template and decoration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharingConfig {
    /// The share-text template
    pub template: String,

    /// Per-placeholder prefix/suffix decorations
    pub modifiers: Vec<FormatPatternModifier>,

    /// Fill the SU placeholder with a public search URL for the track
    pub include_service_url: bool,
}

/// Player filtering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Whitelist of player names (empty = all players)
    pub whitelist: Vec<String>,

    /// Blacklist of player names
    pub blacklist: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Also write the latest share text to this file (e.g. for OBS overlays)
    pub file: Option<PathBuf>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            template: format::DEFAULT_TEMPLATE.to_string(),
            modifiers: Vec::new(),
            include_service_url: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join("nowshare").join("config.toml"))
    }

    /// Get the data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.general.data_dir {
            Ok(dir.clone())
        } else {
            let data_dir = dirs::data_local_dir()
                .ok_or_else(|| Error::config("Could not determine data directory"))?;
            Ok(data_dir.join("nowshare"))
        }
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable
    /// ranges. Template errors are caught here, at edit time, rather than
    /// surfacing as odd render output later.
    pub fn validate(&self) -> Result<()> {
        // Validate log_level is a known level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        // Validate the share template is well formed
        format::validate(&self.sharing.template)
            .map_err(|e| Error::config(format!("sharing.template: {e}")))?;

        // Only metadata placeholders may carry a modifier
        let replaceable = FormatPattern::replaceable();
        for modifier in &self.sharing.modifiers {
            if !replaceable.contains(&modifier.key) {
                return Err(Error::config(format!(
                    "modifier on non-replaceable placeholder {:?}",
                    modifier.key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sharing.template, format::DEFAULT_TEMPLATE);
        assert!(config.sharing.modifiers.is_empty());
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.sharing.template = "TI\\nAR".to_string();
        config.sharing.modifiers = vec![FormatPatternModifier::new(
            FormatPattern::Album,
            Some("("),
            Some(")"),
        )];
        config.players.blacklist = vec!["firefox".to_string()];
        config.output.file = Some(PathBuf::from("/tmp/nowplaying.txt"));

        let contents = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&contents).unwrap();
        assert_eq!(back.sharing.template, config.sharing.template);
        assert_eq!(back.sharing.modifiers, config.sharing.modifiers);
        assert_eq!(back.players.blacklist, config.players.blacklist);
        assert_eq!(back.output.file, config.output.file);
    }

    #[test]
    fn parses_user_shaped_config() {
        let config: Config = toml::from_str(
            r#"
            [general]
            log_level = "debug"

            [sharing]
            template = "'now playing' TI - AR"
            include_service_url = true

            [[sharing.modifiers]]
            placeholder = "title"
            prefix = "「"
            suffix = "」"

            [players]
            blacklist = ["chromium"]
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert!(config.sharing.include_service_url);
        assert_eq!(config.sharing.modifiers[0].key, FormatPattern::Title);
    }

    #[test]
    fn rejects_bad_log_level() {
        let mut config = Config::default();
        config.general.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unterminated_template() {
        let mut config = Config::default();
        config.sharing.template = "TI - AR '".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_modifier_on_escape_pattern() {
        let mut config = Config::default();
        config.sharing.modifiers = vec![FormatPatternModifier::new(
            FormatPattern::NewLine,
            Some("-"),
            None::<String>,
        )];
        assert!(config.validate().is_err());
    }
}
