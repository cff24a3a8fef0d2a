use anyhow::{Context, Result};
use pixmeta_core::batch::{BatchOptions, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Files inspected per chunk before yielding
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Pause between chunks (milliseconds)
    #[serde(default = "default_chunk_pause")]
    pub chunk_pause_ms: u64,

    /// Show progress bars
    #[serde(default = "default_progress")]
    pub show_progress: bool,

    /// Colored output
    #[serde(default = "default_color")]
    pub colored_output: bool,

    /// Print JSON instead of the table
    #[serde(default)]
    pub json_output: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_pause() -> u64 {
    30
}

fn default_progress() -> bool {
    true
}

fn default_color() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_pause_ms: default_chunk_pause(),
            show_progress: default_progress(),
            colored_output: default_color(),
            json_output: false,
        }
    }
}

impl Config {
    /// Get config file path (XDG-compliant)
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("", "", "pixmeta")
            .context("Failed to determine config directory")?
            .config_dir()
            .to_path_buf();

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

            tracing::debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            tracing::info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        tracing::debug!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Reset to defaults
    pub fn reset() -> Result<()> {
        let config = Self::default();
        config.save()
    }

    /// Update one field from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || format!("Invalid value for {}: {}", key, value);

        match key {
            "chunk_size" => {
                let size: usize = value.parse().with_context(invalid)?;
                if size == 0 {
                    anyhow::bail!("chunk_size must be at least 1");
                }
                self.chunk_size = size;
            }
            "chunk_pause_ms" => self.chunk_pause_ms = value.parse().with_context(invalid)?,
            "show_progress" => self.show_progress = value.parse().with_context(invalid)?,
            "colored_output" => self.colored_output = value.parse().with_context(invalid)?,
            "json_output" => self.json_output = value.parse().with_context(invalid)?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }

        Ok(())
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            chunk_size: self.chunk_size,
            chunk_pause: Duration::from_millis(self.chunk_pause_ms),
        }
    }
}
