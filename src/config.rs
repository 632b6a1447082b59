// Serial port, loop rate and key handling configuration
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Serial port for the vehicle's microcontroller
pub const DEFAULT_PORT: &str = if cfg!(windows) { "COM3" } else { "/dev/ttyACM0" };

// Baud rate expected by the microcontroller firmware
pub const DEFAULT_BAUD: u32 = 115_200;

// Port timeout (only reads would observe it, and nothing is read)
pub const SERIAL_TIMEOUT: Duration = Duration::from_millis(100);

// Control loop frequency
pub const DEFAULT_POLL_HZ: u32 = 30;

// Held-key window for terminals that never report key releases.
// Must exceed the keyboard's auto-repeat delay or held keys flicker.
pub const DEFAULT_KEY_HOLD_MS: u64 = 500;

/// Error types for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: String,
    pub baud: u32,
    pub poll_hz: u32,
    pub key_hold_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            poll_hz: DEFAULT_POLL_HZ,
            key_hold_ms: DEFAULT_KEY_HOLD_MS,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.trim().is_empty() {
            return Err(ConfigError::Invalid("port must not be empty".into()));
        }
        if self.baud == 0 {
            return Err(ConfigError::Invalid("baud must be greater than 0".into()));
        }
        if self.poll_hz == 0 || self.poll_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "poll_hz must be within 1..=1000, got {}",
                self.poll_hz
            )));
        }
        Ok(())
    }

    /// Duration of one loop tick
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.poll_hz.max(1)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}
