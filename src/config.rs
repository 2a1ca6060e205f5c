use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::ConfigError;

/// Process-wide settings, loaded once at startup and passed by reference
/// into the pipeline. The pipeline must not start without the two channel
/// ids and the QR payload URL.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub channels: Channels,
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Deserialize)]
pub struct Channels {
    /// Channel watched for incoming order notifications.
    pub source: String,
    /// Channel that receives the rendered receipts.
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptConfig {
    /// Fixed URL embedded in every receipt's scannable code.
    pub qr_url: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "receipts".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.source.trim().is_empty() {
            return Err(ConfigError::Missing("channels.source"));
        }
        if self.channels.destination.trim().is_empty() {
            return Err(ConfigError::Missing("channels.destination"));
        }
        if self.receipt.qr_url.trim().is_empty() {
            return Err(ConfigError::Missing("receipt.qr_url"));
        }
        Ok(())
    }
}
