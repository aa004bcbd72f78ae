//! Configuration file loading for Tutorbox
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interpreter.command.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter command is empty".to_string(),
            ));
        }
        if !self.interpreter.command.iter().any(|a| a.contains("{entry}")) {
            return Err(ConfigError::Invalid(
                "interpreter command has no {entry} placeholder".to_string(),
            ));
        }

        let source_name = &self.interpreter.source_name;
        if source_name.is_empty() {
            return Err(ConfigError::Invalid("source_name is empty".to_string()));
        }
        if source_name.contains("..") || source_name.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "source_name must be a bare file name: {source_name}"
            )));
        }

        if let Some(wall) = self.default_limits.wall_time
            && (!wall.is_finite() || wall <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "wall_time must be a finite positive number, got {wall}"
            )));
        }

        Ok(())
    }
}
