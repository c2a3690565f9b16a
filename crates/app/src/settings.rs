//! Handles settings for the application. Configuration is written in
//! `settings.toml`, every field can be omitted.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Database connection string, e.g. `sqlite:./orafo.db?mode=rwc`.
    pub database: Option<String>,
    /// Log level filter for the `tracing` subscriber.
    pub level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .build()?;

        settings.try_deserialize()
    }
}
