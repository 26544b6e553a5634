//! Layered configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `CLASSBOOK_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use classbook_core::logging_facility::Profile;
use config::{Environment, File};
use serde::Deserialize;

pub const DEFAULT_DATA_FILE: &str = "data/classbook.json";
pub const DEFAULT_LOG_PROFILE: &str = "development";
const ENV_PREFIX: &str = "CLASSBOOK";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// JSON file the roster is loaded from and saved to
    pub data_file: PathBuf,
    pub log_profile: Profile,
}

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub log_profile: Option<String>,
}

impl Config {
    /// Resolve the configuration from every layer
    ///
    /// # Errors
    ///
    /// Fails if `config_file` is given but unreadable, or a value does not
    /// deserialize (an unknown log profile, for instance).
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(
            config_file,
            overrides,
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    fn load_with_env(
        config_file: Option<&Path>,
        overrides: &Overrides,
        env: Environment,
    ) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("data_file", DEFAULT_DATA_FILE)?
            .set_default("log_profile", DEFAULT_LOG_PROFILE)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(env)
            .set_override_option(
                "data_file",
                overrides
                    .data_file
                    .as_ref()
                    .map(|p| p.display().to_string()),
            )?
            .set_override_option("log_profile", overrides.log_profile.clone())?
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}
