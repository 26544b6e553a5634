//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;

use serde::Deserialize;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output for development
    #[serde(alias = "dev")]
    Development,
    /// JSON structured output for production
    #[serde(alias = "prod")]
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup; later calls are ignored, as is a call made after
/// another global subscriber was installed. Log lines go to stderr so
/// they never interleave with command feedback on stdout. `RUST_LOG`
/// overrides the profile's default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Installs nothing; use `init_test_capture()` to assert on events
///
/// # Example
///
/// ```
/// use classbook_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("classbook=debug")),
                )
                .finish()
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("classbook=info")),
                )
                .finish()
                .try_init()
                .ok();
        }
        // The capture subscriber is installed by init_test_capture()
        Profile::Test => {}
    });
}
