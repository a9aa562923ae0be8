//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Installs the global tracing subscriber for the selected profile. Only the
/// first call has any effect.
///
/// - **Development**: human-readable logs, `relbox=debug` unless `RUST_LOG` is set
/// - **Production**: JSON logs, `relbox=info` unless `RUST_LOG` is set
/// - **Test**: bare registry; use `init_test_capture()` to record events
///
/// # Example
///
/// ```
/// use relbox_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("relbox=debug")),
                )
                .try_init();
            if let Err(err) = installed {
                already_installed(err);
            }
        }
        Profile::Production => {
            let installed = tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("relbox=info")),
                )
                .try_init();
            if let Err(err) = installed {
                already_installed(err);
            }
        }
        Profile::Test => {
            if let Err(err) = tracing_subscriber::registry().try_init() {
                already_installed(err);
            }
        }
    });
}

fn already_installed(err: impl std::fmt::Display) {
    tracing::debug!(error = %err, "global subscriber already installed, keeping it");
}
