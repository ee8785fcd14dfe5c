//! # Federation Telemetry
//!
//! Logging setup shared by every Salmon federation service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use federation_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Envelope and discovery events are now being recorded
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FED_SERVICE_NAME` | `salmon-federation` | Service name in log records |
//! | `FED_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `FED_CONSOLE_OUTPUT` | `true` | Write log records at all |
//! | `FED_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_LOG_LEVEL, DEFAULT_SERVICE_NAME};
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed
    #[error("Failed to install log subscriber: {0}")]
    Subscriber(String),

    /// The configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}
