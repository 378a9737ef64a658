//! Log subscriber setup.
//!
//! Routers report configuration mistakes as warnings and unknown routes as
//! errors through `tracing`. Applications that do not install a subscriber of
//! their own can call [`init`] once at startup.

use pagenav_router::{LogFormat, LoggingSettings};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error returned by [`init`].
#[derive(Debug, Error)]
pub enum LoggingError {
	/// `level` is not a valid filter directive.
	#[error("Invalid log filter \"{directive}\": {source}")]
	InvalidFilter {
		directive: String,
		#[source]
		source: tracing_subscriber::filter::ParseError,
	},
	/// A global subscriber was already installed.
	#[error("Failed to install log subscriber: {0}")]
	Install(String),
}

/// Builds the filter: `RUST_LOG` when set, otherwise `settings.level`.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when `settings.level` cannot be
/// parsed and `RUST_LOG` is unset.
pub fn filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
	match EnvFilter::try_from_default_env() {
		Ok(filter) => Ok(filter),
		Err(_) => parse_level(&settings.level),
	}
}

fn parse_level(directive: &str) -> Result<EnvFilter, LoggingError> {
	EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
		directive: directive.to_string(),
		source,
	})
}

/// Installs a global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] for a bad level and
/// [`LoggingError::Install`] when a global subscriber already exists.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
	let builder = tracing_subscriber::fmt().with_env_filter(filter(settings)?);
	let installed = match settings.format {
		LogFormat::Compact => builder.compact().try_init(),
		LogFormat::Pretty => builder.pretty().try_init(),
		LogFormat::Full => builder.try_init(),
	};
	installed.map_err(|err| LoggingError::Install(err.to_string()))?;

	tracing::debug!(level = %settings.level, format = ?settings.format, "Logging initialized");
	Ok(())
}
