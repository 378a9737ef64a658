//! Error types for route registration, page loading and settings.
//!
//! Navigation itself never fails: misses fall back to the not-found page and
//! bad input is logged and dropped. These errors only surface from the
//! configuration-time APIs that callers may want to check explicitly.

use thiserror::Error;

/// Error returned when a route name cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
	/// The name does not match `^[A-Za-z_][A-Za-z0-9_]*$` and is not reserved.
	#[error("Invalid route name: \"{0}\". Route names must start with a letter or underscore and contain only alphanumeric characters or underscores.")]
	InvalidName(String),
}

/// Error returned by a [`HandlerResolver`](crate::loader::HandlerResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
	/// No module is known under the normalized path.
	#[error("Failed to load page definition module: \"{path}\"")]
	ModuleNotFound {
		/// Normalized dotted module path.
		path: String,
	},
	/// The module exists but does not export the requested handler.
	#[error("Failed to load page definition: \"{name}\" (module \"{module}\")")]
	HandlerNotFound {
		/// Normalized dotted module path.
		module: String,
		/// Handler name that was looked up.
		name: String,
	},
}

/// Error returned when loading or validating [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("Failed to read settings file: {0}")]
	Io(#[from] std::io::Error),
	/// The TOML document is malformed or has unexpected fields.
	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),
	/// A configured route name is syntactically invalid.
	#[error("Invalid route in settings field `{field}`: {source}")]
	InvalidRoute {
		/// Settings field holding the bad value.
		field: &'static str,
		/// Underlying validation failure.
		#[source]
		source: RouteError,
	},
}
