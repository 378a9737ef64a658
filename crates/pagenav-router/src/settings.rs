//! TOML settings for routers and their logging.
//!
//! Every field has a default, so an empty document is valid:
//!
//! ```toml
//! [router]
//! homepage = "home"
//! initial_route = "/"
//!
//! [logging]
//! level = "warn"
//! format = "compact"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ROOT_ROUTE;
use crate::error::SettingsError;
use crate::table::RouteKey;

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	pub router: RouterSettings,
	pub logging: LoggingSettings,
}

/// Router defaults applied through
/// [`RouterBuilder::settings`](crate::router::RouterBuilder::settings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterSettings {
	/// Route used by "go home" navigation.
	pub homepage: String,
	/// Route rendered by `Router::start`.
	pub initial_route: String,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			homepage: ROOT_ROUTE.to_string(),
			initial_route: ROOT_ROUTE.to_string(),
		}
	}
}

/// Output of the bundled log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Compact,
	Pretty,
	Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
	/// `EnvFilter` directive, e.g. `warn` or `pagenav_router=debug`.
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "warn".to_string(),
			format: LogFormat::default(),
		}
	}
}

impl Settings {
	/// Parses and validates a TOML document.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Parse`] for malformed TOML or unknown fields and
	/// [`SettingsError::InvalidRoute`] for route names that can never match.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML file.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Io`] when the file cannot be read, otherwise as
	/// [`Settings::from_toml_str`].
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "Loading settings");
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Checks that the configured routes are syntactically valid.
	///
	/// Whether they are registered is only known once a router is built.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::InvalidRoute`] naming the offending field.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let fields = [
			("homepage", &self.router.homepage),
			("initial_route", &self.router.initial_route),
		];
		for (field, value) in fields {
			RouteKey::parse(value).map_err(|source| SettingsError::InvalidRoute { field, source })?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_document_uses_defaults() {
		let settings = Settings::from_toml_str("").unwrap();
		assert_eq!(settings, Settings::default());
		assert_eq!(settings.router.homepage, "/");
		assert_eq!(settings.logging.level, "warn");
	}

	#[rstest]
	fn test_partial_document() {
		let settings = Settings::from_toml_str(
			r#"
			[router]
			homepage = "home"

			[logging]
			format = "pretty"
			"#,
		)
		.unwrap();

		assert_eq!(settings.router.homepage, "home");
		assert_eq!(settings.router.initial_route, "/");
		assert_eq!(settings.logging.format, LogFormat::Pretty);
	}

	#[rstest]
	#[case("homepage", "[router]\nhomepage = \"a-b\"")]
	#[case("initial_route", "[router]\ninitial_route = \"9\"")]
	fn test_invalid_route_is_rejected(#[case] field: &str, #[case] source: &str) {
		match Settings::from_toml_str(source) {
			Err(SettingsError::InvalidRoute { field: got, .. }) => assert_eq!(got, field),
			other => panic!("expected InvalidRoute, got {:?}", other),
		}
	}

	#[rstest]
	fn test_unknown_field_is_a_parse_error() {
		let result = Settings::from_toml_str("[router]\nhome = \"x\"");
		assert!(matches!(result, Err(SettingsError::Parse(_))));
	}
}
