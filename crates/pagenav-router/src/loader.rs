//! Page handlers looked up by module path.
//!
//! A path such as `pages/settings` or `pages\settings` names a module; the
//! handler inside it defaults to the last path segment. Resolution itself is
//! delegated to a [`HandlerResolver`], so hosts can back it with plugins,
//! generated tables or anything else. [`ModuleRegistry`] is the in-memory
//! implementation.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::LoadError;
use crate::table::Handler;

/// Finds a handler by module path and name.
pub trait HandlerResolver {
	/// Resolves `name` (or the last path segment) inside the module at `path`.
	///
	/// # Errors
	///
	/// Returns [`LoadError::ModuleNotFound`] or [`LoadError::HandlerNotFound`].
	fn resolve_handler(&self, path: &str, name: Option<&str>) -> Result<Handler, LoadError>;
}

/// Turns `a/b\c` into the dotted module path `a.b.c`.
pub fn module_path(path: &str) -> String {
	path.replace(['\\', '/'], ".")
}

/// Name a handler takes when none is given: the last dotted segment.
pub fn default_handler_name(module: &str) -> &str {
	module.rsplit('.').next().unwrap_or(module)
}

/// Loads a page handler through `resolver`.
///
/// The resolver always receives the dotted module path and an explicit
/// handler name.
///
/// # Errors
///
/// Propagates the resolver's [`LoadError`].
pub fn load_page(resolver: &dyn HandlerResolver, path: &str, name: Option<&str>) -> Result<Handler, LoadError> {
	let module = module_path(path);
	let name = name.unwrap_or_else(|| default_handler_name(&module));
	tracing::debug!(module = %module, name = %name, "Loading page handler");
	resolver.resolve_handler(&module, Some(name))
}

/// Modules kept in memory: dotted module path to named handlers.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
	modules: HashMap<String, IndexMap<String, Handler>>,
}

impl ModuleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `handler` as `name` inside `module`. Slashes in `module` are
	/// accepted and normalized.
	pub fn insert(&mut self, module: &str, name: impl Into<String>, handler: Handler) {
		self.modules
			.entry(module_path(module))
			.or_default()
			.insert(name.into(), handler);
	}

	/// Builder form of [`ModuleRegistry::insert`].
	pub fn with(mut self, module: &str, name: impl Into<String>, handler: Handler) -> Self {
		self.insert(module, name, handler);
		self
	}

	/// Known module paths, unordered.
	pub fn modules(&self) -> impl Iterator<Item = &str> {
		self.modules.keys().map(String::as_str)
	}
}

impl HandlerResolver for ModuleRegistry {
	fn resolve_handler(&self, path: &str, name: Option<&str>) -> Result<Handler, LoadError> {
		let module = module_path(path);
		let handlers = self
			.modules
			.get(&module)
			.ok_or_else(|| LoadError::ModuleNotFound { path: module.clone() })?;

		let name = name.unwrap_or_else(|| default_handler_name(&module));
		handlers
			.get(name)
			.cloned()
			.ok_or_else(|| LoadError::HandlerNotFound {
				module: module.clone(),
				name: name.to_string(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::table::handler;
	use rstest::rstest;
	use std::sync::Arc;

	#[rstest]
	#[case("pages/settings", "pages.settings")]
	#[case("pages\\admin\\users", "pages.admin.users")]
	#[case("home", "home")]
	fn test_module_path(#[case] path: &str, #[case] expected: &str) {
		assert_eq!(module_path(path), expected);
	}

	#[rstest]
	fn test_default_name_is_last_segment() {
		let settings = handler(|_| {});
		let resolver = ModuleRegistry::new().with("pages.settings", "settings", settings.clone());

		let loaded = load_page(&resolver, "pages/settings", None).unwrap();
		assert!(Arc::ptr_eq(&loaded, &settings));
	}

	#[rstest]
	fn test_explicit_handler_name() {
		let view = handler(|_| {});
		let resolver = ModuleRegistry::new().with("pages/profile", "view", view.clone());

		let loaded = load_page(&resolver, "pages\\profile", Some("view")).unwrap();
		assert!(Arc::ptr_eq(&loaded, &view));
	}

	#[rstest]
	fn test_missing_module_and_handler() {
		let resolver = ModuleRegistry::new().with("pages.home", "home", handler(|_| {}));

		assert!(matches!(
			load_page(&resolver, "pages/missing", None),
			Err(LoadError::ModuleNotFound { path }) if path == "pages.missing"
		));
		assert!(matches!(
			load_page(&resolver, "pages/home", Some("other")),
			Err(LoadError::HandlerNotFound { module, name }) if module == "pages.home" && name == "other"
		));
	}
}
