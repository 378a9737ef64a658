//! Routes and templates registered ahead of router construction.
//!
//! Pages can register themselves from anywhere, typically at startup, and
//! every router built afterwards merges the entries in. Registration does not
//! validate route names; invalid ones are dropped with a warning when a router
//! merges them.
//!
//! ```
//! use pagenav_router::registry::GlobalRegistry;
//! use pagenav_router::table::handler;
//!
//! let registry = GlobalRegistry::new();
//! registry.register_route("about", handler(|_| {}));
//! assert_eq!(registry.route_count(), 1);
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::table::Handler;
use crate::template::Template;

static GLOBAL_REGISTRY: Lazy<GlobalRegistry> = Lazy::new(GlobalRegistry::new);

/// Thread-safe store of pending routes and templates.
///
/// [`GlobalRegistry::global`] is the process-wide instance routers read by
/// default. Separate instances can be handed to
/// [`RouterBuilder::registry`](crate::router::RouterBuilder::registry).
#[derive(Default)]
pub struct GlobalRegistry {
	routes: RwLock<IndexMap<String, Handler>>,
	templates: RwLock<IndexMap<String, Template>>,
}

impl GlobalRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry.
	pub fn global() -> &'static Self {
		&GLOBAL_REGISTRY
	}

	/// Registers a route handler. A later registration under the same name
	/// replaces the earlier one.
	pub fn register_route(&self, name: impl Into<String>, handler: Handler) {
		let name = name.into();
		tracing::debug!(route = %name, "Registering global route");
		self.routes.write().insert(name, handler);
	}

	/// Registers a template.
	pub fn register_template(&self, name: impl Into<String>, template: Template) {
		let name = name.into();
		tracing::debug!(template = %name, "Registering global template");
		self.templates.write().insert(name, template);
	}

	/// Copy of the registered routes, in registration order.
	pub fn routes(&self) -> Vec<(String, Handler)> {
		self.routes
			.read()
			.iter()
			.map(|(name, handler)| (name.clone(), handler.clone()))
			.collect()
	}

	/// Copy of the registered templates, in registration order.
	pub fn templates(&self) -> Vec<(String, Template)> {
		self.templates
			.read()
			.iter()
			.map(|(name, template)| (name.clone(), template.clone()))
			.collect()
	}

	pub fn route_count(&self) -> usize {
		self.routes.read().len()
	}

	pub fn template_count(&self) -> usize {
		self.templates.read().len()
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.routes.write().clear();
		self.templates.write().clear();
	}
}

/// Registers a route on the process-wide registry.
pub fn register_route(name: impl Into<String>, handler: Handler) {
	GlobalRegistry::global().register_route(name, handler);
}

/// Registers a template on the process-wide registry.
pub fn register_template(name: impl Into<String>, template: Template) {
	GlobalRegistry::global().register_template(name, template);
}

/// Registers a route on the process-wide registry.
///
/// With a bare function name the route takes the function's name:
///
/// ```
/// use pagenav_router::context::RouteContext;
/// use pagenav_router::registry::GlobalRegistry;
///
/// fn settings(_ctx: &RouteContext) {}
///
/// pagenav_router::route!(settings);
/// pagenav_router::route!("/", |_ctx: &RouteContext| {});
/// assert!(GlobalRegistry::global().routes().iter().any(|(name, _)| name == "settings"));
/// ```
#[macro_export]
macro_rules! route {
	($name:literal, $handler:expr) => {
		$crate::registry::register_route($name, $crate::table::handler($handler))
	};
	($handler:ident) => {
		$crate::registry::register_route(stringify!($handler), $crate::table::handler($handler))
	};
}

/// Registers a template on the process-wide registry, named after the
/// function unless a name is given.
#[macro_export]
macro_rules! global_template {
	($name:literal, $template:expr) => {
		$crate::registry::register_template($name, $crate::template::template($template))
	};
	($template:ident) => {
		$crate::registry::register_template(stringify!($template), $crate::template::template($template))
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::table::handler;
	use crate::template::template;
	use rstest::rstest;
	use std::sync::Arc;

	#[rstest]
	fn test_routes_returns_a_copy() {
		let registry = GlobalRegistry::new();
		registry.register_route("home", handler(|_| {}));

		let snapshot = registry.routes();
		registry.register_route("later", handler(|_| {}));

		assert_eq!(snapshot.len(), 1);
		assert_eq!(registry.route_count(), 2);
	}

	#[rstest]
	fn test_reregistration_replaces_in_place() {
		let registry = GlobalRegistry::new();
		let replacement = handler(|_| {});
		registry.register_route("home", handler(|_| {}));
		registry.register_route("other", handler(|_| {}));
		registry.register_route("home", replacement.clone());

		let routes = registry.routes();
		assert_eq!(routes.len(), 2);
		assert_eq!(routes[0].0, "home");
		assert!(Arc::ptr_eq(&routes[0].1, &replacement));
	}

	#[rstest]
	fn test_clear_removes_everything() {
		let registry = GlobalRegistry::new();
		registry.register_route("home", handler(|_| {}));
		registry.register_template("appbar", template(|_, _| None));

		registry.clear();

		assert_eq!(registry.route_count(), 0);
		assert_eq!(registry.template_count(), 0);
	}

	#[rstest]
	fn test_unvalidated_names_are_accepted() {
		let registry = GlobalRegistry::new();
		registry.register_route("not-valid", handler(|_| {}));
		assert_eq!(registry.routes()[0].0, "not-valid");
	}
}
