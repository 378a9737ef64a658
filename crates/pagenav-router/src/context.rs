//! Per-navigation context handed to page handlers and change callbacks.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Weak;

use crate::NOT_FOUND_ROUTE;
use crate::params::Parameters;
use crate::router::{Router, RouterInner};
use crate::surface::{RouteProperties, SharedSurface, Widget};
use crate::template::TemplateHandler;

/// Arguments moved from the navigating page to the next handler.
///
/// The router never looks inside. Pass a tuple to carry several values.
#[derive(Default)]
pub struct Arguments(Option<Box<dyn Any + Send + Sync>>);

impl Arguments {
	/// No arguments.
	pub fn none() -> Self {
		Self(None)
	}

	/// Wraps a value.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self(Some(Box::new(value)))
	}

	/// Borrows the value if it has type `T`.
	pub fn get<T: Any>(&self) -> Option<&T> {
		self.0.as_ref().and_then(|value| value.downcast_ref::<T>())
	}

	/// Whether no value was passed.
	pub fn is_empty(&self) -> bool {
		self.0.is_none()
	}
}

impl fmt::Debug for Arguments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			f.write_str("Arguments(NO-ARGUMENTS)")
		} else {
			f.write_str("Arguments(..)")
		}
	}
}

/// Stable identity of a route, used to key per-route surface properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(u64);

impl RouteId {
	/// Identity of the route named `route`.
	pub fn of(route: &str) -> Self {
		// Fixed-key SipHash: the same name maps to the same id for the whole process
		let mut hasher = DefaultHasher::new();
		route.hash(&mut hasher);
		Self(hasher.finish())
	}

	/// Identity shared by every not-found page.
	pub fn not_found() -> Self {
		Self::of(NOT_FOUND_ROUTE)
	}

	/// Raw value.
	pub fn value(self) -> u64 {
		self.0
	}
}

/// Everything a handler needs for one navigation event.
///
/// Built fresh for each resolution and dropped once the handler and the
/// change callback have returned. The router is held weakly: a context never
/// keeps its router alive.
pub struct RouteContext {
	surface: SharedSurface,
	router: Weak<RouterInner>,
	route: String,
	arguments: Arguments,
	parameters: Parameters,
	route_id: RouteId,
}

impl RouteContext {
	pub(crate) fn new(
		surface: SharedSurface,
		router: Weak<RouterInner>,
		route: String,
		arguments: Arguments,
		parameters: Parameters,
		route_id: RouteId,
	) -> Self {
		Self {
			surface,
			router,
			route,
			arguments,
			parameters,
			route_id,
		}
	}

	/// The surface being rendered.
	pub fn surface(&self) -> &SharedSurface {
		&self.surface
	}

	/// The router that created this context, if it is still alive.
	pub fn router(&self) -> Option<Router> {
		Router::upgrade(&self.router)
	}

	/// Route name this context was resolved for.
	pub fn route(&self) -> &str {
		&self.route
	}

	/// The router's current route, which differs from [`RouteContext::route`]
	/// once the handler has navigated elsewhere.
	pub fn current_route(&self) -> String {
		self.router()
			.map(|router| router.current_route())
			.unwrap_or_else(|| self.route.clone())
	}

	/// Arguments passed by the previous page.
	pub fn arguments(&self) -> &Arguments {
		&self.arguments
	}

	/// Decoded URL parameters; always empty for embedded routers.
	pub fn parameters(&self) -> &Parameters {
		&self.parameters
	}

	/// Identity of the route, not-found pages included.
	pub fn route_id(&self) -> RouteId {
		self.route_id
	}

	/// Adds a widget to the surface.
	pub fn add(&self, widget: Widget) {
		self.surface.lock().add_widget(widget);
	}

	/// Adds several widgets in order.
	pub fn add_all<I: IntoIterator<Item = Widget>>(&self, widgets: I) {
		let mut surface = self.surface.lock();
		for widget in widgets {
			surface.add_widget(widget);
		}
	}

	/// Navigates to `route`. Parameters are dropped with a warning by
	/// embedded routers.
	pub fn navigate(&self, route: &str, args: Arguments, parameters: Parameters) {
		if let Some(router) = self.router_or_warn() {
			router.navigate(route, &self.surface, args, parameters);
		}
	}

	/// Navigates to the homepage.
	pub fn navigate_home(&self, args: Arguments, parameters: Parameters) {
		if let Some(router) = self.router_or_warn() {
			router.navigate_home(&self.surface, args, parameters);
		}
	}

	/// Navigates back to the previous route.
	pub fn navigate_back(&self, args: Arguments, parameters: Parameters) {
		if let Some(router) = self.router_or_warn() {
			router.navigate_back(&self.surface, args, parameters);
		}
	}

	/// Changes the router's homepage.
	pub fn set_homepage(&self, homepage: &str) {
		if let Some(router) = self.router_or_warn() {
			router.set_homepage(homepage);
		}
	}

	/// Declares surface properties for this route, applied now and on every
	/// later visit.
	pub fn set_route_properties(&self, properties: RouteProperties) {
		if let Some(router) = self.router_or_warn() {
			router.set_route_properties(self, properties);
		}
	}

	/// Renders a named template registered on the router.
	///
	/// Logs a warning and returns `None` for an unknown name.
	pub fn template(&self, name: &str, args: &Arguments) -> Option<Widget> {
		let router = self.router_or_warn()?;
		match router.template(name) {
			Some(template) => template.render(self, args),
			None => {
				tracing::warn!(
					template = %name,
					"No global template found with this name. Ensure the template is registered and its name is correct."
				);
				None
			}
		}
	}

	/// Renders a template value that is not registered anywhere.
	pub fn local_template(&self, template: &dyn TemplateHandler, args: &Arguments) -> Option<Widget> {
		template.render(self, args)
	}

	fn router_or_warn(&self) -> Option<Router> {
		let router = self.router();
		if router.is_none() {
			tracing::warn!(route = %self.route, "Router was dropped; context request ignored.");
		}
		router
	}
}

impl fmt::Debug for RouteContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteContext")
			.field("route", &self.route)
			.field("arguments", &self.arguments)
			.field("parameters", &self.parameters)
			.field("route_id", &self.route_id)
			.finish_non_exhaustive()
	}
}
