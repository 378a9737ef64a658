//! Navigation state machine.
//!
//! A [`Router`] owns the route table, the history and the per-route surface
//! properties. It runs in one of two modes:
//!
//! - **Embedded**: the router lives inside a host container and renders
//!   synchronously on every navigation. Parameters are not supported.
//! - **Addressable**: the router owns the host address. Navigating requests an
//!   address change; rendering happens when the host reports the change
//!   through [`Router::handle_address_change`].
//!
//! Every resolution walks `Idle -> Resolving -> Rendering -> Idle`. Internal
//! locks are released before any handler, template, callback or transition
//! runs, so handlers may navigate again from inside their own rendering.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::context::{Arguments, RouteContext, RouteId};
use crate::history::HistoryStack;
use crate::loader::{HandlerResolver, load_page};
use crate::params::{self, Parameters};
use crate::registry::GlobalRegistry;
use crate::settings::RouterSettings;
use crate::surface::{
	Action, AddressBar, HORIZONTAL_ALIGNMENT, PropertyValue, RouteProperties, SharedSurface, Surface,
	TransitionEffect, VERTICAL_ALIGNMENT, Widget,
};
use crate::table::{Handler, RouteTable};
use crate::template::{Template, TemplateTable};
use crate::{NOT_FOUND_ROUTE, ROOT_ROUTE};

/// Invoked after every page render with the freshly built context.
pub type ChangeCallback = Arc<dyn Fn(&RouteContext) + Send + Sync>;

/// Where a resolution currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// No resolution in progress.
	#[default]
	Idle,
	/// Looking up the handler and preparing the surface.
	Resolving,
	/// The handler is rendering.
	Rendering,
}

enum Mode {
	Embedded,
	Addressable {
		surface: SharedSurface,
		address_bar: Arc<dyn AddressBar>,
	},
}

/// Alignment the default not-found page overrode, restored on the next
/// resolution.
#[derive(Debug, Clone)]
struct AlignmentSnapshot {
	horizontal: Option<PropertyValue>,
	vertical: Option<PropertyValue>,
}

impl AlignmentSnapshot {
	fn capture(surface: &dyn Surface) -> Self {
		Self {
			horizontal: surface.property(HORIZONTAL_ALIGNMENT),
			vertical: surface.property(VERTICAL_ALIGNMENT),
		}
	}

	fn restore(self, surface: &mut dyn Surface) {
		surface.set_property(HORIZONTAL_ALIGNMENT, self.horizontal);
		surface.set_property(VERTICAL_ALIGNMENT, self.vertical);
	}
}

#[derive(Debug)]
struct NavState {
	current: String,
	homepage: String,
	history: HistoryStack,
	returning: bool,
	phase: Phase,
	pending_args: Option<Arguments>,
	properties: HashMap<RouteId, RouteProperties>,
	// Every key any route has declared; only grows
	known_properties: IndexSet<String>,
	not_found_restore: Option<AlignmentSnapshot>,
}

pub(crate) struct RouterInner {
	mode: Mode,
	routes: RouteTable,
	templates: TemplateTable,
	on_change: Option<ChangeCallback>,
	transition: Option<Arc<dyn TransitionEffect>>,
	initial_route: String,
	state: Mutex<NavState>,
}

/// Cheaply cloneable handle to a router.
#[derive(Clone)]
pub struct Router {
	inner: Arc<RouterInner>,
}

impl Router {
	/// Starts building a router.
	pub fn builder() -> RouterBuilder {
		RouterBuilder::new()
	}

	pub(crate) fn upgrade(inner: &Weak<RouterInner>) -> Option<Self> {
		inner.upgrade().map(|inner| Self { inner })
	}

	fn downgrade(&self) -> Weak<RouterInner> {
		Arc::downgrade(&self.inner)
	}

	/// Whether this router runs in embedded mode.
	pub fn is_embedded(&self) -> bool {
		matches!(self.inner.mode, Mode::Embedded)
	}

	/// Name of the current route.
	pub fn current_route(&self) -> String {
		self.inner.state.lock().current.clone()
	}

	/// Name of the homepage.
	pub fn homepage(&self) -> String {
		self.inner.state.lock().homepage.clone()
	}

	/// Snapshot of the back-navigation history.
	pub fn history(&self) -> HistoryStack {
		self.inner.state.lock().history.clone()
	}

	/// Current resolution phase.
	pub fn phase(&self) -> Phase {
		self.inner.state.lock().phase
	}

	/// Whether a handler is registered under `route`.
	pub fn has_route(&self, route: &str) -> bool {
		self.inner.routes.contains(route)
	}

	/// Registered route names in registration order.
	pub fn route_names(&self) -> Vec<String> {
		self.inner.routes.names().map(str::to_string).collect()
	}

	/// Properties stored for a route, if it declared any.
	pub fn route_properties(&self, id: RouteId) -> Option<RouteProperties> {
		self.inner.state.lock().properties.get(&id).cloned()
	}

	pub(crate) fn template(&self, name: &str) -> Option<Template> {
		self.inner.templates.get(name).cloned()
	}

	/// Renders the initial route without touching the history.
	///
	/// Addressable routers render onto their bound surface and ignore
	/// `surface`. Embedded routers drop `parameters` with a warning.
	pub fn start(&self, surface: &SharedSurface, args: Arguments, parameters: Parameters) {
		self.inner.state.lock().current = self.inner.initial_route.clone();
		tracing::debug!(route = %self.inner.initial_route, "Starting router");

		match &self.inner.mode {
			Mode::Embedded => {
				let parameters = discard_embedded_parameters(&self.inner.initial_route, parameters);
				self.resolve(surface, args, parameters);
			}
			Mode::Addressable { surface, .. } => self.resolve(surface, args, parameters),
		}
	}

	/// Navigates to `route`.
	///
	/// The route being left is pushed to the history unless this call is part
	/// of a back navigation. Embedded routers cut any `?` suffix off `route`,
	/// drop `parameters` with a warning and render onto `surface` right away.
	/// Addressable routers request the encoded address and render on the
	/// bound surface once the host reports it.
	pub fn navigate(&self, route: &str, surface: &SharedSurface, args: Arguments, parameters: Parameters) {
		match &self.inner.mode {
			Mode::Embedded => {
				let route = match route.split_once('?') {
					Some((base, _)) => {
						tracing::warn!(
							route = %route,
							"Embedded routers do not support a '?' suffix; it has been removed."
						);
						base
					}
					None => route,
				};
				let parameters = discard_embedded_parameters(route, parameters);
				self.enter(route);
				self.resolve(surface, args, parameters);
			}
			Mode::Addressable { address_bar, .. } => {
				self.enter(route);
				let address = if route == ROOT_ROUTE && !parameters.is_empty() {
					tracing::warn!(
						"The root route '/' accepts no parameters. Define a named route if parameters are needed."
					);
					ROOT_ROUTE.to_string()
				} else {
					params::encode(route, &parameters)
				};
				self.inner.state.lock().pending_args = Some(args);
				tracing::debug!(address = %address, "Requesting address change");
				address_bar.go(&address);
			}
		}
	}

	/// Navigates to the homepage.
	pub fn navigate_home(&self, surface: &SharedSurface, args: Arguments, parameters: Parameters) {
		let homepage = self.homepage();
		self.navigate(&homepage, surface, args, parameters);
	}

	/// Navigates to the most recent history entry, then removes it.
	///
	/// Does nothing when the history is empty.
	pub fn navigate_back(&self, surface: &SharedSurface, args: Arguments, parameters: Parameters) {
		let target = {
			let mut state = self.inner.state.lock();
			if state.history.is_empty() {
				tracing::debug!("History is empty; nothing to go back to.");
				return;
			}
			state.returning = true;
			state.history.peek().to_string()
		};

		self.navigate(&target, surface, args, parameters);

		let mut state = self.inner.state.lock();
		state.returning = false;
		state.history.pop();
	}

	/// Changes the homepage. Unregistered routes are refused with a warning.
	pub fn set_homepage(&self, homepage: &str) {
		if !self.inner.routes.contains(homepage) {
			tracing::warn!(
				homepage = %homepage,
				"Cannot set the homepage to a route that is not registered; homepage unchanged."
			);
			return;
		}
		self.inner.state.lock().homepage = homepage.to_string();
	}

	/// Stores `properties` for the context's route and applies them now.
	pub fn set_route_properties(&self, ctx: &RouteContext, properties: RouteProperties) {
		{
			let mut state = self.inner.state.lock();
			state.known_properties.extend(properties.keys().cloned());
			state.properties.insert(ctx.route_id(), properties);
		}
		self.apply_properties(ctx.surface(), ctx.route_id());
		ctx.surface().lock().refresh();
	}

	/// Reports that the host address changed to `address` and renders the
	/// matching page on the bound surface.
	///
	/// Only meaningful for addressable routers; embedded routers log a
	/// warning and ignore the call.
	pub fn handle_address_change(&self, address: &str) {
		let Mode::Addressable { surface, .. } = &self.inner.mode else {
			tracing::warn!(address = %address, "Embedded routers do not track the host address; change ignored.");
			return;
		};

		let decoded = params::decode(address);
		let args = {
			let mut state = self.inner.state.lock();
			state.current = decoded.route;
			state.pending_args.take().unwrap_or_default()
		};
		self.resolve(surface, args, decoded.parameters);
	}

	/// Renders the current route onto `surface`.
	///
	/// Any arguments stashed by an addressable `navigate` are discarded: they
	/// only travel with the delivery that follows it.
	///
	/// Unknown routes render the registered `ROUTE-404` handler, or the
	/// built-in not-found page when there is none, and are logged as errors.
	pub fn resolve(&self, surface: &SharedSurface, args: Arguments, parameters: Parameters) {
		let (route, restore) = {
			let mut state = self.inner.state.lock();
			state.phase = Phase::Resolving;
			state.pending_args = None;
			(state.current.clone(), state.not_found_restore.take())
		};

		if let Some(snapshot) = restore {
			snapshot.restore(&mut *surface.lock());
		}

		if let Some(effect) = &self.inner.transition {
			let outgoing = surface.lock().widgets();
			effect.play(&outgoing);
		}

		surface.lock().clear();

		match self.inner.routes.get(&route).cloned() {
			Some(handler) => {
				let id = RouteId::of(&route);
				self.apply_properties(surface, id);
				let ctx = self.context(surface, route, id, args, parameters);
				self.set_phase(Phase::Rendering);
				handler.handle(&ctx);
				surface.lock().refresh();
				self.notify(&ctx);
			}
			None => {
				let id = RouteId::not_found();
				self.apply_properties(surface, id);
				let ctx = self.context(surface, route, id, args, parameters);
				self.set_phase(Phase::Rendering);
				match self.inner.routes.not_found().cloned() {
					Some(handler) => handler.handle(&ctx),
					None => default_not_found(&ctx),
				}
				surface.lock().refresh();
				self.notify(&ctx);
				tracing::error!(
					route = %ctx.route(),
					"Route does not exist in the defined routes; showing the not-found page."
				);
			}
		}

		self.set_phase(Phase::Idle);
	}

	fn enter(&self, route: &str) {
		let mut state = self.inner.state.lock();
		let previous = std::mem::replace(&mut state.current, route.to_string());
		if !state.returning {
			state.history.push(previous);
		}
	}

	fn set_phase(&self, phase: Phase) {
		self.inner.state.lock().phase = phase;
	}

	fn context(
		&self,
		surface: &SharedSurface,
		route: String,
		id: RouteId,
		args: Arguments,
		parameters: Parameters,
	) -> RouteContext {
		RouteContext::new(surface.clone(), self.downgrade(), route, args, parameters, id)
	}

	fn notify(&self, ctx: &RouteContext) {
		if let Some(on_change) = &self.inner.on_change {
			on_change(ctx);
		}
	}

	/// Resets every property any route ever declared, then applies the ones
	/// stored for `id`.
	fn apply_properties(&self, surface: &SharedSurface, id: RouteId) {
		let (known, current) = {
			let state = self.inner.state.lock();
			(state.known_properties.clone(), state.properties.get(&id).cloned())
		};

		let mut surface = surface.lock();
		for key in &known {
			surface.set_property(key, None);
		}
		for (key, value) in current.into_iter().flatten() {
			surface.set_property(&key, Some(value));
		}
	}

	fn stash_restore(&self, snapshot: AlignmentSnapshot) {
		self.inner.state.lock().not_found_restore = Some(snapshot);
	}

	fn restore_alignment(&self, surface: &SharedSurface) {
		let snapshot = self.inner.state.lock().not_found_restore.take();
		if let Some(snapshot) = snapshot {
			snapshot.restore(&mut *surface.lock());
		}
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("Router")
			.field("embedded", &self.is_embedded())
			.field("routes", &self.inner.routes)
			.field("templates", &self.inner.templates)
			.field("current", &state.current)
			.field("homepage", &state.homepage)
			.field("history", &state.history)
			.field("phase", &state.phase)
			.finish_non_exhaustive()
	}
}

fn discard_embedded_parameters(route: &str, parameters: Parameters) -> Parameters {
	if !parameters.is_empty() {
		tracing::warn!(
			route = %route,
			"Embedded routers do not support parameters; they have been discarded."
		);
	}
	Parameters::new()
}

/// Built-in page shown for unknown routes when no `ROUTE-404` handler exists.
fn default_not_found(ctx: &RouteContext) {
	let Some(router) = ctx.router() else {
		return;
	};

	let snapshot = AlignmentSnapshot::capture(&*ctx.surface().lock());
	router.stash_restore(snapshot);
	{
		let mut surface = ctx.surface().lock();
		surface.set_property(HORIZONTAL_ALIGNMENT, Some(PropertyValue::from("center")));
		surface.set_property(VERTICAL_ALIGNMENT, Some(PropertyValue::from("center")));
	}

	let weak_router = router.downgrade();
	let weak_surface = Arc::downgrade(ctx.surface());
	let go_home: Action = Arc::new(move || {
		let (Some(router), Some(surface)) = (Router::upgrade(&weak_router), weak_surface.upgrade()) else {
			return;
		};
		router.restore_alignment(&surface);
		router.navigate_home(&surface, Arguments::none(), Parameters::new());
	});

	ctx.add_all([
		Widget::Text {
			value: "Not Found".to_string(),
			size: Some(100.0),
			tooltip: Some(format!("Invalid route: \"{}\".", ctx.route())),
		},
		Widget::Button {
			icon: "door_back_door_outlined".to_string(),
			tooltip: Some("Return to the homepage.".to_string()),
			on_click: Some(go_home),
		},
	]);
}

enum RegistrySource {
	Global,
	Snapshot {
		routes: Vec<(String, Handler)>,
		templates: Vec<(String, Template)>,
	},
	Disabled,
}

/// Builder for [`Router`].
///
/// Constructor routes are registered first; entries from the registry (the
/// process-wide one unless another is given) are merged on top and win on
/// collision.
pub struct RouterBuilder {
	routes: Vec<(String, Handler)>,
	templates: Vec<(String, Template)>,
	on_change: Option<ChangeCallback>,
	transition: Option<Arc<dyn TransitionEffect>>,
	homepage: String,
	initial_route: String,
	registry: RegistrySource,
}

impl Default for RouterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl RouterBuilder {
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			templates: Vec::new(),
			on_change: None,
			transition: None,
			homepage: ROOT_ROUTE.to_string(),
			initial_route: ROOT_ROUTE.to_string(),
			registry: RegistrySource::Global,
		}
	}

	/// Adds a route.
	pub fn route(mut self, name: impl Into<String>, handler: Handler) -> Self {
		self.routes.push((name.into(), handler));
		self
	}

	/// Adds several routes in order.
	pub fn routes<I>(mut self, routes: I) -> Self
	where
		I: IntoIterator<Item = (String, Handler)>,
	{
		self.routes.extend(routes);
		self
	}

	/// Adds a route whose handler comes from a module resolver.
	///
	/// A load failure is logged and the route is skipped.
	pub fn route_from(
		self,
		name: impl Into<String>,
		resolver: &dyn HandlerResolver,
		path: &str,
		handler_name: Option<&str>,
	) -> Self {
		let name = name.into();
		match load_page(resolver, path, handler_name) {
			Ok(handler) => self.route(name, handler),
			Err(err) => {
				tracing::warn!(route = %name, error = %err, "Failed to load page handler; route skipped.");
				self
			}
		}
	}

	/// Sets a custom not-found page.
	pub fn not_found(self, handler: Handler) -> Self {
		self.route(NOT_FOUND_ROUTE, handler)
	}

	/// Adds a named template.
	pub fn template(mut self, name: impl Into<String>, template: Template) -> Self {
		self.templates.push((name.into(), template));
		self
	}

	/// Sets the callback run after every render.
	pub fn on_change<F>(mut self, callback: F) -> Self
	where
		F: Fn(&RouteContext) + Send + Sync + 'static,
	{
		self.on_change = Some(Arc::new(callback));
		self
	}

	/// Plays `effect` over the outgoing page before every swap.
	pub fn transition(mut self, effect: Arc<dyn TransitionEffect>) -> Self {
		self.transition = Some(effect);
		self
	}

	pub fn homepage(mut self, homepage: impl Into<String>) -> Self {
		self.homepage = homepage.into();
		self
	}

	pub fn initial_route(mut self, route: impl Into<String>) -> Self {
		self.initial_route = route.into();
		self
	}

	/// Takes the homepage and initial route from loaded settings.
	pub fn settings(self, settings: &RouterSettings) -> Self {
		self.homepage(settings.homepage.clone())
			.initial_route(settings.initial_route.clone())
	}

	/// Merges entries from `registry` instead of the process-wide registry.
	///
	/// The registry is read now; later registrations are not seen.
	pub fn registry(mut self, registry: &GlobalRegistry) -> Self {
		self.registry = RegistrySource::Snapshot {
			routes: registry.routes(),
			templates: registry.templates(),
		};
		self
	}

	/// Ignores every registry.
	pub fn without_registry(mut self) -> Self {
		self.registry = RegistrySource::Disabled;
		self
	}

	/// Builds an embedded router.
	pub fn embedded(self) -> Router {
		self.build(Mode::Embedded)
	}

	/// Builds an addressable router bound to `surface` and `address_bar`.
	pub fn addressable(self, surface: SharedSurface, address_bar: Arc<dyn AddressBar>) -> Router {
		self.build(Mode::Addressable {
			surface,
			address_bar,
		})
	}

	fn build(self, mode: Mode) -> Router {
		let (registry_routes, registry_templates) = match self.registry {
			RegistrySource::Global => {
				let global = GlobalRegistry::global();
				(global.routes(), global.templates())
			}
			RegistrySource::Snapshot { routes, templates } => (routes, templates),
			RegistrySource::Disabled => (Vec::new(), Vec::new()),
		};

		let mut routes = RouteTable::new();
		routes.merge(self.routes);
		routes.merge(registry_routes);

		let mut templates = TemplateTable::new();
		templates.merge(self.templates);
		templates.merge(registry_templates);

		let homepage = if self.homepage == ROOT_ROUTE || routes.contains(&self.homepage) {
			self.homepage
		} else {
			tracing::warn!(
				homepage = %self.homepage,
				"Homepage is not a registered route; falling back to '/'."
			);
			ROOT_ROUTE.to_string()
		};

		tracing::debug!(
			routes = routes.len(),
			templates = templates.len(),
			embedded = matches!(mode, Mode::Embedded),
			"Router built"
		);

		Router {
			inner: Arc::new(RouterInner {
				mode,
				routes,
				templates,
				on_change: self.on_change,
				transition: self.transition,
				initial_route: self.initial_route.clone(),
				state: Mutex::new(NavState {
					current: self.initial_route,
					homepage,
					history: HistoryStack::new(),
					returning: false,
					phase: Phase::Idle,
					pending_args: None,
					properties: HashMap::new(),
					known_properties: IndexSet::new(),
					not_found_restore: None,
				}),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::table::handler;
	use crate::testing::RecordingSurface;
	use rstest::rstest;

	fn embedded(routes: &[&str]) -> Router {
		routes
			.iter()
			.fold(Router::builder().without_registry(), |builder, name| {
				builder.route(*name, handler(|_| {}))
			})
			.embedded()
	}

	#[rstest]
	fn test_new_router_is_idle_at_initial_route() {
		let router = embedded(&["/", "home"]);

		assert_eq!(router.current_route(), "/");
		assert_eq!(router.homepage(), "/");
		assert_eq!(router.phase(), Phase::Idle);
		assert!(router.history().is_empty());
		assert!(router.is_embedded());
	}

	#[rstest]
	fn test_unregistered_homepage_falls_back_to_root() {
		let router = Router::builder()
			.without_registry()
			.homepage("missing")
			.embedded();
		assert_eq!(router.homepage(), "/");
	}

	#[rstest]
	fn test_embedded_navigation_strips_query_suffix() {
		let router = embedded(&["/", "home"]);
		let (_, surface) = RecordingSurface::shared();

		router.navigate("home?x=1", &surface, Arguments::none(), Parameters::new());

		assert_eq!(router.current_route(), "home");
		assert_eq!(router.history().entries(), &["/"]);
	}

	#[rstest]
	fn test_handle_address_change_is_ignored_when_embedded() {
		let router = embedded(&["/", "home"]);
		router.handle_address_change("home");
		assert_eq!(router.current_route(), "/");
	}

	#[rstest]
	fn test_phase_is_rendering_inside_handler() {
		let seen = Arc::new(Mutex::new(None));
		let slot = seen.clone();
		let router = Router::builder()
			.without_registry()
			.route(
				"/",
				handler(move |ctx| {
					*slot.lock() = ctx.router().map(|router| router.phase());
				}),
			)
			.embedded();
		let (_, surface) = RecordingSurface::shared();

		router.start(&surface, Arguments::none(), Parameters::new());

		assert_eq!(*seen.lock(), Some(Phase::Rendering));
		assert_eq!(router.phase(), Phase::Idle);
	}
}
