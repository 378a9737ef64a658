//! Integration tests for route and template registries
//!
//! Tests touching the process-wide registry are serialized and clear it
//! before and after use.

mod common;

use std::sync::Arc;

use common::{LogCapture, counting};
use pagenav_router::loader::ModuleRegistry;
use pagenav_router::prelude::*;
use pagenav_router::registry::GlobalRegistry;
use parking_lot::Mutex;
use rstest::rstest;
use serial_test::serial;
use tracing::Level;

fn about(ctx: &RouteContext) {
	ctx.add(Widget::text("About"));
}

fn banner(_ctx: &RouteContext, _args: &Arguments) -> Option<Widget> {
	Some(Widget::text("Banner"))
}

struct GlobalReset;

impl GlobalReset {
	fn new() -> Self {
		GlobalRegistry::global().clear();
		Self
	}
}

impl Drop for GlobalReset {
	fn drop(&mut self) {
		GlobalRegistry::global().clear();
	}
}

#[rstest]
#[serial(global_registry)]
fn test_router_merges_global_registry_by_default() {
	let _reset = GlobalReset::new();
	pagenav_router::route!(about);
	pagenav_router::route!("/", |ctx: &RouteContext| ctx.add(Widget::text("Root")));
	pagenav_router::global_template!(banner);

	let router = Router::builder().embedded();
	let (recording, surface) = RecordingSurface::shared();

	assert_eq!(router.route_names(), vec!["about", "/"]);

	router.navigate("about", &surface, Arguments::none(), Parameters::new());
	assert_eq!(recording.lock().texts(), vec!["About"]);
}

#[rstest]
#[serial(global_registry)]
fn test_global_template_is_available_to_handlers() {
	let _reset = GlobalReset::new();
	pagenav_router::global_template!("banner", banner);

	let router = Router::builder()
		.route(
			"/",
			handler(|ctx| {
				if let Some(widget) = ctx.template("banner", &Arguments::none()) {
					ctx.add(widget);
				}
			}),
		)
		.embedded();
	let (recording, surface) = RecordingSurface::shared();

	router.start(&surface, Arguments::none(), Parameters::new());

	assert_eq!(recording.lock().texts(), vec!["Banner"]);
}

#[rstest]
#[serial(global_registry)]
fn test_registry_wins_over_constructor_routes() {
	let _reset = GlobalReset::new();
	let (logs, _guard) = LogCapture::install();
	let calls = [Arc::new(Mutex::new(0)), Arc::new(Mutex::new(0))];
	GlobalRegistry::global().register_route("home", counting("Registry", &calls[1]));

	let router = Router::builder()
		.route("/", handler(|_| {}))
		.route("home", counting("Constructor", &calls[0]))
		.embedded();
	let (recording, surface) = RecordingSurface::shared();
	router.navigate("home", &surface, Arguments::none(), Parameters::new());

	assert_eq!(*calls[0].lock(), 0);
	assert_eq!(*calls[1].lock(), 1);
	assert_eq!(recording.lock().texts(), vec!["Registry"]);
	assert!(logs.contains(Level::WARN, "registered twice"));
}

#[rstest]
#[serial(global_registry)]
fn test_later_registrations_are_not_seen_by_existing_router() {
	let _reset = GlobalReset::new();
	let router = Router::builder().route("/", handler(|_| {})).embedded();

	GlobalRegistry::global().register_route("late", handler(|_| {}));

	assert!(!router.has_route("late"));
	assert!(Router::builder().embedded().has_route("late"));
}

#[rstest]
#[serial(global_registry)]
fn test_without_registry_ignores_global_entries() {
	let _reset = GlobalReset::new();
	GlobalRegistry::global().register_route("hidden", handler(|_| {}));

	let router = Router::builder().without_registry().embedded();

	assert!(!router.has_route("hidden"));
}

#[rstest]
fn test_explicit_registry_instance() {
	let registry = GlobalRegistry::new();
	registry.register_route("about", handler(about));
	registry.register_route("bad-name", handler(|_| {}));

	let router = Router::builder().registry(&registry).embedded();

	assert!(router.has_route("about"));
	assert!(!router.has_route("bad-name"));
}

#[rstest]
fn test_route_from_module_registry() {
	let (logs, _guard) = LogCapture::install();
	let modules = ModuleRegistry::new()
		.with("pages/about", "about", handler(about))
		.with("pages/contact", "view", handler(|ctx| ctx.add(Widget::text("Contact"))));

	let router = Router::builder()
		.without_registry()
		.route_from("about", &modules, "pages/about", None)
		.route_from("contact", &modules, "pages\\contact", Some("view"))
		.route_from("missing", &modules, "pages/missing", None)
		.embedded();
	let (recording, surface) = RecordingSurface::shared();

	assert!(router.has_route("about"));
	assert!(router.has_route("contact"));
	assert!(!router.has_route("missing"));
	assert!(logs.contains(Level::WARN, "Failed to load page handler"));

	router.navigate("contact", &surface, Arguments::none(), Parameters::new());
	assert_eq!(recording.lock().texts(), vec!["Contact"]);
}
