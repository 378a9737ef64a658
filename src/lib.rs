//! # pagenav
//!
//! Named-route page navigation for GUI applications.
//!
//! Pages are plain handlers registered under flat route names. A router
//! resolves the current route, renders the page onto a host surface and keeps
//! a back-navigation history. Two modes are available:
//!
//! - **Embedded**: the router lives in a container with no address of its own
//!   and renders synchronously.
//! - **Addressable**: the router drives the host address and supports
//!   `route?key=value` parameters.
//!
//! ## Feature Flags
//!
//! - `logging` (default) - bundled `tracing-subscriber` setup driven by
//!   [`LoggingSettings`]
//!
//! ## Quick Example
//!
//! ```
//! use pagenav::prelude::*;
//!
//! let router = Router::builder()
//!     .without_registry()
//!     .route("/", handler(|ctx| ctx.add(Widget::text("Home"))))
//!     .route("about", handler(|ctx| {
//!         ctx.add(Widget::text("About"));
//!     }))
//!     .embedded();
//!
//! let (recording, surface) = RecordingSurface::shared();
//! pagenav::launch(&router, &surface);
//! router.navigate("about", &surface, Arguments::none(), Parameters::new());
//!
//! assert_eq!(recording.lock().texts(), vec!["About"]);
//! ```

#[cfg(feature = "logging")]
pub mod logging;

pub use pagenav_router::{
	Arguments, ChangeCallback, DecodedAddress, GlobalRegistry, Handler, HistoryStack, LoadError,
	LogFormat, LoggingSettings, NOT_FOUND_ROUTE, ParamValue, Parameters, Phase, PropertyValue,
	ROOT_ROUTE, RouteContext, RouteError, RouteHandler, RouteId, RouteProperties, RouteTable, Router,
	RouterBuilder, RouterSettings, Settings, SettingsError, SharedSurface, Surface, Template,
	TemplateHandler, TransitionEffect, Widget, handler, template,
};
pub use pagenav_router::{
	context, error, global_template, history, loader, params, registry, route, router, settings,
	surface, table, testing,
};

/// Renders the router's initial route with no arguments or parameters.
pub fn launch(router: &Router, surface: &SharedSurface) {
	tracing::info!(
		routes = router.route_names().len(),
		embedded = router.is_embedded(),
		"Launching router"
	);
	router.start(surface, Arguments::none(), Parameters::new());
}

/// Re-exports for building pages.
pub mod prelude {
	pub use pagenav_router::prelude::*;

	pub use crate::launch;
	#[cfg(feature = "logging")]
	pub use crate::logging::init as init_logging;
}
