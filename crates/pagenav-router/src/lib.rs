//! Route table, history and navigation state machine for pagenav.
//!
//! Pages are plain handlers registered under route names. A [`Router`]
//! resolves the current route to its handler, renders it onto a host
//! [`Surface`](surface::Surface) and keeps a back-navigation history.
//!
//! ```
//! use pagenav_router::prelude::*;
//!
//! let router = Router::builder()
//!     .without_registry()
//!     .route("/", handler(|ctx| ctx.add(Widget::text("Home"))))
//!     .route("settings", handler(|ctx| ctx.add(Widget::text("Settings"))))
//!     .embedded();
//!
//! let (recording, surface) = RecordingSurface::shared();
//! router.start(&surface, Arguments::none(), Parameters::new());
//! router.navigate("settings", &surface, Arguments::none(), Parameters::new());
//!
//! assert_eq!(recording.lock().texts(), vec!["Settings"]);
//! assert_eq!(router.history().peek(), "/");
//! ```

pub mod context;
pub mod error;
pub mod history;
pub mod loader;
pub mod params;
pub mod registry;
pub mod router;
pub mod settings;
pub mod surface;
pub mod table;
pub mod template;
pub mod testing;

pub use context::{Arguments, RouteContext, RouteId};
pub use error::{LoadError, RouteError, SettingsError};
pub use history::HistoryStack;
pub use params::{DecodedAddress, ParamValue, Parameters};
pub use registry::GlobalRegistry;
pub use router::{ChangeCallback, Phase, Router, RouterBuilder};
pub use settings::{LogFormat, LoggingSettings, RouterSettings, Settings};
pub use surface::{AddressBar, PropertyValue, RouteProperties, SharedSurface, Surface, TransitionEffect, Widget};
pub use table::{Handler, RouteHandler, RouteTable, handler};
pub use template::{Template, TemplateHandler, template};

/// The root route.
pub const ROOT_ROUTE: &str = "/";

/// Reserved name of the not-found page.
pub const NOT_FOUND_ROUTE: &str = "ROUTE-404";

/// Re-exports for building pages.
pub mod prelude {
	pub use crate::context::{Arguments, RouteContext};
	pub use crate::params::{ParamValue, Parameters};
	pub use crate::router::{Router, RouterBuilder};
	pub use crate::surface::{PropertyValue, RouteProperties, SharedSurface, Surface, Widget, shared};
	pub use crate::table::handler;
	pub use crate::template::template;
	pub use crate::testing::RecordingSurface;
	pub use crate::{NOT_FOUND_ROUTE, ROOT_ROUTE};
}
