//! Host collaborators: the render surface, its widgets, page transitions and
//! the address bar of addressable routers.
//!
//! The router never renders anything itself. It clears the surface, lets a
//! handler add widgets, and asks for a refresh.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

/// Property holding the horizontal alignment of the surface content.
pub const HORIZONTAL_ALIGNMENT: &str = "horizontal_alignment";

/// Property holding the vertical alignment of the surface content.
pub const VERTICAL_ALIGNMENT: &str = "vertical_alignment";

/// Property holding the application bar widget.
pub const APP_BAR: &str = "appbar";

/// Callback attached to an interactive widget.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// A widget handed to the surface.
///
/// `Text` and `Button` cover what the router builds on its own (the default
/// not-found page); host toolkits pass their own widgets through `Native`.
#[derive(Clone)]
pub enum Widget {
	/// Static text.
	Text {
		/// Displayed text.
		value: String,
		/// Font size, host default when `None`.
		size: Option<f64>,
		/// Hover text.
		tooltip: Option<String>,
	},
	/// Icon button.
	Button {
		/// Host icon name.
		icon: String,
		/// Hover text.
		tooltip: Option<String>,
		/// Invoked by the host on click.
		on_click: Option<Action>,
	},
	/// Host-specific widget the router passes through untouched.
	Native(Arc<dyn Any + Send + Sync>),
}

impl Widget {
	/// Plain text widget.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text {
			value: value.into(),
			size: None,
			tooltip: None,
		}
	}

	/// Wraps a host widget.
	pub fn native<T: Any + Send + Sync>(widget: T) -> Self {
		Self::Native(Arc::new(widget))
	}

	/// Returns the text of a `Text` widget.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text { value, .. } => Some(value),
			_ => None,
		}
	}

	/// Downcasts a `Native` widget.
	pub fn downcast_native<T: Any>(&self) -> Option<&T> {
		match self {
			Self::Native(widget) => widget.downcast_ref::<T>(),
			_ => None,
		}
	}

	/// Simulates a click on a `Button` widget. Returns whether an action ran.
	pub fn click(&self) -> bool {
		match self {
			Self::Button {
				on_click: Some(action),
				..
			} => {
				action();
				true
			}
			_ => false,
		}
	}
}

impl fmt::Debug for Widget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text {
				value,
				size,
				tooltip,
			} => f
				.debug_struct("Text")
				.field("value", value)
				.field("size", size)
				.field("tooltip", tooltip)
				.finish(),
			Self::Button {
				icon,
				tooltip,
				on_click,
			} => f
				.debug_struct("Button")
				.field("icon", icon)
				.field("tooltip", tooltip)
				.field("has_on_click", &on_click.is_some())
				.finish(),
			Self::Native(_) => f.write_str("Native(..)"),
		}
	}
}

/// Value of a surface property.
#[derive(Debug, Clone)]
pub enum PropertyValue {
	/// Text value, e.g. an alignment name.
	Text(String),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
	/// Boolean flag.
	Bool(bool),
	/// Widget value, e.g. an app bar.
	Widget(Widget),
}

impl PropertyValue {
	/// Returns the text of a `Text` value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			_ => None,
		}
	}
}

impl PartialEq for PropertyValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Text(a), Self::Text(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			// Widgets carry callbacks and have no meaningful equality
			_ => false,
		}
	}
}

impl From<&str> for PropertyValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for PropertyValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for PropertyValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for PropertyValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for PropertyValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Widget> for PropertyValue {
	fn from(value: Widget) -> Self {
		Self::Widget(value)
	}
}

/// Surface-level overrides a page declares for itself, keyed by property name.
pub type RouteProperties = IndexMap<String, PropertyValue>;

/// The container a router renders pages into.
pub trait Surface: Send {
	/// Removes every widget.
	fn clear(&mut self);

	/// Appends a widget.
	fn add_widget(&mut self, widget: Widget);

	/// Pushes pending changes to the screen.
	fn refresh(&mut self);

	/// Current widgets, in display order. Handed to transition effects.
	fn widgets(&self) -> Vec<Widget>;

	/// Reads a property; `None` means unset.
	fn property(&self, name: &str) -> Option<PropertyValue>;

	/// Writes a property; `None` resets it to the host default.
	fn set_property(&mut self, name: &str, value: Option<PropertyValue>);
}

/// Shared handle to a surface.
pub type SharedSurface = Arc<Mutex<dyn Surface>>;

/// Wraps a surface into a [`SharedSurface`].
pub fn shared<S: Surface + 'static>(surface: S) -> SharedSurface {
	Arc::new(Mutex::new(surface))
}

/// Visual transition played over the outgoing widgets before a page swap.
///
/// Returning from [`TransitionEffect::play`] signals completion; the router
/// then clears the surface and renders the next page.
pub trait TransitionEffect: Send + Sync {
	/// Plays the transition.
	fn play(&self, outgoing: &[Widget]);
}

/// Transition that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransition;

impl TransitionEffect for NoTransition {
	fn play(&self, _outgoing: &[Widget]) {}
}

/// Host address mechanism behind an addressable router.
///
/// `go` only requests the change. The host later reports the new address
/// through [`Router::handle_address_change`](crate::router::Router::handle_address_change),
/// usually from its event loop.
pub trait AddressBar: Send + Sync {
	/// Requests that the visible address become `address`.
	fn go(&self, address: &str);
}
