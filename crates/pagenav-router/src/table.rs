//! Route table: validated route names mapped to page handlers.
//!
//! The namespace is flat. Lookup is an exact string match; there are no
//! path segments, wildcards or nested tables.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::RouteContext;
use crate::error::RouteError;
use crate::{NOT_FOUND_ROUTE, ROOT_ROUTE};

static ROUTE_NAME: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("route name pattern is valid"));

/// A page handler: renders one route onto the surface held by the context.
///
/// Implemented for every `Fn(&RouteContext) + Send + Sync` closure.
pub trait RouteHandler: Send + Sync {
	/// Renders the page.
	fn handle(&self, ctx: &RouteContext);
}

impl<F> RouteHandler for F
where
	F: Fn(&RouteContext) + Send + Sync,
{
	fn handle(&self, ctx: &RouteContext) {
		self(ctx)
	}
}

/// Shared, type-erased page handler.
pub type Handler = Arc<dyn RouteHandler>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
	F: Fn(&RouteContext) + Send + Sync + 'static,
{
	Arc::new(f)
}

/// Key of a route table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
	/// The root route `/`.
	Root,
	/// The reserved not-found route `ROUTE-404`.
	NotFound,
	/// A named route matching `^[A-Za-z_][A-Za-z0-9_]*$`.
	Named(String),
}

impl RouteKey {
	/// Validates a route name.
	///
	/// # Errors
	///
	/// Returns [`RouteError::InvalidName`] when `name` is neither reserved nor
	/// a valid identifier.
	pub fn parse(name: &str) -> Result<Self, RouteError> {
		match name {
			ROOT_ROUTE => Ok(Self::Root),
			NOT_FOUND_ROUTE => Ok(Self::NotFound),
			_ if ROUTE_NAME.is_match(name) => Ok(Self::Named(name.to_string())),
			_ => Err(RouteError::InvalidName(name.to_string())),
		}
	}

	/// Returns the route name this key stands for.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Root => ROOT_ROUTE,
			Self::NotFound => NOT_FOUND_ROUTE,
			Self::Named(name) => name,
		}
	}
}

impl fmt::Display for RouteKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Insertion-ordered mapping from route key to handler.
#[derive(Clone, Default)]
pub struct RouteTable {
	entries: IndexMap<RouteKey, Handler>,
}

impl fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes", &self.entries.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a handler, replacing any handler already stored under `name`.
	///
	/// # Errors
	///
	/// Returns [`RouteError::InvalidName`] and leaves the table untouched when
	/// the name fails validation.
	pub fn try_register(&mut self, name: &str, handler: Handler) -> Result<(), RouteError> {
		let key = RouteKey::parse(name)?;
		self.entries.insert(key, handler);
		Ok(())
	}

	/// Registers a handler, dropping it with a warning when the name is invalid.
	///
	/// Returns whether the entry was stored.
	pub fn register(&mut self, name: &str, handler: Handler) -> bool {
		match self.try_register(name, handler) {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(route = %name, "{}", err);
				false
			}
		}
	}

	/// Copies entries into the table in order.
	///
	/// A name that is already present is overwritten and the override is
	/// logged. Invalid names are dropped as in [`RouteTable::register`].
	pub fn merge<I>(&mut self, entries: I)
	where
		I: IntoIterator<Item = (String, Handler)>,
	{
		for (name, handler) in entries {
			if self.contains(&name) {
				tracing::warn!(route = %name, "Route registered twice; the later registration wins.");
			}
			self.register(&name, handler);
		}
	}

	/// Looks up the handler for an exact route name.
	pub fn get(&self, name: &str) -> Option<&Handler> {
		let key = RouteKey::parse(name).ok()?;
		self.entries.get(&key)
	}

	/// Returns the registered `ROUTE-404` handler, if any.
	pub fn not_found(&self) -> Option<&Handler> {
		self.entries.get(&RouteKey::NotFound)
	}

	/// Whether a handler is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Registered route names in insertion order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(RouteKey::as_str)
	}

	/// Number of registered routes, reserved ones included.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
