//! Named widget templates shared across pages.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::{Arguments, RouteContext};
use crate::surface::Widget;

/// Builds a reusable widget for the page being rendered.
///
/// Implemented for every `Fn(&RouteContext, &Arguments) -> Option<Widget>`
/// closure. Returning `None` means the template has nothing to show.
pub trait TemplateHandler: Send + Sync {
	/// Renders the template.
	fn render(&self, ctx: &RouteContext, args: &Arguments) -> Option<Widget>;
}

impl<F> TemplateHandler for F
where
	F: Fn(&RouteContext, &Arguments) -> Option<Widget> + Send + Sync,
{
	fn render(&self, ctx: &RouteContext, args: &Arguments) -> Option<Widget> {
		self(ctx, args)
	}
}

/// Shared, type-erased template.
pub type Template = Arc<dyn TemplateHandler>;

/// Wraps a closure into a [`Template`].
pub fn template<F>(f: F) -> Template
where
	F: Fn(&RouteContext, &Arguments) -> Option<Widget> + Send + Sync + 'static,
{
	Arc::new(f)
}

/// Templates by name. Names are free-form; a later registration replaces an
/// earlier one.
#[derive(Clone, Default)]
pub struct TemplateTable {
	entries: IndexMap<String, Template>,
}

impl TemplateTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, template: Template) {
		let name = name.into();
		if self.entries.insert(name.clone(), template).is_some() {
			tracing::debug!(template = %name, "Template replaced by a later registration.");
		}
	}

	pub fn merge<I>(&mut self, entries: I)
	where
		I: IntoIterator<Item = (String, Template)>,
	{
		for (name, template) in entries {
			self.register(name, template);
		}
	}

	pub fn get(&self, name: &str) -> Option<&Template> {
		self.entries.get(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl fmt::Debug for TemplateTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TemplateTable")
			.field("templates", &self.entries.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_register_replaces_and_keeps_order() {
		let first = template(|_, _| None);
		let second = template(|_, _| Some(Widget::text("bar")));
		let mut table = TemplateTable::new();

		table.register("appbar", first.clone());
		table.register("footer", template(|_, _| None));
		table.merge(vec![("appbar".to_string(), second.clone())]);

		assert_eq!(table.len(), 2);
		assert!(Arc::ptr_eq(table.get("appbar").unwrap(), &second));
		assert_eq!(table.names().collect::<Vec<_>>(), vec!["appbar", "footer"]);
		assert!(table.get("missing").is_none());
	}
}
