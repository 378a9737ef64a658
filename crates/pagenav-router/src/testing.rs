//! In-memory host collaborators for tests and headless use.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::router::Router;
use crate::surface::{AddressBar, PropertyValue, SharedSurface, Surface, Widget};

/// Surface that records everything done to it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	widgets: Vec<Widget>,
	properties: HashMap<String, PropertyValue>,
	clears: usize,
	refreshes: usize,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the concrete handle for inspection alongside the type-erased
	/// handle the router takes. Both point at the same surface.
	pub fn shared() -> (Arc<Mutex<RecordingSurface>>, SharedSurface) {
		let recording = Arc::new(Mutex::new(Self::new()));
		let surface: SharedSurface = recording.clone();
		(recording, surface)
	}

	/// Values of every `Text` widget, in order.
	pub fn texts(&self) -> Vec<String> {
		self.widgets
			.iter()
			.filter_map(|widget| widget.as_text().map(str::to_string))
			.collect()
	}

	pub fn widget_count(&self) -> usize {
		self.widgets.len()
	}

	pub fn clear_count(&self) -> usize {
		self.clears
	}

	pub fn refresh_count(&self) -> usize {
		self.refreshes
	}

	/// Properties currently set.
	pub fn properties(&self) -> &HashMap<String, PropertyValue> {
		&self.properties
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self) {
		self.widgets.clear();
		self.clears += 1;
	}

	fn add_widget(&mut self, widget: Widget) {
		self.widgets.push(widget);
	}

	fn refresh(&mut self) {
		self.refreshes += 1;
	}

	fn widgets(&self) -> Vec<Widget> {
		self.widgets.clone()
	}

	fn property(&self, name: &str) -> Option<PropertyValue> {
		self.properties.get(name).cloned()
	}

	fn set_property(&mut self, name: &str, value: Option<PropertyValue>) {
		match value {
			Some(value) => {
				self.properties.insert(name.to_string(), value);
			}
			None => {
				self.properties.remove(name);
			}
		}
	}
}

/// Address bar that queues requested addresses until they are delivered.
#[derive(Debug, Default)]
pub struct RecordingAddressBar {
	pending: Mutex<Vec<String>>,
	requested: Mutex<Vec<String>>,
}

impl RecordingAddressBar {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Every address ever requested, oldest first.
	pub fn requested(&self) -> Vec<String> {
		self.requested.lock().clone()
	}

	/// Most recent request.
	pub fn last(&self) -> Option<String> {
		self.requested.lock().last().cloned()
	}

	/// Reports queued addresses to `router` one by one, as a host event loop
	/// would. Addresses requested while delivering are delivered too.
	///
	/// Returns how many were delivered.
	pub fn deliver(&self, router: &Router) -> usize {
		let mut delivered = 0;
		loop {
			let next = {
				let mut pending = self.pending.lock();
				if pending.is_empty() {
					break;
				}
				pending.remove(0)
			};
			router.handle_address_change(&next);
			delivered += 1;
		}
		delivered
	}
}

impl AddressBar for RecordingAddressBar {
	fn go(&self, address: &str) {
		self.pending.lock().push(address.to_string());
		self.requested.lock().push(address.to_string());
	}
}
