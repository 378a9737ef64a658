//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use pagenav_router::prelude::*;

/// One captured log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
	pub level: Level,
	pub message: String,
	pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}
}

struct EventVisitor<'a>(&'a mut CapturedEvent);

impl Visit for EventVisitor<'_> {
	fn record_str(&mut self, field: &Field, value: &str) {
		self.record(field, value.to_string());
	}

	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		self.record(field, format!("{:?}", value));
	}
}

impl EventVisitor<'_> {
	fn record(&mut self, field: &Field, value: String) {
		if field.name() == "message" {
			self.0.message = value;
		} else {
			self.0.fields.push((field.name().to_string(), value));
		}
	}
}

/// Layer recording every event emitted on the current thread while installed.
#[derive(Clone, Default)]
pub struct LogCapture {
	events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
	/// Installs the capture as the thread default subscriber until the guard
	/// is dropped.
	pub fn install() -> (Self, DefaultGuard) {
		let capture = Self::default();
		let subscriber = tracing_subscriber::registry().with(capture.clone());
		let guard = tracing::subscriber::set_default(subscriber);
		(capture, guard)
	}

	pub fn events(&self) -> Vec<CapturedEvent> {
		self.events.lock().clone()
	}

	pub fn at(&self, level: Level) -> Vec<CapturedEvent> {
		self.events()
			.into_iter()
			.filter(|event| event.level == level)
			.collect()
	}

	/// Whether an event at `level` has a message containing `needle`.
	pub fn contains(&self, level: Level, needle: &str) -> bool {
		self.at(level)
			.iter()
			.any(|event| event.message.contains(needle))
	}
}

impl<S: Subscriber> Layer<S> for LogCapture {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut captured = CapturedEvent {
			level: *event.metadata().level(),
			message: String::new(),
			fields: Vec::new(),
		};
		event.record(&mut EventVisitor(&mut captured));
		self.events.lock().push(captured);
	}
}

/// Handler that counts its invocations and writes `label` to the surface.
pub fn counting(label: &'static str, calls: &Arc<Mutex<usize>>) -> pagenav_router::Handler {
	let calls = calls.clone();
	handler(move |ctx| {
		*calls.lock() += 1;
		ctx.add(Widget::text(label));
	})
}

/// Embedded router over `routes`, ignoring every registry.
pub fn embedded_router(routes: Vec<(&str, pagenav_router::Handler)>) -> Router {
	routes
		.into_iter()
		.fold(Router::builder().without_registry(), |builder, (name, handler)| {
			builder.route(name, handler)
		})
		.embedded()
}
