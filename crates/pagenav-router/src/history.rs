//! Back-navigation history.
//!
//! The router pushes the route it is leaving on every forward navigation, so
//! the last entry is always the previous route. Entries are never evicted or
//! deduplicated: a long-lived session that only navigates forward grows the
//! stack linearly.

use crate::ROOT_ROUTE;

/// Previously active route names, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStack {
	entries: Vec<String>,
}

impl HistoryStack {
	/// Creates an empty history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a route name.
	pub fn push(&mut self, route: impl Into<String>) {
		self.entries.push(route.into());
	}

	/// Removes and returns the most recent entry.
	pub fn pop(&mut self) -> Option<String> {
		self.entries.pop()
	}

	/// Returns the most recent entry, or `/` when the history is empty.
	pub fn peek(&self) -> &str {
		self.entries.last().map(String::as_str).unwrap_or(ROOT_ROUTE)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether there is nothing to go back to.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries, oldest first.
	pub fn entries(&self) -> &[String] {
		&self.entries
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_peek_defaults_to_root() {
		let history = HistoryStack::new();
		assert_eq!(history.peek(), "/");
		assert!(history.is_empty());
	}

	#[rstest]
	fn test_push_pop_order() {
		let mut history = HistoryStack::new();
		history.push("/");
		history.push("settings");

		assert_eq!(history.peek(), "settings");
		assert_eq!(history.pop().as_deref(), Some("settings"));
		assert_eq!(history.peek(), "/");
		assert_eq!(history.pop().as_deref(), Some("/"));
		assert_eq!(history.pop(), None);
	}

	#[rstest]
	fn test_no_deduplication() {
		let mut history = HistoryStack::new();
		for _ in 0..3 {
			history.push("home");
		}
		assert_eq!(history.len(), 3);
		assert_eq!(history.entries(), &["home", "home", "home"]);
	}
}
