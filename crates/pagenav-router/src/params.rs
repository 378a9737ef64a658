//! Route parameter codec.
//!
//! Addressable routers carry parameters in a query-string-like suffix:
//! `route?key1=value1&key2=value2`. Encoding inserts values verbatim, so
//! callers must keep `&`, `=` and control characters out of them. Decoding
//! infers a scalar type for every value and never fails; malformed pairs are
//! logged and skipped.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ROOT_ROUTE;

/// Stand-in for spaces while an address is being split.
///
/// Hosts disagree on whether a space travels as ` `, `%20` or `+`; all three
/// collapse to this token first and turn back into a literal space at the end.
const SPACE_PLACEHOLDER: char = '\u{E000}';

static FLOAT_VALUE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("float pattern is valid"));

/// A decoded parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	/// All-digit token.
	Int(i64),
	/// Token of the form `-?digits.digits`.
	Float(f64),
	/// `true` / `false`, any case.
	Bool(bool),
	/// `None` or `null`.
	Null,
	/// Anything else.
	Str(String),
}

impl ParamValue {
	/// Returns the integer value, if this is an [`ParamValue::Int`].
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value, if this is a [`ParamValue::Float`].
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the boolean value, if this is a [`ParamValue::Bool`].
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value, if this is a [`ParamValue::Str`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Whether this is [`ParamValue::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Infers the type of a raw token.
	///
	/// The placeholder is only substituted back for plain strings; every other
	/// variant is matched on the raw token.
	fn infer(raw: &str) -> Self {
		if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
			// Out of range integers keep their text
			if let Ok(v) = raw.parse::<i64>() {
				return Self::Int(v);
			}
		} else if FLOAT_VALUE.is_match(raw) {
			if let Ok(v) = raw.parse::<f64>() {
				return Self::Float(v);
			}
		} else if raw.eq_ignore_ascii_case("true") {
			return Self::Bool(true);
		} else if raw.eq_ignore_ascii_case("false") {
			return Self::Bool(false);
		} else if raw == "None" || raw == "null" {
			return Self::Null;
		}
		Self::Str(restore_spaces(raw))
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(v) => write!(f, "{}", v),
			// Keep the fractional part so the value decodes back as a float
			Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
			Self::Float(v) => write!(f, "{}", v),
			Self::Bool(v) => write!(f, "{}", v),
			Self::Null => f.write_str("null"),
			Self::Str(v) => f.write_str(v),
		}
	}
}

macro_rules! impl_from_for_param_value {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for ParamValue {
				fn from(value: $ty) -> Self {
					Self::$variant(value.into())
				}
			}
		)*
	};
}

impl_from_for_param_value! {
	i64 => Int,
	i32 => Int,
	u32 => Int,
	f64 => Float,
	f32 => Float,
	bool => Bool,
	String => Str,
	&str => Str,
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Self::Null)
	}
}

/// Parameter map in insertion order.
pub type Parameters = IndexMap<String, ParamValue>;

/// Result of [`decode`]: the base route plus whatever parameters survived.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAddress {
	/// Route name without the query suffix or leading separator.
	pub route: String,
	/// Parameters in the order they appeared.
	pub parameters: Parameters,
}

/// Builds an address from a route name and its parameters.
///
/// Returns `route` unchanged when `parameters` is empty.
///
/// # Example
///
/// ```
/// use pagenav_router::params::{Parameters, ParamValue, encode};
///
/// let mut params = Parameters::new();
/// params.insert("id".to_string(), ParamValue::Int(7));
/// params.insert("tab".to_string(), ParamValue::from("info"));
/// assert_eq!(encode("profile", &params), "profile?id=7&tab=info");
/// ```
pub fn encode(route: &str, parameters: &Parameters) -> String {
	if parameters.is_empty() {
		return route.to_string();
	}

	let query = parameters
		.iter()
		.map(|(key, value)| format!("{}={}", key, value))
		.collect::<Vec<_>>()
		.join("&");
	format!("{}?{}", route, query)
}

/// Splits an address into its base route and typed parameters.
///
/// Never fails. Pairs without `=` and keys that are not purely alphabetic
/// are logged and skipped; the base route is always returned.
///
/// # Example
///
/// ```
/// use pagenav_router::params::{ParamValue, decode};
///
/// let decoded = decode("/search?q=hello+world&page=2");
/// assert_eq!(decoded.route, "search");
/// assert_eq!(decoded.parameters["q"], ParamValue::Str("hello world".to_string()));
/// assert_eq!(decoded.parameters["page"], ParamValue::Int(2));
/// ```
pub fn decode(address: &str) -> DecodedAddress {
	let normalized = normalize_spaces(address);
	let stripped = strip_separator(&normalized);

	let (base, query) = match stripped.split_once('?') {
		Some((base, query)) => (base, Some(query)),
		None => (stripped, None),
	};

	let route = if base.is_empty() {
		ROOT_ROUTE.to_string()
	} else {
		restore_spaces(base)
	};

	let mut parameters = Parameters::new();
	if let Some(query) = query.filter(|q| !q.is_empty()) {
		for pair in query.split('&') {
			let Some((key, raw)) = pair.split_once('=') else {
				tracing::warn!(
					address = %address,
					pair = %restore_spaces(pair),
					"Invalid parameter pair: missing '='; pair skipped."
				);
				continue;
			};

			if !is_valid_key(key) {
				tracing::warn!(
					address = %address,
					key = %restore_spaces(key),
					"Invalid key name: the key is expected to be alphabetic; parameter skipped."
				);
				continue;
			}

			parameters.insert(key.to_string(), ParamValue::infer(raw));
		}
	}

	DecodedAddress { route, parameters }
}

fn normalize_spaces(address: &str) -> String {
	let placeholder = SPACE_PLACEHOLDER.to_string();
	address
		.replace(' ', &placeholder)
		.replace("%20", &placeholder)
		.replace('+', &placeholder)
}

fn strip_separator(address: &str) -> &str {
	match address.strip_prefix('/') {
		Some(rest) if !rest.is_empty() => rest,
		_ => address,
	}
}

fn restore_spaces(value: &str) -> String {
	value.replace(SPACE_PLACEHOLDER, " ")
}

fn is_valid_key(key: &str) -> bool {
	!key.is_empty() && key.chars().all(char::is_alphabetic)
}
