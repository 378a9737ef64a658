//! Property and edge-case tests for the parameter codec

mod common;

use common::LogCapture;
use pagenav_router::params::{ParamValue, Parameters, decode, encode};
use proptest::prelude::*;
use rstest::rstest;
use tracing::Level;

fn value_strategy() -> impl Strategy<Value = ParamValue> {
	prop_oneof![
		(0i64..=i64::MAX).prop_map(ParamValue::Int),
		(-1_000_000i64..1_000_000, 1u32..1000).prop_map(|(whole, frac)| {
			ParamValue::Float(format!("{}.{}", whole, frac).parse().unwrap_or(0.5))
		}),
		any::<bool>().prop_map(ParamValue::Bool),
		Just(ParamValue::Null),
		"v[a-z ]{0,12}".prop_map(ParamValue::Str),
	]
}

fn parameters_strategy() -> impl Strategy<Value = Parameters> {
	proptest::collection::vec(("[a-zA-Z]{1,8}", value_strategy()), 0..6)
		.prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
	#[test]
	fn prop_encode_decode_round_trip(
		route in "[A-Za-z_][A-Za-z0-9_]{0,15}",
		parameters in parameters_strategy(),
	) {
		let decoded = decode(&encode(&route, &parameters));

		prop_assert_eq!(decoded.route, route);
		prop_assert_eq!(decoded.parameters, parameters);
	}

	#[test]
	fn prop_decode_never_panics(address in "\\PC{0,40}") {
		let decoded = decode(&address);
		prop_assert!(!decoded.route.is_empty());
	}
}

#[rstest]
fn test_round_trip_mixed_types() {
	let mut parameters = Parameters::new();
	parameters.insert("a".to_string(), ParamValue::Int(1));
	parameters.insert("b".to_string(), ParamValue::Bool(true));
	parameters.insert("c".to_string(), ParamValue::from("x"));

	let decoded = decode(&encode("name", &parameters));

	assert_eq!(decoded.route, "name");
	assert_eq!(decoded.parameters["a"], ParamValue::Int(1));
	assert_eq!(decoded.parameters["b"], ParamValue::Bool(true));
	assert_eq!(decoded.parameters["c"], ParamValue::Str("x".to_string()));
}

#[rstest]
fn test_non_alphabetic_key_logs_warning() {
	let (logs, _guard) = LogCapture::install();

	let decoded = decode("page?1x=5");

	assert!(decoded.parameters.is_empty());
	let warnings = logs.at(Level::WARN);
	assert_eq!(warnings.len(), 1);
	assert!(warnings[0].message.contains("Invalid key name"));
	assert_eq!(warnings[0].field("key"), Some("1x"));
}

#[rstest]
fn test_pair_without_equals_logs_and_keeps_others() {
	let (logs, _guard) = LogCapture::install();

	let decoded = decode("page?a=5&lonely&e=hello");

	assert_eq!(decoded.parameters.len(), 2);
	assert_eq!(decoded.parameters["a"], ParamValue::Int(5));
	assert_eq!(decoded.parameters["e"], ParamValue::from("hello"));
	assert!(logs.contains(Level::WARN, "missing '='"));
}
