//! Property-based tests for redaction and debug previews.
//!
//! These check the guarantees the logging paths rely on: masking is
//! stable under repetition, sensitive keys never leak their values, and
//! previews stay bounded.

use proptest::prelude::*;
use serde_json::{Map, Value};

use npmctl::debug::preview;
use npmctl::redact::{mask_secret, redact, MASK, SENSITIVE_TERMS};

/// Keys that carry no secret under the default policy.
const PLAIN_KEYS: &[&str] = &[
    "domain_names",
    "forward_host",
    "forward_port",
    "nice_name",
    "meta",
    "provider",
    "identity",
    "id",
];

fn plain_key() -> impl Strategy<Value = String> {
    prop::sample::select(PLAIN_KEYS).prop_map(str::to_string)
}

/// A sensitive term embedded in a key, with random casing and affixes.
fn sensitive_key() -> impl Strategy<Value = String> {
    (
        prop::sample::select(SENSITIVE_TERMS),
        "[a-z_]{0,6}",
        "[a-z_]{0,6}",
        any::<bool>(),
    )
        .prop_map(|(term, prefix, suffix, upper)| {
            let term = if upper {
                term.to_uppercase()
            } else {
                term.to_string()
            };
            format!("{}{}{}", prefix, term, suffix)
        })
}

fn any_key() -> impl Strategy<Value = String> {
    prop_oneof![3 => plain_key(), 1 => sensitive_key()]
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 .@-]{0,24}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((any_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// A JSON tree whose keys are all plain.
fn plain_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec((plain_key(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Redacting twice gives the same result as redacting once.
    #[test]
    fn redaction_is_idempotent(value in json_value(), hint in any_key()) {
        let once = redact(&value, &hint);
        let twice = redact(&once, &hint);
        prop_assert_eq!(once, twice);
    }

    /// Values under a sensitive key are always masked.
    #[test]
    fn sensitive_string_never_survives(key in sensitive_key(), secret in "[a-z0-9]{1,40}") {
        let mut map = Map::new();
        map.insert(key.clone(), Value::String(secret.clone()));
        let redacted = redact(&Value::Object(map), "payload");

        let masked = redacted.get(&key).and_then(Value::as_str).map(str::to_string);
        prop_assert!(masked.is_some());
        let masked = masked.unwrap_or_default();
        prop_assert_ne!(&masked, &secret);
        prop_assert_eq!(masked, mask_secret(&secret));
    }

    /// Non-string values under a sensitive key collapse to the bare mask.
    #[test]
    fn sensitive_structure_fully_masked(key in sensitive_key(), value in json_value()) {
        prop_assume!(!value.is_string());
        let mut map = Map::new();
        map.insert(key.clone(), value);
        let redacted = redact(&Value::Object(map), "payload");
        prop_assert_eq!(redacted.get(&key), Some(&Value::String(MASK.to_string())));
    }

    /// Trees without sensitive keys pass through untouched.
    #[test]
    fn plain_trees_unchanged(value in plain_value()) {
        prop_assert_eq!(redact(&value, "payload"), value);
    }

    /// Short secrets are fully masked; longer ones keep four chars at each end.
    #[test]
    fn mask_shape(secret in "\\PC{0,40}") {
        let masked = mask_secret(&secret);
        let chars: Vec<char> = secret.chars().collect();
        if chars.len() <= 8 {
            prop_assert_eq!(masked, MASK);
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            prop_assert_eq!(masked, format!("{}...{}", head, tail));
        }
    }

    /// Previews never exceed the limit plus the truncation annotation.
    #[test]
    fn preview_is_bounded(text in "\\PC{0,200}", limit in 1usize..120) {
        let total = text.chars().count();
        let rendered = preview(&Value::String(text.clone()), limit);

        if total <= limit {
            prop_assert_eq!(rendered, text);
        } else {
            let annotation = format!("... [truncated {} chars]", total - limit);
            prop_assert!(rendered.ends_with(&annotation));
            prop_assert_eq!(rendered.chars().count(), limit + annotation.chars().count());
        }
    }
}
