//! redact
//!
//! Masking of sensitive values before they reach a log line or an error
//! report.
//!
//! # Rules
//!
//! A value is sensitive when the *key* it sits under contains one of the
//! policy's terms, compared case-insensitively. The value's own content is
//! never inspected. Sensitive strings keep a short recognisable preview
//! (see [`mask_secret`]); any other sensitive value becomes [`MASK`].
//!
//! Objects recurse with each entry's own key as the next hint. Arrays
//! recurse with the hint of the key that holds them, so a list of tokens
//! under `"tokens"` is masked element by element.
//!
//! Redaction is idempotent: redacting an already-redacted value returns it
//! unchanged.
//!
//! # Example
//!
//! ```
//! use npmctl::redact::redact;
//! use serde_json::json;
//!
//! let body = json!({"identity": "ops@example.com", "secret": "hunter2"});
//! let safe = redact(&body, "json_body");
//! assert_eq!(safe, json!({"identity": "ops@example.com", "secret": "***"}));
//! ```

use serde_json::{Map, Value};

/// Replacement for sensitive values that are too short or not text.
pub const MASK: &str = "***";

/// Key fragments treated as sensitive by the default policy.
pub const SENSITIVE_TERMS: &[&str] = &[
    "authorization",
    "token",
    "secret",
    "password",
    "dns_provider_credentials",
    "cloudflare_api_token",
];

/// Strings at or below this many characters are fully masked.
const FULL_MASK_MAX_CHARS: usize = 8;

/// Characters kept at each end of a longer masked string.
const VISIBLE_EDGE_CHARS: usize = 4;

/// Denylist of key fragments whose values must not be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionPolicy {
    terms: Vec<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self::new(SENSITIVE_TERMS.iter().copied())
    }
}

impl RedactionPolicy {
    /// Build a policy from key fragments. Empty fragments are ignored.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Whether values under `key_hint` must be masked.
    pub fn is_sensitive(&self, key_hint: &str) -> bool {
        let hint = key_hint.to_lowercase();
        self.terms.iter().any(|term| hint.contains(term.as_str()))
    }

    /// Return a copy of `value` with every sensitive subtree masked.
    pub fn redact(&self, value: &Value, key_hint: &str) -> Value {
        if self.is_sensitive(key_hint) {
            return match value {
                Value::String(s) => Value::String(mask_secret(s)),
                _ => Value::String(MASK.to_string()),
            };
        }

        match value {
            Value::Object(map) => {
                let redacted: Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.redact(v, k)))
                    .collect();
                Value::Object(redacted)
            }
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.redact(v, key_hint)).collect())
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
        }
    }
}

/// Redact `value` with the default policy.
pub fn redact(value: &Value, key_hint: &str) -> Value {
    RedactionPolicy::default().redact(value, key_hint)
}

/// Mask a secret string while keeping enough to tell secrets apart.
///
/// ```
/// use npmctl::redact::mask_secret;
///
/// assert_eq!(mask_secret("hunter2"), "***");
/// assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9"), "eyJh...NiJ9");
/// ```
pub fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    if len <= FULL_MASK_MAX_CHARS {
        return MASK.to_string();
    }

    let head: String = value.chars().take(VISIBLE_EDGE_CHARS).collect();
    let tail: String = value.chars().skip(len - VISIBLE_EDGE_CHARS).collect();
    format!("{}...{}", head, tail)
}
