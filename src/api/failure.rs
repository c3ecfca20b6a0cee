//! api::failure
//!
//! Structured report for API responses with a failure status.
//!
//! # Format
//!
//! ```text
//! API 404 POST /nginx/proxy-hosts: Host not found
//! Request ID: 7f3c...
//! Tip: rerun with --debug (or set NPM_CLI_DEBUG=1) for full logs.
//! ```
//!
//! With debug enabled the tip is replaced by the redacted response body
//! and, when one was sent, the redacted request body.

use std::fmt;

use serde_json::Value;

use crate::debug::{preview, DEFAULT_PREVIEW_LIMIT};
use crate::redact::redact;

/// Printed instead of payloads when debug is off.
pub const DEBUG_HINT: &str = "Tip: rerun with --debug (or set NPM_CLI_DEBUG=1) for full logs.";

/// Extra information attached to an [`ApiFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDetail {
    /// Redacted previews of the exchanged payloads.
    Payloads {
        response: String,
        request: Option<String>,
    },
    /// Pointer to debug mode.
    Hint,
}

/// An API call answered with status >= 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: u16,
    pub method: String,
    pub path: String,
    pub message: String,
    pub request_id: Option<String>,
    pub detail: FailureDetail,
}

impl ApiFailure {
    /// Build a failure from the parsed response.
    ///
    /// With `debug` set, the redacted response and request bodies are
    /// captured; otherwise only the hint is attached.
    pub fn from_response(
        status: u16,
        method: &str,
        path: &str,
        payload: &Value,
        request_id: Option<String>,
        request_body: Option<&Value>,
        debug: bool,
    ) -> Self {
        let detail = if debug {
            FailureDetail::Payloads {
                response: preview(&redact(payload, "payload"), DEFAULT_PREVIEW_LIMIT),
                request: request_body
                    .map(|body| preview(&redact(body, "json_body"), DEFAULT_PREVIEW_LIMIT)),
            }
        } else {
            FailureDetail::Hint
        };

        Self {
            status,
            method: method.to_string(),
            path: path.to_string(),
            message: error_message(payload),
            request_id,
            detail,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} {} {}: {}",
            self.status, self.method, self.path, self.message
        )?;
        if let Some(id) = &self.request_id {
            write!(f, "\nRequest ID: {}", id)?;
        }
        match &self.detail {
            FailureDetail::Payloads { response, request } => {
                write!(f, "\nResponse payload:\n{}", response)?;
                if let Some(request) = request {
                    write!(f, "\nRequest payload:\n{}", request)?;
                }
            }
            FailureDetail::Hint => write!(f, "\n{}", DEBUG_HINT)?,
        }
        Ok(())
    }
}

/// Best-effort human message from an error payload.
///
/// Order: `error.message`, the `error` object itself, top-level
/// `message`, then the whole payload.
pub fn error_message(payload: &Value) -> String {
    let Value::Object(map) = payload else {
        return text(payload);
    };

    if let Some(Value::Object(inner)) = map.get("error") {
        return match inner.get("message").filter(|m| is_truthy(m)) {
            Some(message) => text(message),
            None => Value::Object(inner.clone()).to_string(),
        };
    }

    match map.get("message").filter(|m| is_truthy(m)) {
        Some(message) => text(message),
        None => text(payload),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness of a JSON value: null, false, zero and empty values are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_from_nested_error() {
        let payload = json!({"error": {"code": 404, "message": "Host not found"}});
        assert_eq!(error_message(&payload), "Host not found");
    }

    #[test]
    fn nested_error_without_message_is_stringified() {
        let payload = json!({"error": {"code": 500}});
        assert_eq!(error_message(&payload), r#"{"code":500}"#);

        let payload = json!({"error": {"code": 500, "message": ""}});
        assert!(error_message(&payload).contains("\"code\":500"));
    }

    #[test]
    fn top_level_message() {
        let payload = json!({"message": "Validation failed", "error": "bad"});
        assert_eq!(error_message(&payload), "Validation failed");
    }

    #[test]
    fn whole_payload_as_last_resort() {
        assert_eq!(error_message(&json!({"status": "nope"})), r#"{"status":"nope"}"#);
        assert_eq!(error_message(&json!("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message(&json!([1, 2])), "[1,2]");
    }

    fn failure(detail_debug: bool, request_id: Option<&str>, body: Option<&Value>) -> ApiFailure {
        ApiFailure::from_response(
            400,
            "POST",
            "/nginx/certificates",
            &json!({"error": {"message": "Invalid domain"}, "token": "leaked-value-1234"}),
            request_id.map(str::to_string),
            body,
            detail_debug,
        )
    }

    #[test]
    fn display_without_debug_shows_hint() {
        let rendered = failure(false, Some("req-42"), None).to_string();
        assert_eq!(
            rendered,
            format!(
                "API 400 POST /nginx/certificates: Invalid domain\nRequest ID: req-42\n{}",
                DEBUG_HINT
            )
        );
    }

    #[test]
    fn display_with_debug_shows_redacted_payloads() {
        let body = json!({"meta": {"dns_provider_credentials": "dns_cloudflare_api_token = abcdefghijkl"}});
        let rendered = failure(true, None, Some(&body)).to_string();

        assert!(rendered.starts_with("API 400 POST /nginx/certificates: Invalid domain\n"));
        assert!(!rendered.contains("Request ID"));
        assert!(!rendered.contains(DEBUG_HINT));
        assert!(rendered.contains("Response payload:\n"));
        assert!(rendered.contains("Request payload:\n"));
        assert!(!rendered.contains("leaked-value-1234"));
        assert!(!rendered.contains("abcdefghijkl"));
        assert!(rendered.contains("leak...1234"));
    }

    #[test]
    fn debug_without_request_body() {
        let failure = failure(true, None, None);
        match &failure.detail {
            FailureDetail::Payloads { request, .. } => assert!(request.is_none()),
            other => panic!("unexpected detail: {:?}", other),
        }
        assert!(!failure.to_string().contains("Request payload"));
    }
}
