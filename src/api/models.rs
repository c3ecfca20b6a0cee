//! api::models
//!
//! Typed views over the response bodies npmctl reads.
//!
//! Responses are kept as `serde_json::Value` by the client; these helpers
//! pull out only the fields the commands need and tolerate anything else.

use std::fmt;

use serde_json::Value;

use super::failure::is_truthy;
use crate::error::{NpmError, Result};

/// Token issued by `POST /tokens`.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub expires: Option<String>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token", &"[REDACTED]")
            .field("expires", &self.expires)
            .finish()
    }
}

impl TokenGrant {
    /// Extract the token from a login response.
    ///
    /// # Errors
    ///
    /// - [`NpmError::TwoFactorRequired`] if the server asks for a second factor
    /// - [`NpmError::UnexpectedResponse`] if no token is present
    pub fn from_response(payload: &Value) -> Result<Self> {
        if payload.get("requires_2fa").is_some_and(is_truthy) {
            return Err(NpmError::TwoFactorRequired);
        }

        let token = payload
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                NpmError::UnexpectedResponse("Login response did not include a token.".into())
            })?;

        Ok(Self {
            token: token.to_string(),
            expires: payload.get("expires").and_then(scalar_text),
        })
    }
}

/// Summary of a created certificate or proxy host.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedResource {
    pub id: Option<Value>,
    pub nice_name: Option<String>,
    pub domain_names: Vec<String>,
}

impl CreatedResource {
    pub fn from_response(payload: &Value) -> Self {
        Self {
            id: payload.get("id").filter(|v| !v.is_null()).cloned(),
            nice_name: payload.get("nice_name").and_then(scalar_text),
            domain_names: payload
                .get("domain_names")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(scalar_text).collect())
                .unwrap_or_default(),
        }
    }

    /// The id as printed to the user.
    pub fn id_label(&self) -> String {
        self.id
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_else(|| "(unknown)".to_string())
    }

    /// The id as a certificate reference.
    ///
    /// Accepts a positive number or a numeric string.
    pub fn numeric_id(&self) -> Option<i64> {
        let id = match self.id.as_ref()? {
            Value::Number(n) => n.as_i64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        (id > 0).then_some(id)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_grant_from_login_response() {
        let grant = TokenGrant::from_response(&json!({
            "token": "eyJhbGciOi.abc",
            "expires": "2030-01-01T00:00:00.000Z"
        }))
        .expect("grant");
        assert_eq!(grant.token, "eyJhbGciOi.abc");
        assert_eq!(grant.expires.as_deref(), Some("2030-01-01T00:00:00.000Z"));
        assert!(!format!("{:?}", grant).contains("eyJhbGciOi"));
    }

    #[test]
    fn two_factor_challenge() {
        let err = TokenGrant::from_response(&json!({"requires_2fa": true, "challenge_token": "x"}))
            .unwrap_err();
        assert!(matches!(err, NpmError::TwoFactorRequired));
        assert!(err.to_string().contains("/tokens/2fa"));
    }

    #[test]
    fn falsy_two_factor_flag_is_ignored() {
        let grant =
            TokenGrant::from_response(&json!({"requires_2fa": false, "token": "t"})).expect("grant");
        assert_eq!(grant.expires, None);
    }

    #[test]
    fn missing_token() {
        for payload in [json!({}), json!({"token": ""}), json!("OK")] {
            let err = TokenGrant::from_response(&payload).unwrap_err();
            assert_eq!(err.to_string(), "Login response did not include a token.");
        }
    }

    #[test]
    fn created_resource_fields() {
        let created = CreatedResource::from_response(&json!({
            "id": 12,
            "nice_name": "app.example.com",
            "domain_names": ["app.example.com", "www.example.com"],
            "meta": {}
        }));
        assert_eq!(created.id_label(), "12");
        assert_eq!(created.numeric_id(), Some(12));
        assert_eq!(created.nice_name.as_deref(), Some("app.example.com"));
        assert_eq!(created.domain_names.len(), 2);
    }

    #[test]
    fn created_resource_tolerates_odd_shapes() {
        let created = CreatedResource::from_response(&json!("created"));
        assert_eq!(created.id_label(), "(unknown)");
        assert_eq!(created.numeric_id(), None);
        assert!(created.domain_names.is_empty());

        let created = CreatedResource::from_response(&json!({"id": "31"}));
        assert_eq!(created.numeric_id(), Some(31));

        let created = CreatedResource::from_response(&json!({"id": 0}));
        assert_eq!(created.numeric_id(), None);
    }
}
