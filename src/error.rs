//! error
//!
//! Crate-wide error type.
//!
//! Every failure a command can hit is one [`NpmError`] variant. None are
//! retried; the CLI reports the message on stderr and exits with status 1.
//! Messages never contain secret values.

use thiserror::Error;

use crate::api::ApiFailure;
use crate::secrets::SecretError;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, NpmError>;

/// Errors from credential resolution, secret storage, and API calls.
#[derive(Debug, Error)]
pub enum NpmError {
    /// No source produced a base URL.
    #[error("Missing NPM base URL. Use --base-url or set NPM_BASE_URL.")]
    MissingBaseUrl,

    /// A token is required but no source produced one.
    #[error("Missing API token. Run `npmctl login` or set NPM_TOKEN.")]
    MissingToken,

    /// A named secret was neither passed nor stored.
    #[error("Missing {label}. Use {flag}, set {env_var}, or run `{setup_command}`.")]
    MissingSecret {
        label: &'static str,
        flag: &'static str,
        env_var: &'static str,
        setup_command: &'static str,
    },

    /// Secret storage could not be opened or a vault operation failed.
    #[error(transparent)]
    SecretStore(#[from] SecretError),

    /// The HTTP client could not be built.
    #[error("failed to initialize HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    #[error("HTTP request failed: {method} {url}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a failure status.
    #[error("{0}")]
    Api(Box<ApiFailure>),

    /// Login needs a second factor.
    #[error("2FA required. Use /tokens/2fa flow manually for now.")]
    TwoFactorRequired,

    /// A success response lacked a field the command needs.
    #[error("{0}")]
    UnexpectedResponse(String),
}

impl NpmError {
    /// The API failure, if this is one.
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            NpmError::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ApiFailure> for NpmError {
    fn from(failure: ApiFailure) -> Self {
        NpmError::Api(Box::new(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FailureDetail;
    use crate::secrets::VaultAction;

    #[test]
    fn missing_value_messages() {
        assert_eq!(
            NpmError::MissingBaseUrl.to_string(),
            "Missing NPM base URL. Use --base-url or set NPM_BASE_URL."
        );
        assert_eq!(
            NpmError::MissingToken.to_string(),
            "Missing API token. Run `npmctl login` or set NPM_TOKEN."
        );
    }

    #[test]
    fn missing_secret_names_every_remedy() {
        let err = NpmError::MissingSecret {
            label: "Cloudflare API token",
            flag: "--cloudflare-api-token",
            env_var: "CLOUDFLARE_API_TOKEN",
            setup_command: "npmctl cf-token-set",
        };
        assert_eq!(
            err.to_string(),
            "Missing Cloudflare API token. Use --cloudflare-api-token, \
             set CLOUDFLARE_API_TOKEN, or run `npmctl cf-token-set`."
        );
    }

    #[test]
    fn secret_store_error_is_transparent() {
        let inner = SecretError::OperationFailed {
            action: VaultAction::Read,
            backend: "file",
            message: "permission denied".into(),
            hint: None,
        };
        let expected = inner.to_string();
        let err: NpmError = inner.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn api_failure_accessor() {
        let err: NpmError = ApiFailure {
            status: 404,
            method: "POST".into(),
            path: "/nginx/proxy-hosts".into(),
            message: "Host not found".into(),
            request_id: None,
            detail: FailureDetail::Hint,
        }
        .into();

        assert_eq!(err.api_failure().map(|f| f.status), Some(404));
        assert!(err.to_string().starts_with("API 404 POST /nginx/proxy-hosts: Host not found"));
        assert!(NpmError::MissingToken.api_failure().is_none());
    }
}
