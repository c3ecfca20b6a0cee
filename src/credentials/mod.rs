//! credentials
//!
//! Layered resolution of the API base URL and token.
//!
//! # Precedence
//!
//! Each field is resolved independently; the first source with a
//! non-empty value wins:
//!
//! 1. Explicit command-line value
//! 2. Environment (`NPM_BASE_URL`, `NPM_TOKEN`)
//! 3. Login record in the secret store
//! 4. Legacy JSON config file
//!
//! The base URL and token may therefore come from different sources.
//!
//! # Secrets
//!
//! [`resolve_secret`] applies the shorter chain used for API secrets such
//! as the Cloudflare token: explicit value, then the secret store.

mod sources;

pub use sources::{EnvironmentSource, ExplicitSource, LegacyFileSource, StoredLoginSource};

use std::fmt;

use crate::config::Environment;
use crate::debug::DebugLog;
use crate::error::{NpmError, Result};
use crate::secrets::{SecretError, SecretStore, CF_TOKEN_KEY};

/// A named provider of base URL and token values.
pub trait CredentialSource {
    /// Human-readable source name for debug output.
    fn name(&self) -> &str;

    /// Base URL offered by this source.
    fn base_url(&self) -> Option<&str>;

    /// Token offered by this source.
    fn token(&self) -> Option<&str>;
}

/// The outcome of a resolution.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub base_url: String,
    pub token: Option<String>,
}

impl fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolves credentials from the standard source chain.
pub struct CredentialResolver<'a> {
    log: DebugLog,
    env: &'a Environment,
    store: std::result::Result<&'a SecretStore, &'a SecretError>,
}

impl<'a> CredentialResolver<'a> {
    /// Create a resolver.
    ///
    /// `store` is the outcome of opening the secret store; a store that
    /// failed to open only disables the stored-login source.
    pub fn new(
        log: DebugLog,
        env: &'a Environment,
        store: std::result::Result<&'a SecretStore, &'a SecretError>,
    ) -> Self {
        Self { log, env, store }
    }

    /// Resolve the base URL and token.
    ///
    /// # Errors
    ///
    /// - [`NpmError::MissingBaseUrl`] if no source has a base URL
    /// - [`NpmError::MissingToken`] if `require_token` and no source has a token
    pub fn resolve(
        &self,
        explicit_base_url: Option<&str>,
        explicit_token: Option<&str>,
        require_token: bool,
    ) -> Result<ResolvedCredentials> {
        let explicit = ExplicitSource::new(explicit_base_url, explicit_token);
        let environment = EnvironmentSource::new(self.env);
        let stored = StoredLoginSource::load(self.store, self.log);
        let legacy = LegacyFileSource::load(self.env, self.log);

        let sources: [&dyn CredentialSource; 4] = [&explicit, &environment, &stored, &legacy];
        resolve_with(&sources, require_token, self.log)
    }
}

/// Resolve credentials from an ordered list of sources.
pub fn resolve_with(
    sources: &[&dyn CredentialSource],
    require_token: bool,
    log: DebugLog,
) -> Result<ResolvedCredentials> {
    let (base_url, base_url_source) =
        first_value(sources, |s| s.base_url()).ok_or(NpmError::MissingBaseUrl)?;

    let token = first_value(sources, |s| s.token());
    if require_token && token.is_none() {
        return Err(NpmError::MissingToken);
    }

    log.log(format!("Using base URL: {} (from {})", base_url, base_url_source));
    match &token {
        Some((_, source)) => log.log(format!("Using token: yes (from {})", source)),
        None => log.log("Using token: no"),
    }

    Ok(ResolvedCredentials {
        base_url,
        token: token.map(|(value, _)| value),
    })
}

fn first_value<'s, F>(sources: &[&'s dyn CredentialSource], field: F) -> Option<(String, &'s str)>
where
    F: Fn(&'s dyn CredentialSource) -> Option<&'s str>,
{
    sources.iter().find_map(|&source| {
        field(source)
            .filter(|v| !v.is_empty())
            .map(|v| (v.to_string(), source.name()))
    })
}

/// A secret kept in the secret store, with the ways to supply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredSecret {
    pub key: &'static str,
    pub label: &'static str,
    pub flag: &'static str,
    pub env_var: &'static str,
    pub setup_command: &'static str,
}

/// The Cloudflare API token used for DNS challenges.
pub const CLOUDFLARE_TOKEN: StoredSecret = StoredSecret {
    key: CF_TOKEN_KEY,
    label: "Cloudflare API token",
    flag: "--cloudflare-api-token",
    env_var: crate::config::ENV_CLOUDFLARE_TOKEN,
    setup_command: "npmctl cf-token-set",
};

/// Resolve a secret: explicit value first, then the secret store.
///
/// Callers fold the secret's environment variable into `explicit`.
///
/// # Errors
///
/// - [`NpmError::SecretStore`] if the store is needed and unusable
/// - [`NpmError::MissingSecret`] if neither source has a value
pub fn resolve_secret(
    explicit: Option<&str>,
    secret: &StoredSecret,
    store: std::result::Result<&SecretStore, &SecretError>,
) -> Result<String> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    let store = store.map_err(|e| NpmError::SecretStore(e.clone()))?;
    match store.get(secret.key)? {
        Some(value) => Ok(value),
        None => Err(NpmError::MissingSecret {
            label: secret.label,
            flag: secret.flag,
            env_var: secret.env_var,
            setup_command: secret.setup_command,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{
        FailOn, LoginInfo, MemoryVault, LEGACY_SERVICE_NAME, LOGIN_INFO_KEY, SERVICE_NAME,
    };
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        home: TempDir,
        env: Environment,
        store: SecretStore,
    }

    impl Fixture {
        fn new(vault: MemoryVault) -> Self {
            let home = TempDir::new().expect("temp home");
            let env = Environment {
                home_dir: Some(home.path().to_path_buf()),
                ..Environment::default()
            };
            Self {
                home,
                env,
                store: SecretStore::new(Box::new(vault)),
            }
        }

        fn write_legacy(&self, content: &str) {
            let dir = self.home.path().join(".config/npm-cli");
            fs::create_dir_all(&dir).expect("create config dir");
            fs::write(dir.join("config.json"), content).expect("write legacy config");
        }

        fn resolve(
            &self,
            base_url: Option<&str>,
            token: Option<&str>,
            require_token: bool,
        ) -> Result<ResolvedCredentials> {
            CredentialResolver::new(DebugLog::disabled(), &self.env, Ok(&self.store))
                .resolve(base_url, token, require_token)
        }
    }

    fn vault_with_login(base_url: &str, token: &str) -> MemoryVault {
        let info = LoginInfo::new(base_url, token, None, "ops@example.com");
        MemoryVault::new().with_entry(
            SERVICE_NAME,
            LOGIN_INFO_KEY,
            &info.to_json().expect("serialize"),
        )
    }

    #[test]
    fn explicit_beats_everything() {
        let mut fx = Fixture::new(vault_with_login("http://stored/api", "stored-token"));
        fx.env.base_url = Some("http://env/api".into());
        fx.env.token = Some("env-token".into());
        fx.write_legacy(r#"{"base_url": "http://legacy/api", "token": "legacy-token"}"#);

        let creds = fx
            .resolve(Some("http://explicit/api"), Some("explicit-token"), true)
            .expect("resolve");
        assert_eq!(creds.base_url, "http://explicit/api");
        assert_eq!(creds.token.as_deref(), Some("explicit-token"));
    }

    #[test]
    fn environment_beats_stored_login() {
        let mut fx = Fixture::new(vault_with_login("http://stored/api", "stored-token"));
        fx.env.base_url = Some("http://env/api".into());
        fx.env.token = Some("env-token".into());

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://env/api");
        assert_eq!(creds.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn stored_login_beats_legacy_file() {
        let fx = Fixture::new(vault_with_login("http://stored/api", "stored-token"));
        fx.write_legacy(r#"{"base_url": "http://legacy/api", "token": "legacy-token"}"#);

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://stored/api");
        assert_eq!(creds.token.as_deref(), Some("stored-token"));
    }

    #[test]
    fn legacy_file_is_last_resort() {
        let fx = Fixture::new(MemoryVault::new());
        fx.write_legacy(r#"{"base_url": "http://legacy/api", "token": "legacy-token"}"#);

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://legacy/api");
        assert_eq!(creds.token.as_deref(), Some("legacy-token"));
    }

    #[test]
    fn fields_resolve_independently() {
        let mut fx = Fixture::new(vault_with_login("http://stored/api", "stored-token"));
        fx.env.base_url = Some("http://env/api".into());

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://env/api");
        assert_eq!(creds.token.as_deref(), Some("stored-token"));
    }

    #[test]
    fn legacy_login_namespace_is_consulted() {
        let info = LoginInfo::new("http://old/api", "old-token", None, "ops@example.com");
        let vault = MemoryVault::new().with_entry(
            LEGACY_SERVICE_NAME,
            LOGIN_INFO_KEY,
            &info.to_json().expect("serialize"),
        );
        let fx = Fixture::new(vault);

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://old/api");
    }

    #[test]
    fn override_path_for_legacy_file() {
        let mut fx = Fixture::new(MemoryVault::new());
        let custom = fx.home.path().join("custom.json");
        fs::write(&custom, r#"{"base_url": "http://custom/api"}"#).expect("write");
        fx.env.config_path = Some(custom.display().to_string());
        fx.write_legacy(r#"{"base_url": "http://legacy/api"}"#);

        let creds = fx.resolve(None, None, false).expect("resolve");
        assert_eq!(creds.base_url, "http://custom/api");
    }

    #[test]
    fn nothing_anywhere_is_missing_base_url() {
        let fx = Fixture::new(MemoryVault::new());
        assert!(matches!(
            fx.resolve(None, None, true),
            Err(NpmError::MissingBaseUrl)
        ));
    }

    #[test]
    fn missing_token_only_when_required() {
        let fx = Fixture::new(MemoryVault::new());

        assert!(matches!(
            fx.resolve(Some("http://explicit/api"), None, true),
            Err(NpmError::MissingToken)
        ));

        let creds = fx
            .resolve(Some("http://explicit/api"), None, false)
            .expect("resolve without token");
        assert_eq!(creds.token, None);
    }

    #[test]
    fn legacy_base_url_without_any_token() {
        let fx = Fixture::new(vault_with_login("", ""));
        fx.write_legacy(r#"{"base_url": "http://legacy/api"}"#);

        assert!(matches!(
            fx.resolve(Some(""), Some(""), true),
            Err(NpmError::MissingToken)
        ));

        let creds = fx.resolve(None, None, false).expect("resolve");
        assert_eq!(creds.base_url, "http://legacy/api");
        assert_eq!(creds.token, None);
    }

    #[test]
    fn empty_explicit_values_fall_through() {
        let mut fx = Fixture::new(MemoryVault::new());
        fx.env.base_url = Some("http://env/api".into());

        let creds = fx.resolve(Some(""), Some(""), false).expect("resolve");
        assert_eq!(creds.base_url, "http://env/api");
        assert_eq!(creds.token, None);
    }

    #[test]
    fn store_failure_falls_through_to_legacy() {
        let fx = Fixture::new(MemoryVault::new().fail_on(FailOn::Get("no dbus".into())));
        fx.write_legacy(r#"{"base_url": "http://legacy/api", "token": "legacy-token"}"#);

        let creds = fx.resolve(None, None, true).expect("resolve");
        assert_eq!(creds.base_url, "http://legacy/api");
    }

    #[test]
    fn unopened_store_falls_through() {
        let home = TempDir::new().expect("temp home");
        let env = Environment {
            base_url: Some("http://env/api".into()),
            token: Some("env-token".into()),
            home_dir: Some(home.path().to_path_buf()),
            ..Environment::default()
        };
        let unavailable = SecretError::Unavailable("keychain support not enabled".into());

        let creds = CredentialResolver::new(DebugLog::disabled(), &env, Err(&unavailable))
            .resolve(None, None, true)
            .expect("resolve");
        assert_eq!(creds.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn resolve_with_custom_order() {
        let env = Environment {
            base_url: Some("http://env/api".into()),
            ..Environment::default()
        };
        let explicit = ExplicitSource::new(Some("http://explicit/api"), None);
        let environment = EnvironmentSource::new(&env);

        let sources: [&dyn CredentialSource; 2] = [&environment, &explicit];
        let creds = resolve_with(&sources, false, DebugLog::disabled()).expect("resolve");
        assert_eq!(creds.base_url, "http://env/api");
    }

    #[test]
    fn debug_redacts_token() {
        let creds = ResolvedCredentials {
            base_url: "http://npm/api".into(),
            token: Some("very-secret-token".into()),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("very-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn secret_prefers_explicit_value() {
        let store = SecretStore::new(Box::new(
            MemoryVault::new().with_entry(SERVICE_NAME, CF_TOKEN_KEY, "stored-cf"),
        ));
        let value = resolve_secret(Some("explicit-cf"), &CLOUDFLARE_TOKEN, Ok(&store))
            .expect("resolve secret");
        assert_eq!(value, "explicit-cf");
    }

    #[test]
    fn secret_falls_back_to_store() {
        let store = SecretStore::new(Box::new(
            MemoryVault::new().with_entry(LEGACY_SERVICE_NAME, CF_TOKEN_KEY, "legacy-cf"),
        ));
        let value =
            resolve_secret(Some(""), &CLOUDFLARE_TOKEN, Ok(&store)).expect("resolve secret");
        assert_eq!(value, "legacy-cf");
    }

    #[test]
    fn secret_missing_everywhere() {
        let store = SecretStore::new(Box::new(MemoryVault::new()));
        let err = resolve_secret(None, &CLOUDFLARE_TOKEN, Ok(&store)).unwrap_err();
        assert!(matches!(err, NpmError::MissingSecret { .. }));
        let message = err.to_string();
        assert!(message.contains("--cloudflare-api-token"));
        assert!(message.contains("CLOUDFLARE_API_TOKEN"));
        assert!(message.contains("npmctl cf-token-set"));
    }

    #[test]
    fn secret_store_errors_surface() {
        let unavailable = SecretError::Unavailable("no backend".into());
        let err = resolve_secret(None, &CLOUDFLARE_TOKEN, Err(&unavailable)).unwrap_err();
        assert!(matches!(err, NpmError::SecretStore(_)));

        let ok = resolve_secret(Some("explicit"), &CLOUDFLARE_TOKEN, Err(&unavailable))
            .expect("explicit value needs no store");
        assert_eq!(ok, "explicit");
    }
}
