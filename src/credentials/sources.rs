//! credentials::sources
//!
//! The four credential sources, in resolution order.

use crate::config::{Environment, LegacyConfig};
use crate::debug::DebugLog;
use crate::secrets::{LoginInfo, SecretError, SecretStore};

use super::CredentialSource;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Values passed on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitSource<'a> {
    base_url: Option<&'a str>,
    token: Option<&'a str>,
}

impl<'a> ExplicitSource<'a> {
    pub fn new(base_url: Option<&'a str>, token: Option<&'a str>) -> Self {
        Self { base_url, token }
    }
}

impl CredentialSource for ExplicitSource<'_> {
    fn name(&self) -> &str {
        "command line"
    }

    fn base_url(&self) -> Option<&str> {
        non_empty(self.base_url)
    }

    fn token(&self) -> Option<&str> {
        non_empty(self.token)
    }
}

/// `NPM_BASE_URL` and `NPM_TOKEN`.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentSource<'a> {
    env: &'a Environment,
}

impl<'a> EnvironmentSource<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }
}

impl CredentialSource for EnvironmentSource<'_> {
    fn name(&self) -> &str {
        "environment"
    }

    fn base_url(&self) -> Option<&str> {
        non_empty(self.env.base_url.as_deref())
    }

    fn token(&self) -> Option<&str> {
        non_empty(self.env.token.as_deref())
    }
}

/// The login record saved by `npmctl login`.
#[derive(Debug, Clone, Default)]
pub struct StoredLoginSource {
    login: Option<LoginInfo>,
}

impl StoredLoginSource {
    /// Read the login record.
    ///
    /// A store that could not be opened, or a failed read, is logged and
    /// yields an empty source.
    pub fn load(store: Result<&SecretStore, &SecretError>, log: DebugLog) -> Self {
        let lookup = match store {
            Ok(store) => store.login_info(),
            Err(e) => Err(e.clone()),
        };
        match lookup {
            Ok(login) => Self { login },
            Err(e) => {
                log.log(format!("Secret store login lookup skipped: {}", e));
                Self::default()
            }
        }
    }
}

impl CredentialSource for StoredLoginSource {
    fn name(&self) -> &str {
        "stored login"
    }

    fn base_url(&self) -> Option<&str> {
        non_empty(self.login.as_ref().map(|l| l.base_url.as_str()))
    }

    fn token(&self) -> Option<&str> {
        non_empty(self.login.as_ref().map(|l| l.token.as_str()))
    }
}

/// JSON config written by earlier releases.
#[derive(Debug, Clone, Default)]
pub struct LegacyFileSource {
    config: Option<LegacyConfig>,
}

impl LegacyFileSource {
    /// Read the first usable legacy config of the environment.
    pub fn load(env: &Environment, log: DebugLog) -> Self {
        let config = LegacyConfig::load_first(&env.legacy_config_paths());
        if let Some(config) = &config {
            log.log(format!("Legacy config found: {}", config.path.display()));
        }
        Self { config }
    }
}

impl CredentialSource for LegacyFileSource {
    fn name(&self) -> &str {
        "legacy config file"
    }

    fn base_url(&self) -> Option<&str> {
        non_empty(self.config.as_ref().and_then(|c| c.base_url.as_deref()))
    }

    fn token(&self) -> Option<&str> {
        non_empty(self.config.as_ref().and_then(|c| c.token.as_deref()))
    }
}
