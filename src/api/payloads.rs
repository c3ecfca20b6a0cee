//! api::payloads
//!
//! Request bodies for the endpoints npmctl calls.

use std::fmt;

use clap::ValueEnum;
use serde_json::{json, Value};

/// Certificate key algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    #[default]
    Rsa,
    Ecdsa,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "rsa",
            KeyType::Ecdsa => "ecdsa",
        }
    }
}

/// Scheme used to reach the upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ForwardScheme {
    #[default]
    Http,
    Https,
}

impl ForwardScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardScheme::Http => "http",
            ForwardScheme::Https => "https",
        }
    }
}

/// Default DNS propagation wait, in seconds.
pub const DEFAULT_PROPAGATION_SECONDS: u32 = 30;

/// A Let's Encrypt certificate issued through a Cloudflare DNS challenge.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareCertificate {
    pub domain_names: Vec<String>,
    pub api_token: String,
    /// Defaults to the first domain.
    pub nice_name: Option<String>,
    pub propagation_seconds: u32,
    pub key_type: KeyType,
}

impl fmt::Debug for CloudflareCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareCertificate")
            .field("domain_names", &self.domain_names)
            .field("api_token", &"[REDACTED]")
            .field("nice_name", &self.nice_name)
            .field("propagation_seconds", &self.propagation_seconds)
            .field("key_type", &self.key_type)
            .finish()
    }
}

impl CloudflareCertificate {
    pub fn new(domain_names: Vec<String>, api_token: impl Into<String>) -> Self {
        Self {
            domain_names,
            api_token: api_token.into(),
            nice_name: None,
            propagation_seconds: DEFAULT_PROPAGATION_SECONDS,
            key_type: KeyType::default(),
        }
    }

    /// Body for `POST /nginx/certificates`.
    pub fn to_payload(&self) -> Value {
        let nice_name = self
            .nice_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.domain_names.first().cloned())
            .unwrap_or_default();

        json!({
            "provider": "letsencrypt",
            "nice_name": nice_name,
            "domain_names": self.domain_names,
            "meta": {
                "dns_challenge": true,
                "dns_provider": "cloudflare",
                "dns_provider_credentials": format!("dns_cloudflare_api_token = {}", self.api_token),
                "propagation_seconds": self.propagation_seconds,
                "key_type": self.key_type.as_str(),
            },
        })
    }
}

/// A proxy host routing domains to an upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyHost {
    pub domain_names: Vec<String>,
    pub forward_host: String,
    pub forward_port: u16,
    pub forward_scheme: ForwardScheme,
    pub certificate_id: Option<i64>,
    pub ssl_forced: bool,
    pub http2_support: bool,
    pub hsts_enabled: bool,
    pub hsts_subdomains: bool,
}

impl ProxyHost {
    /// A plain HTTP proxy host with every TLS option off.
    pub fn new(domain_names: Vec<String>, forward_host: impl Into<String>, forward_port: u16) -> Self {
        Self {
            domain_names,
            forward_host: forward_host.into(),
            forward_port,
            forward_scheme: ForwardScheme::default(),
            certificate_id: None,
            ssl_forced: false,
            http2_support: false,
            hsts_enabled: false,
            hsts_subdomains: false,
        }
    }

    /// Body for `POST /nginx/proxy-hosts`.
    ///
    /// Exploit blocking and websocket upgrades are always on, caching off.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "domain_names": self.domain_names,
            "forward_scheme": self.forward_scheme.as_str(),
            "forward_host": self.forward_host,
            "forward_port": self.forward_port,
            "ssl_forced": self.ssl_forced,
            "http2_support": self.http2_support,
            "hsts_enabled": self.hsts_enabled,
            "hsts_subdomains": self.hsts_subdomains,
            "block_exploits": true,
            "allow_websocket_upgrade": true,
            "caching_enabled": false,
            "enabled": true,
            "access_list_id": 0,
            "advanced_config": "",
            "locations": [],
        });
        if let (Some(id), Value::Object(map)) = (self.certificate_id, &mut payload) {
            map.insert("certificate_id".to_string(), json!(id));
        }
        payload
    }
}

/// Body for `POST /tokens`.
pub fn token_request(identity: &str, secret: &str, scope: &str) -> Value {
    json!({
        "identity": identity,
        "secret": secret,
        "scope": scope,
    })
}
