//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the secret store and resolves credentials
//! 2. Calls the API client or the secret store
//! 3. Formats and displays output via [`crate::ui::output`]
//!
//! # Async Commands
//!
//! Commands that talk to the API create a tokio runtime and block on the
//! request; everything else is synchronous.

mod auth;
mod certificates;
mod completion;
mod proxy_hosts;
mod secrets;

pub use auth::{login, login_status, logout};
pub use certificates::add_cert_cloudflare;
pub use completion::completion;
pub use proxy_hosts::{add_proxy_host, add_proxy_with_cert};
pub use secrets::{cf_token_delete, cf_token_set, cf_token_status};

use anyhow::Result;

use crate::api::{ApiClient, ProxyHost};
use crate::config::Environment;
use crate::context::Context;
use crate::credentials::CredentialResolver;
use crate::secrets::{SecretError, SecretStore};

use super::args::{ApiArgs, Command};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context, env: &Environment) -> Result<()> {
    match command {
        Command::Login {
            identity,
            secret,
            base_url,
            scope,
        } => login(
            ctx,
            env,
            &identity,
            secret.as_deref(),
            base_url.as_deref(),
            &scope,
        ),
        Command::LoginStatus => login_status(ctx, env),
        Command::Logout => logout(ctx, env),
        Command::AddCertCloudflare {
            domains,
            nice_name,
            certificate,
            api,
        } => add_cert_cloudflare(ctx, env, domains, nice_name, &certificate, &api),
        Command::AddProxyHost {
            domains,
            upstream,
            certificate_id,
            ssl_forced,
            http2_support,
            hsts_enabled,
            hsts_subdomains,
            api,
        } => {
            let host = ProxyHost {
                forward_scheme: upstream.forward_scheme,
                certificate_id,
                ssl_forced,
                http2_support,
                hsts_enabled,
                hsts_subdomains,
                ..ProxyHost::new(domains, upstream.forward_host, upstream.forward_port)
            };
            add_proxy_host(ctx, env, host, &api)
        }
        Command::AddProxyWithCert {
            domains,
            upstream,
            certificate,
            no_ssl_forced,
            no_http2_support,
            no_hsts_enabled,
            no_hsts_subdomains,
            api,
        } => {
            let host = ProxyHost {
                forward_scheme: upstream.forward_scheme,
                ssl_forced: !no_ssl_forced,
                http2_support: !no_http2_support,
                hsts_enabled: !no_hsts_enabled,
                hsts_subdomains: !no_hsts_subdomains,
                ..ProxyHost::new(domains, upstream.forward_host, upstream.forward_port)
            };
            add_proxy_with_cert(ctx, env, host, &certificate, &api)
        }
        Command::CfTokenSet { token } => cf_token_set(ctx, env, token.as_deref()),
        Command::CfTokenDelete => cf_token_delete(ctx, env),
        Command::CfTokenStatus => cf_token_status(ctx, env),
        Command::Completion { shell } => completion(shell),
    }
}

/// Open the configured secret store, keeping a failure for later.
fn open_store(env: &Environment) -> std::result::Result<SecretStore, SecretError> {
    crate::secrets::open_store_in(env.secret_provider(), env.home_dir.as_deref())
}

/// Resolve credentials and build an API client.
fn api_client(
    ctx: &Context,
    env: &Environment,
    store: std::result::Result<&SecretStore, &SecretError>,
    api: &ApiArgs,
) -> Result<ApiClient> {
    let credentials = CredentialResolver::new(ctx.log(), env, store).resolve(
        api.base_url.as_deref(),
        api.token.as_deref(),
        true,
    )?;
    Ok(ApiClient::from_credentials(credentials, ctx.log())?)
}
