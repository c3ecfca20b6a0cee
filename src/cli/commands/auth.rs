//! cli::commands::auth
//!
//! Login management: `login`, `login-status`, `logout`.
//!
//! # Security
//!
//! - The token is written to secure storage as part of one login record
//! - The token is NEVER printed, not even in `login-status`
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for the password)
//! npmctl login --identity admin@example.com --base-url http://npm.local:81/api
//!
//! # Check status
//! npmctl login-status
//!
//! # Remove stored login
//! npmctl logout
//! ```

use anyhow::{bail, Context as _, Result};

use crate::api::{ApiClient, TokenGrant};
use crate::config::Environment;
use crate::context::Context;
use crate::credentials::CredentialResolver;
use crate::secrets::LoginInfo;
use crate::ui::output;
use crate::ui::prompts::{self, PromptError};

use super::open_store;

/// Log in and store the issued token.
///
/// The base URL is resolved like any other command, but no token is
/// required or sent.
pub fn login(
    ctx: &Context,
    env: &Environment,
    identity: &str,
    secret: Option<&str>,
    base_url: Option<&str>,
    scope: &str,
) -> Result<()> {
    let store = open_store(env);
    let credentials =
        CredentialResolver::new(ctx.log(), env, store.as_ref()).resolve(base_url, None, false)?;

    let secret = get_secret(ctx, secret)?;

    let client = ApiClient::new(credentials.base_url, None, ctx.log())?;
    let rt = tokio::runtime::Runtime::new()?;
    let payload = rt.block_on(client.request_token(identity, &secret, scope))?;
    let grant = TokenGrant::from_response(&payload)?;

    let store = store.context("Failed to initialize secret store")?;
    let login = LoginInfo::new(client.base_url(), grant.token, grant.expires, identity);
    store.save_login_info(&login)?;

    output::success(
        format!("Login successful. Token saved in {} storage.", store.backend()),
        ctx.verbosity(),
    );
    if let Some(expires) = login.expires.as_deref() {
        output::print(format!("Token expires: {}", expires), ctx.verbosity());
    }
    Ok(())
}

/// Show the stored login.
pub fn login_status(ctx: &Context, env: &Environment) -> Result<()> {
    let store = open_store(env).context("Failed to initialize secret store")?;
    let login = store.login_info()?;

    if ctx.quiet {
        // Machine-readable output
        println!("{}", if login.is_some() { "logged_in" } else { "not_logged_in" });
        return Ok(());
    }

    match login {
        None => {
            println!("No stored login found in {} storage.", store.backend());
            println!("Run 'npmctl login' to log in.");
        }
        Some(login) => {
            // Note: the token is intentionally never printed
            println!("Stored login found in {} storage.", store.backend());
            println!("Identity: {}", output::or_unknown(Some(login.identity.as_str())));
            println!("Base URL: {}", output::or_unknown(Some(login.base_url.as_str())));
            println!("Token expires: {}", output::or_unknown(login.expires.as_deref()));
        }
    }
    Ok(())
}

/// Remove the stored login from both namespaces.
pub fn logout(ctx: &Context, env: &Environment) -> Result<()> {
    let store = open_store(env).context("Failed to initialize secret store")?;
    store.clear_login_info()?;

    output::success(
        format!("Stored login removed from {} storage.", store.backend()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Get the password from the argument or an interactive prompt.
fn get_secret(ctx: &Context, secret: Option<&str>) -> Result<String> {
    if let Some(s) = secret {
        return Ok(s.to_string());
    }

    match prompts::password("Password", ctx.interactive) {
        Ok(s) => Ok(s),
        Err(PromptError::NotInteractive) => {
            bail!("Password required. Use --secret <PASSWORD> or run interactively.")
        }
        Err(PromptError::Cancelled) => bail!("Password cannot be empty."),
        Err(e) => Err(e).context("Failed to read password"),
    }
}
