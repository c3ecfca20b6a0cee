//! cli::commands::secrets
//!
//! Cloudflare API token management: `cf-token-set`, `cf-token-delete`,
//! `cf-token-status`.
//!
//! # Security
//!
//! The token is NEVER printed; status only reports whether one is stored.

use anyhow::{bail, Context as _, Result};

use crate::config::Environment;
use crate::context::Context;
use crate::credentials::CLOUDFLARE_TOKEN;
use crate::secrets::SecretStore;
use crate::ui::output;
use crate::ui::prompts::{self, PromptError};

use super::open_store;

/// Store the Cloudflare API token.
pub fn cf_token_set(ctx: &Context, env: &Environment, token: Option<&str>) -> Result<()> {
    let token = get_token(ctx, token)?;
    let store = open_store(env).context("Failed to initialize secret store")?;
    store.set(CLOUDFLARE_TOKEN.key, &token)?;

    output::success(
        format!("Cloudflare token saved in {} storage.", store.backend()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Delete the stored Cloudflare API token from both namespaces.
pub fn cf_token_delete(ctx: &Context, env: &Environment) -> Result<()> {
    let store = open_store(env).context("Failed to initialize secret store")?;
    store.delete(CLOUDFLARE_TOKEN.key)?;

    output::success(
        format!("Cloudflare token deleted from {} storage.", store.backend()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Report whether a Cloudflare API token is stored.
pub fn cf_token_status(ctx: &Context, env: &Environment) -> Result<()> {
    let store = open_store(env).context("Failed to initialize secret store")?;
    show_status(&store, ctx.quiet)
}

fn show_status(store: &SecretStore, quiet: bool) -> Result<()> {
    let exists = store.exists(CLOUDFLARE_TOKEN.key)?;

    if quiet {
        // Machine-readable output
        println!("{}", if exists { "stored" } else { "not_stored" });
    } else if exists {
        println!("Cloudflare token is stored in {} storage.", store.backend());
    } else {
        println!("No Cloudflare token stored in {} storage.", store.backend());
        println!("Run 'npmctl cf-token-set' to store one.");
    }
    Ok(())
}

/// Get the token from the argument or a confirmed interactive prompt.
fn get_token(ctx: &Context, token: Option<&str>) -> Result<String> {
    let token = match token {
        Some(t) => t.to_string(),
        None => match prompts::password_confirmed("Cloudflare API token", ctx.interactive) {
            Ok(t) => t,
            Err(PromptError::NotInteractive) => {
                bail!("Token required. Use --token <TOKEN> or run interactively.")
            }
            Err(PromptError::Mismatch) => bail!("The two entries did not match."),
            Err(PromptError::Cancelled) => String::new(),
            Err(e) => return Err(e).context("Failed to read token"),
        },
    };

    if token.trim().is_empty() {
        bail!("Cloudflare API token cannot be empty.");
    }
    Ok(token)
}
