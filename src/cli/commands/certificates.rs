//! cli::commands::certificates
//!
//! `add-cert-cloudflare`: issue a Let's Encrypt certificate through a
//! Cloudflare DNS challenge.

use anyhow::Result;

use crate::api::{CloudflareCertificate, CreatedResource};
use crate::cli::args::{ApiArgs, CertificateArgs};
use crate::config::Environment;
use crate::context::Context;
use crate::credentials::{resolve_secret, CLOUDFLARE_TOKEN};
use crate::secrets::{SecretError, SecretStore};
use crate::ui::output;

use super::{api_client, open_store};

/// Create a certificate for `domains`.
pub fn add_cert_cloudflare(
    ctx: &Context,
    env: &Environment,
    domains: Vec<String>,
    nice_name: Option<String>,
    certificate: &CertificateArgs,
    api: &ApiArgs,
) -> Result<()> {
    let store = open_store(env);
    let client = api_client(ctx, env, store.as_ref(), api)?;
    let request = CloudflareCertificate {
        nice_name,
        ..certificate_request(env, domains, certificate, store.as_ref())?
    };

    output::print(
        "Creating certificate via Cloudflare DNS challenge...",
        ctx.verbosity(),
    );
    let rt = tokio::runtime::Runtime::new()?;
    let payload = rt.block_on(client.create_cloudflare_certificate(&request))?;
    let created = CreatedResource::from_response(&payload);

    output::success("Certificate created successfully.", ctx.verbosity());
    output::print(format!("Certificate ID: {}", created.id_label()), ctx.verbosity());
    output::print(
        format!("Name: {}", output::or_unknown(created.nice_name.as_deref())),
        ctx.verbosity(),
    );
    output::print(
        format!("Domains: {}", output::format_domains(&created.domain_names)),
        ctx.verbosity(),
    );
    Ok(())
}

/// Build a certificate request, resolving the Cloudflare token.
///
/// Token order: `--cloudflare-api-token`, `CLOUDFLARE_API_TOKEN`, then the
/// stored token.
pub(super) fn certificate_request(
    env: &Environment,
    domains: Vec<String>,
    certificate: &CertificateArgs,
    store: std::result::Result<&SecretStore, &SecretError>,
) -> Result<CloudflareCertificate> {
    let explicit = certificate
        .cloudflare_api_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(env.cloudflare_api_token.as_deref());
    let api_token = resolve_secret(explicit, &CLOUDFLARE_TOKEN, store)?;

    Ok(CloudflareCertificate {
        propagation_seconds: certificate.propagation_seconds,
        key_type: certificate.key_type,
        ..CloudflareCertificate::new(domains, api_token)
    })
}
