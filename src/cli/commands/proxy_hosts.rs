//! cli::commands::proxy_hosts
//!
//! `add-proxy-host` and `add-proxy-with-cert`.
//!
//! # Partial Failure
//!
//! `add-proxy-with-cert` is two independent API calls. When the second
//! one fails, the certificate from the first stays on the server; the
//! command says so and names the id to reuse.

use anyhow::Result;

use crate::api::{ApiClient, CreatedResource, ProxyHost};
use crate::cli::args::{ApiArgs, CertificateArgs};
use crate::config::Environment;
use crate::context::Context;
use crate::error::NpmError;
use crate::ui::output;

use super::certificates::certificate_request;
use super::{api_client, open_store};

/// Create a proxy host.
pub fn add_proxy_host(ctx: &Context, env: &Environment, host: ProxyHost, api: &ApiArgs) -> Result<()> {
    let store = open_store(env);
    let client = api_client(ctx, env, store.as_ref(), api)?;

    output::print("Creating proxy host...", ctx.verbosity());
    let rt = tokio::runtime::Runtime::new()?;
    let payload = rt.block_on(client.create_proxy_host(&host))?;
    let created = CreatedResource::from_response(&payload);

    output::success("Proxy host created successfully.", ctx.verbosity());
    output::print(format!("Host ID: {}", created.id_label()), ctx.verbosity());
    output::print(
        format!("Domains: {}", output::format_domains(&created.domain_names)),
        ctx.verbosity(),
    );
    Ok(())
}

/// Create a certificate for the host's domains, then the host using it.
pub fn add_proxy_with_cert(
    ctx: &Context,
    env: &Environment,
    host: ProxyHost,
    certificate: &CertificateArgs,
    api: &ApiArgs,
) -> Result<()> {
    let store = open_store(env);
    let client = api_client(ctx, env, store.as_ref(), api)?;
    let request = certificate_request(env, host.domain_names.clone(), certificate, store.as_ref())?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        output::print(
            "Step 1/2: Creating certificate via Cloudflare DNS challenge...",
            ctx.verbosity(),
        );
        let payload = client.create_cloudflare_certificate(&request).await?;
        let certificate_id = certificate_id(&payload)?;
        output::print(
            format!("Certificate created (id={}).", certificate_id),
            ctx.verbosity(),
        );

        output::print(
            "Step 2/2: Creating proxy host with that certificate...",
            ctx.verbosity(),
        );
        let created = create_host_with_certificate(&client, host, certificate_id)
            .await
            .inspect_err(|_| {
                output::warn(
                    format!(
                        "Certificate {id} was created but the proxy host was not. \
                         Reuse it with `npmctl add-proxy-host --certificate-id {id}`.",
                        id = certificate_id
                    ),
                    ctx.verbosity(),
                )
            })?;

        output::success(
            "Certificate and proxy host created successfully.",
            ctx.verbosity(),
        );
        output::print(format!("Certificate ID: {}", certificate_id), ctx.verbosity());
        output::print(format!("Proxy Host ID: {}", created.id_label()), ctx.verbosity());
        output::print(
            format!("Domains: {}", output::format_domains(&created.domain_names)),
            ctx.verbosity(),
        );
        Ok::<(), anyhow::Error>(())
    })
}

async fn create_host_with_certificate(
    client: &ApiClient,
    host: ProxyHost,
    certificate_id: i64,
) -> Result<CreatedResource, NpmError> {
    let host = ProxyHost {
        certificate_id: Some(certificate_id),
        ..host
    };
    let payload = client.create_proxy_host(&host).await?;
    Ok(CreatedResource::from_response(&payload))
}

/// The id of a freshly created certificate.
fn certificate_id(payload: &serde_json::Value) -> Result<i64, NpmError> {
    CreatedResource::from_response(payload)
        .numeric_id()
        .ok_or_else(|| {
            NpmError::UnexpectedResponse(
                "Certificate creation succeeded but no certificate id was returned.".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::DebugLog;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn certificate_id_required() {
        assert_eq!(certificate_id(&json!({"id": 9})).expect("id"), 9);

        let err = certificate_id(&json!({"nice_name": "x"})).unwrap_err();
        assert!(matches!(err, NpmError::UnexpectedResponse(_)));
        assert!(err.to_string().contains("no certificate id"));
    }

    #[tokio::test]
    async fn host_references_certificate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nginx/proxy-hosts"))
            .and(body_partial_json(json!({
                "certificate_id": 9,
                "ssl_forced": true,
                "domain_names": ["app.example.com"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 21,
                "domain_names": ["app.example.com"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(
            format!("{}/api", server.uri()),
            Some("tok".into()),
            DebugLog::disabled(),
        )
        .expect("build client");
        let host = ProxyHost {
            ssl_forced: true,
            ..ProxyHost::new(vec!["app.example.com".into()], "10.0.0.5", 8080)
        };

        let created = create_host_with_certificate(&client, host, 9)
            .await
            .expect("create host");
        assert_eq!(created.id_label(), "21");
    }
}
