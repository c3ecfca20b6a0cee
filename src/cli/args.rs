//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Trace requests and responses (also `NPM_CLI_DEBUG=1`)
//! - `--no-interactive`: Never prompt
//! - `--quiet` / `-q`: Minimal output; implies `--no-interactive`

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::{ForwardScheme, KeyType, DEFAULT_PROPAGATION_SECONDS};

/// npmctl - CLI for managing Nginx Proxy Manager proxy hosts and certificates
#[derive(Parser, Debug)]
#[command(name = "npmctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose request/response debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether prompts are allowed.
    pub fn interactive(&self) -> bool {
        !(self.no_interactive || self.quiet)
    }
}

/// API endpoint and token overrides shared by API commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// API base URL (e.g. http://host:81/api)
    #[arg(long)]
    pub base_url: Option<String>,

    /// API token (JWT)
    #[arg(long)]
    pub token: Option<String>,
}

/// Certificate options shared by the certificate commands.
#[derive(Args, Debug, Clone)]
pub struct CertificateArgs {
    /// Cloudflare API token (falls back to CLOUDFLARE_API_TOKEN, then the stored token)
    #[arg(long)]
    pub cloudflare_api_token: Option<String>,

    /// DNS propagation wait in seconds
    #[arg(long, default_value_t = DEFAULT_PROPAGATION_SECONDS)]
    pub propagation_seconds: u32,

    /// Certificate key type
    #[arg(long, value_enum, default_value_t = KeyType::Rsa)]
    pub key_type: KeyType,
}

/// Upstream options shared by the proxy host commands.
#[derive(Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// Upstream host or IP
    #[arg(long)]
    pub forward_host: String,

    /// Upstream port (1-65535)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub forward_port: u16,

    /// Upstream scheme
    #[arg(long, value_enum, default_value_t = ForwardScheme::Http)]
    pub forward_scheme: ForwardScheme,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the API token in secure storage
    #[command(
        name = "login",
        after_help = "\
EXAMPLES:
    # Prompt for the password
    npmctl login --identity admin@example.com --base-url http://npm.local:81/api

    # Non-interactive
    npmctl login --identity admin@example.com --secret \"$NPM_PASSWORD\""
    )]
    Login {
        /// NPM user email
        #[arg(long)]
        identity: String,

        /// NPM password (prompted when omitted)
        #[arg(long)]
        secret: Option<String>,

        /// API base URL (e.g. http://host:81/api)
        #[arg(long)]
        base_url: Option<String>,

        /// Token scope
        #[arg(long, default_value = "user")]
        scope: String,
    },

    /// Show the stored login without revealing the token
    #[command(name = "login-status")]
    LoginStatus,

    /// Remove the stored login
    #[command(name = "logout")]
    Logout,

    /// Create a Let's Encrypt certificate using a Cloudflare DNS challenge
    #[command(name = "add-cert-cloudflare")]
    AddCertCloudflare {
        /// Domain (repeatable)
        #[arg(short = 'd', long = "domain", required = true)]
        domains: Vec<String>,

        /// Human-friendly certificate name (defaults to the first domain)
        #[arg(long)]
        nice_name: Option<String>,

        #[command(flatten)]
        certificate: CertificateArgs,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Create a proxy host
    #[command(name = "add-proxy-host")]
    AddProxyHost {
        /// Domain (repeatable)
        #[arg(short = 'd', long = "domain", required = true)]
        domains: Vec<String>,

        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Existing certificate ID
        #[arg(long)]
        certificate_id: Option<i64>,

        /// Force HTTPS redirect
        #[arg(long)]
        ssl_forced: bool,

        /// Enable HTTP/2
        #[arg(long)]
        http2_support: bool,

        /// Enable HSTS
        #[arg(long)]
        hsts_enabled: bool,

        /// Apply HSTS to subdomains
        #[arg(long)]
        hsts_subdomains: bool,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Create a Cloudflare DNS certificate, then a proxy host using it
    #[command(
        name = "add-proxy-with-cert",
        after_help = "\
The two steps are not atomic: if the proxy host cannot be created, the
certificate from step 1 remains and can be reused with
`npmctl add-proxy-host --certificate-id <ID>`."
    )]
    AddProxyWithCert {
        /// Domain (repeatable)
        #[arg(short = 'd', long = "domain", required = true)]
        domains: Vec<String>,

        #[command(flatten)]
        upstream: UpstreamArgs,

        #[command(flatten)]
        certificate: CertificateArgs,

        /// Do not force HTTPS redirect
        #[arg(long)]
        no_ssl_forced: bool,

        /// Do not enable HTTP/2
        #[arg(long)]
        no_http2_support: bool,

        /// Do not enable HSTS
        #[arg(long)]
        no_hsts_enabled: bool,

        /// Do not apply HSTS to subdomains
        #[arg(long)]
        no_hsts_subdomains: bool,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Store the Cloudflare API token in secure storage
    #[command(name = "cf-token-set")]
    CfTokenSet {
        /// Cloudflare API token (prompted with confirmation when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Delete the stored Cloudflare API token
    #[command(name = "cf-token-delete")]
    CfTokenDelete,

    /// Show whether a Cloudflare API token is stored
    #[command(name = "cf-token-status")]
    CfTokenStatus,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    npmctl completion bash > ~/.local/share/bash-completion/completions/npmctl

    # Zsh
    npmctl completion zsh > \"${fpath[1]}/_npmctl\"

    # Fish
    npmctl completion fish > ~/.config/fish/completions/npmctl.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
