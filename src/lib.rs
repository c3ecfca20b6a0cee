//! npmctl - A command-line client for Nginx Proxy Manager
//!
//! npmctl logs in to the Nginx Proxy Manager REST API, keeps the issued
//! token and a Cloudflare API token in secure storage, and creates
//! DNS-challenge certificates and proxy hosts.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, runs handlers)
//! - [`api`] - HTTP request pipeline and endpoint payloads
//! - [`credentials`] - Layered base URL / token resolution
//! - [`secrets`] - Secure storage with legacy-namespace fallback
//! - [`config`] - Environment snapshot and legacy config files
//! - [`redact`] - Masking of sensitive values before logging
//! - [`debug`] - Request/response trace channel
//! - [`context`] - Per-invocation settings shared by every command
//! - [`error`] - Crate-wide error type
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. Secret values never reach stdout, stderr, or `Debug` output unmasked
//! 2. An authenticated request without a token fails before any network I/O
//! 3. The legacy secret namespace is read and cleaned up, never written

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod credentials;
pub mod debug;
pub mod error;
pub mod redact;
pub mod secrets;
pub mod ui;
