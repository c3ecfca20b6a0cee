//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Masked prompts for passwords and tokens
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All terminal output and prompts go through this module so that quiet
//! and non-interactive modes are handled in one place.

pub mod output;
pub mod prompts;
