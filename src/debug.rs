//! debug
//!
//! Request/response trace channel.
//!
//! # Design
//!
//! Whether traces are emitted is decided once at startup (`--debug` or
//! `NPM_CLI_DEBUG`) and carried by value inside [`crate::context::Context`].
//! Components receive a [`DebugLog`] at construction instead of consulting
//! process-wide state.
//!
//! Payloads are passed through [`preview`] before logging so a large
//! response body cannot flood the terminal.

use std::fmt::Display;

use serde_json::Value;

use crate::ui::output;

/// Default number of characters kept by [`preview`].
pub const DEFAULT_PREVIEW_LIMIT: usize = 1600;

/// Debug trace sink. A no-op unless enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugLog {
    enabled: bool,
}

impl DebugLog {
    /// Create a log with tracing on or off.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A log that never emits anything.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Whether traces are emitted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit a `[debug]` line on stderr when enabled.
    pub fn log(&self, message: impl Display) {
        if self.enabled {
            output::debug(message);
        }
    }
}

/// Render a value for logging, truncated to `limit` characters.
///
/// Objects and arrays are pretty-printed with two-space indentation,
/// strings are rendered verbatim, other scalars as their JSON text. When
/// the rendered text exceeds `limit` characters the remainder is replaced
/// by `... [truncated N chars]`.
pub fn preview(value: &Value, limit: usize) -> String {
    let text = to_text(value);
    let total = text.chars().count();
    if total <= limit {
        return text;
    }

    let kept: String = text.chars().take(limit).collect();
    format!("{}... [truncated {} chars]", kept, total - limit)
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
