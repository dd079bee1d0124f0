//! Tracing configuration for debugging hook generation.
//!
//! Supports three output formats controlled by `TSHOOK_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Human-readable tree
//! TSHOOK_LOG=debug TSHOOK_LOG_FORMAT=tree tshook hooks.json
//!
//! # JSON (for tooling)
//! TSHOOK_LOG=debug TSHOOK_LOG_FORMAT=json tshook hooks.json
//!
//! # Fine-grained filtering
//! TSHOOK_LOG="tshook::builder=trace" tshook hooks.json
//! ```
//!
//! The subscriber is only initialised when `TSHOOK_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse from the `TSHOOK_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        match std::env::var("TSHOOK_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Build an `EnvFilter` from `TSHOOK_LOG`, falling back to `RUST_LOG`.
///
/// `TSHOOK_LOG` takes precedence when both are set. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `tshook::builder=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSHOOK_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        // RUST_LOG is set (caller already checked).  Use it as-is.
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TSHOOK_LOG` nor `RUST_LOG` is set.
///
/// All output goes to stderr so it never interferes with stdout
/// (`--print` writes the generated artifact there).
pub fn init_tracing() {
    let has_tshook_log = std::env::var("TSHOOK_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tshook_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();

    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
