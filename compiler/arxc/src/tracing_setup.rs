//! Tracing subscriber setup.
//!
//! The compiler crates only emit `tracing` events. The binary calls [`init`]
//! once at startup, which installs a subscriber when a filter is configured:
//!
//! - `ARX_LOG=arx_lower=trace` (falls back to `RUST_LOG` when unset)
//! - `ARX_LOG_TREE=1` prints spans as an indented tree instead of flat lines
//!
//! Logs go to stderr so they never mix with `--show-*` output.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_VAR: &str = "ARX_LOG";
pub const TREE_VAR: &str = "ARX_LOG_TREE";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let directives = filter_directives(
            std::env::var(LOG_VAR).ok(),
            std::env::var("RUST_LOG").ok(),
        );
        let Some(directives) = directives else {
            return;
        };
        let filter = match EnvFilter::try_new(&directives) {
            Ok(filter) => filter,
            Err(error) => {
                eprintln!("warning: ignoring invalid {LOG_VAR} filter `{directives}`: {error}");
                return;
            }
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = if tree_requested(std::env::var(TREE_VAR).ok().as_deref()) {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        if let Err(error) = installed {
            eprintln!("warning: could not install tracing subscriber: {error}");
        }
    });
}

/// `ARX_LOG` wins over `RUST_LOG`; blank values count as unset.
fn filter_directives(arx_log: Option<String>, rust_log: Option<String>) -> Option<String> {
    arx_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
}

fn tree_requested(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arx_log_takes_precedence() {
        assert_eq!(
            filter_directives(Some("arx_lower=trace".into()), Some("debug".into())),
            Some("arx_lower=trace".to_owned())
        );
        assert_eq!(
            filter_directives(None, Some("debug".into())),
            Some("debug".to_owned())
        );
        assert_eq!(
            filter_directives(Some("  ".into()), Some("info".into())),
            Some("info".to_owned())
        );
        assert_eq!(filter_directives(None, None), None);
    }

    #[test]
    fn test_tree_flag() {
        assert!(tree_requested(Some("1")));
        assert!(!tree_requested(Some("0")));
        assert!(!tree_requested(None));
    }
}
