use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "kakeibo_core=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// A non-empty `RUST_LOG` replaces the crate's `info` default entirely. Calling this
/// after another subscriber was installed is a no-op.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = filter_from(env.as_deref());
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

/// Filter for the given `RUST_LOG` value, falling back to the default directive
/// when it is unset, blank, or unparsable.
fn filter_from(env: Option<&str>) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_uses_default_directive() {
        assert_eq!(filter_from(None).to_string(), DEFAULT_DIRECTIVE);
        assert_eq!(filter_from(Some("  ")).to_string(), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn env_directives_are_not_overridden() {
        let filter = filter_from(Some("kakeibo_core=debug")).to_string();
        assert!(filter.contains("kakeibo_core=debug"));
        assert!(!filter.contains("kakeibo_core=info"));
    }
}
