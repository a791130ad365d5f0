// src/logging.rs
//! Tracing setup and the dev-only diagnostics gate.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "FEED_DEV_LOG";

/// Compact fmt subscriber filtered by `RUST_LOG`.
/// Uses `try_init`: when the runtime already installed a subscriber, that one wins.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("conflict_event_feed=info,ingest=info,classify=info,api=info,warn")
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

// Dev logging gate: FEED_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short stable id for a text, so logs can correlate articles without quoting them.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("Shelling hits Kharkiv");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("Shelling hits Kharkiv"));
        assert_ne!(a, anon_hash("Shelling hits Kyiv"));
    }

    #[serial_test::serial]
    #[test]
    fn dev_log_requires_flag() {
        std::env::remove_var(ENV_DEV_LOG);
        assert!(!dev_logging_enabled());
        std::env::set_var(ENV_DEV_LOG, "1");
        std::env::set_var("SHUTTLE_ENV", "local");
        assert!(dev_logging_enabled());
        std::env::remove_var("SHUTTLE_ENV");
        std::env::remove_var(ENV_DEV_LOG);
    }
}
