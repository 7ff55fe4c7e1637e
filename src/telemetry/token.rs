//! The rotating access credential for outbound telemetry.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// An opaque, time-limited credential authorizing sends to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            issued_at: Utc::now(),
        }
    }

    /// The credential string placed in the `Authorization` header.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Source of fresh access credentials.
///
/// Token generation belongs to the deployment (the collector dictates the
/// scheme), so the renewal loop only depends on this seam.
pub trait TokenSource: Send + Sync {
    /// Mint a fresh credential to replace the current one.
    fn mint(&self) -> Result<AccessToken>;
}

/// A source that re-mints a fixed credential string.
///
/// Useful against collectors with long-lived pre-shared keys and as the CLI
/// default; real deployments inject their own signer.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn mint(&self) -> Result<AccessToken> {
        Ok(AccessToken::new(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_remints_same_value() {
        let source = StaticTokenSource::new("shared-key");
        let first = source.mint().unwrap();
        let second = source.mint().unwrap();

        assert_eq!(first.value(), "shared-key");
        assert_eq!(first.value(), second.value());
        // Re-minting still produces a fresh issue time.
        assert!(second.issued_at() >= first.issued_at());
    }

    #[test]
    fn test_custom_sources_rotate() {
        use std::sync::atomic::{AtomicU32, Ordering};

        struct CountingSource(AtomicU32);

        impl TokenSource for CountingSource {
            fn mint(&self) -> Result<AccessToken> {
                let n = self.0.fetch_add(1, Ordering::SeqCst);
                Ok(AccessToken::new(format!("token-{}", n)))
            }
        }

        let source = CountingSource(AtomicU32::new(0));
        assert_eq!(source.mint().unwrap().value(), "token-0");
        assert_eq!(source.mint().unwrap().value(), "token-1");
    }
}
