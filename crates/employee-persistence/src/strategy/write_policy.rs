//! Cache write policy using enum dispatch.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use crate::error::Result;

/// How a failed cache write affects the operation that issued it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheWritePolicy {
    /// Surface the cache error to the caller
    #[default]
    FailFast,
    /// Log the cache error and carry on; the entry is simply not cached
    BestEffort,
}

impl CacheWritePolicy {
    /// Run a cache write for `key` according to the policy.
    ///
    /// # Errors
    ///
    /// Under `FailFast`, returns the cache error unchanged.
    pub async fn write<F>(self, key: &str, write: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        match write.await {
            Ok(()) => Ok(()),
            Err(e) => match self {
                Self::FailFast => {
                    tracing::error!(key, error = %e, "Failed to write to cache");
                    Err(e)
                }
                Self::BestEffort => {
                    tracing::warn!(key, error = %e, "Failed to write to cache, continuing uncached");
                    Ok(())
                }
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::BestEffort => "best-effort",
        }
    }
}

impl fmt::Display for CacheWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cache write policy '{0}', expected 'fail-fast' or 'best-effort'")]
pub struct ParsePolicyError(pub String);

impl FromStr for CacheWritePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            "best-effort" | "best_effort" | "besteffort" => Ok(Self::BestEffort),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}
