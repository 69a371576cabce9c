//! Provider registration module.
//!
//! This module defines the bucket operations every cloud provider implements
//! and registers the available providers with the registry.

pub mod aws;
pub mod gcp;

use std::fmt;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::registry::ProviderRegistry;
use crate::request::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    Gcp,
}

impl Provider {
    /// Human-readable display name for the provider.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Gcp => "GCP",
        }
    }

    /// Short lowercase identifier for the provider.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Why a provider operation did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing credentials, region, project or credentials file.
    Configuration,
    /// The cloud provider rejected the request or could not be reached.
    Remote,
    /// The unit never produced a result (no client registered, or it panicked).
    Aborted,
}

/// Result of a single provider operation.
///
/// Providers report their own diagnostics on the console; the outcome only
/// tells the dispatcher whether the unit succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(FailureKind),
}

impl Outcome {
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Bucket operations of a single cloud provider.
///
/// Implementations never return errors: every failure is reported on the
/// console and folded into the returned [`Outcome`].
#[async_trait]
pub trait BucketProvider: Send + Sync {
    /// The cloud provider this client talks to.
    fn provider(&self) -> Provider;

    async fn create_bucket(&self, name: &str) -> Outcome;

    async fn delete_bucket(&self, name: &str) -> Outcome;

    /// Run the operation selected by `mode`.
    async fn run(&self, mode: Mode, name: &str) -> Outcome {
        match mode {
            Mode::Create => self.create_bucket(name).await,
            Mode::Delete => self.delete_bucket(name).await,
        }
    }
}

/// Register all providers with the given registry.
pub fn register_all(registry: &mut ProviderRegistry, config: &AppConfig) {
    registry.register(aws::S3Buckets);
    registry.register(gcp::GcsBuckets::new(config.gcp.clone()));
}
