//! Validated bucket request built from the command line.
//!
//! The parsed [`Args`] are checked once and turned into an immutable
//! [`BucketRequest`] that the dispatcher receives by reference.

use std::fmt;

use crate::cli::Args;
use crate::provider::Provider;

/// The action to perform on the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Delete,
}

impl Mode {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Flag combinations rejected before any provider is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    BothModes,
    NoMode,
    MissingBucketName,
    NoProvider,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BothModes => write!(f, "choose exactly one of create or delete (--create, --delete)"),
            Self::NoMode => write!(f, "must choose create or delete (--create or --delete)"),
            Self::MissingBucketName => write!(f, "bucket name is required (--bucketname)"),
            Self::NoProvider => write!(f, "choose at least one provider: --aws or --gcp"),
        }
    }
}

impl std::error::Error for UsageError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRequest {
    pub mode: Mode,
    /// Selected providers, AWS first.
    pub providers: Vec<Provider>,
    pub bucket: String,
}

impl TryFrom<&Args> for BucketRequest {
    type Error = UsageError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mode = match (args.create, args.delete) {
            (true, true) => return Err(UsageError::BothModes),
            (false, false) => return Err(UsageError::NoMode),
            (true, false) => Mode::Create,
            (false, true) => Mode::Delete,
        };

        if args.bucket_name.is_empty() {
            return Err(UsageError::MissingBucketName);
        }

        let providers: Vec<Provider> = [(args.aws, Provider::Aws), (args.gcp, Provider::Gcp)]
            .into_iter()
            .filter_map(|(selected, provider)| selected.then_some(provider))
            .collect();
        if providers.is_empty() {
            return Err(UsageError::NoProvider);
        }

        Ok(Self {
            mode,
            providers,
            bucket: args.bucket_name.clone(),
        })
    }
}
