//! S3 buckets through the AWS SDK.
//!
//! Credentials and region come from the SDK's default chain: environment
//! variables, shared config/credentials files, SSO, and instance metadata.

pub mod error;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::{info, warn};

use crate::provider::aws::error::{SdkFailure, credential_hints, region_hints};
use crate::provider::{BucketProvider, FailureKind, Outcome, Provider};
use crate::report::Diagnostic;
use crate::request::Mode;

/// S3 rejects a location constraint naming the default region.
const DEFAULT_REGION: &str = "us-east-1";

/// Bucket operations on Amazon S3.
pub struct S3Buckets;

/// Load the default configuration and check that credentials and a region
/// are available before any request is sent.
async fn load_config() -> Result<(SdkConfig, Region), Diagnostic> {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

    let Some(credentials) = config.credentials_provider() else {
        return Err(Diagnostic::failure("No AWS credentials provider configured")
            .hints(credential_hints()));
    };
    if let Err(err) = credentials.provide_credentials().await {
        return Err(
            Diagnostic::failure(format!("Failed to load AWS credentials: {err}"))
                .hints(credential_hints()),
        );
    }

    let Some(region) = config.region().cloned() else {
        return Err(Diagnostic::failure("AWS region not configured").hints(region_hints()));
    };

    Ok((config, region))
}

/// Build the create configuration for regions other than `us-east-1`.
fn location_constraint(region: &Region) -> Option<CreateBucketConfiguration> {
    let region = region.as_ref();
    (region != DEFAULT_REGION).then(|| {
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build()
    })
}

impl S3Buckets {
    async fn connect(mode: Mode) -> Option<(Client, Region)> {
        match load_config().await {
            Ok((config, region)) => Some((Client::new(&config), region)),
            Err(diagnostic) => {
                warn!(provider = "aws", %mode, reason = diagnostic.headline(), "AWS configuration unusable");
                diagnostic.print();
                None
            }
        }
    }

    fn report_failure(mode: Mode, bucket: &str, failure: &SdkFailure) -> Outcome {
        let category = failure.classify(mode);
        warn!(
            provider = "aws",
            %mode,
            bucket,
            ?category,
            code = failure.code.as_deref().unwrap_or("-"),
            error = %failure.message,
            "S3 request failed"
        );
        category.diagnostic(mode, bucket, &failure.message).print();
        Outcome::Failed(FailureKind::Remote)
    }
}

#[async_trait]
impl BucketProvider for S3Buckets {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    async fn create_bucket(&self, name: &str) -> Outcome {
        let Some((client, region)) = Self::connect(Mode::Create).await else {
            return Outcome::Failed(FailureKind::Configuration);
        };
        info!(provider = "aws", bucket = name, region = %region, "Creating S3 bucket");

        let result = client
            .create_bucket()
            .bucket(name)
            .set_create_bucket_configuration(location_constraint(&region))
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(provider = "aws", bucket = name, "S3 bucket created");
                Diagnostic::success(format!("S3 bucket created: {name}")).print();
                Outcome::Succeeded
            }
            Err(err) => Self::report_failure(Mode::Create, name, &SdkFailure::from_sdk(&err)),
        }
    }

    async fn delete_bucket(&self, name: &str) -> Outcome {
        let Some((client, region)) = Self::connect(Mode::Delete).await else {
            return Outcome::Failed(FailureKind::Configuration);
        };
        info!(provider = "aws", bucket = name, region = %region, "Deleting S3 bucket");

        match client.delete_bucket().bucket(name).send().await {
            Ok(_) => {
                info!(provider = "aws", bucket = name, "S3 bucket deleted");
                Diagnostic::success(format!("S3 bucket deleted: {name}")).print();
                Outcome::Succeeded
            }
            Err(err) => Self::report_failure(Mode::Delete, name, &SdkFailure::from_sdk(&err)),
        }
    }
}
