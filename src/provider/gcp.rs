//! Cloud Storage buckets through the Google Cloud client libraries.
//!
//! Unlike AWS, GCP needs an explicit project and a service account key file;
//! both are checked before a client is built.

pub mod config;
pub mod error;

use async_trait::async_trait;
use google_cloud_auth::credentials::service_account;
use google_cloud_storage::client::StorageControl;
use google_cloud_storage::model::Bucket;
use tracing::{info, warn};

use crate::config::GcpConfig;
use crate::provider::gcp::config::{GcpSettings, load_credentials_json};
use crate::provider::gcp::error::{ApiFailure, ConnectFailure};
use crate::provider::{BucketProvider, FailureKind, Outcome, Provider};
use crate::report::Diagnostic;
use crate::request::Mode;

/// Bucket operations on Google Cloud Storage.
pub struct GcsBuckets {
    config: GcpConfig,
}

impl GcsBuckets {
    pub const fn new(config: GcpConfig) -> Self {
        Self { config }
    }

    fn settings(&self, mode: Mode) -> Option<GcpSettings> {
        match GcpSettings::resolve(&self.config) {
            Ok(settings) => Some(settings),
            Err(diagnostic) => {
                warn!(provider = "gcp", %mode, reason = diagnostic.headline(), "GCP configuration unusable");
                diagnostic.print();
                None
            }
        }
    }

    /// Build a control-plane client authenticated with the service account key.
    async fn connect(settings: &GcpSettings) -> color_eyre::Result<StorageControl> {
        let key = load_credentials_json(&settings.credential_file)?;
        let credentials = service_account::Builder::new(key)
            .build()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to build credentials: {}", e))?;

        let client = StorageControl::builder()
            .with_credentials(credentials)
            .build()
            .await?;
        Ok(client)
    }

    /// Resolve settings and build a client, reporting any failure.
    async fn open(&self, mode: Mode) -> Result<(StorageControl, GcpSettings), Outcome> {
        let Some(settings) = self.settings(mode) else {
            return Err(Outcome::Failed(FailureKind::Configuration));
        };

        match Self::connect(&settings).await {
            Ok(client) => Ok((client, settings)),
            Err(err) => {
                let raw = format!("{err:#}");
                let category = ConnectFailure::classify(&raw);
                warn!(provider = "gcp", %mode, ?category, error = %raw, "Failed to build storage client");
                category.diagnostic(&raw).print();
                Err(Outcome::Failed(FailureKind::Configuration))
            }
        }
    }

    fn report_failure(mode: Mode, bucket: &str, err: &google_cloud_storage::Error) -> Outcome {
        let failure = ApiFailure::from(err);
        let category = failure.classify(mode);
        warn!(
            provider = "gcp",
            %mode,
            bucket,
            ?category,
            code = ?failure.code,
            http_status = ?failure.http_status,
            error = %failure.message,
            "Cloud Storage request failed"
        );
        category.diagnostic(mode, bucket, &failure.message).print();
        Outcome::Failed(FailureKind::Remote)
    }
}

#[async_trait]
impl BucketProvider for GcsBuckets {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    async fn create_bucket(&self, name: &str) -> Outcome {
        let (client, settings) = match self.open(Mode::Create).await {
            Ok(opened) => opened,
            Err(outcome) => return outcome,
        };
        info!(
            provider = "gcp",
            bucket = name,
            project = %settings.project_id,
            location = %settings.location,
            "Creating Cloud Storage bucket"
        );

        let result = client
            .create_bucket()
            .set_parent("projects/_")
            .set_bucket_id(name)
            .set_bucket(
                Bucket::new()
                    .set_project(format!("projects/{}", settings.project_id))
                    .set_location(settings.location.as_str()),
            )
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(provider = "gcp", bucket = name, "Cloud Storage bucket created");
                Diagnostic::success(format!("GCP bucket created: {name}")).print();
                Outcome::Succeeded
            }
            Err(err) => Self::report_failure(Mode::Create, name, &err),
        }
    }

    async fn delete_bucket(&self, name: &str) -> Outcome {
        let (client, _settings) = match self.open(Mode::Delete).await {
            Ok(opened) => opened,
            Err(outcome) => return outcome,
        };
        info!(provider = "gcp", bucket = name, "Deleting Cloud Storage bucket");

        let result = client
            .delete_bucket()
            .set_name(format!("projects/_/buckets/{name}"))
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(provider = "gcp", bucket = name, "Cloud Storage bucket deleted");
                Diagnostic::success(format!("GCP bucket deleted: {name}")).print();
                Outcome::Succeeded
            }
            Err(err) => Self::report_failure(Mode::Delete, name, &err),
        }
    }
}
