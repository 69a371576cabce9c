pub mod loader;

use std::path::PathBuf;

pub use loader::load;
use serde::Deserialize;

/// Location used for new Cloud Storage buckets unless overridden.
pub const DEFAULT_GCP_LOCATION: &str = "US";

pub const GCP_PROJECT_ID: &str = "GCP_PROJECT_ID";
pub const GCP_CREDENTIAL_FILE: &str = "GCP_CREDENTIAL_FILE";
pub const GCP_BUCKET_LOCATION: &str = "GCP_BUCKET_LOCATION";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GcpConfig {
    #[serde(default)]
    pub project_id: Option<String>,
    /// Path to a service account JSON key.
    #[serde(default)]
    pub credential_file: Option<PathBuf>,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    DEFAULT_GCP_LOCATION.to_string()
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            credential_file: None,
            location: default_location(),
        }
    }
}

impl GcpConfig {
    /// Override values with non-empty variables from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(project_id) = var(GCP_PROJECT_ID) {
            self.project_id = Some(project_id);
        }
        if let Some(path) = var(GCP_CREDENTIAL_FILE) {
            self.credential_file = Some(PathBuf::from(path));
        }
        if let Some(location) = var(GCP_BUCKET_LOCATION) {
            self.location = location;
        }
    }
}

/// AWS has no entry here: region and credentials come from the SDK's
/// default chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gcp: GcpConfig,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gcp.location, "US");
        assert!(config.gcp.project_id.is_none());
        assert!(config.gcp.credential_file.is_none());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut gcp = GcpConfig {
            project_id: Some("from-file".to_string()),
            credential_file: Some(PathBuf::from("file.json")),
            location: "EU".to_string(),
        };
        gcp.apply_env(lookup(&[
            (GCP_PROJECT_ID, "from-env"),
            (GCP_CREDENTIAL_FILE, "/secrets/sa.json"),
        ]));

        assert_eq!(gcp.project_id.as_deref(), Some("from-env"));
        assert_eq!(gcp.credential_file, Some(PathBuf::from("/secrets/sa.json")));
        assert_eq!(gcp.location, "EU");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut gcp = GcpConfig {
            project_id: Some("from-file".to_string()),
            ..GcpConfig::default()
        };
        gcp.apply_env(lookup(&[(GCP_PROJECT_ID, ""), (GCP_BUCKET_LOCATION, "")]));

        assert_eq!(gcp.project_id.as_deref(), Some("from-file"));
        assert_eq!(gcp.location, DEFAULT_GCP_LOCATION);
    }
}
