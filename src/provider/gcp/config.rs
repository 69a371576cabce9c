use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::{GCP_CREDENTIAL_FILE, GCP_PROJECT_ID, GcpConfig};
use crate::report::Diagnostic;

/// GCP settings after the preconditions have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpSettings {
    pub project_id: String,
    pub credential_file: PathBuf,
    pub location: String,
}

impl GcpSettings {
    /// Check that the project and credentials file are configured and that
    /// the file exists. No network access happens here.
    pub fn resolve(config: &GcpConfig) -> Result<Self, Diagnostic> {
        let project_id = config.project_id.as_deref().filter(|id| !id.is_empty());
        let credential_file = config
            .credential_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty());

        let (Some(project_id), Some(credential_file)) = (project_id, credential_file) else {
            let missing: Vec<&str> = [
                (project_id.is_none(), GCP_PROJECT_ID),
                (credential_file.is_none(), GCP_CREDENTIAL_FILE),
            ]
            .into_iter()
            .filter_map(|(missing, name)| missing.then_some(name))
            .collect();
            return Err(missing_variables(&missing));
        };

        if !credential_file.exists() {
            return Err(Diagnostic::failure(format!(
                "Credentials file not found: {}",
                credential_file.display()
            ))
            .hint(format!("check {GCP_CREDENTIAL_FILE} in your .env file")));
        }

        Ok(Self {
            project_id: project_id.to_string(),
            credential_file: credential_file.to_path_buf(),
            location: config.location.clone(),
        })
    }
}

fn missing_variables(missing: &[&str]) -> Diagnostic {
    Diagnostic::failure(format!(
        "GCP variables not configured: {}",
        missing.join(", ")
    ))
    .hints([
        "set them in your .env file:".to_string(),
        format!("{GCP_PROJECT_ID}=your-gcp-project-id"),
        format!("{GCP_CREDENTIAL_FILE}=path/to/service-account.json"),
    ])
}

/// Read the service account key.
pub fn load_credentials_json(path: &Path) -> color_eyre::Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read credential file {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .wrap_err_with(|| format!("credential file {} is not valid JSON", path.display()))?;
    debug!(path = %path.display(), "Loaded service account key");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn config(project_id: Option<&str>, credential_file: Option<&Path>) -> GcpConfig {
        GcpConfig {
            project_id: project_id.map(ToString::to_string),
            credential_file: credential_file.map(Path::to_path_buf),
            ..GcpConfig::default()
        }
    }

    #[test]
    fn test_missing_project_id() {
        let diag = GcpSettings::resolve(&config(None, Some(Path::new("sa.json")))).unwrap_err();
        assert_eq!(diag.severity(), Severity::Failure);
        assert_eq!(diag.headline(), "GCP variables not configured: GCP_PROJECT_ID");
    }

    #[test]
    fn test_missing_both_variables() {
        let diag = GcpSettings::resolve(&config(Some(""), None)).unwrap_err();
        assert_eq!(
            diag.headline(),
            "GCP variables not configured: GCP_PROJECT_ID, GCP_CREDENTIAL_FILE"
        );
        assert!(diag.hint_lines().iter().any(|h| h.starts_with("GCP_PROJECT_ID=")));
    }

    #[test]
    fn test_missing_credentials_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let diag = GcpSettings::resolve(&config(Some("p"), Some(&path))).unwrap_err();
        assert!(diag.headline().contains(&path.display().to_string()));
    }

    #[test]
    fn test_resolved_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sa.json");
        fs::write(&path, "{}").unwrap();

        let settings = GcpSettings::resolve(&config(Some("p"), Some(&path))).unwrap();
        assert_eq!(settings.project_id, "p");
        assert_eq!(settings.credential_file, path);
        assert_eq!(settings.location, "US");
    }

    #[test]
    fn test_invalid_json_mentions_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sa.json");
        fs::write(&path, "not json").unwrap();

        let err = load_credentials_json(&path).unwrap_err();
        assert!(err.to_string().contains("credential file"));
    }
}
