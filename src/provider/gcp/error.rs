//! Classification of Cloud Storage failures into user-facing categories.

use google_cloud_gax::error::rpc::Code;

use crate::report::Diagnostic;
use crate::request::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcsFailure {
    Credentials,
    AlreadyExists,
    PermissionDenied,
    InvalidProject,
    NotFound,
    NotEmpty,
    Other,
}

/// The parts of a client error used for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub code: Option<Code>,
    pub http_status: Option<u16>,
    pub authentication: bool,
    pub message: String,
}

impl From<&google_cloud_storage::Error> for ApiFailure {
    fn from(err: &google_cloud_storage::Error) -> Self {
        let mut message = err.to_string();
        if let Some(status) = err.status() {
            if !status.message.is_empty() && !message.contains(&status.message) {
                message.push_str(": ");
                message.push_str(&status.message);
            }
        }

        Self {
            code: err.status().map(|status| status.code),
            http_status: err.http_status_code(),
            authentication: err.is_authentication(),
            message,
        }
    }
}

impl ApiFailure {
    #[cfg(test)]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            http_status: None,
            authentication: false,
            message: message.into(),
        }
    }

    const fn is_structured(&self) -> bool {
        self.code.is_some() || self.http_status.is_some()
    }

    fn mentions(&self, needles: &[&str]) -> bool {
        let lower = self.message.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    }

    pub fn classify(&self, mode: Mode) -> GcsFailure {
        if self.authentication
            || matches!(self.code, Some(Code::Unauthenticated))
            || self.http_status == Some(401)
        {
            return GcsFailure::Credentials;
        }

        match mode {
            Mode::Create => self.classify_create(),
            Mode::Delete => self.classify_delete(),
        }
    }

    fn classify_create(&self) -> GcsFailure {
        if self.is_structured() {
            match (self.code, self.http_status) {
                (Some(Code::AlreadyExists), _) | (None, Some(409)) => {
                    return GcsFailure::AlreadyExists;
                }
                (Some(Code::PermissionDenied), _) | (None, Some(403)) => {
                    return GcsFailure::PermissionDenied;
                }
                (Some(Code::InvalidArgument | Code::NotFound), _) | (None, Some(400 | 404))
                    if self.mentions(&["project"]) =>
                {
                    return GcsFailure::InvalidProject;
                }
                _ => {}
            }
        }

        if self.mentions(&["already exists", "conflict"]) {
            GcsFailure::AlreadyExists
        } else if self.mentions(&["permission", "forbidden"]) {
            GcsFailure::PermissionDenied
        } else if self.mentions(&["project"]) {
            GcsFailure::InvalidProject
        } else {
            GcsFailure::Other
        }
    }

    fn classify_delete(&self) -> GcsFailure {
        if self.is_structured() {
            match (self.code, self.http_status) {
                (Some(Code::NotFound), _) | (None, Some(404)) => return GcsFailure::NotFound,
                (Some(Code::FailedPrecondition), _) | (None, Some(409)) => {
                    return GcsFailure::NotEmpty;
                }
                _ => {}
            }
        }

        if self.mentions(&["not found", "404"]) {
            GcsFailure::NotFound
        } else if self.mentions(&["not empty", "conflict"]) {
            GcsFailure::NotEmpty
        } else {
            GcsFailure::Other
        }
    }
}

/// Why the storage client could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    Credentials,
    Connection,
}

impl ConnectFailure {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("credential") || lower.contains("authentication") {
            Self::Credentials
        } else {
            Self::Connection
        }
    }

    pub fn diagnostic(self, raw: &str) -> Diagnostic {
        match self {
            Self::Credentials => Diagnostic::failure(format!("GCP credentials error: {raw}"))
                .hints([
                    "check that the service account JSON file exists and is valid",
                    "check that the service account has the Storage Admin role",
                    "check the GCP_CREDENTIAL_FILE variable",
                ]),
            Self::Connection => Diagnostic::failure(format!("Failed to connect to GCP: {raw}")),
        }
    }
}

impl GcsFailure {
    pub fn diagnostic(self, mode: Mode, bucket: &str, raw: &str) -> Diagnostic {
        match self {
            Self::Credentials => Diagnostic::failure(format!("GCP authentication failed: {raw}"))
                .hint("check the GCP_CREDENTIAL_FILE variable and the service account key"),
            Self::AlreadyExists => Diagnostic::failure(format!(
                "Bucket '{bucket}' already exists or the name is not available"
            ))
            .hint("Cloud Storage bucket names are global, choose a unique name"),
            Self::PermissionDenied => {
                Diagnostic::failure(format!("No permission to create the bucket: {raw}"))
                    .hint("grant the service account the 'Storage Admin' role")
            }
            Self::InvalidProject => Diagnostic::failure(format!("Invalid GCP project: {raw}"))
                .hint("check the GCP_PROJECT_ID variable"),
            Self::NotFound => Diagnostic::failure(format!("Bucket '{bucket}' not found")),
            Self::NotEmpty => Diagnostic::failure(format!("Bucket '{bucket}' is not empty"))
                .hint("remove all objects from the bucket first"),
            Self::Other => match mode {
                Mode::Create => {
                    Diagnostic::failure(format!("Failed to create GCP bucket: {raw}"))
                }
                Mode::Delete => {
                    Diagnostic::failure(format!("Failed to delete GCP bucket: {raw}"))
                }
            },
        }
    }
}
