//! Classification of S3 failures into user-facing categories.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::report::Diagnostic;
use crate::request::Mode;

const CREDENTIAL_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

const REGION_CODES: &[&str] = &[
    "IllegalLocationConstraintException",
    "InvalidLocationConstraint",
    "AuthorizationHeaderMalformed",
    "PermanentRedirect",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3Failure {
    Credentials,
    InvalidRegion,
    /// Valid credentials without the IAM permission for the operation.
    PermissionDenied,
    /// The request never reached S3.
    Unreachable,
    AlreadyExists,
    NotFound,
    NotEmpty,
    Other,
}

/// The parts of an SDK error used for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkFailure {
    /// S3 error code, present when the service answered.
    pub code: Option<String>,
    /// Full error chain as text.
    pub message: String,
}

impl SdkFailure {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(ToString::to_string),
            message: message.into(),
        }
    }

    pub fn from_sdk<E, R>(err: &SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + Error + 'static,
        R: Debug,
    {
        Self::new(
            err.as_service_error().and_then(ProvideErrorMetadata::code),
            DisplayErrorContext(err).to_string(),
        )
    }

    pub fn classify(&self, mode: Mode) -> S3Failure {
        if let Some(code) = self.code.as_deref() {
            if let Some(failure) = classify_code(code, mode) {
                return failure;
            }
        }
        classify_message(&self.message, mode)
    }
}

fn classify_code(code: &str, mode: Mode) -> Option<S3Failure> {
    if CREDENTIAL_CODES.contains(&code) {
        return Some(S3Failure::Credentials);
    }
    if REGION_CODES.contains(&code) {
        return Some(S3Failure::InvalidRegion);
    }
    if code == "AccessDenied" {
        return Some(S3Failure::PermissionDenied);
    }
    match (mode, code) {
        (Mode::Create, "BucketAlreadyExists" | "BucketAlreadyOwnedByYou") => {
            Some(S3Failure::AlreadyExists)
        }
        (Mode::Delete, "NoSuchBucket") => Some(S3Failure::NotFound),
        (Mode::Delete, "BucketNotEmpty") => Some(S3Failure::NotEmpty),
        _ => None,
    }
}

/// Fallback for errors that never reached S3 (credential resolution, DNS).
fn classify_message(message: &str, mode: Mode) -> S3Failure {
    let lower = message.to_lowercase();

    if lower.contains("resolve auth scheme") || lower.contains("credential") {
        S3Failure::Credentials
    } else if lower.contains("invalid region") || lower.contains("dns name") {
        S3Failure::InvalidRegion
    } else if lower.contains("dns error")
        || lower.contains("io error")
        || lower.contains("timeout")
        || lower.contains("connection")
    {
        S3Failure::Unreachable
    } else if message.contains("AccessDenied") {
        S3Failure::PermissionDenied
    } else if mode == Mode::Create && message.contains("BucketAlreadyExists") {
        S3Failure::AlreadyExists
    } else if mode == Mode::Delete && message.contains("NoSuchBucket") {
        S3Failure::NotFound
    } else if mode == Mode::Delete && message.contains("BucketNotEmpty") {
        S3Failure::NotEmpty
    } else {
        S3Failure::Other
    }
}

pub fn credential_hints() -> [&'static str; 3] {
    [
        "run `aws configure`",
        "or export AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY",
        "or select a profile with AWS_PROFILE",
    ]
}

pub fn region_hints() -> [&'static str; 2] {
    [
        "aws configure set region us-east-1",
        "or export AWS_DEFAULT_REGION=us-east-1",
    ]
}

impl S3Failure {
    pub fn diagnostic(self, mode: Mode, bucket: &str, raw: &str) -> Diagnostic {
        match self {
            Self::Credentials => Diagnostic::failure(format!("AWS credentials error: {raw}"))
                .hints(credential_hints()),
            Self::InvalidRegion => {
                Diagnostic::failure(format!("Invalid AWS region: {raw}")).hints(region_hints())
            }
            Self::PermissionDenied => Diagnostic::failure(format!(
                "No permission to {} the bucket: {raw}",
                mode.id()
            ))
            .hint(match mode {
                Mode::Create => "grant the IAM identity the s3:CreateBucket permission",
                Mode::Delete => "grant the IAM identity the s3:DeleteBucket permission",
            }),
            Self::Unreachable => Diagnostic::failure(format!("Could not reach S3: {raw}"))
                .hints([
                    "check the network connection",
                    "check that the configured region exists",
                ]),
            Self::AlreadyExists => Diagnostic::failure(format!(
                "Bucket '{bucket}' already exists or the name is not available"
            ))
            .hint("S3 bucket names are global, choose a unique name"),
            Self::NotFound => Diagnostic::failure(format!("Bucket '{bucket}' not found")),
            Self::NotEmpty => Diagnostic::failure(format!("Bucket '{bucket}' is not empty"))
                .hint("remove all objects from the bucket first"),
            Self::Other => match mode {
                Mode::Create => Diagnostic::failure(format!("Failed to create S3 bucket: {raw}")),
                Mode::Delete => Diagnostic::failure(format!("Failed to delete S3 bucket: {raw}")),
            },
        }
    }
}
