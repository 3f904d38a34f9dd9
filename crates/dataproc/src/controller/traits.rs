//! Cluster controller trait and common types.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::ClusterSpec;

/// Errors that can occur while provisioning a cluster.
#[derive(Error, Debug)]
pub enum DataprocError {
    /// Command line arguments were missing or malformed.
    #[error("Invalid arguments: {0}")]
    Argument(#[from] clap::Error),

    /// Caller is not authenticated or lacks permission.
    #[error("Authentication error: {message}")]
    Auth { code: RpcCode, message: String },

    /// Cluster configuration was rejected (machine type, region, name).
    #[error("Invalid cluster configuration: {message}")]
    InvalidConfig { code: RpcCode, message: String },

    /// A cluster with the same name already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Project quota exceeded.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other error reported by the service.
    #[error("API error: {code} - {message}")]
    Api { code: RpcCode, message: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Endpoint could not be parsed into a URL.
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation finished without a result or an error.
    #[error("Malformed operation: {0}")]
    MalformedOperation(String),
}

impl DataprocError {
    /// Classify a remote failure by its canonical code.
    #[must_use]
    pub fn from_status(code: RpcCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            RpcCode::PermissionDenied | RpcCode::Unauthenticated => Self::Auth { code, message },
            RpcCode::InvalidArgument | RpcCode::FailedPrecondition => {
                Self::InvalidConfig { code, message }
            }
            RpcCode::AlreadyExists => Self::AlreadyExists(message),
            RpcCode::ResourceExhausted => Self::QuotaExceeded(message),
            RpcCode::NotFound => Self::NotFound(message),
            _ => Self::Api { code, message },
        }
    }

    /// Canonical code of a remote failure, `None` for local errors.
    #[must_use]
    pub fn code(&self) -> Option<RpcCode> {
        match self {
            Self::Auth { code, .. } | Self::InvalidConfig { code, .. } | Self::Api { code, .. } => {
                Some(*code)
            }
            Self::AlreadyExists(_) => Some(RpcCode::AlreadyExists),
            Self::QuotaExceeded(_) => Some(RpcCode::ResourceExhausted),
            Self::NotFound(_) => Some(RpcCode::NotFound),
            _ => None,
        }
    }
}

/// Canonical status codes of Google APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcCode {
    /// Not an error.
    Ok,
    /// Cancelled by the caller.
    Cancelled,
    /// Unknown error.
    Unknown,
    /// Request was malformed.
    InvalidArgument,
    /// Deadline expired before the operation completed.
    DeadlineExceeded,
    /// Resource not found.
    NotFound,
    /// Resource already exists.
    AlreadyExists,
    /// Caller lacks permission.
    PermissionDenied,
    /// Quota or rate limit exhausted.
    ResourceExhausted,
    /// System not in the state required for the operation.
    FailedPrecondition,
    /// Concurrency conflict.
    Aborted,
    /// Value outside the valid range.
    OutOfRange,
    /// Operation not implemented.
    Unimplemented,
    /// Internal service error.
    Internal,
    /// Service temporarily unavailable.
    Unavailable,
    /// Unrecoverable data loss.
    DataLoss,
    /// Missing or invalid credentials.
    Unauthenticated,
}

impl RpcCode {
    const ALL: [Self; 17] = [
        Self::Ok,
        Self::Cancelled,
        Self::Unknown,
        Self::InvalidArgument,
        Self::DeadlineExceeded,
        Self::NotFound,
        Self::AlreadyExists,
        Self::PermissionDenied,
        Self::ResourceExhausted,
        Self::FailedPrecondition,
        Self::Aborted,
        Self::OutOfRange,
        Self::Unimplemented,
        Self::Internal,
        Self::Unavailable,
        Self::DataLoss,
        Self::Unauthenticated,
    ];

    /// Look up a numeric `google.rpc.Code`; out-of-range values are `Unknown`.
    #[must_use]
    pub fn from_i32(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(Self::Unknown)
    }

    /// Canonical code for an HTTP status when the body carries none.
    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        match status {
            200..=299 => Self::Ok,
            400 => Self::InvalidArgument,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::AlreadyExists,
            429 => Self::ResourceExhausted,
            499 => Self::Cancelled,
            500 => Self::Internal,
            501 => Self::Unimplemented,
            503 => Self::Unavailable,
            504 => Self::DeadlineExceeded,
            _ => Self::Unknown,
        }
    }

    /// Wire name, e.g. `ALREADY_EXISTS`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl std::fmt::Display for RpcCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown status code: {s}"))
    }
}

/// Handle to an in-flight create operation.
///
/// Not `Clone`: [`ClusterController::wait`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct OperationHandle {
    name: String,
}

impl OperationHandle {
    /// Wrap an operation resource name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Operation resource name (`projects/{p}/regions/{r}/operations/{id}`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Dataproc cluster state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    /// Cluster is being created.
    Creating,
    /// Cluster is running and ready.
    Running,
    /// Cluster failed to create.
    Error,
    /// Cluster failed during an update.
    ErrorDueToUpdate,
    /// Cluster is being deleted.
    Deleting,
    /// Cluster is being updated.
    Updating,
    /// Cluster is stopping.
    Stopping,
    /// Cluster is stopped.
    Stopped,
    /// Cluster is starting.
    Starting,
    /// Cluster is being repaired.
    Repairing,
    /// Unknown state.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creating => write!(f, "creating"),
            Self::Running => write!(f, "running"),
            Self::Error => write!(f, "error"),
            Self::ErrorDueToUpdate => write!(f, "error_due_to_update"),
            Self::Deleting => write!(f, "deleting"),
            Self::Updating => write!(f, "updating"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
            Self::Starting => write!(f, "starting"),
            Self::Repairing => write!(f, "repairing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A cluster reported by the control plane once creation finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Project that owns the cluster.
    pub project_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Service-generated cluster UUID.
    pub cluster_uuid: Option<String>,
    /// Current state.
    pub state: ClusterState,
}

/// Control-plane capability used to create clusters.
#[async_trait]
pub trait ClusterController: Send + Sync {
    /// Submit a create request; returns as soon as the service accepts it.
    async fn submit_create(
        &self,
        project_id: &str,
        region: &str,
        spec: &ClusterSpec,
    ) -> Result<OperationHandle, DataprocError>;

    /// Block until the operation is done and return its outcome.
    async fn wait(&self, operation: OperationHandle) -> Result<Cluster, DataprocError>;
}
