//! Dataproc REST request and response models.

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterSpec, InstanceGroupSpec};
use crate::controller::traits::ClusterState;

// ============================================================================
// Cluster types
// ============================================================================

/// Cluster body for `clusters.create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDefinition {
    /// Project ID.
    pub project_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Cluster config.
    pub config: ClusterConfigDefinition,
}

/// Cluster config for creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfigDefinition {
    /// Master node group.
    pub master_config: InstanceGroupConfigDefinition,
    /// Worker node group.
    pub worker_config: InstanceGroupConfigDefinition,
}

/// Instance group config for creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceGroupConfigDefinition {
    /// Number of VM instances.
    pub num_instances: u32,
    /// Machine type.
    pub machine_type_uri: String,
}

impl From<&InstanceGroupSpec> for InstanceGroupConfigDefinition {
    fn from(group: &InstanceGroupSpec) -> Self {
        Self {
            num_instances: group.num_instances,
            machine_type_uri: group.machine_type_uri.clone(),
        }
    }
}

impl From<&ClusterSpec> for ClusterDefinition {
    fn from(spec: &ClusterSpec) -> Self {
        Self {
            project_id: spec.project_id.clone(),
            cluster_name: spec.cluster_name.clone(),
            config: ClusterConfigDefinition {
                master_config: (&spec.master).into(),
                worker_config: (&spec.worker).into(),
            },
        }
    }
}

/// Cluster as returned in a finished operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataprocCluster {
    /// Project ID.
    #[serde(default)]
    pub project_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Cluster UUID.
    pub cluster_uuid: Option<String>,
    /// Current status.
    pub status: Option<ClusterStatus>,
}

/// Cluster status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// State.
    pub state: ClusterState,
    /// Optional detail.
    pub detail: Option<String>,
}

// ============================================================================
// Operation types
// ============================================================================

/// Long-running operation (`google.longrunning.Operation`).
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Operation name.
    pub name: String,
    /// Whether the operation reached a terminal state.
    #[serde(default)]
    pub done: bool,
    /// Progress metadata.
    pub metadata: Option<ClusterOperationMetadata>,
    /// Failure, set when done.
    pub error: Option<RpcStatus>,
    /// Created cluster, set when done.
    pub response: Option<DataprocCluster>,
}

/// Cluster operation metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOperationMetadata {
    /// Cluster name.
    pub cluster_name: Option<String>,
    /// Cluster UUID.
    pub cluster_uuid: Option<String>,
    /// Operation status.
    pub status: Option<OperationStatus>,
    /// Description.
    pub description: Option<String>,
}

/// Operation status from metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    /// PENDING, RUNNING or DONE.
    pub state: Option<String>,
    /// Inner state.
    pub inner_state: Option<String>,
    /// Detail.
    pub details: Option<String>,
}

/// RPC status (`google.rpc.Status`).
#[derive(Debug, Clone, Deserialize)]
pub struct RpcStatus {
    /// Numeric canonical code.
    #[serde(default)]
    pub code: i32,
    /// Message.
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Error envelope
// ============================================================================

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error.
    pub error: ErrorBody,
}

/// Error body.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub code: Option<u16>,
    /// Message.
    #[serde(default)]
    pub message: String,
    /// Canonical code name, e.g. `ALREADY_EXISTS`.
    pub status: Option<String>,
}
