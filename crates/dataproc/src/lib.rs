//! Dataproc cluster provisioning for CTO Platform.
//!
//! Creates a managed Dataproc cluster with a fixed topology and waits for the
//! control plane to finish provisioning it:
//!
//! ```text
//! create-cluster PROJECT REGION NAME
//!        │
//!        ▼
//! POST {region}-dataproc.googleapis.com/v1/projects/*/regions/*/clusters
//!        │  long-running operation
//!        ▼
//! GET  /v1/projects/*/regions/*/operations/*   (until done)
//!        │
//!        ▼
//! "Cluster created successfully: NAME"
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use dataproc::{create_cluster, regional_endpoint, Dataproc};
//!
//! let controller = Dataproc::new(&regional_endpoint("us-central1"), token)?;
//! let name = create_cluster(&controller, "my-project", "us-central1", "analytics").await?;
//! ```

pub mod args;
pub mod auth;
pub mod cluster;
pub mod controller;
pub mod invoker;

pub use args::ClusterArgs;
pub use cluster::{regional_endpoint, ClusterSpec, InstanceGroupSpec, DEFAULT_MACHINE_TYPE};
pub use controller::{
    Cluster, ClusterController, ClusterState, Dataproc, DataprocError, OperationHandle, RpcCode,
};
pub use invoker::{create_cluster, run};
