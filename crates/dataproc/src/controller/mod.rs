//! Dataproc control-plane access.
//!
//! [`ClusterController`] is the seam between the invoker and the service;
//! [`Dataproc`] implements it over the regional REST endpoint.

mod client;
mod models;
mod traits;

pub use client::{Dataproc, DEFAULT_POLL_INTERVAL_SECS};
pub use traits::{
    Cluster, ClusterController, ClusterState, DataprocError, OperationHandle, RpcCode,
};
