//! Submit-and-wait cluster creation.

use std::io::Write;

use tracing::info;

use crate::args::ClusterArgs;
use crate::cluster::ClusterSpec;
use crate::controller::{ClusterController, DataprocError};

/// Create a cluster and block until the control plane reports it done.
///
/// The create request is submitted exactly once; errors from either the
/// submission or the operation are returned unchanged.
///
/// # Errors
/// Returns whatever error the controller surfaces.
pub async fn create_cluster<C>(
    controller: &C,
    project_id: &str,
    region: &str,
    cluster_name: &str,
) -> Result<String, DataprocError>
where
    C: ClusterController + ?Sized,
{
    let spec = ClusterSpec::new(project_id, region, cluster_name);

    let operation = controller.submit_create(project_id, region, &spec).await?;
    let cluster = controller.wait(operation).await?;

    info!(
        cluster_name = %cluster.cluster_name,
        cluster_uuid = cluster.cluster_uuid.as_deref().unwrap_or(""),
        state = %cluster.state,
        "Cluster created"
    );
    Ok(cluster.cluster_name)
}

/// Run `create-cluster` and report the outcome to `out`.
///
/// The success line is written only after the operation finished.
///
/// # Errors
/// Returns the controller's error, or an I/O error writing to `out`.
pub async fn run<C, W>(
    args: &ClusterArgs,
    controller: &C,
    out: &mut W,
) -> Result<String, DataprocError>
where
    C: ClusterController + ?Sized,
    W: Write,
{
    let name = create_cluster(
        controller,
        &args.project_id,
        &args.region,
        &args.cluster_name,
    )
    .await?;
    writeln!(out, "Cluster created successfully: {name}")?;
    Ok(name)
}
