//! Cluster specification and regional endpoint derivation.

/// Machine type used for every node in the cluster.
pub const DEFAULT_MACHINE_TYPE: &str = "n1-standard-1";

/// Number of master nodes.
pub const MASTER_INSTANCES: u32 = 1;

/// Number of worker nodes.
pub const WORKER_INSTANCES: u32 = 2;

/// Derive the regional control-plane endpoint (e.g. "us-central1-dataproc.googleapis.com:443").
#[must_use]
pub fn regional_endpoint(region: &str) -> String {
    format!("{region}-dataproc.googleapis.com:443")
}

/// Sizing of one group of cluster nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceGroupSpec {
    /// Number of VM instances in the group.
    pub num_instances: u32,
    /// Compute Engine machine type.
    pub machine_type_uri: String,
}

impl InstanceGroupSpec {
    fn fixed(num_instances: u32) -> Self {
        Self {
            num_instances,
            machine_type_uri: DEFAULT_MACHINE_TYPE.to_string(),
        }
    }
}

/// Desired cluster topology submitted to the control plane.
///
/// Identifiers are passed through untouched; the service is the only
/// validator of project, region and cluster names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    /// Project that owns the cluster.
    pub project_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Region the cluster lives in.
    pub region: String,
    /// Master node group.
    pub master: InstanceGroupSpec,
    /// Worker node group.
    pub worker: InstanceGroupSpec,
}

impl ClusterSpec {
    /// Build the fixed one-master, two-worker topology.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        region: impl Into<String>,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            cluster_name: cluster_name.into(),
            region: region.into(),
            master: InstanceGroupSpec::fixed(MASTER_INSTANCES),
            worker: InstanceGroupSpec::fixed(WORKER_INSTANCES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_is_fixed() {
        for (project, region, name) in [
            ("my-project", "us-central1", "analytics"),
            ("p", "europe-west1", "c"),
            ("", "", ""),
        ] {
            let spec = ClusterSpec::new(project, region, name);
            assert_eq!(spec.master.num_instances, 1);
            assert_eq!(spec.worker.num_instances, 2);
            assert_eq!(spec.master.machine_type_uri, DEFAULT_MACHINE_TYPE);
            assert_eq!(spec.worker.machine_type_uri, DEFAULT_MACHINE_TYPE);
        }
    }

    #[test]
    fn test_identifiers_pass_through() {
        let spec = ClusterSpec::new("my-project", "us-east1", "Not_A Valid-Name");
        assert_eq!(spec.project_id, "my-project");
        assert_eq!(spec.region, "us-east1");
        assert_eq!(spec.cluster_name, "Not_A Valid-Name");
    }

    #[test]
    fn test_regional_endpoint() {
        let endpoint = regional_endpoint("us-central1");
        assert_eq!(endpoint, "us-central1-dataproc.googleapis.com:443");
        assert_eq!(endpoint.matches("us-central1").count(), 1);
    }
}
