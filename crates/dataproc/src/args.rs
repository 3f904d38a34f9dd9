//! Command line arguments for `create-cluster`.

use std::ffi::OsString;
use std::time::Duration;

use clap::Parser;

use crate::cluster::regional_endpoint;
use crate::controller::{DataprocError, DEFAULT_POLL_INTERVAL_SECS};

/// Create a Dataproc cluster with one master and two workers.
#[derive(Parser, Debug)]
#[command(name = "create-cluster")]
#[command(about = "Create a Dataproc cluster and wait until it is ready")]
pub struct ClusterArgs {
    /// Project to create the cluster in.
    pub project_id: String,

    /// Region the cluster lives in (e.g. us-central1).
    pub region: String,

    /// Name of the new cluster.
    pub cluster_name: String,

    /// Override the regional API endpoint (`host:port` or URL).
    #[arg(long, env = "DATAPROC_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    /// `OAuth2` access token (falls back to `gcloud auth print-access-token`).
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Seconds between operation status polls.
    #[arg(
        long,
        env = "DATAPROC_POLL_INTERVAL",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl ClusterArgs {
    /// Parse from an argument list (first item is the program name).
    ///
    /// # Errors
    /// Returns [`DataprocError::Argument`] when positionals are missing or a
    /// flag is malformed.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, DataprocError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }

    /// Endpoint to talk to: the override, or the regional default.
    #[must_use]
    pub fn api_endpoint(&self) -> String {
        self.api_endpoint
            .clone()
            .unwrap_or_else(|| regional_endpoint(&self.region))
    }

    /// Delay between operation polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_in_order() {
        let args =
            ClusterArgs::try_from_args(["create-cluster", "my-project", "us-central1", "analytics"])
                .unwrap();
        assert_eq!(args.project_id, "my-project");
        assert_eq!(args.region, "us-central1");
        assert_eq!(args.cluster_name, "analytics");
        assert_eq!(args.api_endpoint(), "us-central1-dataproc.googleapis.com:443");
    }

    #[test]
    fn test_missing_positionals() {
        for argv in [
            vec!["create-cluster"],
            vec!["create-cluster", "my-project"],
            vec!["create-cluster", "my-project", "us-central1"],
        ] {
            let err = ClusterArgs::try_from_args(argv).unwrap_err();
            assert!(matches!(err, DataprocError::Argument(_)));
        }
    }

    #[test]
    fn test_endpoint_override() {
        let args = ClusterArgs::try_from_args([
            "create-cluster",
            "p",
            "us-central1",
            "c",
            "--api-endpoint",
            "http://localhost:8123",
            "--poll-interval",
            "1",
        ])
        .unwrap();
        assert_eq!(args.api_endpoint(), "http://localhost:8123");
        assert_eq!(args.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = ClusterArgs::try_from_args([
            "create-cluster",
            "p",
            "us-central1",
            "c",
            "--poll-interval",
            "0",
        ])
        .unwrap_err();
        assert!(matches!(err, DataprocError::Argument(_)));
    }
}
