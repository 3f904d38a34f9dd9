//! create-cluster - Provision a Dataproc cluster and wait for it.

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dataproc::auth::resolve_access_token;
use dataproc::{ClusterArgs, Dataproc, DataprocError};

#[tokio::main]
async fn main() -> Result<()> {
    let args = match ClusterArgs::try_from_args(std::env::args_os()) {
        Ok(args) => args,
        Err(DataprocError::Argument(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let endpoint = args.api_endpoint();
    info!(endpoint = %endpoint, project_id = %args.project_id, "Connecting to Dataproc");

    let token = resolve_access_token(args.access_token.as_deref())
        .context("Failed to obtain an access token")?;
    let controller = Dataproc::new(&endpoint, token)
        .context("Failed to create Dataproc client")?
        .with_poll_interval(args.poll_interval());

    dataproc::run(&args, &controller, &mut io::stdout().lock())
        .await
        .with_context(|| format!("Failed to create cluster {}", args.cluster_name))?;

    Ok(())
}
