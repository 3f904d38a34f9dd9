//! Access token resolution.

use std::process::Command;

use tracing::debug;

use crate::controller::{DataprocError, RpcCode};

/// Resolve the bearer token used for control-plane requests.
///
/// A non-blank explicit token wins; otherwise the token is read from
/// `gcloud auth print-access-token`.
///
/// # Errors
/// Returns [`DataprocError::Auth`] if no token can be obtained.
pub fn resolve_access_token(explicit: Option<&str>) -> Result<String, DataprocError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    debug!("No access token supplied, asking gcloud");
    gcloud_access_token()
}

fn gcloud_access_token() -> Result<String, DataprocError> {
    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .map_err(|e| DataprocError::Auth {
            code: RpcCode::Unauthenticated,
            message: format!("`gcloud` not found ({e}). Install the Cloud SDK or pass --access-token"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DataprocError::Auth {
            code: RpcCode::Unauthenticated,
            message: format!("gcloud auth print-access-token failed: {}", stderr.trim()),
        });
    }

    parse_token(&String::from_utf8_lossy(&output.stdout))
}

fn parse_token(stdout: &str) -> Result<String, DataprocError> {
    let token = stdout.trim();
    if token.is_empty() {
        return Err(DataprocError::Auth {
            code: RpcCode::Unauthenticated,
            message: "gcloud returned an empty access token. Run: `gcloud auth login`".to_string(),
        });
    }
    Ok(token.to_string())
}
