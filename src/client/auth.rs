//! Access token acquisition via the Azure CLI
//!
//! Delegates to `az account get-access-token` rather than implementing an
//! OAuth flow; the user's existing CLI login supplies both the bearer token
//! and the subscription id.

use crate::types::{AzcostError, Result};
use serde::Deserialize;
use std::process::Command;

/// Token response from `az account get-access-token`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub subscription: String,
}

/// Run the Azure CLI and parse its token response
pub fn acquire() -> Result<AccessToken> {
    let output = Command::new("az")
        .args(["account", "get-access-token"])
        .output()
        .map_err(|e| {
            AzcostError::Auth(format!(
                "failed to run az: {}. Make sure the Azure CLI is installed and you have logged in",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AzcostError::Auth(format!(
            "az account get-access-token failed: {}. Make sure you have logged in with `az login`",
            stderr.trim()
        )));
    }

    parse_token(&output.stdout)
}

fn parse_token(raw: &[u8]) -> Result<AccessToken> {
    serde_json::from_slice(raw)
        .map_err(|e| AzcostError::Auth(format!("unexpected token response: {}", e)))
}
