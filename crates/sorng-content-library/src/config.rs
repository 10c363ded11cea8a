//! Provider configuration: vSphere connection settings and upload-wait policy.

use crate::error::{ContentLibraryError, ContentLibraryResult};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for a vCenter endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VsphereConfig {
    /// vCenter hostname / IP (e.g. "vcenter.lab.local")
    #[serde(alias = "vsphere_server")]
    pub host: String,
    /// Port (default 443)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username (e.g. "administrator@vsphere.local")
    #[serde(alias = "user")]
    pub username: String,
    pub password: String,
    /// Skip TLS certificate verification (self-signed labs)
    #[serde(default, alias = "allow_unverified_ssl")]
    pub insecure: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 { 443 }
fn default_timeout() -> u64 { 30 }

impl Default for VsphereConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            port: 443,
            insecure: false,
            timeout_secs: 30,
        }
    }
}

/// How long item creation waits for the server to ingest uploaded files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Delay between two session status polls, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Total wait before finalizing the session regardless, in seconds
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

fn default_poll_interval() -> u64 { 1 }
fn default_upload_timeout() -> u64 { 10 }

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_upload_timeout(),
        }
    }
}

impl UploadSettings {
    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin against the API.
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level provider configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub vsphere: VsphereConfig,
    #[serde(default)]
    pub upload: UploadSettings,
}

impl ProviderConfig {
    /// Build a config from the conventional `VSPHERE_*` environment variables.
    pub fn from_env() -> ContentLibraryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ContentLibraryResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ContentLibraryError::invalid_config(format!("{key} is not set")))
        };
        let number = |key: &str, default: u64| -> ContentLibraryResult<u64> {
            match lookup(key) {
                Some(v) => v.trim().parse().map_err(|_| {
                    ContentLibraryError::invalid_config(format!("{key} must be a number, got {v:?}"))
                }),
                None => Ok(default),
            }
        };

        let port = number("VSPHERE_PORT", u64::from(default_port()))?;
        let port = u16::try_from(port)
            .map_err(|_| ContentLibraryError::invalid_config(format!("VSPHERE_PORT out of range: {port}")))?;

        let insecure = lookup("VSPHERE_ALLOW_UNVERIFIED_SSL")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            vsphere: VsphereConfig {
                host: required("VSPHERE_SERVER")?,
                port,
                username: required("VSPHERE_USER")?,
                password: required("VSPHERE_PASSWORD")?,
                insecure,
                timeout_secs: default_timeout(),
            },
            upload: UploadSettings {
                poll_interval_secs: number("VSPHERE_UPLOAD_POLL_INTERVAL", default_poll_interval())?,
                timeout_secs: number("VSPHERE_UPLOAD_TIMEOUT", default_upload_timeout())?,
            },
        })
    }
}
