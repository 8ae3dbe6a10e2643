//! Capability descriptor returned by `get_capabilities`.

use serde::{Deserialize, Serialize};

use crate::facts::DeviceInfo;

/// Operations every cliconf implementation answers.
pub const BASE_RPC: &[&str] = &["get_config", "edit_config", "get_capabilities", "get"];

/// Supported operations plus device facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Operation names.
    pub rpc: Vec<String>,

    /// Always `cliconf`.
    pub network_api: String,

    /// Facts gathered from the device.
    pub device_info: DeviceInfo,
}

impl Capabilities {
    /// The base capability set for a device.
    pub fn new(device_info: DeviceInfo) -> Self {
        Self {
            rpc: BASE_RPC.iter().map(|rpc| rpc.to_string()).collect(),
            network_api: "cliconf".to_string(),
            device_info,
        }
    }
}
