//! Device fact extraction.
//!
//! Each [`FactQuery`] pairs an informational command with a pattern whose
//! first capture group is the fact. A pattern that does not match simply
//! leaves the field unset; a failing command aborts the whole call.

use log::Level;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::driver::CliDriver;
use crate::error::{PlatformError, Result};

/// A device fact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactField {
    /// Operating system version.
    Version,
    /// Hardware model.
    Model,
    /// Configured hostname (identity).
    Hostname,
}

impl FactField {
    /// Key used for this field in serialized device info.
    pub fn key(&self) -> &'static str {
        match self {
            FactField::Version => "network_os_version",
            FactField::Model => "network_os_model",
            FactField::Hostname => "network_os_hostname",
        }
    }
}

/// Structured device facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device family, always set.
    pub network_os: String,

    /// Operating system version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_version: Option<String>,

    /// Hardware model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_model: Option<String>,

    /// Configured identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_hostname: Option<String>,
}

impl DeviceInfo {
    /// Device info with only the family set.
    pub fn new(network_os: impl Into<String>) -> Self {
        Self {
            network_os: network_os.into(),
            ..Self::default()
        }
    }

    /// Set a fact field.
    pub fn set(&mut self, field: FactField, value: impl Into<String>) {
        let slot = match field {
            FactField::Version => &mut self.network_os_version,
            FactField::Model => &mut self.network_os_model,
            FactField::Hostname => &mut self.network_os_hostname,
        };
        *slot = Some(value.into());
    }

    /// Get a fact field.
    pub fn get(&self, field: FactField) -> Option<&str> {
        match field {
            FactField::Version => self.network_os_version.as_deref(),
            FactField::Model => self.network_os_model.as_deref(),
            FactField::Hostname => self.network_os_hostname.as_deref(),
        }
    }
}

/// An informational command and the pattern extracting one field from it.
#[derive(Debug, Clone)]
pub struct FactQuery {
    /// Command to run.
    pub command: String,

    /// Field the capture fills.
    pub field: FactField,

    /// Pattern; capture group 1 is the value.
    pub pattern: Regex,
}

impl FactQuery {
    /// Create a new fact query.
    pub fn new(
        command: impl Into<String>,
        field: FactField,
        pattern: &str,
    ) -> std::result::Result<Self, PlatformError> {
        let pattern = Regex::new(pattern).map_err(|source| PlatformError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            command: command.into(),
            field,
            pattern,
        })
    }

    /// Extract the field from command output.
    pub fn extract(&self, output: &str) -> Option<String> {
        self.pattern
            .captures(output.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Run the platform's fact queries in order and collect the results.
pub async fn get_device_info<C: Channel>(driver: &mut CliDriver<C>) -> Result<DeviceInfo> {
    let mut info = DeviceInfo::new(driver.platform().network_os.clone());
    let queries = driver.platform().fact_queries.clone();
    let commands: Vec<&str> = queries.iter().map(|q| q.command.as_str()).collect();
    let responses = driver.send_commands(&commands).await?;

    for (query, response) in queries.iter().zip(&responses) {
        match query.extract(&response.result) {
            Some(value) => info.set(query.field, value),
            None => driver.diagnostics().emit(
                Level::Debug,
                format_args!("no {} in output of {:?}", query.field.key(), query.command),
            ),
        }
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version() {
        let query = FactQuery::new("/system resource print", FactField::Version, r"version: (\S+)").unwrap();
        let output = "                   uptime: 1d2h\n                  version: 6.45.9 (long-term)\n";
        assert_eq!(query.extract(output), Some("6.45.9".to_string()));
    }

    #[test]
    fn test_extract_multiline_model() {
        let query = FactQuery::new("/system routerboard print", FactField::Model, r"(?m)model: (.+)$").unwrap();
        let output = "       routerboard: yes\n             model: RB3011UiAS\n     serial-number: 1234\n";
        assert_eq!(query.extract(output), Some("RB3011UiAS".to_string()));
    }

    #[test]
    fn test_extract_miss() {
        let query = FactQuery::new("/system routerboard print", FactField::Model, r"(?m)model: (.+)$").unwrap();
        assert_eq!(query.extract("routerboard: no\n"), None);
    }

    #[test]
    fn test_device_info_serialization_omits_unset() {
        let mut info = DeviceInfo::new("RouterOS");
        info.set(FactField::Hostname, "MyRouter");

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"network_os": "RouterOS", "network_os_hostname": "MyRouter"})
        );
        assert_eq!(info.get(FactField::Hostname), Some("MyRouter"));
        assert_eq!(info.get(FactField::Model), None);
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(FactField::Version.key(), "network_os_version");
        assert_eq!(FactField::Model.key(), "network_os_model");
        assert_eq!(FactField::Hostname.key(), "network_os_hostname");
    }
}
