//! Builder and configuration for [`CliDriver`].

use std::sync::Arc;

use serde::Deserialize;

use super::command::CliDriver;
use crate::channel::Channel;
use crate::diagnostics::{Diagnostics, default_diagnostics};
use crate::error::{DriverError, Result};
use crate::platform::{PlatformDefinition, PlatformRegistry};

/// Tunables for a driver.
///
/// Deserializable so callers can keep it in their own config files; every
/// field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Bytes from the end of the output searched for terminal patterns.
    pub search_depth: usize,

    /// Sequence appended to commands and answers.
    pub return_char: String,

    /// Newlines sent at most while clearing banners on session open.
    pub max_banner_keystrokes: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            search_depth: 1000,
            return_char: "\n".to_string(),
            max_banner_keystrokes: 3,
        }
    }
}

/// Builder for constructing a [`CliDriver`] over a caller-owned channel.
///
/// # Example
///
/// ```rust
/// use routeros_cli::channel::ReplayChannel;
/// use routeros_cli::driver::DriverBuilder;
///
/// # fn example() -> Result<(), routeros_cli::Error> {
/// let driver = DriverBuilder::new(ReplayChannel::new())
///     .platform("routeros")
///     .search_depth(2000)
///     .build()?;
/// assert_eq!(driver.platform().name, "routeros");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct DriverBuilder<C> {
    channel: C,
    platform_name: Option<String>,
    custom_platform: Option<PlatformDefinition>,
    config: DriverConfig,
    initial_output: Vec<u8>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl<C: Channel> DriverBuilder<C> {
    /// Create a new driver builder for an open channel.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            platform_name: None,
            custom_platform: None,
            config: DriverConfig::default(),
            initial_output: Vec::new(),
            diagnostics: None,
        }
    }

    /// Set the platform name (e.g., "routeros").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set a custom platform definition.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Replace the whole driver configuration.
    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the pattern search depth in bytes.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = depth;
        self
    }

    /// Set the sequence appended to commands.
    pub fn return_char(mut self, return_char: impl Into<String>) -> Self {
        self.config.return_char = return_char.into();
        self
    }

    /// Set how many newlines session bootstrap may send.
    pub fn max_banner_keystrokes(mut self, keystrokes: usize) -> Self {
        self.config.max_banner_keystrokes = keystrokes;
        self
    }

    /// Output the connection layer already read (login banner, first prompt).
    pub fn initial_output(mut self, data: impl AsRef<[u8]>) -> Self {
        self.initial_output.extend_from_slice(data.as_ref());
        self
    }

    /// Install a diagnostics sink instead of the `log` forwarder.
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build the driver.
    ///
    /// Nothing is written to the channel; call
    /// [`on_open_shell`](CliDriver::on_open_shell) before issuing commands.
    pub fn build(self) -> Result<CliDriver<C>> {
        if self.config.search_depth == 0 {
            return Err(DriverError::InvalidConfig {
                message: "search_depth must be greater than zero".to_string(),
            }
            .into());
        }
        if self.config.return_char.is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "return_char must not be empty".to_string(),
            }
            .into());
        }

        let platform = if let Some(custom) = self.custom_platform {
            Arc::new(custom)
        } else if let Some(name) = self.platform_name {
            PlatformRegistry::global()
                .read()
                .map_err(|_| DriverError::InvalidConfig {
                    message: "Failed to acquire registry lock".to_string(),
                })?
                .get(&name)
                .ok_or(DriverError::UnknownPlatform { name })?
        } else {
            return Err(DriverError::InvalidConfig {
                message: "Platform must be specified".to_string(),
            }
            .into());
        };

        let diagnostics = self.diagnostics.unwrap_or_else(default_diagnostics);
        let mut driver = CliDriver::new(self.channel, platform, self.config, diagnostics);
        if !self.initial_output.is_empty() {
            driver.seed_output(&self.initial_output);
        }
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ReplayChannel;
    use crate::error::Error;

    #[test]
    fn test_config_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.search_depth, 1000);
        assert_eq!(config.return_char, "\n");
        assert_eq!(config.max_banner_keystrokes, 3);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: DriverConfig =
            serde_json::from_str(r#"{"return_char": "\r\n", "search_depth": 256}"#).unwrap();
        assert_eq!(config.return_char, "\r\n");
        assert_eq!(config.search_depth, 256);
        assert_eq!(config.max_banner_keystrokes, 3);
    }

    #[test]
    fn test_build_requires_platform() {
        let err = DriverBuilder::new(ReplayChannel::new()).build().err().unwrap();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_build_unknown_platform() {
        let err = DriverBuilder::new(ReplayChannel::new())
            .platform("ios")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Driver(DriverError::UnknownPlatform { .. })));
    }

    #[test]
    fn test_build_rejects_zero_depth() {
        let err = DriverBuilder::new(ReplayChannel::new())
            .platform("routeros")
            .search_depth(0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_initial_output_sets_prompt() {
        let driver = DriverBuilder::new(ReplayChannel::new())
            .platform("routeros")
            .initial_output("MikroTik RouterOS 6.45.9\r\n[admin@MikroTik] > ")
            .build()
            .unwrap();
        assert_eq!(driver.last_prompt(), Some("[admin@MikroTik] >"));
    }
}
