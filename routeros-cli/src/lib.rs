//! # routeros-cli
//!
//! Async CLI driver for MikroTik RouterOS terminal sessions.
//!
//! routeros-cli takes an already-open, already-authenticated shell channel and
//! decides what to send, when a response is complete and how to read it:
//!
//! - Prompt and interactive banner detection over the tail of the output, error
//!   detection over every line read
//! - Session bootstrap that clears license and "press Enter" banners
//! - Command/response exchanges with device errors surfaced as typed errors
//! - Device fact extraction (version, model, identity)
//! - Configuration export and line-oriented diffing against a candidate
//!
//! Device families are plain data ([`PlatformDefinition`]) looked up by name,
//! so the same driver serves any family whose definition is registered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use routeros_cli::channel::SshChannel;
//! use routeros_cli::cliconf::{Cliconf, GenericCliconf};
//! use routeros_cli::DriverBuilder;
//!
//! async fn collect(channel: russh::Channel<russh::client::Msg>) -> Result<(), routeros_cli::Error> {
//!     let driver = DriverBuilder::new(SshChannel::new(channel, Duration::from_secs(30)))
//!         .platform("routeros")
//!         .build()?;
//!     let mut cliconf = GenericCliconf::new(driver);
//!
//!     cliconf.on_open_shell().await?;
//!
//!     let facts = cliconf.get_device_info().await?;
//!     println!("{} {:?}", facts.network_os, facts.network_os_version);
//!
//!     let running = cliconf.get_config(None, None, &[]).await?;
//!     println!("{}", String::from_utf8_lossy(&running));
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod cliconf;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod facts;
pub mod platform;

// Re-export main types for convenience
pub use channel::{Channel, PatternClass, PatternRegistry};
pub use cliconf::{Cliconf, EditOutcome, GenericCliconf};
pub use config::{ConfigDiff, DiffMatch, DiffReplace, DiffRequest};
pub use driver::{CliDriver, DriverBuilder, DriverConfig, Response, SendOptions};
pub use error::{Error, Result};
pub use facts::DeviceInfo;
pub use platform::{PlatformDefinition, PlatformRegistry};
