//! Configuration-management capability surface.
//!
//! [`Cliconf`] is the set of operations an automation layer calls on a
//! device session. [`GenericCliconf`] implements it for any platform whose
//! definition carries the needed commands and patterns; the device family is
//! chosen by the [`PlatformDefinition`](crate::platform::PlatformDefinition)
//! the driver was built with.

mod capabilities;
mod generic;

pub use capabilities::{BASE_RPC, Capabilities};
pub use generic::GenericCliconf;

use std::future::Future;

use crate::config::{ConfigDiff, DiffRequest};
use crate::driver::{Response, SendOptions};
use crate::error::Result;
use crate::facts::DeviceInfo;

/// What happened to an `edit_config` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditOutcome {
    /// This platform does not push configuration; nothing was written.
    Unsupported,
}

/// Operations exposed to an automation layer for one device session.
pub trait Cliconf: Send {
    /// Clear one-time banners so the session sits at a device prompt.
    fn on_open_shell(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and return its output.
    fn get(
        &mut self,
        command: &str,
        options: SendOptions,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Collect structured device facts.
    fn get_device_info(&mut self) -> impl Future<Output = Result<DeviceInfo>> + Send;

    /// Fetch the running configuration.
    fn get_config(
        &mut self,
        source: Option<&str>,
        format: Option<&str>,
        flags: &[String],
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Push configuration commands.
    fn edit_config(
        &mut self,
        commands: &[String],
    ) -> impl Future<Output = Result<EditOutcome>> + Send;

    /// Compute the commands that move a running configuration to a candidate.
    fn get_diff(&self, request: &DiffRequest) -> Result<ConfigDiff>;

    /// JSON description of the supported operations and the device.
    fn get_capabilities(&mut self) -> impl Future<Output = Result<String>> + Send;
}
