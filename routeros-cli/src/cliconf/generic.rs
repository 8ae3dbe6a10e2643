//! [`Cliconf`] over a [`CliDriver`].

use log::Level;

use super::{Capabilities, Cliconf, EditOutcome};
use crate::channel::Channel;
use crate::config::{self, ConfigDiff, DiffRequest};
use crate::driver::{CliDriver, Response, SendOptions};
use crate::error::Result;
use crate::facts::{self, DeviceInfo};

/// Cliconf implementation driven entirely by the driver's platform definition.
///
/// # Example
///
/// ```rust
/// use routeros_cli::channel::ReplayChannel;
/// use routeros_cli::cliconf::{Cliconf, GenericCliconf};
/// use routeros_cli::config::DiffRequest;
/// use routeros_cli::driver::DriverBuilder;
///
/// # fn example() -> Result<(), routeros_cli::Error> {
/// let driver = DriverBuilder::new(ReplayChannel::new())
///     .platform("routeros")
///     .build()?;
/// let cliconf = GenericCliconf::new(driver);
///
/// let diff = cliconf.get_diff(&DiffRequest::new("/system identity\nset name=R1"))?;
/// assert_eq!(diff.config_diff, "/system identity\nset name=R1");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct GenericCliconf<C> {
    driver: CliDriver<C>,
}

impl<C: Channel> GenericCliconf<C> {
    /// Wrap a built driver.
    pub fn new(driver: CliDriver<C>) -> Self {
        Self { driver }
    }

    /// The underlying driver.
    pub fn driver(&self) -> &CliDriver<C> {
        &self.driver
    }

    /// Mutable access to the underlying driver.
    pub fn driver_mut(&mut self) -> &mut CliDriver<C> {
        &mut self.driver
    }

    /// Unwrap into the underlying driver.
    pub fn into_driver(self) -> CliDriver<C> {
        self.driver
    }
}

impl<C: Channel> Cliconf for GenericCliconf<C> {
    async fn on_open_shell(&mut self) -> Result<()> {
        self.driver.on_open_shell().await
    }

    async fn get(&mut self, command: &str, options: SendOptions) -> Result<Response> {
        self.driver.send(command, options).await
    }

    async fn get_device_info(&mut self) -> Result<DeviceInfo> {
        facts::get_device_info(&mut self.driver).await
    }

    /// Runs the platform's export command; `source`, `format` and `flags`
    /// do not change what is fetched.
    async fn get_config(
        &mut self,
        source: Option<&str>,
        format: Option<&str>,
        flags: &[String],
    ) -> Result<Vec<u8>> {
        if source.is_some() || format.is_some() || !flags.is_empty() {
            self.driver.diagnostics().emit(
                Level::Debug,
                format_args!(
                    "get_config: ignoring source={:?} format={:?} flags={:?}",
                    source, format, flags
                ),
            );
        }

        let command = self.driver.platform().config_command.clone();
        let response = self.driver.get(&command).await?;
        Ok(response.into_bytes())
    }

    async fn edit_config(&mut self, commands: &[String]) -> Result<EditOutcome> {
        self.driver.diagnostics().emit(
            Level::Debug,
            format_args!(
                "edit_config: {} does not push configuration, {} commands dropped",
                self.driver.platform().name,
                commands.len()
            ),
        );
        Ok(EditOutcome::Unsupported)
    }

    fn get_diff(&self, request: &DiffRequest) -> Result<ConfigDiff> {
        Ok(config::diff(request, &self.driver.platform().parser)?)
    }

    async fn get_capabilities(&mut self) -> Result<String> {
        let device_info = self.get_device_info().await?;
        Ok(serde_json::to_string(&Capabilities::new(device_info))?)
    }
}
