//! Session bootstrap: clearing one-time banners on a fresh shell.
//!
//! A RouterOS login can stop at a license question or a "press Enter"
//! notice before the first real prompt. `on_open_shell` runs once after the
//! channel is opened and leaves the session sitting at a device prompt.

use log::Level;

use super::command::{CliDriver, SendOptions};
use crate::channel::{Channel, PatternClass};
use crate::error::{Error, Result, SessionBootstrapError};

impl<C: Channel> CliDriver<C> {
    /// Bring a freshly opened shell to its first device prompt.
    ///
    /// If the last seen prompt already ends in `>` nothing is written.
    /// Otherwise a bare newline is sent for each pending banner, up to
    /// [`DriverConfig::max_banner_keystrokes`](super::DriverConfig::max_banner_keystrokes).
    /// A transport failure on the way becomes
    /// [`SessionBootstrapError::LicensePrompt`].
    pub async fn on_open_shell(&mut self) -> Result<()> {
        let prompt = match self.last_prompt() {
            Some(prompt) => prompt.to_string(),
            None => {
                let exchange = self
                    .read_until_terminal(&SendOptions::default())
                    .await
                    .map_err(bootstrap_failure)?;
                exchange.terminal.text
            }
        };

        self.diagnostics()
            .emit(Level::Debug, format_args!("on_open_shell: '{}'", prompt));

        if prompt.trim().ends_with('>') {
            self.clear_buffer();
            return Ok(());
        }

        let attempts = self.config().max_banner_keystrokes;
        let mut last_prompt = prompt;
        for attempt in 1..=attempts {
            self.clear_buffer();
            self.write_line(b"", true).await.map_err(bootstrap_failure)?;
            let exchange = self
                .read_until_terminal(&SendOptions::default())
                .await
                .map_err(bootstrap_failure)?;

            self.diagnostics().emit(
                Level::Debug,
                format_args!(
                    "on_open_shell: keystroke {} reached {} '{}'",
                    attempt, exchange.terminal.class, exchange.terminal.text
                ),
            );

            if exchange.terminal.class == PatternClass::Prompt {
                self.clear_buffer();
                return Ok(());
            }
            last_prompt = exchange.terminal.text;
        }

        Err(SessionBootstrapError::PromptNotReached {
            attempts,
            last_prompt,
        }
        .into())
    }
}

/// Transport failures during bootstrap mean the banner could not be bypassed.
fn bootstrap_failure(err: Error) -> Error {
    match err {
        Error::Transport(source) => SessionBootstrapError::LicensePrompt { source }.into(),
        other => other,
    }
}
