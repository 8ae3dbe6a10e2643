//! [`Channel`] adapter over an interactive russh session channel.
//!
//! The caller connects, authenticates, requests the PTY and the shell; this
//! adapter only moves bytes. It owns the read timeout, which is the single
//! bound on how long the driver waits for a prompt.

use std::time::Duration;

use russh::ChannelMsg;
use russh::client::Msg;

use super::Channel;
use crate::error::TransportError;

/// A russh shell channel wrapped as a [`Channel`].
pub struct SshChannel {
    channel: russh::Channel<Msg>,
    read_timeout: Duration,
}

impl SshChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: russh::Channel<Msg>, read_timeout: Duration) -> Self {
        Self {
            channel,
            read_timeout,
        }
    }

    /// Get the read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Set the read timeout.
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    /// Unwrap the russh channel, e.g. to close it.
    pub fn into_inner(self) -> russh::Channel<Msg> {
        self.channel
    }
}

impl Channel for SshChannel {
    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.channel.data(data).await?;
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let deadline = tokio::time::Instant::now() + self.read_timeout;
        loop {
            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| TransportError::Timeout(self.read_timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => return Ok(data.to_vec()),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => return Ok(data.to_vec()),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(TransportError::Disconnected);
                }
                // window adjustments, exit status and friends carry no output
                Some(_) => continue,
            }
        }
    }
}
