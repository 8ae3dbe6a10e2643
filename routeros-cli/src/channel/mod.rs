//! Channel layer: the duplex text stream and pattern matching over it.
//!
//! The transport is owned by the caller. This crate only ever writes bytes
//! to a [`Channel`] and reads bytes back; it never opens, authenticates or
//! closes one.

mod buffer;
pub mod patterns;
mod replay;
mod ssh;

pub use buffer::PatternBuffer;
pub use patterns::{PatternClass, PatternMatch, PatternRegistry, TerminalPattern};
pub use replay::ReplayChannel;
pub use ssh::SshChannel;

use std::future::Future;

use crate::error::TransportError;

/// An already-open, already-authenticated duplex text channel.
///
/// `read` blocks until at least one chunk is available. Timeouts are the
/// implementation's business and surface as [`TransportError::Timeout`].
pub trait Channel: Send {
    /// Write raw bytes to the device.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Read the next chunk of output from the device.
    fn read(&mut self) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
