//! Command/response driver and session bootstrap.
//!
//! The driver owns the caller's [`Channel`](crate::channel::Channel) for the
//! lifetime of the session and runs one exchange at a time over it.

mod bootstrap;
mod builder;
mod command;
pub(crate) mod response;

pub use builder::{DriverBuilder, DriverConfig};
pub use command::{CliDriver, PromptAnswer, SendOptions};
pub use response::Response;
