//! Platform definitions for device families.
//!
//! A [`PlatformDefinition`] is plain data: the terminal patterns, the fact
//! queries, the configuration export command and the parser settings for one
//! family of devices. The driver and the cliconf layer read everything
//! family-specific from it, so adding a family means adding a definition
//! rather than a new driver type.

mod definition;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use registry::PlatformRegistry;
