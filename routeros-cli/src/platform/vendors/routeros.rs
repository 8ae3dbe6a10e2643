//! MikroTik RouterOS platform definition.
//!
//! # Prompt Examples
//!
//! ```text
//! [admin@MikroTik] >                 # top level
//! [admin@MikroTik] /ip address>      # inside a menu
//! [admin@core-rtr.lab] > 
//! ```
//!
//! A fresh login may stop at one of these before the first prompt:
//!
//! ```text
//! Do you want to see the software license? [Y/n]:
//! Please press "Enter" to continue!
//! ```
//!
//! Errors are reported on their own line after the command echo:
//!
//! ```text
//! [admin@MikroTik] > /foo
//! bad command name foo (line 1 column 2)
//! ```

use crate::channel::PatternRegistry;
use crate::config::ParserOptions;
use crate::facts::{FactField, FactQuery};
use crate::platform::PlatformDefinition;

/// Registry name of this platform.
pub const PLATFORM_NAME: &str = "routeros";

/// Create the RouterOS platform definition.
///
/// Error patterns use `(?m)` so `^` anchors at the start of any output line,
/// and run to the end of the line so the whole device message is kept.
pub fn platform() -> PlatformDefinition {
    let patterns = PatternRegistry::new()
        .with_prompt(r"\[[\w\-.]+@[\w\-.]+\][^\r\n\[\]>]*>\s*$")
        .unwrap()
        .with_error(r"(?m)^bad command name[^\r\n]*")
        .unwrap()
        .with_error(r"(?m)^no such item[^\r\n]*")
        .unwrap()
        .with_error(r"(?m)^invalid value for[^\r\n]*")
        .unwrap()
        .with_error(r"(?m)^syntax error[^\r\n]*")
        .unwrap()
        .with_error(r"(?m)^expected end of command[^\r\n]*")
        .unwrap()
        .with_interactive_prompt(r#"Please press "Enter" to continue!\s*$"#)
        .unwrap()
        .with_interactive_prompt(r"Do you want to see the software license\? \[Y/n\]: ?\s*$")
        .unwrap();

    PlatformDefinition::new(PLATFORM_NAME)
        .with_network_os("RouterOS")
        .with_patterns(patterns)
        .with_fact_query(
            FactQuery::new("/system resource print", FactField::Version, r"version: (\S+)").unwrap(),
        )
        .with_fact_query(
            FactQuery::new("/system routerboard print", FactField::Model, r"(?m)model: (.+)$").unwrap(),
        )
        .with_fact_query(
            FactQuery::new("/system identity print", FactField::Hostname, r"(?m)name: (.+)$").unwrap(),
        )
        .with_config_command("/export compact")
        .with_parser(ParserOptions::routeros())
}
