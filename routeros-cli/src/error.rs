//! Error types for routeros-cli.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for routeros-cli operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Channel-level I/O failures
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Failures while clearing interactive banners on a fresh session
    #[error("Session bootstrap error: {0}")]
    Bootstrap(#[from] SessionBootstrapError),

    /// The device answered a command with error output
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Driver construction and usage errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Configuration parsing and diff errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON encoding of a structured result failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transport layer errors surfaced by a [`Channel`](crate::channel::Channel).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH protocol error on the underlying channel
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Channel was closed by the peer
    #[error("Channel disconnected")]
    Disconnected,

    /// No data arrived within the channel's read timeout
    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A replay channel ran out of scripted output
    #[error("Replay script exhausted after {reads} reads")]
    ScriptExhausted { reads: usize },
}

/// Errors raised while bootstrapping a freshly opened shell.
#[derive(Error, Debug)]
pub enum SessionBootstrapError {
    /// The transport failed while a license or continuation banner was pending.
    #[error("unable to bypass license prompt")]
    LicensePrompt {
        #[source]
        source: TransportError,
    },

    /// Interactive banners kept coming after every allowed keystroke.
    #[error("device prompt not reached after {attempts} keystrokes, last prompt: '{last_prompt}'")]
    PromptNotReached { attempts: usize, last_prompt: String },
}

/// The device reported an error for a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{command}' failed: {matched}")]
pub struct CommandError {
    /// The command that was sent.
    pub command: String,

    /// The device output line that matched an error pattern.
    pub matched: String,
}

/// Driver layer errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Platform name not present in the registry
    #[error("Unknown platform: '{name}'")]
    UnknownPlatform { name: String },
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A pattern in the platform definition does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Platform already registered under this name
    #[error("Platform '{name}' already registered")]
    AlreadyRegistered { name: String },
}

/// Configuration parsing and diff errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A `diff_ignore_lines` entry is not a valid regex
    #[error("Invalid ignore-line pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Unrecognised diff match mode
    #[error("Unknown diff match mode '{0}', expected one of line, strict, exact, none")]
    UnknownDiffMatch(String),

    /// Unrecognised diff replace mode
    #[error("Unknown diff replace mode '{0}', expected one of line, block")]
    UnknownDiffReplace(String),

    /// Unrecognised dump format
    #[error("Unknown dump format '{0}', expected one of commands, block, raw")]
    UnknownFormat(String),
}

/// Result type alias using routeros-cli's Error.
pub type Result<T> = std::result::Result<T, Error>;
