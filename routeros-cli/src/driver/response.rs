//! Response type for command execution results.

use std::time::Duration;

use crate::channel::PatternClass;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (normalized - command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before normalization, ANSI sequences already stripped.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Class of the terminal pattern that completed the exchange.
    ///
    /// `None` for fire-and-forget sends.
    pub matched: Option<PatternClass>,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        matched: PatternClass,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            matched: Some(matched),
            elapsed,
        }
    }

    /// Response for a command that was written without waiting for output.
    pub fn sent_only(command: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            result: String::new(),
            raw_result: String::new(),
            prompt: String::new(),
            matched: None,
            elapsed,
        }
    }

    /// Whether the exchange ended on an interactive banner instead of a device prompt.
    pub fn ended_on_banner(&self) -> bool {
        self.matched == Some(PatternClass::InteractivePrompt)
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }

    /// Consume the response, returning the normalized output as bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.result.into_bytes()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
