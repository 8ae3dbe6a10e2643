//! Terminal pattern registry.
//!
//! A [`PatternRegistry`] holds three ordered pattern sets:
//!
//! - **prompt** patterns, matching a quiescent device prompt at the end of output
//! - **error** patterns, matching device error lines anywhere in fresh output
//! - **interactive prompt** patterns, matching one-time banners that need a keystroke
//!
//! Within a set the first matching pattern wins. Error patterns are checked
//! independently of the others and take precedence, since they mean the
//! command failed even when a prompt follows.

use std::fmt;
use std::ops::Range;

use regex::bytes::Regex;

use super::buffer::PatternBuffer;
use crate::error::PlatformError;

/// Classification tag of a terminal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternClass {
    /// Device prompt, the shell is ready for the next command.
    Prompt,
    /// Device error output.
    Error,
    /// One-time interactive banner (license, "press Enter").
    InteractivePrompt,
}

impl fmt::Display for PatternClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternClass::Prompt => "prompt",
            PatternClass::Error => "error",
            PatternClass::InteractivePrompt => "interactive_prompt",
        };
        f.write_str(name)
    }
}

/// A compiled pattern plus its classification.
#[derive(Debug, Clone)]
pub struct TerminalPattern {
    class: PatternClass,
    regex: Regex,
}

impl TerminalPattern {
    /// Compile a new terminal pattern.
    pub fn new(class: PatternClass, pattern: &str) -> Result<Self, PlatformError> {
        let regex = Regex::new(pattern).map_err(|source| PlatformError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { class, regex })
    }

    /// The classification tag.
    pub fn class(&self) -> PatternClass {
        self.class
    }

    /// The underlying regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Check if the pattern matches anywhere in `data`.
    pub fn is_match(&self, data: &[u8]) -> bool {
        self.regex.is_match(data)
    }
}

/// A pattern hit inside a [`PatternBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Class of the pattern that matched.
    pub class: PatternClass,

    /// Absolute byte range of the match in the buffer.
    pub range: Range<usize>,

    /// Matched text, lossy UTF-8 with surrounding whitespace trimmed.
    pub text: String,
}

impl PatternMatch {
    fn new(class: PatternClass, range: Range<usize>, data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(&data[range.clone()]).trim().to_string();
        Self { class, range, text }
    }
}

/// Ordered prompt, error and interactive prompt patterns for one device family.
///
/// Immutable once built; share it between sessions through an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    prompts: Vec<TerminalPattern>,
    errors: Vec<TerminalPattern>,
    interactive: Vec<TerminalPattern>,
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a prompt pattern.
    pub fn with_prompt(mut self, pattern: &str) -> Result<Self, PlatformError> {
        self.prompts
            .push(TerminalPattern::new(PatternClass::Prompt, pattern)?);
        Ok(self)
    }

    /// Append an error pattern.
    pub fn with_error(mut self, pattern: &str) -> Result<Self, PlatformError> {
        self.errors
            .push(TerminalPattern::new(PatternClass::Error, pattern)?);
        Ok(self)
    }

    /// Append an interactive prompt pattern.
    pub fn with_interactive_prompt(mut self, pattern: &str) -> Result<Self, PlatformError> {
        self.interactive
            .push(TerminalPattern::new(PatternClass::InteractivePrompt, pattern)?);
        Ok(self)
    }

    /// Prompt patterns in priority order.
    pub fn prompt_patterns(&self) -> &[TerminalPattern] {
        &self.prompts
    }

    /// Error patterns in priority order.
    pub fn error_patterns(&self) -> &[TerminalPattern] {
        &self.errors
    }

    /// Interactive prompt patterns in priority order.
    pub fn interactive_prompt_patterns(&self) -> &[TerminalPattern] {
        &self.interactive
    }

    /// First error pattern matching output from the line containing `from`
    /// onwards.
    ///
    /// Unlike terminal patterns, errors are not limited to the tail window:
    /// an error line followed by a long trailer still counts.
    pub fn find_error(&self, buffer: &PatternBuffer, from: usize) -> Option<PatternMatch> {
        self.errors.iter().find_map(|p| {
            buffer
                .search_from_line(p.regex(), from)
                .map(|range| PatternMatch::new(p.class(), range, buffer.as_slice()))
        })
    }

    /// First prompt or interactive prompt matching the buffer tail.
    ///
    /// Device prompts are checked before interactive banners.
    pub fn find_terminal(&self, buffer: &PatternBuffer) -> Option<PatternMatch> {
        Self::first_match(&self.prompts, buffer)
            .or_else(|| Self::first_match(&self.interactive, buffer))
    }

    fn first_match(patterns: &[TerminalPattern], buffer: &PatternBuffer) -> Option<PatternMatch> {
        patterns.iter().find_map(|p| {
            buffer
                .search_tail(p.regex())
                .map(|range| PatternMatch::new(p.class(), range, buffer.as_slice()))
        })
    }
}
