//! Command/response driver.
//!
//! [`CliDriver`] writes a command, then reads until a terminal pattern shows
//! up in the tail of the accumulated output:
//!
//! 1. a caller-supplied question (see [`SendOptions::with_prompt`]) gets its
//!    answer written and reading continues;
//! 2. the first device error line is latched;
//! 3. a device prompt or interactive banner completes the exchange, and a
//!    latched error turns it into a [`CommandError`].
//!
//! Waiting for the prompt after an error keeps the channel clean for the next
//! command. There is no timeout or retry here; a read blocks until the
//! channel yields data or fails.

use std::sync::Arc;
use std::time::Instant;

use log::Level;
use regex::bytes::Regex;

use super::builder::DriverConfig;
use super::response::Response;
use crate::channel::{Channel, PatternBuffer, PatternMatch, PatternRegistry};
use crate::diagnostics::Diagnostics;
use crate::error::{CommandError, PlatformError, Result};
use crate::platform::PlatformDefinition;

/// A caller-supplied question and the answer to give it.
#[derive(Debug, Clone)]
pub struct PromptAnswer {
    /// Pattern identifying the question.
    pub pattern: Regex,

    /// Text written when the pattern shows up.
    pub answer: String,
}

/// Options for [`CliDriver::send`].
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// One-shot questions to answer while waiting for the prompt.
    pub prompts: Vec<PromptAnswer>,

    /// Write the command and return without reading.
    pub send_only: bool,

    /// Append the return sequence to the command and to answers.
    pub newline: bool,

    /// Keep the matched device prompt at the end of the result.
    pub check_all_prompts: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            send_only: false,
            newline: true,
            check_all_prompts: false,
        }
    }
}

impl SendOptions {
    /// Default options: wait for the prompt, append a newline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `answer` when `pattern` appears before the prompt.
    pub fn with_prompt(
        mut self,
        pattern: &str,
        answer: impl Into<String>,
    ) -> std::result::Result<Self, PlatformError> {
        let regex = Regex::new(pattern).map_err(|source| PlatformError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.prompts.push(PromptAnswer {
            pattern: regex,
            answer: answer.into(),
        });
        Ok(self)
    }

    /// Do not wait for any output.
    pub fn send_only(mut self) -> Self {
        self.send_only = true;
        self
    }

    /// Do not append the return sequence.
    pub fn no_newline(mut self) -> Self {
        self.newline = false;
        self
    }

    /// Keep the trailing prompt in the result.
    pub fn check_all_prompts(mut self) -> Self {
        self.check_all_prompts = true;
        self
    }
}

/// Outcome of reading until a terminal pattern.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub(crate) terminal: PatternMatch,
    pub(crate) error: Option<PatternMatch>,
}

/// Sequential command driver over one [`Channel`].
///
/// Every operation takes `&mut self`, so only one command can be in flight.
pub struct CliDriver<C> {
    channel: C,
    platform: Arc<PlatformDefinition>,
    config: DriverConfig,
    buffer: PatternBuffer,
    diagnostics: Arc<dyn Diagnostics>,
    last_prompt: Option<String>,
}

impl<C: Channel> CliDriver<C> {
    /// Create a driver. Prefer [`DriverBuilder`](super::DriverBuilder).
    pub fn new(
        channel: C,
        platform: Arc<PlatformDefinition>,
        config: DriverConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            buffer: PatternBuffer::new(config.search_depth),
            channel,
            platform,
            config,
            diagnostics,
            last_prompt: None,
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// The pattern registry in use.
    pub fn patterns(&self) -> &PatternRegistry {
        &self.platform.patterns
    }

    /// Get the driver configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get a reference to the channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Get a mutable reference to the channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Release the channel back to the connection layer.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// The last terminal text seen (device prompt or banner).
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    pub(crate) fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    /// Feed output the connection layer already read from the channel.
    ///
    /// If it ends in a prompt or banner, that becomes the last prompt.
    pub fn seed_output(&mut self, data: &[u8]) {
        self.buffer.extend(data);
        if let Some(terminal) = self.platform.patterns.find_terminal(&self.buffer) {
            self.diagnostics.emit(
                Level::Debug,
                format_args!("seeded {} bytes ending in {} '{}'", data.len(), terminal.class, terminal.text),
            );
            self.last_prompt = Some(terminal.text);
            self.buffer.clear();
        }
    }

    /// Send a command with default options and wait for the prompt.
    pub async fn get(&mut self, command: &str) -> Result<Response> {
        self.send(command, SendOptions::default()).await
    }

    /// Send multiple commands sequentially, stopping at the first failure.
    pub async fn send_commands(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for cmd in commands {
            responses.push(self.get(cmd).await?);
        }
        Ok(responses)
    }

    /// Send a command and wait for the device prompt.
    pub async fn send(&mut self, command: &str, options: SendOptions) -> Result<Response> {
        let start = Instant::now();

        self.buffer.clear();
        self.write_line(command.as_bytes(), options.newline).await?;

        if options.send_only {
            return Ok(Response::sent_only(command, start.elapsed()));
        }

        let exchange = self.read_until_terminal(&options).await?;

        if let Some(error) = &exchange.error {
            // report the whole device line, not just the pattern hit
            let matched = String::from_utf8_lossy(self.buffer.line_at(error.range.start))
                .trim()
                .to_string();
            self.buffer.clear();
            self.diagnostics.emit(
                Level::Debug,
                format_args!("command {:?} failed: {}", command, matched),
            );
            return Err(CommandError {
                command: command.to_string(),
                matched,
            }
            .into());
        }

        let raw = self.buffer.take();

        let end = if options.check_all_prompts {
            raw.len()
        } else {
            exchange.terminal.range.start
        };
        let raw_result = String::from_utf8_lossy(&raw).into_owned();
        let result = normalize_output(&String::from_utf8_lossy(&raw[..end]), command);

        Ok(Response::new(
            command,
            result,
            raw_result,
            exchange.terminal.text,
            exchange.terminal.class,
            start.elapsed(),
        ))
    }

    /// Write `data`, followed by the return sequence if `newline` is set.
    pub(crate) async fn write_line(&mut self, data: &[u8], newline: bool) -> Result<()> {
        let mut payload = Vec::with_capacity(data.len() + self.config.return_char.len());
        payload.extend_from_slice(data);
        if newline {
            payload.extend_from_slice(self.config.return_char.as_bytes());
        }
        self.diagnostics.emit(
            Level::Trace,
            format_args!("write: {:?}", String::from_utf8_lossy(&payload)),
        );
        self.channel.write(&payload).await?;
        Ok(())
    }

    /// Read until a device prompt or interactive banner is found.
    ///
    /// The buffer is not cleared first, so output seeded or read earlier
    /// counts towards the match.
    pub(crate) async fn read_until_terminal(&mut self, options: &SendOptions) -> Result<Exchange> {
        let platform = Arc::clone(&self.platform);
        let registry = &platform.patterns;
        let mut answered = vec![false; options.prompts.len()];
        let mut error: Option<PatternMatch> = None;

        loop {
            let chunk = self.channel.read().await?;
            self.diagnostics.emit(
                Level::Trace,
                format_args!("read {} bytes, buffer {} bytes", chunk.len(), self.buffer.len() + chunk.len()),
            );
            let appended_at = self.buffer.len();
            self.buffer.extend(&chunk);

            // scan every new chunk before any answer fences the buffer off
            if error.is_none() {
                error = registry.find_error(&self.buffer, appended_at);
            }

            let question = options
                .prompts
                .iter()
                .enumerate()
                .find(|(idx, p)| !answered[*idx] && self.buffer.tail_contains(&p.pattern))
                .map(|(idx, p)| (idx, p.answer.clone()));

            if let Some((idx, answer)) = question {
                answered[idx] = true;
                self.diagnostics.emit(
                    Level::Debug,
                    format_args!("answering prompt {:?}", options.prompts[idx].pattern.as_str()),
                );
                self.write_line(answer.as_bytes(), options.newline).await?;
                self.buffer.mark_consumed();
                continue;
            }

            if let Some(terminal) = registry.find_terminal(&self.buffer) {
                self.diagnostics.emit(
                    Level::Debug,
                    format_args!("matched {} '{}'", terminal.class, terminal.text),
                );
                for (idx, done) in answered.iter().enumerate() {
                    if !done {
                        self.diagnostics.emit(
                            Level::Warn,
                            format_args!(
                                "prompt {:?} never appeared",
                                options.prompts[idx].pattern.as_str()
                            ),
                        );
                    }
                }
                self.last_prompt = Some(terminal.text.clone());
                return Ok(Exchange { terminal, error });
            }
        }
    }

    /// Drop any buffered output.
    pub(crate) fn clear_buffer(&mut self) {
        self.buffer.clear();
    }
}

/// Strip carriage returns, the echoed command line and surrounding blank lines.
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    let cleaned = raw.replace('\r', "");
    let mut body = cleaned.as_str();

    let command = command.trim();
    if !command.is_empty() {
        let first_end = body.find('\n').unwrap_or(body.len());
        if body[..first_end].trim_end().ends_with(command) {
            body = body.get(first_end + 1..).unwrap_or("");
        }
    }

    body.trim_start_matches('\n').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{PatternClass, ReplayChannel};
    use crate::diagnostics::MemoryDiagnostics;
    use crate::error::{Error, TransportError};
    use crate::platform::vendors::routeros;

    fn driver(channel: ReplayChannel) -> CliDriver<ReplayChannel> {
        CliDriver::new(
            channel,
            Arc::new(routeros::platform()),
            DriverConfig::default(),
            Arc::new(MemoryDiagnostics::new()),
        )
    }

    #[test]
    fn test_normalize_strips_echo_and_blank_lines() {
        let raw = "[admin@R] > /system identity print\r\n\r\n  name: R\r\n\r\n";
        assert_eq!(normalize_output(raw, "/system identity print"), "  name: R");
    }

    #[test]
    fn test_normalize_keeps_output_without_echo() {
        assert_eq!(normalize_output("line one\nline two\n", "/foo"), "line one\nline two");
        assert_eq!(normalize_output("", "/foo"), "");
    }

    #[test]
    fn test_send_returns_output_before_prompt() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new()
                .on_write("/system clock print", ["time: 10:00:00\r\n", "[admin@Router] > "]);
            let mut driver = driver(channel);

            let response = driver.get("/system clock print").await.unwrap();
            assert_eq!(response.result, "time: 10:00:00");
            assert_eq!(response.prompt, "[admin@Router] >");
            assert_eq!(response.matched, Some(PatternClass::Prompt));
            assert!(!response.result.contains("[admin@Router]"));
            assert_eq!(driver.last_prompt(), Some("[admin@Router] >"));
            assert_eq!(driver.channel().written_lines(), vec!["/system clock print\n"]);
        });
    }

    #[test]
    fn test_prompt_split_across_reads() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new()
                .on_write("/ping", ["sent=1\r\n[admin@Rou", "ter] > "]);
            let mut driver = driver(channel);

            let response = driver.get("/ping").await.unwrap();
            assert_eq!(response.result, "sent=1");
        });
    }

    #[test]
    fn test_error_waits_for_prompt() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new().on_write(
                "/foo",
                [
                    "bad command name foo (line 1 column 2)\r\n",
                    "more noise\r\n",
                    "[admin@Router] > ",
                ],
            );
            let mut driver = driver(channel);

            let err = driver.get("/foo").await.unwrap_err();
            match err {
                Error::Command(CommandError { command, matched }) => {
                    assert_eq!(command, "/foo");
                    assert_eq!(matched, "bad command name foo (line 1 column 2)");
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(driver.channel().reads(), 3);
        });
    }

    #[test]
    fn test_error_followed_by_long_trailer() {
        tokio_test::block_on(async {
            let output = format!(
                "bad command name foo (line 1 column 2)\r\n{}\r\n[admin@R] > ",
                "x".repeat(1200)
            );
            let channel = ReplayChannel::new().on_write("/foo", [output]);
            let mut driver = driver(channel);

            let err = driver.get("/foo").await.unwrap_err();
            assert!(matches!(
                err,
                Error::Command(CommandError { ref matched, .. })
                    if matched == "bad command name foo (line 1 column 2)"
            ));
        });
    }

    #[test]
    fn test_error_mid_chunk_with_more_output() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new().on_write(
                "/ip address add address=10.0.0.1/33",
                [
                    "/ip address add address=10.0.0.1/33\r\ninvalid value for argument address\r\n    while resolving ip-address\r\n",
                    "[admin@R] > ",
                ],
            );
            let mut driver = driver(channel);

            let err = driver
                .get("/ip address add address=10.0.0.1/33")
                .await
                .unwrap_err();
            match err {
                Error::Command(CommandError { matched, .. }) => {
                    assert_eq!(matched, "invalid value for argument address");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        });
    }

    #[test]
    fn test_error_in_same_read_as_answered_prompt() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new()
                .on_write("/foo", ["invalid value for argument foo\r\nContinue? [y/N]: "])
                .on_write("y", ["\r\n[admin@R] > "]);
            let mut driver = driver(channel);

            let options = SendOptions::new().with_prompt(r"\[y/N\]:", "y").unwrap();
            let err = driver.send("/foo", options).await.unwrap_err();
            assert!(matches!(
                err,
                Error::Command(CommandError { ref matched, .. })
                    if matched == "invalid value for argument foo"
            ));
            assert_eq!(driver.channel().written_lines(), vec!["/foo\n", "y\n"]);
        });
    }

    #[test]
    fn test_quoted_error_text_is_not_an_error() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new().on_write(
                "/ip address print",
                ["0 ;;; \"bad command name\" test\r\n   10.0.0.1/24\r\n[admin@R] > "],
            );
            let mut driver = driver(channel);

            let response = driver.get("/ip address print").await.unwrap();
            assert!(response.result.contains("10.0.0.1/24"));
        });
    }

    #[test]
    fn test_error_reports_whole_line() {
        tokio_test::block_on(async {
            let patterns = PatternRegistry::new()
                .with_prompt(r"\[\w+@\w+\] >\s*$")
                .unwrap()
                .with_error(r"(?m)^failure:")
                .unwrap();
            let platform = PlatformDefinition::new("lab").with_patterns(patterns);
            let channel = ReplayChannel::new()
                .on_write("/tool fetch", ["failure: connection refused\r\n[admin@R] > "]);
            let mut driver = CliDriver::new(
                channel,
                Arc::new(platform),
                DriverConfig::default(),
                Arc::new(MemoryDiagnostics::new()),
            );

            let err = driver.get("/tool fetch").await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Command error: '/tool fetch' failed: failure: connection refused"
            );
        });
    }

    #[test]
    fn test_caller_prompt_answered_once() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new()
                .on_write("/system reboot", ["Reboot, yes? [y/N]: "])
                .on_write("y", ["\r\nsystem will reboot shortly\r\n[admin@Router] > "]);
            let mut driver = driver(channel);

            let options = SendOptions::new()
                .with_prompt(r"\[y/N\]:", "y")
                .unwrap()
                .no_newline();
            let response = driver.send("/system reboot", options).await.unwrap();

            assert_eq!(driver.channel().written_lines(), vec!["/system reboot", "y"]);
            assert!(response.result.contains("system will reboot shortly"));
        });
    }

    #[test]
    fn test_send_only_does_not_read() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayChannel::new());
            let response = driver
                .send("/quit", SendOptions::new().send_only())
                .await
                .unwrap();

            assert!(response.matched.is_none());
            assert_eq!(driver.channel().reads(), 0);
        });
    }

    #[test]
    fn test_check_all_prompts_keeps_prompt() {
        tokio_test::block_on(async {
            let channel = ReplayChannel::new().on_write("/log print", ["no entries\r\n[admin@R] > "]);
            let mut driver = driver(channel);

            let response = driver
                .send("/log print", SendOptions::new().check_all_prompts())
                .await
                .unwrap();
            assert_eq!(response.result, "no entries\n[admin@R] >");
        });
    }

    #[test]
    fn test_transport_failure_propagates() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayChannel::new());
            let err = driver.get("/system resource print").await.unwrap_err();
            assert!(matches!(
                err,
                Error::Transport(TransportError::ScriptExhausted { reads: 0 })
            ));
        });
    }

    #[test]
    fn test_invalid_caller_prompt() {
        assert!(SendOptions::new().with_prompt("(", "y").is_err());
    }
}
