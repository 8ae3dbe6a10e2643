//! Scripted channel that replays canned device output.
//!
//! Useful for exercising the driver without a device: output queued with
//! [`ReplayChannel::with_output`] is readable immediately, output attached to
//! an expected write with [`ReplayChannel::on_write`] becomes readable only
//! once that write happens.

use std::collections::VecDeque;

use super::Channel;
use crate::error::TransportError;

#[derive(Debug)]
struct Reply {
    expect: Vec<u8>,
    chunks: Vec<Vec<u8>>,
}

/// In-memory [`Channel`] driven by a script.
#[derive(Debug, Default)]
pub struct ReplayChannel {
    pending: VecDeque<Vec<u8>>,
    replies: VecDeque<Reply>,
    writes: Vec<Vec<u8>>,
    reads: usize,
}

impl ReplayChannel {
    /// Create an empty replay channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue output that is readable right away.
    pub fn with_output(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.pending.push_back(chunk.as_ref().to_vec());
        self
    }

    /// Release `chunks` once a write starting with `expect` is seen.
    ///
    /// Replies are consumed in order; a write that does not match the next
    /// reply is recorded and otherwise ignored.
    pub fn on_write<I, B>(mut self, expect: impl AsRef<[u8]>, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        self.replies.push_back(Reply {
            expect: expect.as_ref().to_vec(),
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
        });
        self
    }

    /// Every write seen so far, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Writes rendered as lossy UTF-8 strings.
    pub fn written_lines(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    /// Scripted replies that never saw their write.
    pub fn unused_replies(&self) -> usize {
        self.replies.len()
    }

    /// Number of successful reads.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Channel for ReplayChannel {
    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writes.push(data.to_vec());
        if self
            .replies
            .front()
            .is_some_and(|reply| data.starts_with(&reply.expect))
        {
            if let Some(reply) = self.replies.pop_front() {
                self.pending.extend(reply.chunks);
            }
        }
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        match self.pending.pop_front() {
            Some(chunk) => {
                self.reads += 1;
                Ok(chunk)
            }
            None => Err(TransportError::ScriptExhausted { reads: self.reads }),
        }
    }
}
