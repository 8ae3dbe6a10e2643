//! Pattern buffer with tail-window search.
//!
//! Only the last `search_depth` bytes of the output accumulated for the
//! current exchange are searched for terminal patterns; error patterns are
//! searched line by line from where new output was appended. Output that was
//! already acted on (for example a confirmation question that has been
//! answered) can be fenced off with [`PatternBuffer::mark_consumed`] so it
//! never triggers a second match.

use std::ops::Range;

use regex::bytes::Regex;

/// Buffer for accumulating output and searching its tail for patterns.
#[derive(Debug)]
pub struct PatternBuffer {
    /// The accumulated output buffer.
    buffer: Vec<u8>,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Offset before which output is never searched again.
    consumed: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth,
            consumed: 0,
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// Absolute offset where the search window starts.
    pub fn tail_start(&self) -> usize {
        self.buffer
            .len()
            .saturating_sub(self.search_depth)
            .max(self.consumed)
    }

    /// The searchable tail of the buffer.
    pub fn tail(&self) -> &[u8] {
        &self.buffer[self.tail_start()..]
    }

    /// Search the tail for `pattern`.
    ///
    /// The returned range is absolute, i.e. it indexes into [`as_slice`](Self::as_slice).
    pub fn search_tail(&self, pattern: &Regex) -> Option<Range<usize>> {
        let start = self.tail_start();
        pattern
            .find(&self.buffer[start..])
            .map(|m| start + m.start()..start + m.end())
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.search_tail(pattern).is_some()
    }

    /// Search from the start of the line containing `pos` to the end of the
    /// buffer, ignoring the search depth.
    ///
    /// Starting at a line boundary keeps `(?m)^` anchored to real line starts.
    /// Output before [`mark_consumed`](Self::mark_consumed) is not searched.
    pub fn search_from_line(&self, pattern: &Regex, pos: usize) -> Option<Range<usize>> {
        let pos = pos.min(self.buffer.len());
        let start = memchr::memrchr(b'\n', &self.buffer[..pos])
            .map_or(0, |i| i + 1)
            .max(self.consumed);
        pattern
            .find(&self.buffer[start..])
            .map(|m| start + m.start()..start + m.end())
    }

    /// Exclude everything received so far from future tail searches.
    pub fn mark_consumed(&mut self) {
        self.consumed = self.buffer.len();
    }

    /// The full line (without terminator) containing byte `pos`.
    pub fn line_at(&self, pos: usize) -> &[u8] {
        let pos = pos.min(self.buffer.len());
        let start = memchr::memrchr(b'\n', &self.buffer[..pos]).map_or(0, |i| i + 1);
        let end = memchr::memchr(b'\n', &self.buffer[pos..]).map_or(self.buffer.len(), |i| pos + i);
        let line = &self.buffer[start..end];
        line.strip_suffix(b"\r").unwrap_or(line)
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.consumed = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.consumed = 0;
    }

    /// Get the search depth setting.
    pub fn search_depth(&self) -> usize {
        self.search_depth
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Hello, world!");
        assert_eq!(buffer.as_slice(), b"Hello, world!");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[m\x1b[36m[admin@MikroTik] > \x1b[0m");
        assert_eq!(buffer.as_slice(), b"[admin@MikroTik] > ");
    }

    #[test]
    fn test_tail_search_absolute_range() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\n[admin@R] > ");

        let pattern = Regex::new(r"\[admin@R\] > $").unwrap();
        let range = buffer.search_tail(&pattern).unwrap();
        assert_eq!(&buffer.as_slice()[range], b"[admin@R] > ");
    }

    #[test]
    fn test_tail_search_not_in_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"[admin@R] >");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"\[admin@R\] >").unwrap();
        assert!(buffer.search_tail(&pattern).is_none());
        assert_eq!(buffer.search_from_line(&pattern, 0), Some(0..11));
    }

    #[test]
    fn test_search_from_line_anchors_at_line_start() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"add comment=\"bad command name\"\nbad comm");
        let appended = buffer.len();
        buffer.extend(b"and name foo\n");

        let pattern = Regex::new(r"(?m)^bad command name[^\r\n]*").unwrap();
        let range = buffer.search_from_line(&pattern, appended).unwrap();
        assert_eq!(&buffer.as_slice()[range], b"bad command name foo");

        let mut quoted = PatternBuffer::new(10);
        quoted.extend(b"add comment=\"");
        let appended = quoted.len();
        quoted.extend(b"bad command name\"\n");
        assert!(quoted.search_from_line(&pattern, appended).is_none());
    }

    #[test]
    fn test_mark_consumed_hides_old_output() {
        let mut buffer = PatternBuffer::new(1000);
        buffer.extend(b"Continue? [y/N]: ");

        let pattern = Regex::new(r"\[y/N\]").unwrap();
        assert!(buffer.tail_contains(&pattern));

        buffer.mark_consumed();
        assert!(!buffer.tail_contains(&pattern));

        buffer.extend(b"y\n[admin@R] > ");
        assert!(!buffer.tail_contains(&pattern));
        assert_eq!(buffer.tail(), b"y\n[admin@R] > ");
    }

    #[test]
    fn test_line_at() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"first\r\nbad command name foo (line 1 column 1)\r\n[admin@R] > ");

        let line = buffer.line_at(12);
        assert_eq!(line, b"bad command name foo (line 1 column 1)");
        assert_eq!(buffer.line_at(0), b"first");
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"test data");
        buffer.mark_consumed();
        assert_eq!(buffer.take(), b"test data");
        assert!(buffer.is_empty());
        assert_eq!(buffer.tail_start(), 0);
    }
}
