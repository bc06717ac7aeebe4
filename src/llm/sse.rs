//! Minimal incremental SSE parsing for streaming provider responses.
//!
//! The body arrives as arbitrary byte chunks; events are separated by a blank
//! line. Bytes are buffered and only converted to text a whole event block at
//! a time, so multi-byte UTF-8 sequences split across chunk boundaries stay
//! intact.

/// Accumulates body chunks and yields complete event blocks.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buf: Vec<u8>,
}

impl SseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete event block (without its terminating blank line), or
    /// `None` until one has fully arrived.
    pub fn next_event_block(&mut self) -> Option<String> {
        let (index, sep_len) = match (
            find_subslice(&self.buf, b"\r\n\r\n"),
            find_subslice(&self.buf, b"\n\n"),
        ) {
            (Some(crlf), Some(lf)) if crlf < lf => (crlf, 4),
            (Some(crlf), None) => (crlf, 4),
            (_, Some(lf)) => (lf, 2),
            (None, None) => return None,
        };

        let block = String::from_utf8_lossy(&self.buf[..index]).into_owned();
        self.buf.drain(..index + sep_len);
        Some(block)
    }
}

/// Payloads of the `data:` lines in one event block.
pub fn parse_data_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
