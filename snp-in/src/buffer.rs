//! This submodule accumulates raw chunks and hands out whole lines.
//!
//! Chunk boundaries fall wherever the transport likes, so a line (or a data row) can
//! arrive split across any number of `receive` calls. The buffer keeps the bytes after
//! the last newline until more input arrives; only at end-of-input is the remainder
//! processed as a final line.

/// A byte accumulator that normalizes while it copies.
///
/// Touchstone directives are case-insensitive, tab is equivalent to space and a
/// carriage return is equivalent to a newline. All three normalizations are bytewise,
/// so applying them as the chunk is appended gives the same result as rewriting the
/// whole buffer on every delivery.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    buf: Vec<u8>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        ChunkBuffer { buf: Vec::new() }
    }

    /// Append one chunk, uppercasing and mapping `\t` to space and `\r` to `\n`.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.reserve(chunk.len());
        for &byte in chunk {
            self.buf.push(match byte {
                b'\t' => b' ',
                b'\r' => b'\n',
                _ => byte.to_ascii_uppercase(),
            });
        }
    }

    /// Drain the complete lines, leaving the partial tail in place.
    ///
    /// With `at_end` the whole buffer is taken, trailing newline or not. The returned
    /// lines are raw: comments and surrounding whitespace are still on them.
    pub fn take_lines(&mut self, at_end: bool) -> Vec<String> {
        let cut = if at_end {
            self.buf.len()
        } else {
            match self.buf.iter().rposition(|&b| b == b'\n') {
                Some(idx) => idx + 1,
                None => return Vec::new(),
            }
        };
        if cut == 0 {
            return Vec::new();
        }
        let complete: Vec<u8> = self.buf.drain(..cut).collect();
        complete
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Throw away everything, complete or not.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Cut a raw line down to its meaningful part.
///
/// Everything from the first `!` on is a comment; what remains is trimmed. An empty
/// result means the line carried nothing.
pub fn strip_comment(line: &str) -> &str {
    let line = match line.find('!') {
        Some(idx) => &line[..idx],
        None => line,
    };
    line.trim()
}
