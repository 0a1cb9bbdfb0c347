//! Lexical primitives operating over a plain byte cursor.

use nom::bytes::complete::take_while;
use nom::IResult;

/// PDF whitespace: space, tab, CR, LF, form-feed (ISO 32000-1 Table 1).
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

pub(crate) fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

pub(crate) fn whitespace0(i: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while(is_whitespace)(i)
}

/// A forward-only cursor over a byte slice used by the recursive-descent
/// object parser. `peek_at` lets callers look ahead without consuming.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.buf.get(self.pos + offset).copied()
    }

    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skip a run of whitespace bytes, treating `%` comments (to end of
    /// line) as whitespace too. Returns the next non-whitespace byte
    /// without consuming it.
    pub fn skip_non_whitespace(&mut self) -> Option<u8> {
        loop {
            match self.peek() {
                Some(b) if is_whitespace(b) => {
                    self.pos += 1;
                }
                Some(b'%') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                other => return other,
            }
        }
    }

    /// Accumulate bytes until whitespace or a delimiter, up to an optional
    /// maximum length.
    pub fn read_until_whitespace(&mut self, max_len: Option<usize>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = self.peek() {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            if let Some(max) = max_len {
                if out.len() >= max {
                    break;
                }
            }
            out.push(b);
            self.pos += 1;
        }
        out
    }

    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    pub fn consume(&mut self, needle: &[u8]) -> bool {
        if self.starts_with(needle) {
            self.pos += needle.len();
            true
        } else {
            false
        }
    }
}
