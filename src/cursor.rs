//! Positioned reads of fixed-width integers and length-prefixed strings
//! over an in-memory byte image.
//!
//! The universe format has no self-describing layout: every section
//! decoder trusts a fixed positional recipe, so the cursor's only job is
//! to fail loudly (via `None`) the moment a read runs past the end of the
//! buffer, rather than panic or silently wrap.

use crate::diagnostic::Diagnostic;
use crate::error::{DecodeError, DecodeResult};

/// A movable read position over a borrowed byte slice.
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteCursor { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    /// Read `n` raw bytes, advancing the cursor. `None` if fewer than `n`
    /// bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        if end > self.bytes.len() {
            return None;
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    pub fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        let b = self.read_bytes(2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        let b = self.read_bytes(4)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a length-prefixed string: a little-endian u16 length N followed
    /// by N raw bytes. `0x0D`/`0x0A` bytes are stripped before UTF-8
    /// decoding; undecodable sequences are replaced, never a hard failure.
    /// N = 0 means the string is absent (`None`).
    ///
    /// Returns `(value, lossy)` where `lossy` is true if replacement
    /// characters were introduced, so callers can raise a decoding
    /// diagnostic.
    pub fn read_string(&mut self) -> Option<(Option<String>, bool)> {
        let len = self.read_u16_le()? as usize;
        if len == 0 {
            return Some((None, false));
        }
        let raw = self.read_bytes(len)?;
        let filtered: Vec<u8> = raw.iter().copied().filter(|&b| b != 0x0D && b != 0x0A).collect();
        let lossy = std::str::from_utf8(&filtered).is_err();
        let s = String::from_utf8_lossy(&filtered).into_owned();
        Some((Some(s), lossy))
    }

    /// Convenience wrapper that folds a lossy string read into a
    /// diagnostics sink instead of returning the lossy flag.
    pub fn read_string_diag(
        &mut self,
        context: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Option<String>> {
        let (value, lossy) = self.read_string()?;
        if lossy {
            diagnostics.push(Diagnostic::Utf8Replacement {
                context: context.to_string(),
            });
        }
        Some(value)
    }

    /// Turn a field read's `None` into a [`DecodeError::TruncatedSection`],
    /// anchored at the cursor's current position.
    pub fn require<T>(&self, value: Option<T>, section: &'static str, needed: usize) -> DecodeResult<T> {
        value.ok_or_else(|| DecodeError::TruncatedSection {
            section,
            offset: self.pos,
            needed,
            available: self.remaining(),
        })
    }
}
