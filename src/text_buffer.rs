//! Chunked, append-only text accumulator
//!
//! Used to assemble the textual results (outline dump, match-rectangle list)
//! without reallocating on every append. Capacity grows in whole chunks and
//! always keeps one spare byte for a terminator, so `len() < capacity()`
//! holds whenever the buffer is at rest.

use std::fmt::Write as _;

/// Default growth increment in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Errors raised while appending
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextBufferError {
    #[error("failed to grow text buffer to {requested} bytes")]
    Allocation { requested: usize },

    #[error("integer formatting wrote {written} bytes, expected {expected}")]
    FormatMismatch { expected: usize, written: usize },
}

/// Growable text buffer with a chunk-size growth knob
#[derive(Debug, Clone)]
pub struct ChunkedText {
    buf: String,
    capacity: usize,
    chunk_size: usize,
    growths: usize,
}

impl ChunkedText {
    /// Create a buffer with the default 4096-byte chunk
    pub fn new() -> Result<Self, TextBufferError> {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a buffer that grows by `chunk_size` bytes at a time.
    ///
    /// A zero chunk size is bumped to one byte.
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self, TextBufferError> {
        let chunk_size = chunk_size.max(1);
        let mut buf = String::new();
        buf.try_reserve_exact(chunk_size)
            .map_err(|_| TextBufferError::Allocation {
                requested: chunk_size,
            })?;

        Ok(Self {
            buf,
            capacity: chunk_size,
            chunk_size,
            growths: 0,
        })
    }

    /// Used bytes, excluding the reserved terminator slot
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Logical capacity, always a whole number of chunks
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of reallocations performed since creation
    pub fn growths(&self) -> usize {
        self.growths
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Make room for `additional` more bytes plus the terminator slot.
    ///
    /// On failure the buffer is left exactly as it was.
    fn ensure_room(&mut self, additional: usize) -> Result<(), TextBufferError> {
        let new_length = self
            .buf
            .len()
            .checked_add(additional)
            .ok_or(TextBufferError::Allocation {
                requested: usize::MAX,
            })?;
        if new_length < self.capacity {
            return Ok(());
        }

        let mut new_capacity = self.capacity;
        while new_capacity <= new_length {
            new_capacity =
                new_capacity
                    .checked_add(self.chunk_size)
                    .ok_or(TextBufferError::Allocation {
                        requested: usize::MAX,
                    })?;
        }

        self.buf
            .try_reserve_exact(new_capacity - self.buf.len())
            .map_err(|_| TextBufferError::Allocation {
                requested: new_capacity,
            })?;
        self.capacity = new_capacity;
        self.growths += 1;
        Ok(())
    }

    /// Append a string slice
    pub fn append(&mut self, text: &str) -> Result<(), TextBufferError> {
        self.ensure_room(text.len())?;
        self.buf.push_str(text);
        Ok(())
    }

    /// Append a single character
    pub fn append_char(&mut self, c: char) -> Result<(), TextBufferError> {
        self.ensure_room(c.len_utf8())?;
        self.buf.push(c);
        Ok(())
    }

    /// Append the decimal form of `value`.
    ///
    /// The exact width (sign included) is computed before anything is
    /// written; if the formatter disagrees the append is rolled back.
    pub fn append_int(&mut self, value: i64) -> Result<(), TextBufferError> {
        let expected = decimal_width(value);
        self.ensure_room(expected)?;

        let start = self.buf.len();
        if write!(self.buf, "{value}").is_err() {
            self.buf.truncate(start);
            return Err(TextBufferError::FormatMismatch {
                expected,
                written: 0,
            });
        }

        let written = self.buf.len() - start;
        if written != expected {
            self.buf.truncate(start);
            return Err(TextBufferError::FormatMismatch { expected, written });
        }
        Ok(())
    }

    /// Drop content past `len` bytes, backing off to a char boundary.
    ///
    /// Capacity is kept; only the used length shrinks.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.buf.len() {
            return;
        }
        let mut cut = len;
        while !self.buf.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.truncate(cut);
    }

    /// Give the accumulated text to the caller
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl std::fmt::Display for ChunkedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buf)
    }
}

/// Number of characters `value` needs in base 10, including a leading `-`
pub fn decimal_width(value: i64) -> usize {
    let sign = usize::from(value < 0);
    let mut magnitude = value.unsigned_abs();
    let mut digits = 1;
    while magnitude >= 10 {
        magnitude /= 10;
        digits += 1;
    }
    sign + digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_chunk() {
        let text = ChunkedText::new().unwrap();
        assert_eq!(text.capacity(), DEFAULT_CHUNK_SIZE);
        assert_eq!(text.len(), 0);
        assert_eq!(text.growths(), 0);
    }

    #[test]
    fn grows_once_to_smallest_fitting_chunk_multiple() {
        let mut text = ChunkedText::with_chunk_size(16).unwrap();
        let long = "x".repeat(40);
        text.append(&long).unwrap();

        // 40 bytes + terminator needs 41 -> 48 is the first multiple of 16 above 40
        assert_eq!(text.capacity(), 48);
        assert_eq!(text.growths(), 1);

        text.append("1234567").unwrap();
        assert_eq!(text.len(), 47);
        assert_eq!(text.growths(), 1);
        assert!(text.len() < text.capacity());
    }

    #[test]
    fn exact_fill_keeps_terminator_slot() {
        let mut text = ChunkedText::with_chunk_size(8).unwrap();
        text.append("1234567").unwrap();
        assert_eq!(text.capacity(), 8);
        assert_eq!(text.growths(), 0);

        text.append("8").unwrap();
        assert_eq!(text.capacity(), 16);
        assert_eq!(text.growths(), 1);
    }

    #[test]
    fn append_int_handles_sign_and_extremes() {
        let mut text = ChunkedText::with_chunk_size(4).unwrap();
        text.append_int(-1).unwrap();
        text.append(" ").unwrap();
        text.append_int(0).unwrap();
        text.append(" ").unwrap();
        text.append_int(i64::MIN).unwrap();
        text.append(" ").unwrap();
        text.append_int(1234).unwrap();
        assert_eq!(text.as_str(), format!("-1 0 {} 1234", i64::MIN));
        assert!(text.len() < text.capacity());
    }

    #[test]
    fn decimal_width_matches_formatting() {
        for value in [0, 9, 10, -9, -10, 99_999, -100_000, i64::MAX, i64::MIN] {
            assert_eq!(decimal_width(value), value.to_string().len(), "{value}");
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let mut text = ChunkedText::with_chunk_size(8).unwrap();
        text.append("ab\u{e9}cd").unwrap();
        let capacity = text.capacity();

        text.truncate(3);
        assert_eq!(text.as_str(), "ab");
        assert_eq!(text.capacity(), capacity);

        text.truncate(10);
        assert_eq!(text.as_str(), "ab");
    }

    #[test]
    fn zero_chunk_size_is_bumped() {
        let mut text = ChunkedText::with_chunk_size(0).unwrap();
        assert_eq!(text.chunk_size(), 1);
        text.append("abc").unwrap();
        assert_eq!(text.capacity(), 4);
    }
}
