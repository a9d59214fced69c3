//! Counting reader for tracking stream offsets.
//!
//! This module provides a `CountingReader` that wraps any `Read`
//! implementation and tracks the total number of bytes consumed.

use std::io::Read;

/// Wrapper reader that tracks total bytes read.
///
/// The archive decoder has no other state between entries than this cursor,
/// so the count doubles as the stream offset used in error messages and as
/// the consumed-bytes figure reported to callers.
///
/// # Examples
///
/// ```
/// use rpmkit_core::io::CountingReader;
/// use std::io::Read;
///
/// let mut reader = CountingReader::new(&b"Hello, World!"[..]);
/// let mut buf = [0u8; 5];
/// reader.read_exact(&mut buf)?;
///
/// assert_eq!(reader.total_bytes(), 5);
/// assert_eq!(&buf, b"Hello");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R> CountingReader<R> {
    /// Creates a new counting reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Returns the total number of bytes successfully read.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes the counting reader and returns the inner reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns a reference to the inner reader.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes = self.inner.read(buf)?;
        self.bytes_read += bytes as u64;
        Ok(bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_counting_reader_basic() {
        let mut reader = CountingReader::new(Cursor::new(b"Hello, World!".to_vec()));
        let mut buf = [0u8; 5];

        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.total_bytes(), 5);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(reader.total_bytes(), 13);
        assert_eq!(rest, b", World!");
    }

    #[test]
    fn test_counting_reader_empty() {
        let mut reader = CountingReader::new(std::io::empty());
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.total_bytes(), 0);
    }

    #[test]
    fn test_counting_reader_take() {
        let mut reader = CountingReader::new(Cursor::new(vec![7u8; 100]));
        let mut out = Vec::new();
        (&mut reader).take(40).read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), 40);
        assert_eq!(reader.total_bytes(), 40);
    }

    #[test]
    fn test_counting_reader_short_reads() {
        // Reader that returns at most 3 bytes per call
        struct Trickle(Cursor<Vec<u8>>);

        impl Read for Trickle {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = buf.len().min(3);
                self.0.read(&mut buf[..n])
            }
        }

        let mut reader = CountingReader::new(Trickle(Cursor::new(vec![1u8; 10])));
        let mut buf = [0u8; 10];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.total_bytes(), 10);
    }

    #[test]
    fn test_counting_reader_into_inner() {
        let mut reader = CountingReader::new(Cursor::new(vec![0u8; 8]));
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.get_ref().position(), 2);
        let inner = reader.into_inner();
        assert_eq!(inner.position(), 2);
    }
}
