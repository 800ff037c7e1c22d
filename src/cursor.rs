//! Sequential and seekable access to the bytes of a single file.

use crate::error::{DicomError, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind as IoErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// A byte source with a tracked offset. Reads never return partial
/// data: reaching the end of the stream mid-read fails with
/// `DicomError::Truncated`.
#[derive(Debug)]
pub struct ByteCursor<R> {
    source: R,
    position: u64,
}

impl ByteCursor<BufReader<File>> {
    /// Open a file for reading. The file handle is closed when the
    /// cursor is dropped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(ByteCursor::new(file))
    }
}

impl<R> ByteCursor<R>
where
    R: Read + Seek,
{
    /// Create a cursor over the given source, which is assumed to be
    /// at its start.
    pub fn new(source: R) -> Self {
        ByteCursor {
            source,
            position: 0,
        }
    }

    /// The current offset from the start of the source.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        // grow with the data actually available rather than trusting `n`
        let mut buf = Vec::new();
        let read = (&mut self.source).take(n as u64).read_to_end(&mut buf)?;
        self.position += read as u64;
        if read < n {
            Err(DicomError::Truncated)
        } else {
            Ok(buf)
        }
    }

    /// Fill the given buffer entirely.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.read_up_to(buf)? < buf.len() {
            Err(DicomError::Truncated)
        } else {
            Ok(())
        }
    }

    /// Read as many bytes as possible into the given buffer, stopping
    /// only when it is full or the stream ends. Returns the number of
    /// bytes read.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            match self.source.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(ref e) if e.kind() == IoErrorKind::Interrupted => {}
                Err(e) => {
                    self.position += total as u64;
                    return Err(e.into());
                }
            }
        }
        self.position += total as u64;
        Ok(total)
    }

    /// Read a fixed-size chunk of bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Move the cursor, returning the new offset.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.position = self.source.seek(pos)?;
        Ok(self.position)
    }

    /// Move the cursor `n` bytes forward. Skipping beyond the end of the
    /// stream fails with `DicomError::Truncated`.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let copied = std::io::copy(&mut (&mut self.source).take(n), &mut std::io::sink())?;
        self.position += copied;
        if copied < n {
            Err(DicomError::Truncated)
        } else {
            Ok(())
        }
    }

    /// Read everything up to the end of the stream.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = self.source.read_to_end(&mut buf)?;
        self.position += n as u64;
        Ok(buf)
    }

    /// Take the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}
