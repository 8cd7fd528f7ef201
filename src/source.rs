//! Random-access byte providers the assembler pulls the footer and index from.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{DecodeError, Result};

pub trait ByteSource {
    /// Total length of the underlying storage.
    fn size(&mut self) -> Result<u64>;
    /// Read exactly `length` bytes at `offset`, or fail with `OutOfRange`.
    fn read_range(&mut self, offset: u64, length: u64) -> Result<Vec<u8>>;
}

fn check_range(offset: u64, length: u64, size: u64) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(DecodeError::OutOfRange { offset, length, size }),
    }
}

/// Narrow a checked range to native indices. On targets where `usize` is
/// narrower than `u64` a range past `usize::MAX` is `OutOfRange`, never wrapped.
fn native_range(offset: u64, length: u64, size: u64) -> Result<(usize, usize)> {
    check_range(offset, length, size)?;
    let out_of_range = |_| DecodeError::OutOfRange { offset, length, size };
    let start = usize::try_from(offset).map_err(out_of_range)?;
    let len = usize::try_from(length).map_err(out_of_range)?;
    let end = start.checked_add(len).ok_or(DecodeError::OutOfRange { offset, length, size })?;
    Ok((start, end))
}

impl ByteSource for &[u8] {
    fn size(&mut self) -> Result<u64> {
        Ok(self.len() as u64)
    }

    fn read_range(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let (start, end) = native_range(offset, length, self.len() as u64)?;
        Ok(self[start..end].to_vec())
    }
}

impl ByteSource for Vec<u8> {
    fn size(&mut self) -> Result<u64> {
        Ok(self.len() as u64)
    }

    fn read_range(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        self.as_slice().read_range(offset, length)
    }
}

// ── Seekable readers ──────────────────────────────────────────────────────────

/// Adapts any `Read + Seek` (a file, a `Cursor`) into a [`ByteSource`].
pub struct ReaderSource<R: Read + Seek> {
    reader: R,
    size:   Option<u64>,
}

pub type FileSource = ReaderSource<File>;

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, size: None }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn size(&mut self) -> Result<u64> {
        if let Some(size) = self.size {
            return Ok(size);
        }
        let size = self.reader.seek(SeekFrom::End(0))?;
        self.size = Some(size);
        Ok(size)
    }

    fn read_range(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let size = self.size()?;
        let (start, end) = native_range(offset, length, size)?;
        self.reader.seek(SeekFrom::Start(offset))?;
        // Grow with the bytes actually delivered; a reader that reports more
        // than it holds ends in `UnexpectedEof` instead of a huge zeroed buffer.
        let mut buf = Vec::new();
        (&mut self.reader).take(length).read_to_end(&mut buf)?;
        if buf.len() != end - start {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read {} of {length} bytes at offset {offset}", buf.len()),
            )
            .into());
        }
        Ok(buf)
    }
}
