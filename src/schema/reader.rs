use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{DecodeError, Result};
use crate::primitive::{strip_nul, TextEncoding};

/// Bounds-tracking reader the [`Decode`](super::Decode) impls pull fields from.
///
/// Every read checks the remaining length first so a short buffer reports
/// the exact field offset and width instead of a bare `UnexpectedEof`.
pub struct SchemaReader<'a> {
    inner:                   Cursor<&'a [u8]>,
    pub(crate) encoding:     TextEncoding,
    pub(crate) verify_magic: bool,
}

impl<'a> SchemaReader<'a> {
    pub fn new(buf: &'a [u8], encoding: TextEncoding, verify_magic: bool) -> Self {
        Self { inner: Cursor::new(buf), encoding, verify_magic }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.inner.get_ref().len().saturating_sub(self.position())
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(DecodeError::truncated(self.position(), needed, self.remaining()));
        }
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.inner.read_u64::<LittleEndian>()?)
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        self.inner.read_exact(&mut out)?;
        Ok(out)
    }

    /// Borrow `len` bytes from the underlying buffer and step past them.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position();
        let buf: &'a [u8] = *self.inner.get_ref();
        self.inner.set_position((start + len) as u64);
        Ok(&buf[start..start + len])
    }

    pub fn hex(&mut self, len: usize) -> Result<String> {
        Ok(hex::encode(self.bytes(len)?))
    }

    /// `n:u32` then `n` bytes of NUL-stripped text.
    pub fn prefixed_text(&mut self) -> Result<String> {
        let n = self.u32()? as usize;
        let start = self.position();
        let bytes = self.bytes(n)?;
        let text = self.encoding.decode(bytes, start)?;
        Ok(strip_nul(&text).to_owned())
    }

    /// `n:u32`, `n - 1` bytes of NUL-stripped text, one skipped terminator.
    pub fn named_text(&mut self) -> Result<String> {
        let prefix_at = self.position();
        let n = self.u32()? as usize;
        if n == 0 {
            return Err(DecodeError::EmptyName { offset: prefix_at as u64 });
        }
        let start = self.position();
        let counted = self.bytes(n)?;
        let text = self.encoding.decode(&counted[..n - 1], start)?;
        Ok(strip_nul(&text).to_owned())
    }
}
