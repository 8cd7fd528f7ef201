//! Primitive decoder: fixed-width little-endian integers, hex digests and
//! length-prefixed text, read from a byte slice at an explicit cursor.
//!
//! Every function takes `(buf, offset)` and returns `(value, new_offset)`.
//! Nothing here ever indexes past `buf.len()`; a short buffer yields
//! [`DecodeError::TruncatedInput`] naming the offset and width that failed.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{DecodeError, Result};

/// Text encoding used for the mount point and record file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid sequences fail with `InvalidText`.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD.
    Utf8Lossy,
    /// ISO-8859-1, one char per byte. Never fails.
    Latin1,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8], offset: usize) -> Result<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| DecodeError::InvalidText { offset: offset as u64, encoding: self }),
            TextEncoding::Utf8Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8      => "utf8",
            TextEncoding::Utf8Lossy => "utf8-lossy",
            TextEncoding::Latin1    => "latin1",
        }
    }
}

/// Capacity to reserve for `count` elements of at least `min_len` on-disk
/// bytes each, given `remaining` unread bytes. A forged count can never
/// reserve more elements than the buffer could actually hold.
#[inline]
pub fn bounded_capacity(count: u32, remaining: usize, min_len: usize) -> usize {
    (count as usize).min(remaining / min_len.max(1))
}

/// Borrow `len` bytes at `offset`, or fail with `TruncatedInput`.
#[inline]
pub fn take(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(&buf[offset..end]),
        _ => Err(DecodeError::truncated(offset, len, buf.len().saturating_sub(offset))),
    }
}

#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Result<(u8, usize)> {
    let bytes = take(buf, offset, 1)?;
    Ok((bytes[0], offset + 1))
}

#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    let bytes = take(buf, offset, 4)?;
    Ok((LittleEndian::read_u32(bytes), offset + 4))
}

#[inline]
pub fn read_u64(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let bytes = take(buf, offset, 8)?;
    Ok((LittleEndian::read_u64(bytes), offset + 8))
}

/// Render `byte_len` raw bytes as lowercase hex, two chars per byte.
pub fn read_hex_string(buf: &[u8], offset: usize, byte_len: usize) -> Result<(String, usize)> {
    let bytes = take(buf, offset, byte_len)?;
    Ok((hex::encode(bytes), offset + byte_len))
}

/// Strip one or more trailing NULs.
pub fn strip_nul(text: &str) -> &str {
    text.trim_end_matches('\0')
}

/// Mount-point form: `n:u32`, then `n` bytes of text. Cursor advances `4 + n`.
pub fn read_length_prefixed_text(
    buf:      &[u8],
    offset:   usize,
    encoding: TextEncoding,
) -> Result<(String, usize)> {
    let (n, start) = read_u32(buf, offset)?;
    let bytes = take(buf, start, n as usize)?;
    let text = encoding.decode(bytes, start)?;
    Ok((strip_nul(&text).to_owned(), start + n as usize))
}

/// File-name form: `n:u32`, then `n - 1` bytes of text, then one terminator
/// byte that is skipped. Cursor advances `4 + n`.
///
/// A zero prefix cannot hold its own terminator and fails with `EmptyName`.
pub fn read_named_text(
    buf:      &[u8],
    offset:   usize,
    encoding: TextEncoding,
) -> Result<(String, usize)> {
    let (n, start) = read_u32(buf, offset)?;
    let text_len = (n as usize)
        .checked_sub(1)
        .ok_or(DecodeError::EmptyName { offset: offset as u64 })?;
    // Bounds-check the terminator together with the text.
    take(buf, start, n as usize)?;
    let text = encoding.decode(&buf[start..start + text_len], start)?;
    Ok((strip_nul(&text).to_owned(), start + n as usize))
}
