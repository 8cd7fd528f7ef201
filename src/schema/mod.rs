//! Layout-driven decoder.
//!
//! Each on-disk structure is one [`Decode`] impl that lists its fields in
//! storage order; nested structures decode inline by calling the inner impl
//! at the current position. Counted sequences share one generic impl, so
//! compression blocks and index records use the same bounded loop.
//!
//! # Layouts
//!
//! | Structure | Fields |
//! |-----------|--------|
//! | Footer | magic\[4\] · version u32 · index_offset u64 · index_size u64 · index_hash\[20\] |
//! | Index | mount_point (u32-prefixed) · record_count u32 · records |
//! | IndexRecord | file_name (u32-prefixed, terminator skipped) · Record |
//! | Record | offset u64 · size u64 · raw_size u64 · method u32 · hash\[20\] · compression · flags u8 · block_size u32 |
//! | Compression | method 0: nothing · otherwise: count u32 · count × (start u64, end u64) |

mod reader;

pub use reader::SchemaReader;

use byteorder::{ByteOrder, LittleEndian};

use crate::decoder::{check_magic, check_version, ArchiveDecoder, DecodeMode};
use crate::error::{DecodeError, Result};
use crate::model::{
    CompressionBlock, CompressionInfo, CompressionMethod, Footer, Index, IndexRecord, Record,
    COMPRESSION_BLOCK_LEN, ENCRYPTED_FLAG_MASK, FOOTER_SIZE, HASH_LEN, MIN_INDEX_RECORD_LEN,
    MIN_RECORD_LEN,
};
use crate::primitive::{bounded_capacity, TextEncoding};

/// A structure that knows how to read itself from a [`SchemaReader`].
pub trait Decode: Sized {
    /// Fewest bytes one encoded value can occupy.
    const MIN_LEN: usize;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self>;
}

/// Decode exactly `count` consecutive `T`s.
pub fn decode_n<T: Decode>(r: &mut SchemaReader<'_>, count: u32) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(bounded_capacity(count, r.remaining(), T::MIN_LEN));
    for _ in 0..count {
        out.push(T::decode(r)?);
    }
    Ok(out)
}

/// u32 count prefix followed by that many `T`s.
impl<T: Decode> Decode for Vec<T> {
    const MIN_LEN: usize = 4;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        let count = r.u32()?;
        decode_n(r, count)
    }
}

impl Decode for Footer {
    const MIN_LEN: usize = FOOTER_SIZE;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        let magic_raw: [u8; 4] = r.array()?;
        check_magic(LittleEndian::read_u32(&magic_raw), r.verify_magic)?;
        let archive_version = r.u32()?;
        check_version(archive_version)?;
        Ok(Footer {
            magic: hex::encode(magic_raw),
            archive_version,
            index_offset: r.u64()?,
            index_size:   r.u64()?,
            index_hash:   r.hex(HASH_LEN)?,
        })
    }
}

impl Decode for CompressionBlock {
    const MIN_LEN: usize = COMPRESSION_BLOCK_LEN;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        Ok(CompressionBlock {
            start_offset: r.u64()?,
            end_offset:   r.u64()?,
        })
    }
}

/// The union arm is chosen by the method code read earlier in the record.
fn decode_compression(r: &mut SchemaReader<'_>, method: u32) -> Result<CompressionInfo> {
    match CompressionMethod::from_code(method) {
        Some(CompressionMethod::None) => Ok(CompressionInfo::None),
        Some(_) => Ok(CompressionInfo::Blocks { blocks: Vec::<CompressionBlock>::decode(r)? }),
        None => Err(DecodeError::UnknownCompressionMethod(method)),
    }
}

impl Decode for Record {
    const MIN_LEN: usize = MIN_RECORD_LEN;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        let storage_offset     = r.u64()?;
        let size               = r.u64()?;
        let raw_size           = r.u64()?;
        let compression_method = r.u32()?;
        let hash               = r.hex(HASH_LEN)?;
        let compression        = decode_compression(r, compression_method)?;
        let flags              = r.u8()?;
        Ok(Record {
            storage_offset,
            size,
            raw_size,
            compression_method,
            hash,
            is_encrypted: flags & ENCRYPTED_FLAG_MASK != 0,
            compression_block_size: r.u32()?,
            compression,
        })
    }
}

impl Decode for IndexRecord {
    const MIN_LEN: usize = MIN_INDEX_RECORD_LEN;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        let file_name = r.named_text()?;
        let record = Record::decode(r)?;
        tracing::trace!(
            file_name = %file_name,
            offset = record.storage_offset,
            size = record.size,
            method = record.compression_method,
            "decoded record"
        );
        Ok(IndexRecord { file_name, record })
    }
}

impl Decode for Index {
    const MIN_LEN: usize = 8;

    fn decode(r: &mut SchemaReader<'_>) -> Result<Self> {
        let mount_point  = r.prefixed_text()?;
        let record_count = r.u32()?;
        let records      = decode_n(r, record_count)?;
        Ok(Index { mount_point, record_count, records })
    }
}

// ── ArchiveDecoder ────────────────────────────────────────────────────────────

/// Default decoder.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDecoder {
    encoding:     TextEncoding,
    verify_magic: bool,
}

impl SchemaDecoder {
    pub fn new(encoding: TextEncoding, verify_magic: bool) -> Self {
        Self { encoding, verify_magic }
    }

    fn reader<'a>(&self, buf: &'a [u8]) -> SchemaReader<'a> {
        SchemaReader::new(buf, self.encoding, self.verify_magic)
    }
}

impl ArchiveDecoder for SchemaDecoder {
    fn mode(&self) -> DecodeMode {
        DecodeMode::Schema
    }

    fn decode_footer(&self, buf: &[u8]) -> Result<Footer> {
        Footer::decode(&mut self.reader(buf))
    }

    fn decode_index(&self, buf: &[u8]) -> Result<Index> {
        Index::decode(&mut self.reader(buf))
    }
}
