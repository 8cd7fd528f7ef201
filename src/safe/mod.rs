//! Safe-mode decoder.
//!
//! Walks the footer and index with a single explicit `offset` threaded
//! through [`primitive`](crate::primitive) reads. No trait dispatch and no
//! layout tables: every field is one visible read in storage order, which
//! keeps this path auditable for hosts that only allow straight-line code.
//!
//! Output and error values match [`SchemaDecoder`](crate::schema::SchemaDecoder)
//! for every input.

use byteorder::{ByteOrder, LittleEndian};

use crate::decoder::{check_magic, check_version, ArchiveDecoder, DecodeMode};
use crate::error::{DecodeError, Result};
use crate::model::{
    CompressionBlock, CompressionInfo, Footer, Index, IndexRecord, Record, COMPRESSION_BLOCK_LEN,
    ENCRYPTED_FLAG_MASK, HASH_LEN, MIN_INDEX_RECORD_LEN,
};
use crate::primitive::{
    bounded_capacity, read_hex_string, read_length_prefixed_text, read_named_text, read_u32,
    read_u64, read_u8, take, TextEncoding,
};

#[derive(Debug, Clone, Copy)]
pub struct SafeDecoder {
    encoding:     TextEncoding,
    verify_magic: bool,
}

impl SafeDecoder {
    pub fn new(encoding: TextEncoding, verify_magic: bool) -> Self {
        Self { encoding, verify_magic }
    }

    /// Decode one record starting at `offset`; returns the record and the
    /// offset just past its block-size field.
    pub fn decode_record(&self, buf: &[u8], offset: usize) -> Result<(Record, usize)> {
        let (storage_offset, offset)     = read_u64(buf, offset)?;
        let (size, offset)               = read_u64(buf, offset)?;
        let (raw_size, offset)           = read_u64(buf, offset)?;
        let (compression_method, offset) = read_u32(buf, offset)?;
        let (hash, mut offset)           = read_hex_string(buf, offset, HASH_LEN)?;

        let compression = match compression_method {
            0 => CompressionInfo::None,
            1 | 2 | 4 => {
                let (block_count, next) = read_u32(buf, offset)?;
                offset = next;
                let mut blocks = Vec::with_capacity(bounded_capacity(
                    block_count,
                    buf.len() - offset,
                    COMPRESSION_BLOCK_LEN,
                ));
                for _ in 0..block_count {
                    let (start_offset, next) = read_u64(buf, offset)?;
                    let (end_offset, next)   = read_u64(buf, next)?;
                    offset = next;
                    blocks.push(CompressionBlock { start_offset, end_offset });
                }
                CompressionInfo::Blocks { blocks }
            }
            other => return Err(DecodeError::UnknownCompressionMethod(other)),
        };

        let (flags, offset) = read_u8(buf, offset)?;
        let is_encrypted = (flags & ENCRYPTED_FLAG_MASK) != 0;
        let (compression_block_size, offset) = read_u32(buf, offset)?;

        let record = Record {
            storage_offset,
            size,
            raw_size,
            compression_method,
            hash,
            is_encrypted,
            compression_block_size,
            compression,
        };
        Ok((record, offset))
    }
}

impl ArchiveDecoder for SafeDecoder {
    fn mode(&self) -> DecodeMode {
        DecodeMode::Safe
    }

    fn decode_footer(&self, buf: &[u8]) -> Result<Footer> {
        let magic_raw = take(buf, 0, 4)?;
        check_magic(LittleEndian::read_u32(magic_raw), self.verify_magic)?;
        let (magic, offset) = read_hex_string(buf, 0, 4)?;

        let (archive_version, offset) = read_u32(buf, offset)?;
        check_version(archive_version)?;

        let (index_offset, offset) = read_u64(buf, offset)?;
        let (index_size, offset)   = read_u64(buf, offset)?;
        let (index_hash, _)        = read_hex_string(buf, offset, HASH_LEN)?;

        Ok(Footer { magic, archive_version, index_offset, index_size, index_hash })
    }

    fn decode_index(&self, buf: &[u8]) -> Result<Index> {
        let (mount_point, offset)      = read_length_prefixed_text(buf, 0, self.encoding)?;
        let (record_count, mut offset) = read_u32(buf, offset)?;

        let mut records = Vec::with_capacity(bounded_capacity(
            record_count,
            buf.len() - offset,
            MIN_INDEX_RECORD_LEN,
        ));
        for _ in 0..record_count {
            let (file_name, next) = read_named_text(buf, offset, self.encoding)?;
            let (record, next)    = self.decode_record(buf, next)?;
            offset = next;
            tracing::trace!(
                file_name = %file_name,
                offset = record.storage_offset,
                size = record.size,
                method = record.compression_method,
                "decoded record"
            );
            records.push(IndexRecord { file_name, record });
        }

        Ok(Index { mount_point, record_count, records })
    }
}
