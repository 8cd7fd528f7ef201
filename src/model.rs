//! Decoded PAK metadata.
//!
//! Field names serialize in camelCase so `ArchiveMetadata::to_json()` matches
//! the structure downstream extractors already consume.

use serde::Serialize;

/// Size of the trailer at end-of-file.
pub const FOOTER_SIZE: usize = 44;
/// Footer magic, read as a little-endian u32 (raw bytes `e1 12 6f 5a`).
pub const PAK_MAGIC: u32 = 0x5A6F_12E1;
/// The only archive version this crate decodes.
pub const PAK_VERSION: u32 = 3;
/// Width of every digest field (SHA-1).
pub const HASH_LEN: usize = 20;
/// Bit 0 of a record's flag byte; the other seven bits are padding.
pub const ENCRYPTED_FLAG_MASK: u8 = 0b0000_0001;
/// On-disk width of one compression block (start u64, end u64).
pub const COMPRESSION_BLOCK_LEN: usize = 16;
/// Smallest on-disk record: three u64s, method, hash, flags, block size.
pub const MIN_RECORD_LEN: usize = 8 * 3 + 4 + HASH_LEN + 1 + 4;
/// Smallest index entry: name prefix, a lone terminator, then a record.
pub const MIN_INDEX_RECORD_LEN: usize = 4 + 1 + MIN_RECORD_LEN;

// ── CompressionMethod ─────────────────────────────────────────────────────────

/// Compression scheme codes that select the `Blocks` variant.
///
/// Code 0 is "stored"; anything outside this table is rejected by both
/// decoders with `UnknownCompressionMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    None,
    Zlib,
    Gzip,
    Custom,
}

impl CompressionMethod {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(CompressionMethod::None),
            1 => Some(CompressionMethod::Zlib),
            2 => Some(CompressionMethod::Gzip),
            4 => Some(CompressionMethod::Custom),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            CompressionMethod::None   => 0,
            CompressionMethod::Zlib   => 1,
            CompressionMethod::Gzip   => 2,
            CompressionMethod::Custom => 4,
        }
    }

    /// Human-readable name (diagnostics only).
    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::None   => "none",
            CompressionMethod::Zlib   => "zlib",
            CompressionMethod::Gzip   => "gzip",
            CompressionMethod::Custom => "custom",
        }
    }
}

// ── Footer ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    /// Raw magic bytes in storage order, lowercase hex.
    pub magic:           String,
    pub archive_version: u32,
    pub index_offset:    u64,
    pub index_size:      u64,
    pub index_hash:      String,
}

// ── Compression ───────────────────────────────────────────────────────────────

/// One compressed chunk, relative to the record's stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionBlock {
    pub start_offset: u64,
    pub end_offset:   u64,
}

impl CompressionBlock {
    pub fn len(&self) -> u64 {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `None` iff the record's compression method is 0. Blocks keep storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompressionInfo {
    None,
    Blocks { blocks: Vec<CompressionBlock> },
}

impl CompressionInfo {
    pub fn blocks(&self) -> &[CompressionBlock] {
        match self {
            CompressionInfo::None              => &[],
            CompressionInfo::Blocks { blocks } => blocks,
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub storage_offset:         u64,
    /// Stored (possibly compressed) length.
    pub size:                   u64,
    pub raw_size:               u64,
    pub compression_method:     u32,
    pub hash:                   String,
    pub is_encrypted:           bool,
    pub compression_block_size: u32,
    pub compression:            CompressionInfo,
}

impl Record {
    pub fn is_compressed(&self) -> bool {
        self.compression_method != 0
    }

    pub fn method(&self) -> Option<CompressionMethod> {
        CompressionMethod::from_code(self.compression_method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    pub file_name: String,
    #[serde(flatten)]
    pub record:    Record,
}

// ── Index ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub mount_point:  String,
    pub record_count: u32,
    /// On-disk order; `records.len() == record_count`.
    pub records:      Vec<IndexRecord>,
}

impl Index {
    pub fn find(&self, file_name: &str) -> Option<&IndexRecord> {
        self.records.iter().find(|r| r.file_name == file_name)
    }
}

// ── ArchiveMetadata ───────────────────────────────────────────────────────────

/// Footer fields merged with the decoded index. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMetadata {
    #[serde(flatten)]
    pub footer: Footer,
    pub index:  Index,
}

impl ArchiveMetadata {
    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
