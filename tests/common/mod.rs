//! Test-only PAK fixture encoder. Mirrors the on-disk layout field for field
//! so the decoders can be checked against bytes built independently of them.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use pakmeta::{Footer, FOOTER_SIZE, PAK_MAGIC, PAK_VERSION};

#[derive(Debug, Clone)]
pub struct RecordSpec {
    pub storage_offset: u64,
    pub size:           u64,
    pub raw_size:       u64,
    pub method:         u32,
    pub hash:           [u8; 20],
    /// Written only when `method != 0`.
    pub blocks:         Vec<(u64, u64)>,
    pub flags:          u8,
    pub block_size:     u32,
}

impl RecordSpec {
    pub fn stored(storage_offset: u64, size: u64) -> Self {
        Self {
            storage_offset,
            size,
            raw_size: size,
            method: 0,
            hash: [0x11; 20],
            blocks: Vec::new(),
            flags: 0,
            block_size: 0,
        }
    }

    pub fn compressed(method: u32, blocks: Vec<(u64, u64)>) -> Self {
        let size = blocks.iter().fold(0u64, |acc, (s, e)| acc.saturating_add(e.saturating_sub(*s)));
        Self {
            storage_offset: 0x1000,
            size,
            raw_size: size.saturating_mul(3),
            method,
            hash: [0xC4; 20],
            blocks,
            flags: 0,
            block_size: 0x10000,
        }
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_u64::<LittleEndian>(self.storage_offset)?;
        w.write_u64::<LittleEndian>(self.size)?;
        w.write_u64::<LittleEndian>(self.raw_size)?;
        w.write_u32::<LittleEndian>(self.method)?;
        w.write_all(&self.hash)?;
        if self.method != 0 {
            w.write_u32::<LittleEndian>(self.blocks.len() as u32)?;
            for (start, end) in &self.blocks {
                w.write_u64::<LittleEndian>(*start)?;
                w.write_u64::<LittleEndian>(*end)?;
            }
        }
        w.write_u8(self.flags)?;
        w.write_u32::<LittleEndian>(self.block_size)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub mount_point: Vec<u8>,
    pub entries:     Vec<(Vec<u8>, RecordSpec)>,
}

impl IndexSpec {
    /// Mount point stored with one NUL inside its counted length.
    pub fn new(mount_point: &str) -> Self {
        let mut mp = mount_point.as_bytes().to_vec();
        mp.push(0);
        Self { mount_point: mp, entries: Vec::new() }
    }

    pub fn entry(mut self, name: &str, record: RecordSpec) -> Self {
        self.entries.push((name.as_bytes().to_vec(), record));
        self
    }

    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.mount_point.len() as u32)?;
        w.write_all(&self.mount_point)?;
        w.write_u32::<LittleEndian>(self.entries.len() as u32)?;
        for (name, record) in &self.entries {
            // Counted length covers the name plus its own terminator.
            w.write_u32::<LittleEndian>(name.len() as u32 + 1)?;
            w.write_all(name)?;
            w.write_u8(0)?;
            record.write(&mut w)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out).expect("write to Vec");
        out
    }
}

pub fn footer_bytes(magic: u32, version: u32, index_offset: u64, index_size: u64, hash: [u8; 20]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FOOTER_SIZE);
    out.write_u32::<LittleEndian>(magic).unwrap();
    out.write_u32::<LittleEndian>(version).unwrap();
    out.write_u64::<LittleEndian>(index_offset).unwrap();
    out.write_u64::<LittleEndian>(index_size).unwrap();
    out.write_all(&hash).unwrap();
    out
}

/// Re-encode a decoded footer back into its 44 on-disk bytes.
pub fn encode_footer(footer: &Footer) -> Vec<u8> {
    let mut out = hex::decode(&footer.magic).expect("magic hex");
    out.write_u32::<LittleEndian>(footer.archive_version).unwrap();
    out.write_u64::<LittleEndian>(footer.index_offset).unwrap();
    out.write_u64::<LittleEndian>(footer.index_size).unwrap();
    out.extend(hex::decode(&footer.index_hash).expect("hash hex"));
    out
}

/// A complete archive: `payload_len` filler bytes, the index, then the footer.
pub fn build_archive(payload_len: usize, index: &IndexSpec) -> Vec<u8> {
    let mut out: Vec<u8> = (0..payload_len).map(|i| (i % 251) as u8).collect();
    let index_bytes = index.to_bytes();
    let index_offset = out.len() as u64;
    out.extend_from_slice(&index_bytes);
    out.extend(footer_bytes(PAK_MAGIC, PAK_VERSION, index_offset, index_bytes.len() as u64, [0x5E; 20]));
    out
}

/// Index mixing every record shape the format allows.
pub fn sample_index() -> IndexSpec {
    IndexSpec::new("../../../")
        .entry("Engine/Config/Base.ini", RecordSpec::stored(0, 512))
        .entry(
            "Game/Content/Maps/Level01.umap",
            RecordSpec::compressed(1, vec![(73, 173), (173, 373), (373, 400)]),
        )
        .entry("Game/Content/Audio/intro.uasset", RecordSpec::compressed(2, vec![(0, 64)]).with_flags(1))
        .entry("Game/Content/Shaders/cache.bin", RecordSpec::compressed(4, Vec::new()))
}
