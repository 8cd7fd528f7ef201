//! High-level [`PakReader`] API — the single entry point consumers use.
//!
//! ```no_run
//! use pakmeta::{DecodeMode, DecodeOptions, PakReader};
//!
//! let mut pak = PakReader::open("Game-WindowsNoEditor.pak")?;
//! let meta = pak.decode()?;
//! for rec in &meta.index.records {
//!     println!("{} {} B", rec.file_name, rec.record.raw_size);
//! }
//!
//! // Hosts that forbid generated parsing code can pick the safe decoder.
//! let opts = DecodeOptions::default().with_mode(DecodeMode::Safe);
//! let meta = PakReader::open_with_options("Game-WindowsNoEditor.pak", opts)?.decode()?;
//! # let _ = meta;
//! # Ok::<(), pakmeta::DecodeError>(())
//! ```
//!
//! `decode` issues exactly two range reads against the source: the trailing
//! [`FOOTER_SIZE`] bytes, then `index_size` bytes at `index_offset`.

use std::path::Path;

use tracing::debug;

use crate::decoder::{get_decoder, ArchiveDecoder, DecodeOptions};
use crate::error::{DecodeError, Result};
use crate::model::{ArchiveMetadata, Footer, Index, FOOTER_SIZE};
use crate::source::{ByteSource, FileSource};

pub struct PakReader<S: ByteSource> {
    source:  S,
    decoder: Box<dyn ArchiveDecoder>,
    options: DecodeOptions,
}

impl PakReader<FileSource> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        Ok(Self::with_options(FileSource::open(path)?, options))
    }
}

impl<S: ByteSource> PakReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: S, options: DecodeOptions) -> Self {
        Self { source, decoder: get_decoder(&options), options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decode the trailer from the last [`FOOTER_SIZE`] bytes of the source.
    pub fn read_footer(&mut self) -> Result<Footer> {
        let size = self.source.size()?;
        let offset = size
            .checked_sub(FOOTER_SIZE as u64)
            .ok_or(DecodeError::OutOfRange { offset: 0, length: FOOTER_SIZE as u64, size })?;
        debug!(offset, length = FOOTER_SIZE, "reading footer");

        let bytes = self.source.read_range(offset, FOOTER_SIZE as u64)?;
        let footer = self
            .decoder
            .decode_footer(&bytes)
            .inspect_err(|e| debug!(error = %e, "footer decode failed"))?;
        debug!(
            version = footer.archive_version,
            index_offset = footer.index_offset,
            index_size = footer.index_size,
            mode = self.decoder.mode().name(),
            "decoded footer"
        );
        Ok(footer)
    }

    /// Decode the index block the footer points at.
    pub fn read_index(&mut self, footer: &Footer) -> Result<Index> {
        debug!(offset = footer.index_offset, length = footer.index_size, "reading index");
        let bytes = self.source.read_range(footer.index_offset, footer.index_size)?;
        let index = self
            .decoder
            .decode_index(&bytes)
            .inspect_err(|e| debug!(error = %e, "index decode failed"))?;
        debug!(
            mount_point = %index.mount_point,
            records = index.record_count,
            "decoded index"
        );
        Ok(index)
    }

    /// Footer and index, merged. Produces a fresh result on every call.
    pub fn decode(&mut self) -> Result<ArchiveMetadata> {
        let footer = self.read_footer()?;
        let index = self.read_index(&footer)?;
        Ok(ArchiveMetadata { footer, index })
    }
}

/// Decode an archive held entirely in memory.
pub fn decode_bytes(archive: &[u8], options: DecodeOptions) -> Result<ArchiveMetadata> {
    PakReader::with_options(archive, options).decode()
}

/// Decode an archive file with default options.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<ArchiveMetadata> {
    PakReader::open(path)?.decode()
}
