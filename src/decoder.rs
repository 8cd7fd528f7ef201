//! Decoder selection: one layout, two implementations.
//!
//! [`SchemaDecoder`](crate::schema::SchemaDecoder) describes each structure as
//! a [`Decode`](crate::schema::Decode) impl over a bounds-tracking reader.
//! [`SafeDecoder`](crate::safe::SafeDecoder) walks the same bytes with explicit
//! cursor arithmetic over [`primitive`](crate::primitive) reads only.
//! Both must produce identical output for every input; the conformance suite
//! in `tests/conformance.rs` runs every case through each mode.

use crate::error::{DecodeError, Result};
use crate::model::{Footer, Index, PAK_MAGIC, PAK_VERSION};
use crate::primitive::TextEncoding;
use crate::safe::SafeDecoder;
use crate::schema::SchemaDecoder;

/// Decodes the two metadata blocks of a PAK archive from in-memory buffers.
pub trait ArchiveDecoder: Send + Sync {
    fn mode(&self) -> DecodeMode;
    /// Decode the 44-byte trailer. Bytes past the first 44 are ignored.
    fn decode_footer(&self, buf: &[u8]) -> Result<Footer>;
    /// Decode an index block of exactly `footer.index_size` bytes.
    fn decode_index(&self, buf: &[u8]) -> Result<Index>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Layout-driven decoder (default).
    #[default]
    Schema,
    /// Hand-walked cursor decoder for restricted environments.
    Safe,
}

impl DecodeMode {
    pub fn name(self) -> &'static str {
        match self {
            DecodeMode::Schema => "schema",
            DecodeMode::Safe   => "safe",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "schema" | "default" => Some(DecodeMode::Schema),
            "safe"               => Some(DecodeMode::Safe),
            _                    => None,
        }
    }
}

/// Configuration for decoding an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub mode:         DecodeMode,
    pub encoding:     TextEncoding,
    /// Reject footers whose magic is not `PAK_MAGIC`.
    pub verify_magic: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            mode:         DecodeMode::Schema,
            encoding:     TextEncoding::Utf8,
            verify_magic: true,
        }
    }
}

impl DecodeOptions {
    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_verify_magic(mut self, verify_magic: bool) -> Self {
        self.verify_magic = verify_magic;
        self
    }
}

/// Build the decoder selected by `options.mode`.
pub fn get_decoder(options: &DecodeOptions) -> Box<dyn ArchiveDecoder> {
    match options.mode {
        DecodeMode::Schema => Box::new(SchemaDecoder::new(options.encoding, options.verify_magic)),
        DecodeMode::Safe   => Box::new(SafeDecoder::new(options.encoding, options.verify_magic)),
    }
}

// ── Footer checks shared by both decoders ─────────────────────────────────────

/// Runs as soon as the magic is read, before the version field.
pub(crate) fn check_magic(magic: u32, verify: bool) -> Result<()> {
    if verify && magic != PAK_MAGIC {
        return Err(DecodeError::InvalidMagic(magic));
    }
    Ok(())
}

pub(crate) fn check_version(version: u32) -> Result<()> {
    if version != PAK_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_validate_magic_with_schema_decoder() {
        let opts = DecodeOptions::default();
        assert_eq!(opts.mode, DecodeMode::Schema);
        assert_eq!(opts.encoding, TextEncoding::Utf8);
        assert!(opts.verify_magic);
        assert_eq!(get_decoder(&opts).mode(), DecodeMode::Schema);
    }

    #[test]
    fn builder_selects_safe_mode() {
        let opts = DecodeOptions::default()
            .with_mode(DecodeMode::Safe)
            .with_encoding(TextEncoding::Latin1)
            .with_verify_magic(false);
        assert_eq!(get_decoder(&opts).mode(), DecodeMode::Safe);
        assert_eq!(opts.encoding, TextEncoding::Latin1);
        assert!(!opts.verify_magic);
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!(DecodeMode::from_name("SAFE"), Some(DecodeMode::Safe));
        assert_eq!(DecodeMode::from_name("default"), Some(DecodeMode::Schema));
        assert_eq!(DecodeMode::from_name("jit"), None);
        assert_eq!(DecodeMode::Safe.name(), "safe");
    }

    #[test]
    fn magic_check_can_be_disabled() {
        assert!(check_magic(PAK_MAGIC, true).is_ok());
        assert!(matches!(check_magic(0xDEADBEEF, true), Err(DecodeError::InvalidMagic(0xDEADBEEF))));
        assert!(check_magic(0xDEADBEEF, false).is_ok());
    }

    #[test]
    fn only_version_three_is_supported() {
        assert!(check_version(3).is_ok());
        assert!(matches!(check_version(4), Err(DecodeError::UnsupportedVersion(4))));
    }
}
