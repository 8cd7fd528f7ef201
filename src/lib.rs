pub mod error;
pub mod model;
pub mod primitive;
pub mod schema;
pub mod safe;
pub mod decoder;
pub mod source;
pub mod reader;

pub use error::{DecodeError, Result};
pub use model::{
    ArchiveMetadata, CompressionBlock, CompressionInfo, CompressionMethod, Footer, Index,
    IndexRecord, Record, FOOTER_SIZE, PAK_MAGIC, PAK_VERSION,
};
pub use primitive::TextEncoding;
pub use decoder::{get_decoder, ArchiveDecoder, DecodeMode, DecodeOptions};
pub use source::{ByteSource, FileSource, ReaderSource};
pub use reader::{decode_bytes, decode_file, PakReader};
pub use safe::SafeDecoder;
pub use schema::SchemaDecoder;
