//! Library-wide error and result types.

use std::fmt;
use std::io;

use crate::chunks::ChunkTag;

/// Result alias used throughout ottdkit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Any of these aborts the whole load; a partially decoded
/// [`GameState`](crate::GameState) is never handed out.
#[derive(Debug)]
pub enum Error {
    /// The 4-byte format tag at the start of the file is not one of the
    /// known transports (or its transport was compiled out).
    UnsupportedFormat([u8; 4]),
    /// The stream ended before all expected bytes could be read.
    UnexpectedEof,
    /// A block of the LZO transport failed its size or checksum check.
    #[cfg(feature = "compression")]
    CorruptBlock(&'static str),
    /// LZO decompression of a block failed.
    #[cfg(feature = "compression")]
    Lzo,
    /// The zlib stream is corrupt.
    #[cfg(feature = "compression")]
    Zlib(flate2::DecompressError),
    /// The LZMA stream is corrupt or exceeds the memory limit.
    #[cfg(feature = "compression")]
    Lzma(xz2::stream::Error),
    /// A chunk did not start with the kind byte its handler expects.
    InvalidChunkKind { tag: ChunkTag, kind: u8 },
    /// A chunk tag with no registered handler.
    UnknownChunk(ChunkTag),
    /// A chunk's declared length disagrees with the size derived from
    /// state decoded earlier (e.g. tile chunks versus the map area).
    SizeMismatch {
        tag: ChunkTag,
        expected: u64,
        found: u64,
    },
    /// The company roster addresses a slot past the last one.
    TooManyCompanies,
    /// A buffer sized from file data could not be allocated.
    Allocation,
    /// A structural constraint was violated (message describes which one).
    Parse(&'static str),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFormat(tag) => {
                write!(f, "unsupported format: {}", tag.escape_ascii())
            }
            Error::UnexpectedEof => write!(f, "unexpected end of file"),
            #[cfg(feature = "compression")]
            Error::CorruptBlock(s) => write!(f, "corrupt lzo block: {s}"),
            #[cfg(feature = "compression")]
            Error::Lzo => write!(f, "lzo decompression failed"),
            #[cfg(feature = "compression")]
            Error::Zlib(e) => write!(f, "zlib decompression failed: {e}"),
            #[cfg(feature = "compression")]
            Error::Lzma(e) => write!(f, "lzma decompression failed: {e}"),
            Error::InvalidChunkKind { tag, kind } => {
                write!(f, "chunk {tag} has invalid kind byte {kind:#04x}")
            }
            Error::UnknownChunk(tag) => write!(f, "unknown chunk {tag}"),
            Error::SizeMismatch {
                tag,
                expected,
                found,
            } => write!(f, "chunk {tag} is {found} bytes, expected {expected}"),
            Error::TooManyCompanies => write!(f, "company roster has too many slots"),
            Error::Allocation => write!(f, "allocation failed"),
            Error::Parse(s) => write!(f, "parse error: {s}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            #[cfg(feature = "compression")]
            Error::Zlib(e) => Some(e),
            #[cfg(feature = "compression")]
            Error::Lzma(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::Allocation
    }
}
