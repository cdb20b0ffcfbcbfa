//! Load-time configuration.

/// Default memory limit of the LZMA decoder, 256 MiB.
pub const DEFAULT_LZMA_MEMLIMIT: u64 = 1 << 28;

/// What the chunk dispatcher does with a tag it has no handler for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownChunks {
    /// Fail the load with [`Error::UnknownChunk`](crate::Error::UnknownChunk).
    #[default]
    Reject,
    /// Skip the chunk using the kind byte that follows its tag, logging a
    /// warning. Chunks with an unrecognized kind byte still fail the load.
    Skip,
}

/// Options for [`GameState::parse_with`](crate::GameState::parse_with) and
/// [`load_with`](crate::load_with).
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Handling of unrecognized chunk tags.
    pub unknown_chunks: UnknownChunks,
    /// Memory limit, in bytes, for the LZMA decoder.
    pub lzma_memlimit: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            unknown_chunks: UnknownChunks::default(),
            lzma_memlimit: DEFAULT_LZMA_MEMLIMIT,
        }
    }
}

impl LoadOptions {
    /// Default options: reject unknown chunks, 256 MiB LZMA memory limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handling of unrecognized chunk tags.
    pub fn unknown_chunks(mut self, policy: UnknownChunks) -> Self {
        self.unknown_chunks = policy;
        self
    }

    /// Set the LZMA decoder memory limit.
    pub fn lzma_memlimit(mut self, bytes: u64) -> Self {
        self.lzma_memlimit = bytes;
        self
    }
}
