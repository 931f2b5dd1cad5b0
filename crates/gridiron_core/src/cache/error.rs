use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Schema version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,
}

impl CacheError {
    /// Errors that mean the stored cache is unusable and must be rebuilt.
    pub fn is_rebuildable(&self) -> bool {
        match self {
            CacheError::Io(_) | CacheError::Serialization(_) => false,
            CacheError::Deserialization(_)
            | CacheError::Decompression
            | CacheError::Corrupted
            | CacheError::VersionMismatch { .. }
            | CacheError::ChecksumMismatch => true,
        }
    }
}
