use super::error::CacheError;
use super::{ParameterCache, CACHE_SCHEMA_VERSION};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

const CHECKSUM_LEN: usize = 32;

/// MessagePack → LZ4 (size prepended) → SHA-256 of the compressed bytes appended.
pub fn encode(cache: &ParameterCache) -> Result<Vec<u8>, CacheError> {
    let msgpack = to_vec_named(cache)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut bytes = compressed;
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<ParameterCache, CacheError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(CacheError::Corrupted);
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize()[..] != *checksum {
        return Err(CacheError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| CacheError::Decompression)?;
    let cache: ParameterCache = from_slice(&msgpack)?;

    if cache.version != CACHE_SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch {
            found: cache.version,
            expected: CACHE_SCHEMA_VERSION,
        });
    }
    Ok(cache)
}

/// Hex SHA-256 of an encoded cache, as recorded in build metadata.
pub fn checksum_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
