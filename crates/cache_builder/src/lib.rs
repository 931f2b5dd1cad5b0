//! Cache Builder Library
//!
//! 2024 CSV tables → fitted parameters → MessagePack → LZ4 → SHA256 trailer,
//! written in the engine's parameter cache format, plus a JSON dataset export
//! the engine can load without the CSVs.

pub mod tables;

#[cfg(test)]
mod fixtures;

use anyhow::{Context, Result};
use gridiron_core::cache::{
    checksum_hex, decode, FileParameterStore, MemoryParameterStore, ParameterCache,
    ParameterStore, CACHE_SCHEMA_VERSION,
};
use gridiron_core::config::SimConfig;
use gridiron_core::models::ModelSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use tables::{load_dataset, LoadStats};

/// Sidecar describing a written parameter cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub schema_version: u32,
    /// Sample threshold the parameters were fitted with.
    pub min_entity_samples: usize,
    /// Number of (category, entity) entries.
    pub entries: usize,
    /// SHA256 of the whole cache file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    /// Uncompressed MessagePack size (bytes)
    pub original_size: u64,
    /// File size (bytes)
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
}

/// Fits every model the rosters in `data_dir` need and writes the cache.
pub fn build_param_cache(
    data_dir: &Path,
    output: &Path,
    config: &SimConfig,
) -> Result<CacheMetadata> {
    let (dataset, _, _) = load_dataset(data_dir)?;

    // a fresh memory store forces a full fit
    let models = ModelSet::build(&dataset, &dataset.rosters, &MemoryParameterStore::new(), config)
        .context("Failed to fit models")?;

    write_param_cache(models.cache(), output)
}

/// Writes `cache` atomically and describes the result.
pub fn write_param_cache(cache: &ParameterCache, output: &Path) -> Result<CacheMetadata> {
    let original_size = rmp_serde::to_vec_named(cache)
        .context("Failed to serialize to MessagePack")?
        .len() as u64;

    FileParameterStore::new(output)
        .save(cache)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    let bytes = fs::read(output)
        .with_context(|| format!("Failed to read back cache file: {}", output.display()))?;
    let compressed_size = bytes.len() as u64;

    Ok(CacheMetadata {
        schema_version: CACHE_SCHEMA_VERSION,
        min_entity_samples: cache.min_entity_samples,
        entries: cache.len(),
        checksum: checksum_hex(&bytes),
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: compressed_size as f64 / original_size.max(1) as f64,
    })
}

/// Whether the file's SHA256 matches `expected_checksum`.
pub fn verify_cache(cache_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;
    Ok(checksum_hex(&bytes) == expected_checksum)
}

pub fn load_param_cache(cache_file: &Path) -> Result<ParameterCache> {
    let bytes = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;
    decode(&bytes).with_context(|| format!("Invalid parameter cache: {}", cache_file.display()))
}

/// Converts the CSV tables into one JSON dataset file.
pub fn write_dataset_json(data_dir: &Path, output: &Path) -> Result<LoadStats> {
    let (dataset, _, stats) = load_dataset(data_dir)?;
    dataset
        .to_json_file(output)
        .with_context(|| format!("Failed to write dataset: {}", output.display()))?;
    Ok(stats)
}
