//! Cache Builder CLI
//!
//! 2024 CSV tables → parameter cache / JSON dataset

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cache_builder")]
#[command(about = "Build simulator parameter caches from the 2024 CSV tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Fit every model and write the parameter cache
    Params {
        /// Directory holding the CSV tables
        #[arg(long)]
        data: PathBuf,

        /// Output cache file path
        #[arg(long)]
        out: PathBuf,

        /// Simulator config JSON (defaults, or GRIDIRON_SIM_CONFIG_PATH when unset)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verify cache after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Convert the CSV tables into a single JSON dataset
    Dataset {
        /// Directory holding the CSV tables
        #[arg(long)]
        data: PathBuf,

        /// Output JSON file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Check a cache file against its metadata sidecar
    Verify {
        #[arg(long)]
        cache: PathBuf,

        #[arg(long)]
        metadata: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use anyhow::Context;
    use gridiron_core::config::SimConfig;

    let cli = Cli::parse();

    match cli.command {
        Commands::Params { data, out, config, verify, metadata } => {
            println!("Building parameter cache...");
            println!("   Data:   {}", data.display());
            println!("   Output: {}", out.display());

            let config = match config {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read config: {}", path.display()))?;
                    SimConfig::from_json(&json)?
                }
                None => SimConfig::from_env_or_default()?,
            };

            let meta = cache_builder::build_param_cache(&data, &out, &config)?;
            print_metadata(&meta);

            if verify {
                verify_cache_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Dataset { data, out } => {
            println!("Converting CSV tables...");
            let stats = cache_builder::write_dataset_json(&data, &out)?;
            println!("\nDataset written to {}", out.display());
            println!("   Rushes:      {}", stats.rushes);
            println!("   Passes:      {}", stats.passes);
            println!("   Punts:       {}", stats.punts);
            println!("   Field goals: {}", stats.field_goals);
            println!("   Teams:       {}", stats.teams);
            println!("   Playcalls:   {}", stats.playcalls);
            println!("   Skipped:     {}", stats.skipped);
        }

        Commands::Verify { cache, metadata } => {
            let json = std::fs::read_to_string(&metadata)
                .with_context(|| format!("Failed to read metadata: {}", metadata.display()))?;
            let meta: cache_builder::CacheMetadata = serde_json::from_str(&json)?;
            verify_cache_integrity(&cache, &meta.checksum)?;
            let params = cache_builder::load_param_cache(&cache)?;
            println!("   Entries: {}", params.len());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &cache_builder::CacheMetadata) {
    println!("\nCache built successfully!");
    println!("   Entries:         {}", meta.entries);
    println!("   Sample minimum:  {}", meta.min_entity_samples);
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_cache_integrity(cache_path: &std::path::Path, checksum: &str) -> Result<()> {
    println!("\nVerifying cache integrity...");
    let is_valid = cache_builder::verify_cache(cache_path, checksum)?;

    if is_valid {
        println!("Cache verification passed");
        Ok(())
    } else {
        anyhow::bail!("Cache verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &PathBuf, meta: &cache_builder::CacheMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\nMetadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("cache_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
