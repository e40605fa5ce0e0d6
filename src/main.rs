//! Main entry point for the spk CLI application.
//!
//! Dispatches `extract`, `pack` and `list` to the library and exits
//! non-zero on the first error.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{Level, info};

use spkpack::cli::{Cli, Command};
use spkpack::{SpkExtractor, extract, pack};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match cli.command {
        Command::Extract {
            archive,
            output_dir,
            overwrite,
        } => {
            let files = extract(&archive, &output_dir, overwrite)
                .with_context(|| format!("failed to extract {}", archive.display()))?;
            info!("Extracted {} files to {}", files.len(), output_dir.display());
        }
        Command::Pack {
            input_dir,
            archive,
            overwrite,
        } => {
            pack(&input_dir, &archive, overwrite)
                .with_context(|| format!("failed to pack {}", input_dir.display()))?;
            info!("Wrote {}", archive.display());
        }
        Command::List { archive, long } => {
            list_files(&archive, long)
                .with_context(|| format!("failed to list {}", archive.display()))?;
        }
    }

    Ok(())
}

/// Progress goes to stderr so `list` output stays clean on stdout.
fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// List entries in the archive.
///
/// Supports two output formats:
/// - Simple format: just entry names, one per line
/// - Long format (`-l`): original size, compressed size, ratio and payload offset
fn list_files(archive: &Path, long: bool) -> Result<()> {
    let extractor = SpkExtractor::open(archive)?;
    let entries = extractor.list_files()?;

    if !long {
        for entry in &entries {
            println!("{}", entry.file_name);
        }
        return Ok(());
    }

    println!(
        "{:>10}  {:>10}  {:>5}  {:>10}  Name",
        "Length", "Size", "Cmpr", "Offset"
    );
    println!("{}", "-".repeat(60));

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in &entries {
        println!(
            "{:>10}  {:>10}  {}  {:>#10X}  {}",
            entry.file_size(),
            entry.compressed_size(),
            ratio(entry.compressed_size(), entry.file_size()),
            entry.offset(),
            entry.file_name
        );
        total_uncompressed += entry.file_size();
        total_compressed += entry.compressed_size();
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:>10}  {:>10}  {}  {:>10}  {} files ({})",
        total_uncompressed,
        total_compressed,
        ratio(total_compressed, total_uncompressed),
        "",
        entries.len(),
        format_size(total_uncompressed)
    );

    Ok(())
}

/// Space saved by compression as a right-aligned percentage.
///
/// Negative when the payload grew, which zlib does for tiny or random input.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed == 0 {
        return "   0%".to_string();
    }
    let saved = 100 - (compressed as i128 * 100 / uncompressed as i128);
    format!("{:>4}%", saved)
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
