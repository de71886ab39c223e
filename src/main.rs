use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use huffpack::config::{CodecConfig, DEFAULT_CONFIG_FILE};
use huffpack::metrics::{CompressionReport, DecompressionReport, DescriptorSummary};
use huffpack::storage::Archiver;

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Huffman file compression")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, help = "Config file path")]
    config: Option<String>,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Descriptor suffix (overrides config)")]
    suffix: Option<String>,

    #[arg(long, help = "Replace existing destination files")]
    overwrite: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Writes DEST and its descriptor
    Compress { source: PathBuf, dest: PathBuf },
    /// Reads SOURCE and its descriptor
    Decompress { source: PathBuf, dest: PathBuf },
    Inspect {
        payload: PathBuf,
        #[arg(long, help = "List every code")]
        codes: bool,
    },
    Verify { payload: PathBuf },
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = CodecConfig::load_or_default(cli.config.as_deref())?;
    if let Some(suffix) = cli.suffix {
        config.descriptor_suffix = suffix;
    }
    if cli.overwrite {
        config.overwrite = true;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::GenerateConfig { output } = &cli.command {
        config.save(output)?;
        if cli.json {
            println!("{}", serde_json::json!({"success": true, "config_file": output}));
        } else {
            println!("✅ Configuration written to {}", output);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let archiver = Archiver::new(config);
    let json = cli.json;

    let result = match cli.command {
        Commands::Compress { source, dest } => archiver
            .compress_file(&source, &dest)
            .map(|report| print_compression(&report, json)),
        Commands::Decompress { source, dest } => archiver
            .decompress_file(&source, &dest)
            .map(|report| print_decompression("🔄 Decompressed", &report, json)),
        Commands::Inspect { payload, codes } => archiver
            .inspect(&payload, codes)
            .map(|summary| print_summary(&summary, json)),
        Commands::Verify { payload } => archiver
            .verify(&payload)
            .map(|report| print_decompression("🔍 Verified", &report, json)),
        Commands::GenerateConfig { .. } => Ok(()),
    };

    if let Err(e) = result {
        if json {
            println!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("❌ {}", e);
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_compression(report: &CompressionReport, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
        return;
    }
    println!("📦 Compressed {}", report.source);
    println!("   Payload: {} ({} bytes, {} bits)", report.payload, report.payload_bytes, report.bit_count);
    println!("   Descriptor: {} ({} bytes)", report.descriptor, report.descriptor_bytes);
    println!("   Original: {} bytes", report.original_bytes);
    println!("   Ratio: {:.1}%", report.ratio * 100.0);
    println!("   Symbols: {} (longest code {} bits)", report.distinct_symbols, report.max_code_len);
    println!("   Entropy: {:.3} bits/symbol", report.entropy_bits_per_symbol);
}

fn print_decompression(title: &str, report: &DecompressionReport, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
        return;
    }
    println!("{} {}", title, report.payload);
    if let Some(dest) = &report.destination {
        println!("   Output: {}", dest);
    }
    println!("   Restored: {} bytes from {} bits", report.restored_bytes, report.bit_count);
    println!("   Digest checked: {}", if report.digest_verified { "✅" } else { "skipped" });
}

fn print_summary(summary: &DescriptorSummary, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
        return;
    }
    println!("📋 Descriptor {}", summary.descriptor);
    println!("   Bit count: {}", summary.bit_count);
    println!("   Payload: {} bytes", summary.payload_bytes);
    println!("   Original: {} bytes", summary.original_bytes);
    println!("   Payload CRC32: {}", summary.payload_crc32);
    println!("   Original SHA-256: {}", summary.original_sha256);
    println!("   Symbols: {} (longest code {} bits)", summary.distinct_symbols, summary.max_code_len);
    println!("   Code table embedded: {}", summary.code_table_embedded);
    if let Some(codes) = &summary.codes {
        for entry in codes {
            println!("   {:#04x} {}", entry.symbol, entry.code);
        }
    }
}
