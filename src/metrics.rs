use serde::Serialize;
use std::path::Path;

use crate::engine::codes::{code_to_string, CodeTable};
use crate::engine::compressor::Compressed;
use crate::protocol::descriptor::CodecDescriptor;

#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub source: String,
    pub payload: String,
    pub descriptor: String,
    pub original_bytes: u64,
    pub payload_bytes: u64,
    pub descriptor_bytes: u64,
    pub bit_count: u64,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
    pub entropy_bits_per_symbol: f64,
    /// Payload bytes over original bytes; 0 for an empty input.
    pub ratio: f64,
}

impl CompressionReport {
    pub fn new(
        source: &Path,
        payload: &Path,
        descriptor: &Path,
        compressed: &Compressed,
        descriptor_bytes: u64,
    ) -> Self {
        let original_bytes = compressed.descriptor.original_len;
        let payload_bytes = compressed.payload.len() as u64;
        Self {
            source: source.display().to_string(),
            payload: payload.display().to_string(),
            descriptor: descriptor.display().to_string(),
            original_bytes,
            payload_bytes,
            descriptor_bytes,
            bit_count: compressed.descriptor.bit_count,
            distinct_symbols: compressed.frequencies.len(),
            max_code_len: compressed.code_table.as_ref().map_or(0, CodeTable::max_code_len),
            entropy_bits_per_symbol: compressed.frequencies.entropy(),
            ratio: if original_bytes > 0 {
                payload_bytes as f64 / original_bytes as f64
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecompressionReport {
    pub payload: String,
    pub destination: Option<String>,
    pub payload_bytes: u64,
    pub bit_count: u64,
    pub restored_bytes: u64,
    pub digest_verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeEntry {
    pub symbol: u8,
    pub code: String,
}

/// What `inspect` shows about a descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorSummary {
    pub descriptor: String,
    pub bit_count: u64,
    pub original_bytes: u64,
    pub payload_bytes: u64,
    pub payload_crc32: String,
    pub original_sha256: String,
    pub distinct_symbols: usize,
    pub max_code_len: usize,
    pub code_table_embedded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<CodeEntry>>,
}

impl DescriptorSummary {
    pub fn new(path: &Path, descriptor: &CodecDescriptor, with_codes: bool) -> Self {
        // Derive from the tree so this works whether or not the table was embedded.
        let table = descriptor.tree.as_ref().map(CodeTable::from_tree);
        let codes = match (&table, with_codes) {
            (Some(table), true) => Some(
                table
                    .iter()
                    .map(|(&symbol, code)| CodeEntry {
                        symbol,
                        code: code_to_string(code),
                    })
                    .collect(),
            ),
            (None, true) => Some(Vec::new()),
            _ => None,
        };

        Self {
            descriptor: path.display().to_string(),
            bit_count: descriptor.bit_count,
            original_bytes: descriptor.original_len,
            payload_bytes: descriptor.bit_count.div_ceil(8),
            payload_crc32: format!("{:08x}", descriptor.payload_crc32),
            original_sha256: hex::encode(descriptor.original_sha256),
            distinct_symbols: table.as_ref().map_or(0, CodeTable::len),
            max_code_len: table.as_ref().map_or(0, CodeTable::max_code_len),
            code_table_embedded: descriptor.code_table.is_some(),
            codes,
        }
    }
}
