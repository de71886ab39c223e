use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CodecConfig;
use crate::engine::compressor::compress;
use crate::engine::decompressor::decompress;
use crate::engine::error::HuffmanResult;
use crate::metrics::{CompressionReport, DecompressionReport, DescriptorSummary};
use crate::protocol::descriptor::CodecDescriptor;
use crate::storage::files::{ensure_writable, read_all, with_suffix, write_atomic, StagedFile};

/// File-level compress/decompress over a payload and its descriptor sibling.
pub struct Archiver {
    config: CodecConfig,
}

impl Archiver {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn descriptor_path(&self, payload: &Path) -> PathBuf {
        with_suffix(payload, &self.config.descriptor_suffix)
    }

    pub fn compress_file(&self, source: &Path, dest: &Path) -> HuffmanResult<CompressionReport> {
        let descriptor_path = self.descriptor_path(dest);
        ensure_writable(dest, self.config.overwrite)?;
        ensure_writable(&descriptor_path, self.config.overwrite)?;

        let input = read_all(source)?;
        let compressed = compress(&input, self.config.embed_code_table)?;
        let descriptor_bytes = compressed.descriptor.encode()?;

        // Both files are fully written before either replaces anything.
        let payload = StagedFile::stage(dest, &compressed.payload)?;
        let descriptor = StagedFile::stage(&descriptor_path, &descriptor_bytes)?;
        descriptor.commit()?;
        payload.commit()?;

        let report = CompressionReport::new(
            source,
            dest,
            &descriptor_path,
            &compressed,
            descriptor_bytes.len() as u64,
        );
        info!(
            "compressed {}: {} -> {} bytes ({} bits)",
            source.display(),
            report.original_bytes,
            report.payload_bytes,
            report.bit_count
        );
        Ok(report)
    }

    pub fn decompress_file(&self, source: &Path, dest: &Path) -> HuffmanResult<DecompressionReport> {
        ensure_writable(dest, self.config.overwrite)?;

        let (payload, descriptor) = self.load(source)?;
        let output = decompress(&payload, &descriptor, self.config.verify_digest)?;
        write_atomic(dest, &output)?;

        info!(
            "decompressed {}: {} -> {} bytes",
            source.display(),
            payload.len(),
            output.len()
        );
        Ok(DecompressionReport {
            payload: source.display().to_string(),
            destination: Some(dest.display().to_string()),
            payload_bytes: payload.len() as u64,
            bit_count: descriptor.bit_count,
            restored_bytes: output.len() as u64,
            digest_verified: self.config.verify_digest,
        })
    }

    /// Reads and validates the descriptor next to `payload`.
    pub fn inspect(&self, payload: &Path, with_codes: bool) -> HuffmanResult<DescriptorSummary> {
        let descriptor_path = self.descriptor_path(payload);
        let descriptor = CodecDescriptor::decode(&read_all(&descriptor_path)?)?;
        Ok(DescriptorSummary::new(&descriptor_path, &descriptor, with_codes))
    }

    /// Decodes in memory and runs every integrity check, digest included.
    pub fn verify(&self, payload_path: &Path) -> HuffmanResult<DecompressionReport> {
        let (payload, descriptor) = self.load(payload_path)?;
        let output = decompress(&payload, &descriptor, true)?;

        info!("verified {}: {} bytes", payload_path.display(), output.len());
        Ok(DecompressionReport {
            payload: payload_path.display().to_string(),
            destination: None,
            payload_bytes: payload.len() as u64,
            bit_count: descriptor.bit_count,
            restored_bytes: output.len() as u64,
            digest_verified: true,
        })
    }

    fn load(&self, payload_path: &Path) -> HuffmanResult<(Vec<u8>, CodecDescriptor)> {
        let payload = read_all(payload_path)?;
        let descriptor = CodecDescriptor::decode(&read_all(&self.descriptor_path(payload_path))?)?;
        Ok((payload, descriptor))
    }
}
