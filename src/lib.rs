//! Huffman file compression.
//!
//! A payload file holds the packed code bits, most significant bit first,
//! and a descriptor file next to it holds the tree, the exact bit count and
//! integrity data. The engine is generic over symbol and weight types; the
//! file layer works on bytes.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod protocol;
pub mod storage;

#[cfg(test)]
mod validation;

pub use config::CodecConfig;
pub use engine::{
    compress, decompress, pack, unpack, CodeTable, FrequencyTable, HuffmanError, HuffmanNode,
    HuffmanResult, HuffmanTree,
};
pub use protocol::CodecDescriptor;
pub use storage::Archiver;
