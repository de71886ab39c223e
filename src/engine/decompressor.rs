use tracing::{debug, warn};

use crate::engine::{
    bits::BitReader,
    error::{HuffmanError, HuffmanResult},
    hash::{checksum, sha256},
    huffman::{HuffmanNode, HuffmanTree},
};
use crate::protocol::descriptor::CodecDescriptor;

/// Walks `tree` over the first `bit_count` bits of `bytes`.
pub fn unpack<S: Clone, W: Copy>(
    bytes: &[u8],
    bit_count: u64,
    tree: &HuffmanTree<S, W>,
) -> HuffmanResult<Vec<S>> {
    let reader = BitReader::new(bytes, bit_count)?;
    let root = tree.root();
    let mut symbols = Vec::new();

    // Single-symbol streams carry one `0` bit per symbol.
    if let HuffmanNode::Leaf { symbol, .. } = root {
        for (position, bit) in reader.enumerate() {
            if bit {
                return Err(HuffmanError::corrupt(format!(
                    "set bit at position {} in a single-symbol stream",
                    position
                )));
            }
            symbols.push(symbol.clone());
        }
        return Ok(symbols);
    }

    let mut cursor = root;
    for bit in reader {
        let next = cursor
            .child(bit)
            .ok_or_else(|| HuffmanError::corrupt("decoder cursor stopped on a leaf"))?;

        match next {
            HuffmanNode::Leaf { symbol, .. } => {
                symbols.push(symbol.clone());
                cursor = root;
            }
            HuffmanNode::Internal { .. } => cursor = next,
        }
    }

    if !std::ptr::eq(cursor, root) {
        return Err(HuffmanError::corrupt("bit count ends inside a code"));
    }

    Ok(symbols)
}

/// Rebuilds the original bytes from a payload and its descriptor, checking
/// the payload checksum, decoded length and, when asked, the input digest.
pub fn decompress(
    payload: &[u8],
    descriptor: &CodecDescriptor,
    verify_digest: bool,
) -> HuffmanResult<Vec<u8>> {
    let computed = checksum(payload);
    if computed != descriptor.payload_crc32 {
        warn!(
            "payload checksum mismatch: expected={:x}, computed={:x}",
            descriptor.payload_crc32, computed
        );
        return Err(HuffmanError::corrupt("payload checksum mismatch"));
    }

    let output = match &descriptor.tree {
        Some(tree) => unpack(payload, descriptor.bit_count, tree)?,
        None if descriptor.bit_count == 0 => Vec::new(),
        None => {
            return Err(HuffmanError::mismatch("bit count present without a tree"));
        }
    };

    if output.len() as u64 != descriptor.original_len {
        return Err(HuffmanError::corrupt(format!(
            "decoded {} bytes, descriptor expects {}",
            output.len(),
            descriptor.original_len
        )));
    }

    if verify_digest && sha256(&output) != descriptor.original_sha256 {
        return Err(HuffmanError::corrupt("decoded digest differs from the original"));
    }

    debug!("unpacked {} bits into {} bytes", descriptor.bit_count, output.len());
    Ok(output)
}
