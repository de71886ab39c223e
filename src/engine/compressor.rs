use tracing::debug;

use crate::engine::{
    bits::BitWriter,
    codes::CodeTable,
    error::{HuffmanError, HuffmanResult},
    frequency::{count_bytes, FrequencyTable},
    hash::{checksum, sha256},
    huffman::HuffmanTree,
};
use crate::protocol::descriptor::CodecDescriptor;

/// Byte-aligned packed bits plus how many of them carry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub bytes: Vec<u8>,
    pub bit_count: u64,
}

/// Everything one compression run produces.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub payload: Vec<u8>,
    pub descriptor: CodecDescriptor,
    pub frequencies: FrequencyTable<u8>,
    pub code_table: Option<CodeTable<u8>>,
}

pub fn pack<S: Ord>(symbols: &[S], table: &CodeTable<S>) -> HuffmanResult<PackedBits> {
    let mut writer = BitWriter::with_capacity(symbols.len() / 2);

    for (position, symbol) in symbols.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::MissingCode { position })?;
        writer.push_code(code);
    }

    let (bytes, bit_count) = writer.finish();
    Ok(PackedBits { bytes, bit_count })
}

/// Huffman-codes `input`. An empty input yields an empty payload and a
/// descriptor without a tree.
pub fn compress(input: &[u8], embed_code_table: bool) -> HuffmanResult<Compressed> {
    if input.is_empty() {
        debug!("empty input, writing empty-file descriptor");
        return Ok(Compressed {
            payload: Vec::new(),
            descriptor: CodecDescriptor::empty(),
            frequencies: FrequencyTable::new(),
            code_table: None,
        });
    }

    let frequencies = count_bytes(input);
    let tree = HuffmanTree::build(frequencies.weights())?;
    let table = CodeTable::from_tree(&tree);
    let packed = pack(input, &table)?;

    debug!(
        "packed {} bytes into {} bits ({} distinct symbols, longest code {} bits)",
        input.len(),
        packed.bit_count,
        table.len(),
        table.max_code_len()
    );

    let descriptor = CodecDescriptor {
        bit_count: packed.bit_count,
        original_len: input.len() as u64,
        payload_crc32: checksum(&packed.bytes),
        original_sha256: sha256(input),
        tree: Some(tree),
        code_table: embed_code_table.then(|| table.clone()),
    };

    Ok(Compressed {
        payload: packed.bytes,
        descriptor,
        frequencies,
        code_table: Some(table),
    })
}
