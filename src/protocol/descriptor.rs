use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::engine::{
    codes::CodeTable,
    error::{HuffmanError, HuffmanResult},
    hash::{checksum, sha256},
    huffman::{HuffmanNode, HuffmanTree},
};
use crate::protocol::constants::{DESCRIPTOR_MAGIC, DESCRIPTOR_VERSION, MAX_DESCRIPTOR_BODY};

pub type ByteTree = HuffmanTree<u8, u64>;

const MAX_TREE_NODES: usize = 2 * 256 - 1;

/// Fixed-size descriptor header (16 bytes, big-endian)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorHeader {
    pub version: u16,
    pub header_len: u16,
    pub body_len: u32,
    pub checksum: u32,
}

impl DescriptorHeader {
    pub const SIZE: usize = 16;

    pub fn decode(buf: &[u8]) -> HuffmanResult<Self> {
        if buf.len() < Self::SIZE {
            error!("Descriptor too short: {} bytes", buf.len());
            return Err(HuffmanError::mismatch("descriptor shorter than its header"));
        }

        if buf[0..4] != DESCRIPTOR_MAGIC {
            error!("Invalid magic bytes: {:?}, expected {:?}", &buf[0..4], DESCRIPTOR_MAGIC);
            return Err(HuffmanError::mismatch("invalid descriptor magic"));
        }

        let version = u16::from_be_bytes([buf[4], buf[5]]);
        if version != DESCRIPTOR_VERSION {
            error!("Unsupported version: {}, expected {}", version, DESCRIPTOR_VERSION);
            return Err(HuffmanError::mismatch(format!(
                "unsupported descriptor version {}",
                version
            )));
        }

        let header_len = u16::from_be_bytes([buf[6], buf[7]]);
        if header_len as usize != Self::SIZE {
            return Err(HuffmanError::mismatch(format!(
                "unexpected header length {}",
                header_len
            )));
        }

        Ok(Self {
            version,
            header_len,
            body_len: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
            checksum: u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&DESCRIPTOR_MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_be_bytes());
        buf[6..8].copy_from_slice(&self.header_len.to_be_bytes());
        buf[8..12].copy_from_slice(&self.body_len.to_be_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_be_bytes());
        buf
    }
}

/// One tree node in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum WireNode {
    Leaf { symbol: u8, weight: u64 },
    Internal { weight: u64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct DescriptorBody {
    bit_count: u64,
    original_len: u64,
    payload_crc32: u32,
    original_sha256: [u8; 32],
    tree: Option<Vec<WireNode>>,
    code_table: Option<CodeTable<u8>>,
}

/// Side data a payload needs to be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecDescriptor {
    /// Meaningful bits in the payload; the rest of the last byte is padding.
    pub bit_count: u64,
    pub original_len: u64,
    pub payload_crc32: u32,
    pub original_sha256: [u8; 32],
    /// `None` marks an empty input.
    pub tree: Option<ByteTree>,
    pub code_table: Option<CodeTable<u8>>,
}

fn body_options() -> impl Options {
    bincode::options().with_limit(MAX_DESCRIPTOR_BODY)
}

impl CodecDescriptor {
    /// Descriptor for a zero-length input.
    pub fn empty() -> Self {
        Self {
            bit_count: 0,
            original_len: 0,
            payload_crc32: checksum(&[]),
            original_sha256: sha256(&[]),
            tree: None,
            code_table: None,
        }
    }

    pub fn encode(&self) -> HuffmanResult<Vec<u8>> {
        let body = DescriptorBody {
            bit_count: self.bit_count,
            original_len: self.original_len,
            payload_crc32: self.payload_crc32,
            original_sha256: self.original_sha256,
            tree: self.tree.as_ref().map(flatten),
            code_table: self.code_table.clone(),
        };
        let body = body_options()
            .serialize(&body)
            .map_err(|e| HuffmanError::mismatch(format!("cannot encode descriptor: {}", e)))?;

        let header = DescriptorHeader {
            version: DESCRIPTOR_VERSION,
            header_len: DescriptorHeader::SIZE as u16,
            body_len: u32::try_from(body.len())
                .map_err(|_| HuffmanError::mismatch("descriptor body too large"))?,
            checksum: checksum(&body),
        };

        let mut out = Vec::with_capacity(DescriptorHeader::SIZE + body.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn decode(buf: &[u8]) -> HuffmanResult<Self> {
        let header = DescriptorHeader::decode(buf)?;
        let body = &buf[DescriptorHeader::SIZE..];

        if body.len() != header.body_len as usize {
            return Err(HuffmanError::mismatch(format!(
                "descriptor body is {} bytes, header declares {}",
                body.len(),
                header.body_len
            )));
        }

        let computed = checksum(body);
        if computed != header.checksum {
            error!("Checksum mismatch: expected={:x}, computed={:x}", header.checksum, computed);
            return Err(HuffmanError::mismatch("descriptor checksum mismatch"));
        }

        let body: DescriptorBody = body_options()
            .deserialize(body)
            .map_err(|e| HuffmanError::mismatch(format!("cannot decode descriptor: {}", e)))?;

        let tree = body.tree.map(rebuild).transpose()?;
        match &tree {
            Some(tree) => {
                if let Some(table) = &body.code_table {
                    if *table != CodeTable::from_tree(tree) {
                        return Err(HuffmanError::mismatch("code table disagrees with the tree"));
                    }
                }
            }
            None => {
                if body.bit_count != 0 || body.original_len != 0 || body.code_table.is_some() {
                    return Err(HuffmanError::mismatch("empty-file descriptor carries data"));
                }
            }
        }

        debug!(
            "loaded descriptor: {} bits, {} original bytes",
            body.bit_count, body.original_len
        );

        Ok(Self {
            bit_count: body.bit_count,
            original_len: body.original_len,
            payload_crc32: body.payload_crc32,
            original_sha256: body.original_sha256,
            tree,
            code_table: body.code_table,
        })
    }
}

fn flatten(tree: &ByteTree) -> Vec<WireNode> {
    let mut nodes = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, weight } => nodes.push(WireNode::Leaf {
                symbol: *symbol,
                weight: *weight,
            }),
            HuffmanNode::Internal { weight, left, right } => {
                nodes.push(WireNode::Internal { weight: *weight });
                stack.push(right);
                stack.push(left);
            }
        }
    }
    nodes
}

/// Rebuilds a tree from its pre-order listing. Walking the list backwards,
/// an internal node's left subtree is the top of the stack, its right
/// subtree the entry below.
fn rebuild(nodes: Vec<WireNode>) -> HuffmanResult<ByteTree> {
    // 256 distinct leaves need at most 511 nodes.
    if nodes.len() > MAX_TREE_NODES {
        return Err(HuffmanError::mismatch(format!(
            "tree listing has {} nodes, at most {} allowed",
            nodes.len(),
            MAX_TREE_NODES
        )));
    }

    let mut stack: Vec<HuffmanNode<u8, u64>> = Vec::new();

    for node in nodes.into_iter().rev() {
        match node {
            WireNode::Leaf { symbol, weight } => stack.push(HuffmanNode::leaf(symbol, weight)),
            WireNode::Internal { weight } => {
                let (Some(left), Some(right)) = (stack.pop(), stack.pop()) else {
                    return Err(HuffmanError::mismatch("internal node is missing a child"));
                };
                if left.weight().checked_add(right.weight()) != Some(weight) {
                    return Err(HuffmanError::mismatch(
                        "internal weight differs from the sum of its children",
                    ));
                }
                let merged = HuffmanNode::Internal {
                    weight,
                    left: Box::new(left),
                    right: Box::new(right),
                };
                stack.push(merged);
            }
        }
    }

    let root = stack
        .pop()
        .ok_or_else(|| HuffmanError::mismatch("tree has no nodes"))?;
    if !stack.is_empty() {
        return Err(HuffmanError::mismatch("tree listing has unattached nodes"));
    }

    // Leaf symbols are still unchecked for repeats.
    HuffmanTree::from_root(root).map_err(|e| {
        error!("rejected descriptor tree: {}", e);
        e
    })
}
