pub mod bits;
pub mod codes;
pub mod compressor;
pub mod decompressor;
pub mod error;
pub mod frequency;
pub mod hash;
pub mod huffman;

pub use codes::CodeTable;
pub use compressor::*;
pub use decompressor::*;
pub use error::{HuffmanError, HuffmanResult};
pub use frequency::FrequencyTable;
pub use huffman::{HuffmanNode, HuffmanTree, Weight};
