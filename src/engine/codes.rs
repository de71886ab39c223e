use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::frequency::FrequencyTable;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};

/// Symbol to prefix-code mapping; `false` is a `0` bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Ord + Deserialize<'de>"
))]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Vec<bool>>,
}

impl<S: Ord + Clone> CodeTable<S> {
    /// Pre-order walk from the root: left appends `0`, right appends `1`.
    /// A tree that is a single leaf gives that symbol the code `0`.
    pub fn from_tree<W>(tree: &HuffmanTree<S, W>) -> Self {
        fn build_codes<S: Ord + Clone, W>(
            node: &HuffmanNode<S, W>,
            code: &mut Vec<bool>,
            table: &mut BTreeMap<S, Vec<bool>>,
        ) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    let code = if code.is_empty() { vec![false] } else { code.clone() };
                    table.insert(symbol.clone(), code);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    code.push(false);
                    build_codes(left, code, table);
                    code.pop();

                    code.push(true);
                    build_codes(right, code, table);
                    code.pop();
                }
            }
        }

        let mut codes = BTreeMap::new();
        build_codes(tree.root(), &mut Vec::new(), &mut codes);
        Self { codes }
    }
}

impl<S: Ord> CodeTable<S> {
    pub fn get(&self, symbol: &S) -> Option<&[bool]> {
        self.codes.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &[bool])> + '_ {
        self.codes.iter().map(|(s, c)| (s, c.as_slice()))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Bits needed to encode an input with these symbol counts.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable<S>) -> Option<u64> {
        frequencies.iter().try_fold(0u64, |total, (symbol, count)| {
            let len = self.codes.get(symbol)?.len() as u64;
            total.checked_add(len.checked_mul(count)?)
        })
    }

    pub fn is_prefix_free(&self) -> bool {
        // Sorted codes put any prefix directly before a code it prefixes.
        let mut codes: Vec<&Vec<bool>> = self.codes.values().collect();
        if codes.iter().any(|c| c.is_empty()) {
            return false;
        }
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }
}

/// Renders a code as `0`/`1` text.
pub fn code_to_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}
