use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tracing::debug;

use crate::engine::error::{HuffmanError, HuffmanResult};

/// Anything that can weigh a node: totally ordered and summable without
/// wrapping.
pub trait Weight: Copy + Ord {
    fn checked_sum(self, other: Self) -> Option<Self>;
}

macro_rules! impl_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                fn checked_sum(self, other: Self) -> Option<Self> {
                    self.checked_add(other)
                }
            }
        )*
    };
}

impl_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S, W> {
    Leaf {
        symbol: S,
        weight: W,
    },
    Internal {
        weight: W,
        left: Box<HuffmanNode<S, W>>,
        right: Box<HuffmanNode<S, W>>,
    },
}

impl<S, W: Copy> HuffmanNode<S, W> {
    pub fn leaf(symbol: S, weight: W) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    pub fn weight(&self) -> W {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    /// Child reached by `bit` (`false` = left, `true` = right). Leaves have none.
    pub fn child(&self, bit: bool) -> Option<&Self> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => {
                Some(if bit { &**right } else { &**left })
            }
        }
    }
}

impl<S, W: Weight> HuffmanNode<S, W> {
    pub fn merge(left: Self, right: Self) -> HuffmanResult<Self> {
        let weight = left
            .weight()
            .checked_sum(right.weight())
            .ok_or(HuffmanError::WeightOverflow)?;
        Ok(HuffmanNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Queue entry. `seq` makes equal weights pop in a reproducible order.
struct Pending<S, W> {
    weight: W,
    seq: u64,
    node: HuffmanNode<S, W>,
}

impl<S, W: Ord> PartialEq for Pending<S, W> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl<S, W: Ord> Eq for Pending<S, W> {}

impl<S, W: Ord> PartialOrd for Pending<S, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, W: Ord> Ord for Pending<S, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S, W> {
    root: HuffmanNode<S, W>,
}

impl<S, W> HuffmanTree<S, W> {
    pub fn root(&self) -> &HuffmanNode<S, W> {
        &self.root
    }

    pub fn into_root(self) -> HuffmanNode<S, W> {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => count += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }
}

impl<S: Ord, W: Weight> HuffmanTree<S, W> {
    /// Canonical merge tree over `(symbol, weight)` pairs.
    ///
    /// Leaves are seeded in ascending symbol order and every queued node gets
    /// a sequence number (seed index, then creation order for merged nodes);
    /// the queue pops by `(weight, seq)`. The first node popped becomes the
    /// left child. A repeated symbol has its weights summed into one leaf.
    pub fn build<I>(weights: I) -> HuffmanResult<Self>
    where
        I: IntoIterator<Item = (S, W)>,
    {
        let mut leaves: BTreeMap<S, W> = BTreeMap::new();
        for (symbol, weight) in weights {
            let total = match leaves.remove(&symbol) {
                Some(existing) => existing
                    .checked_sum(weight)
                    .ok_or(HuffmanError::WeightOverflow)?,
                None => weight,
            };
            leaves.insert(symbol, total);
        }

        let mut heap = BinaryHeap::with_capacity(leaves.len());
        let mut seq = 0u64;
        for (symbol, weight) in leaves {
            heap.push(Pending {
                weight,
                seq,
                node: HuffmanNode::leaf(symbol, weight),
            });
            seq += 1;
        }
        debug!("building huffman tree from {} symbols", heap.len());

        loop {
            let Some(left) = heap.pop() else {
                return Err(HuffmanError::EmptyInput);
            };
            let Some(right) = heap.pop() else {
                return Ok(Self { root: left.node });
            };

            let node = HuffmanNode::merge(left.node, right.node)?;
            heap.push(Pending {
                weight: node.weight(),
                seq,
                node,
            });
            seq += 1;
        }
    }

    /// Wraps an already assembled root after checking the node invariants:
    /// internal weights equal the sum of their children and no symbol repeats.
    pub fn from_root(root: HuffmanNode<S, W>) -> HuffmanResult<Self> {
        {
            let mut seen = BTreeSet::new();
            let mut stack = vec![&root];
            while let Some(node) = stack.pop() {
                match node {
                    HuffmanNode::Leaf { symbol, .. } => {
                        if !seen.insert(symbol) {
                            return Err(HuffmanError::mismatch("symbol appears on more than one leaf"));
                        }
                    }
                    HuffmanNode::Internal { weight, left, right } => {
                        if left.weight().checked_sum(right.weight()) != Some(*weight) {
                            return Err(HuffmanError::mismatch(
                                "internal weight differs from the sum of its children",
                            ));
                        }
                        stack.push(right);
                        stack.push(left);
                    }
                }
            }
        }
        Ok(Self { root })
    }
}
