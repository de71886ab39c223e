use std::collections::BTreeMap;

/// Occurrence counts for every distinct symbol of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Ord> {
    counts: BTreeMap<S, u64>,
    total: u64,
}

impl<S: Ord> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<S: Ord> FrequencyTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, symbol: S) {
        self.record_many(symbol, 1);
    }

    pub fn record_many(&mut self, symbol: S, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(symbol).or_insert(0) += count;
        self.total += count;
    }

    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterates `(symbol, count)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> + '_ {
        self.counts.iter().map(|(s, &c)| (s, c))
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.counts
            .values()
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

impl<S: Ord + Clone> FrequencyTable<S> {
    /// `(symbol, weight)` pairs ready for the tree builder.
    pub fn weights(&self) -> Vec<(S, u64)> {
        self.counts.iter().map(|(s, &c)| (s.clone(), c)).collect()
    }
}

impl<S: Ord> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for symbol in iter {
            table.record(symbol);
        }
        table
    }
}

/// Tally byte values with a flat array before moving them into the table.
pub fn count_bytes(data: &[u8]) -> FrequencyTable<u8> {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let mut table = FrequencyTable::new();
    for (byte, &count) in counts.iter().enumerate() {
        table.record_many(byte as u8, count);
    }
    table
}
