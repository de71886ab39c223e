use crate::engine::error::{HuffmanError, HuffmanResult};

/// Packs bits MSB-first into bytes, counting only the bits pushed.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
    bit_count: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        self.bit_count += 1;

        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    pub fn push_code(&mut self, code: &[bool]) {
        for &bit in code {
            self.push_bit(bit);
        }
    }

    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flushes a partial byte with zero padding in its low bits.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        (self.bytes, self.bit_count)
    }
}

/// Reads exactly `limit` bits MSB-first; anything after them is padding.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: u64,
    limit: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8], limit: u64) -> HuffmanResult<Self> {
        let available = (bytes.len() as u64).saturating_mul(8);
        if limit > available {
            return Err(HuffmanError::corrupt(format!(
                "bit count {} exceeds the {} bits in the payload",
                limit, available
            )));
        }
        Ok(Self {
            bytes,
            position: 0,
            limit,
        })
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.limit {
            return None;
        }
        let byte = self.bytes[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
