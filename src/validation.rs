/// Cross-module checks over generated data:
/// 1. **Round-trip correctness** through the engine and through descriptors
/// 2. **Code properties** - prefix freedom, bit accounting, optimal cost
/// 3. **Determinism** - identical output for identical input
/// 4. **Edge cases** - one symbol, full alphabet, every padding width
#[cfg(test)]
mod tests {
    use crate::engine::codes::CodeTable;
    use crate::engine::compressor::{compress, pack};
    use crate::engine::decompressor::{decompress, unpack};
    use crate::engine::frequency::count_bytes;
    use crate::engine::huffman::HuffmanTree;
    use crate::protocol::descriptor::CodecDescriptor;

    // ---------------------------------------------------------------
    // Test vectors
    // ---------------------------------------------------------------

    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Every byte value once.
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    fn data_runs() -> Vec<u8> {
        let mut v = Vec::new();
        for i in 0..50u8 {
            for _ in 0..(256 - i as usize * 4).max(1) {
                v.push(i);
            }
        }
        v
    }

    /// xorshift32, so the vector is the same on every run.
    fn data_pseudo_random(n: usize, mut state: u32) -> Vec<u8> {
        (0..n)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    }

    /// Exponentially skewed weights give a deep, lopsided tree.
    fn data_fibonacci_weights() -> Vec<u8> {
        let (mut a, mut b) = (1usize, 1usize);
        let mut v = Vec::new();
        for symbol in 0..20u8 {
            v.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }
        v
    }

    fn engine_round_trip(input: &[u8]) {
        let frequencies = count_bytes(input);
        let tree = HuffmanTree::build(frequencies.weights()).unwrap();
        let table = CodeTable::from_tree(&tree);
        let packed = pack(input, &table).unwrap();

        assert!(table.is_prefix_free());
        assert!(packed.bit_count <= packed.bytes.len() as u64 * 8);
        assert!(packed.bit_count + 8 > packed.bytes.len() as u64 * 8);
        assert_eq!(Some(packed.bit_count), table.encoded_bits(&frequencies));

        let decoded = unpack(&packed.bytes, packed.bit_count, &tree).unwrap();
        assert_eq!(decoded, input, "engine round-trip failed");
    }

    fn descriptor_round_trip(input: &[u8]) {
        let compressed = compress(input, true).unwrap();
        let encoded = compressed.descriptor.encode().unwrap();
        let descriptor = CodecDescriptor::decode(&encoded).unwrap();
        assert_eq!(descriptor, compressed.descriptor);

        let decoded = decompress(&compressed.payload, &descriptor, true).unwrap();
        assert_eq!(decoded, input, "descriptor round-trip failed");
    }

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn engine() {
                    engine_round_trip(&$data);
                }

                #[test]
                fn through_descriptor() {
                    descriptor_round_trip(&$data);
                }
            }
        };
    }

    round_trip_test!(zeros_1, data_all_zeros(1));
    round_trip_test!(zeros_1000, data_all_zeros(1000));
    round_trip_test!(uniform, data_uniform());
    round_trip_test!(skewed, data_skewed(1000));
    round_trip_test!(repeating_text, data_repeating_text());
    round_trip_test!(sawtooth, data_sawtooth(3000));
    round_trip_test!(runs, data_runs());
    round_trip_test!(pseudo_random, data_pseudo_random(4096, 0x9E37_79B9));
    round_trip_test!(two_symbols, b"abababababbbbbba".to_vec());
    round_trip_test!(fibonacci, data_fibonacci_weights());

    // ---------------------------------------------------------------
    // Padding widths
    // ---------------------------------------------------------------

    #[test]
    fn every_padding_width_round_trips() {
        // Two equally weighted symbols code to one bit each, so n symbols
        // leave n % 8 meaningful bits in the last byte.
        for n in 1..=16usize {
            let input: Vec<u8> = (0..n).map(|i| if i % 2 == 0 { b'a' } else { b'b' }).collect();
            let compressed = compress(&input, false).unwrap();
            let expected_bits = if n == 1 { 1 } else { n as u64 };
            assert_eq!(compressed.descriptor.bit_count, expected_bits, "n={}", n);
            assert_eq!(compressed.payload.len(), (expected_bits as usize).div_ceil(8));
            assert_eq!(decompress(&compressed.payload, &compressed.descriptor, true).unwrap(), input);
        }
    }

    // ---------------------------------------------------------------
    // Worked example and alphabet edge cases
    // ---------------------------------------------------------------

    #[test]
    fn yhl_scenario() {
        let compressed = compress(b"YHLYYH", true).unwrap();
        let table = compressed.code_table.as_ref().unwrap();
        assert_eq!(table.get(&b'Y').unwrap(), &[false]);
        assert_eq!(table.get(&b'L').unwrap(), &[true, false]);
        assert_eq!(table.get(&b'H').unwrap(), &[true, true]);
        assert_eq!(compressed.payload, vec![0b0111_0001, 0b1000_0000]);
        assert_eq!(compressed.descriptor.bit_count, 9);
        assert!(compressed.descriptor.bit_count < 48);
    }

    #[test]
    fn single_symbol_alphabet() {
        let input = vec![b'z'; 13];
        let compressed = compress(&input, true).unwrap();
        assert_eq!(compressed.descriptor.bit_count, 13);
        assert_eq!(compressed.payload, vec![0, 0]);
        assert_eq!(compressed.code_table.as_ref().unwrap().get(&b'z').unwrap(), &[false]);
        descriptor_round_trip(&input);
    }

    #[test]
    fn full_alphabet_uses_eight_bit_codes() {
        let compressed = compress(&data_uniform(), false).unwrap();
        let table = compressed.code_table.as_ref().unwrap();
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, code)| code.len() == 8));
        assert_eq!(compressed.descriptor.bit_count, 256 * 8);
    }

    #[test]
    fn full_alphabet_with_uneven_weights_stays_within_nine_bits() {
        let mut input = data_uniform();
        input.extend_from_slice(b"abc");
        let compressed = compress(&input, false).unwrap();
        let table = compressed.code_table.as_ref().unwrap();
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, code)| (7..=9).contains(&code.len())));
    }

    #[test]
    fn empty_input() {
        let compressed = compress(&[], true).unwrap();
        assert!(compressed.payload.is_empty());
        assert_eq!(compressed.descriptor.bit_count, 0);
        descriptor_round_trip(&[]);
    }

    // ---------------------------------------------------------------
    // Determinism and optimality
    // ---------------------------------------------------------------

    #[test]
    fn identical_input_gives_identical_output() {
        let input = data_pseudo_random(2000, 7);
        let a = compress(&input, true).unwrap();
        let b = compress(&input, true).unwrap();
        assert_eq!(a.payload, b.payload);
        assert_eq!(a.descriptor.encode().unwrap(), b.descriptor.encode().unwrap());
    }

    #[test]
    fn relabeling_symbols_keeps_total_cost() {
        // Ties fall differently once symbols are renamed, but every Huffman
        // tree over the same weights has the same weighted path length.
        let input = data_repeating_text();
        let relabeled: Vec<u8> = input.iter().map(|b| 255 - b).collect();
        let a = compress(&input, false).unwrap();
        let b = compress(&relabeled, false).unwrap();
        assert_eq!(a.descriptor.bit_count, b.descriptor.bit_count);
    }

    #[test]
    fn cost_is_within_one_bit_of_entropy() {
        for input in [data_skewed(1000), data_repeating_text(), data_runs()] {
            let compressed = compress(&input, false).unwrap();
            let bits_per_symbol = compressed.descriptor.bit_count as f64 / input.len() as f64;
            let entropy = compressed.frequencies.entropy();
            assert!(bits_per_symbol >= entropy - 1e-9);
            assert!(bits_per_symbol < entropy + 1.0);
        }
    }

    #[test]
    fn generic_engine_over_words() {
        let words: Vec<&str> = "to be or not to be that is the question"
            .split(' ')
            .collect();
        let mut weights = std::collections::BTreeMap::new();
        for word in &words {
            *weights.entry(*word).or_insert(0u32) += 1;
        }
        let tree = HuffmanTree::build(weights).unwrap();
        let table = CodeTable::from_tree(&tree);
        let packed = pack(&words, &table).unwrap();
        let decoded = unpack(&packed.bytes, packed.bit_count, &tree).unwrap();
        assert_eq!(decoded, words);
    }
}
