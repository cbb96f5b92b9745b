//! Hamming weight lookup for every 16-bit value

use tracing::debug;

const TABLE_SIZE: usize = 1 << 16;

/// Number of set bits for each 16-bit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopCountTable {
    weights: Box<[u8]>,
}

impl PopCountTable {
    #[inline]
    pub fn get(&self, value: u16) -> u8 {
        self.weights[value as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.weights
    }
}

/// Fills the table with the doubling recurrence `w[i] = w[i >> 1] + (i & 1)`,
/// each entry derived from one already computed.
pub fn build_popcount_table() -> PopCountTable {
    let mut weights = vec![0u8; TABLE_SIZE].into_boxed_slice();
    for i in 1..TABLE_SIZE {
        weights[i] = weights[i >> 1] + (i & 1) as u8;
    }

    debug!("Built popcount table with {} entries", TABLE_SIZE);
    PopCountTable { weights }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_holds_everywhere() {
        let table = build_popcount_table();
        assert_eq!(table.get(0), 0);
        for x in 0..=u16::MAX {
            assert_eq!(table.get(x), table.get(x >> 1) + (x & 1) as u8);
            assert_eq!(table.get(x) as u32, x.count_ones());
        }
    }

    #[test]
    fn test_known_weights() {
        let table = build_popcount_table();
        assert_eq!(table.get(1), 1);
        assert_eq!(table.get(0b111), 3);
        assert_eq!(table.get(0x0101), 2);
        assert_eq!(table.get(u16::MAX), 16);
        assert_eq!(table.as_slice().len(), 65536);
    }

    #[test]
    fn test_construction_is_deterministic() {
        assert_eq!(build_popcount_table(), build_popcount_table());
    }
}
