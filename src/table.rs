//! Cosine-falloff similarity table for single-bit feature codes.
//!
//! Feature codes carry one set bit naming an orientation bucket out of eight.
//! The similarity between a model code and an image code decays with the bit
//! distance between them following a half-cosine, so adjacent buckets still
//! score high while opposite buckets score zero.

/// Half-cosine falloff indexed by bit distance 0..=8.
///
/// Entry `d` is `(cos(d * pi / 8) + 1) / 2`. Distance 8 marks codes with no
/// usable bit and always scores zero.
pub const COS_DIST: [f32; 9] = [
    1.0,
    0.961_939_766,
    0.853_553_391,
    0.691_341_716,
    0.5,
    0.308_658_284,
    0.146_446_609,
    0.038_060_234,
    0.0,
];

/// Sentinel bit index for codes without exactly one set bit.
pub const NO_BIT: usize = 8;

/// Precomputed similarity lookup between model bit positions and image bytes.
#[derive(Clone)]
pub struct MatchTable {
    lut: [u8; 256],
    table: [[f32; 256]; 9],
}

impl MatchTable {
    pub fn new() -> Self {
        let mut lut = [NO_BIT as u8; 256];
        for v in 0..8u8 {
            lut[(1u8 << v) as usize] = v;
        }

        let mut table = [[0.0f32; 256]; 9];
        for v in 0..8usize {
            let a = 1u8 << v;
            for byte in 0..256usize {
                let b = byte as u8;
                let mut dist = NO_BIT;
                for s in 0..8u32 {
                    // u8 shifts discard bits past the edge, so a probe that
                    // walks off one side only matches on the other.
                    if (a.wrapping_shl(s) & b) != 0 || (a.wrapping_shr(s) & b) != 0 {
                        dist = s as usize;
                        break;
                    }
                }
                table[v][byte] = COS_DIST[dist];
            }
        }
        // Row 8 stays all zeros for model codes without a single bit.

        Self { lut, table }
    }

    /// Bit position of a single-bit code, or [`NO_BIT`] otherwise.
    #[inline]
    pub fn bit_index(&self, code: u8) -> usize {
        self.lut[code as usize] as usize
    }

    /// Similarity between a learned model code and an image code.
    #[inline]
    pub fn similarity(&self, model: u8, image: u8) -> f32 {
        self.table[self.bit_index(model)][image as usize]
    }
}

impl Default for MatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cos_dist_matches_half_cosine() {
        for (d, &v) in COS_DIST.iter().enumerate().take(8) {
            let expected = ((d as f32 * std::f32::consts::PI / 8.0).cos() + 1.0) / 2.0;
            assert!((v - expected).abs() < 1e-6, "distance {d}");
        }
        assert_eq!(COS_DIST[8], 0.0);
    }

    #[test]
    fn identical_bits_score_one() {
        let t = MatchTable::new();
        for v in 0..8 {
            assert_eq!(t.similarity(1 << v, 1 << v), 1.0);
        }
    }

    #[test]
    fn zero_codes_score_zero() {
        let t = MatchTable::new();
        assert_eq!(t.similarity(0, 0), 0.0);
        assert_eq!(t.similarity(0b0100_0000, 0), 0.0);
        assert_eq!(t.similarity(0, 0b0000_0001), 0.0);
    }

    #[test]
    fn multi_bit_model_scores_zero() {
        let t = MatchTable::new();
        assert_eq!(t.bit_index(0b0000_0011), NO_BIT);
        assert_eq!(t.similarity(0b0000_0011, 0b0000_0001), 0.0);
    }

    #[test]
    fn image_byte_uses_nearest_set_bit() {
        let t = MatchTable::new();
        // Bits 2 and 3 set, model bit 0: nearest distance is 2.
        assert!((t.similarity(0b0000_0001, 0b0000_1100) - COS_DIST[2]).abs() < 1e-6);
        // Model bit 0 against image bit 1: adjacent buckets.
        assert!((t.similarity(0b0000_0001, 0b0000_0010) - COS_DIST[1]).abs() < 1e-6);
    }

    #[test]
    fn table_agrees_with_set_bit_minimum() {
        let t = MatchTable::new();
        for v in 0..8usize {
            for byte in 0..256usize {
                let mut min_dist = NO_BIT;
                for b in 0..8usize {
                    if byte & (1 << b) != 0 {
                        min_dist = min_dist.min((v as i32 - b as i32).unsigned_abs() as usize);
                    }
                }
                assert_eq!(t.similarity(1 << v, byte as u8), COS_DIST[min_dist]);
            }
        }
    }
}
