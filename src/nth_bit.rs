use roxygen::*;

use crate::tables::NTH_BIT_IN_BYTE;

/// Locate the position of the `(k + 1)`-th set bit of `w`.
///
/// Returns the 0-based bit position, or 64 if `w` has `k` or fewer set bits.
/// Both the hardware path and the portable fallback agree on the 64
/// sentinel, so the function is total even though the index only ever
/// calls it with `k < w.count_ones()`.
///
/// # Examples
///
/// ```
/// use bitmap_index::nth_bit;
///
/// assert_eq!(nth_bit(0b0110_1000, 0), 3);
/// assert_eq!(nth_bit(0b0110_1000, 2), 6);
/// assert_eq!(nth_bit(0b0110_1000, 3), 64);
/// ```
#[inline]
pub fn nth_bit(w: u64, k: u32) -> u32 {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    {
        // PDEP deposits the single 1 of `1 << k` at the position of the
        // k-th set bit of `w`; with k >= popcount it deposits nothing and
        // trailing_zeros of 0 is the 64 sentinel.
        let bit = 1u64.checked_shl(k).unwrap_or(0);
        let deposited = unsafe { core::arch::x86_64::_pdep_u64(bit, w) };
        deposited.trailing_zeros()
    }
    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    {
        nth_bit_byte_rank(w, k)
    }
}

#[roxygen]
/// Portable [`nth_bit`]: subtract per-byte popcounts until the containing
/// byte is found, then finish with a byte-level lookup table.
pub fn nth_bit_byte_rank(
    /// Word to search.
    w: u64,
    /// Rank of the wanted set bit; saturates to 64 when out of range.
    k: u32,
) -> u32 {
    let mut remaining = k;
    let mut offset = 0;
    while offset < u64::BITS {
        let byte = (w >> offset) as u8;
        let ones = byte.count_ones();
        if remaining < ones {
            let nth = NTH_BIT_IN_BYTE[((remaining as usize) << 8) | byte as usize];
            return offset + u32::from(nth);
        }
        remaining -= ones;
        offset += 8;
    }
    u64::BITS
}

#[cfg(test)]
mod tests {
    extern crate rand;
    use self::rand::{Rng, SeedableRng, StdRng};
    use super::*;

    fn nth_bit_naive(w: u64, k: u32) -> u32 {
        let mut remaining = k;
        for i in 0..64 {
            if (w >> i) & 1 == 1 {
                if remaining == 0 {
                    return i;
                }
                remaining -= 1;
            }
        }
        64
    }

    #[test]
    fn fixed_words() {
        assert_eq!(nth_bit(1, 0), 0);
        assert_eq!(nth_bit(1 << 63, 0), 63);
        assert_eq!(nth_bit(u64::MAX, 0), 0);
        assert_eq!(nth_bit(u64::MAX, 63), 63);
        assert_eq!(nth_bit(0b101, 1), 2);
    }

    #[test]
    fn exhausted_is_sentinel() {
        assert_eq!(nth_bit(0, 0), 64);
        assert_eq!(nth_bit(1, 1), 64);
        assert_eq!(nth_bit(u64::MAX, 64), 64);
        assert_eq!(nth_bit_byte_rank(0, 0), 64);
        assert_eq!(nth_bit_byte_rank(0b1010, 2), 64);
    }

    #[test]
    fn matches_naive_rng() {
        let n = 1000;
        let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
        for _ in 0..n {
            let w: u64 = rng.gen();
            for k in 0..=w.count_ones() {
                let ans = nth_bit_naive(w, k);
                assert_eq!(nth_bit(w, k), ans, "nth_bit({:#b}, {})", w, k);
                assert_eq!(nth_bit_byte_rank(w, k), ans, "byte_rank({:#b}, {})", w, k);
            }
        }
    }
}
