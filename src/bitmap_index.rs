use crate::bit_buffer::{get_bit, storage_size};
use crate::nth_bit::nth_bit;
use crate::rank_index::{RankIndexEntry, BITS_PER_RANK_ENTRY, WORDS_PER_RANK_ENTRY};
use crate::rank_select::RankSelect;
use crate::util::mask_u64;

const STORAGE_BIT_SIZE: u64 = u64::BITS as u64;

/// A select-0 table entry is recorded every this many clear bits.
const BITS_PER_SELECT_0_BLOCK: u64 = 512;

/// A select-1 table entry is recorded every this many set bits.
const BITS_PER_SELECT_1_BLOCK: u64 = 512;

// A select stride below the rank-entry width would allow two crossings in
// one block, which the build loop does not handle.
const _: () = assert!(BITS_PER_SELECT_0_BLOCK >= BITS_PER_RANK_ENTRY);
const _: () = assert!(BITS_PER_SELECT_1_BLOCK >= BITS_PER_RANK_ENTRY);

/// Ranges of at most this many rank-index entries are searched linearly
/// instead of bisected. The value is empirical; benchmark before changing
/// it on a new target.
pub const MAX_LINEAR_SEARCH_BLOCKS: usize = 8;

/// A succinct index over a borrowed bit vector that answers rank queries in
/// constant time and select queries in near-constant time.
///
/// The index keeps running popcounts of the bit vector, one entry per
/// cache line (eight 64-bit words): an absolute count of the 1s before the
/// block and seven relative counts at the word boundaries inside it. Rank
/// reads one entry plus one word popcount. Select binary-searches the
/// entries, walks a three-comparison decision tree to the word, and
/// finishes with [`nth_bit`]; two optional tables (one position every 512
/// set or clear bits) narrow the entry search to a handful of blocks, so a
/// select costs O(log(1/density)) entry probes at worst.
///
/// The rank index costs 12 bytes per 64 bytes of input (18.75%); each
/// select table costs 6.25% times the density of its bit. Absolute counts
/// are `u32`, so bit vectors must be shorter than 2^32 bits.
///
/// The bit vector itself is borrowed, not owned. Bits past `num_bits` in
/// the final word must be zero.
///
/// # Examples
///
/// ```
/// use bitmap_index::{bit_buf, BitmapIndex, RankSelect};
///
/// // 01101101
/// let buf = bit_buf![false, true, true, false, true, true, false, true];
/// let index = BitmapIndex::new(buf.words(), buf.len(), true, true);
/// assert_eq!(index.rank0(5), 2);
/// assert_eq!(index.rank1(5), 3);
/// assert_eq!(index.select0(2), 6);
/// assert_eq!(index.select1(2), 4);
/// ```
///
/// # References
/// [1] G. Jacobson. Succinct static data structures. PhD thesis,
/// Carnegie Mellon University, 1989.
///
/// [2] S. Vigna. Broadword implementation of rank/select queries.
/// In Proceedings of the 7th international conference on Experimental
/// Algorithms (WEA'08), Springer-Verlag, Berlin, Heidelberg, 154-168.
#[derive(Clone, Default)]
pub struct BitmapIndex<'a> {
    bits: &'a [u64],
    num_bits: u64,
    /// One entry per 512-bit block, plus a terminator entry whose absolute
    /// count is the total number of 1s.
    rank_index: Vec<RankIndexEntry>,
    /// `select_0_index[i]` is the position of the `(512 * i)`-th clear bit,
    /// terminated by `num_bits`. Empty when the table is disabled.
    select_0_index: Vec<u32>,
    /// `select_1_index[i]` is the position of the `(512 * i)`-th set bit,
    /// terminated by `num_bits`. Empty when the table is disabled.
    select_1_index: Vec<u32>,
}

impl<'a> BitmapIndex<'a> {
    /// Builds the index over `bits` in one pass.
    ///
    /// Equivalent to [`build_index`] on a default-constructed value.
    ///
    /// [`build_index`]: BitmapIndex::build_index
    pub fn new(
        bits: &'a [u64],
        num_bits: u64,
        enable_select_0_index: bool,
        enable_select_1_index: bool,
    ) -> Self {
        let mut index = Self::default();
        index.build_index(bits, num_bits, enable_select_0_index, enable_select_1_index);
        index
    }

    /// Returns the total number of one bits in the bit vector.
    pub fn ones_count(&self) -> u64 {
        // The terminator entry holds the total count.
        self.rank_index
            .last()
            .map_or(0, |e| u64::from(e.absolute_ones_count()))
    }

    /// Returns the total number of zero bits in the bit vector.
    pub fn zeros_count(&self) -> u64 {
        self.num_bits - self.ones_count()
    }

    /// Number of words in the indexed bit vector.
    pub fn array_size(&self) -> usize {
        storage_size(self.num_bits)
    }

    /// Number of bytes used by the indexed bit vector.
    pub fn array_bytes(&self) -> usize {
        self.array_size() * core::mem::size_of::<u64>()
    }

    /// Number of bytes used by the rank and select indexes.
    pub fn index_bytes(&self) -> usize {
        self.rank_index.len() * core::mem::size_of::<RankIndexEntry>()
            + self.select_0_index.len() * core::mem::size_of::<u32>()
            + self.select_1_index.len() * core::mem::size_of::<u32>()
    }

    /// Iterates over the bits of the indexed vector.
    pub fn iter(&self) -> crate::BitIter<'a> {
        crate::BitIter::new(self.bits, self.num_bits)
    }

    /// Rebuilds the index over `bits`.
    ///
    /// Any previous contents are discarded, so rebuilding with the same
    /// arguments is idempotent. Queries on an index whose underlying bit
    /// vector changed after the build return stale answers; rebuild
    /// instead.
    ///
    /// # Panics
    /// * `num_bits` is 2^32 or more (absolute counts are stored as `u32`).
    /// * `bits` is shorter than `num_bits` bits.
    pub fn build_index(
        &mut self,
        bits: &'a [u64],
        num_bits: u64,
        enable_select_0_index: bool,
        enable_select_1_index: bool,
    ) {
        assert!(num_bits < 1 << 32);
        assert!(storage_size(num_bits) <= bits.len());
        self.bits = bits;
        self.num_bits = num_bits;

        let array_size = storage_size(num_bits);
        let rank_index_size = array_size.div_ceil(WORDS_PER_RANK_ENTRY) + 1;
        self.rank_index.clear();
        self.rank_index.resize(rank_index_size, RankIndexEntry::default());

        self.select_0_index.clear();
        if enable_select_0_index {
            // Approximately enough for density 1/2.
            self.select_0_index
                .reserve((num_bits / (2 * BITS_PER_SELECT_0_BLOCK)) as usize + 1);
        }

        self.select_1_index.clear();
        if enable_select_1_index {
            self.select_1_index
                .reserve((num_bits / (2 * BITS_PER_SELECT_1_BLOCK)) as usize + 1);
        }

        let mut ones_count: u32 = 0;
        let mut zeros_count: u32 = 0;
        for word_index in (0..array_size).step_by(WORDS_PER_RANK_ENTRY) {
            let mut word = [0u64; WORDS_PER_RANK_ENTRY];
            for (i, w) in word.iter_mut().enumerate() {
                if word_index + i < array_size {
                    *w = bits[word_index + i];
                }
            }
            let word_ones_count = word.map(|w| w.count_ones());

            let entry = &mut self.rank_index[word_index / WORDS_PER_RANK_ENTRY];
            let abs_ones_count = ones_count;
            entry.set_absolute_ones_count(abs_ones_count);
            ones_count += word_ones_count[0];
            entry.set_relative_ones_count_1(ones_count - abs_ones_count);
            ones_count += word_ones_count[1];
            entry.set_relative_ones_count_2(ones_count - abs_ones_count);
            ones_count += word_ones_count[2];
            entry.set_relative_ones_count_3(ones_count - abs_ones_count);
            ones_count += word_ones_count[3];
            entry.set_relative_ones_count_4(ones_count - abs_ones_count);
            ones_count += word_ones_count[4];
            entry.set_relative_ones_count_5(ones_count - abs_ones_count);
            ones_count += word_ones_count[5];
            entry.set_relative_ones_count_6(ones_count - abs_ones_count);
            ones_count += word_ones_count[6];
            entry.set_relative_ones_count_7(ones_count - abs_ones_count);
            ones_count += word_ones_count[7];

            if enable_select_0_index {
                let mut s0_zeros_count = zeros_count;
                for i in 0..WORDS_PER_RANK_ENTRY {
                    let bit_offset = (word_index + i) as u64 * STORAGE_BIT_SIZE;
                    if bit_offset >= num_bits {
                        break;
                    }

                    // The final word is padded with zeros past `num_bits`;
                    // clip them out of the zero count.
                    let bits_remaining = num_bits - bit_offset;
                    let word_zeros_count =
                        bits_remaining.min(STORAGE_BIT_SIZE) as u32 - word_ones_count[i];

                    // A position is recorded every BITS_PER_SELECT_0_BLOCK
                    // zeros, so the next recording happens after skipping
                    // (-s0_zeros_count) mod BITS_PER_SELECT_0_BLOCK zeros.
                    let zeros_to_skip =
                        s0_zeros_count.wrapping_neg() % BITS_PER_SELECT_0_BLOCK as u32;
                    if word_zeros_count > zeros_to_skip {
                        let nth = nth_bit(!word[i], zeros_to_skip);
                        self.select_0_index.push((bit_offset + u64::from(nth)) as u32);
                        // A block spans 512 bits, so it cannot cross a
                        // second stride boundary.
                        break;
                    }
                    s0_zeros_count += word_zeros_count;
                }
                zeros_count +=
                    BITS_PER_RANK_ENTRY as u32 - (ones_count - abs_ones_count);
            }

            if enable_select_1_index {
                let mut s1_ones_count = abs_ones_count;
                for i in 0..WORDS_PER_RANK_ENTRY {
                    let bit_offset = (word_index + i) as u64 * STORAGE_BIT_SIZE;
                    let ones_to_skip =
                        s1_ones_count.wrapping_neg() % BITS_PER_SELECT_1_BLOCK as u32;
                    if word_ones_count[i] > ones_to_skip {
                        let nth = nth_bit(word[i], ones_to_skip);
                        self.select_1_index.push((bit_offset + u64::from(nth)) as u32);
                        break;
                    }
                    s1_ones_count += word_ones_count[i];
                }
            }
        }

        // The extra entry holds the total number of ones.
        self.rank_index
            .last_mut()
            .unwrap()
            .set_absolute_ones_count(ones_count);

        if enable_select_0_index {
            self.select_0_index.push(num_bits as u32);
            self.select_0_index.shrink_to_fit();
        }

        if enable_select_1_index {
            self.select_1_index.push(num_bits as u32);
            self.select_1_index.shrink_to_fit();
        }
    }

    /// Returns the positions of the `(r + 1)`-th and `(r + 2)`-th zeroes.
    ///
    /// Equivalent to `(self.select0(r), self.select0(r + 1))` but cheaper:
    /// at density around 1/2 the second zero lands in the same word 31
    /// times out of 32, where it costs one mask and a trailing-zero count.
    /// Either element saturates to [`len`] when the zeroes run out.
    ///
    /// [`len`]: RankSelect::len
    pub fn select0s(&self, r: u64) -> (u64, u64) {
        let zeros_count = self.zeros_count();
        if r >= zeros_count {
            return (self.num_bits, self.num_bits);
        }
        if r + 1 >= zeros_count {
            return (self.select0(r), self.num_bits);
        }

        let (word_index, nth) = self.select0_position(r);
        let pos = STORAGE_BIT_SIZE * word_index as u64 + u64::from(nth);

        let inv_word = !self.bits[word_index];

        // Mask out positions up to and including `nth`, then the next zero
        // is the lowest survivor. `2 << nth` wraps to 0 at nth == 63, and a
        // zero mask is exactly what that case needs.
        let mask = (2u64 << nth).wrapping_neg();
        let masked_inv_word = inv_word & mask;

        if masked_inv_word != 0 {
            let next_nth = masked_inv_word.trailing_zeros();
            (pos, STORAGE_BIT_SIZE * word_index as u64 + u64::from(next_nth))
        } else {
            // The next zero is in some later word; fall back to a full
            // search for it.
            (pos, self.select0(r + 1))
        }
    }

    /// Count of ones before word `array_index`, read from the index alone.
    fn index_ones_count(&self, array_index: usize) -> u64 {
        let entry = &self.rank_index[array_index / WORDS_PER_RANK_ENTRY];
        u64::from(entry.absolute_ones_count())
            + u64::from(entry.relative_ones_count(array_index % WORDS_PER_RANK_ENTRY))
    }

    /// Finds the block containing the `(r + 1)`-th set bit and returns its
    /// index into `rank_index`.
    fn find_rank_index_entry(&self, r: u64) -> usize {
        debug_assert!(r < self.ones_count());

        let (begin, end) = if self.select_1_index.is_empty() {
            (0, self.rank_index.len())
        } else {
            let select_index = (r / BITS_PER_SELECT_1_BLOCK) as usize;
            debug_assert!(select_index + 1 < self.select_1_index.len());

            // The wanted bit lies between these two recorded positions.
            let lo_bit_index = u64::from(self.select_1_index[select_index]);
            let hi_bit_index = u64::from(self.select_1_index[select_index + 1]);

            (
                (lo_bit_index / BITS_PER_RANK_ENTRY) as usize,
                hi_bit_index.div_ceil(BITS_PER_RANK_ENTRY) as usize,
            )
        };

        let entries = &self.rank_index[begin..end];
        let offset = if entries.len() <= MAX_LINEAR_SEARCH_BLOCKS {
            entries
                .iter()
                .position(|e| u64::from(e.absolute_ones_count()) > r)
                .unwrap_or(entries.len())
        } else {
            entries.partition_point(|e| u64::from(e.absolute_ones_count()) <= r)
        };

        let block_index = begin + offset - 1;
        debug_assert!(u64::from(self.rank_index[block_index].absolute_ones_count()) <= r);
        debug_assert!(u64::from(self.rank_index[block_index + 1].absolute_ones_count()) > r);
        block_index
    }

    /// Finds the block containing the `(r + 1)`-th clear bit and returns
    /// its index into `rank_index`.
    ///
    /// The count of zeroes before block `j` is `512 * j` minus the absolute
    /// ones count, a non-decreasing sequence with ties at all-ones blocks,
    /// so this always bisects; a linear variant never benchmarked faster.
    fn find_inverted_rank_index_entry(&self, r: u64) -> usize {
        debug_assert!(r < self.zeros_count());

        let (mut lo, mut hi) = if self.select_0_index.is_empty() {
            (0, self.num_bits.div_ceil(BITS_PER_RANK_ENTRY) as usize)
        } else {
            let select_index = (r / BITS_PER_SELECT_0_BLOCK) as usize;
            debug_assert!(select_index + 1 < self.select_0_index.len());

            (
                (u64::from(self.select_0_index[select_index]) / BITS_PER_RANK_ENTRY) as usize,
                u64::from(self.select_0_index[select_index + 1])
                    .div_ceil(BITS_PER_RANK_ENTRY) as usize,
            )
        };
        debug_assert!(hi < self.rank_index.len());

        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            let zeros_before = BITS_PER_RANK_ENTRY * mid as u64
                - u64::from(self.rank_index[mid].absolute_ones_count());
            if r < zeros_before {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        lo
    }

    /// Locates the `(r + 1)`-th zero as a word index and a bit offset
    /// within that word. Requires `r < zeros_count()`.
    fn select0_position(&self, r: u64) -> (usize, u32) {
        let block_index = self.find_inverted_rank_index_entry(r);
        let entry = &self.rank_index[block_index];
        let word_index = block_index * WORDS_PER_RANK_ENTRY;

        let entry_zeros_count =
            STORAGE_BIT_SIZE * word_index as u64 - u64::from(entry.absolute_ones_count());
        let remzeros = (r - entry_zeros_count) as u32;
        let (word, rem) = entry.select_zeros_word(remzeros);

        let word_index = word_index + word;
        (word_index, nth_bit(!self.bits[word_index], rem))
    }
}

impl RankSelect for BitmapIndex<'_> {
    fn len(&self) -> u64 {
        self.num_bits
    }

    fn get(&self, i: u64) -> bool {
        debug_assert!(i < self.num_bits);
        get_bit(self.bits, i)
    }

    fn rank1(&self, i: u64) -> u64 {
        debug_assert!(i <= self.num_bits);
        if i == 0 {
            return 0;
        }
        // The terminator answers the inclusive upper bound directly.
        if i >= self.num_bits {
            return self.ones_count();
        }
        let end_word = (i / STORAGE_BIT_SIZE) as usize;
        let sum = self.index_ones_count(end_word);
        let bit_index = i % STORAGE_BIT_SIZE;
        if bit_index == 0 {
            // Entire answer is in the index.
            return sum;
        }
        sum + u64::from((self.bits[end_word] & mask_u64(bit_index)).count_ones())
    }

    fn select1(&self, r: u64) -> u64 {
        if r >= self.ones_count() {
            return self.num_bits;
        }
        let block_index = self.find_rank_index_entry(r);
        let entry = &self.rank_index[block_index];
        let word_index = block_index * WORDS_PER_RANK_ENTRY;

        let rembits = (r - u64::from(entry.absolute_ones_count())) as u32;
        let (word, rem) = entry.select_ones_word(rembits);

        let word_index = word_index + word;
        let nth = nth_bit(self.bits[word_index], rem);
        STORAGE_BIT_SIZE * word_index as u64 + u64::from(nth)
    }

    fn select0(&self, r: u64) -> u64 {
        if r >= self.zeros_count() {
            return self.num_bits;
        }
        let (word_index, nth) = self.select0_position(r);
        STORAGE_BIT_SIZE * word_index as u64 + u64::from(nth)
    }
}

impl<'a> IntoIterator for &BitmapIndex<'a> {
    type Item = bool;
    type IntoIter = crate::BitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate rand;
    use self::rand::{Rng, SeedableRng, StdRng};
    use super::*;
    use crate::{bit_buf, BitBuffer};

    const TEST_PROB: &[f64] = &[0.01, 0.5, 0.99];
    const TEST_SIZE: &[u64] = &[
        1,
        63,
        64,
        65,
        BITS_PER_RANK_ENTRY - 1,
        BITS_PER_RANK_ENTRY,
        BITS_PER_RANK_ENTRY + 1,
        1000,
        4096,
        4097,
        BITS_PER_RANK_ENTRY * 16,
        u16::MAX as u64,
    ];
    const FLAGS: &[(bool, bool)] = &[(false, false), (false, true), (true, false), (true, true)];

    fn random_buffer(rng: &mut StdRng, n: u64, p: f64) -> BitBuffer {
        let mut buf = BitBuffer::with_capacity(n);
        for _ in 0..n {
            buf.push(rng.gen_bool(p));
        }
        buf
    }

    #[test]
    fn empty() {
        for &(s0, s1) in FLAGS {
            let index = BitmapIndex::new(&[], 0, s0, s1);
            assert_eq!(index.len(), 0);
            assert_eq!(index.ones_count(), 0);
            assert_eq!(index.rank1(0), 0);
            assert_eq!(index.rank0(0), 0);
            assert_eq!(index.select1(0), 0);
            assert_eq!(index.select0(0), 0);
            assert_eq!(index.select0s(0), (0, 0));
        }
    }

    #[test]
    fn all_zeros() {
        let buf = bit_buf![false; 1000];
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.ones_count(), 0);
            assert_eq!(index.rank0(1000), 1000);
            assert_eq!(index.select0(999), 999);
            assert_eq!(index.select0(1000), 1000);
            assert_eq!(index.select1(0), 1000);
            assert_eq!(index.select0s(998), (998, 999));
            assert_eq!(index.select0s(999), (999, 1000));
        }
    }

    #[test]
    fn all_ones() {
        let buf = bit_buf![true; 1000];
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.ones_count(), 1000);
            assert_eq!(index.select1(500), 500);
            assert_eq!(index.select0(0), 1000);
            assert_eq!(index.select0s(0), (1000, 1000));
        }
    }

    #[test]
    fn all_ones_multiblock() {
        // All-ones blocks tie in the zero-side search.
        let buf = bit_buf![true; 4096];
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.select0(0), 4096);
            for i in 0..=4096 {
                assert_eq!(index.rank1(i), i);
            }
        }
    }

    #[test]
    fn alternating() {
        let mut buf = BitBuffer::new();
        for i in 0..128 {
            buf.push(i % 2 == 0);
        }
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.ones_count(), 64);
            assert_eq!(index.rank1(10), 5);
            for k in 0..64 {
                assert_eq!(index.select1(k), 2 * k);
                assert_eq!(index.select0(k), 2 * k + 1);
            }
            assert_eq!(index.select0s(0), (1, 3));
        }
    }

    #[test]
    fn single_bit() {
        let mut buf = bit_buf![false; 8192];
        buf.set_bit(4097, true);
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.ones_count(), 1);
            assert_eq!(index.rank1(4097), 0);
            assert_eq!(index.rank1(4098), 1);
            assert_eq!(index.select1(0), 4097);
            assert_eq!(index.select1(1), 8192);
        }
    }

    #[test]
    fn block_boundary_bits() {
        let mut buf = bit_buf![false; 2048];
        buf.set_bit(0, true);
        buf.set_bit(512, true);
        buf.set_bit(1024, true);
        for &(s0, s1) in FLAGS {
            let index = buf.build_index(s0, s1);
            assert_eq!(index.rank1(512), 1);
            assert_eq!(index.rank1(513), 2);
            assert_eq!(index.select1(0), 0);
            assert_eq!(index.select1(1), 512);
            assert_eq!(index.select1(2), 1024);
            assert_eq!(index.select1(3), 2048);
        }
    }

    #[test]
    fn rank_rng() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                let buf = random_buffer(&mut rng, n, p);
                let index = buf.build_index(false, false);

                let mut rank = 0;
                for i in 0..n {
                    assert_eq!(index.rank1(i), rank);
                    assert_eq!(index.rank0(i), i - rank);
                    rank += buf.get_bit(i) as u64;
                }
                assert_eq!(index.rank1(n), index.ones_count());
                assert_eq!(index.rank0(n), n - index.ones_count());
            }
        }
    }

    #[test]
    fn get_rng() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                let buf = random_buffer(&mut rng, n, p);
                let index = buf.build_index(false, false);
                for i in 0..n {
                    assert_eq!(index.get(i), buf.get_bit(i));
                }
            }
        }
    }

    #[test]
    fn select1_rng() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                for &(s0, s1) in FLAGS {
                    let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                    let buf = random_buffer(&mut rng, n, p);
                    let index = buf.build_index(s0, s1);

                    let select_ans: Vec<u64> = (0..n).filter(|&i| buf.get_bit(i)).collect();
                    for (k, &pos) in select_ans.iter().enumerate() {
                        assert_eq!(index.select1(k as u64), pos);
                        assert_eq!(index.rank1(pos), k as u64);
                        assert!(index.get(pos));
                    }
                    assert_eq!(index.select1(select_ans.len() as u64), n);
                    assert_eq!(index.select1(n + 1), n);
                }
            }
        }
    }

    #[test]
    fn select0_rng() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                for &(s0, s1) in FLAGS {
                    let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                    let buf = random_buffer(&mut rng, n, p);
                    let index = buf.build_index(s0, s1);

                    let select_ans: Vec<u64> = (0..n).filter(|&i| !buf.get_bit(i)).collect();
                    for (k, &pos) in select_ans.iter().enumerate() {
                        assert_eq!(index.select0(k as u64), pos);
                        assert_eq!(index.rank0(pos), k as u64);
                        assert!(!index.get(pos));
                    }
                    assert_eq!(index.select0(select_ans.len() as u64), n);
                    assert_eq!(index.select0(n + 1), n);
                }
            }
        }
    }

    #[test]
    fn select0s_rng() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                for &(s0, s1) in FLAGS {
                    let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                    let buf = random_buffer(&mut rng, n, p);
                    let index = buf.build_index(s0, s1);

                    for k in 0..=index.zeros_count() {
                        assert_eq!(index.select0s(k), (index.select0(k), index.select0(k + 1)));
                    }
                }
            }
        }
    }

    #[test]
    fn flag_combinations_agree() {
        for &p in TEST_PROB {
            for &n in TEST_SIZE {
                let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                let buf = random_buffer(&mut rng, n, p);

                let baseline = buf.build_index(false, false);
                for &(s0, s1) in &FLAGS[1..] {
                    let index = buf.build_index(s0, s1);
                    assert_eq!(index.ones_count(), baseline.ones_count());
                    for i in (0..=n).step_by(7) {
                        assert_eq!(index.rank1(i), baseline.rank1(i));
                    }
                    for k in (0..=index.ones_count()).step_by(3) {
                        assert_eq!(index.select1(k), baseline.select1(k));
                    }
                    for k in (0..=index.zeros_count()).step_by(3) {
                        assert_eq!(index.select0(k), baseline.select0(k));
                        assert_eq!(index.select0s(k), baseline.select0s(k));
                    }
                }
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
        let buf = random_buffer(&mut rng, 10_000, 0.5);

        let mut index = BitmapIndex::default();
        index.build_index(buf.words(), buf.len(), true, true);
        let first: Vec<u64> = (0..buf.len()).map(|i| index.rank1(i)).collect();
        let first_s1: Vec<u64> = (0..index.ones_count()).map(|k| index.select1(k)).collect();

        index.build_index(buf.words(), buf.len(), true, true);
        assert_eq!(index.len(), buf.len());
        for i in 0..buf.len() {
            assert_eq!(index.rank1(i), first[i as usize]);
        }
        for k in 0..index.ones_count() {
            assert_eq!(index.select1(k), first_s1[k as usize]);
        }
    }

    #[test]
    fn oracle_agreement() {
        for &p in TEST_PROB {
            for &n in &[65, 513, 1000, 4097] {
                for &(s0, s1) in FLAGS {
                    let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
                    let buf = random_buffer(&mut rng, n, p);
                    let index = buf.build_index(s0, s1);

                    for i in 0..=n {
                        assert_eq!(index.rank1(i), buf.rank1(i));
                    }
                    for k in 0..=index.ones_count() {
                        assert_eq!(index.select1(k), buf.select1(k));
                    }
                    for k in 0..=index.zeros_count() {
                        assert_eq!(index.select0(k), buf.select0(k));
                    }
                }
            }
        }
    }

    #[test]
    fn space_accessors() {
        let buf = bit_buf![true; 4096];
        let index = buf.build_index(true, true);
        assert_eq!(index.array_size(), 64);
        assert_eq!(index.array_bytes(), 512);
        // 9 rank entries of 12 bytes, 1 select-0 terminator, 9 select-1
        // entries (8 strides + terminator).
        assert_eq!(index.index_bytes(), 9 * 12 + 4 + 9 * 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_buffer_and_rebuild() {
        let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
        let buf = random_buffer(&mut rng, 10_000, 0.5);

        let encoded = bincode::serialize(&buf).unwrap();
        let decoded: BitBuffer = bincode::deserialize(&encoded).unwrap();
        assert_eq!(buf, decoded);

        let index = decoded.build_index(true, true);
        let mut rank = 0;
        for i in 0..decoded.len() {
            assert_eq!(index.rank1(i), rank);
            rank += decoded.get_bit(i) as u64;
        }
    }
}
