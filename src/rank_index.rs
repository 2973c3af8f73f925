/// Number of 64-bit words summarised by one [`RankIndexEntry`].
pub(crate) const WORDS_PER_RANK_ENTRY: usize = 8;

/// Number of bits summarised by one [`RankIndexEntry`] (one cache line).
pub(crate) const BITS_PER_RANK_ENTRY: u64 = WORDS_PER_RANK_ENTRY as u64 * 64;

/// Popcount summary of one 512-bit block of the bit vector.
///
/// Holds the absolute count of 1s before the block and seven relative
/// counts at the word boundaries inside it:
/// `relative_ones_count_k = popcount(block bits [0, 64 * k))`.
///
/// Three consecutive words contain at most 192 set bits, so the counts for
/// `k` in 1..=3 fit one byte each. `k = 4` can reach 256 and gets 16 bits;
/// it also serves as the first split point of the in-block search, which is
/// why it is stored whole. The counts for `k` in 5..=7 are stored as deltas
/// from `k = 4`, which again fit one byte. 12 bytes per 64-byte block, an
/// 18.75% overhead.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
#[repr(C)]
pub(crate) struct RankIndexEntry {
    absolute_ones_count: u32,
    relative_ones_count_4: u16,
    /// `relative_ones_count_k` for `k` in 1..=3.
    low_counts: [u8; 3],
    /// `relative_ones_count_k - relative_ones_count_4` for `k` in 5..=7.
    high_deltas: [u8; 3],
}

const _: () = assert!(core::mem::size_of::<RankIndexEntry>() == 12);

impl RankIndexEntry {
    /// Count of 1s in the bit vector before this block.
    #[inline]
    pub fn absolute_ones_count(&self) -> u32 {
        self.absolute_ones_count
    }

    /// Count of 1s in the block before word `k`, for `k` in `0..8`.
    ///
    /// Reads the packed fields one by one; getters stay load-plus-add.
    #[inline]
    pub fn relative_ones_count(&self, k: usize) -> u32 {
        debug_assert!(k < WORDS_PER_RANK_ENTRY);
        match k {
            0 => 0,
            1..=3 => u32::from(self.low_counts[k - 1]),
            4 => u32::from(self.relative_ones_count_4),
            _ => u32::from(self.relative_ones_count_4) + u32::from(self.high_deltas[k - 5]),
        }
    }

    #[inline]
    pub fn relative_ones_count_1(&self) -> u32 {
        u32::from(self.low_counts[0])
    }

    #[inline]
    pub fn relative_ones_count_2(&self) -> u32 {
        u32::from(self.low_counts[1])
    }

    #[inline]
    pub fn relative_ones_count_3(&self) -> u32 {
        u32::from(self.low_counts[2])
    }

    #[inline]
    pub fn relative_ones_count_4(&self) -> u32 {
        u32::from(self.relative_ones_count_4)
    }

    #[inline]
    pub fn relative_ones_count_5(&self) -> u32 {
        self.relative_ones_count_4() + u32::from(self.high_deltas[0])
    }

    #[inline]
    pub fn relative_ones_count_6(&self) -> u32 {
        self.relative_ones_count_4() + u32::from(self.high_deltas[1])
    }

    #[inline]
    pub fn relative_ones_count_7(&self) -> u32 {
        self.relative_ones_count_4() + u32::from(self.high_deltas[2])
    }

    pub fn set_absolute_ones_count(&mut self, v: u32) {
        self.absolute_ones_count = v;
    }

    pub fn set_relative_ones_count_1(&mut self, v: u32) {
        debug_assert!(v <= 64);
        self.low_counts[0] = v as u8;
    }

    pub fn set_relative_ones_count_2(&mut self, v: u32) {
        debug_assert!(v <= 2 * 64);
        self.low_counts[1] = v as u8;
    }

    pub fn set_relative_ones_count_3(&mut self, v: u32) {
        debug_assert!(v <= 3 * 64);
        self.low_counts[2] = v as u8;
    }

    /// Must be called before the setters for counts 5 through 7, which
    /// store their values relative to this one.
    pub fn set_relative_ones_count_4(&mut self, v: u32) {
        debug_assert!(v <= 4 * 64);
        debug_assert!(self.high_deltas == [0; 3]);
        self.relative_ones_count_4 = v as u16;
    }

    pub fn set_relative_ones_count_5(&mut self, v: u32) {
        debug_assert!(v <= 5 * 64);
        self.high_deltas[0] = (v - self.relative_ones_count_4()) as u8;
    }

    pub fn set_relative_ones_count_6(&mut self, v: u32) {
        debug_assert!(v <= 6 * 64);
        self.high_deltas[1] = (v - self.relative_ones_count_4()) as u8;
    }

    pub fn set_relative_ones_count_7(&mut self, v: u32) {
        debug_assert!(v <= 7 * 64);
        self.high_deltas[2] = (v - self.relative_ones_count_4()) as u8;
    }

    /// Pick the word of this block holding the `(rembits + 1)`-th set bit.
    ///
    /// `rembits` is the rank of the wanted bit relative to the block start.
    /// Returns the word offset in `0..8` and the rank of the bit within
    /// that word. The tree compares against counts 4, then 2 or 6, then one
    /// of the odd counts: three comparisons for any word.
    #[inline]
    pub fn select_ones_word(&self, mut rembits: u32) -> (usize, u32) {
        let mut word = 0;
        if rembits < self.relative_ones_count_4() {
            if rembits < self.relative_ones_count_2() {
                if rembits >= self.relative_ones_count_1() {
                    word = 1;
                    rembits -= self.relative_ones_count_1();
                }
            } else if rembits < self.relative_ones_count_3() {
                word = 2;
                rembits -= self.relative_ones_count_2();
            } else {
                word = 3;
                rembits -= self.relative_ones_count_3();
            }
        } else if rembits < self.relative_ones_count_6() {
            if rembits < self.relative_ones_count_5() {
                word = 4;
                rembits -= self.relative_ones_count_4();
            } else {
                word = 5;
                rembits -= self.relative_ones_count_5();
            }
        } else if rembits < self.relative_ones_count_7() {
            word = 6;
            rembits -= self.relative_ones_count_6();
        } else {
            word = 7;
            rembits -= self.relative_ones_count_7();
        }
        (word, rembits)
    }

    /// Zero-side twin of [`select_ones_word`]: the relative count of clear
    /// bits before word `k` is `64 * k` minus the count of set bits.
    ///
    /// [`select_ones_word`]: RankIndexEntry::select_ones_word
    #[inline]
    pub fn select_zeros_word(&self, mut remzeros: u32) -> (usize, u32) {
        let mut word = 0;
        if remzeros < 4 * 64 - self.relative_ones_count_4() {
            if remzeros < 2 * 64 - self.relative_ones_count_2() {
                if remzeros >= 64 - self.relative_ones_count_1() {
                    word = 1;
                    remzeros -= 64 - self.relative_ones_count_1();
                }
            } else if remzeros < 3 * 64 - self.relative_ones_count_3() {
                word = 2;
                remzeros -= 2 * 64 - self.relative_ones_count_2();
            } else {
                word = 3;
                remzeros -= 3 * 64 - self.relative_ones_count_3();
            }
        } else if remzeros < 6 * 64 - self.relative_ones_count_6() {
            if remzeros < 5 * 64 - self.relative_ones_count_5() {
                word = 4;
                remzeros -= 4 * 64 - self.relative_ones_count_4();
            } else {
                word = 5;
                remzeros -= 5 * 64 - self.relative_ones_count_5();
            }
        } else if remzeros < 7 * 64 - self.relative_ones_count_7() {
            word = 6;
            remzeros -= 6 * 64 - self.relative_ones_count_6();
        } else {
            word = 7;
            remzeros -= 7 * 64 - self.relative_ones_count_7();
        }
        (word, remzeros)
    }
}
