/// Bit collection that supports rank and select queries.
pub trait RankSelect {
    /// Returns the total number of bits.
    fn len(&self) -> u64;

    /// Returns true if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `i`-th bit.
    fn get(&self, i: u64) -> bool;

    /// Compute the number of zeroes in `[0..i)`.
    fn rank0(&self, i: u64) -> u64 {
        i - self.rank1(i)
    }

    /// Compute the number of ones in `[0..i)`.
    fn rank1(&self, i: u64) -> u64 {
        i - self.rank0(i)
    }

    /// Locate the position of the `(r + 1)`-th zero,
    /// or [`len`] when fewer zeroes exist.
    ///
    /// [`len`]: RankSelect::len
    fn select0(&self, r: u64) -> u64;

    /// Locate the position of the `(r + 1)`-th one,
    /// or [`len`] when fewer ones exist.
    ///
    /// [`len`]: RankSelect::len
    fn select1(&self, r: u64) -> u64;
}
