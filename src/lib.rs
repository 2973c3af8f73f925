//! Succinct bitmap index for Rust
//!
//! This crate indexes an external bit vector (a borrowed `&[u64]` plus a
//! bit length) so that two kinds of bit operations run in constant or
//! near-constant time after a single build pass:
//!
//! - `rank(i)` computes the number of 0s (or 1s) in `[0..i)`
//! - `select(r)` locates the `(r+1)`-th position of 0 (or 1).
//!
//! The index stores running popcounts per 512-bit block (one cache line)
//! with bit-packed relative counts, and optionally one recorded position
//! per 512 set or clear bits to accelerate select. A paired
//! [`select0s`](BitmapIndex::select0s) returns two consecutive clear-bit
//! positions for the price of roughly one.
//!
//! # Basic usage
//!
//! ```
//! use bitmap_index::{bit_buf, BitmapIndex, RankSelect};
//!
//! // 01101101
//! let buf = bit_buf![false, true, true, false, true, true, false, true];
//! let index = BitmapIndex::new(buf.words(), buf.len(), true, true);
//! assert_eq!(index.rank0(5), 2);
//! assert_eq!(index.rank1(5), 3);
//! assert_eq!(index.select0(2), 6);
//! assert_eq!(index.select1(2), 4);
//! ```
//!
//! # About implementation
//!
//! The two-level popcount summary follows the classic succinct-structure
//! designs of [1] and the engineering guidance of [2]; the in-word select
//! primitive uses BMI2 `PDEP` where compiled in and a byte-rank table
//! otherwise.
//!
//! [1] G. Jacobson. Succinct static data structures. PhD thesis,
//! Carnegie Mellon University, 1989.
//!
//! [2] S. Vigna. Broadword implementation of rank/select queries.
//! In Proceedings of the 7th international conference on Experimental
//! Algorithms (WEA'08), Springer-Verlag, Berlin, Heidelberg, 154-168.

mod bit_buffer;
mod bit_iter;
mod bitmap_index;
mod nth_bit;
mod rank_index;
mod rank_select;
mod tables;
mod util;

pub use crate::bit_buffer::{clear_bit, get_bit, set_bit, storage_size, BitBuffer};
pub use crate::bit_iter::BitIter;
pub use crate::bitmap_index::{BitmapIndex, MAX_LINEAR_SEARCH_BLOCKS};
pub use crate::nth_bit::{nth_bit, nth_bit_byte_rank};
pub use crate::rank_select::RankSelect;
