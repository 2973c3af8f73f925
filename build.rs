use std::fs::File;
use std::io::Write;
use std::path::Path;

use indoc::writedoc;
use roxygen::*;

const BITS_PER_BYTE: u32 = 8;

fn main() {
    let mut table = vec![0u8; (BITS_PER_BYTE as usize) << BITS_PER_BYTE];
    for k in 0..BITS_PER_BYTE {
        for byte in 0..1usize << BITS_PER_BYTE {
            table[((k as usize) << BITS_PER_BYTE) | byte] = nth_bit_in_byte(byte as u8, k);
        }
    }

    let out_dir = "src";
    let out_path = Path::new(&out_dir).join("tables.rs");
    let mut f = File::create(&out_path).unwrap();

    writedoc!(
        f,
        "
        /// `NTH_BIT_IN_BYTE[(k << 8) | byte]` is the position of the `k`-th
        /// set bit of `byte`, or 8 when `byte` has `k` or fewer set bits.
        pub const NTH_BIT_IN_BYTE: [u8; {}] = {:?};
        ",
        table.len(),
        table
    )
    .unwrap();
}

#[roxygen]
/// Position of the `k`-th (0-based) set bit of `byte` by exhaustive scan,
/// saturating to 8 when the byte runs out of set bits.
fn nth_bit_in_byte(
    /// Byte to scan.
    byte: u8,
    /// Rank of the wanted set bit within the byte.
    k: u32,
) -> u8 {
    let mut remaining = k;
    for i in 0..BITS_PER_BYTE {
        if (byte >> i) & 1 == 1 {
            if remaining == 0 {
                return i as u8;
            }
            remaining -= 1;
        }
    }
    BITS_PER_BYTE as u8
}
