use bitmap_index::BitBuffer;
use mem_dbg::{MemSize, SizeFlags};
use rand::{Rng, SeedableRng, StdRng};

fn generate_random_buffer(n: u64, p: f64) -> BitBuffer {
    let mut rng: StdRng = SeedableRng::from_seed([0; 32]);
    let mut buf = BitBuffer::with_capacity(n);
    for _ in 0..n {
        buf.push(rng.gen_bool(p));
    }
    buf
}

fn main() {
    let test_cases = &[
        (1_000_000, 0.99),
        (1_000_000, 0.5),
        (1_000_000, 0.01),
        (10_000_000, 0.99),
        (10_000_000, 0.5),
        (10_000_000, 0.01),
    ];

    println!("n: # of bits, p: density of 1s\n");

    for &(n, p) in test_cases {
        let buf = generate_random_buffer(n, p);
        let index = buf.build_index(true, true);
        let buf_size = buf.mem_size(SizeFlags::empty());
        let overhead = index.index_bytes() as f64 / index.array_bytes() as f64;
        println!(
            "n = {}, p = {}: buffer {} bytes, index {} bytes ({:.2}% of the bits)",
            n,
            p,
            buf_size,
            index.index_bytes(),
            overhead * 100.0
        );
    }
}
