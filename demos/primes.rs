use hexl_kernel::numtheory::{generate_primes, is_prime, minimal_primitive_root};

fn main() {
    let n = 1usize << 12;
    let bit_size = 58;

    let primes = generate_primes(4, bit_size, n).unwrap();
    println!("primes p with 2^{bit_size} < p < 2^{} and p = 1 mod {}:", bit_size + 1, 2 * n);
    for p in &primes {
        assert!(is_prime(*p));
        let root = minimal_primitive_root(2 * n as u64, *p).unwrap();
        println!("  p = {p}, minimal primitive {}-th root of unity = {root}", 2 * n);
    }
}
