use hexl_kernel::NttEngine;

fn main() {
    const N: usize = 8;
    let q = hexl_kernel::numtheory::generate_primes(1, 10, N).unwrap()[0];
    let engine = NttEngine::new(N, q).unwrap();

    println!("degree N = {N}, modulus q = {q} (q = 1 mod {})", 2 * N);

    let a: Vec<u64> = vec![3, 1, 4, 1, 5, 9, 2, 6];
    let b: Vec<u64> = vec![2, 7, 1, 8, 2, 8, 1, 8];
    println!("a(x) = {a:?}");
    println!("b(x) = {b:?}");

    let fast = engine.negacyclic_convolution(&a, &b).unwrap();

    let mut reference_a = a.clone();
    engine.compute_forward(&mut reference_a, 1, 1).unwrap();
    let via_reference_transform = engine.reference_forward(&a).unwrap();
    assert_eq!(reference_a, via_reference_transform);

    println!("a(x) * b(x) mod (x^{N} + 1) mod {q} = {fast:?}");
}
