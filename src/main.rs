use hexl_kernel::NttEngine;

fn main() {
    let q: u64 = 0x0FFF_FFFF_FFFC_0001;
    let n = 8usize;
    let engine = NttEngine::new(n, q).expect("engine construction");

    let a = vec![1u64, 2, 3, 4, 5, 6, 7, 8];
    let b = vec![5u64, 6, 7, 8, 1, 2, 3, 4];

    let convolved = engine
        .negacyclic_convolution(&a, &b)
        .expect("convolution");

    println!("a = {a:?}");
    println!("b = {b:?}");
    println!("a * b mod (x^{n} + 1) mod {q} = {convolved:?}");
}
