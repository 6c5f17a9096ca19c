use hexl_kernel::NttEngine;
use hexl_kernel::numtheory::{add_mod, mul_mod, sub_mod};

const Q: u64 = 0x0FFF_FFFF_FFFC_0001;

#[test]
fn cache_and_direct_construction_agree() {
    let cache = hexl_kernel::NttCache::new();
    let cached = cache.get_or_insert(32, Q).unwrap();
    let direct = NttEngine::new(32, Q).unwrap();

    let mut via_cached: Vec<u64> = (0..32).collect();
    let mut via_direct = via_cached.clone();
    cached.compute_forward(&mut via_cached, 1, 1).unwrap();
    direct.compute_forward(&mut via_direct, 1, 1).unwrap();
    assert_eq!(via_cached, via_direct);
}

#[test]
fn convolution_round_trips_through_kernels() {
    let engine = NttEngine::new(16, Q).unwrap();
    let a: Vec<u64> = (0..16).map(|i| (i * 37 + 5) % Q).collect();
    let b: Vec<u64> = (0..16).map(|i| (i * 91 + 2) % Q).collect();

    let convolved = engine.negacyclic_convolution(&a, &b).unwrap();

    let mut schoolbook = vec![0u64; 16];
    for i in 0..16 {
        for j in 0..16 {
            let prod = mul_mod(a[i], b[j], Q);
            let idx = i + j;
            if idx < 16 {
                schoolbook[idx] = add_mod(schoolbook[idx], prod, Q);
            } else {
                schoolbook[idx - 16] = sub_mod(schoolbook[idx - 16], prod, Q);
            }
        }
    }
    assert_eq!(convolved, schoolbook);
}

#[test]
fn multiple_degrees_share_one_modulus_in_the_cache() {
    let cache = hexl_kernel::NttCache::new();
    for degree in [4usize, 8, 16, 32] {
        let q = hexl_kernel::numtheory::generate_primes(1, 20, degree).unwrap()[0];
        let engine = cache.get_or_insert(degree, q).unwrap();
        assert_eq!(engine.degree(), degree);
        assert_eq!(engine.modulus(), q);
    }
    assert_eq!(cache.len(), 4);
}
