use hexl_kernel::factor::MultiplyFactor;
use hexl_kernel::numtheory::{mul_mod, mul_mod_shoup};

fn main() {
    let q: u64 = 741507920154517877;
    let y: u64 = 123456789;
    let factor = MultiplyFactor::new(y, 64, q);

    println!("comparing mul_mod against the Shoup one-multiplication variant");
    println!("q = {q}, y = {y}, barrett_factor = {}", factor.barrett_factor());

    let mut mismatches = 0u32;
    for x in [0u64, 1, 2, q / 2, q - 2, q - 1] {
        let exact = mul_mod(x, y, q);
        let shoup = mul_mod_shoup(x, y, factor.barrett_factor(), q);
        let matched = exact == shoup;
        mismatches += (!matched) as u32;
        println!("  x = {x:>20} exact = {exact:>20} shoup = {shoup:>20} match = {matched}");
    }

    println!("mismatches: {mismatches}");
}
