//! Scalar number-theoretic primitives: 128-bit products, Barrett reduction,
//! modular inverse, primitive-root search, prime generation, bit-reversal.
//!
//! All arithmetic is on `u64` with 128-bit intermediates, matching the
//! bounds a modulus `q < 2^63` requires.

use crate::error::{Error, Result};

/// Miller-Rabin witnesses sufficient for a deterministic test over all of
/// `u64` (see Wikipedia's "testing against small sets of bases").
const MILLER_RABIN_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Full 128-bit product of two `u64` values, returned as `(hi, lo)`.
#[inline]
pub fn mul128(a: u64, b: u64) -> (u64, u64) {
    let prod = (a as u128) * (b as u128);
    ((prod >> 64) as u64, prod as u64)
}

/// High `128 - S` bits of `a * b`, i.e. `floor(a * b / 2^S)` truncated to 64
/// bits. `S` is expected to be 52 or 64; the 52-bit variant exists so a
/// future SIMD layer can exploit 52-bit integer-FMA hardware, but is
/// semantically identical here.
#[inline]
pub fn mul_hi_shift<const S: u32>(a: u64, b: u64) -> u64 {
    debug_assert!(S == 52 || S == 64, "mul_hi_shift requires S in {{52, 64}}");
    let prod = (a as u128) * (b as u128);
    (prod >> S) as u64
}

/// `((hi << 64) | lo) mod q`, computed exactly.
///
/// Reference implementation for `barrett_reduce128`: a performance
/// implementation would precompute `floor(2^k / q)` and use a two-step
/// Barrett reduction followed by conditional subtraction, but 128-bit
/// hardware division is already a single instruction on every target this
/// crate cares about, so the exact form is both the reference and the fast
/// path.
#[inline]
pub fn barrett_reduce128(hi: u64, lo: u64, q: u64) -> Result<u64> {
    if q == 0 {
        return Err(Error::ModulusIsZero);
    }
    let value = ((hi as u128) << 64) | (lo as u128);
    Ok((value % (q as u128)) as u64)
}

/// One-shot reduction of a 64-bit value using a precomputed Barrett
/// constant `mu = floor(2^(2*logq) / q)`, where `logq = ceil(log2(q))`.
#[inline]
pub fn barrett_reduce64(x: u64, q: u64, mu: u64, logq: u32) -> u64 {
    let x128 = x as u128;
    let tmp1 = x128 >> (logq - 1);
    let tmp2 = (tmp1 * (mu as u128)) >> (logq + 1);
    let r = (x128.wrapping_sub(tmp2 * (q as u128))) as u64;
    if r < q { r } else { r.wrapping_sub(q) }
}

/// Precomputes the Barrett constant used by [`barrett_reduce64`].
pub fn barrett_precompute(q: u64) -> (u64, u32) {
    let logq = 64 - q.leading_zeros();
    let mu = ((1u128 << (2 * logq)) / (q as u128)) as u64;
    (mu, logq)
}

/// `(x * y) mod q`. Preconditions: `x, y < q`.
#[inline]
pub fn mul_mod(x: u64, y: u64, q: u64) -> u64 {
    debug_assert!(x < q && y < q, "mul_mod inputs must be < q");
    (((x as u128) * (y as u128)) % (q as u128)) as u64
}

/// Shoup one-multiplication variant of [`mul_mod`], reduced only to `< 2q`
/// (one conditional subtraction short of a full reduction). Mirrors the
/// original source's `MultiplyUIntModLazy`: the NTT butterfly consumes this
/// directly, folding the final subtraction into its own lazy bound
/// bookkeeping instead of paying for it twice.
#[inline]
pub fn mul_mod_shoup_lazy(x: u64, y: u64, y_precon: u64, q: u64) -> u64 {
    let prod = (x as u128) * (y as u128);
    let q_hat = mul_hi_shift::<64>(x, y_precon);
    (prod - (q_hat as u128) * (q as u128)) as u64
}

/// Shoup one-multiplication variant of [`mul_mod`]. `y_precon` must be
/// `floor(y * 2^64 / q)`, as produced by [`crate::factor::MultiplyFactor`].
/// Preconditions: `x < q`.
#[inline]
pub fn mul_mod_shoup(x: u64, y: u64, y_precon: u64, q: u64) -> u64 {
    let r = mul_mod_shoup_lazy(x, y, y_precon, q);
    if r < q { r } else { r.wrapping_sub(q) }
}

/// `(x + y) mod q`. Preconditions: `x, y < q`.
#[inline]
pub fn add_mod(x: u64, y: u64, q: u64) -> u64 {
    debug_assert!(x < q && y < q, "add_mod inputs must be < q");
    let sum = x + y;
    if sum >= q { sum - q } else { sum }
}

/// `(x - y) mod q`. Preconditions: `x, y < q`.
#[inline]
pub fn sub_mod(x: u64, y: u64, q: u64) -> u64 {
    debug_assert!(x < q && y < q, "sub_mod inputs must be < q");
    let diff = (x + q) - y;
    if diff >= q { diff - q } else { diff }
}

/// `base^exp mod q` by square-and-multiply. `base` is reduced mod `q` first.
pub fn pow_mod(base: u64, exp: u64, q: u64) -> u64 {
    let mut base = base % q;
    let mut exp = exp;
    let mut result = 1u64 % q;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, q);
        }
        base = mul_mod(base, base, q);
        exp >>= 1;
    }
    result
}

/// Extended-Euclidean modular inverse. Works for any `q` as long as
/// `gcd(x, q) == 1` — not just prime `q` — matching the original source's
/// `InverseUIntMod` rather than a Fermat-only shortcut.
pub fn inverse_mod(x: u64, q: u64) -> Result<u64> {
    let a0 = x % q;
    if a0 == 0 {
        return Err(Error::NoInverse {
            value: x,
            modulus: q,
        });
    }
    if q == 1 {
        return Ok(0);
    }

    let mut a = a0 as i128;
    let mut m = q as i128;
    let m0 = m;
    let mut y: i128 = 0;
    let mut xx: i128 = 1;

    while a > 1 {
        let qf = a / m;
        let t = m;
        m = a % m;
        a = t;

        let t = y;
        y = xx - qf * y;
        xx = t;
    }

    if a != 1 {
        return Err(Error::NoInverse {
            value: x,
            modulus: q,
        });
    }

    if xx < 0 {
        xx += m0;
    }
    Ok(xx as u64)
}

/// Deterministic Miller-Rabin primality test, exact for all `u64`.
pub fn is_prime(n: u64) -> bool {
    for &a in &MILLER_RABIN_WITNESSES {
        if n == a {
            return true;
        }
        if n % a == 0 {
            return false;
        }
    }
    if n < 2 {
        return false;
    }

    let mut r = 63u32;
    while r > 0 {
        if (n - 1) % (1u64 << r) == 0 {
            break;
        }
        r -= 1;
    }
    let d = (n - 1) / (1u64 << r);

    'witness: for &a in &MILLER_RABIN_WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// `true` iff `r != 0` and `r^(d/2) ≡ -1 (mod q)`. `d` must be a power of
/// two.
pub fn is_primitive_root(r: u64, d: u64, q: u64) -> bool {
    debug_assert!(d.is_power_of_two(), "d must be a power of two");
    if r == 0 {
        return false;
    }
    pow_mod(r, d / 2, q) == q - 1
}

/// Draws a uniform-random candidate, raises it to `(q-1)/d`, and returns it
/// if the result is a primitive `d`-th root of unity. Bounded to 200 trials
/// (matching the original source), reported as [`Error::SearchFailed`] on
/// exhaustion.
pub fn generate_primitive_root(d: u64, q: u64) -> Result<u64> {
    use rand::Rng;

    debug_assert!(d.is_power_of_two(), "d must be a power of two");
    let quotient_group_size = (q - 1) / d;
    let mut rng = rand::rng();

    const MAX_TRIALS: u32 = 200;
    for _ in 0..MAX_TRIALS {
        let candidate: u64 = rng.random_range(0..q);
        let root = pow_mod(candidate, quotient_group_size, q);
        if is_primitive_root(root, d, q) {
            return Ok(root);
        }
    }
    Err(Error::SearchFailed {
        degree: d,
        modulus: q,
        trials: MAX_TRIALS,
    })
}

/// Smallest `r in [1, q)` such that `r` is a primitive `d`-th root of unity
/// mod `q`. Finds *a* primitive root, then sweeps its cyclic orbit for the
/// minimum representative.
pub fn minimal_primitive_root(d: u64, q: u64) -> Result<u64> {
    debug_assert!(d.is_power_of_two(), "d must be a power of two");
    let root = generate_primitive_root(d, q)?;

    let root_sq = mul_mod(root, root, q);
    let mut current = root;
    let mut min_root = root;

    for _ in 0..d {
        if current < min_root {
            min_root = current;
        }
        current = mul_mod(current, root_sq, q);
    }

    Ok(min_root)
}

/// Bit-reverses the low `width` bits of `x`.
#[inline]
pub fn reverse_bits(x: u64, width: u32) -> u64 {
    if width == 0 {
        return 0;
    }
    let mut rev = 0u64;
    let mut x = x;
    for i in (0..width).rev() {
        rev |= (x & 1) << i;
        x >>= 1;
    }
    rev
}

/// Returns `count` primes `p` with `2^bit_size < p < 2^(bit_size+1)` and
/// `p ≡ 1 (mod 2N)`, scanning `p = 2^bit_size + 1, +2N, +2N, ...`.
pub fn generate_primes(count: usize, bit_size: usize, n: usize) -> Result<Vec<u64>> {
    debug_assert!(n.is_power_of_two(), "n must be a power of two");

    let step = (n as u64) << 1;
    let mut value = (1u64 << bit_size) + 1;
    let upper = 1u64 << (bit_size + 1);

    let mut found = Vec::with_capacity(count);
    while value < upper {
        if is_prime(value) {
            found.push(value);
            if found.len() == count {
                return Ok(found);
            }
        }
        value += step;
    }

    Err(Error::NotEnoughPrimes {
        requested: count,
        bit_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul128_matches_u128() {
        let a = 0xFFFF_FFFF_FFFF_FFFFu64;
        let b = 0x1234_5678_9ABC_DEF0u64;
        let expected = (a as u128) * (b as u128);
        let (hi, lo) = mul128(a, b);
        assert_eq!(((hi as u128) << 64) | (lo as u128), expected);
    }

    #[test]
    fn barrett_reduce128_agrees_with_exact_mod() {
        let q = 769u64;
        for a in 0..2000u64 {
            for b in [1u64, 2, 3, 1000] {
                let (hi, lo) = mul128(a, b);
                let got = barrett_reduce128(hi, lo, q).unwrap();
                let expected = (((a as u128) * (b as u128)) % (q as u128)) as u64;
                assert_eq!(got, expected);
            }
        }
    }

    #[test]
    fn barrett_reduce64_agrees_with_exact_mod() {
        let q = 741507920154517877u64;
        let (mu, logq) = barrett_precompute(q);
        for x in [0u64, 1, q - 1, q / 2, q + 1, (q / 3) * 2] {
            assert_eq!(barrett_reduce64(x, q, mu, logq), x % q);
        }
    }

    #[test]
    fn barrett_reduce128_zero_modulus_errors() {
        assert_eq!(barrett_reduce128(0, 5, 0), Err(Error::ModulusIsZero));
    }

    #[test]
    fn add_sub_mod_scenarios() {
        let q = 10u64;
        let inputs = [1u64, 2, 3, 4, 5, 6, 7, 8];
        let addends = [1u64, 3, 5, 7, 2, 4, 6, 8];
        let expected = [2u64, 5, 8, 1, 7, 0, 3, 6];
        for i in 0..inputs.len() {
            assert_eq!(add_mod(inputs[i], addends[i], q), expected[i]);
        }
    }

    #[test]
    fn mul_mod_scalar_scenario() {
        let q = 769u64;
        let a = [2u64, 4, 3, 2];
        let b = [2u64, 1, 2, 0];
        let expected = [4u64, 4, 6, 0];
        for i in 0..a.len() {
            assert_eq!(mul_mod(a[i], b[i], q), expected[i]);
        }
    }

    #[test]
    fn mul_mod_shoup_lazy_stays_under_2q() {
        let q = 741507920154517877u64;
        let y = 123456789u64;
        let y_precon = (((y as u128) << 64) / (q as u128)) as u64;
        for x in [0u64, 1, q - 1, q / 2] {
            let r = mul_mod_shoup_lazy(x, y, y_precon, q);
            assert!(r < 2 * q);
            assert_eq!(r % q, mul_mod(x, y, q));
        }
    }

    #[test]
    fn mul_mod_shoup_matches_mul_mod() {
        let q = 741507920154517877u64;
        for _ in 0..100 {
            use rand::Rng;
            let mut rng = rand::rng();
            let x: u64 = rng.random_range(0..q);
            let y: u64 = rng.random_range(0..q);
            let y_precon = (((y as u128) << 64) / (q as u128)) as u64;
            assert_eq!(mul_mod_shoup(x, y, y_precon, q), mul_mod(x, y, q));
        }
    }

    #[test]
    fn pow_mod_matches_repeated_mul() {
        let q = 101u64;
        let base = 7u64;
        let mut expected = 1u64;
        for _ in 0..13 {
            expected = mul_mod(expected, base, q);
        }
        assert_eq!(pow_mod(base, 13, q), expected);
    }

    #[test]
    fn inverse_mod_round_trips() {
        let q = 741507920154517877u64;
        for x in [1u64, 2, 3, 12345, q - 1] {
            let inv = inverse_mod(x, q).unwrap();
            assert_eq!(mul_mod(x % q, inv, q), 1);
        }
    }

    #[test]
    fn inverse_mod_shares_factor_errors() {
        // 6 and 9 share a factor of 3.
        assert!(inverse_mod(6, 9).is_err());
    }

    #[test]
    fn is_prime_matches_known_values() {
        for p in [2u64, 3, 5, 7, 11, 769, 741507920154517877] {
            assert!(is_prime(p), "{p} should be prime");
        }
        for c in [1u64, 4, 6, 8, 9, 100, 741507920154517878] {
            assert!(!is_prime(c), "{c} should not be prime");
        }
    }

    #[test]
    fn reverse_bits_scenarios() {
        assert_eq!(reverse_bits(0b101, 3), 0b101);
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b010, 3), 0b010);
        assert_eq!(reverse_bits(5, 4), 10);
    }

    #[test]
    fn generate_primes_satisfy_congruence() {
        let n = 8usize;
        let primes = generate_primes(3, 10, n).unwrap();
        assert_eq!(primes.len(), 3);
        for &p in &primes {
            assert!(is_prime(p));
            assert_eq!((p - 1) % (2 * n as u64), 0);
        }
    }

    #[test]
    fn generate_primes_exhaustion_errors() {
        // Window [2^2, 2^3) has too few congruent primes to find 1000 of them.
        assert!(generate_primes(1000, 2, 4).is_err());
    }

    #[test]
    fn minimal_primitive_root_is_primitive() {
        let q = 0x0FFF_FFFF_FFFC_0001u64;
        let n = 16u64;
        let root = minimal_primitive_root(2 * n, q).unwrap();
        assert!(is_primitive_root(root, 2 * n, q));
    }
}
