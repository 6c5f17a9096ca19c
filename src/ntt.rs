//! Negacyclic Number-Theoretic Transform engine (component A): forward and
//! inverse transforms over `Z_q[x]/(x^N+1)`, built from the scalar
//! primitives in [`crate::numtheory`] and [`crate::factor`].
//!
//! The transform degree `N` is a runtime value rather than a const generic
//! parameter. A process-wide cache ([`crate::cache`]) must hold engines for
//! many distinct `(N, q)` pairs behind one map, and a `HashMap` cannot
//! uniformly store `NttEngine<4>` next to `NttEngine<1024>` without type
//! erasure — so the degree lives in the struct, checked once at
//! construction instead of by the type system.

use std::sync::Arc;

use crate::buffer::AlignedBuffer;
use crate::error::{Error, Result};
use crate::factor::MultiplyFactor;
use crate::numtheory::{
    add_mod, inverse_mod, is_primitive_root, minimal_primitive_root, mul_mod, mul_mod_shoup_lazy,
    pow_mod, reverse_bits, sub_mod,
};

/// A negacyclic NTT engine for a fixed `(degree, modulus)` pair: precomputed
/// root-of-unity power tables plus their Shoup factors, ready to transform
/// any `degree`-length vector over that modulus.
///
/// Mirrors the original source's `NTTImpl`: everything expensive (root
/// search, table construction) happens once in the constructor, so
/// `compute_forward`/`compute_inverse` only touch precomputed tables.
#[derive(Debug)]
pub struct NttEngine {
    degree: usize,
    log2_degree: u32,
    modulus: u64,
    root_of_unity: u64,
    inv_root_of_unity: u64,
    inv_degree: u64,
    inv_degree_precon: u64,
    /// `N^{-1} * W` for the final inverse-transform level's twiddle `W`,
    /// fused into that level's butterfly so the caller never pays a
    /// separate normalization pass.
    inv_n_w: u64,
    inv_n_w_precon: u64,
    /// `root_powers[bit_reverse(i)] = root_of_unity^i mod q`, indices
    /// `1..degree` meaningful (index 0 unused, matching the `m + i`
    /// addressing the butterfly loops use).
    root_powers: AlignedBuffer,
    root_powers_precon: AlignedBuffer,
    inv_root_powers: AlignedBuffer,
    inv_root_powers_precon: AlignedBuffer,
}

fn checked_log2(degree: usize) -> Result<u32> {
    if degree == 0 || !degree.is_power_of_two() {
        return Err(Error::InvalidArgument("degree must be a power of two"));
    }
    Ok(degree.trailing_zeros())
}

/// `input_mod_factor in {1,2,4}`, `output_mod_factor in {1,4}` — the forward
/// transform's declared bound set (see `ComputeForward` in the original
/// source's `ntt-internal.cpp`).
fn check_forward_mod_factors(input_mod_factor: u64, output_mod_factor: u64) -> Result<()> {
    if !matches!(input_mod_factor, 1 | 2 | 4) {
        return Err(Error::InvalidArgument("input_mod_factor must be 1, 2, or 4"));
    }
    if !matches!(output_mod_factor, 1 | 4) {
        return Err(Error::InvalidArgument("output_mod_factor must be 1 or 4"));
    }
    Ok(())
}

/// `input_mod_factor, output_mod_factor in {1,2}` — the inverse transform's
/// declared bound set.
fn check_inverse_mod_factors(input_mod_factor: u64, output_mod_factor: u64) -> Result<()> {
    if !matches!(input_mod_factor, 1 | 2) {
        return Err(Error::InvalidArgument("input_mod_factor must be 1 or 2"));
    }
    if !matches!(output_mod_factor, 1 | 2) {
        return Err(Error::InvalidArgument("output_mod_factor must be 1 or 2"));
    }
    Ok(())
}

fn debug_check_bound(data: &[u64], bound: u64) {
    debug_assert!(
        data.iter().all(|&x| x < bound),
        "NTT operand exceeds declared bound {bound}"
    );
}

impl NttEngine {
    /// Builds an engine for `degree` over `modulus`, searching for a
    /// primitive `2*degree`-th root of unity. Requires `modulus` prime and
    /// `modulus ≡ 1 (mod 2*degree)`.
    pub fn new(degree: usize, modulus: u64) -> Result<Arc<Self>> {
        if !crate::numtheory::is_prime(modulus) {
            return Err(Error::NotPrime(modulus));
        }
        let two_n = (degree as u64)
            .checked_mul(2)
            .ok_or(Error::InvalidArgument("degree too large"))?;
        if modulus <= 1 || (modulus - 1) % two_n != 0 {
            return Err(Error::BadCongruence { q: modulus, two_n });
        }
        let root = minimal_primitive_root(two_n, modulus)?;
        Self::with_root(degree, modulus, root)
    }

    /// Builds an engine using a caller-supplied primitive `2*degree`-th
    /// root of unity, validated before use. Lets a caller reproduce a
    /// specific engine (e.g. from a serialized parameter set) without
    /// re-running the randomized search in [`NttEngine::new`].
    pub fn with_root(degree: usize, modulus: u64, root: u64) -> Result<Arc<Self>> {
        let log2_degree = checked_log2(degree)?;
        let two_n = (degree as u64) << 1;
        if !is_primitive_root(root, two_n, modulus) {
            return Err(Error::NotPrimitiveRoot {
                root,
                degree: two_n,
                modulus,
            });
        }

        tracing::debug!(degree, modulus, root, "constructing NTT engine");

        let inv_root_of_unity = inverse_mod(root, modulus)?;
        let inv_degree = inverse_mod(degree as u64, modulus)?;
        let inv_degree_precon = MultiplyFactor::new(inv_degree, 64, modulus).barrett_factor();

        let (root_powers, root_powers_precon) =
            Self::build_power_tables(degree, log2_degree, modulus, root);
        let (inv_root_powers, inv_root_powers_precon) =
            Self::build_power_tables(degree, log2_degree, modulus, inv_root_of_unity);

        let (inv_n_w, inv_n_w_precon) = if degree > 1 {
            let w = mul_mod(inv_degree, inv_root_powers[1], modulus);
            let precon = MultiplyFactor::new(w, 64, modulus).barrett_factor();
            (w, precon)
        } else {
            (inv_degree, inv_degree_precon)
        };

        Ok(Arc::new(Self {
            degree,
            log2_degree,
            modulus,
            root_of_unity: root,
            inv_root_of_unity,
            inv_degree,
            inv_degree_precon,
            inv_n_w,
            inv_n_w_precon,
            root_powers,
            root_powers_precon,
            inv_root_powers,
            inv_root_powers_precon,
        }))
    }

    /// Builds `powers[bit_reverse(i, log2_degree)] = base^i mod q` for
    /// `i in 0..degree`, plus the matching Shoup precomputation table.
    /// Grounded in the original source's `ComputeRootOfUnityPowers`, which
    /// lays the table out in bit-reversed order so the forward butterfly's
    /// `m + i` addressing walks it linearly stage by stage.
    fn build_power_tables(
        degree: usize,
        log2_degree: u32,
        modulus: u64,
        base: u64,
    ) -> (AlignedBuffer, AlignedBuffer) {
        let mut powers = AlignedBuffer::zeroed(degree);
        let mut power = 1u64;
        for i in 0..degree {
            let idx = reverse_bits(i as u64, log2_degree) as usize;
            powers[idx] = power;
            power = mul_mod(power, base, modulus);
        }
        let mut precon = AlignedBuffer::zeroed(degree);
        for i in 0..degree {
            precon[i] = MultiplyFactor::new(powers[i], 64, modulus).barrett_factor();
        }
        (powers, precon)
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn root_of_unity(&self) -> u64 {
        self.root_of_unity
    }

    fn check_len(&self, values: &[u64]) -> Result<()> {
        if values.len() != self.degree {
            return Err(Error::InvalidArgument(
                "value slice length must equal the engine's degree",
            ));
        }
        Ok(())
    }

    /// Forward transform, in place: natural-order input, bit-reversed-order
    /// output. Cooley-Tukey decimation-in-time with the lazy Harvey/Shoup
    /// butterfly: every element stays bounded by `4q` across levels and the
    /// per-butterfly multiply costs one 128-bit product instead of a
    /// division.
    ///
    /// `input_mod_factor` declares `values[i] < input_mod_factor * q` on
    /// entry (`{1, 2, 4}`); `output_mod_factor` selects the bound the
    /// result is left in (`{1, 4}` — `1` costs one extra O(N) reduction
    /// pass over the rest of the transform).
    ///
    /// This is the "`out` aliases `in`" case of the original's `(out, in,
    /// …)` signature: both are the same slice, since Rust's borrow checker
    /// cannot hold a `&mut` and a `&` to the same memory at once.
    /// [`NttEngine::compute_forward_into`] covers the distinct-buffers case.
    pub fn compute_forward(
        &self,
        values: &mut [u64],
        input_mod_factor: u64,
        output_mod_factor: u64,
    ) -> Result<()> {
        self.check_len(values)?;
        check_forward_mod_factors(input_mod_factor, output_mod_factor)?;
        let q = self.modulus;
        debug_check_bound(values, input_mod_factor * q);

        let twice_mod = q << 1;
        let n = self.degree;
        let mut t = n;
        let mut m = 1usize;
        while m < n {
            t /= 2;
            for i in 0..m {
                let w = self.root_powers[m + i];
                let w_precon = self.root_powers_precon[m + i];
                let j1 = 2 * i * t;
                for j in j1..j1 + t {
                    let x = values[j];
                    let y = values[j + t];
                    // Harvey butterfly: X, Y in [0, 4q) in, X', Y' in
                    // [0, 4q) out. Only X needs folding back under 2q —
                    // the lazy Shoup multiply already tolerates Y up to 4q.
                    let tx = if x >= twice_mod { x - twice_mod } else { x };
                    let t_val = mul_mod_shoup_lazy(y, w, w_precon, q);
                    values[j] = tx + t_val;
                    values[j + t] = tx + twice_mod - t_val;
                }
            }
            m *= 2;
        }

        if output_mod_factor == 1 {
            for x in values.iter_mut() {
                if *x >= twice_mod {
                    *x -= twice_mod;
                }
                if *x >= q {
                    *x -= q;
                }
            }
        }
        Ok(())
    }

    /// Out-of-place forward transform: copies `input` into `out`, matching
    /// the original's "if `out != in`, the first level writes from `in`
    /// into `out`" contract, then transforms `out` in place, leaving
    /// `input` untouched.
    pub fn compute_forward_into(
        &self,
        out: &mut [u64],
        input: &[u64],
        input_mod_factor: u64,
        output_mod_factor: u64,
    ) -> Result<()> {
        self.check_len(input)?;
        if out.len() != input.len() {
            return Err(Error::InvalidArgument(
                "out and in slices must have equal length",
            ));
        }
        out.copy_from_slice(input);
        self.compute_forward(out, input_mod_factor, output_mod_factor)
    }

    /// Textbook forward transform: one full-reduction modular multiply and
    /// two modular adds per butterfly, no Shoup factor, no lazy bound
    /// tracking. The non-lazy reference §4.2.4-style testing needs: the
    /// fast [`NttEngine::compute_forward`] must match this bit-for-bit once
    /// its lazy output has been fully reduced.
    pub fn compute_forward_exact(&self, values: &mut [u64]) -> Result<()> {
        self.check_len(values)?;
        let q = self.modulus;
        let n = self.degree;
        let mut t = n;
        let mut m = 1usize;
        while m < n {
            t /= 2;
            for i in 0..m {
                let w = self.root_powers[m + i];
                let j1 = 2 * i * t;
                for j in j1..j1 + t {
                    let u = values[j];
                    let v = mul_mod(values[j + t], w, q);
                    values[j] = add_mod(u, v, q);
                    values[j + t] = sub_mod(u, v, q);
                }
            }
            m *= 2;
        }
        Ok(())
    }

    /// Inverse transform, in place: bit-reversed-order input (as produced
    /// by [`NttEngine::compute_forward`]), natural-order output.
    /// Gentleman-Sande decimation-in-frequency with the lazy Harvey/Shoup
    /// butterfly; the final level fuses the butterfly with multiplication
    /// by `N^{-1}` and `N^{-1} * W`, so the caller never pays a separate
    /// normalization pass.
    ///
    /// `input_mod_factor`, `output_mod_factor in {1, 2}`, same aliasing
    /// convention as [`NttEngine::compute_forward`].
    pub fn compute_inverse(
        &self,
        values: &mut [u64],
        input_mod_factor: u64,
        output_mod_factor: u64,
    ) -> Result<()> {
        self.check_len(values)?;
        check_inverse_mod_factors(input_mod_factor, output_mod_factor)?;
        let q = self.modulus;
        debug_check_bound(values, input_mod_factor * q);

        let twice_mod = q << 1;
        let n = self.degree;

        if n == 1 {
            if output_mod_factor == 1 {
                for x in values.iter_mut() {
                    if *x >= q {
                        *x -= q;
                    }
                }
            }
            return Ok(());
        }

        // Levels m = n/2, n/4, ..., 2 (h = m/2 down to 1); the last level
        // (h == 1) is handled separately below so it can fuse the N^{-1}
        // normalization into its butterfly.
        let mut t = 1usize;
        let mut m = n;
        while m > 2 {
            let h = m / 2;
            for i in 0..h {
                let w = self.inv_root_powers[h + i];
                let w_precon = self.inv_root_powers_precon[h + i];
                let j1 = 2 * i * t;
                for j in j1..j1 + t {
                    let x = values[j];
                    let y = values[j + t];
                    let mut tx = x + y;
                    if tx >= twice_mod {
                        tx -= twice_mod;
                    }
                    let ty = x + twice_mod - y;
                    values[j] = tx;
                    values[j + t] = mul_mod_shoup_lazy(ty, w, w_precon, q);
                }
            }
            t *= 2;
            m /= 2;
        }

        // The final level's twiddle is folded into `inv_n_w` at construction
        // time (N^{-1} * W), so no table lookup is needed here.
        for j in 0..t {
            let x = values[j];
            let y = values[j + t];
            let mut tx = x + y;
            if tx >= twice_mod {
                tx -= twice_mod;
            }
            let ty = x + twice_mod - y;
            values[j] = mul_mod_shoup_lazy(tx, self.inv_degree, self.inv_degree_precon, q);
            values[j + t] = mul_mod_shoup_lazy(ty, self.inv_n_w, self.inv_n_w_precon, q);
        }

        if output_mod_factor == 1 {
            for x in values.iter_mut() {
                if *x >= q {
                    *x -= q;
                }
            }
        }
        Ok(())
    }

    /// Out-of-place inverse transform: copies `input` into `out`, matching
    /// the original's "if `out != in`, the first level writes from `in`
    /// into `out`" contract, then transforms `out` in place, leaving
    /// `input` untouched.
    pub fn compute_inverse_into(
        &self,
        out: &mut [u64],
        input: &[u64],
        input_mod_factor: u64,
        output_mod_factor: u64,
    ) -> Result<()> {
        self.check_len(input)?;
        if out.len() != input.len() {
            return Err(Error::InvalidArgument(
                "out and in slices must have equal length",
            ));
        }
        out.copy_from_slice(input);
        self.compute_inverse(out, input_mod_factor, output_mod_factor)
    }

    /// Textbook inverse transform: one full-reduction modular multiply and
    /// two modular adds per butterfly, no Shoup factor, no lazy bound
    /// tracking, with a plain final pass scaling by `N^{-1}`. Reference
    /// counterpart of [`NttEngine::compute_forward_exact`].
    pub fn compute_inverse_exact(&self, values: &mut [u64]) -> Result<()> {
        self.check_len(values)?;
        let q = self.modulus;
        let n = self.degree;
        let mut t = 1usize;
        let mut m = n;
        while m > 1 {
            let h = m / 2;
            for i in 0..h {
                let w = self.inv_root_powers[h + i];
                let j1 = 2 * i * t;
                for j in j1..j1 + t {
                    let u = values[j];
                    let v = values[j + t];
                    values[j] = add_mod(u, v, q);
                    values[j + t] = mul_mod(sub_mod(u, v, q), w, q);
                }
            }
            t *= 2;
            m /= 2;
        }
        for x in values.iter_mut() {
            *x = mul_mod(*x, self.inv_degree, q);
        }
        Ok(())
    }

    /// Textbook O(N^2) evaluation at the odd powers of the `2N`-th root of
    /// unity, used as a correctness oracle for the fast transforms. Output
    /// is in the same bit-reversed order [`NttEngine::compute_forward`]
    /// produces.
    pub fn reference_forward(&self, values: &[u64]) -> Result<Vec<u64>> {
        self.check_len(values)?;
        let q = self.modulus;
        let n = self.degree;
        let mut result = vec![0u64; n];
        for k in 0..n {
            let wk = pow_mod(self.root_of_unity, (2 * k + 1) as u64, q);
            let mut acc = 0u64;
            let mut wk_pow = 1u64;
            for &value in values {
                acc = add_mod(acc, mul_mod(value, wk_pow, q), q);
                wk_pow = mul_mod(wk_pow, wk, q);
            }
            result[reverse_bits(k as u64, self.log2_degree) as usize] = acc;
        }
        Ok(result)
    }

    /// Negacyclic convolution of two polynomials via forward transform,
    /// pointwise multiply, inverse transform.
    pub fn negacyclic_convolution(&self, a: &[u64], b: &[u64]) -> Result<Vec<u64>> {
        self.check_len(a)?;
        self.check_len(b)?;
        let mut ta = a.to_vec();
        let mut tb = b.to_vec();
        self.compute_forward(&mut ta, 1, 1)?;
        self.compute_forward(&mut tb, 1, 1)?;
        let mut product: Vec<u64> = ta
            .iter()
            .zip(tb.iter())
            .map(|(&x, &y)| mul_mod(x, y, self.modulus))
            .collect();
        self.compute_inverse(&mut product, 1, 1)?;
        Ok(product)
    }
}
