//! Precomputed factor (component B): a value paired with its Barrett
//! factor for Shoup-style one-multiplication modular multiply.

/// `operand` paired with the Barrett factor `floor(operand * 2^shift / q)`
/// needed to multiply it against any `x < q` in one multiply-and-shift
/// instead of a division.
///
/// Mirrors the original source's `MultiplyFactor` class: constructed once
/// per twiddle value, then consumed by [`crate::numtheory::mul_mod_shoup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyFactor {
    operand: u64,
    modulus: u64,
    shift: u32,
    barrett_factor: u64,
}

impl MultiplyFactor {
    /// Builds the factor for `operand` under `modulus`, precomputing
    /// `barrett_factor` for the given shift. `shift` is expected to be one
    /// of 32, 52, or 64.
    ///
    /// # Panics
    /// If `operand >= modulus`.
    pub fn new(operand: u64, shift: u32, modulus: u64) -> Self {
        assert!(
            operand < modulus,
            "MultiplyFactor operand {operand} must be < modulus {modulus}"
        );
        debug_assert!(
            shift == 32 || shift == 52 || shift == 64,
            "MultiplyFactor shift must be 32, 52, or 64, got {shift}"
        );
        let barrett_factor = (((operand as u128) << shift) / (modulus as u128)) as u64;
        Self {
            operand,
            modulus,
            shift,
            barrett_factor,
        }
    }

    #[inline]
    pub fn operand(&self) -> u64 {
        self.operand
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline]
    pub fn barrett_factor(&self) -> u64 {
        self.barrett_factor
    }

    /// One-multiplication modular multiply of `self.operand() * x mod q`,
    /// for any `x < q`. Only valid when `self.shift() == 64`; a 52-bit
    /// variant would need a separate accessor bounded to a 52-bit `x` to
    /// stay correct, but no caller in this crate constructs a 52-bit
    /// factor, so it isn't provided.
    #[inline]
    pub fn apply(&self, x: u64) -> u64 {
        debug_assert_eq!(self.shift, 64);
        crate::numtheory::mul_mod_shoup(x, self.operand, self.barrett_factor, self.modulus)
    }
}
