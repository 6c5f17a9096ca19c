//! Typed error surface for every fallible construction and kernel entry point.

use thiserror::Error;

/// Failure kinds produced by this crate.
///
/// Contract violations (bad shapes, out-of-range values) and search
/// exhaustion (no witness found within the allowed window) are kept as
/// distinct variants so callers can tell "you gave me garbage" apart from
/// "the search space was too small," per the two error regimes this crate
/// follows.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A contract violation: mismatched lengths, `n == 0`, `q <= 1`, or an
    /// input value exceeding its declared bound.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `barrett_reduce128` was asked to reduce modulo zero.
    #[error("modulus is zero")]
    ModulusIsZero,

    /// NTT construction was given a composite modulus.
    #[error("modulus {0} is not prime")]
    NotPrime(u64),

    /// NTT construction was given a modulus failing `q ≡ 1 (mod 2N)`.
    #[error("modulus {q} does not satisfy q ≡ 1 (mod {two_n})")]
    BadCongruence { q: u64, two_n: u64 },

    /// A caller-supplied root of unity failed the primitivity check.
    #[error("{root} is not a primitive {degree}-th root of unity mod {modulus}")]
    NotPrimitiveRoot {
        root: u64,
        degree: u64,
        modulus: u64,
    },

    /// `inverse_mod` was asked to invert a value sharing a factor with the
    /// modulus.
    #[error("{value} has no inverse mod {modulus}")]
    NoInverse { value: u64, modulus: u64 },

    /// `generate_primes` exhausted its search window before finding enough
    /// primes.
    #[error("could not find {requested} prime(s) of bit size {bit_size} with the requested congruence")]
    NotEnoughPrimes { requested: usize, bit_size: usize },

    /// Primitive-root search exhausted its trial budget.
    #[error("primitive root search failed for degree {degree} mod {modulus} after {trials} trials")]
    SearchFailed {
        degree: u64,
        modulus: u64,
        trials: u32,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
