//! Modular-arithmetic and negacyclic-NTT primitive kernel for
//! homomorphic-encryption workloads: element-wise vector routines over
//! `u64`, a scalar number-theory toolbox, and a cached NTT engine.

pub mod buffer;
pub mod cache;
pub mod eltwise;
pub mod error;
pub mod factor;
pub mod numtheory;
pub mod ntt;

pub use buffer::AlignedBuffer;
pub use cache::NttCache;
pub use eltwise::{
    add_mod, add_mod_scalar, cmp_add, cmp_sub_mod, fma_mod, mult_mod, reduce_mod, sub_mod, CmpOp,
};
pub use error::{Error, Result};
pub use factor::MultiplyFactor;
pub use ntt::NttEngine;
