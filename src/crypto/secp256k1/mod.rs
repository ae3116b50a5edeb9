// SPDX-License-Identifier: CC0-1.0

//! Pure-Rust secp256k1 group arithmetic.
//!
//! Scalars and field elements are fixed 256-bit integers backed by four
//! 64-bit limbs; the curve constants G, n and p are process-wide `const`
//! statics.

mod field;
mod point;
mod scalar;

pub use self::field::FieldElement;
pub use self::point::Point;
pub use self::scalar::Scalar;
