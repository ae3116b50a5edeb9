// SPDX-License-Identifier: CC0-1.0

//! Cryptography.
//!
//! Cryptography related functionality: keys and signatures.

pub mod ecdsa;
pub mod key;
pub mod secp256k1;
