// SPDX-License-Identifier: CC0-1.0

//! # BitcoinKit Library
//!
//! This is the cryptographic and transaction-validation core of a Bitcoin
//! protocol library. It provides an ECDSA engine over the secp256k1 curve
//! with deterministic nonce generation and public-key recovery, a SEC1
//! public-key codec, and a transaction verifier that drives an external
//! script interpreter.
//!
//! It is written entirely in Rust to illustrate the benefits of strong type
//! safety, including ownership and lifetime, for financial and/or
//! cryptographic software.
//!
//! ## Available feature flags
//!
//! * `serde` - (dependency), implements `serde`-based serialization and
//!   deserialization.

// Coding conventions.
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

/// Rust implementation of cryptographic hash function algorithms.
#[macro_use]
pub extern crate bitcoin_hashes as hashes;

#[cfg(feature = "serde")]
#[macro_use]
extern crate actual_serde as serde;

#[macro_use]
mod internal_macros;

pub mod blockdata;
pub mod consensus;
pub mod crypto;
pub mod hash_types;
pub mod sign_message;

#[doc(inline)]
pub use crate::blockdata::constants;
#[doc(inline)]
pub use crate::blockdata::script::{Script, ScriptVerifier};
#[doc(inline)]
pub use crate::blockdata::transaction::{EcdsaSighashType, OutPoint, Transaction, TxIn, TxOut};
#[doc(inline)]
pub use crate::consensus::encode::VarInt;
#[doc(inline)]
pub use crate::crypto::ecdsa::{self, RecoveryId, Signature};
#[doc(inline)]
pub use crate::crypto::key::{self, PrivateKey, PublicKey};
#[doc(inline)]
pub use crate::crypto::secp256k1;
#[doc(inline)]
pub use crate::hash_types::{PubkeyHash, Sighash, Txid};
