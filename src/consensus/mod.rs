// SPDX-License-Identifier: CC0-1.0

//! Bitcoin consensus.
//!
//! This module defines structures, functions, and traits that are needed to
//! conform to Bitcoin consensus.

pub mod encode;
pub mod validation;

pub use self::encode::{
    deserialize, deserialize_partial, serialize, serialize_hex, Decodable, Encodable, ReadExt,
    WriteExt,
};
pub use self::validation::{
    check_transaction, verify_transaction, verify_transaction_inputs, TxCheckError, TxVerifyError,
};
