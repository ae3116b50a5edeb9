// SPDX-License-Identifier: CC0-1.0

//! Blockdata constants.
//!
//! This module provides various constants relating to the blockchain and
//! consensus code.

/// The maximum allowable sequence number.
pub const MAX_SEQUENCE: u32 = 0xFFFFFFFF;

/// How many satoshis are in "one bitcoin".
pub const COIN_VALUE: i64 = 100_000_000;

/// The maximum allowed size of a serialized block, in bytes.
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// The maximum value allowed in an output (useful for sanity checking,
/// since keeping everything below this value should prevent overflows
/// if you are doing anything remotely sane with monetary values).
pub const MAX_MONEY: i64 = 21_000_000 * COIN_VALUE;

/// The lower bound on a coinbase input script length, in bytes.
pub const MIN_COINBASE_SCRIPT_LEN: usize = 2;

/// The upper bound on a coinbase input script length, in bytes.
pub const MAX_COINBASE_SCRIPT_LEN: usize = 100;
