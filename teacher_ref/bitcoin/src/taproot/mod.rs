// SPDX-License-Identifier: CC0-1.0

//! Bitcoin Taproot.
//!
// FIXME: This comment is not fully descriptive because of `TaprootSpendInfo`.
//! This module provides support for taproot tagged hashes.

/// Re-export everything from the [`primitives::taproot`] module.
#[rustfmt::skip]                // Keep public re-exports separate.
#[doc(inline)]
pub use crate::primitives::taproot::*;
