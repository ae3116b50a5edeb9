// SPDX-License-Identifier: CC0-1.0

//! Blockdata.
//!
//! Transaction structures, scripts as opaque byte buffers, and the network
//! constants the verifier reads.

pub mod constants;
pub mod script;
pub mod transaction;
