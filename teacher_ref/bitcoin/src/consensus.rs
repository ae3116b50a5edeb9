// SPDX-License-Identifier: CC0-1.0

//! Bitcoin consensus.
//!
//! This module defines structures, functions, and traits that are needed to
//! conform to Bitcoin consensus.

#[rustfmt::skip]                // Keep public re-exports separate.
#[doc(inline)]
pub use self::{
    encode::{deserialize, deserialize_partial, serialize, Decodable, Encodable, ReadExt, WriteExt, VarInt},
    params::Params,
};
pub use primitives::consensus::*;

#[cfg(feature = "bitcoinconsensus")]
#[doc(inline)]
pub use self::validation::{
    verify_script, verify_script_with_flags, verify_transaction, verify_transaction_with_flags,
};

pub mod encode {
    //! Bitcoin consensus-encodable types.
    //!
    //! This is basically a replacement of the `Encodable` trait which does
    //! normalization of endianness etc., to ensure that the encoding matches
    //! the network consensus encoding.
    //!
    //! Essentially, anything that must go on the _disk_ or _network_ must be
    //! encoded using the `Encodable` trait, since this data must be the same for
    //! all systems. Any data going to the _user_ e.g., over JSONRPC, should use the
    //! ordinary `Encodable` trait. (This should also be the same across systems, of
    //! course, but has some critical differences from the network format e.g.,
    //! scripts come with an opcode decode, hashes are big-endian, numbers are
    //! typically big-endian decimals, etc.)

    pub use primitives::consensus::encode::*;

}

pub mod params {
    // SPDX-License-Identifier: CC0-1.0

    //! Bitcoin consensus parameters.
    //!
    //! This module provides a predefined set of parameters for different Bitcoin
    //! chains (such as mainnet, testnet).
    //!
    //! # Custom Signets Example
    //!
    //! In various places in this crate we take `AsRef<Params>` as a parameter, in order to create a
    //! custom type that can be used is such places you might want to do the following:
    //!
    //! ```
    //! use bitcoin::consensus::Params;
    //! use bitcoin::{p2p, Script, ScriptBuf, Network, Target};
    //!
    //! const POW_TARGET_SPACING: u64 = 120; // Two minutes.
    //! const MAGIC: [u8; 4] = [1, 2, 3, 4];
    //!
    //! pub struct CustomParams {
    //!     params: Params,
    //!     magic: [u8; 4],
    //!     challenge_script: ScriptBuf,
    //! }
    //!
    //! impl CustomParams {
    //!     /// Creates a new custom params.
    //!     pub fn new() -> Self {
    //!         let mut params = Params::new(Network::Signet);
    //!         params.pow_target_spacing = POW_TARGET_SPACING;
    //!
    //!         // This would be something real (see BIP-325).
    //!         let challenge_script = ScriptBuf::new();
    //!
    //!         Self {
    //!             params,
    //!             magic: MAGIC,
    //!             challenge_script,
    //!         }
    //!     }
    //!
    //!     /// Returns the custom magic bytes.
    //!     pub fn magic(&self) -> p2p::Magic { p2p::Magic::from_bytes(self.magic) }
    //!
    //!     /// Returns the custom signet challenge script.
    //!     pub fn challenge_script(&self) -> &Script { &self.challenge_script }
    //! }
    //!
    //! impl AsRef<Params> for CustomParams {
    //!     fn as_ref(&self) -> &Params { &self.params }
    //! }
    //!
    //! impl Default for CustomParams {
    //!     fn default() -> Self { Self::new() }
    //! }
    //!
    //! # { // Just check the code above is usable.
    //! #    let target = Target::MAX_ATTAINABLE_SIGNET;
    //! #
    //! #    let signet = Params::SIGNET;
    //! #    let _ = target.difficulty(signet);
    //! #
    //! #    let custom = CustomParams::new();
    //! #    let _ = target.difficulty(custom);
    //! # }
    //! ```

    pub use primitives::params::*;
}

/// Re-export the consensus serde module.
#[cfg(feature = "serde")]
pub use primitives::consensus::serde;
/// Re-export the consensus validation module.
#[cfg(feature = "bitcoinconsensus")]
pub use primitives::consensus::validation;
