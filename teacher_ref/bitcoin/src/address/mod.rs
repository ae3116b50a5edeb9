// SPDX-License-Identifier: CC0-1.0

//! Bitcoin addresses.
//!
//! Support for segwit and legacy addresses (bech32 and base58 respectively).
//!
//! # Examples
//!
//! ### Creating a new address from a randomly-generated key pair.
//!
//! ```rust
//! #[cfg(all(feature = "rand", feature = "std"))] {
//! use bitcoin::secp256k1::rand;
//! use bitcoin::{Address, Network, PublicKey};
//!
//! // Generate random key pair.
//! let (_sk, pk) = secp256k1::generate_keypair(&mut rand::rng());
//! let public_key = PublicKey::new(pk); // Or `PublicKey::from(pk)`.
//!
//! // Generate a mainnet pay-to-pubkey-hash address.
//! let address = Address::p2pkh(&public_key, Network::Bitcoin);
//! }
//! ```
//!
//! ### Using an `Address` as a struct field.
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! # use serde::{self, Deserialize, Serialize};
//! use bitcoin::address::{Address, NetworkValidation, NetworkValidationUnchecked};
//! #[derive(Serialize, Deserialize)]
//! struct Foo<V>
//!     where V: NetworkValidation,
//! {
//!     #[serde(bound(deserialize = "V: NetworkValidationUnchecked"))]
//!     address: Address<V>,
//! }
//! # }
//! ```

pub use addresses::address::*;

use crate::crypto::key::{CompressedPublicKey, PubkeyHash};
use crate::crypto::WitnessProgramExt as _;
use crate::network::{Network, NetworkKind};
use crate::script::witness_program::WitnessProgram;
use crate::script::witness_version::WitnessVersion;
use crate::script::{
    self, RedeemScriptSizeError, Script, ScriptExt as _, ScriptHash, ScriptHashableTag,
    ScriptPubKey, ScriptPubKeyBuf, ScriptPubKeyBufExt as _, ScriptPubKeyExt as _, WScriptHash,
    WitnessScript, WitnessScriptExt as _, WitnessScriptSizeError,
};

/// Extension trait providing script helpers for [`Address`].
pub trait AddressScriptExt: Sized {
    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] from a script.
    fn p2sh<T: ScriptHashableTag>(
        redeem_script: &Script<T>,
        network: impl Into<NetworkKind>,
    ) -> Result<Self, RedeemScriptSizeError>;

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] from a script hash.
    fn p2sh_from_hash(hash: ScriptHash, network: impl Into<NetworkKind>) -> Self;

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] that embeds a P2WPKH.
    fn p2shwpkh(pk: CompressedPublicKey, network: impl Into<NetworkKind>) -> Self;

    /// Constructs a new pay-to-witness-script-hash (P2WSH) [`Address`] from a witness script.
    fn p2wsh(
        witness_script: &WitnessScript,
        hrp: impl Into<KnownHrp>,
    ) -> Result<Self, WitnessScriptSizeError>;

    /// Constructs a new pay-to-witness-script-hash (P2WSH) [`Address`] from a witness script hash.
    fn p2wsh_from_hash(hash: WScriptHash, hrp: impl Into<KnownHrp>) -> Self;

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] that embeds a P2WSH.
    fn p2shwsh(
        witness_script: &WitnessScript,
        network: impl Into<NetworkKind>,
    ) -> Result<Self, WitnessScriptSizeError>;

    /// Constructs a new [`Address`] from an output script (`scriptPubkey`).
    fn from_script(
        script: &ScriptPubKey,
        params: impl AsRef<Network>,
    ) -> Result<Self, FromScriptError>;

    /// Generates a script pubkey spending to this address.
    fn script_pubkey(&self) -> ScriptPubKeyBuf;

    /// Returns true if the address creates a particular script.
    fn matches_script_pubkey(&self, script: &ScriptPubKey) -> bool;
}

impl AddressScriptExt for Address {
    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] from a script.
    ///
    /// This address type was introduced with BIP-0016 and is the popular type to implement multi-sig
    /// these days.
    fn p2sh<T: ScriptHashableTag>(
        redeem_script: &Script<T>,
        network: impl Into<NetworkKind>,
    ) -> Result<Self, RedeemScriptSizeError> {
        let hash = redeem_script.script_hash()?;
        Ok(Self::p2sh_from_hash(hash, network))
    }

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] from a script hash.
    ///
    /// # Warning
    ///
    /// The `hash` pre-image (redeem script) must not exceed 520 bytes in length
    /// otherwise outputs created from the returned address will be un-spendable.
    fn p2sh_from_hash(hash: ScriptHash, network: impl Into<NetworkKind>) -> Self {
        Self::p2sh_from_hash(hash, network)
    }

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] that embeds a
    /// pay-to-witness-public-key-hash (P2WPKH).
    ///
    /// This is a SegWit address type that looks familiar (as p2sh) to legacy clients.
    fn p2shwpkh(pk: CompressedPublicKey, network: impl Into<NetworkKind>) -> Self {
        let builder = ScriptPubKey::builder().push_int_unchecked(0).push_slice(pk.wpubkey_hash());
        let script_hash = builder.as_script().script_hash().expect("script is less than 520 bytes");
        Self::p2sh_from_hash(script_hash, network)
    }

    /// Constructs a new pay-to-witness-script-hash (P2WSH) [`Address`] from a witness script.
    fn p2wsh(
        witness_script: &WitnessScript,
        hrp: impl Into<KnownHrp>,
    ) -> Result<Self, WitnessScriptSizeError> {
        let program = WitnessProgram::p2wsh(witness_script)?;
        Ok(Self::from_witness_program(program, hrp))
    }

    /// Constructs a new pay-to-witness-script-hash (P2WSH) [`Address`] from a witness script hash.
    fn p2wsh_from_hash(hash: WScriptHash, hrp: impl Into<KnownHrp>) -> Self {
        let program = WitnessProgram::p2wsh_from_hash(hash);
        Self::from_witness_program(program, hrp)
    }

    /// Constructs a new pay-to-script-hash (P2SH) [`Address`] that embeds a
    /// pay-to-witness-script-hash (P2WSH).
    ///
    /// This is a SegWit address type that looks familiar (as p2sh) to legacy clients.
    fn p2shwsh(
        witness_script: &WitnessScript,
        network: impl Into<NetworkKind>,
    ) -> Result<Self, WitnessScriptSizeError> {
        let hash = witness_script.wscript_hash()?;
        let builder = ScriptPubKey::builder().push_int_unchecked(0).push_slice(hash);
        let script_hash = builder.as_script().script_hash().expect("script is less than 520 bytes");
        Ok(Self::p2sh_from_hash(script_hash, network))
    }

    /// Constructs a new [`Address`] from an output script (`scriptPubkey`).
    fn from_script(
        script: &ScriptPubKey,
        network: impl AsRef<Network>,
    ) -> Result<Self, FromScriptError> {
        let network = *AsRef::<Network>::as_ref(&network);
        if script.is_p2pkh() {
            let bytes = script.as_bytes()[3..23].try_into().expect("statically 20B long");
            let hash = PubkeyHash::from_byte_array(bytes);
            Ok(Self::p2pkh(hash, network))
        } else if script.is_p2sh() {
            let bytes = script.as_bytes()[2..22].try_into().expect("statically 20B long");
            let hash = ScriptHash::from_byte_array(bytes);
            Ok(Self::p2sh_from_hash(hash, network))
        } else if script.is_witness_program() {
            let opcode = script.first_opcode().expect("is_witness_program guarantees len > 4");

            let version = WitnessVersion::try_from(opcode)?;
            let program = WitnessProgram::new(version, &script.as_bytes()[2..])?;
            Ok(Self::from_witness_program(program, network))
        } else {
            Err(FromScriptError::UnrecognizedScript)
        }
    }

    /// Generates a script pubkey spending to this address.
    fn script_pubkey(&self) -> ScriptPubKeyBuf {
        if let Some(hash) = self.pubkey_hash() {
            ScriptPubKeyBuf::new_p2pkh(hash)
        } else if let Some(hash) = self.script_hash() {
            ScriptPubKeyBuf::new_p2sh(hash)
        } else if let Some(program) = self.witness_program() {
            let prog = script::witness_program::WitnessProgramExt::program(&program);
            let version = program.version();
            script::new_witness_program_unchecked(version, prog)
        } else {
            unreachable!("Address must be either P2PKH, P2SH, or SegWit")
        }
    }

    /// Returns true if the address creates a particular script
    /// This function doesn't make any allocations.
    fn matches_script_pubkey(&self, script: &ScriptPubKey) -> bool {
        if let Some(hash) = self.pubkey_hash() {
            script.is_p2pkh()
                && &script.as_bytes()[3..23] == <PubkeyHash as AsRef<[u8; 20]>>::as_ref(&hash)
        } else if let Some(hash) = self.script_hash() {
            script.is_p2sh()
                && &script.as_bytes()[2..22] == <ScriptHash as AsRef<[u8; 20]>>::as_ref(&hash)
        } else if let Some(program) = self.witness_program() {
            script.is_witness_program() && &script.as_bytes()[2..] == program.program()
        } else {
            false
        }
    }
}
