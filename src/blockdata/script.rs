// SPDX-License-Identifier: CC0-1.0

//! Bitcoin scripts.
//!
//! At this layer a script is an opaque byte buffer: the verifier hands
//! scriptSig/scriptPubKey pairs to an external interpreter through the
//! [`ScriptVerifier`] trait and never inspects opcodes itself.

use std::io;
use std::str::FromStr;
use std::{fmt, ops};

use crate::blockdata::transaction::Transaction;
use crate::consensus::encode::{self, Decodable, Encodable};
use crate::hashes::hex::{self, FromHex};

/// A Bitcoin script.
#[derive(Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Script(Box<[u8]>);

impl Script {
    /// Creates a new empty script.
    pub fn new() -> Script { Script(vec![].into_boxed_slice()) }

    /// The length in bytes of the script.
    pub fn len(&self) -> usize { self.0.len() }

    /// Whether the script is the empty script.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns the script data as a byte slice.
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Returns a copy of the script data.
    pub fn to_bytes(&self) -> Vec<u8> { self.0.clone().into_vec() }
}

impl From<Vec<u8>> for Script {
    fn from(v: Vec<u8>) -> Script { Script(v.into_boxed_slice()) }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl ops::Index<usize> for Script {
    type Output = u8;
    fn index(&self, index: usize) -> &u8 { &self.0[index] }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Script(")?;
        fmt::LowerHex::fmt(self, f)?;
        f.write_str(")")
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::LowerHex::fmt(self, f) }
}

impl fmt::LowerHex for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { hex::format_hex(&self.0, f) }
}

impl FromStr for Script {
    type Err = hex::Error;
    fn from_str(s: &str) -> Result<Script, hex::Error> {
        Ok(Script::from(Vec::from_hex(s)?))
    }
}

#[cfg(feature = "serde")]
serde_string_impl!(Script, "a hex-encoded script");

impl Encodable for Script {
    #[inline]
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        self.0.consensus_encode(w)
    }
}

impl Decodable for Script {
    #[inline]
    fn consensus_decode_from_finite_reader<R: io::Read + ?Sized>(
        r: &mut R,
    ) -> Result<Self, encode::Error> {
        Ok(Script(Decodable::consensus_decode_from_finite_reader(r)?))
    }
}

/// The contract between the transaction verifier and a script interpreter.
///
/// Given a scriptSig and the scriptPubKey it attempts to satisfy, an
/// implementation executes both under `flags` and reports validity. The
/// enclosing transaction and the input index are provided because signature
/// operations hash a modified form of the transaction; an interpreter
/// typically calls back into [`Transaction::signature_hash`] and the ECDSA
/// engine, but the verifier does not prescribe how.
///
/// `flags` is an opaque bitfield defined by the interpreter and passed
/// through unchanged.
pub trait ScriptVerifier {
    /// Evaluates `script_sig` against `script_pubkey` for the given input.
    fn verify(
        &mut self,
        script_sig: &Script,
        script_pubkey: &Script,
        tx: &Transaction,
        input_index: usize,
        flags: u32,
    ) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::encode::{deserialize, serialize};

    #[test]
    fn script_hex_round_trip() {
        let script = Script::from_str("76a91416e1ae70ff0fa102905d4af297f6912bda6cce1988ac").unwrap();
        assert_eq!(script.len(), 25);
        assert_eq!(script.to_string(), "76a91416e1ae70ff0fa102905d4af297f6912bda6cce1988ac");
        assert_eq!(Script::from_str(&script.to_string()).unwrap(), script);
    }

    #[test]
    fn script_consensus_encoding() {
        let script = Script::from(vec![0x69u8, 0x42]);
        assert_eq!(serialize(&script), [2u8, 0x69, 0x42]);
        assert_eq!(deserialize::<Script>(&[2u8, 0x69, 0x42]).unwrap(), script);

        let empty = Script::new();
        assert_eq!(serialize(&empty), [0u8]);
        assert!(deserialize::<Script>(&[0u8]).unwrap().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn script_serde_is_hex() {
        let script = Script::from(vec![0x51u8]);
        assert_eq!(serde_json::to_string(&script).unwrap(), "\"51\"");
        let back: Script = serde_json::from_str("\"51\"").unwrap();
        assert_eq!(back, script);
    }
}
