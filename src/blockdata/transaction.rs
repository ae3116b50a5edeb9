// SPDX-License-Identifier: CC0-1.0

//! Bitcoin transactions.
//!
//! A transaction describes a transfer of money. It consumes previously-unspent
//! transaction outputs and produces new ones, satisfying the condition to
//! spend the old outputs (typically a digital signature with a specific key
//! must be provided) and defining the condition to spend the new ones.
//!
//! This module provides the structures and functions needed to support
//! transactions, including the legacy signature-hash algorithm with its
//! consensus-critical SIGHASH_SINGLE quirk.

use std::{fmt, io};

use crate::blockdata::script::Script;
use crate::consensus::encode::Encodable;
use crate::hash_types::{Sighash, Txid};
use crate::hashes::{sha256d, Hash};

/// A reference to a transaction output.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct OutPoint {
    /// The referenced transaction's txid.
    pub txid: Txid,
    /// The index of the referenced output in its transaction's vout.
    pub vout: u32,
}

impl OutPoint {
    /// Creates a new [`OutPoint`].
    #[inline]
    pub fn new(txid: Txid, vout: u32) -> OutPoint { OutPoint { txid, vout } }

    /// Creates a "null" `OutPoint`.
    ///
    /// This value is used for coinbase transactions because they don't have
    /// any previous outputs.
    #[inline]
    pub fn null() -> OutPoint { OutPoint { txid: Txid::all_zeros(), vout: u32::MAX } }

    /// Checks if an `OutPoint` is "null".
    #[inline]
    pub fn is_null(&self) -> bool { *self == OutPoint::null() }
}

impl Default for OutPoint {
    fn default() -> Self { OutPoint::null() }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

impl_consensus_encoding!(OutPoint, txid, vout);

/// Bitcoin transaction input.
///
/// It contains the location of the previous transaction's output that it
/// spends and the script that satisfies its spending conditions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxIn {
    /// The reference to the previous output that is being used as an input.
    pub previous_output: OutPoint,
    /// The script which pushes values on the stack which will cause
    /// the referenced output's script to be accepted.
    pub script_sig: Script,
    /// The sequence number, which suggests to miners which of two
    /// conflicting transactions should be preferred, or 0xFFFFFFFF
    /// to ignore this feature. This is generally never used since
    /// the miner behaviour cannot be enforced.
    pub sequence: u32,
}

impl TxIn {
    /// Whether this input spends the synthetic null outpoint.
    ///
    /// Only the single input of a coinbase transaction may do so.
    pub fn has_null_outpoint(&self) -> bool { self.previous_output.is_null() }
}

impl Default for TxIn {
    fn default() -> TxIn {
        TxIn {
            previous_output: OutPoint::default(),
            script_sig: Script::new(),
            sequence: u32::MAX,
        }
    }
}

impl_consensus_encoding!(TxIn, previous_output, script_sig, sequence);

/// Bitcoin transaction output.
///
/// Defines new coins to be created as a result of the transaction, along with
/// spending conditions ("script", aka "output script"), which an input
/// spending it must satisfy.
///
/// An output that is not yet spent by an input is called Unspent Transaction
/// Output ("UTXO").
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct TxOut {
    /// The value of the output, in satoshis.
    ///
    /// Signed, as in the reference implementation: a decoded transaction may
    /// carry a negative value and must be rejected by the sanity checks.
    pub value: i64,
    /// The script which must be satisfied for the output to be spent.
    pub script_pubkey: Script,
}

// This is used as a "null txout" in consensus signing code.
impl Default for TxOut {
    fn default() -> TxOut { TxOut { value: -1, script_pubkey: Script::new() } }
}

impl_consensus_encoding!(TxOut, value, script_pubkey);

/// Bitcoin transaction.
///
/// An authenticated movement of coins, serialized in the pre-segwit format:
/// version, inputs, outputs, lock time.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "actual_serde"))]
pub struct Transaction {
    /// The protocol version, is currently expected to be 1 or 2 (BIP 68).
    pub version: i32,
    /// Block height or timestamp. Transaction cannot be included in a block
    /// until this height/time.
    pub lock_time: u32,
    /// List of transaction inputs.
    pub input: Vec<TxIn>,
    /// List of transaction outputs.
    pub output: Vec<TxOut>,
}

impl_consensus_encoding!(Transaction, version, input, output, lock_time);

impl Transaction {
    /// Computes the txid.
    ///
    /// This is the double SHA256 of the consensus serialization, displayed
    /// in reverse byte order.
    pub fn txid(&self) -> Txid {
        let mut enc = Txid::engine();
        self.consensus_encode(&mut enc).expect("engines don't error");
        Txid::from_engine(enc)
    }

    /// Computes a "normalized TXID" which does not include any signatures.
    ///
    /// This gives a way to identify a transaction that is "the same" as
    /// another in the sense of having the same inputs and outputs.
    pub fn ntxid(&self) -> sha256d::Hash {
        let cloned_tx = Transaction {
            version: self.version,
            lock_time: self.lock_time,
            input: self
                .input
                .iter()
                .map(|txin| TxIn { script_sig: Script::new(), ..txin.clone() })
                .collect(),
            output: self.output.clone(),
        };
        cloned_tx.txid().as_hash()
    }

    /// Returns the regular byte-wise consensus-serialized size of this
    /// transaction.
    pub fn size(&self) -> usize {
        let mut sink = io::sink();
        self.consensus_encode(&mut sink).expect("sinks don't error")
    }

    /// Is this a coin base transaction?
    pub fn is_coin_base(&self) -> bool {
        self.input.len() == 1 && self.input[0].previous_output.is_null()
    }

    /// Computes the legacy signature hash for the input at `input_index`,
    /// signing the scripts selected by `sighash_u32` with `script_pubkey`
    /// substituted for the input's scriptSig.
    ///
    /// This function correctly handles the SIGHASH_SINGLE bug by returning
    /// the "one array": when the sighash type is `SIGHASH_SINGLE` and
    /// `input_index` has no corresponding output, the digest is the
    /// little-endian value 1 rather than a hash. Verification relies on this
    /// bit-exactness.
    ///
    /// Does NOT attempt to support OP_CODESEPARATOR; determining which
    /// separators get evaluated would require executing `script_pubkey`.
    ///
    /// # Panics
    ///
    /// If `input_index` is out of bounds (greater than or equal to
    /// `self.input.len()`).
    pub fn signature_hash(
        &self,
        input_index: usize,
        script_pubkey: &Script,
        sighash_u32: u32,
    ) -> Sighash {
        assert!(input_index < self.input.len()); // Panic on OOB

        if is_invalid_use_of_sighash_single(sighash_u32, input_index, self.output.len()) {
            return Sighash::from_inner(UINT256_ONE);
        }

        let mut enc = Sighash::engine();
        self.encode_signing_data_to(&mut enc, input_index, script_pubkey, sighash_u32)
            .expect("engines don't error");
        Sighash::from_engine(enc)
    }

    /// Encodes the signing data from which a signature hash for a given
    /// input index with a given sighash flag can be computed.
    fn encode_signing_data_to<W: io::Write>(
        &self,
        mut writer: W,
        input_index: usize,
        script_pubkey: &Script,
        sighash_u32: u32,
    ) -> Result<(), io::Error> {
        let (sighash, anyone_can_pay) =
            EcdsaSighashType::from_consensus(sighash_u32).split_anyonecanpay_flag();

        // Build tx to sign
        let mut tx = Transaction {
            version: self.version,
            lock_time: self.lock_time,
            input: vec![],
            output: vec![],
        };
        // Add all inputs necessary..
        if anyone_can_pay {
            tx.input = vec![TxIn {
                previous_output: self.input[input_index].previous_output,
                script_sig: script_pubkey.clone(),
                sequence: self.input[input_index].sequence,
            }];
        } else {
            tx.input = Vec::with_capacity(self.input.len());
            for (n, input) in self.input.iter().enumerate() {
                tx.input.push(TxIn {
                    previous_output: input.previous_output,
                    script_sig: if n == input_index {
                        script_pubkey.clone()
                    } else {
                        Script::new()
                    },
                    sequence: if n != input_index
                        && (sighash == EcdsaSighashType::Single
                            || sighash == EcdsaSighashType::None)
                    {
                        0
                    } else {
                        input.sequence
                    },
                });
            }
        }
        // ..then all outputs
        tx.output = match sighash {
            EcdsaSighashType::All => self.output.clone(),
            EcdsaSighashType::Single => {
                let output_iter = self
                    .output
                    .iter()
                    .take(input_index + 1) // sign all outputs up to and including this one, but erase
                    .enumerate() // all of them except for this one
                    .map(|(n, out)| if n == input_index { out.clone() } else { TxOut::default() });
                output_iter.collect()
            }
            EcdsaSighashType::None => vec![],
            _ => unreachable!("split_anyonecanpay_flag returns the base type"),
        };
        // hash the result
        tx.consensus_encode(&mut writer)?;
        sighash_u32.consensus_encode(&mut writer)?;
        Ok(())
    }
}

/// The digest produced for the SIGHASH_SINGLE bug case: the number one, in
/// the 32-byte little-endian form the reference implementation hashes.
const UINT256_ONE: [u8; 32] = [
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

fn is_invalid_use_of_sighash_single(sighash: u32, input_index: usize, output_len: usize) -> bool {
    let ty = EcdsaSighashType::from_consensus(sighash);
    (ty == EcdsaSighashType::Single || ty == EcdsaSighashType::SinglePlusAnyoneCanPay)
        && input_index >= output_len
}

/// Hashtype of an input's signature, encoded in the last byte of the
/// signature.
///
/// Fixed values so they can be cast as integer types for encoding.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum EcdsaSighashType {
    /// 0x1: Sign all outputs.
    All = 0x01,
    /// 0x2: Sign no outputs --- anyone can choose the destination.
    None = 0x02,
    /// 0x3: Sign the output whose index matches this input's index. If none
    /// exists, sign the hash
    /// `0000000000000000000000000000000000000000000000000000000000000001`.
    /// (This rule is probably an unintentional C++ism, but it's consensus so
    /// we have to follow it.)
    Single = 0x03,
    /// 0x81: Sign all outputs but only this input.
    AllPlusAnyoneCanPay = 0x81,
    /// 0x82: Sign no outputs and only this input.
    NonePlusAnyoneCanPay = 0x82,
    /// 0x83: Sign one output and only this input (see `Single` for what "one
    /// output" means).
    SinglePlusAnyoneCanPay = 0x83,
}

impl fmt::Display for EcdsaSighashType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EcdsaSighashType::*;

        let s = match self {
            All => "SIGHASH_ALL",
            None => "SIGHASH_NONE",
            Single => "SIGHASH_SINGLE",
            AllPlusAnyoneCanPay => "SIGHASH_ALL|SIGHASH_ANYONECANPAY",
            NonePlusAnyoneCanPay => "SIGHASH_NONE|SIGHASH_ANYONECANPAY",
            SinglePlusAnyoneCanPay => "SIGHASH_SINGLE|SIGHASH_ANYONECANPAY",
        };
        f.write_str(s)
    }
}

impl EcdsaSighashType {
    /// Splits the sighash flag into the "real" sighash flag and the
    /// ANYONECANPAY boolean.
    pub(crate) fn split_anyonecanpay_flag(self) -> (EcdsaSighashType, bool) {
        use EcdsaSighashType::*;

        match self {
            All => (All, false),
            None => (None, false),
            Single => (Single, false),
            AllPlusAnyoneCanPay => (All, true),
            NonePlusAnyoneCanPay => (None, true),
            SinglePlusAnyoneCanPay => (Single, true),
        }
    }

    /// Creates an [`EcdsaSighashType`] from an arbitrary `u32`, as consensus
    /// code does.
    ///
    /// The reference implementation masks with 0x1f when checking for SINGLE
    /// and NONE bits, treating every unrecognized base value as ALL; the
    /// ANYONECANPAY bit is honored independently.
    pub fn from_consensus(n: u32) -> EcdsaSighashType {
        use EcdsaSighashType::*;

        let mask = 0x1f | 0x80;
        match n & mask {
            // "real" sighashes
            0x01 => All,
            0x02 => None,
            0x03 => Single,
            0x81 => AllPlusAnyoneCanPay,
            0x82 => NonePlusAnyoneCanPay,
            0x83 => SinglePlusAnyoneCanPay,
            // catchalls
            x if x & 0x80 == 0x80 => AllPlusAnyoneCanPay,
            _ => All,
        }
    }

    /// Creates an [`EcdsaSighashType`] from a raw `u32`, rejecting
    /// non-standard values.
    pub fn from_standard(n: u32) -> Result<EcdsaSighashType, NonStandardSighashType> {
        use EcdsaSighashType::*;

        match n {
            0x01 => Ok(All),
            0x02 => Ok(None),
            0x03 => Ok(Single),
            0x81 => Ok(AllPlusAnyoneCanPay),
            0x82 => Ok(NonePlusAnyoneCanPay),
            0x83 => Ok(SinglePlusAnyoneCanPay),
            non_standard => Err(NonStandardSighashType(non_standard)),
        }
    }

    /// Converts to a `u32` sighash flag.
    pub fn to_u32(self) -> u32 { self as u32 }
}

/// This type is consensus valid but an input including it would prevent the
/// transaction from being relayed on today's Bitcoin network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonStandardSighashType(pub u32);

impl fmt::Display for NonStandardSighashType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "non-standard sighash type {}", self.0)
    }
}

impl std::error::Error for NonStandardSighashType {}
