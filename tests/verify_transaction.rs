// SPDX-License-Identifier: CC0-1.0

//! End-to-end transaction verification: a pay-to-pubkey interpreter drives
//! the signature-hash routine and the ECDSA engine through the verifier.

use std::collections::HashMap;

use bitcoinkit::consensus::{verify_transaction, verify_transaction_inputs, TxVerifyError};
use bitcoinkit::ecdsa::{self, DigestOrder, Signature};
use bitcoinkit::hashes::Hash;
use bitcoinkit::{
    EcdsaSighashType, OutPoint, PrivateKey, PublicKey, Script, ScriptVerifier, Transaction, TxIn,
    TxOut,
};

const OP_CHECKSIG: u8 = 0xac;

/// A minimal pay-to-pubkey interpreter.
///
/// Understands exactly one script template: a scriptPubKey pushing a 33-byte
/// key followed by OP_CHECKSIG, satisfied by a scriptSig pushing a DER
/// signature with a trailing sighash byte.
struct P2pkInterpreter;

impl ScriptVerifier for P2pkInterpreter {
    fn verify(
        &mut self,
        script_sig: &Script,
        script_pubkey: &Script,
        tx: &Transaction,
        input_index: usize,
        _flags: u32,
    ) -> bool {
        let spk = script_pubkey.as_bytes();
        if spk.len() != 35 || spk[0] != 33 || spk[34] != OP_CHECKSIG {
            return false;
        }
        let pk = match PublicKey::from_slice(&spk[1..34]) {
            Ok(pk) => pk,
            Err(_) => return false,
        };

        let ss = script_sig.as_bytes();
        if ss.is_empty() || ss[0] as usize != ss.len() - 1 {
            return false;
        }
        let (sighash_byte, der) = match ss[1..].split_last() {
            Some(split) => split,
            None => return false,
        };
        let sig = match Signature::from_der(der) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let digest = tx.signature_hash(input_index, script_pubkey, *sighash_byte as u32);
        ecdsa::verify_with_order(&digest.into_inner(), &sig, &pk, DigestOrder::LittleEndian)
    }
}

fn p2pk_script(pk: &PublicKey) -> Script {
    let mut bytes = Vec::with_capacity(35);
    bytes.push(33);
    bytes.extend_from_slice(&pk.serialize());
    bytes.push(OP_CHECKSIG);
    Script::from(bytes)
}

fn push_signature(sig: &Signature, sighash_type: EcdsaSighashType) -> Script {
    let mut data = sig.serialize_der();
    data.push(sighash_type.to_u32() as u8);
    let mut bytes = Vec::with_capacity(data.len() + 1);
    bytes.push(data.len() as u8);
    bytes.extend_from_slice(&data);
    Script::from(bytes)
}

fn keys() -> (PrivateKey, PublicKey) {
    let sk = PrivateKey::from_slice(&[0x11u8; 32], true).unwrap();
    let pk = sk.public_key();
    (sk, pk)
}

/// A coinbase transaction funding a single pay-to-pubkey output.
fn funding_tx(pk: &PublicKey) -> Transaction {
    Transaction {
        version: 1,
        lock_time: 0,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig: Script::from(vec![0x01, 0x02]),
            sequence: 0xffffffff,
        }],
        output: vec![TxOut { value: 50 * 100_000_000, script_pubkey: p2pk_script(pk) }],
    }
}

/// An unsigned transaction spending the funding output.
fn spending_tx(funding: &Transaction, pk: &PublicKey) -> Transaction {
    Transaction {
        version: 1,
        lock_time: 0,
        input: vec![TxIn {
            previous_output: OutPoint::new(funding.txid(), 0),
            script_sig: Script::new(),
            sequence: 0xffffffff,
        }],
        output: vec![TxOut { value: 49 * 100_000_000, script_pubkey: p2pk_script(pk) }],
    }
}

fn sign_input(tx: &mut Transaction, input_index: usize, prevout_script: &Script, sk: &PrivateKey) {
    let sighash_type = EcdsaSighashType::All;
    let digest = tx.signature_hash(input_index, prevout_script, sighash_type.to_u32());
    let sig =
        ecdsa::sign_with_order(&digest.into_inner(), sk, DigestOrder::LittleEndian).unwrap();
    tx.input[input_index].script_sig = push_signature(&sig, sighash_type);
}

#[test]
fn verify_signed_transaction() {
    let (sk, pk) = keys();
    let funding = funding_tx(&pk);
    assert!(funding.is_coin_base());
    assert_eq!(funding.check(), Ok(()));

    let mut spending = spending_tx(&funding, &pk);
    sign_input(&mut spending, 0, &funding.output[0].script_pubkey, &sk);
    assert_eq!(spending.check(), Ok(()));

    let mut utxos = HashMap::new();
    utxos.insert(spending.input[0].previous_output, funding.output[0].clone());
    let spent = |p: &OutPoint| utxos.get(p).cloned();

    assert!(verify_transaction(&spending, spent, 0, &mut P2pkInterpreter));
    assert!(spending.verify(spent, 0, &mut P2pkInterpreter));
}

#[test]
fn corrupted_signature_fails_script_verify() {
    let (sk, pk) = keys();
    let funding = funding_tx(&pk);
    let mut spending = spending_tx(&funding, &pk);
    sign_input(&mut spending, 0, &funding.output[0].script_pubkey, &sk);

    // flip one byte inside the DER signature
    let mut script_bytes = spending.input[0].script_sig.to_bytes();
    script_bytes[10] ^= 0x01;
    spending.input[0].script_sig = Script::from(script_bytes);

    let mut utxos = HashMap::new();
    utxos.insert(spending.input[0].previous_output, funding.output[0].clone());
    let spent = |p: &OutPoint| utxos.get(p).cloned();

    let err = verify_transaction_inputs(&spending, spent, 0, &mut P2pkInterpreter).unwrap_err();
    assert_eq!(err, TxVerifyError::InputScriptFailure { index: 0 });
    assert_eq!(err.to_string(), "input 0 failed script verify");
    assert!(!verify_transaction(&spending, spent, 0, &mut P2pkInterpreter));
}

#[test]
fn signature_by_wrong_key_fails() {
    let (_, pk) = keys();
    let other_sk = PrivateKey::from_slice(&[0x22u8; 32], true).unwrap();

    let funding = funding_tx(&pk);
    let mut spending = spending_tx(&funding, &pk);
    sign_input(&mut spending, 0, &funding.output[0].script_pubkey, &other_sk);

    let mut utxos = HashMap::new();
    utxos.insert(spending.input[0].previous_output, funding.output[0].clone());
    let spent = |p: &OutPoint| utxos.get(p).cloned();

    assert!(!verify_transaction(&spending, spent, 0, &mut P2pkInterpreter));
}

#[test]
fn missing_utxo_is_fatal() {
    let (sk, pk) = keys();
    let funding = funding_tx(&pk);
    let mut spending = spending_tx(&funding, &pk);
    sign_input(&mut spending, 0, &funding.output[0].script_pubkey, &sk);

    let empty = |_: &OutPoint| None;
    let err = verify_transaction_inputs(&spending, empty, 0, &mut P2pkInterpreter).unwrap_err();
    assert_eq!(err, TxVerifyError::UnknownSpentOutput(spending.input[0].previous_output));
    assert!(!verify_transaction(&spending, empty, 0, &mut P2pkInterpreter));
}

#[test]
fn duplicated_input_fails_sanity_checks() {
    let (sk, pk) = keys();
    let funding = funding_tx(&pk);
    let mut spending = spending_tx(&funding, &pk);
    sign_input(&mut spending, 0, &funding.output[0].script_pubkey, &sk);

    // re-use of the same outpoint must fail even though each script verifies
    let duplicate = spending.input[0].clone();
    spending.input.push(duplicate);

    let mut utxos = HashMap::new();
    utxos.insert(spending.input[0].previous_output, funding.output[0].clone());
    let spent = |p: &OutPoint| utxos.get(p).cloned();

    assert!(spending.check().is_err());
    assert!(!verify_transaction(&spending, spent, 0, &mut P2pkInterpreter));
}
