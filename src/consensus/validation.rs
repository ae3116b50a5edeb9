// SPDX-License-Identifier: CC0-1.0

//! Transaction validation.
//!
//! Context-free sanity checks plus per-input script verification driven
//! through an external [`ScriptVerifier`]. The two passes report typed
//! diagnostics; [`verify_transaction`] collapses them into a boolean.
//!
//! Validation never panics or raises: an invalid transaction is a result,
//! not an error condition.

use std::collections::HashSet;
use std::{error, fmt};

use crate::blockdata::constants::{
    MAX_BLOCK_SIZE, MAX_COINBASE_SCRIPT_LEN, MAX_MONEY, MIN_COINBASE_SCRIPT_LEN,
};
use crate::blockdata::script::ScriptVerifier;
use crate::blockdata::transaction::{OutPoint, Transaction, TxOut};

/// A context-free check failure.
///
/// The `Display` form is the user-facing diagnostic string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TxCheckError {
    /// The transaction has no inputs.
    EmptyInputs,
    /// The transaction has no outputs.
    EmptyOutputs,
    /// The serialized transaction exceeds the maximum block size.
    OversizedTransaction {
        /// The serialized size in bytes.
        size: usize,
    },
    /// An output carries a negative value.
    NegativeOutput {
        /// The offending output index.
        index: usize,
    },
    /// An output value exceeds MAX_MONEY.
    OutputTooLarge {
        /// The offending output index.
        index: usize,
    },
    /// The running output total exceeds MAX_MONEY.
    TotalOutputTooLarge {
        /// The output index at which the total overflowed.
        index: usize,
    },
    /// Two inputs spend the same outpoint.
    DuplicateInput {
        /// The index of the second occurrence.
        index: usize,
    },
    /// A coinbase input script is outside the 2..=100 byte bounds.
    CoinbaseScriptSize {
        /// The actual script length.
        len: usize,
    },
    /// A non-coinbase input spends the synthetic null outpoint.
    NullInput {
        /// The offending input index.
        index: usize,
    },
}

impl fmt::Display for TxCheckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TxCheckError::*;

        match *self {
            EmptyInputs => write!(f, "transaction txins empty"),
            EmptyOutputs => write!(f, "transaction txouts empty"),
            OversizedTransaction { .. } => write!(f, "transaction over the maximum block size"),
            NegativeOutput { index } => write!(f, "transaction txout {} negative", index),
            OutputTooLarge { index } => {
                write!(f, "transaction txout {} greater than MAX_MONEY", index)
            }
            TotalOutputTooLarge { index } => {
                write!(f, "transaction txout {} total output greater than MAX_MONEY", index)
            }
            DuplicateInput { index } => write!(f, "transaction input {} duplicate input", index),
            CoinbaseScriptSize { .. } => write!(f, "coinbase transaction script size invalid"),
            NullInput { index } => write!(f, "transaction input {} has null input", index),
        }
    }
}

impl error::Error for TxCheckError {}

/// A per-input verification failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TxVerifyError {
    /// The referenced previous output is not in the UTXO lookup.
    UnknownSpentOutput(OutPoint),
    /// The script interpreter rejected an input.
    InputScriptFailure {
        /// The lowest failing input index.
        index: usize,
    },
}

impl fmt::Display for TxVerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TxVerifyError::UnknownSpentOutput(ref p) => write!(f, "unknown spent output: {}", p),
            TxVerifyError::InputScriptFailure { index } => {
                write!(f, "input {} failed script verify", index)
            }
        }
    }
}

impl error::Error for TxVerifyError {}

/// Runs the context-free sanity checks on a transaction.
///
/// Checks are applied in a fixed order and the first violation is returned:
/// empty inputs, empty outputs, oversized serialization, per-output value
/// bounds, duplicate inputs, and the coinbase/null-input rules.
pub fn check_transaction(tx: &Transaction) -> Result<(), TxCheckError> {
    use TxCheckError::*;

    if tx.input.is_empty() {
        return Err(EmptyInputs);
    }
    if tx.output.is_empty() {
        return Err(EmptyOutputs);
    }

    let size = tx.size();
    if size > MAX_BLOCK_SIZE {
        return Err(OversizedTransaction { size });
    }

    let mut total: i64 = 0;
    for (index, output) in tx.output.iter().enumerate() {
        if output.value < 0 {
            return Err(NegativeOutput { index });
        }
        if output.value > MAX_MONEY {
            return Err(OutputTooLarge { index });
        }
        // Bounded by the two checks above, so this cannot overflow.
        total += output.value;
        if total > MAX_MONEY {
            return Err(TotalOutputTooLarge { index });
        }
    }

    let mut spent_outpoints = HashSet::with_capacity(tx.input.len());
    for (index, input) in tx.input.iter().enumerate() {
        if !spent_outpoints.insert(input.previous_output) {
            return Err(DuplicateInput { index });
        }
    }

    if tx.is_coin_base() {
        let len = tx.input[0].script_sig.len();
        if !(MIN_COINBASE_SCRIPT_LEN..=MAX_COINBASE_SCRIPT_LEN).contains(&len) {
            return Err(CoinbaseScriptSize { len });
        }
    } else {
        for (index, input) in tx.input.iter().enumerate() {
            if input.has_null_outpoint() {
                return Err(NullInput { index });
            }
        }
    }

    Ok(())
}

/// Verifies every input's script against the output it spends.
///
/// Inputs are processed in ascending index order and the first failure is
/// reported. `spent` is the read-only UTXO lookup; a missing entry fails
/// verification. The `flags` bitfield is passed through to the interpreter
/// unchanged.
pub fn verify_transaction_inputs<S, V>(
    tx: &Transaction,
    mut spent: S,
    flags: u32,
    interpreter: &mut V,
) -> Result<(), TxVerifyError>
where
    S: FnMut(&OutPoint) -> Option<TxOut>,
    V: ScriptVerifier,
{
    for (index, input) in tx.input.iter().enumerate() {
        let prevout = spent(&input.previous_output)
            .ok_or(TxVerifyError::UnknownSpentOutput(input.previous_output))?;
        if !interpreter.verify(&input.script_sig, &prevout.script_pubkey, tx, index, flags) {
            return Err(TxVerifyError::InputScriptFailure { index });
        }
    }
    Ok(())
}

/// Verifies that this transaction is able to spend its inputs.
///
/// True iff both the context-free checks and every input's script
/// verification succeed. The `spent` closure should not return the same
/// [`TxOut`] twice!
pub fn verify_transaction<S, V>(
    tx: &Transaction,
    spent: S,
    flags: u32,
    interpreter: &mut V,
) -> bool
where
    S: FnMut(&OutPoint) -> Option<TxOut>,
    V: ScriptVerifier,
{
    check_transaction(tx).is_ok()
        && verify_transaction_inputs(tx, spent, flags, interpreter).is_ok()
}

impl Transaction {
    /// Runs the context-free sanity checks, see [`check_transaction`].
    pub fn check(&self) -> Result<(), TxCheckError> { check_transaction(self) }

    /// Verifies that this transaction is able to spend its inputs, see
    /// [`verify_transaction`].
    pub fn verify<S, V>(&self, spent: S, flags: u32, interpreter: &mut V) -> bool
    where
        S: FnMut(&OutPoint) -> Option<TxOut>,
        V: ScriptVerifier,
    {
        verify_transaction(self, spent, flags, interpreter)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::blockdata::script::Script;
    use crate::blockdata::transaction::TxIn;
    use crate::hash_types::Txid;
    use crate::hashes::Hash;

    fn dummy_txid(tag: u8) -> Txid { Txid::from_inner([tag; 32]) }

    fn simple_tx() -> Transaction {
        Transaction {
            version: 1,
            lock_time: 0,
            input: vec![
                TxIn {
                    previous_output: OutPoint::new(dummy_txid(1), 0),
                    script_sig: Script::from(vec![0x51]),
                    sequence: 0xffffffff,
                },
                TxIn {
                    previous_output: OutPoint::new(dummy_txid(1), 1),
                    script_sig: Script::from(vec![0x51]),
                    sequence: 0xffffffff,
                },
            ],
            output: vec![
                TxOut { value: 40_000, script_pubkey: Script::from(vec![0x51]) },
                TxOut { value: 10_000, script_pubkey: Script::from(vec![0x52]) },
            ],
        }
    }

    struct Fixed(bool);
    impl ScriptVerifier for Fixed {
        fn verify(&mut self, _: &Script, _: &Script, _: &Transaction, _: usize, _: u32) -> bool {
            self.0
        }
    }

    /// Fails exactly the given input index.
    struct FailAt(usize);
    impl ScriptVerifier for FailAt {
        fn verify(
            &mut self,
            _: &Script,
            _: &Script,
            _: &Transaction,
            input_index: usize,
            _: u32,
        ) -> bool {
            input_index != self.0
        }
    }

    fn utxos_for(tx: &Transaction) -> HashMap<OutPoint, TxOut> {
        tx.input
            .iter()
            .map(|input| {
                (
                    input.previous_output,
                    TxOut { value: 50_000, script_pubkey: Script::from(vec![0x51]) },
                )
            })
            .collect()
    }

    #[test]
    fn check_accepts_simple_tx() {
        assert_eq!(simple_tx().check(), Ok(()));
    }

    #[test]
    fn empty_inputs_reported_before_empty_outputs() {
        let mut tx = simple_tx();
        tx.input.clear();
        tx.output.clear();
        assert_eq!(tx.check(), Err(TxCheckError::EmptyInputs));
        assert_eq!(tx.check().unwrap_err().to_string(), "transaction txins empty");

        let mut tx = simple_tx();
        tx.output.clear();
        assert_eq!(tx.check(), Err(TxCheckError::EmptyOutputs));
        assert_eq!(tx.check().unwrap_err().to_string(), "transaction txouts empty");
    }

    #[test]
    fn oversized_transaction() {
        let mut tx = simple_tx();
        tx.output[0].script_pubkey = Script::from(vec![0u8; MAX_BLOCK_SIZE + 1]);
        let err = tx.check().unwrap_err();
        assert!(matches!(err, TxCheckError::OversizedTransaction { .. }));
        assert_eq!(err.to_string(), "transaction over the maximum block size");
    }

    #[test]
    fn output_value_bounds() {
        let mut tx = simple_tx();
        tx.output[1].value = -1;
        assert_eq!(tx.check(), Err(TxCheckError::NegativeOutput { index: 1 }));
        assert_eq!(tx.check().unwrap_err().to_string(), "transaction txout 1 negative");

        let mut tx = simple_tx();
        tx.output[0].value = MAX_MONEY + 1;
        assert_eq!(tx.check(), Err(TxCheckError::OutputTooLarge { index: 0 }));
        assert_eq!(
            tx.check().unwrap_err().to_string(),
            "transaction txout 0 greater than MAX_MONEY"
        );

        // each individually legal, together over the cap
        let mut tx = simple_tx();
        tx.output[0].value = MAX_MONEY;
        tx.output[1].value = 1;
        assert_eq!(tx.check(), Err(TxCheckError::TotalOutputTooLarge { index: 1 }));
        assert_eq!(
            tx.check().unwrap_err().to_string(),
            "transaction txout 1 total output greater than MAX_MONEY"
        );

        // a negative output is reported before the earlier outputs' total
        let mut tx = simple_tx();
        tx.output[0].value = -5;
        tx.output[1].value = MAX_MONEY + 1;
        assert_eq!(tx.check(), Err(TxCheckError::NegativeOutput { index: 0 }));
    }

    #[test]
    fn duplicate_input() {
        let mut tx = simple_tx();
        tx.input[1].previous_output = tx.input[0].previous_output;
        assert_eq!(tx.check(), Err(TxCheckError::DuplicateInput { index: 1 }));
        assert_eq!(
            tx.check().unwrap_err().to_string(),
            "transaction input 1 duplicate input"
        );
    }

    #[test]
    fn coinbase_script_bounds() {
        let coinbase = |script_len: usize| Transaction {
            version: 1,
            lock_time: 0,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: Script::from(vec![0u8; script_len]),
                sequence: 0xffffffff,
            }],
            output: vec![TxOut { value: 50 * 100_000_000, script_pubkey: Script::new() }],
        };

        assert!(coinbase(2).is_coin_base());
        assert_eq!(coinbase(1).check(), Err(TxCheckError::CoinbaseScriptSize { len: 1 }));
        assert_eq!(coinbase(2).check(), Ok(()));
        assert_eq!(coinbase(50).check(), Ok(()));
        assert_eq!(coinbase(100).check(), Ok(()));
        assert_eq!(coinbase(101).check(), Err(TxCheckError::CoinbaseScriptSize { len: 101 }));
        assert_eq!(
            coinbase(101).check().unwrap_err().to_string(),
            "coinbase transaction script size invalid"
        );
    }

    #[test]
    fn null_input_outside_coinbase() {
        // two inputs, so not a coinbase; the null outpoint is illegal
        let mut tx = simple_tx();
        tx.input[0].previous_output = OutPoint::null();
        assert_eq!(tx.check(), Err(TxCheckError::NullInput { index: 0 }));
        assert_eq!(
            tx.check().unwrap_err().to_string(),
            "transaction input 0 has null input"
        );
    }

    #[test]
    fn verify_inputs_happy_path() {
        let tx = simple_tx();
        let utxos = utxos_for(&tx);
        let spent = |p: &OutPoint| utxos.get(p).cloned();

        assert_eq!(verify_transaction_inputs(&tx, spent, 0, &mut Fixed(true)), Ok(()));
        assert!(tx.verify(spent, 0, &mut Fixed(true)));
    }

    #[test]
    fn verify_inputs_missing_utxo() {
        let tx = simple_tx();
        let mut utxos = utxos_for(&tx);
        utxos.remove(&tx.input[1].previous_output);
        let spent = |p: &OutPoint| utxos.get(p).cloned();

        assert_eq!(
            verify_transaction_inputs(&tx, spent, 0, &mut Fixed(true)),
            Err(TxVerifyError::UnknownSpentOutput(tx.input[1].previous_output))
        );
        assert!(!tx.verify(spent, 0, &mut Fixed(true)));
    }

    #[test]
    fn verify_inputs_reports_lowest_failing_index() {
        let tx = simple_tx();
        let utxos = utxos_for(&tx);
        let spent = |p: &OutPoint| utxos.get(p).cloned();

        let err = verify_transaction_inputs(&tx, spent, 0, &mut Fixed(false)).unwrap_err();
        assert_eq!(err, TxVerifyError::InputScriptFailure { index: 0 });
        assert_eq!(err.to_string(), "input 0 failed script verify");

        let err = verify_transaction_inputs(&tx, spent, 0, &mut FailAt(1)).unwrap_err();
        assert_eq!(err.to_string(), "input 1 failed script verify");
    }

    #[test]
    fn verify_requires_both_passes() {
        // script verification passes but the sanity checks do not
        let mut tx = simple_tx();
        tx.input[1].previous_output = tx.input[0].previous_output;
        let utxos = utxos_for(&tx);
        let spent = |p: &OutPoint| utxos.get(p).cloned();
        assert!(!tx.verify(spent, 0, &mut Fixed(true)));
    }

    #[test]
    fn flags_are_passed_through() {
        struct ExpectFlags(u32);
        impl ScriptVerifier for ExpectFlags {
            fn verify(
                &mut self,
                _: &Script,
                _: &Script,
                _: &Transaction,
                _: usize,
                flags: u32,
            ) -> bool {
                flags == self.0
            }
        }

        let tx = simple_tx();
        let utxos = utxos_for(&tx);
        let spent = |p: &OutPoint| utxos.get(p).cloned();
        assert!(tx.verify(spent, 0xdead_beef, &mut ExpectFlags(0xdead_beef)));
        assert!(!tx.verify(spent, 0xdead_beef, &mut ExpectFlags(0)));
    }
}
