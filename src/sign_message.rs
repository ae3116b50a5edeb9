// SPDX-License-Identifier: CC0-1.0

//! Bitcoin signed messages.
//!
//! This module provides the "Bitcoin Signed Message" convention: a magic
//! prefix hash plus a 65-byte compact signature whose header byte packs the
//! recovery id and the compressed flag as `27 + recovery + (4 if compressed)`,
//! conventionally exchanged in base64.

use std::str::FromStr;
use std::{error, fmt};

use crate::consensus::encode::{Encodable, VarInt};
use crate::crypto::ecdsa::{self, DigestOrder, RecoveryId, Signature};
use crate::crypto::key::{PrivateKey, PublicKey};
use crate::hashes::{sha256d, Hash, HashEngine};

/// The prefix for signed messages using Bitcoin's message signing protocol.
pub const BITCOIN_SIGNED_MSG_PREFIX: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// An error used for dealing with Bitcoin Signed Messages.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageSignatureError {
    /// Signature is expected to be 65 bytes.
    InvalidLength(usize),
    /// The header byte is below 27.
    InvalidHeaderByte(u8),
    /// The signature is invalidly constructed.
    InvalidEncoding(ecdsa::Error),
    /// Invalid base64 encoding.
    InvalidBase64,
    /// The signature carries no recovery id.
    MissingRecoveryId,
}

impl fmt::Display for MessageSignatureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MessageSignatureError::InvalidLength(len) => {
                write!(f, "length not 65 bytes: {}", len)
            }
            MessageSignatureError::InvalidHeaderByte(b) => {
                write!(f, "invalid header byte: {}", b)
            }
            MessageSignatureError::InvalidEncoding(ref e) => write_err!(f, "invalid encoding"; e),
            MessageSignatureError::InvalidBase64 => write!(f, "invalid base64"),
            MessageSignatureError::MissingRecoveryId => {
                write!(f, "signature carries no recovery id")
            }
        }
    }
}

impl error::Error for MessageSignatureError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            MessageSignatureError::InvalidEncoding(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<ecdsa::Error> for MessageSignatureError {
    fn from(e: ecdsa::Error) -> MessageSignatureError {
        MessageSignatureError::InvalidEncoding(e)
    }
}

/// A signature on a Bitcoin Signed Message.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MessageSignature {
    /// The inner recoverable signature.
    pub signature: Signature,
}

impl MessageSignature {
    /// Creates a new [`MessageSignature`].
    ///
    /// The signature must carry a recovery id; sign with
    /// [`sign_message`] or run `calc_recovery_id` first.
    pub fn new(signature: Signature) -> Result<MessageSignature, MessageSignatureError> {
        if signature.recovery.is_none() {
            return Err(MessageSignatureError::MissingRecoveryId);
        }
        Ok(MessageSignature { signature })
    }

    /// Serializes to the 65-byte compact form.
    pub fn serialize(&self) -> [u8; 65] {
        let recovery = self.signature.recovery.expect("checked at construction");
        let mut serialized = [0u8; 65];
        serialized[0] = 27;
        serialized[0] += recovery.to_byte();
        if self.signature.compressed {
            serialized[0] += 4;
        }
        serialized[1..].copy_from_slice(&self.signature.serialize_compact());
        serialized
    }

    /// Creates from a 65-byte compact slice.
    pub fn from_slice(bytes: &[u8]) -> Result<MessageSignature, MessageSignatureError> {
        if bytes.len() != 65 {
            return Err(MessageSignatureError::InvalidLength(bytes.len()));
        }
        // We just check this here so we can safely subtract further.
        if bytes[0] < 27 {
            return Err(MessageSignatureError::InvalidHeaderByte(bytes[0]));
        }
        let header = bytes[0] - 27;
        let mut signature = Signature::from_compact(&bytes[1..])?;
        signature.recovery = Some(RecoveryId::from_byte(header & 0x03)?);
        signature.compressed = (header & 0x04) != 0;
        Ok(MessageSignature { signature })
    }

    /// Attempts to recover the public key from the signature and the signed
    /// message.
    ///
    /// To get the message hash from a message, use [`signed_msg_hash`].
    pub fn recover_pubkey(
        &self,
        msg_hash: sha256d::Hash,
    ) -> Result<PublicKey, MessageSignatureError> {
        Ok(ecdsa::recover_pubkey(
            &self.signature,
            &msg_hash.into_inner(),
            DigestOrder::BigEndian,
        )?)
    }

    /// Verifies that the signature signs the message and was signed by the
    /// given key.
    pub fn is_signed_by_key(&self, pk: &PublicKey, msg_hash: sha256d::Hash) -> bool {
        match self.recover_pubkey(msg_hash) {
            Ok(recovered) => recovered.point() == pk.point(),
            Err(_) => false,
        }
    }

    /// Converts a signature from base64 encoding.
    pub fn from_base64(s: &str) -> Result<MessageSignature, MessageSignatureError> {
        let bytes = base64::decode(s).map_err(|_| MessageSignatureError::InvalidBase64)?;
        MessageSignature::from_slice(&bytes)
    }

    /// Converts to base64 encoding.
    pub fn to_base64(self) -> String { base64::encode(&self.serialize()[..]) }
}

impl fmt::Display for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for MessageSignature {
    type Err = MessageSignatureError;
    fn from_str(s: &str) -> Result<MessageSignature, MessageSignatureError> {
        MessageSignature::from_base64(s)
    }
}

/// Hashes a message for signature using Bitcoin's message signing format.
pub fn signed_msg_hash(msg: &str) -> sha256d::Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(BITCOIN_SIGNED_MSG_PREFIX);
    let msg_len = VarInt(msg.len() as u64);
    msg_len.consensus_encode(&mut engine).expect("engines don't error");
    engine.input(msg.as_bytes());
    sha256d::Hash::from_engine(engine)
}

/// Signs a message under the Bitcoin Signed Message convention.
pub fn sign_message(msg: &str, sk: &PrivateKey) -> Result<MessageSignature, ecdsa::Error> {
    let hash = signed_msg_hash(msg);
    let mut signature = ecdsa::sign(&hash.into_inner(), sk)?;
    ecdsa::calc_recovery_id(&mut signature, &sk.public_key(), &hash.into_inner())?;
    Ok(MessageSignature { signature })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::hex::FromHex;

    #[test]
    fn test_signed_msg_hash() {
        let hash = signed_msg_hash("test");
        assert_eq!(
            hash.to_string(),
            "a6f87fe6d58a032c320ff8d1541656f0282c2c7bfcc69d61af4c8e8ed528e49c"
        );
    }

    #[test]
    fn known_good_recovery() {
        // Signature over "rust-bitcoin MessageSignature test" and the key it
        // was made with.
        let signature_base64 = "IAM2qX24tYx/bdBTIgVLhD8QEAjrPlJpmjB4nZHdRYGIBa4DmVulAcwjPnWe6Q5iEwXH6F0pUCJP/ZeHPWS1h1o=";
        let pubkey_hex = "0351537cc127b4fa40b72dea904a34ab60dcd45132708d746b78e6c04172f90afa";

        let signature = MessageSignature::from_base64(signature_base64).unwrap();
        assert!(signature.signature.compressed);
        assert_eq!(signature.signature.recovery.unwrap().to_byte(), 1);

        let msg_hash = signed_msg_hash("rust-bitcoin MessageSignature test");
        let pubkey = signature.recover_pubkey(msg_hash).unwrap();
        assert!(pubkey.compressed);
        assert_eq!(pubkey.to_string(), pubkey_hex);

        let expected: PublicKey = pubkey_hex.parse().unwrap();
        assert!(signature.is_signed_by_key(&expected, msg_hash));

        // round trip through base64
        assert_eq!(signature.to_base64(), signature_base64);
        assert_eq!(signature.to_string(), signature_base64);
    }

    #[test]
    fn incorrect_message_fails() {
        let signature = MessageSignature::from_base64(
            "IAM2qX24tYx/bdBTIgVLhD8QEAjrPlJpmjB4nZHdRYGIBa4DmVulAcwjPnWe6Q5iEwXH6F0pUCJP/ZeHPWS1h1o=",
        )
        .unwrap();
        let expected: PublicKey =
            "0351537cc127b4fa40b72dea904a34ab60dcd45132708d746b78e6c04172f90afa".parse().unwrap();

        let msg_hash = signed_msg_hash("a different message from what was signed");
        assert!(!signature.is_signed_by_key(&expected, msg_hash));
    }

    #[test]
    fn sign_message_fixed_vector() {
        // independently computed with the deterministic nonce derivation
        let sk = PrivateKey::from_slice(
            &Vec::from_hex("1e99423a4ed27608a15a2616a2b0e9e52ced330ac530edcc32c8ffc6a526aedd")
                .unwrap(),
            true,
        )
        .unwrap();

        let signature = sign_message("this is my message", &sk).unwrap();
        assert_eq!(
            signature.to_base64(),
            "H/1BNF7QU9TorlArYaUKpmjZTBnoFm6yauP7w3MEl3nVOcW7ss1MqTYB6Nvq5M1VS0JMZFSS32+I7nESxTTzJX4="
        );

        let msg_hash = signed_msg_hash("this is my message");
        assert!(signature.is_signed_by_key(&sk.public_key(), msg_hash));
        assert!(!signature.is_signed_by_key(&sk.public_key(), signed_msg_hash("another message")));

        // serialized form survives the wire
        let wire = MessageSignature::from_slice(&signature.serialize()).unwrap();
        assert_eq!(wire, signature);
        assert_eq!(wire.recover_pubkey(msg_hash).unwrap(), sk.public_key());
    }

    #[test]
    fn uncompressed_key_header() {
        let sk = PrivateKey::from_slice(&[0x42u8; 32], false).unwrap();
        let signature = sign_message("flag test", &sk).unwrap();
        assert!(!signature.signature.compressed);

        let serialized = signature.serialize();
        // header byte is 27 + recid without the +4 compressed marker
        assert!(serialized[0] >= 27 && serialized[0] < 31);

        let parsed = MessageSignature::from_slice(&serialized).unwrap();
        assert!(!parsed.signature.compressed);
        assert!(parsed.is_signed_by_key(&sk.public_key(), signed_msg_hash("flag test")));
    }

    #[test]
    fn malformed_slices() {
        assert_eq!(
            MessageSignature::from_slice(&[0u8; 64]),
            Err(MessageSignatureError::InvalidLength(64))
        );

        let mut low_header = [1u8; 65];
        low_header[0] = 26;
        assert_eq!(
            MessageSignature::from_slice(&low_header),
            Err(MessageSignatureError::InvalidHeaderByte(26))
        );

        assert_eq!(
            MessageSignature::from_base64("definitely !!! not base64"),
            Err(MessageSignatureError::InvalidBase64)
        );

        let unrecovered = Signature::new(
            crate::secp256k1::Scalar::ONE,
            crate::secp256k1::Scalar::ONE,
        );
        assert_eq!(
            MessageSignature::new(unrecovered),
            Err(MessageSignatureError::MissingRecoveryId)
        );
    }
}
