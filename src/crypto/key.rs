// SPDX-License-Identifier: CC0-1.0

//! Bitcoin keys.
//!
//! This module provides keys used in Bitcoin that can be roundtrip
//! (de)serialized. Public keys use the SEC1 encoding: `0x04 ‖ X ‖ Y`
//! uncompressed, `0x02/0x03 ‖ X` compressed (the prefix encodes the parity
//! of y), with the legacy hybrid `0x06/0x07` prefixes accepted only by the
//! lax decoder.

use std::str::FromStr;
use std::{error, fmt};

use crate::crypto::secp256k1::{FieldElement, Point, Scalar};
use crate::hash_types::PubkeyHash;
use crate::hashes::{hash160, hex, hex::FromHex, Hash};

/// A key-related error.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An invalid SEC1 buffer length.
    InvalidLength(usize),
    /// An SEC1 prefix byte that does not match the buffer length, or a hybrid
    /// prefix in strict mode.
    InvalidPrefix(u8),
    /// A coordinate was not a canonical field element.
    InvalidCoordinate,
    /// The decoded point does not satisfy the curve equation.
    NotOnCurve,
    /// The point at infinity cannot be used as a public key.
    PointAtInfinity,
    /// The forbidden (0, 0) point.
    ZeroPoint,
    /// An invalid flag byte in the transport form.
    InvalidTransportFlag(u8),
    /// A secret key was zero or not below the curve order.
    InvalidSecretKey,
    /// Hex decoding error.
    Hex(hex::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidLength(len) => write!(f, "invalid public key length: {}", len),
            Error::InvalidPrefix(b) => write!(f, "invalid public key prefix: {:#04x}", b),
            Error::InvalidCoordinate => write!(f, "coordinate is not a canonical field element"),
            Error::NotOnCurve => write!(f, "point is not on the curve"),
            Error::PointAtInfinity => write!(f, "point at infinity"),
            Error::ZeroPoint => write!(f, "the (0, 0) point is forbidden"),
            Error::InvalidTransportFlag(b) => write!(f, "invalid transport flag byte: {:#04x}", b),
            Error::InvalidSecretKey => write!(f, "secret key out of range"),
            Error::Hex(ref e) => write_err!(f, "hex decoding error"; e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Hex(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<hex::Error> for Error {
    fn from(e: hex::Error) -> Error { Error::Hex(e) }
}

/// A Bitcoin ECDSA public key.
///
/// The `compressed` flag does not change the key's meaning, it only selects
/// which SEC1 serialization [`PublicKey::to_bytes`] emits. Keys are validated
/// at construction and immutable afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Whether this key should be serialized as compressed.
    pub compressed: bool,
    pub(crate) point: Point,
}

impl PublicKey {
    /// Computes the public key of a private key: point = privkey·G.
    pub fn from_private_key(sk: &PrivateKey) -> PublicKey {
        PublicKey {
            compressed: sk.compressed,
            point: Point::GENERATOR.mul(&sk.scalar),
        }
    }

    /// Deserializes a public key from an SEC1 byte string, strict mode.
    ///
    /// Hybrid (`0x06`/`0x07`) prefixes are rejected; use
    /// [`PublicKey::from_slice_lax`] to accept them.
    pub fn from_slice(data: &[u8]) -> Result<PublicKey, Error> {
        Self::from_slice_inner(data, false)
    }

    /// Deserializes a public key from an SEC1 byte string, additionally
    /// accepting the legacy hybrid `0x06`/`0x07` prefixes.
    ///
    /// A hybrid key decodes as uncompressed with the embedded y used as-is.
    pub fn from_slice_lax(data: &[u8]) -> Result<PublicKey, Error> {
        Self::from_slice_inner(data, true)
    }

    fn from_slice_inner(data: &[u8], allow_hybrid: bool) -> Result<PublicKey, Error> {
        let key = match data.first() {
            Some(0x04) | Some(0x06) | Some(0x07) => {
                let prefix = data[0];
                if prefix != 0x04 && !allow_hybrid {
                    return Err(Error::InvalidPrefix(prefix));
                }
                if data.len() != 65 {
                    return Err(Error::InvalidLength(data.len()));
                }
                let mut x = [0u8; 32];
                let mut y = [0u8; 32];
                x.copy_from_slice(&data[1..33]);
                y.copy_from_slice(&data[33..65]);
                let x = FieldElement::from_be_bytes(&x).ok_or(Error::InvalidCoordinate)?;
                let y = FieldElement::from_be_bytes(&y).ok_or(Error::InvalidCoordinate)?;
                PublicKey { compressed: false, point: Point::from_affine(x, y) }
            }
            Some(0x02) | Some(0x03) => {
                let prefix = data[0];
                if data.len() != 33 {
                    return Err(Error::InvalidLength(data.len()));
                }
                let mut x = [0u8; 32];
                x.copy_from_slice(&data[1..33]);
                let x = FieldElement::from_be_bytes(&x).ok_or(Error::InvalidCoordinate)?;
                let point =
                    Point::lift_x(&x, prefix == 0x03).ok_or(Error::NotOnCurve)?;
                PublicKey { compressed: true, point }
            }
            Some(&prefix) => return Err(Error::InvalidPrefix(prefix)),
            None => return Err(Error::InvalidLength(0)),
        };
        key.validate()?;
        Ok(key)
    }

    /// Checks that the underlying point is usable as a public key.
    ///
    /// Fails for the point at infinity, the forbidden (0, 0) point, and any
    /// point not satisfying the curve equation.
    pub fn validate(&self) -> Result<(), Error> {
        match self.point {
            Point::Infinity => Err(Error::PointAtInfinity),
            Point::Affine { ref x, ref y } => {
                if x.is_zero() && y.is_zero() {
                    return Err(Error::ZeroPoint);
                }
                if !self.point.is_on_curve() {
                    return Err(Error::NotOnCurve);
                }
                Ok(())
            }
        }
    }

    /// The underlying curve point.
    pub fn point(&self) -> &Point { &self.point }

    /// Serializes the public key in the 33-byte compressed form.
    pub fn serialize(&self) -> [u8; 33] {
        let mut ret = [0u8; 33];
        let (x, y) = self.coordinates();
        ret[0] = if y.is_odd() { 0x03 } else { 0x02 };
        ret[1..33].copy_from_slice(&x.to_be_bytes());
        ret
    }

    /// Serializes the public key in the 65-byte uncompressed form.
    pub fn serialize_uncompressed(&self) -> [u8; 65] {
        let mut ret = [0u8; 65];
        let (x, y) = self.coordinates();
        ret[0] = 0x04;
        ret[1..33].copy_from_slice(&x.to_be_bytes());
        ret[33..65].copy_from_slice(&y.to_be_bytes());
        ret
    }

    /// Serializes the public key in the form selected by the compressed flag.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.serialize().to_vec()
        } else {
            self.serialize_uncompressed().to_vec()
        }
    }

    fn coordinates(&self) -> (&FieldElement, &FieldElement) {
        match self.point {
            // Validated at construction.
            Point::Infinity => unreachable!("validated public keys are never infinity"),
            Point::Affine { ref x, ref y } => (x, y),
        }
    }

    /// Returns true iff `bytes` is a canonical SEC1 public-key encoding.
    ///
    /// Canonical encodings are `0x04` with 65 bytes and `0x02`/`0x03` with
    /// 33 bytes; the hybrid prefixes are never canonical. Only the shape is
    /// inspected, not the curve membership.
    pub fn is_canonical_encoding(bytes: &[u8]) -> bool {
        match bytes.first() {
            Some(0x04) => bytes.len() == 65,
            Some(0x02) | Some(0x03) => bytes.len() == 33,
            _ => false,
        }
    }

    /// Serializes into the internal transport form: a flag byte carrying the
    /// compressed flag followed by the 65-byte uncompressed SEC1 encoding.
    ///
    /// This is the cross-boundary ABI used to hand keys to workers; it
    /// round-trips exactly. An empty buffer denotes "no key", see
    /// [`PublicKey::from_transport_bytes`].
    pub fn to_transport_bytes(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(66);
        ret.push(self.compressed as u8);
        ret.extend_from_slice(&self.serialize_uncompressed());
        ret
    }

    /// Deserializes the transport form produced by
    /// [`PublicKey::to_transport_bytes`].
    ///
    /// An empty buffer decodes to `None`.
    pub fn from_transport_bytes(data: &[u8]) -> Result<Option<PublicKey>, Error> {
        if data.is_empty() {
            return Ok(None);
        }
        if data.len() != 66 {
            return Err(Error::InvalidLength(data.len()));
        }
        let compressed = match data[0] {
            0 => false,
            1 => true,
            flag => return Err(Error::InvalidTransportFlag(flag)),
        };
        let mut key = PublicKey::from_slice(&data[1..])?;
        key.compressed = compressed;
        Ok(Some(key))
    }

    /// Returns the bitcoin hash160 of this key, honoring the compressed flag.
    pub fn pubkey_hash(&self) -> PubkeyHash {
        PubkeyHash::from_inner(hash160::Hash::hash(&self.to_bytes()).into_inner())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { hex::format_hex(&self.to_bytes(), f) }
}

impl FromStr for PublicKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<PublicKey, Error> {
        PublicKey::from_slice(&Vec::from_hex(s)?)
    }
}

#[cfg(feature = "serde")]
serde_string_impl!(PublicKey, "a hex-encoded SEC1 public key");

/// A Bitcoin ECDSA private key.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// Whether public keys derived from this key should be compressed.
    pub compressed: bool,
    pub(crate) scalar: Scalar,
}

impl PrivateKey {
    /// Creates a private key from a scalar.
    ///
    /// The scalar must lie in the open interval (0, n); this is guaranteed by
    /// the [`Scalar`] type except for zero, which is rejected here.
    pub fn from_scalar(scalar: Scalar, compressed: bool) -> Result<PrivateKey, Error> {
        if scalar.is_zero() {
            return Err(Error::InvalidSecretKey);
        }
        Ok(PrivateKey { compressed, scalar })
    }

    /// Deserializes a private key from 32 big-endian bytes.
    pub fn from_slice(data: &[u8], compressed: bool) -> Result<PrivateKey, Error> {
        if data.len() != 32 {
            return Err(Error::InvalidLength(data.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(data);
        let scalar = Scalar::from_be_bytes(&bytes).ok_or(Error::InvalidSecretKey)?;
        PrivateKey::from_scalar(scalar, compressed)
    }

    /// Serializes the private key as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] { self.scalar.to_be_bytes() }

    /// Computes the public key as supposed to be used with this secret.
    pub fn public_key(&self) -> PublicKey { PublicKey::from_private_key(self) }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "[private key data]") }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "[private key data]") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::hex::FromHex;

    const SK: &str = "1e99423a4ed27608a15a2616a2b0e9e52ced330ac530edcc32c8ffc6a526aedd";
    const PK_C: &str = "03f028892bad7ed57d2fb57bf33081d5cfcf6f9ed3d3d7f159c2e2fff579dc341a";
    const PK_U: &str = "04f028892bad7ed57d2fb57bf33081d5cfcf6f9ed3d3d7f159c2e2fff579dc341a07cf33da18bd734c600b96a72bbc4749d5141c90ec8ac328ae52ddfe2e505bdb";

    fn test_key() -> PrivateKey {
        PrivateKey::from_slice(&Vec::from_hex(SK).unwrap(), true).unwrap()
    }

    #[test]
    fn derive_public_key() {
        let pk = test_key().public_key();
        assert!(pk.compressed);
        assert_eq!(pk.to_string(), PK_C);

        let mut sk = test_key();
        sk.compressed = false;
        assert_eq!(sk.public_key().to_string(), PK_U);
    }

    #[test]
    fn sec1_round_trip() {
        let compressed = PublicKey::from_str(PK_C).unwrap();
        assert!(compressed.compressed);
        assert_eq!(compressed.serialize()[..], Vec::from_hex(PK_C).unwrap()[..]);
        assert_eq!(compressed.to_string(), PK_C);

        let uncompressed = PublicKey::from_str(PK_U).unwrap();
        assert!(!uncompressed.compressed);
        assert_eq!(uncompressed.serialize_uncompressed()[..], Vec::from_hex(PK_U).unwrap()[..]);
        assert_eq!(uncompressed.to_string(), PK_U);

        // the two forms decode to the same point with different flags
        assert_eq!(compressed.point, uncompressed.point);
        assert_ne!(compressed, uncompressed);
        assert_eq!(PublicKey::from_slice(&uncompressed.serialize()).unwrap(), compressed);
    }

    #[test]
    fn bad_slices() {
        let c = Vec::from_hex(PK_C).unwrap();
        let u = Vec::from_hex(PK_U).unwrap();

        assert_eq!(PublicKey::from_slice(&[]), Err(Error::InvalidLength(0)));
        assert_eq!(PublicKey::from_slice(&c[..32]), Err(Error::InvalidLength(32)));
        assert_eq!(PublicKey::from_slice(&u[..64]), Err(Error::InvalidLength(64)));

        let mut wrong_prefix = c.clone();
        wrong_prefix[0] = 0x05;
        assert_eq!(PublicKey::from_slice(&wrong_prefix), Err(Error::InvalidPrefix(0x05)));

        // x not on the curve under either parity
        let mut off_curve = c;
        off_curve[1..33].copy_from_slice(&[0u8; 32]);
        off_curve[32] = 5;
        assert_eq!(PublicKey::from_slice(&off_curve), Err(Error::NotOnCurve));

        // mangled y on an uncompressed key
        let mut bad_y = u;
        bad_y[64] ^= 1;
        assert_eq!(PublicKey::from_slice(&bad_y), Err(Error::NotOnCurve));
    }

    #[test]
    fn hybrid_decode_is_lax_only() {
        let u = Vec::from_hex(PK_U).unwrap();
        let mut hybrid = u;
        // 0x06 for even y, 0x07 for odd; embedded y is odd here
        hybrid[0] = 0x07;

        assert_eq!(PublicKey::from_slice(&hybrid), Err(Error::InvalidPrefix(0x07)));

        let key = PublicKey::from_slice_lax(&hybrid).unwrap();
        assert!(!key.compressed);
        assert_eq!(key.to_string(), PK_U);

        // a hybrid buffer with a wrong y still fails validation
        let mut bad = Vec::from_hex(PK_U).unwrap();
        bad[0] = 0x06;
        bad[64] ^= 1;
        assert_eq!(PublicKey::from_slice_lax(&bad), Err(Error::NotOnCurve));
    }

    #[test]
    fn canonical_encoding_predicate() {
        let c = Vec::from_hex(PK_C).unwrap();
        let u = Vec::from_hex(PK_U).unwrap();

        assert!(PublicKey::is_canonical_encoding(&c));
        assert!(PublicKey::is_canonical_encoding(&u));

        let mut two = c.clone();
        two[0] = 0x02;
        assert!(PublicKey::is_canonical_encoding(&two));

        // hybrid prefixes are never canonical
        let mut hybrid = u.clone();
        hybrid[0] = 0x06;
        assert!(!PublicKey::is_canonical_encoding(&hybrid));
        hybrid[0] = 0x07;
        assert!(!PublicKey::is_canonical_encoding(&hybrid));

        // length mismatches
        assert!(!PublicKey::is_canonical_encoding(&c[..32]));
        assert!(!PublicKey::is_canonical_encoding(&u[..33]));
        assert!(!PublicKey::is_canonical_encoding(&[]));
    }

    #[test]
    fn transport_round_trip() {
        for &hex_key in &[PK_C, PK_U] {
            let key = PublicKey::from_str(hex_key).unwrap();
            let buf = key.to_transport_bytes();
            assert_eq!(buf.len(), 66);
            assert_eq!(buf[0], key.compressed as u8);
            assert_eq!(PublicKey::from_transport_bytes(&buf).unwrap(), Some(key));
        }

        assert_eq!(PublicKey::from_transport_bytes(&[]).unwrap(), None);
        assert_eq!(
            PublicKey::from_transport_bytes(&[2u8; 66]),
            Err(Error::InvalidTransportFlag(2))
        );
        assert_eq!(PublicKey::from_transport_bytes(&[0u8; 10]), Err(Error::InvalidLength(10)));
    }

    #[test]
    fn secret_key_bounds() {
        assert_eq!(
            PrivateKey::from_slice(&[0u8; 32], true),
            Err(Error::InvalidSecretKey)
        );
        assert_eq!(
            PrivateKey::from_slice(&Scalar::ORDER_BYTES, true),
            Err(Error::InvalidSecretKey)
        );
        assert!(PrivateKey::from_slice(&[1u8; 32], true).is_ok());
    }

    #[test]
    fn private_key_display_is_redacted() {
        let sk = test_key();
        assert_eq!(format!("{}", sk), "[private key data]");
        assert_eq!(format!("{:?}", sk), "[private key data]");
    }

    #[test]
    fn pubkey_hash_honors_flag() {
        let pk = test_key().public_key();
        assert_eq!(pk.pubkey_hash().to_string(), "bbc1e42a39d05a4cc61752d6963b7f69d09bb27b");

        let mut uncompressed = pk;
        uncompressed.compressed = false;
        assert_ne!(uncompressed.pubkey_hash(), pk.pubkey_hash());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_json_hex_string() {
        let pk = test_key().public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, format!("\"{}\"", PK_C));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }
}
