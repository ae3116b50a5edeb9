// SPDX-License-Identifier: CC0-1.0

//! ECDSA Bitcoin signatures.
//!
//! Deterministic (RFC 6979) signing, verification and public-key recovery
//! over secp256k1, plus the DER wire form of a signature.
//!
//! Nonce generation deviates from the RFC 6979 pseudocode in one respect: the
//! `V = HMAC(K, V)` step after keying with `0x01` is applied twice, and so is
//! the corresponding step inside the retry loop. Historic signatures depend
//! on this derivation, so it is preserved bit-for-bit.

use std::str::FromStr;
use std::{error, fmt};

use crate::crypto::key::{self, PrivateKey, PublicKey};
use crate::crypto::secp256k1::{FieldElement, Point, Scalar};
use crate::hashes::hex::{self, FromHex};
use crate::hashes::{sha256, Hash, HashEngine, Hmac, HmacEngine};

/// An ECDSA signing/verification error.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The digest to sign or recover against was not exactly 32 bytes.
    InvalidDigestLength(usize),
    /// A signature component or nonce was zero or not below the curve order.
    OutOfRangeScalar,
    /// Recovery was requested on a signature without a recovery id.
    MissingRecoveryId,
    /// A recovery id byte outside {0, 1, 2, 3}.
    InvalidRecoveryId(u8),
    /// No candidate X coordinate yields a valid point of curve order.
    InvalidRecoveryPoint,
    /// All four recovery ids were tried without reproducing the expected key.
    RecoveryExhausted,
    /// Malformed DER signature.
    InvalidDer(&'static str),
    /// A key-level error.
    Key(key::Error),
    /// Hex decoding error.
    Hex(hex::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidDigestLength(len) => {
                write!(f, "digest must be 32 bytes, got {}", len)
            }
            Error::OutOfRangeScalar => write!(f, "scalar out of range"),
            Error::MissingRecoveryId => write!(f, "signature carries no recovery id"),
            Error::InvalidRecoveryId(b) => write!(f, "invalid recovery id: {}", b),
            Error::InvalidRecoveryPoint => write!(f, "no valid point for this recovery id"),
            Error::RecoveryExhausted => write!(f, "unable to find valid recovery factor"),
            Error::InvalidDer(msg) => write!(f, "invalid DER signature: {}", msg),
            Error::Key(ref e) => write_err!(f, "key error"; e),
            Error::Hex(ref e) => write_err!(f, "hex decoding error"; e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Key(ref e) => Some(e),
            Error::Hex(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<key::Error> for Error {
    fn from(e: key::Error) -> Error { Error::Key(e) }
}

impl From<hex::Error> for Error {
    fn from(e: hex::Error) -> Error { Error::Hex(e) }
}

/// Byte order of a 32-byte digest.
///
/// Bitcoin transaction digests are consumed little-endian; everything else
/// (including signed messages) is big-endian.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DigestOrder {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

/// The recovery id of a signature, as two explicit bits.
///
/// Folded into a single byte in {0, 1, 2, 3} only at serialization
/// boundaries; the compressed flag lives on [`Signature`], not here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecoveryId {
    /// Parity of the ephemeral point's y coordinate.
    pub y_parity_odd: bool,
    /// Whether the ephemeral x coordinate was r + n rather than r.
    pub second_key: bool,
}

impl RecoveryId {
    /// Folds into the single byte in {0, 1, 2, 3}.
    pub fn to_byte(self) -> u8 { ((self.second_key as u8) << 1) | (self.y_parity_odd as u8) }

    /// Unfolds from a byte in {0, 1, 2, 3}.
    pub fn from_byte(b: u8) -> Result<RecoveryId, Error> {
        if b > 3 {
            return Err(Error::InvalidRecoveryId(b));
        }
        Ok(RecoveryId { y_parity_odd: b & 1 == 1, second_key: b >> 1 == 1 })
    }
}

/// An ECDSA signature.
///
/// The compressed flag and recovery id are Bitcoin signed-message
/// conventions; they do not participate in DER serialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The r component.
    pub r: Scalar,
    /// The s component.
    pub s: Scalar,
    /// Whether the signing key's public form is compressed.
    pub compressed: bool,
    /// The recovery id, when known.
    pub recovery: Option<RecoveryId>,
}

impl Signature {
    /// Creates a signature from its components.
    pub fn new(r: Scalar, s: Scalar) -> Signature {
        Signature { r, s, compressed: true, recovery: None }
    }

    /// Serializes as a DER ASN.1 SEQUENCE of two INTEGERs.
    pub fn serialize_der(&self) -> Vec<u8> {
        fn push_int(out: &mut Vec<u8>, bytes: &[u8; 32]) {
            let mut start = 0;
            while start < 31 && bytes[start] == 0 {
                start += 1;
            }
            let needs_pad = bytes[start] & 0x80 != 0;
            out.push(0x02);
            out.push((32 - start) as u8 + needs_pad as u8);
            if needs_pad {
                out.push(0x00);
            }
            out.extend_from_slice(&bytes[start..]);
        }

        let mut body = Vec::with_capacity(72);
        push_int(&mut body, &self.r.to_be_bytes());
        push_int(&mut body, &self.s.to_be_bytes());

        let mut out = Vec::with_capacity(body.len() + 2);
        out.push(0x30);
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        out
    }

    /// Deserializes from the DER wire form.
    ///
    /// Both components must lie in (0, n).
    pub fn from_der(data: &[u8]) -> Result<Signature, Error> {
        fn parse_int<'a>(data: &'a [u8]) -> Result<(Scalar, &'a [u8]), Error> {
            if data.len() < 2 {
                return Err(Error::InvalidDer("truncated integer"));
            }
            if data[0] != 0x02 {
                return Err(Error::InvalidDer("expected integer tag"));
            }
            let len = data[1] as usize;
            if len == 0 || data.len() < 2 + len {
                return Err(Error::InvalidDer("bad integer length"));
            }
            let body = &data[2..2 + len];
            if body[0] & 0x80 != 0 {
                return Err(Error::InvalidDer("negative integer"));
            }
            if body.len() > 1 && body[0] == 0x00 && body[1] & 0x80 == 0 {
                return Err(Error::InvalidDer("excessive integer padding"));
            }
            let digits = if body[0] == 0x00 { &body[1..] } else { body };
            if digits.len() > 32 {
                return Err(Error::InvalidDer("integer too large"));
            }
            let mut bytes = [0u8; 32];
            bytes[32 - digits.len()..].copy_from_slice(digits);
            let scalar = Scalar::from_be_bytes(&bytes).ok_or(Error::OutOfRangeScalar)?;
            if scalar.is_zero() {
                return Err(Error::OutOfRangeScalar);
            }
            Ok((scalar, &data[2 + len..]))
        }

        if data.len() < 2 {
            return Err(Error::InvalidDer("truncated sequence"));
        }
        if data[0] != 0x30 {
            return Err(Error::InvalidDer("expected sequence tag"));
        }
        if data[1] as usize != data.len() - 2 {
            return Err(Error::InvalidDer("bad sequence length"));
        }
        let (r, rest) = parse_int(&data[2..])?;
        let (s, rest) = parse_int(rest)?;
        if !rest.is_empty() {
            return Err(Error::InvalidDer("trailing bytes"));
        }
        Ok(Signature::new(r, s))
    }

    /// Serializes (r, s) as 64 raw bytes.
    pub fn serialize_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_be_bytes());
        out[32..].copy_from_slice(&self.s.to_be_bytes());
        out
    }

    /// Deserializes (r, s) from 64 raw bytes.
    ///
    /// Both components must lie in (0, n).
    pub fn from_compact(data: &[u8]) -> Result<Signature, Error> {
        if data.len() != 64 {
            return Err(Error::InvalidDer("compact signature must be 64 bytes"));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&data[..32]);
        s.copy_from_slice(&data[32..]);
        let r = Scalar::from_be_bytes(&r).ok_or(Error::OutOfRangeScalar)?;
        let s = Scalar::from_be_bytes(&s).ok_or(Error::OutOfRangeScalar)?;
        if r.is_zero() || s.is_zero() {
            return Err(Error::OutOfRangeScalar);
        }
        Ok(Signature::new(r, s))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hex::format_hex(&self.serialize_der(), f)
    }
}

impl FromStr for Signature {
    type Err = Error;
    fn from_str(s: &str) -> Result<Signature, Error> {
        Signature::from_der(&Vec::from_hex(s)?)
    }
}

#[cfg(feature = "serde")]
serde_string_impl!(Signature, "a hex-encoded DER signature");

fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut engine = HmacEngine::<sha256::Hash>::new(key);
    engine.input(data);
    Hmac::<sha256::Hash>::from_engine(engine).into_inner()
}

fn digest32(digest: &[u8], order: DigestOrder) -> Result<[u8; 32], Error> {
    if digest.len() != 32 {
        return Err(Error::InvalidDigestLength(digest.len()));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(digest);
    if order == DigestOrder::LittleEndian {
        out.reverse();
    }
    Ok(out)
}

/// Derives the deterministic nonce for `digest` under `sk`.
///
/// `digest` must already be in big-endian order. `badrs` requests that many
/// additional derivation rounds, allowing a signer to skip over nonces that
/// produced a zero r or s without touching the derivation state machine.
pub fn deterministic_k(sk: &PrivateKey, digest: &[u8; 32], badrs: u32) -> Scalar {
    let x = sk.to_bytes();

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    let mut data = Vec::with_capacity(97);
    data.extend_from_slice(&v);
    data.push(0x00);
    data.extend_from_slice(&x);
    data.extend_from_slice(digest);
    k = hmac_sha256(&k, &data);
    v = hmac_sha256(&k, &v);

    data.clear();
    data.extend_from_slice(&v);
    data.push(0x01);
    data.extend_from_slice(&x);
    data.extend_from_slice(digest);
    k = hmac_sha256(&k, &data);
    v = hmac_sha256(&k, &v);
    v = hmac_sha256(&k, &v);

    let mut t = Scalar::from_be_bytes(&v).filter(|t| !t.is_zero());

    let mut i = 0;
    while i < badrs || t.is_none() {
        data.clear();
        data.extend_from_slice(&v);
        data.push(0x00);
        k = hmac_sha256(&k, &data);
        v = hmac_sha256(&k, &v);
        v = hmac_sha256(&k, &v);
        t = Scalar::from_be_bytes(&v).filter(|t| !t.is_zero());
        i += 1;
    }

    t.expect("loop exits only with a valid nonce")
}

/// Signs a big-endian 32-byte digest.
pub fn sign(digest: &[u8], sk: &PrivateKey) -> Result<Signature, Error> {
    sign_with_order(digest, sk, DigestOrder::BigEndian)
}

/// Signs a 32-byte digest in the given byte order.
pub fn sign_with_order(
    digest: &[u8],
    sk: &PrivateKey,
    order: DigestOrder,
) -> Result<Signature, Error> {
    let hash = digest32(digest, order)?;
    let e = Scalar::from_be_bytes_reduced(&hash);
    let d = sk.scalar;

    let mut badrs = 0;
    let (r, s) = loop {
        let k = deterministic_k(sk, &hash, badrs);
        badrs += 1;

        let q = Point::GENERATOR.mul(&k);
        let r = Scalar::from_be_bytes_reduced(
            &q.x().expect("k is in (0, n) so k*G is not infinity").to_be_bytes(),
        );
        let k_inv = k.invert().expect("nonce is nonzero");
        let s = k_inv.mul(&e.add(&d.mul(&r)));
        if !r.is_zero() && !s.is_zero() {
            break (r, s);
        }
    };

    // Low-s normalization.
    let s = if s.is_high() { s.neg() } else { s };

    Ok(Signature { r, s, compressed: sk.compressed, recovery: None })
}

/// A verification diagnostic.
///
/// Verification is not an error condition, so these are returned rather than
/// raised; [`verify`] collapses them into a boolean.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum VerifyError {
    /// The digest was not exactly 32 bytes.
    InvalidDigestLength(usize),
    /// r or s was zero.
    OutOfRangeSignature,
    /// The public key failed validation.
    InvalidPublicKey(key::Error),
    /// u1·G + u2·Q was the point at infinity.
    InfinitePoint,
    /// The recomputed x coordinate did not match r.
    IncorrectSignature,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VerifyError::InvalidDigestLength(len) => {
                write!(f, "digest must be 32 bytes, got {}", len)
            }
            VerifyError::OutOfRangeSignature => write!(f, "r and s not in range"),
            VerifyError::InvalidPublicKey(ref e) => write_err!(f, "invalid public key"; e),
            VerifyError::InfinitePoint => write!(f, "point at infinity"),
            VerifyError::IncorrectSignature => write!(f, "signature does not match digest"),
        }
    }
}

impl error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            VerifyError::InvalidPublicKey(ref e) => Some(e),
            _ => None,
        }
    }
}

/// Verifies a signature over a big-endian digest, with a diagnostic on
/// failure.
pub fn verify_digest(
    digest: &[u8],
    sig: &Signature,
    pk: &PublicKey,
    order: DigestOrder,
) -> Result<(), VerifyError> {
    if digest.len() != 32 {
        return Err(VerifyError::InvalidDigestLength(digest.len()));
    }
    if sig.r.is_zero() || sig.s.is_zero() {
        return Err(VerifyError::OutOfRangeSignature);
    }
    pk.validate().map_err(VerifyError::InvalidPublicKey)?;

    let hash = digest32(digest, order).expect("length checked above");
    let e = Scalar::from_be_bytes_reduced(&hash);

    let s_inv = sig.s.invert().expect("s is nonzero");
    let u1 = e.mul(&s_inv);
    let u2 = sig.r.mul(&s_inv);
    let p = Point::lincomb(&u1, &u2, &pk.point);

    match p.x() {
        None => Err(VerifyError::InfinitePoint),
        Some(x) => {
            let x_mod_n = Scalar::from_be_bytes_reduced(&x.to_be_bytes());
            if x_mod_n == sig.r {
                Ok(())
            } else {
                Err(VerifyError::IncorrectSignature)
            }
        }
    }
}

/// Verifies a signature over a big-endian 32-byte digest.
pub fn verify(digest: &[u8], sig: &Signature, pk: &PublicKey) -> bool {
    verify_digest(digest, sig, pk, DigestOrder::BigEndian).is_ok()
}

/// Verifies a signature over a 32-byte digest in the given byte order.
pub fn verify_with_order(
    digest: &[u8],
    sig: &Signature,
    pk: &PublicKey,
    order: DigestOrder,
) -> bool {
    verify_digest(digest, sig, pk, order).is_ok()
}

/// X coordinate candidate r + n, when it still fits the field.
fn second_key_x(r: &Scalar) -> Option<FieldElement> {
    let r_bytes = r.to_be_bytes();
    let n_bytes = Scalar::ORDER_BYTES;

    let mut sum = [0u8; 32];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let v = r_bytes[i] as u16 + n_bytes[i] as u16 + carry;
        sum[i] = v as u8;
        carry = v >> 8;
    }
    if carry != 0 {
        return None;
    }
    FieldElement::from_be_bytes(&sum)
}

/// Recovers the signing public key from a signature carrying a recovery id.
pub fn recover_pubkey(
    sig: &Signature,
    digest: &[u8],
    order: DigestOrder,
) -> Result<PublicKey, Error> {
    let rec = sig.recovery.ok_or(Error::MissingRecoveryId)?;
    let hash = digest32(digest, order)?;

    if sig.r.is_zero() || sig.s.is_zero() {
        return Err(Error::OutOfRangeScalar);
    }

    let x = if rec.second_key {
        second_key_x(&sig.r).ok_or(Error::InvalidRecoveryPoint)?
    } else {
        FieldElement::from_be_bytes(&sig.r.to_be_bytes())
            .expect("r is below n which is below the field prime")
    };

    let big_r = Point::lift_x(&x, rec.y_parity_odd).ok_or(Error::InvalidRecoveryPoint)?;

    // R must be annihilated by the group order.
    if !big_r.mul_bits(&Scalar::ORDER_BYTES).is_infinity() {
        return Err(Error::InvalidRecoveryPoint);
    }

    let e = Scalar::from_be_bytes_reduced(&hash);
    let r_inv = sig.r.invert().expect("r is nonzero");

    // Q = r⁻¹·(s·R − e·G), with e·G subtracted via its negation mod n.
    let q = Point::lincomb(&e.neg(), &sig.s, &big_r).mul(&r_inv);

    let key = PublicKey { compressed: sig.compressed, point: q };
    key.validate()?;
    Ok(key)
}

/// Finds and records the recovery id that reproduces `pk`.
///
/// On success the signature carries the recovery id and the expected key's
/// compressed flag.
pub fn calc_recovery_id(
    sig: &mut Signature,
    pk: &PublicKey,
    digest: &[u8],
) -> Result<(), Error> {
    calc_recovery_id_with_order(sig, pk, digest, DigestOrder::BigEndian)
}

/// [`calc_recovery_id`] for a digest in the given byte order.
pub fn calc_recovery_id_with_order(
    sig: &mut Signature,
    pk: &PublicKey,
    digest: &[u8],
    order: DigestOrder,
) -> Result<(), Error> {
    for byte in 0..4 {
        let rec = RecoveryId::from_byte(byte).expect("byte is below 4");
        let mut candidate = *sig;
        candidate.recovery = Some(rec);
        candidate.compressed = pk.compressed;
        if let Ok(recovered) = recover_pubkey(&candidate, digest, order) {
            if recovered.point == pk.point {
                sig.recovery = Some(rec);
                sig.compressed = pk.compressed;
                return Ok(());
            }
        }
    }
    Err(Error::RecoveryExhausted)
}
