// SPDX-License-Identifier: CC0-1.0

//! Scalar arithmetic modulo the curve order n.
//!
//! n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
//!
//! Used for private keys, signature components and nonce arithmetic.

use std::cmp::Ordering;

use super::field::limbs_from_be_bytes;

/// The secp256k1 curve order n.
/// Represented as 4 x 64-bit limbs in little-endian order.
const N: [u64; 4] = [
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// n - 2 for Fermat inversion.
const N_MINUS_2: [u64; 4] = [
    0xBFD25E8CD036413F,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// ⌊n/2⌋, the low-s bound:
/// 0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0.
const HALF_N: [u64; 4] = [
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
];

#[inline]
fn adc(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (r, c1) = a.overflowing_add(b);
    let (r, c2) = r.overflowing_add(carry as u64);
    (r, c1 | c2)
}

#[inline]
fn sbb(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (r, b1) = a.overflowing_sub(b);
    let (r, b2) = r.overflowing_sub(borrow as u64);
    (r, b1 | b2)
}

/// Scalar element in Z/nZ where n is the secp256k1 curve order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar {
    limbs: [u64; 4],
}

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self { limbs: [0, 0, 0, 0] };

    /// One scalar.
    pub const ONE: Self = Self { limbs: [1, 0, 0, 0] };

    /// The curve order n as big-endian bytes.
    pub const ORDER_BYTES: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    /// Creates a scalar from 4 limbs (little-endian).
    pub const fn from_limbs(limbs: [u64; 4]) -> Self { Self { limbs } }

    /// Creates a scalar from bytes (big-endian).
    ///
    /// Returns `None` if the value is not below n.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let s = Self { limbs: limbs_from_be_bytes(bytes) };
        if s.gte_n() {
            None
        } else {
            Some(s)
        }
    }

    /// Creates a scalar from big-endian bytes, reducing mod n.
    ///
    /// Any 256-bit value is below 2n, so a single conditional subtract fully
    /// reduces.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let mut s = Self { limbs: limbs_from_be_bytes(bytes) };
        if s.gte_n() {
            s = s.sub_n();
        }
        s
    }

    /// Creates a scalar from little-endian bytes, reducing mod n.
    ///
    /// Bitcoin transaction digests are consumed in this byte order.
    pub fn from_le_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let mut be = *bytes;
        be.reverse();
        Self::from_be_bytes_reduced(&be)
    }

    /// Converts to bytes (big-endian).
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&self.limbs[3].to_be_bytes());
        bytes[8..16].copy_from_slice(&self.limbs[2].to_be_bytes());
        bytes[16..24].copy_from_slice(&self.limbs[1].to_be_bytes());
        bytes[24..32].copy_from_slice(&self.limbs[0].to_be_bytes());
        bytes
    }

    /// Checks if self >= n.
    fn gte_n(&self) -> bool {
        for i in (0..4).rev() {
            if self.limbs[i] > N[i] {
                return true;
            }
            if self.limbs[i] < N[i] {
                return false;
            }
        }
        true // equal to n
    }

    /// Checks if zero.
    pub fn is_zero(&self) -> bool {
        self.limbs[0] == 0 && self.limbs[1] == 0 && self.limbs[2] == 0 && self.limbs[3] == 0
    }

    /// Checks whether self is above ⌊n/2⌋, i.e. a "high" signature s value.
    pub fn is_high(&self) -> bool {
        for i in (0..4).rev() {
            if self.limbs[i] > HALF_N[i] {
                return true;
            }
            if self.limbs[i] < HALF_N[i] {
                return false;
            }
        }
        false // equal to ⌊n/2⌋ is still low
    }

    /// Addition: self + other (mod n).
    pub fn add(&self, other: &Self) -> Self {
        let (r0, c0) = adc(self.limbs[0], other.limbs[0], false);
        let (r1, c1) = adc(self.limbs[1], other.limbs[1], c0);
        let (r2, c2) = adc(self.limbs[2], other.limbs[2], c1);
        let (r3, c3) = adc(self.limbs[3], other.limbs[3], c2);

        let mut result = Self { limbs: [r0, r1, r2, r3] };

        if c3 || result.gte_n() {
            result = result.sub_n();
        }

        result
    }

    /// Subtracts n from self.
    fn sub_n(&self) -> Self {
        let (r0, b0) = sbb(self.limbs[0], N[0], false);
        let (r1, b1) = sbb(self.limbs[1], N[1], b0);
        let (r2, b2) = sbb(self.limbs[2], N[2], b1);
        let (r3, _) = sbb(self.limbs[3], N[3], b2);
        Self { limbs: [r0, r1, r2, r3] }
    }

    /// Adds n to self.
    fn add_n(&self) -> Self {
        let (r0, c0) = adc(self.limbs[0], N[0], false);
        let (r1, c1) = adc(self.limbs[1], N[1], c0);
        let (r2, c2) = adc(self.limbs[2], N[2], c1);
        let (r3, _) = adc(self.limbs[3], N[3], c2);
        Self { limbs: [r0, r1, r2, r3] }
    }

    /// Subtraction: self - other (mod n).
    pub fn sub(&self, other: &Self) -> Self {
        let (r0, b0) = sbb(self.limbs[0], other.limbs[0], false);
        let (r1, b1) = sbb(self.limbs[1], other.limbs[1], b0);
        let (r2, b2) = sbb(self.limbs[2], other.limbs[2], b1);
        let (r3, b3) = sbb(self.limbs[3], other.limbs[3], b2);

        let mut result = Self { limbs: [r0, r1, r2, r3] };

        if b3 {
            result = result.add_n();
        }

        result
    }

    /// Negation: -self (mod n).
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            let (r0, b0) = sbb(N[0], self.limbs[0], false);
            let (r1, b1) = sbb(N[1], self.limbs[1], b0);
            let (r2, b2) = sbb(N[2], self.limbs[2], b1);
            let (r3, _) = sbb(N[3], self.limbs[3], b2);
            Self { limbs: [r0, r1, r2, r3] }
        }
    }

    /// Multiplication: self * other (mod n).
    pub fn mul(&self, other: &Self) -> Self {
        // 512-bit product as 8x64 limbs (little endian)
        let mut wide = [0u64; 8];

        for i in 0..4 {
            let mut carry: u128 = 0;

            for j in 0..4 {
                let idx = i + j;
                let prod = (self.limbs[i] as u128) * (other.limbs[j] as u128);
                let lo = prod as u64;
                let hi = (prod >> 64) as u64;

                let acc = (wide[idx] as u128) + (lo as u128) + carry;
                wide[idx] = acc as u64;
                carry = (acc >> 64) + (hi as u128);
            }

            let mut k = i + 4;
            while carry != 0 {
                debug_assert!(k < 8, "512-bit multiply overflow");
                let acc = (wide[k] as u128) + carry;
                wide[k] = acc as u64;
                carry = acc >> 64;
                k += 1;
            }
        }

        Self::reduce_wide(&wide)
    }

    /// Reduces a 512-bit number mod n using bit-by-bit reduction.
    /// Uses rem = (rem * 2 + bit) mod n, processing from MSB to LSB.
    fn reduce_wide(wide: &[u64; 8]) -> Self {
        let mut rem = Self::ZERO;

        for limb_idx in (0..8).rev() {
            let limb = wide[limb_idx];
            for bit_idx in (0..64).rev() {
                rem = rem.add(&rem);
                if ((limb >> bit_idx) & 1) == 1 {
                    rem = rem.add(&Self::ONE);
                }
            }
        }

        rem
    }

    /// Square: self^2 (mod n).
    pub fn square(&self) -> Self { self.mul(self) }

    /// Exponentiation: self^exp (mod n).
    fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        for &limb in exp.iter() {
            for bit in 0..64 {
                if (limb >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
                base = base.square();
            }
        }

        result
    }

    /// Multiplicative inverse: self^(-1) (mod n).
    /// Uses Fermat's little theorem: a^(-1) = a^(n-2) mod n.
    pub fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.pow(&N_MINUS_2))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
