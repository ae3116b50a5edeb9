// SPDX-License-Identifier: CC0-1.0

//! Elliptic curve point operations.
//!
//! secp256k1 curve: y² = x³ + 7 over GF(p). The public [`Point`] type is an
//! affine tagged variant; group arithmetic runs in Jacobian coordinates
//! internally, where (X, Y, Z) represents the affine point (X/Z², Y/Z³).

use super::field::FieldElement;
use super::scalar::Scalar;

/// Generator point G (affine x-coordinate).
const GX: [u64; 4] = [
    0x59F2815B16F81798,
    0x029BFCDB2DCE28D9,
    0x55A06295CE870B07,
    0x79BE667EF9DCBBAC,
];

/// Generator point G (affine y-coordinate).
const GY: [u64; 4] = [
    0x9C47D08FFB10D4B8,
    0xFD17B448A6855419,
    0x5DA4FBFC0E1108A8,
    0x483ADA7726A3C465,
];

/// A point on secp256k1, or the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Point {
    /// The identity element of the group.
    Infinity,
    /// An affine point (x, y).
    Affine {
        /// The x coordinate.
        x: FieldElement,
        /// The y coordinate.
        y: FieldElement,
    },
}

impl Point {
    /// The standard secp256k1 base point.
    pub const GENERATOR: Self = Point::Affine {
        x: FieldElement::from_limbs(GX),
        y: FieldElement::from_limbs(GY),
    };

    /// Creates an affine point from coordinates.
    ///
    /// Does not check that the point is on the curve.
    pub fn from_affine(x: FieldElement, y: FieldElement) -> Self { Point::Affine { x, y } }

    /// Checks if this is the point at infinity.
    pub fn is_infinity(&self) -> bool { matches!(self, Point::Infinity) }

    /// The x coordinate, or `None` for the point at infinity.
    pub fn x(&self) -> Option<&FieldElement> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    /// The y coordinate, or `None` for the point at infinity.
    pub fn y(&self) -> Option<&FieldElement> {
        match self {
            Point::Infinity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }

    /// Checks the curve equation y² = x³ + 7.
    ///
    /// The point at infinity is not on the curve.
    pub fn is_on_curve(&self) -> bool {
        match self {
            Point::Infinity => false,
            Point::Affine { x, y } => {
                let y2 = y.square();
                let x3_plus_7 = x.square().mul(x).add(&FieldElement::from_limbs([7, 0, 0, 0]));
                y2 == x3_plus_7
            }
        }
    }

    /// Point addition: self + other.
    pub fn add(&self, other: &Self) -> Self {
        Jacobian::from(*self).add(&Jacobian::from(*other)).to_point()
    }

    /// Point doubling: 2·self.
    pub fn double(&self) -> Self { Jacobian::from(*self).double().to_point() }

    /// Scalar multiplication: k·self.
    pub fn mul(&self, k: &Scalar) -> Self {
        Jacobian::from(*self).mul_bits(&k.to_be_bytes()).to_point()
    }

    /// Simultaneous multiplication: u·G + v·self.
    pub fn lincomb(u: &Scalar, v: &Scalar, q: &Point) -> Self {
        let ug = Jacobian::from(Point::GENERATOR).mul_bits(&u.to_be_bytes());
        let vq = Jacobian::from(*q).mul_bits(&v.to_be_bytes());
        ug.add(&vq).to_point()
    }

    /// Multiplication by the raw 256-bit integer encoded in `bytes`
    /// (big-endian), without reduction mod n.
    ///
    /// Needed for the n·R = ∞ order check during public-key recovery, since
    /// n itself is not representable as a [`Scalar`].
    pub fn mul_bits(&self, bytes: &[u8; 32]) -> Self {
        Jacobian::from(*self).mul_bits(bytes).to_point()
    }

    /// Lifts a point from its x coordinate and the parity of y.
    ///
    /// Returns `None` when x³ + 7 is not a quadratic residue.
    pub fn lift_x(x: &FieldElement, y_is_odd: bool) -> Option<Self> {
        let y2 = x.square().mul(x).add(&FieldElement::from_limbs([7, 0, 0, 0]));
        let mut y = y2.sqrt()?;
        if y.is_odd() != y_is_odd {
            y = y.neg();
        }
        Some(Point::Affine { x: *x, y })
    }
}

/// Point in Jacobian coordinates. The point at infinity has Z = 0.
#[derive(Clone, Copy)]
struct Jacobian {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl From<Point> for Jacobian {
    fn from(p: Point) -> Self {
        match p {
            Point::Infinity => Jacobian {
                x: FieldElement::ONE,
                y: FieldElement::ONE,
                z: FieldElement::ZERO,
            },
            Point::Affine { x, y } => Jacobian { x, y, z: FieldElement::ONE },
        }
    }
}

impl Jacobian {
    const INFINITY: Self = Jacobian {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    fn is_infinity(&self) -> bool { self.z.is_zero() }

    /// Normalizes back to the affine form.
    fn to_point(self) -> Point {
        if self.is_infinity() {
            return Point::Infinity;
        }

        let z_inv = self.z.invert().expect("non-zero z");
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);

        Point::Affine { x: self.x.mul(&z_inv2), y: self.y.mul(&z_inv3) }
    }

    /// Point doubling, standard Jacobian formulas for a = 0 curves.
    fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        // S = 4*X*Y²
        let y2 = self.y.square();
        let s = self.x.mul(&y2).mul(&FieldElement::from_limbs([4, 0, 0, 0]));

        // M = 3*X² (since a=0 for secp256k1)
        let m = self.x.square().mul(&FieldElement::from_limbs([3, 0, 0, 0]));

        // X3 = M² - 2*S
        let x3 = m.square().sub(&s).sub(&s);

        // Y3 = M*(S - X3) - 8*Y⁴
        let y4_8 = y2.square().mul(&FieldElement::from_limbs([8, 0, 0, 0]));
        let y3 = m.mul(&s.sub(&x3)).sub(&y4_8);

        // Z3 = 2*Y*Z
        let z3 = self.y.mul(&self.z).mul(&FieldElement::from_limbs([2, 0, 0, 0]));

        Jacobian { x: x3, y: y3, z: z3 }
    }

    /// Point addition, standard Jacobian formulas.
    fn add(&self, other: &Self) -> Self {
        if self.is_infinity() {
            return *other;
        }
        if other.is_infinity() {
            return *self;
        }

        let z1_2 = self.z.square();
        let z2_2 = other.z.square();
        let z1_3 = z1_2.mul(&self.z);
        let z2_3 = z2_2.mul(&other.z);

        // U1 = X1*Z2², U2 = X2*Z1²
        let u1 = self.x.mul(&z2_2);
        let u2 = other.x.mul(&z1_2);

        // S1 = Y1*Z2³, S2 = Y2*Z1³
        let s1 = self.y.mul(&z2_3);
        let s2 = other.y.mul(&z1_3);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            if r.is_zero() {
                // Points are equal, do doubling
                return self.double();
            } else {
                // Points are inverses
                return Self::INFINITY;
            }
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);

        // X3 = R² - H³ - 2*U1*H²
        let u1_h2 = u1.mul(&h2);
        let x3 = r.square().sub(&h3).sub(&u1_h2).sub(&u1_h2);

        // Y3 = R*(U1*H² - X3) - S1*H³
        let y3 = r.mul(&u1_h2.sub(&x3)).sub(&s1.mul(&h3));

        // Z3 = H*Z1*Z2
        let z3 = h.mul(&self.z).mul(&other.z);

        Jacobian { x: x3, y: y3, z: z3 }
    }

    /// Double-and-add over the big-endian bit string, LSB first.
    ///
    /// No allocation inside the loop.
    fn mul_bits(&self, bytes: &[u8; 32]) -> Self {
        if self.is_infinity() {
            return Self::INFINITY;
        }

        let mut result = Self::INFINITY;
        let mut base = *self;

        for byte in bytes.iter().rev() {
            let b = *byte;
            for bit in 0..8 {
                if ((b >> bit) & 1) == 1 {
                    result = result.add(&base);
                }
                base = base.double();
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::hex::FromHex;

    fn b32(s: &str) -> [u8; 32] {
        let v = Vec::from_hex(s).unwrap();
        let mut a = [0u8; 32];
        a.copy_from_slice(&v);
        a
    }

    fn scalar(s: &str) -> Scalar { Scalar::from_be_bytes(&b32(s)).unwrap() }

    fn fe(s: &str) -> FieldElement { FieldElement::from_be_bytes(&b32(s)).unwrap() }

    #[test]
    fn generator_on_curve() {
        assert!(Point::GENERATOR.is_on_curve());
        assert!(!Point::Infinity.is_on_curve());
    }

    #[test]
    fn infinity_identity() {
        let g = Point::GENERATOR;
        let inf = Point::Infinity;

        assert_eq!(g.add(&inf), g);
        assert_eq!(inf.add(&g), g);
        assert!(inf.add(&inf).is_infinity());
    }

    #[test]
    fn double_matches_add() {
        let g = Point::GENERATOR;
        let g2 = g.double();
        assert!(g2.is_on_curve());
        assert_eq!(g.add(&g), g2);
    }

    #[test]
    fn fixed_multiples_of_g() {
        // independently computed multiples of the generator
        let g2 = Point::GENERATOR.mul(&scalar(
            "0000000000000000000000000000000000000000000000000000000000000002",
        ));
        assert_eq!(
            g2.x().unwrap(),
            &fe("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5")
        );
        assert!(!g2.y().unwrap().is_odd());

        let g3 = Point::GENERATOR.mul(&scalar(
            "0000000000000000000000000000000000000000000000000000000000000003",
        ));
        assert_eq!(
            g3.x().unwrap(),
            &fe("f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9")
        );
        assert_eq!(
            g3.y().unwrap(),
            &fe("388f7b0f632de8140fe337e62a37f3566500a99934c2231b6cb9fd7584b8e672")
        );
    }

    #[test]
    fn mul_by_order_minus_one() {
        // (n-1)·G = -G, with the generator's x and even y
        let n_minus_1 =
            scalar("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
        let p = Point::GENERATOR.mul(&n_minus_1);
        assert_eq!(p.x(), Point::GENERATOR.x());
        assert_eq!(p.y().unwrap(), &Point::GENERATOR.y().unwrap().neg());
    }

    #[test]
    fn order_annihilates() {
        // n·G = ∞ (through the unreduced bit-multiplication path)
        assert!(Point::GENERATOR.mul_bits(&Scalar::ORDER_BYTES).is_infinity());
        let q = Point::GENERATOR.double();
        assert!(q.mul_bits(&Scalar::ORDER_BYTES).is_infinity());
    }

    #[test]
    fn mul_zero_and_one() {
        assert!(Point::GENERATOR.mul(&Scalar::ZERO).is_infinity());
        assert_eq!(Point::GENERATOR.mul(&Scalar::ONE), Point::GENERATOR);
    }

    #[test]
    fn lift_x_parities() {
        let gx = *Point::GENERATOR.x().unwrap();
        let even = Point::lift_x(&gx, false).unwrap();
        assert_eq!(even, Point::GENERATOR);

        let odd = Point::lift_x(&gx, true).unwrap();
        assert!(odd.y().unwrap().is_odd());
        assert_eq!(odd.y().unwrap(), &Point::GENERATOR.y().unwrap().neg());
    }

    #[test]
    fn lift_x_nonresidue() {
        // x = 5: 5³+7 = 132 is not a square mod p
        let x = FieldElement::from_limbs([5, 0, 0, 0]);
        assert!(Point::lift_x(&x, false).is_none());
    }

    #[test]
    fn lincomb_matches_separate_muls() {
        let u = scalar("00000000000000000000000000000000000000000000000000000000000000ff");
        let v = scalar("0000000000000000000000000000000000000000000000000000000000000101");
        let q = Point::GENERATOR.mul(&scalar(
            "000000000000000000000000000000000000000000000000000000000000002a",
        ));

        let lhs = Point::lincomb(&u, &v, &q);
        let rhs = Point::GENERATOR.mul(&u).add(&q.mul(&v));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn add_inverse_is_infinity() {
        let g = Point::GENERATOR;
        let neg_g = Point::from_affine(*g.x().unwrap(), g.y().unwrap().neg());
        assert!(g.add(&neg_g).is_infinity());
    }
}
