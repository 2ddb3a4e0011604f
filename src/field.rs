//! Finite field arithmetic for the p751 key exchange: the quadratic
//! extension F_{p^2} = F_p[i]/(i^2+1) and the prime field beneath it.
//!
//! Elements are kept in Montgomery form throughout; nothing here is part of
//! the public API.

use core::fmt::Debug;

use core::cmp::{Eq, PartialEq};

use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::{Sub, SubAssign};
use core::ops::Neg;

use subtle::{Choice, ConditionallySelectable};

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::backend::fp64::*;

//-----------------------------------------------------------------------------//
//                           Extension Field                                   //
//-----------------------------------------------------------------------------//

/// An element re + im*i of the extension field F_{p^2}, with both
/// components in Montgomery form.
#[derive(Copy, Clone, PartialEq)]
pub struct Fp2Element {
    pub re: FpElement,
    pub im: FpElement,
}

impl<'b> AddAssign<&'b Fp2Element> for Fp2Element {
    fn add_assign(&mut self, _rhs: &'b Fp2Element) {
        let result = (self as &Fp2Element) + _rhs;
        *self = result;
    }
}

impl<'a, 'b> Add<&'b Fp2Element> for &'a Fp2Element {
    type Output = Fp2Element;
    fn add(self, _rhs: &'b Fp2Element) -> Fp2Element {
        Fp2Element {
            re: &self.re + &_rhs.re,
            im: &self.im + &_rhs.im,
        }
    }
}

impl<'b> SubAssign<&'b Fp2Element> for Fp2Element {
    fn sub_assign(&mut self, _rhs: &'b Fp2Element) {
        let result = (self as &Fp2Element) - _rhs;
        *self = result;
    }
}

impl<'a, 'b> Sub<&'b Fp2Element> for &'a Fp2Element {
    type Output = Fp2Element;
    fn sub(self, _rhs: &'b Fp2Element) -> Fp2Element {
        Fp2Element {
            re: &self.re - &_rhs.re,
            im: &self.im - &_rhs.im,
        }
    }
}

impl<'b> MulAssign<&'b Fp2Element> for Fp2Element {
    fn mul_assign(&mut self, _rhs: &'b Fp2Element) {
        let result = (self as &Fp2Element) * _rhs;
        *self = result;
    }
}

impl<'a, 'b> Mul<&'b Fp2Element> for &'a Fp2Element {
    type Output = Fp2Element;
    fn mul(self, _rhs: &'b Fp2Element) -> Fp2Element {
        // Karatsuba: for (a + bi)(c + di), the cross term satisfies
        // a*d + b*c = (b - a)*(c - d) + a*c + b*d, so three base-field
        // multiplications suffice. The double-width products accumulate
        // unreduced and each component pays one Montgomery reduction.
        let ac = &self.re * &_rhs.re;
        let bd = &self.im * &_rhs.im;
        let mut cross = &(&self.im - &self.re) * &(&_rhs.re - &_rhs.im);
        cross += &ac;
        cross += &bd;
        let ac_minus_bd = &ac - &bd;

        Fp2Element {
            re: ac_minus_bd.reduce(),
            im: cross.reduce(),
        }
    }
}

impl<'a> Neg for &'a Fp2Element {
    type Output = Fp2Element;
    fn neg(self) -> Fp2Element {
        &Fp2Element::zero() - self
    }
}

impl ConditionallySelectable for Fp2Element {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp2Element {
            re: FpElement::conditional_select(&a.re, &b.re, choice),
            im: FpElement::conditional_select(&a.im, &b.im, choice),
        }
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        FpElement::conditional_swap(&mut a.re, &mut b.re, choice);
        FpElement::conditional_swap(&mut a.im, &mut b.im, choice);
    }
}

impl Debug for Fp2Element {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Fp2Element(re: {:?}\nim: {:?})", &self.re.0[..], &self.im.0[..])
    }
}

#[cfg(test)]
impl Arbitrary for Fp2Element {
    fn arbitrary(g: &mut Gen) -> Fp2Element {
        Fp2Element {
            re: FpElement::arbitrary(g),
            im: FpElement::arbitrary(g),
        }
    }
}

impl Fp2Element {
    /// Construct a zero `Fp2Element`.
    pub const fn zero() -> Fp2Element {
        Fp2Element {
            re: FpElement::zero(),
            im: FpElement::zero(),
        }
    }
    /// Construct a one `Fp2Element`.
    pub const fn one() -> Fp2Element {
        Fp2Element {
            re: MONTGOMERY_R,
            im: FpElement::zero(),
        }
    }
    /// Set output to `1/x`.
    pub fn inv(&self) -> Fp2Element {
        // 1/(a + bi) = (a - bi)/(a^2 + b^2): one conjugation plus a single
        // inversion of the norm down in the prime field.
        let mut norm = &self.re * &self.re;
        norm += &(&self.im * &self.im);
        let norm = PrimeFieldElement { a: norm.reduce() };
        let norm_inv = norm.inv();

        let re = &self.re * &norm_inv.a;
        let neg_im = -(&self.im);
        let im = &neg_im * &norm_inv.a;

        Fp2Element {
            re: re.reduce(),
            im: im.reduce(),
        }
    }
    /// Set (y1, y2, y3) = (1/x1, 1/x2, 1/x3) with a single field inversion,
    /// using Montgomery's simultaneous-inversion trick.
    ///
    /// All three inputs must be nonzero; the caller checks this.
    pub fn inv_3_way(x1: &Fp2Element, x2: &Fp2Element, x3: &Fp2Element) ->
                (Fp2Element, Fp2Element, Fp2Element)
    {
        let x1x2 = x1 * x2;     // x1*x2
        let mut t = &x1x2 * x3;
        t = t.inv();            // 1/(x1*x2*x3)
        let y1 = &(&t * x2) * x3; // 1/x1
        let y2 = &(&t * x1) * x3; // 1/x2
        let y3 = &t * &x1x2;      // 1/x3

        (y1, y2, y3)
    }
    /// Set the output to `x^2`.
    pub fn square(&self) -> Fp2Element {
        // (a + bi)^2 = (a + b)(a - b) + 2ab*i, two multiplications instead
        // of the generic three.
        let a2 = &self.re + &self.re;
        let re = &(&self.re + &self.im) * &(&self.re - &self.im);
        let im = &a2 * &self.im;

        Fp2Element {
            re: re.reduce(),
            im: im.reduce(),
        }
    }
    /// Returns true if both sides are equal. Takes variable time.
    pub fn vartime_eq(&self, _rhs: &Fp2Element) -> bool {
        (self.re == _rhs.re) && (self.im == _rhs.im)
    }
    /// Convert the input to wire format.
    pub fn to_bytes(&self) -> [u8; 188] {
        let mut bytes = [0u8; 188];
        bytes[0..94].clone_from_slice(&self.re.to_bytes());
        bytes[94..188].clone_from_slice(&self.im.to_bytes());
        bytes
    }
    /// Read 188 bytes into an `Fp2Element`.
    pub fn from_bytes(bytes: &[u8]) -> Fp2Element {
        assert!(bytes.len() >= 188, "Too short input to Fp2Element from_bytes, expected 188 bytes");
        Fp2Element {
            re: FpElement::from_bytes(&bytes[0..94]),
            im: FpElement::from_bytes(&bytes[94..188]),
        }
    }
}

//-----------------------------------------------------------------------------//
//                             Prime Field                                     //
//-----------------------------------------------------------------------------//

/// An element of the prime field F_p, in Montgomery form.
#[derive(Copy, Clone, PartialEq)]
pub struct PrimeFieldElement {
    pub a: FpElement,
}

impl<'b> AddAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn add_assign(&mut self, _rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) + _rhs;
        self.a = result.a;
    }
}

impl<'a, 'b> Add<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn add(self, _rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        PrimeFieldElement { a: &self.a + &_rhs.a }
    }
}

impl<'b> SubAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn sub_assign(&mut self, _rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) - _rhs;
        self.a = result.a;
    }
}

impl<'a, 'b> Sub<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn sub(self, _rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        PrimeFieldElement { a: &self.a - &_rhs.a }
    }
}

impl<'b> MulAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn mul_assign(&mut self, _rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) * _rhs;
        self.a = result.a;
    }
}

impl<'a, 'b> Mul<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn mul(self, _rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        let ab = &self.a * &_rhs.a;
        PrimeFieldElement { a: ab.reduce() }
    }
}

impl<'a> Neg for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn neg(self) -> PrimeFieldElement {
        &PrimeFieldElement::zero() - self
    }
}

impl ConditionallySelectable for PrimeFieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        PrimeFieldElement {
            a: FpElement::conditional_select(&a.a, &b.a, choice),
        }
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        FpElement::conditional_swap(&mut a.a, &mut b.a, choice);
    }
}

impl Debug for PrimeFieldElement {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PrimeFieldElement(a: {:?})", &self.a.0[..])
    }
}

#[cfg(test)]
impl Arbitrary for PrimeFieldElement {
    fn arbitrary(g: &mut Gen) -> PrimeFieldElement {
        PrimeFieldElement { a: FpElement::arbitrary(g) }
    }
}

impl PrimeFieldElement {
    /// Construct a zero `PrimeFieldElement`.
    pub const fn zero() -> PrimeFieldElement {
        PrimeFieldElement { a: FpElement::zero() }
    }
    /// Construct a one `PrimeFieldElement`.
    pub const fn one() -> PrimeFieldElement {
        PrimeFieldElement { a: MONTGOMERY_R }
    }
    /// Set the output to `x^2`.
    pub fn square(&self) -> PrimeFieldElement {
        let ab = &self.a * &self.a;
        PrimeFieldElement { a: ab.reduce() }
    }
    /// Raise self to the `2^k`-th power, for `k >= 1`, by repeated squarings.
    fn pow2k(&self, k: u8) -> PrimeFieldElement {
        let mut result = self.square();
        for _ in 1..k {
            result = result.square();
        }
        result
    }
    /// Set output to `x^((p-3)/4)`. If `x` is square, this is `1/sqrt(x)`.
    fn p34(&self) -> PrimeFieldElement {
        // Sliding-window addition chain for the fixed exponent (p-3)/4,
        // precomputed offline: 744 squarings and 137 window multiplications,
        // plus one squaring and 15 multiplications for the odd-power table.
        let pow_strategy: [u8; 137] = [5, 7, 6, 2, 10, 4, 6, 9, 8, 5, 9, 4, 7, 5, 5, 4, 8, 3, 9, 5, 5, 4, 10, 4, 6, 6, 6, 5, 8, 9, 3, 4, 9, 4, 5, 6, 6, 2, 9, 4, 5, 5, 5, 7, 7, 9, 4, 6, 4, 8, 5, 8, 6, 6, 2, 9, 7, 4, 8, 8, 8, 4, 6, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 2];
        let mul_strategy: [u8; 137] = [31, 23, 21, 1, 31, 7, 7, 7, 9, 9, 19, 15, 23, 23, 11, 7, 25, 5, 21, 17, 11, 5, 17, 7, 11, 9, 23, 9, 1, 19, 5, 3, 25, 15, 11, 29, 31, 1, 29, 11, 13, 9, 11, 27, 13, 19, 15, 31, 3, 29, 23, 31, 25, 11, 1, 21, 19, 15, 15, 21, 29, 13, 23, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 31, 3];
        let initial_mul: u8 = 27;

        // Window table of the odd powers x, x^3, ..., x^31, indexed so that
        // table[w/2] = x^w for odd w.
        let mut table = [PrimeFieldElement::zero(); 16];
        let xsq = self.square();
        table[0] = *self;
        for i in 1..16 {
            table[i] = &table[i - 1] * &xsq;
        }

        let mut result = table[(initial_mul / 2) as usize];
        for i in 0..137 {
            result = result.pow2k(pow_strategy[i]);
            result = &result * &table[(mul_strategy[i] / 2) as usize];
        }
        result
    }
    /// Set output to `sqrt(x)`, if x is a square. If `x` is nonsquare the
    /// output is undefined.
    #[cfg(test)]
    pub fn sqrt(&self) -> PrimeFieldElement {
        // x^((p+1)/4) = x * x^((p-3)/4), which squares back to x whenever
        // x is a square (p = 3 mod 4).
        &self.p34() * self
    }
    /// Set output to `1/x`.
    pub fn inv(&self) -> PrimeFieldElement {
        // x^(p-2) = ((x^2)^((p-3)/4))^2 * x.
        &self.square().p34().square() * self
    }
    /// Returns true if both sides are equal. Takes variable time.
    #[cfg(test)]
    pub fn vartime_eq(&self, _rhs: &PrimeFieldElement) -> bool {
        self.a == _rhs.a
    }
}

//-----------------------------------------------------------------------------//
//                              Internals                                      //
//-----------------------------------------------------------------------------//

impl<'b> AddAssign<&'b FpElement> for FpElement {
    fn add_assign(&mut self, _rhs: &'b FpElement) {
        let result = (self as &FpElement) + _rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Add<&'b FpElement> for &'a FpElement {
    type Output = FpElement;
    fn add(self, _rhs: &'b FpElement) -> FpElement {
        let mut result = FpElement::zero();
        fp_add(self, _rhs, &mut result);
        result
    }
}

impl<'b> SubAssign<&'b FpElement> for FpElement {
    fn sub_assign(&mut self, _rhs: &'b FpElement) {
        let result = (self as &FpElement) - _rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Sub<&'b FpElement> for &'a FpElement {
    type Output = FpElement;
    fn sub(self, _rhs: &'b FpElement) -> FpElement {
        let mut result = FpElement::zero();
        fp_sub(self, _rhs, &mut result);
        result
    }
}

impl<'a, 'b> Mul<&'b FpElement> for &'a FpElement {
    type Output = FpElementX2;
    fn mul(self, _rhs: &'b FpElement) -> FpElementX2 {
        let mut result = FpElementX2::zero();
        fp_mul(self, _rhs, &mut result);
        result
    }
}

impl<'a> Neg for &'a FpElement {
    type Output = FpElement;
    fn neg(self) -> FpElement {
        &FpElement::zero() - self
    }
}

impl Eq for FpElement {}
impl PartialEq for FpElement {
    /// Test equality between two `FpElement`s.
    ///
    /// # Warning
    ///
    /// This comparison is *not* constant time.
    fn eq(&self, other: &FpElement) -> bool {
        let _self = self.strong_reduce();
        let _other = other.strong_reduce();

        let mut eq: bool = true;
        for i in 0..FP_NUM_WORDS {
            eq = (_self.0[i] == _other.0[i]) && eq;
        }
        eq
    }
}

impl FpElement {
    /// Reduce a field element in `[0, 2*p)` to one in `[0,p)`.
    pub fn strong_reduce(&self) -> FpElement {
        let mut _self = *self;
        fp_strong_rdc(&mut _self);
        _self
    }
}

impl<'b> AddAssign<&'b FpElementX2> for FpElementX2 {
    fn add_assign(&mut self, _rhs: &'b FpElementX2) {
        let result = (self as &FpElementX2) + _rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Add<&'b FpElementX2> for &'a FpElementX2 {
    type Output = FpElementX2;
    fn add(self, _rhs: &'b FpElementX2) -> FpElementX2 {
        let mut result = FpElementX2::zero();
        mp_add_x2(self, _rhs, &mut result);
        result
    }
}

impl<'b> SubAssign<&'b FpElementX2> for FpElementX2 {
    fn sub_assign(&mut self, _rhs: &'b FpElementX2) {
        let result = (self as &FpElementX2) - _rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Sub<&'b FpElementX2> for &'a FpElementX2 {
    type Output = FpElementX2;
    fn sub(self, _rhs: &'b FpElementX2) -> FpElementX2 {
        let mut result = FpElementX2::zero();
        mp_sub_x2(self, _rhs, &mut result);
        result
    }
}

impl FpElementX2 {
    /// Perform Montgomery reduction, `x R^{-1} (mod p)`.
    pub fn reduce(&self) -> FpElement {
        let mut result = FpElement::zero();
        fp_rdc(self, &mut result);
        result
    }
}
