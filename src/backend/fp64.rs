//! Portable 64-bit finite field arithmetic for p = 2^372 * 3^239 - 1.
//!
//! Field elements are held in Montgomery form with R = 2^768 and kept in
//! the range [0, 2p) between operations; only the wire encoding performs
//! the final strong reduction to [0, p). All limb-level helpers are
//! branch-free in the operand values.

use core::fmt::Debug;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

/// Number of 64-bit limbs in a field element.
pub const FP_NUM_WORDS: usize = 12;
/// Number of 64-bit limbs in a 48-byte scalar.
pub const SCALAR_NUM_WORDS: usize = 6;

// Limbs of p+1 = 2^372 * 3^239 below this index are zero; the Montgomery
// reduction skips the corresponding partial products.
const PRIME_ZERO_WORDS: usize = 5;

const PRIME: [u64; FP_NUM_WORDS] = [
    0xffffffffffffffff, 0xffffffffffffffff, 0xffffffffffffffff, 0xffffffffffffffff,
    0xffffffffffffffff, 0xeeafffffffffffff, 0xe3ec968549f878a8, 0xda959b1a13f7cc76,
    0x084e9867d6ebe876, 0x8562b5045cb25748, 0x0e12909f97badc66, 0x00006fe5d541f71c,
];
const PRIME_P1: [u64; FP_NUM_WORDS] = [
    0x0, 0x0, 0x0, 0x0,
    0x0, 0xeeb0000000000000, 0xe3ec968549f878a8, 0xda959b1a13f7cc76,
    0x084e9867d6ebe876, 0x8562b5045cb25748, 0x0e12909f97badc66, 0x00006fe5d541f71c,
];
const PRIME_X2: [u64; FP_NUM_WORDS] = [
    0xfffffffffffffffe, 0xffffffffffffffff, 0xffffffffffffffff, 0xffffffffffffffff,
    0xffffffffffffffff, 0xdd5fffffffffffff, 0xc7d92d0a93f0f151, 0xb52b363427ef98ed,
    0x109d30cfadd7d0ed, 0x0ac56a08b964ae90, 0x1c25213f2f75b8cd, 0x0000dfcbaa83ee38,
];

/// `2^768 mod p`, i.e. one in Montgomery form.
pub const MONTGOMERY_R: FpElement = FpElement([
    0x00000000000249ad, 0x0, 0x0, 0x0,
    0x0, 0x8310000000000000, 0x5527b1e4375c6c66, 0x697797bf3f4f24d0,
    0xc89db7b2ac5c4e2e, 0x4ca4b439d2076956, 0x10f7926c7512c7e9, 0x00002d5b24bce5e2,
]);

/// `(2^768)^2 mod p`, used to convert into Montgomery form.
pub const MONTGOMERY_RSQ: FpElement = FpElement([
    0x233046449dad4058, 0xdb010161a696452a, 0x5e36941472e3fd8e, 0xf40bfe2082a2e706,
    0x4932cca8904f8751, 0x1f735f1f1ee7fc81, 0xa24f4d80c1048e18, 0xb56c383ccdb607c5,
    0x441dd47b735f9c90, 0x5673ed2c6a6ac82a, 0x06c905261132294b, 0x000041ad830f1f35,
]);

// Return 1 if x = 0, and 0 otherwise.
#[inline(always)]
fn is_digit_zero_ct(x: u64) -> u64 {
    1 ^ ((x | x.wrapping_neg()) >> 63)
}

// Return 1 if x < y, and 0 otherwise.
#[inline(always)]
fn is_digit_lessthan_ct(x: u64, y: u64) -> u64 {
    (x ^ ((x ^ y) | (x.wrapping_sub(y) ^ y))) >> 63
}

// Full 64x64 -> 128 bit product, split into (low, high) digits.
#[inline(always)]
fn digit_x_digit(a: u64, b: u64) -> (u64, u64) {
    let uv = (a as u128) * (b as u128);
    (uv as u64, (uv >> 64) as u64)
}

// Digit addition with carry: returns (carry_out, sum).
#[inline(always)]
fn addc(carry_in: u64, addend1: u64, addend2: u64) -> (u64, u64) {
    let temp = addend1.wrapping_add(carry_in);
    let sum = addend2.wrapping_add(temp);
    let carry_out = is_digit_lessthan_ct(temp, carry_in) | is_digit_lessthan_ct(sum, temp);
    (carry_out, sum)
}

// Digit subtraction with borrow: returns (borrow_out, difference).
#[inline(always)]
fn subc(borrow_in: u64, minuend: u64, subtrahend: u64) -> (u64, u64) {
    let temp = minuend.wrapping_sub(subtrahend);
    let borrow_out =
        is_digit_lessthan_ct(minuend, subtrahend) | (borrow_in & is_digit_zero_ct(temp));
    let difference = temp.wrapping_sub(borrow_in);
    (borrow_out, difference)
}

/// Field addition, `z = x + y mod 2p`.
#[inline]
pub fn fp_add(x: &FpElement, y: &FpElement, z: &mut FpElement) {
    let mut carry: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (c, s) = addc(carry, x.0[i], y.0[i]);
        carry = c;
        z.0[i] = s;
    }

    let mut borrow: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (b, d) = subc(borrow, z.0[i], PRIME_X2[i]);
        borrow = b;
        z.0[i] = d;
    }
    let mask = borrow.wrapping_neg();

    carry = 0;
    for i in 0..FP_NUM_WORDS {
        let (c, s) = addc(carry, z.0[i], PRIME_X2[i] & mask);
        carry = c;
        z.0[i] = s;
    }
}

/// Field subtraction, `z = x - y mod 2p`.
#[inline]
pub fn fp_sub(x: &FpElement, y: &FpElement, z: &mut FpElement) {
    let mut borrow: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (b, d) = subc(borrow, x.0[i], y.0[i]);
        borrow = b;
        z.0[i] = d;
    }
    let mask = borrow.wrapping_neg();

    let mut carry: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (c, s) = addc(carry, z.0[i], PRIME_X2[i] & mask);
        carry = c;
        z.0[i] = s;
    }
}

/// Schoolbook multiplication by product scanning, `z = x * y`, no reduction.
pub fn fp_mul(x: &FpElement, y: &FpElement, z: &mut FpElementX2) {
    let mut t: u64 = 0;
    let mut u: u64 = 0;
    let mut v: u64 = 0;

    for i in 0..FP_NUM_WORDS {
        for j in 0..(i + 1) {
            let (uv0, uv1) = digit_x_digit(x.0[j], y.0[i - j]);
            let (carry, s) = addc(0, uv0, v);
            v = s;
            let (carry, s) = addc(carry, uv1, u);
            u = s;
            t += carry;
        }
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }

    for i in FP_NUM_WORDS..(2 * FP_NUM_WORDS - 1) {
        for j in (i - FP_NUM_WORDS + 1)..FP_NUM_WORDS {
            let (uv0, uv1) = digit_x_digit(x.0[j], y.0[i - j]);
            let (carry, s) = addc(0, uv0, v);
            v = s;
            let (carry, s) = addc(carry, uv1, u);
            u = s;
            t += carry;
        }
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }
    z.0[2 * FP_NUM_WORDS - 1] = v;
}

/// Montgomery reduction, `z = x R^{-1} mod p` in [0, 2p).
///
/// Exploits p + 1 = 2^372 * 3^239: the quotient digits are the low output
/// digits themselves, and partial products against the zero limbs of p+1
/// are skipped.
pub fn fp_rdc(x: &FpElementX2, z: &mut FpElement) {
    let mut t: u64 = 0;
    let mut u: u64 = 0;
    let mut v: u64 = 0;
    let mut count = PRIME_ZERO_WORDS;

    for i in 0..FP_NUM_WORDS {
        z.0[i] = 0;
    }

    for i in 0..FP_NUM_WORDS {
        for j in 0..i {
            if j + PRIME_ZERO_WORDS < i + 1 {
                let (uv0, uv1) = digit_x_digit(z.0[j], PRIME_P1[i - j]);
                let (carry, s) = addc(0, uv0, v);
                v = s;
                let (carry, s) = addc(carry, uv1, u);
                u = s;
                t += carry;
            }
        }
        let (carry, s) = addc(0, v, x.0[i]);
        v = s;
        let (carry, s) = addc(carry, u, 0);
        u = s;

        t += carry;
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }

    for i in FP_NUM_WORDS..(2 * FP_NUM_WORDS - 1) {
        if count > 0 {
            count -= 1;
        }
        for j in (i - FP_NUM_WORDS + 1)..FP_NUM_WORDS {
            if j < FP_NUM_WORDS - count {
                let (uv0, uv1) = digit_x_digit(z.0[j], PRIME_P1[i - j]);
                let (carry, s) = addc(0, uv0, v);
                v = s;
                let (carry, s) = addc(carry, uv1, u);
                u = s;
                t += carry;
            }
        }
        let (carry, s) = addc(0, v, x.0[i]);
        v = s;
        let (carry, s) = addc(carry, u, 0);
        u = s;

        t += carry;
        z.0[i - FP_NUM_WORDS] = v;
        v = u;
        u = t;
        t = 0;
    }
    let (_, s) = addc(0, v, x.0[2 * FP_NUM_WORDS - 1]);
    z.0[FP_NUM_WORDS - 1] = s;
}

/// Reduce a field element in [0, 2p) to one in [0, p).
#[inline]
pub fn fp_strong_rdc(x: &mut FpElement) {
    let mut borrow: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (b, d) = subc(borrow, x.0[i], PRIME[i]);
        borrow = b;
        x.0[i] = d;
    }
    let mask = borrow.wrapping_neg();

    let mut carry: u64 = 0;
    for i in 0..FP_NUM_WORDS {
        let (c, s) = addc(carry, x.0[i], PRIME[i] & mask);
        carry = c;
        x.0[i] = s;
    }
}

/// Double-width addition without reduction, `z = x + y`.
#[inline]
pub fn mp_add_x2(x: &FpElementX2, y: &FpElementX2, z: &mut FpElementX2) {
    let mut carry: u64 = 0;
    for i in 0..(2 * FP_NUM_WORDS) {
        let (c, s) = addc(carry, x.0[i], y.0[i]);
        carry = c;
        z.0[i] = s;
    }
}

/// Double-width subtraction, `z = x - y + p*2^768` on borrow, so the result
/// stays nonnegative and congruent after Montgomery reduction.
pub fn mp_sub_x2(x: &FpElementX2, y: &FpElementX2, z: &mut FpElementX2) {
    let mut borrow: u64 = 0;
    for i in 0..(2 * FP_NUM_WORDS) {
        let (b, d) = subc(borrow, x.0[i], y.0[i]);
        borrow = b;
        z.0[i] = d;
    }
    let mask = borrow.wrapping_neg();

    let mut carry: u64 = 0;
    for i in FP_NUM_WORDS..(2 * FP_NUM_WORDS) {
        let (c, s) = addc(carry, z.0[i], PRIME[i - FP_NUM_WORDS] & mask);
        carry = c;
        z.0[i] = s;
    }
}

fn scalar_to_words(scalar: &[u8; 48]) -> [u64; SCALAR_NUM_WORDS] {
    let mut words = [0u64; SCALAR_NUM_WORDS];
    for i in 0..48 {
        words[i / 8] |= (scalar[i] as u64) << (8 * (i % 8));
    }
    words
}

/// Set `result` to zero if the 48-byte little-endian scalar is <= bound,
/// and to an all-ones mask otherwise.
pub fn scalar_checklt(scalar: &[u8; 48], bound: &[u64; SCALAR_NUM_WORDS], result: &mut u64) {
    let words = scalar_to_words(scalar);

    let mut borrow: u64 = 0;
    for i in 0..SCALAR_NUM_WORDS {
        let (b, _) = subc(borrow, bound[i], words[i]);
        borrow = b;
    }
    *result = borrow.wrapping_neg();
}

/// Set `scalar = 3 * scalar` in place (48-byte little-endian).
pub fn scalar_mulby3(scalar: &mut [u8; 48]) {
    let mut words = scalar_to_words(scalar);

    let temp = words;
    let mut carry: u64 = 0;
    for i in 0..SCALAR_NUM_WORDS {
        let (c, s) = addc(carry, words[i], temp[i]);
        carry = c;
        words[i] = s;
    }
    carry = 0;
    for i in 0..SCALAR_NUM_WORDS {
        let (c, s) = addc(carry, words[i], temp[i]);
        carry = c;
        words[i] = s;
    }

    for i in 0..48 {
        scalar[i] = (words[i / 8] >> (8 * (i % 8))) as u8;
    }
}

/// An element of F_p in Montgomery form, 12 little-endian 64-bit limbs.
#[derive(Copy, Clone)]
pub struct FpElement(pub(crate) [u64; FP_NUM_WORDS]);

impl ConditionallySelectable for FpElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u64; FP_NUM_WORDS];
        for i in 0..FP_NUM_WORDS {
            limbs[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FpElement(limbs)
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        for i in 0..FP_NUM_WORDS {
            u64::conditional_swap(&mut a.0[i], &mut b.0[i], choice);
        }
    }
}

impl ConstantTimeEq for FpElement {
    fn ct_eq(&self, other: &FpElement) -> Choice {
        self.to_bytes()[..].ct_eq(&other.to_bytes()[..])
    }
}

impl Debug for FpElement {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "FpElement({:?})", &self.0[..])
    }
}

#[cfg(test)]
impl Arbitrary for FpElement {
    fn arbitrary(g: &mut Gen) -> FpElement {
        // Generation strategy: low limbs taken from [0,2^64), high limb
        // taken from a smaller range.
        //
        // Field elements live in [0,2p). Emulate this by capping the high
        // limb by the top digit of 2*p-1:
        //
        // sage: (2*p-1).digits(2^64)[-1]
        // 246065832128056
        //
        // This still allows generating values >= 2p, but the excess is
        // small.
        let mut limbs = [0u64; FP_NUM_WORDS];
        for limb in limbs.iter_mut().take(FP_NUM_WORDS - 1) {
            *limb = u64::arbitrary(g);
        }
        limbs[FP_NUM_WORDS - 1] = u64::arbitrary(g) % 246065832128056;
        FpElement(limbs)
    }
}

impl FpElement {
    /// Construct a zero `FpElement`.
    pub const fn zero() -> FpElement {
        FpElement([0; FP_NUM_WORDS])
    }
    /// Given an `FpElement` in Montgomery form, convert to little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 94] {
        let mut bytes = [0u8; 94];
        let mut aR = FpElementX2::zero();

        aR.0[..FP_NUM_WORDS].copy_from_slice(&self.0);
        let mut a = aR.reduce(); // = a mod p in [0, 2p)
        a = a.strong_reduce();   // = a mod p in [0, p)

        // 8*12 = 96, but the top two bytes are dropped since p has 751 < 752 = 94*8 bits.
        for i in 0..94 {
            bytes[i] = (a.0[i / 8] >> (8 * (i % 8))) as u8;
        }
        bytes
    }
    /// Read an `FpElement` from little-endian bytes and convert to Montgomery form.
    pub fn from_bytes(bytes: &[u8]) -> FpElement {
        assert!(bytes.len() >= 94, "Too short input to FpElement from_bytes, expected 94 bytes");

        let mut a = FpElement::zero();
        for i in 0..94 {
            a.0[i / 8] |= (bytes[i] as u64) << (8 * (i % 8));
        }

        let aRR = &a * &MONTGOMERY_RSQ; // = a*R*R
        aRR.reduce()                    // = a*R mod p
    }
}

/// An unreduced double-width product of two `FpElement`s, 24 limbs.
#[derive(Copy, Clone)]
pub struct FpElementX2(pub(crate) [u64; 2 * FP_NUM_WORDS]);

impl Debug for FpElementX2 {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "FpElementX2({:?})", &self.0[..])
    }
}

impl FpElementX2 {
    /// Construct a zero `FpElementX2`.
    pub const fn zero() -> FpElementX2 {
        FpElementX2([0; 2 * FP_NUM_WORDS])
    }
}
