//! Key generation and shared-secret derivation for both parties of the
//! exchange, in fast (strategy-driven) and simple (multiply-then-isogenize)
//! variants.
//!
//! The simple variants compute the same public keys and j-invariants as the
//! fast ones by the canonical recursion of depth MAX, and exist to prove
//! the walk correct and to serve as a reference.

use core::fmt::Debug;

use rand_core::{CryptoRng, RngCore};

use crate::backend::fp64::{scalar_checklt, scalar_mulby3};
use crate::constants::*;
use crate::curve::{ProjectiveCurve, ProjectivePoint};
use crate::error::SidhError;
use crate::field::{Fp2Element, PrimeFieldElement};
use crate::isogeny::{FirstFourIsogeny, FourIsogeny, ThreeIsogeny};
use crate::walk::{check_strategy, four_isogeny_walk, three_isogeny_walk};

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

/// The secret key size, in bytes.
pub const SECRET_KEY_SIZE: usize = 48;
/// The public key size, in bytes.
pub const PUBLIC_KEY_SIZE: usize = 564;
/// The shared secret size, in bytes.
pub const SHARED_SECRET_SIZE: usize = 188;

/// A derived shared secret: the wire encoding of the final j-invariant.
pub type SharedSecret = [u8; SHARED_SECRET_SIZE];

/// The base-curve generator pairs (x, y) of both parties' torsion bases on
/// E_0(F_p). A fixed instance for p751 is provided as
/// [`P751_PARAMS`](crate::P751_PARAMS).
#[derive(Copy, Clone)]
pub struct PublicParams {
    pub(crate) affine_x_pa: PrimeFieldElement,
    pub(crate) affine_y_pa: PrimeFieldElement,
    pub(crate) affine_x_pb: PrimeFieldElement,
    pub(crate) affine_y_pb: PrimeFieldElement,
}

/// Alice's public key: the images of Bob's torsion basis under her secret
/// isogeny, as affine x-coordinates.
#[derive(Copy, Clone)]
pub struct AlicePublicKey {
    pub affine_xP: Fp2Element,
    pub affine_xQ: Fp2Element,
    pub affine_xQmP: Fp2Element,
}

impl AlicePublicKey {
    /// Read a public key from a byte slice. The input must be at least 564 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> AlicePublicKey {
        assert!(bytes.len() >= PUBLIC_KEY_SIZE, "Too short input to SIDH public key from_bytes, expected 564 bytes");
        AlicePublicKey {
            affine_xP: Fp2Element::from_bytes(&bytes[0..188]),
            affine_xQ: Fp2Element::from_bytes(&bytes[188..376]),
            affine_xQmP: Fp2Element::from_bytes(&bytes[376..564]),
        }
    }
    /// Write a public key to a byte slice. The output will be 564 bytes long.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes[0..188].clone_from_slice(&self.affine_xP.to_bytes());
        bytes[188..376].clone_from_slice(&self.affine_xQ.to_bytes());
        bytes[376..564].clone_from_slice(&self.affine_xQmP.to_bytes());
        bytes
    }
}

/// Bob's public key.
#[derive(Copy, Clone)]
pub struct BobPublicKey {
    pub affine_xP: Fp2Element,
    pub affine_xQ: Fp2Element,
    pub affine_xQmP: Fp2Element,
}

impl BobPublicKey {
    /// Read a public key from a byte slice. The input must be at least 564 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> BobPublicKey {
        assert!(bytes.len() >= PUBLIC_KEY_SIZE, "Too short input to SIDH public key from_bytes, expected 564 bytes");
        BobPublicKey {
            affine_xP: Fp2Element::from_bytes(&bytes[0..188]),
            affine_xQ: Fp2Element::from_bytes(&bytes[188..376]),
            affine_xQmP: Fp2Element::from_bytes(&bytes[376..564]),
        }
    }
    /// Write a public key to a byte slice. The output will be 564 bytes long.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes[0..188].clone_from_slice(&self.affine_xP.to_bytes());
        bytes[188..376].clone_from_slice(&self.affine_xQ.to_bytes());
        bytes[376..564].clone_from_slice(&self.affine_xQmP.to_bytes());
        bytes
    }
}

/// Alice's secret key: an even scalar below 2^372, little-endian.
#[derive(Copy, Clone)]
pub struct AliceSecretKey {
    pub scalar: [u8; SECRET_KEY_SIZE],
}

impl Debug for AliceSecretKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "AliceSecretKey(scalar: {:?})", &self.scalar[..])
    }
}

/// Bob's secret key: a scalar below 3^239, little-endian.
#[derive(Copy, Clone)]
pub struct BobSecretKey {
    pub scalar: [u8; SECRET_KEY_SIZE],
}

impl Debug for BobSecretKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "BobSecretKey(scalar: {:?})", &self.scalar[..])
    }
}

fn check_alice_scalar(scalar: &[u8; SECRET_KEY_SIZE]) -> Result<(), SidhError> {
    let nonzero = scalar.iter().any(|&b| b != 0);
    // The scalar must be even and below 2^372 (bits 372.. clear).
    let in_range = scalar[47] == 0 && scalar[46] & 0xf0 == 0;
    let even = scalar[0] & 1 == 0;
    if !(nonzero && in_range && even) {
        return Err(SidhError::MalformedInput);
    }
    Ok(())
}

fn check_bob_scalar(scalar: &[u8; SECRET_KEY_SIZE]) -> Result<(), SidhError> {
    let nonzero = scalar.iter().any(|&b| b != 0);
    let mut above_order: u64 = 0;
    scalar_checklt(scalar, &THREE_239_MINUS1, &mut above_order);
    if !nonzero || above_order != 0 {
        return Err(SidhError::MalformedInput);
    }
    Ok(())
}

// Recover the curve a public-key triple lies on, rejecting triples that do
// not describe a nonsingular Montgomery curve.
fn recover_public_curve(
    affine_xP: &Fp2Element,
    affine_xQ: &Fp2Element,
    affine_xQmP: &Fp2Element,
) -> Result<ProjectiveCurve, SidhError> {
    let curve = ProjectiveCurve::recover(affine_xP, affine_xQ, affine_xQmP);
    if curve.is_singular() {
        return Err(SidhError::InvalidPublicKey);
    }
    Ok(curve)
}

// Affinely normalize the three pushed points with one shared inversion.
fn normalize_push_points(
    xP: &ProjectivePoint,
    xQ: &ProjectivePoint,
    xQmP: &ProjectivePoint,
) -> Result<(Fp2Element, Fp2Element, Fp2Element), SidhError> {
    if xP.is_degenerate() || xQ.is_degenerate() || xQmP.is_degenerate() {
        return Err(SidhError::FieldZeroDivision);
    }
    let (invZP, invZQ, invZQmP) = Fp2Element::inv_3_way(&xP.Z, &xQ.Z, &xQmP.Z);
    Ok((&xP.X * &invZP, &xQ.X * &invZQ, &xQmP.X * &invZQmP))
}

impl AliceSecretKey {
    // The starting point set of Alice's walk: Bob's torsion basis
    // (x(P_B), x(Q_B), x(Q_B - P_B)) and her secret kernel generator.
    fn starting_points(&self, params: &PublicParams) -> [ProjectivePoint; 4] {
        let xP = ProjectivePoint::from_affine_prime_field(&params.affine_x_pb); // = (x_P : 1) = x(P_B)
        let mut xQ = xP;
        xQ.X = -(&xQ.X);                                                        // = (-x_P : 1) = x(Q_B)
        let xQmP = ProjectivePoint::distort_and_difference(&params.affine_x_pb); // = x(Q_B - P_B)
        let xR = ProjectivePoint::secret_point(&params.affine_x_pa, &params.affine_y_pa, &self.scalar[..]);
        [xP, xQ, xQmP, xR]
    }
    /// Compute the public key corresponding to the secret key, walking the
    /// 4-isogeny tree along the given strategy.
    pub fn public_key(&self, params: &PublicParams, strategy: &[u8]) -> Result<AlicePublicKey, SidhError> {
        check_alice_scalar(&self.scalar)?;
        check_strategy(strategy, MAX_ALICE)?;

        let [xP, xQ, xQmP, xR] = self.starting_points(params);

        // The starting curve has a = 0, so (A:C) = (0:1); the exceptional
        // first step absorbs its 4-torsion before the uniform walk begins.
        let (mut curve, first_phi) = FirstFourIsogeny::from_curve(&ProjectiveCurve::base_curve());
        let mut push_points = [first_phi.eval(&xP), first_phi.eval(&xQ), first_phi.eval(&xQmP)];
        let mut xR = first_phi.eval(&xR);

        four_isogeny_walk(&mut curve, &mut xR, &mut push_points, strategy)?;

        let (affine_xP, affine_xQ, affine_xQmP) =
            normalize_push_points(&push_points[0], &push_points[1], &push_points[2])?;
        Ok(AlicePublicKey { affine_xP, affine_xQ, affine_xQmP })
    }
    /// Compute the public key by the multiplication-based recursion instead
    /// of a traversal strategy. Slower, but produces the identical key.
    pub fn public_key_simple(&self, params: &PublicParams) -> Result<AlicePublicKey, SidhError> {
        check_alice_scalar(&self.scalar)?;

        let [xP, xQ, xQmP, xR] = self.starting_points(params);

        let (mut curve, first_phi) = FirstFourIsogeny::from_curve(&ProjectiveCurve::base_curve());
        let mut xP = first_phi.eval(&xP);
        let mut xQ = first_phi.eval(&xQ);
        let mut xQmP = first_phi.eval(&xQmP);
        let mut xR = first_phi.eval(&xR);

        // rev() makes the loop go from 368 down to 0.
        for e in (0..(372 - 4 + 1)).rev().step_by(2) {
            let xS = xR.pow2k(&curve, e as u32);
            let (codomain, phi) = FourIsogeny::from_kernel(&xS);
            curve = codomain;

            xR = phi.eval(&xR);
            xP = phi.eval(&xP);
            xQ = phi.eval(&xQ);
            xQmP = phi.eval(&xQmP);
        }

        let (affine_xP, affine_xQ, affine_xQmP) = normalize_push_points(&xP, &xQ, &xQmP)?;
        Ok(AlicePublicKey { affine_xP, affine_xQ, affine_xQmP })
    }
    /// Compute (Alice's view of) the shared secret from Bob's public key,
    /// walking the 4-isogeny tree over his curve along the given strategy.
    pub fn shared_secret(&self, bob_public: &BobPublicKey, strategy: &[u8]) -> Result<SharedSecret, SidhError> {
        check_alice_scalar(&self.scalar)?;
        check_strategy(strategy, MAX_ALICE)?;

        let mut curve = recover_public_curve(&bob_public.affine_xP, &bob_public.affine_xQ, &bob_public.affine_xQmP)?;
        let xP = ProjectivePoint::from_affine(&bob_public.affine_xP);
        let xQ = ProjectivePoint::from_affine(&bob_public.affine_xQ);
        let xQmP = ProjectivePoint::from_affine(&bob_public.affine_xQmP);
        let xR = ProjectivePoint::right_to_left_ladder(&xP, &xQ, &xQmP, &curve, &self.scalar[..]);

        let (codomain, first_phi) = FirstFourIsogeny::from_curve(&curve);
        curve = codomain;
        let mut xR = first_phi.eval(&xR);

        four_isogeny_walk(&mut curve, &mut xR, &mut [], strategy)?;

        Ok(curve.j_invariant().to_bytes())
    }
    /// Compute the shared secret by the multiplication-based recursion.
    pub fn shared_secret_simple(&self, bob_public: &BobPublicKey) -> Result<SharedSecret, SidhError> {
        check_alice_scalar(&self.scalar)?;

        let mut curve = recover_public_curve(&bob_public.affine_xP, &bob_public.affine_xQ, &bob_public.affine_xQmP)?;
        let xP = ProjectivePoint::from_affine(&bob_public.affine_xP);
        let xQ = ProjectivePoint::from_affine(&bob_public.affine_xQ);
        let xQmP = ProjectivePoint::from_affine(&bob_public.affine_xQmP);
        let xR = ProjectivePoint::three_point_ladder(&xP, &xQ, &xQmP, &curve, &self.scalar[..]);

        let (codomain, first_phi) = FirstFourIsogeny::from_curve(&curve);
        curve = codomain;
        let mut xR = first_phi.eval(&xR);

        // rev() makes the loop go from 368 down to 2.
        for e in (2..(372 - 4 + 1)).rev().step_by(2) {
            let xS = xR.pow2k(&curve, e as u32);
            let (codomain, phi) = FourIsogeny::from_kernel(&xS);
            curve = codomain;
            xR = phi.eval(&xR);
        }

        let (codomain, _) = FourIsogeny::from_kernel(&xR);
        Ok(codomain.j_invariant().to_bytes())
    }
}

impl BobSecretKey {
    // The starting point set of Bob's walk: Alice's torsion basis and his
    // secret kernel generator.
    fn starting_points(&self, params: &PublicParams) -> [ProjectivePoint; 4] {
        let xP = ProjectivePoint::from_affine_prime_field(&params.affine_x_pa); // = (x_P : 1) = x(P_A)
        let mut xQ = xP;
        xQ.X = -(&xQ.X);                                                        // = (-x_P : 1) = x(Q_A)
        let xQmP = ProjectivePoint::distort_and_difference(&params.affine_x_pa); // = x(Q_A - P_A)
        let xR = ProjectivePoint::secret_point(&params.affine_x_pb, &params.affine_y_pb, &self.scalar[..]);
        [xP, xQ, xQmP, xR]
    }
    /// Compute the public key corresponding to the secret key, walking the
    /// 3-isogeny tree along the given strategy.
    pub fn public_key(&self, params: &PublicParams, strategy: &[u8]) -> Result<BobPublicKey, SidhError> {
        check_bob_scalar(&self.scalar)?;
        check_strategy(strategy, MAX_BOB)?;

        let [xP, xQ, xQmP, mut xR] = self.starting_points(params);
        let mut curve = ProjectiveCurve::base_curve();
        let mut push_points = [xP, xQ, xQmP];

        three_isogeny_walk(&mut curve, &mut xR, &mut push_points, strategy)?;

        let (affine_xP, affine_xQ, affine_xQmP) =
            normalize_push_points(&push_points[0], &push_points[1], &push_points[2])?;
        Ok(BobPublicKey { affine_xP, affine_xQ, affine_xQmP })
    }
    /// Compute the public key by the multiplication-based recursion instead
    /// of a traversal strategy. Slower, but produces the identical key.
    pub fn public_key_simple(&self, params: &PublicParams) -> Result<BobPublicKey, SidhError> {
        check_bob_scalar(&self.scalar)?;

        let [mut xP, mut xQ, mut xQmP, mut xR] = self.starting_points(params);
        let mut curve = ProjectiveCurve::base_curve();

        // rev() makes the loop go from 238 down to 0.
        for e in (0..239).rev() {
            let xS = xR.pow3k(&curve, e as u32);
            let (codomain, phi) = ThreeIsogeny::from_kernel(&xS);
            curve = codomain;

            xR = phi.eval(&xR);
            xP = phi.eval(&xP);
            xQ = phi.eval(&xQ);
            xQmP = phi.eval(&xQmP);
        }

        let (affine_xP, affine_xQ, affine_xQmP) = normalize_push_points(&xP, &xQ, &xQmP)?;
        Ok(BobPublicKey { affine_xP, affine_xQ, affine_xQmP })
    }
    /// Compute (Bob's view of) the shared secret from Alice's public key,
    /// walking the 3-isogeny tree over her curve along the given strategy.
    pub fn shared_secret(&self, alice_public: &AlicePublicKey, strategy: &[u8]) -> Result<SharedSecret, SidhError> {
        check_bob_scalar(&self.scalar)?;
        check_strategy(strategy, MAX_BOB)?;

        let mut curve = recover_public_curve(&alice_public.affine_xP, &alice_public.affine_xQ, &alice_public.affine_xQmP)?;
        let xP = ProjectivePoint::from_affine(&alice_public.affine_xP);
        let xQ = ProjectivePoint::from_affine(&alice_public.affine_xQ);
        let xQmP = ProjectivePoint::from_affine(&alice_public.affine_xQmP);
        let mut xR = ProjectivePoint::right_to_left_ladder(&xP, &xQ, &xQmP, &curve, &self.scalar[..]);

        three_isogeny_walk(&mut curve, &mut xR, &mut [], strategy)?;

        Ok(curve.j_invariant().to_bytes())
    }
    /// Compute the shared secret by the multiplication-based recursion.
    pub fn shared_secret_simple(&self, alice_public: &AlicePublicKey) -> Result<SharedSecret, SidhError> {
        check_bob_scalar(&self.scalar)?;

        let mut curve = recover_public_curve(&alice_public.affine_xP, &alice_public.affine_xQ, &alice_public.affine_xQmP)?;
        let xP = ProjectivePoint::from_affine(&alice_public.affine_xP);
        let xQ = ProjectivePoint::from_affine(&alice_public.affine_xQ);
        let xQmP = ProjectivePoint::from_affine(&alice_public.affine_xQmP);
        let mut xR = ProjectivePoint::three_point_ladder(&xP, &xQ, &xQmP, &curve, &self.scalar[..]);

        // rev() makes the loop go from 238 down to 1.
        for e in (1..239).rev() {
            let xS = xR.pow3k(&curve, e as u32);
            let (codomain, phi) = ThreeIsogeny::from_kernel(&xS);
            curve = codomain;
            xR = phi.eval(&xR);
        }

        let (codomain, _) = ThreeIsogeny::from_kernel(&xR);
        Ok(codomain.j_invariant().to_bytes())
    }
}

/// Generate a keypair for "Alice", using the default p751 parameters and
/// strategy. Because this library does not implement key validation, each
/// keypair should be used for at most one shared secret computation.
pub fn generate_alice_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(AlicePublicKey, AliceSecretKey), SidhError> {
    let mut scalar = [0u8; SECRET_KEY_SIZE];
    loop {
        rng.fill_bytes(&mut scalar[..]);

        // Bit-twiddle to ensure the scalar is in 2*[0,2^371):
        scalar[47] = 0;
        scalar[46] &= 15; // Clear high bits, so scalar < 2^372.
        scalar[0] &= 254; // Clear low bit, so scalar is even.

        // Zero survives the twiddling with probability 2^(-371); resample.
        if scalar.iter().any(|&b| b != 0) {
            break;
        }
    }

    let secret_key = AliceSecretKey { scalar };
    let public_key = secret_key.public_key(&P751_PARAMS, &ALICE_STRATEGY)?;

    Ok((public_key, secret_key))
}

/// Generate a keypair for "Bob", using the default p751 parameters and
/// strategy. Because this library does not implement key validation, each
/// keypair should be used for at most one shared secret computation.
pub fn generate_bob_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(BobPublicKey, BobSecretKey), SidhError> {
    let mut scalar = [0u8; SECRET_KEY_SIZE];
    // Perform rejection sampling to obtain a random value in (0,3^238):
    let mut ok: u64 = 1;
    for _ in 0..102 {
        rng.fill_bytes(&mut scalar[..]);
        // Mask the high bits to obtain a uniform value in [0,2^378):
        scalar[47] &= 3;
        // Accept if scalar < 3^238 (this happens with probability ~0.5828).
        scalar_checklt(&scalar, &THREE_238_MINUS1, &mut ok);
        // Zero is sampled with probability 2^(-378); reject it as well.
        if scalar.iter().all(|&b| b == 0) {
            ok = 1;
        }
        if ok == 0 {
            break;
        }
    }
    // ok is nonzero if all 102 trials failed, which happens with
    // probability 0.41719...^102 < 2^(-128), i.e., never.
    if ok != 0 {
        panic!("All 102 trials failed!");
    }

    // Multiply by 3 to get a scalar in 3*(0,3^238):
    scalar_mulby3(&mut scalar);

    let secret_key = BobSecretKey { scalar };
    let public_key = secret_key.public_key(&P751_PARAMS, &BOB_STRATEGY)?;

    Ok((public_key, secret_key))
}

#[cfg(test)]
impl Arbitrary for AliceSecretKey {
    fn arbitrary(g: &mut Gen) -> AliceSecretKey {
        let mut scalar = [0u8; SECRET_KEY_SIZE];
        for byte in scalar.iter_mut() {
            *byte = u8::arbitrary(g);
        }
        scalar[47] = 0;
        scalar[46] &= 15;
        scalar[0] &= 254;
        if scalar.iter().all(|&b| b == 0) {
            scalar[0] = 2;
        }
        AliceSecretKey { scalar }
    }
}

#[cfg(test)]
impl Arbitrary for BobSecretKey {
    fn arbitrary(g: &mut Gen) -> BobSecretKey {
        let mut scalar = [0u8; SECRET_KEY_SIZE];
        let mut ok: u64 = 1;
        while ok != 0 {
            for byte in scalar.iter_mut() {
                *byte = u8::arbitrary(g);
            }
            scalar[47] &= 3;
            scalar_checklt(&scalar, &THREE_238_MINUS1, &mut ok);
            if scalar.iter().all(|&b| b == 0) {
                ok = 1;
            }
        }
        scalar_mulby3(&mut scalar);
        BobSecretKey { scalar }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::fp64::FpElement;
    use quickcheck::QuickCheck;

    // m_A = 2*randint(0,2^371)
    const M_A: [u8; 48] = [248, 31, 9, 39, 165, 125, 79, 135, 70, 97, 87, 231, 221, 204, 245, 38, 150, 198, 187, 184, 199, 148, 156, 18, 137, 71, 248, 83, 111, 170, 138, 61, 112, 25, 188, 197, 132, 151, 1, 0, 207, 178, 24, 72, 171, 22, 11, 0];
    // m_B = 3*randint(0,3^238)
    const M_B: [u8; 48] = [246, 217, 158, 190, 100, 227, 224, 181, 171, 32, 120, 72, 92, 115, 113, 62, 103, 57, 71, 252, 166, 121, 126, 201, 55, 99, 213, 234, 243, 228, 171, 68, 9, 239, 214, 37, 255, 242, 217, 180, 25, 54, 242, 61, 101, 245, 78, 0];

    #[test]
    fn multiply_by_three() {
        // sage: repr((3^238 -1).digits(256))
        let mut three238_minus1: [u8; 48] = [248, 132, 131, 130, 138, 113, 205, 237, 20, 122, 66, 212, 191, 53, 59, 115, 56, 207, 215, 148, 207, 41, 130, 248, 214, 42, 124, 12, 153, 108, 197, 99, 199, 34, 66, 143, 126, 168, 88, 184, 245, 234, 37, 181, 198, 201, 84, 2];
        // sage: repr((3*(3^238 -1)).digits(256))
        let three_times_three238_minus1: [u8; 48] = [232, 142, 138, 135, 159, 84, 104, 201, 62, 110, 199, 124, 63, 161, 177, 89, 169, 109, 135, 190, 110, 125, 134, 233, 132, 128, 116, 37, 203, 69, 80, 43, 86, 104, 198, 173, 123, 249, 9, 41, 225, 192, 113, 31, 84, 93, 254, 6];

        scalar_mulby3(&mut three238_minus1);

        assert_eq!(&three238_minus1[..], &three_times_three238_minus1[..]);
    }

    #[test]
    fn check_less_than_three238() {
        let three238_minus1: [u8; 48] = [248, 132, 131, 130, 138, 113, 205, 237, 20, 122, 66, 212, 191, 53, 59, 115, 56, 207, 215, 148, 207, 41, 130, 248, 214, 42, 124, 12, 153, 108, 197, 99, 199, 34, 66, 143, 126, 168, 88, 184, 245, 234, 37, 181, 198, 201, 84, 2];
        let three238: [u8; 48] = [249, 132, 131, 130, 138, 113, 205, 237, 20, 122, 66, 212, 191, 53, 59, 115, 56, 207, 215, 148, 207, 41, 130, 248, 214, 42, 124, 12, 153, 108, 197, 99, 199, 34, 66, 143, 126, 168, 88, 184, 245, 234, 37, 181, 198, 201, 84, 2];
        let three238_plus1: [u8; 48] = [250, 132, 131, 130, 138, 113, 205, 237, 20, 122, 66, 212, 191, 53, 59, 115, 56, 207, 215, 148, 207, 41, 130, 248, 214, 42, 124, 12, 153, 108, 197, 99, 199, 34, 66, 143, 126, 168, 88, 184, 245, 234, 37, 181, 198, 201, 84, 2];

        let mut result: u64 = 57;

        scalar_checklt(&three238_minus1, &THREE_238_MINUS1, &mut result);
        assert_eq!(result, 0, "\nExpected 0, got {}", result);

        scalar_checklt(&three238, &THREE_238_MINUS1, &mut result);
        assert_ne!(result, 0, "\nExpected nonzero, got {}", result);

        scalar_checklt(&three238_plus1, &THREE_238_MINUS1, &mut result);
        assert_ne!(result, 0, "\nExpected nonzero, got {}", result);
    }

    #[test]
    fn secret_point_versus_sage() {
        let xR_A = ProjectivePoint::secret_point(&AFFINE_X_PA, &AFFINE_Y_PA, &M_A[..]);
        let xR_B = ProjectivePoint::secret_point(&AFFINE_X_PB, &AFFINE_Y_PB, &M_B[..]);

        let sage_affine_xR_A = Fp2Element {
            re: FpElement([0x29f1dff12103d089, 0x7409b9bf955e0d87, 0xe812441c1cca7288, 0xc32b8b13efba55f9, 0xc3b76a80696d83da, 0x185dd4f93a3dc373, 0xfc07c1a9115b6717, 0x39bfcdd63b5c4254, 0xc4d097d51d41efd8, 0x4f893494389b21c7, 0x373433211d3d0446, 0x53c35ccc3d22]),
            im: FpElement([0x722e718f33e40815, 0x8c5fc0fdf715667, 0x850fd292bbe8c74c, 0x212938a60fcbf5d3, 0xfdb2a099d58dc6e7, 0x232f83ab63c9c205, 0x23eda62fa5543f5e, 0x49b5758855d9d04f, 0x6b455e6642ef25d1, 0x9651162537470202, 0xfeced582f2e96ff0, 0x33a9e0c0dea8]) };
        let sage_affine_xR_B = Fp2Element {
            re: FpElement([0xdd4e66076e8499f5, 0xe7efddc6907519da, 0xe31f9955b337108c, 0x8e558c5479ffc5e1, 0xfee963ead776bfc2, 0x33aa04c35846bf15, 0xab77d91b23617a0d, 0xbdd70948746070e2, 0x66f71291c277e942, 0x187c39db2f901fce, 0x69262987d5d32aa2, 0xe1db40057dc]),
            im: FpElement([0xd1b766abcfd5c167, 0x4591059dc8a382fa, 0x1ddf9490736c223d, 0xc96db091bdf2b3dd, 0x7b8b9c3dc292f502, 0xe5b18ad85e4d3e33, 0xc3f3479b6664b931, 0xa4f17865299e21e6, 0x3f7ef5b332fa1c6e, 0x875bedb5dab06119, 0x9b5a06ea2e23b93, 0x43d48296fb26]) };

        let affine_xR_A = xR_A.to_affine();
        assert!(sage_affine_xR_A.vartime_eq(&affine_xR_A),
                "\nExpected\n{:?}\nfound\n{:?}", sage_affine_xR_A, affine_xR_A);

        let affine_xR_B = xR_B.to_affine();
        assert!(sage_affine_xR_B.vartime_eq(&affine_xR_B),
                "\nExpected\n{:?}\nfound\n{:?}", sage_affine_xR_B, affine_xR_B);
    }

    #[test]
    fn secret_kernels_have_full_order() {
        // At the top of the walk the kernel generator must have exact order
        // 2^372 (Alice) / 3^239 (Bob) on the starting curve.
        let curve = ProjectiveCurve::base_curve();

        let xR_A = ProjectivePoint::secret_point(&AFFINE_X_PA, &AFFINE_Y_PA, &M_A[..]);
        assert!(!xR_A.pow2k(&curve, 371).is_degenerate());
        assert!(xR_A.pow2k(&curve, 372).is_degenerate());

        let xR_B = ProjectivePoint::secret_point(&AFFINE_X_PB, &AFFINE_Y_PB, &M_B[..]);
        assert!(!xR_B.pow3k(&curve, 238).is_degenerate());
        assert!(xR_B.pow3k(&curve, 239).is_degenerate());
    }

    #[test]
    fn alice_keygen_fast_vs_simple() {
        let alice_secret_key = AliceSecretKey { scalar: M_A };
        let fast_pubkey = alice_secret_key.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
        let simple_pubkey = alice_secret_key.public_key_simple(&P751_PARAMS).unwrap();

        assert!(fast_pubkey.affine_xP.vartime_eq(&simple_pubkey.affine_xP),
                "\nExpected affine_xP = {:?}\nfound {:?}", fast_pubkey.affine_xP, simple_pubkey.affine_xP);
        assert!(fast_pubkey.affine_xQ.vartime_eq(&simple_pubkey.affine_xQ),
                "\nExpected affine_xQ = {:?}\nfound {:?}", fast_pubkey.affine_xQ, simple_pubkey.affine_xQ);
        assert!(fast_pubkey.affine_xQmP.vartime_eq(&simple_pubkey.affine_xQmP),
                "\nExpected affine_xQmP = {:?}\nfound {:?}", fast_pubkey.affine_xQmP, simple_pubkey.affine_xQmP);
    }

    #[test]
    fn bob_keygen_fast_vs_simple() {
        let bob_secret_key = BobSecretKey { scalar: M_B };
        let fast_pubkey = bob_secret_key.public_key(&P751_PARAMS, &BOB_STRATEGY).unwrap();
        let simple_pubkey = bob_secret_key.public_key_simple(&P751_PARAMS).unwrap();

        assert!(fast_pubkey.affine_xP.vartime_eq(&simple_pubkey.affine_xP),
                "\nExpected affine_xP = {:?}\nfound {:?}", fast_pubkey.affine_xP, simple_pubkey.affine_xP);
        assert!(fast_pubkey.affine_xQ.vartime_eq(&simple_pubkey.affine_xQ),
                "\nExpected affine_xQ = {:?}\nfound {:?}", fast_pubkey.affine_xQ, simple_pubkey.affine_xQ);
        assert!(fast_pubkey.affine_xQmP.vartime_eq(&simple_pubkey.affine_xQmP),
                "\nExpected affine_xQmP = {:?}\nfound {:?}", fast_pubkey.affine_xQmP, simple_pubkey.affine_xQmP);
    }

    #[test]
    fn alice_keygen_balanced_strategy_matches_optimal() {
        // The naive balanced strategy (every split 1) degenerates into the
        // multiplication-based recursion; the public key must not change.
        let all_ones = [1u8; MAX_ALICE - 1];
        let alice_secret_key = AliceSecretKey { scalar: M_A };
        let optimal = alice_secret_key.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
        let balanced = alice_secret_key.public_key(&P751_PARAMS, &all_ones).unwrap();

        assert_eq!(optimal.to_bytes()[..], balanced.to_bytes()[..]);
    }

    #[test]
    fn minimal_alice_scalar_yields_valid_public_key() {
        let mut scalar = [0u8; SECRET_KEY_SIZE];
        scalar[0] = 2;
        let alice_secret = AliceSecretKey { scalar };

        let public = alice_secret.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
        let curve = ProjectiveCurve::recover(&public.affine_xP, &public.affine_xQ, &public.affine_xQmP);
        assert!(!curve.is_singular());
    }

    #[test]
    fn shared_secret_fast_and_simple_crosswise() {
        let alice_secret = AliceSecretKey { scalar: M_A };
        let bob_secret = BobSecretKey { scalar: M_B };

        let alice_public = alice_secret.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
        let bob_public = bob_secret.public_key(&P751_PARAMS, &BOB_STRATEGY).unwrap();

        let alice_fast = alice_secret.shared_secret(&bob_public, &ALICE_STRATEGY).unwrap();
        let alice_simple = alice_secret.shared_secret_simple(&bob_public).unwrap();
        let bob_fast = bob_secret.shared_secret(&alice_public, &BOB_STRATEGY).unwrap();
        let bob_simple = bob_secret.shared_secret_simple(&alice_public).unwrap();

        assert_eq!(alice_fast[..], bob_fast[..],
                   "\nShared secret (fast) mismatch: Alice has {:?}\nBob has {:?}", &alice_fast[..], &bob_fast[..]);
        assert_eq!(alice_simple[..], bob_simple[..],
                   "\nShared secret (simple) mismatch: Alice has {:?}\nBob has {:?}", &alice_simple[..], &bob_simple[..]);
        assert_eq!(alice_simple[..], bob_fast[..],
                   "\nShared secret mismatch: Alice (simple) has {:?}\nBob (fast) has {:?}", &alice_simple[..], &bob_fast[..]);
    }

    #[test]
    fn ephemeral_shared_secret() {
        fn shared_secrets_match(alice_secret: AliceSecretKey, bob_secret: BobSecretKey) -> bool {
            let alice_public = alice_secret.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
            let bob_public = bob_secret.public_key(&P751_PARAMS, &BOB_STRATEGY).unwrap();

            let alice_shared_secret = alice_secret.shared_secret(&bob_public, &ALICE_STRATEGY).unwrap();
            let bob_shared_secret = bob_secret.shared_secret(&alice_public, &BOB_STRATEGY).unwrap();

            alice_shared_secret[..] == bob_shared_secret[..]
        }
        // Each case is two keygens plus two walks; keep the count modest.
        QuickCheck::new().tests(8)
                         .quickcheck(shared_secrets_match as fn(AliceSecretKey, BobSecretKey) -> bool);
    }

    #[test]
    fn public_key_roundtrips_through_bytes() {
        let alice_secret = AliceSecretKey { scalar: M_A };
        let alice_public = alice_secret.public_key(&P751_PARAMS, &ALICE_STRATEGY).unwrap();
        let reread = AlicePublicKey::from_bytes(&alice_public.to_bytes()[..]);

        assert!(alice_public.affine_xP.vartime_eq(&reread.affine_xP));
        assert!(alice_public.affine_xQ.vartime_eq(&reread.affine_xQ));
        assert!(alice_public.affine_xQmP.vartime_eq(&reread.affine_xQmP));
    }

    #[test]
    fn generated_keypairs_agree() {
        let mut rng = rand::thread_rng();
        let (alice_public, alice_secret) = generate_alice_keypair(&mut rng).unwrap();
        let (bob_public, bob_secret) = generate_bob_keypair(&mut rng).unwrap();

        let alice_shared = alice_secret.shared_secret(&bob_public, &ALICE_STRATEGY).unwrap();
        let bob_shared = bob_secret.shared_secret(&alice_public, &BOB_STRATEGY).unwrap();
        assert_eq!(alice_shared[..], bob_shared[..]);
    }

    #[test]
    fn malformed_scalars_are_rejected() {
        let zero = AliceSecretKey { scalar: [0u8; SECRET_KEY_SIZE] };
        assert_eq!(zero.public_key(&P751_PARAMS, &ALICE_STRATEGY).err(),
                   Some(SidhError::MalformedInput));

        let mut odd = M_A;
        odd[0] |= 1;
        let odd = AliceSecretKey { scalar: odd };
        assert_eq!(odd.public_key(&P751_PARAMS, &ALICE_STRATEGY).err(),
                   Some(SidhError::MalformedInput));

        let mut oversized = M_A;
        oversized[47] = 0x80;
        let oversized = AliceSecretKey { scalar: oversized };
        assert_eq!(oversized.public_key(&P751_PARAMS, &ALICE_STRATEGY).err(),
                   Some(SidhError::MalformedInput));

        let oversized_bob = BobSecretKey { scalar: [0xff; SECRET_KEY_SIZE] };
        assert_eq!(oversized_bob.public_key(&P751_PARAMS, &BOB_STRATEGY).err(),
                   Some(SidhError::MalformedInput));
    }

    #[test]
    fn malformed_strategies_are_rejected() {
        let alice_secret = AliceSecretKey { scalar: M_A };
        assert_eq!(alice_secret.public_key(&P751_PARAMS, &BOB_STRATEGY).err(),
                   Some(SidhError::MalformedInput));
        assert_eq!(alice_secret.public_key(&P751_PARAMS, &[]).err(),
                   Some(SidhError::MalformedInput));
    }

    #[test]
    fn degenerate_public_key_is_rejected() {
        let bob_secret = BobSecretKey { scalar: M_B };
        let mut alice_public = AliceSecretKey { scalar: M_A }
            .public_key(&P751_PARAMS, &ALICE_STRATEGY)
            .unwrap();
        // Zero out one coordinate: the curve recovery denominator
        // 4*x_P*x_Q*x_{Q-P} vanishes and no Montgomery curve fits.
        alice_public.affine_xP = Fp2Element::zero();

        assert_eq!(bob_secret.shared_secret(&alice_public, &BOB_STRATEGY).err(),
                   Some(SidhError::InvalidPublicKey));
    }
}
