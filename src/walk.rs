//! Strategy-driven traversal of the isogeny tree, after De Feo, Jao, and
//! Plut.
//!
//! A walk consumes a working kernel point R of full ℓ-power order and a
//! split table precomputed offline. Each row multiplies R down to order ℓ
//! along the splits (saving intermediates on a stack), derives the row's
//! isogeny from it, maps every live intermediate and every push point
//! through, and pops the next working point. After the last row the
//! trailing isogeny fixes the final curve and maps the push points once
//! more.
//!
//! The control flow branches only on the public split table, never on
//! secret data.

use heapless::Vec;

use crate::constants::MAX_BOB;
use crate::curve::{ProjectiveCurve, ProjectivePoint};
use crate::error::SidhError;
use crate::isogeny::{FourIsogeny, ThreeIsogeny};

// The working stack of a walk. Both walk depths fit: with the degenerate
// all-ones strategy the stack peaks one below the depth.
type WalkStack = Vec<(ProjectivePoint, usize), MAX_BOB>;

// Strategies list one positive split per interior tree level.
pub fn check_strategy(strategy: &[u8], max: usize) -> Result<(), SidhError> {
    if strategy.len() != max - 1 {
        return Err(SidhError::MalformedInput);
    }
    if strategy.iter().any(|&split| split == 0) {
        return Err(SidhError::MalformedInput);
    }
    Ok(())
}

// A kernel that collapsed to (0:0) or to the point at infinity means the
// walked curve was not what the peer claimed.
fn check_kernel(kernel: &ProjectivePoint) -> Result<(), SidhError> {
    if kernel.is_degenerate() {
        return Err(SidhError::InvalidPublicKey);
    }
    Ok(())
}

/// Walk `MAX_ALICE` levels of 4-isogenies starting from the kernel
/// generator `xR` of order 2^(2*MAX_ALICE) on `curve`, pushing every point
/// of `push_points` through each step. On return `curve` is the final
/// codomain and `push_points` hold their images on it.
///
/// The caller has already applied the exceptional first 4-isogeny; this is
/// the uniform part of the walk only.
pub fn four_isogeny_walk(
    curve: &mut ProjectiveCurve,
    xR: &mut ProjectivePoint,
    push_points: &mut [ProjectivePoint],
    strategy: &[u8],
) -> Result<(), SidhError> {
    let max = strategy.len() + 1;
    let mut stack = WalkStack::new();
    let mut i: usize = 0;

    for j in 1..max {
        while i < max - j {
            let split = strategy[max - i - j - 1] as usize;
            if split > max - j - i {
                return Err(SidhError::MalformedInput);
            }
            stack.push((*xR, i)).map_err(|_| SidhError::MalformedInput)?;
            *xR = xR.pow2k(curve, (2 * split) as u32);
            i += split;
        }
        check_kernel(xR)?;
        let (codomain, phi) = FourIsogeny::from_kernel(xR);
        *curve = codomain;

        for entry in stack.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }
        for point in push_points.iter_mut() {
            *point = phi.eval(point);
        }

        let (top, index) = stack.pop().ok_or(SidhError::MalformedInput)?;
        *xR = top;
        i = index;
    }

    check_kernel(xR)?;
    let (codomain, phi) = FourIsogeny::from_kernel(xR);
    *curve = codomain;
    for point in push_points.iter_mut() {
        *point = phi.eval(point);
    }
    Ok(())
}

/// Walk `MAX_BOB` levels of 3-isogenies starting from the kernel generator
/// `xR` of order 3^MAX_BOB on `curve`; otherwise as [`four_isogeny_walk`].
pub fn three_isogeny_walk(
    curve: &mut ProjectiveCurve,
    xR: &mut ProjectivePoint,
    push_points: &mut [ProjectivePoint],
    strategy: &[u8],
) -> Result<(), SidhError> {
    let max = strategy.len() + 1;
    let mut stack = WalkStack::new();
    let mut i: usize = 0;

    for j in 1..max {
        while i < max - j {
            let split = strategy[max - i - j - 1] as usize;
            if split > max - j - i {
                return Err(SidhError::MalformedInput);
            }
            stack.push((*xR, i)).map_err(|_| SidhError::MalformedInput)?;
            *xR = xR.pow3k(curve, split as u32);
            i += split;
        }
        check_kernel(xR)?;
        let (codomain, phi) = ThreeIsogeny::from_kernel(xR);
        *curve = codomain;

        for entry in stack.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }
        for point in push_points.iter_mut() {
            *point = phi.eval(point);
        }

        let (top, index) = stack.pop().ok_or(SidhError::MalformedInput)?;
        *xR = top;
        i = index;
    }

    check_kernel(xR)?;
    let (codomain, phi) = ThreeIsogeny::from_kernel(xR);
    *curve = codomain;
    for point in push_points.iter_mut() {
        *point = phi.eval(point);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::{ALICE_STRATEGY, BOB_STRATEGY, MAX_ALICE};

    #[test]
    fn strategy_length_is_checked() {
        assert_eq!(check_strategy(&ALICE_STRATEGY, MAX_ALICE), Ok(()));
        assert_eq!(check_strategy(&BOB_STRATEGY, MAX_BOB), Ok(()));
        assert_eq!(
            check_strategy(&ALICE_STRATEGY[..10], MAX_ALICE),
            Err(SidhError::MalformedInput)
        );
        assert_eq!(
            check_strategy(&BOB_STRATEGY, MAX_ALICE),
            Err(SidhError::MalformedInput)
        );
    }

    #[test]
    fn zero_split_is_rejected() {
        let mut strategy = ALICE_STRATEGY;
        strategy[17] = 0;
        assert_eq!(
            check_strategy(&strategy, MAX_ALICE),
            Err(SidhError::MalformedInput)
        );
    }

    #[test]
    fn oversized_split_is_rejected_mid_walk() {
        // A split that overshoots the remaining levels must be caught by
        // the walk itself, not silently corrupt the traversal.
        let mut strategy = BOB_STRATEGY;
        strategy[MAX_BOB - 2] = 0xff;
        assert_eq!(check_strategy(&strategy, MAX_BOB), Ok(()));

        let mut curve = ProjectiveCurve::base_curve();
        let mut xR = ProjectivePoint::from_affine(&crate::field::Fp2Element::one());
        let result = three_isogeny_walk(&mut curve, &mut xR, &mut [], &strategy);
        assert_eq!(result, Err(SidhError::MalformedInput));
    }
}
