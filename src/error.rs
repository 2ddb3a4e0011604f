use thiserror::Error;

/// Errors surfaced by key generation and shared-secret derivation.
///
/// None of these are retried internally; a degenerate kernel discovered
/// mid-walk indicates a corrupted peer key and is reported as
/// [`SidhError::InvalidPublicKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SidhError {
    /// A secret scalar or a traversal strategy lies outside the accepted
    /// domain: scalar zero, odd (Alice), or not below the torsion order;
    /// strategy of the wrong length, containing a zero split, or with a
    /// split larger than the levels remaining at its position.
    #[error("malformed scalar or traversal strategy")]
    MalformedInput,
    /// The peer's public key does not describe a nonsingular Montgomery
    /// curve, or a kernel point degenerated while walking it.
    #[error("public key is not consistent with a valid Montgomery curve")]
    InvalidPublicKey,
    /// A Z-coordinate to be normalized away was zero. The simultaneous
    /// inversion requires nonzero inputs; hitting this means an internal
    /// invariant was violated.
    #[error("three-way inversion received a zero input")]
    FieldZeroDivision,
}
