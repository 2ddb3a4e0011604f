//! Ephemeral supersingular isogeny Diffie-Hellman over the prime
//! p = 2^372 * 3^239 - 1, following Costello-Longa-Naehrig 2016.
//!
//! The crate follows the usual naming convention, writing "Alice" for the
//! party walking 4-isogenies and "Bob" for the party walking 3-isogenies.
//! Public keys are triples of affine x-coordinates in F_{p^2}; the shared
//! secret is the j-invariant of the final curve.
//!
//! The isogeny walks are driven by precomputed traversal strategies handed
//! in as plain split tables, so alternative strategies can be benchmarked
//! without touching the walk itself. The slower multiply-then-isogenize
//! variants (`public_key_simple`, `shared_secret_simple`) compute the same
//! values and exist as a cross-check and a reference.
//!
//! This crate does NOT implement SIDH key validation, so it should only be
//! used for ephemeral DH. Each keypair should be used at most once. SIDH
//! itself is broken as a cryptosystem; this implementation reproduces the
//! classical scheme and is not an endorsement of its security.

#![allow(non_snake_case)]

mod backend;
mod constants;
mod error;
mod field;
mod curve;
mod isogeny;
mod walk;
mod sidh;

pub use crate::constants::{ALICE_STRATEGY, BOB_STRATEGY, P751_PARAMS};
pub use crate::error::SidhError;
pub use crate::sidh::{
    generate_alice_keypair, generate_bob_keypair, AlicePublicKey, AliceSecretKey, BobPublicKey,
    BobSecretKey, PublicParams, SharedSecret, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE,
    SHARED_SECRET_SIZE,
};
