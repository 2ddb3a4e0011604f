//! Arithmetic backend for the p751 field.
//!
//! A single portable implementation built on 64-bit limbs; the field API in
//! `field.rs` is written against this module alone.

pub mod fp64;
