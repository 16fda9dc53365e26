//! Shared foundational types used across the Vigil trace-hashing bridge.
//!
//! This crate provides the rolling token hasher that both the hardware-resident
//! and host-resident sides must agree on, fixed-width hexadecimal rendering,
//! interned signal names, and 128-bit content hashes for design manifests.

#![warn(missing_docs)]

pub mod hash;
pub mod hex;
pub mod ident;
pub mod xorhash;

pub use hash::ContentHash;
pub use hex::{format_hex32, parse_u32_literal, ParseLiteralError};
pub use ident::{Symbol, SymbolTable};
pub use xorhash::{XorHash32, SEED_SALT};
