//! Signal catalog for the Vigil trace-hashing bridge.
//!
//! The simulation engine exports a [`SignalManifest`] describing every signal
//! it can expose. [`SignalCatalog`] turns that manifest into dense, stable
//! [`SignalIndex`] values and answers name queries against it.
//!
//! # Name resolution
//!
//! A query is a `(module, signal)` pair. The module part matches any module
//! path whose trailing `.`-separated segments equal the query, so callers can
//! give as much of the hierarchy as they need to disambiguate. The signal part
//! is a glob (`*`, `?`). A signal instantiated in several places is reported
//! once per instance and never collapsed.

#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod pattern;

pub use catalog::{SignalCatalog, SignalEntry, SignalIndex};
pub use error::CatalogError;
pub use manifest::{load_manifest, Direction, ManifestEntry, SignalManifest};
pub use pattern::{module_matches, SignalPattern};
