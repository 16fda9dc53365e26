//! Token-hashing verification bridge.
//!
//! A [`TokenHasherBridge`] attaches to a [`vigil_sim::SimController`] and
//! keeps one rolling [`vigil_common::XorHash32`] per tracked signal. Each
//! sampled cycle folds the signal's current value into its hash, so two runs
//! agree on a signal's fingerprint exactly when they agree on its value
//! sequence. Fingerprints are exported as a [`FingerprintTable`] rendered to
//! CSV, aligned text, or JSON.
//!
//! # Modules
//!
//! - `error`: Bridge error type
//! - `hasher_bridge`: The bridge itself
//! - `table`: Fingerprint snapshots and row diffs
//! - `export`: CSV, text, and JSON rendering

#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod hasher_bridge;
pub mod table;

pub use error::BridgeError;
pub use export::{
    from_csv, render, to_csv, to_json, to_text, write_csv_file, write_export, ExportFormat,
    CSV_HEADER,
};
pub use hasher_bridge::{HashState, TokenHasherBridge, TrackSpec};
pub use table::{diff_rows, FingerprintRow, FingerprintTable, HashParameters, RowMismatch};
