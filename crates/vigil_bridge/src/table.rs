//! Fingerprint snapshots and row comparison.

use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::{format_hex32, XorHash32};

/// Seed pair applied to every tracked signal at the start of a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashParameters {
    /// First seed word.
    pub seed0: u32,
    /// Second seed word.
    pub seed1: u32,
}

impl HashParameters {
    /// Creates a seed pair.
    pub fn new(seed0: u32, seed1: u32) -> Self {
        Self { seed0, seed1 }
    }

    /// A fresh hasher seeded with this pair.
    pub fn hasher(&self) -> XorHash32 {
        XorHash32::seeded(self.seed0, self.seed1)
    }
}

/// One exported row: a signal's final hash and how many tokens produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRow {
    /// Signal name as catalogued.
    pub signal: String,
    /// Final hash value.
    #[serde(with = "hex32")]
    pub hash: u32,
    /// Tokens consumed in the window.
    pub count: u64,
}

/// A read-only snapshot of every tracked signal, in attach order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintTable {
    /// Seeds the window was started with.
    pub params: HashParameters,
    /// One row per tracked signal.
    pub rows: Vec<FingerprintRow>,
}

impl FingerprintTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds the first row for a signal name.
    pub fn find(&self, signal: &str) -> Option<&FingerprintRow> {
        self.rows.iter().find(|r| r.signal == signal)
    }

    /// Compares against another set of rows position by position.
    pub fn diff(&self, other: &[FingerprintRow]) -> Vec<RowMismatch> {
        diff_rows(&self.rows, other)
    }
}

/// A row position where two fingerprint tables disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMismatch {
    /// Zero-based row position.
    pub row: usize,
    /// Row from the left table, if it has one at this position.
    pub left: Option<FingerprintRow>,
    /// Row from the right table, if it has one at this position.
    pub right: Option<FingerprintRow>,
}

impl fmt::Display for RowMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |r: &Option<FingerprintRow>| match r {
            Some(r) => format!("{} {} x{}", r.signal, format_hex32(r.hash), r.count),
            None => "<missing>".to_string(),
        };
        write!(
            f,
            "row {}: {} != {}",
            self.row,
            side(&self.left),
            side(&self.right)
        )
    }
}

/// Compares two row lists position by position.
///
/// Rows differ if the signal name, hash, or count differ, or if one list is
/// longer than the other.
pub fn diff_rows(left: &[FingerprintRow], right: &[FingerprintRow]) -> Vec<RowMismatch> {
    let len = left.len().max(right.len());
    (0..len)
        .filter_map(|row| {
            let l = left.get(row);
            let r = right.get(row);
            if l == r {
                None
            } else {
                Some(RowMismatch {
                    row,
                    left: l.cloned(),
                    right: r.cloned(),
                })
            }
        })
        .collect()
}

mod hex32 {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use vigil_common::format_hex32;

    pub fn serialize<S: Serializer>(value: &u32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_hex32(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let text = String::deserialize(d)?;
        u32::from_str_radix(&text, 16).map_err(de::Error::custom)
    }
}
