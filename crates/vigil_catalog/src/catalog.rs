//! The signal catalog: dense indices and name search.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_common::{ContentHash, Symbol, SymbolTable};

use crate::error::CatalogError;
use crate::manifest::{Direction, SignalManifest};
use crate::pattern::{module_matches, SignalPattern};

/// Dense, zero-based index of a signal within one catalog.
///
/// Indices follow manifest order and never change for the lifetime of the
/// catalog.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct SignalIndex(u32);

impl SignalIndex {
    /// Creates an index from a raw value.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw value.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize` for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SignalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalogued signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalEntry {
    /// Interned module path.
    pub module: Symbol,
    /// Interned signal name.
    pub name: Symbol,
    /// Bit width, 1..=32.
    pub width: u32,
    /// Port direction.
    pub direction: Direction,
}

impl SignalEntry {
    /// Mask selecting the low `width` bits.
    pub fn mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }
}

/// Immutable map from `(module path, signal name)` to [`SignalIndex`].
///
/// Built once at simulation-attach time and shared read-only by every bridge
/// and scenario of the run.
#[derive(Debug)]
pub struct SignalCatalog {
    symbols: SymbolTable,
    entries: Vec<SignalEntry>,
    content_hash: ContentHash,
}

impl SignalCatalog {
    /// Builds a catalog from an engine manifest.
    ///
    /// Rejects empty names, widths outside 1..=32, and repeated
    /// `(module, name)` pairs. The same name under different module paths is
    /// allowed and yields distinct indices.
    pub fn from_manifest(manifest: &SignalManifest) -> Result<Self, CatalogError> {
        let mut symbols = SymbolTable::new();
        let mut entries = Vec::with_capacity(manifest.len());
        let mut seen = HashSet::with_capacity(manifest.len());

        for (position, raw) in manifest.signals.iter().enumerate() {
            if raw.module.is_empty() || raw.name.is_empty() {
                return Err(CatalogError::EmptyName { position });
            }
            if raw.width == 0 || raw.width > 32 {
                return Err(CatalogError::InvalidWidth {
                    module: raw.module.clone(),
                    signal: raw.name.clone(),
                    width: raw.width,
                });
            }
            let module = symbols.intern(&raw.module);
            let name = symbols.intern(&raw.name);
            if !seen.insert((module, name)) {
                return Err(CatalogError::DuplicateSignal {
                    module: raw.module.clone(),
                    signal: raw.name.clone(),
                });
            }
            entries.push(SignalEntry {
                module,
                name,
                width: raw.width,
                direction: raw.direction,
            });
        }

        let content_hash = manifest.content_hash();
        tracing::debug!(
            signals = entries.len(),
            design = %content_hash.short(),
            "built signal catalog"
        );

        Ok(Self {
            symbols,
            entries,
            content_hash,
        })
    }

    /// Number of signals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog holds no signals.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content hash of the manifest this catalog was built from.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Returns the entry for `index`, or `None` if out of range.
    pub fn get(&self, index: SignalIndex) -> Option<&SignalEntry> {
        self.entries.get(index.as_usize())
    }

    /// Returns the entry for `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not issued by this catalog.
    pub fn signal(&self, index: SignalIndex) -> &SignalEntry {
        &self.entries[index.as_usize()]
    }

    /// The signal's bare name.
    pub fn name(&self, index: SignalIndex) -> &str {
        self.symbols.resolve(self.signal(index).name)
    }

    /// The signal's module path.
    pub fn module(&self, index: SignalIndex) -> &str {
        self.symbols.resolve(self.signal(index).module)
    }

    /// `module.name` for display and ambiguity reports.
    pub fn qualified_name(&self, index: SignalIndex) -> String {
        format!("{}.{}", self.module(index), self.name(index))
    }

    /// Iterates all signals in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalIndex, &SignalEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (SignalIndex(i as u32), e))
    }

    /// Returns every signal whose module matches `module` and whose name
    /// matches the glob `signal_pattern`, in index order.
    ///
    /// Duplicated instances each appear in the result.
    pub fn search(
        &self,
        module: &str,
        signal_pattern: &str,
    ) -> Result<Vec<SignalIndex>, CatalogError> {
        let pattern = SignalPattern::new(signal_pattern)?;
        let hits: Vec<SignalIndex> = self
            .iter()
            .filter(|(_, e)| {
                module_matches(self.symbols.resolve(e.module), module)
                    && pattern.matches(self.symbols.resolve(e.name))
            })
            .map(|(i, _)| i)
            .collect();
        tracing::trace!(module, signal_pattern, hits = hits.len(), "catalog search");
        Ok(hits)
    }

    /// Resolves a single signal by exact name.
    ///
    /// Fails with [`CatalogError::NotFound`] if nothing matches and
    /// [`CatalogError::Ambiguous`] if more than one instance does; the caller
    /// must then qualify the module path further.
    pub fn index_of(&self, module: &str, signal: &str) -> Result<SignalIndex, CatalogError> {
        let hits: Vec<SignalIndex> = self
            .iter()
            .filter(|(_, e)| {
                self.symbols.resolve(e.name) == signal
                    && module_matches(self.symbols.resolve(e.module), module)
            })
            .map(|(i, _)| i)
            .collect();
        match hits.as_slice() {
            [] => Err(CatalogError::NotFound {
                module: module.to_string(),
                signal: signal.to_string(),
            }),
            [only] => Ok(*only),
            many => Err(CatalogError::Ambiguous {
                module: module.to_string(),
                signal: signal.to_string(),
                candidates: many.iter().map(|i| self.qualified_name(*i)).collect(),
            }),
        }
    }
}
