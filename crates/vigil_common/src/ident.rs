//! Interned module paths and signal names.

use lasso::Rodeo;
use serde::{Deserialize, Serialize};

/// An interned name: a module path segment list or a signal name.
///
/// Symbols are `u32` indices into a [`SymbolTable`], giving O(1) equality and
/// copying. A symbol is only meaningful with the table that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a `Symbol` from a raw index. Intended for tests.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Symbol` wraps a `u32`; `try_from_usize` rejects values that don't fit.
unsafe impl lasso::Key for Symbol {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Symbol)
    }
}

/// Single-threaded string interner backed by [`lasso::Rodeo`].
///
/// The signal catalog is built once per run and then only read, so the
/// non-threaded rodeo is sufficient.
pub struct SymbolTable {
    rodeo: Rodeo<Symbol>,
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("len", &self.rodeo.len())
            .finish()
    }
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }

    /// Interns `s`, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.rodeo.get_or_intern(s)
    }

    /// Looks up `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.rodeo.get(s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was not produced by this table.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.rodeo.resolve(&symbol)
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
