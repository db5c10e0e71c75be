//! Per-procedure dependence matrix
//!
//! Boolean relation `use -> def` over the symbols referenced in one
//! procedure. Direct pairs come from statements (and from callee closures
//! propagated through call sites); `transitive_closure` closes it with
//! Warshall's algorithm.

use rustc_hash::FxHashMap;

use crate::shared::models::SymbolId;

#[derive(Debug, Clone, Default)]
pub struct DependenceMatrix {
    index: FxHashMap<SymbolId, usize>,
    symbols: Vec<SymbolId>,
    rows: Vec<Vec<bool>>,
    closed: bool,
    /// Set when a pair is recorded after the last closure
    dirty: bool,
}

impl DependenceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols in the order they were first registered
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Make `sym` part of the relation without any dependence
    pub fn register(&mut self, sym: SymbolId) -> usize {
        if let Some(&i) = self.index.get(&sym) {
            return i;
        }
        let i = self.symbols.len();
        self.symbols.push(sym);
        self.index.insert(sym, i);
        for row in &mut self.rows {
            row.push(false);
        }
        self.rows.push(vec![false; i + 1]);
        i
    }

    /// Record `def` depends on `use_`. Returns `true` if the pair is new.
    pub fn record(&mut self, use_: SymbolId, def: SymbolId) -> bool {
        let u = self.register(use_);
        let d = self.register(def);
        if self.rows[u][d] {
            return false;
        }
        self.rows[u][d] = true;
        self.dirty = true;
        true
    }

    pub fn depends(&self, use_: SymbolId, def: SymbolId) -> bool {
        match (self.index.get(&use_), self.index.get(&def)) {
            (Some(&u), Some(&d)) => self.rows[u][d],
            _ => false,
        }
    }

    /// Warshall closure in place. Returns the number of pairs added.
    pub fn transitive_closure(&mut self) -> usize {
        let n = self.symbols.len();
        let mut added = 0;
        for def in 0..n {
            for use_ in 0..n {
                if !self.rows[use_][def] {
                    continue;
                }
                for var in 0..n {
                    if self.rows[def][var] && !self.rows[use_][var] {
                        self.rows[use_][var] = true;
                        added += 1;
                    }
                }
            }
        }
        self.closed = true;
        self.dirty = false;
        added
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Pairs recorded since the last closure
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Every `(use, def)` pair currently in the relation
    pub fn pairs(&self) -> Vec<(SymbolId, SymbolId)> {
        let mut out = Vec::new();
        for (u, row) in self.rows.iter().enumerate() {
            for (d, &set) in row.iter().enumerate() {
                if set {
                    out.push((self.symbols[u], self.symbols[d]));
                }
            }
        }
        out
    }
}
