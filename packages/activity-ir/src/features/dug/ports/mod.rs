//! Activity query port
//!
//! What a downstream consumer (e.g. a derivative code generator) asks of a
//! finished analysis.

use std::collections::BTreeSet;

use crate::shared::models::{Location, MemRefId, StmtId, SymbolId};

/// Anything that can be active
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveEntity {
    Symbol(SymbolId),
    Stmt(StmtId),
    MemRef(MemRefId),
    Location(Location),
}

impl From<SymbolId> for ActiveEntity {
    fn from(sym: SymbolId) -> Self {
        ActiveEntity::Symbol(sym)
    }
}

impl From<StmtId> for ActiveEntity {
    fn from(stmt: StmtId) -> Self {
        ActiveEntity::Stmt(stmt)
    }
}

impl From<MemRefId> for ActiveEntity {
    fn from(mem_ref: MemRefId) -> Self {
        ActiveEntity::MemRef(mem_ref)
    }
}

impl From<Location> for ActiveEntity {
    fn from(loc: Location) -> Self {
        ActiveEntity::Location(loc)
    }
}

pub trait ActivityQuery {
    fn independent_symbols(&self) -> &BTreeSet<SymbolId>;
    fn dependent_symbols(&self) -> &BTreeSet<SymbolId>;
    fn active_symbols(&self) -> &BTreeSet<SymbolId>;
    fn active_stmts(&self) -> &BTreeSet<StmtId>;
    fn active_mem_refs(&self) -> &BTreeSet<MemRefId>;
    fn active_locations(&self) -> &BTreeSet<Location>;

    /// Varied and useful
    fn is_active(&self, entity: &ActiveEntity) -> bool {
        match entity {
            ActiveEntity::Symbol(sym) => self.active_symbols().contains(sym),
            ActiveEntity::Stmt(stmt) => self.active_stmts().contains(stmt),
            ActiveEntity::MemRef(mem_ref) => self.active_mem_refs().contains(mem_ref),
            ActiveEntity::Location(loc) => self.active_locations().contains(loc),
        }
    }
}
