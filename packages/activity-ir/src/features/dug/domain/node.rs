//! DUG nodes

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::shared::models::{Location, MemRefId, ProcId, StmtId, SymbolId};

/// One node per distinct symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DugNode {
    pub symbol: SymbolId,
    /// Procedure in which the symbol was first encountered
    pub proc: ProcId,
    pub location: Location,
    pub varied: bool,
    pub useful: bool,
    /// Statements that reference the symbol
    pub stmts: BTreeSet<StmtId>,
    /// Memory references that resolve to the symbol
    pub mem_refs: BTreeSet<MemRefId>,
}

impl DugNode {
    pub fn new(symbol: SymbolId, location: Location, proc: ProcId) -> Self {
        Self {
            symbol,
            proc,
            location,
            varied: false,
            useful: false,
            stmts: BTreeSet::new(),
            mem_refs: BTreeSet::new(),
        }
    }

    /// Varied and useful
    pub fn is_active(&self) -> bool {
        self.varied && self.useful
    }
}
