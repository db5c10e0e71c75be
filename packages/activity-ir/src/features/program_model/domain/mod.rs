//! Program model domain records
//!
//! Plain declarations stored by the in-memory program model.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::shared::models::{CallSiteId, Expr, MemRefExpr, MemRefId, ProcId, StmtId, SymbolId};

/// Where a symbol lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolScope {
    Global,
    Local(ProcId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDecl {
    pub id: SymbolId,
    pub name: String,
    pub scope: SymbolScope,
}

#[derive(Debug, Clone)]
pub struct ProcedureDecl {
    pub id: ProcId,
    pub name: String,
    /// `false` for external declarations without a body
    pub defined: bool,
    pub formals: Vec<SymbolId>,
    pub by_reference: FxHashSet<SymbolId>,
    pub statements: Vec<StmtId>,
}

impl ProcedureDecl {
    pub fn new(id: ProcId, name: impl Into<String>, defined: bool) -> Self {
        Self {
            id,
            name: name.into(),
            defined,
            formals: Vec::new(),
            by_reference: FxHashSet::default(),
            statements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatementDecl {
    pub defs: Vec<MemRefId>,
    pub uses: Vec<MemRefId>,
    pub calls: Vec<CallSiteId>,
}

impl StatementDecl {
    /// Defs first, then uses, without duplicates
    pub fn all_mem_refs(&self) -> Vec<MemRefId> {
        let mut seen = FxHashSet::default();
        self.defs
            .iter()
            .chain(self.uses.iter())
            .copied()
            .filter(|m| seen.insert(*m))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MemRefDecl {
    pub expr: MemRefExpr,
    pub stmt: Option<StmtId>,
}

#[derive(Debug, Clone)]
pub struct CallSiteDecl {
    pub stmt: StmtId,
    pub target: Option<ProcId>,
    pub actuals: Vec<Expr>,
}
