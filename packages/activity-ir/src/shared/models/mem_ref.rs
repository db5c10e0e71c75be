//! Memory reference expressions
//!
//! Shape of a memory reference as it appears in a statement. Only direct
//! shapes (a named symbol, possibly indexed) can be mapped to a symbol
//! without consulting points-to facts; anything behind a dereference is left
//! to the alias collaborator and treated as ambiguous here.

use serde::{Deserialize, Serialize};

use super::ids::{StmtId, SymbolId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemRefExpr {
    /// `x`
    Named { symbol: SymbolId },

    /// Storage allocated at `site` (e.g. `new T`)
    Unnamed { site: StmtId },

    /// Reference the front end could not classify
    Unknown,

    /// `*p`, `**p`, ...
    Deref { base: Box<MemRefExpr>, levels: u32 },

    /// `a[i]`, `r.f`
    IdxAccess { base: Box<MemRefExpr> },
}

impl MemRefExpr {
    #[inline]
    pub fn named(symbol: SymbolId) -> Self {
        MemRefExpr::Named { symbol }
    }

    pub fn deref(base: MemRefExpr) -> Self {
        MemRefExpr::Deref {
            base: Box::new(base),
            levels: 1,
        }
    }

    pub fn index(base: MemRefExpr) -> Self {
        MemRefExpr::IdxAccess {
            base: Box::new(base),
        }
    }

    /// Symbol named by a direct (non pointer-indirect) reference.
    pub fn direct_symbol(&self) -> Option<SymbolId> {
        match self {
            MemRefExpr::Named { symbol } => Some(*symbol),
            MemRefExpr::IdxAccess { base } => base.direct_symbol(),
            MemRefExpr::Deref { .. } | MemRefExpr::Unnamed { .. } | MemRefExpr::Unknown => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.direct_symbol().is_some()
    }
}
