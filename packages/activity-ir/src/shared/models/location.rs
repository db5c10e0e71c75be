//! Abstract memory locations
//!
//! A `Location` is what the alias collaborator answers when asked which
//! storage a memory reference may touch. The variant set is closed; the
//! analysis only ever needs to know whether a location pins down exactly one
//! named symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MemRefId, StmtId, SymbolId};

/// Storage a memory reference may name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// A declared symbol (local, formal or global)
    Named { symbol: SymbolId, local: bool },

    /// Anonymous storage created at an allocation statement
    Unnamed { site: StmtId, local: bool },

    /// Alias analysis gave up; may be anything
    Unknown,

    /// Storage only reachable through a reference that is not visible
    /// in the current procedure (e.g. `*p` for a formal `p`)
    Invisible { mem_ref: MemRefId },

    /// Part of another location (array element, record field)
    SubSet { base: Box<Location> },
}

impl Location {
    #[inline]
    pub fn named(symbol: SymbolId) -> Self {
        Location::Named {
            symbol,
            local: true,
        }
    }

    #[inline]
    pub fn global(symbol: SymbolId) -> Self {
        Location::Named {
            symbol,
            local: false,
        }
    }

    pub fn subset_of(base: Location) -> Self {
        Location::SubSet {
            base: Box::new(base),
        }
    }

    /// The single symbol this location stands for, if it is unambiguous.
    ///
    /// A subset of a named location resolves to the enclosing symbol: an
    /// element write is a (partial) write of the array it belongs to.
    pub fn named_symbol(&self) -> Option<SymbolId> {
        match self {
            Location::Named { symbol, .. } => Some(*symbol),
            Location::SubSet { base } => base.named_symbol(),
            Location::Unnamed { .. } | Location::Unknown | Location::Invisible { .. } => None,
        }
    }

    pub fn is_local(&self) -> bool {
        match self {
            Location::Named { local, .. } | Location::Unnamed { local, .. } => *local,
            Location::SubSet { base } => base.is_local(),
            Location::Unknown | Location::Invisible { .. } => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Named { symbol, local } => {
                write!(f, "{}{}", symbol, if *local { "" } else { "@global" })
            }
            Location::Unnamed { site, .. } => write!(f, "alloc@{}", site),
            Location::Unknown => write!(f, "unknown"),
            Location::Invisible { mem_ref } => write!(f, "invisible({})", mem_ref),
            Location::SubSet { base } => write!(f, "subset({})", base),
        }
    }
}
