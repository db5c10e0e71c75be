//! Global activity results
//!
//! Monotone sets filled by the marker. Ordered sets keep the published
//! result deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::shared::models::{Location, MemRefId, StmtId, SymbolId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSets {
    pub independent: BTreeSet<SymbolId>,
    pub dependent: BTreeSet<SymbolId>,
    pub symbols: BTreeSet<SymbolId>,
    pub locations: BTreeSet<Location>,
    pub stmts: BTreeSet<StmtId>,
    pub mem_refs: BTreeSet<MemRefId>,
}

impl ActiveSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
