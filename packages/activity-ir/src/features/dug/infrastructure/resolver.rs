//! Memory reference -> symbol resolution
//!
//! Only references whose shape names storage directly (`Named`, or an
//! element of a directly named aggregate) resolve, and only to the named
//! symbols among their may-locations. Pointer-indirect, anonymous and
//! unknown storage never becomes a DUG node.

use tracing::trace;

use crate::features::program_model::ports::{AliasOracle, ProgramIr};
use crate::shared::models::{MemRefId, ProcId, SymbolId};

/// Symbols `mem_ref` may name in `proc`, without duplicates
pub fn resolve_mem_ref<P>(program: &P, proc: ProcId, mem_ref: MemRefId) -> Vec<SymbolId>
where
    P: ProgramIr + AliasOracle + ?Sized,
{
    let direct = program
        .mem_ref_expr(mem_ref)
        .map_or(false, |expr| expr.is_direct());
    if !direct {
        trace!("skip indirect mem ref {} in {}", mem_ref, proc);
        return Vec::new();
    }

    let mut out: Vec<SymbolId> = Vec::new();
    for loc in program.may_locs(proc, mem_ref) {
        match loc.named_symbol() {
            Some(sym) if !out.contains(&sym) => out.push(sym),
            Some(_) => {}
            None => trace!("skip unnamed location {} for {}", loc, mem_ref),
        }
    }
    out
}
