//! Dependence-matrix closure
//!
//! Bottom-up over the call graph (callees before callers): close each
//! procedure's matrix, turn formal-to-formal dependences into PARAM edges,
//! and push them into every caller's matrix through the actuals bound at
//! each call site.
//!
//! The default single sweep does not iterate over recursive cycles: a
//! procedure visited before its callee in a cycle misses that callee's
//! summary. `ClosureStrategy::Fixpoint` re-sweeps until nothing changes.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ClosureConfig, ClosureStrategy};
use crate::errors::Result;
use crate::features::dug::domain::{
    CallBindings, DependenceGraph, DependenceMatrix, DugEdge, EdgeKind,
};
use crate::features::program_model::ports::{CallGraphProvider, Orientation};
use crate::shared::models::{ProcId, SymbolId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClosureStats {
    pub rounds: usize,
    pub procedures_closed: usize,
    pub pairs_added: usize,
    pub param_edges: usize,
    pub caller_pairs: usize,
    /// Matrices still changed when the fixpoint budget ran out
    pub unconverged: usize,
}

pub struct DependenceClosure<'a> {
    graph: &'a mut DependenceGraph,
    matrices: &'a mut BTreeMap<ProcId, DependenceMatrix>,
    bindings: &'a CallBindings,
    /// Formal pairs that already have a PARAM edge
    emitted: FxHashSet<(SymbolId, SymbolId)>,
    stats: ClosureStats,
}

impl<'a> DependenceClosure<'a> {
    pub fn new(
        graph: &'a mut DependenceGraph,
        matrices: &'a mut BTreeMap<ProcId, DependenceMatrix>,
        bindings: &'a CallBindings,
    ) -> Self {
        Self {
            graph,
            matrices,
            bindings,
            emitted: FxHashSet::default(),
            stats: ClosureStats::default(),
        }
    }

    /// Close every procedure, callees first
    pub fn run<C>(mut self, call_graph: &C, config: &ClosureConfig) -> Result<ClosureStats>
    where
        C: CallGraphProvider + ?Sized,
    {
        let order = call_graph.reverse_postorder(Orientation::Reversed);
        info!("Closing dependence matrices over {} procedures", order.len());

        self.sweep(&order, false)?;

        if config.strategy == ClosureStrategy::Fixpoint {
            warn!(
                "closure strategy is fixpoint: iterating beyond the single bottom-up sweep (max {} rounds)",
                config.max_fixpoint_rounds
            );
            while self.stats.rounds < config.max_fixpoint_rounds && self.has_dirty() {
                self.sweep(&order, true)?;
            }
        }

        self.stats.unconverged = self.matrices.values().filter(|m| m.is_dirty()).count();
        if config.strategy == ClosureStrategy::Fixpoint && self.stats.unconverged > 0 {
            warn!(
                "fixpoint budget exhausted after {} rounds, {} matrices unconverged",
                self.stats.rounds, self.stats.unconverged
            );
        }

        info!(
            "Closure done: {} rounds, {} PARAM edges, {} caller pairs",
            self.stats.rounds, self.stats.param_edges, self.stats.caller_pairs
        );
        Ok(self.stats)
    }

    fn sweep(&mut self, order: &[ProcId], dirty_only: bool) -> Result<()> {
        self.stats.rounds += 1;
        for &proc in order {
            let Some(matrix) = self.matrices.get(&proc) else {
                continue;
            };
            if dirty_only && !matrix.is_dirty() {
                continue;
            }
            self.transitive_closure(proc);
            self.edges_between_actuals(proc)?;
        }
        debug!("closure round {} finished", self.stats.rounds);
        Ok(())
    }

    fn has_dirty(&self) -> bool {
        self.matrices.values().any(DependenceMatrix::is_dirty)
    }

    /// Warshall closure of `proc`'s matrix. Returns the number of pairs added.
    pub fn transitive_closure(&mut self, proc: ProcId) -> usize {
        let Some(matrix) = self.matrices.get_mut(&proc) else {
            return 0;
        };
        let added = matrix.transitive_closure();
        self.stats.procedures_closed += 1;
        self.stats.pairs_added += added;
        added
    }

    /// PARAM edges for dependent formal pairs of `proc`, propagated to every
    /// caller's matrix. Returns the number of new caller pairs.
    pub fn edges_between_actuals(&mut self, proc: ProcId) -> Result<usize> {
        let formals = self.bindings.formals(proc);
        let Some(matrix) = self.matrices.get(&proc) else {
            return Ok(0);
        };

        let mut pairs: Vec<(SymbolId, SymbolId)> = Vec::new();
        for &f1 in formals {
            for &f2 in formals {
                if f1 != f2 && matrix.depends(f1, f2) {
                    pairs.push((f1, f2));
                }
            }
        }

        let mut propagated = 0;
        for (f1, f2) in pairs {
            if self.emitted.insert((f1, f2)) {
                let source = self.graph.node_for(f1)?;
                let sink = self.graph.node_for(f2)?;
                self.graph
                    .add_edge(source, sink, DugEdge::new(EdgeKind::Param, None, proc, proc))?;
                self.stats.param_edges += 1;
            }

            for site in self.bindings.sites_calling(proc) {
                let caller = self
                    .matrices
                    .entry(site.caller)
                    .or_insert_with(DependenceMatrix::new);
                for a1 in site.actuals_of(f1) {
                    for a2 in site.actuals_of(f2) {
                        // Matrices carry no diagonal: one symbol passed for
                        // both formals adds nothing to the caller.
                        if a1 != a2 && caller.record(a1, a2) {
                            propagated += 1;
                        }
                    }
                }
            }
        }

        self.stats.caller_pairs += propagated;
        Ok(propagated)
    }
}
