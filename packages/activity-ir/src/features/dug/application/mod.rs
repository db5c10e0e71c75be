/*
 * Activity Analysis Application Layer
 *
 * Builder -> Closure -> Marker over one program:
 * ```
 * ProgramFacts ──> GraphBuilder ──> DependenceClosure ──> ActivityMarker
 *                  (CFLOW/CALL/     (PARAM edges,         (varied from independents,
 *                   RETURN edges)    caller matrices)      useful from dependents)
 * ```
 *
 * Any invariant violation aborts the run; no partial result is returned.
 */

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{ActiveSets, DependenceGraph, DependenceMatrix, DugDto, NodeId};
use super::infrastructure::{
    ActivityMarker, BuildArtifacts, BuildStats, CallContextStack, ClosureStats,
    DependenceClosure, GraphBuilder, MarkStats, TraversalState,
};
use super::ports::ActivityQuery;
use crate::config::ActivityConfig;
use crate::errors::Result;
use crate::features::program_model::ports::ProgramFacts;
use crate::shared::models::{Location, MemRefId, ProcId, StmtId, SymbolId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub build: BuildStats,
    pub closure: ClosureStats,
    pub mark: MarkStats,
}

/// Activity analysis entry point
#[derive(Debug, Clone, Default)]
pub struct ActivityAnalysis {
    config: ActivityConfig,
}

impl ActivityAnalysis {
    /// Create with a validated configuration
    pub fn new(config: ActivityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Run the whole analysis.
    ///
    /// Seeds without a DUG node (never referenced through a resolvable memory
    /// reference) are kept in the independent/dependent sets but mark nothing.
    pub fn run<P>(
        &self,
        program: &P,
        independents: &[SymbolId],
        dependents: &[SymbolId],
    ) -> Result<ActivityResult>
    where
        P: ProgramFacts + ?Sized,
    {
        info!(
            "Activity analysis: {} independents, {} dependents",
            independents.len(),
            dependents.len()
        );

        let BuildArtifacts {
            mut graph,
            mut matrices,
            bindings,
            stats: build,
        } = GraphBuilder::new(program, self.config.builder.clone()).build()?;

        let closure = DependenceClosure::new(&mut graph, &mut matrices, &bindings)
            .run(program, &self.config.closure)?;

        let mut active = ActiveSets::new();
        active.independent.extend(independents.iter().copied());
        active.dependent.extend(dependents.iter().copied());

        let forward_seeds = seeds(&graph, independents);
        let backward_seeds = seeds(&graph, dependents);

        let mut marker = ActivityMarker::new(&mut graph, &mut active);

        let mut forward = TraversalState::new();
        for (node, proc) in forward_seeds {
            marker.mark_varied(node, &mut CallContextStack::new(), &mut forward, proc)?;
        }
        let mut backward = TraversalState::new();
        for (node, proc) in backward_seeds {
            marker.mark_useful(node, &mut CallContextStack::new(), &mut backward, proc)?;
        }
        let mark = marker.into_stats();

        info!(
            "Activity analysis done: {} active symbols, {} active statements",
            active.symbols.len(),
            active.stmts.len()
        );

        Ok(ActivityResult {
            graph,
            matrices,
            active,
            stats: AnalysisStats {
                build,
                closure,
                mark,
            },
        })
    }
}

fn seeds(graph: &DependenceGraph, symbols: &[SymbolId]) -> Vec<(NodeId, ProcId)> {
    symbols
        .iter()
        .filter_map(|&sym| {
            let found = graph
                .node_id(sym)
                .and_then(|id| graph.node(id).map(|node| (id, node.proc)));
            if found.is_none() {
                debug!("seed {} has no DUG node", sym);
            }
            found
        })
        .collect()
}

/// Outcome of one analysis run
#[derive(Debug, Clone)]
pub struct ActivityResult {
    graph: DependenceGraph,
    matrices: BTreeMap<ProcId, DependenceMatrix>,
    active: ActiveSets,
    stats: AnalysisStats,
}

impl ActivityResult {
    pub fn graph(&self) -> &DependenceGraph {
        &self.graph
    }

    /// Closed dependence matrix of `proc`
    pub fn matrix(&self, proc: ProcId) -> Option<&DependenceMatrix> {
        self.matrices.get(&proc)
    }

    pub fn active(&self) -> &ActiveSets {
        &self.active
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    pub fn is_varied(&self, sym: SymbolId) -> bool {
        self.graph.node_by_symbol(sym).map_or(false, |n| n.varied)
    }

    pub fn is_useful(&self, sym: SymbolId) -> bool {
        self.graph.node_by_symbol(sym).map_or(false, |n| n.useful)
    }

    pub fn to_report(&self) -> ActivityReport {
        ActivityReport {
            active: self.active.clone(),
            dug: self.graph.to_dto(),
            stats: self.stats.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_report())?)
    }
}

impl ActivityQuery for ActivityResult {
    fn independent_symbols(&self) -> &BTreeSet<SymbolId> {
        &self.active.independent
    }

    fn dependent_symbols(&self) -> &BTreeSet<SymbolId> {
        &self.active.dependent
    }

    fn active_symbols(&self) -> &BTreeSet<SymbolId> {
        &self.active.symbols
    }

    fn active_stmts(&self) -> &BTreeSet<StmtId> {
        &self.active.stmts
    }

    fn active_mem_refs(&self) -> &BTreeSet<MemRefId> {
        &self.active.mem_refs
    }

    fn active_locations(&self) -> &BTreeSet<Location> {
        &self.active.locations
    }
}

/// Serializable summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub active: ActiveSets,
    pub dug: DugDto,
    pub stats: AnalysisStats,
}
