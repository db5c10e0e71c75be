//! DUG builder
//!
//! Walks every defined procedure in call-graph reverse-postorder and emits:
//! - CFLOW `use -> def` for every statement (recorded in the procedure's
//!   dependence matrix as well)
//! - CALL `actual -> formal` at every resolved call site
//! - RETURN `formal -> actual` for by-reference formals
//!
//! Cycles in the call graph are visited once, not iterated.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

use super::resolver::resolve_mem_ref;
use crate::config::BuilderConfig;
use crate::errors::{ActivityError, Result};
use crate::features::dug::domain::{
    CallBinding, CallBindings, DependenceGraph, DependenceMatrix, DugEdge, EdgeId, EdgeKind,
    NodeId,
};
use crate::features::program_model::ports::{Orientation, ProgramFacts};
use crate::shared::models::{CallSiteId, MemRefId, ProcId, StmtId, SymbolId};

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub procedures_built: usize,
    pub procedures_skipped: usize,
    pub statements: usize,
    pub unresolved_mem_refs: usize,
    pub dropped_calls: usize,
    pub self_loops_skipped: usize,
    pub duplicate_cflow_skipped: usize,
}

/// Everything the closure and the marker need from the build
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub graph: DependenceGraph,
    pub matrices: BTreeMap<ProcId, DependenceMatrix>,
    pub bindings: CallBindings,
    pub stats: BuildStats,
}

pub struct GraphBuilder<'p, P: ProgramFacts + ?Sized> {
    program: &'p P,
    config: BuilderConfig,
    graph: DependenceGraph,
    matrices: BTreeMap<ProcId, DependenceMatrix>,
    bindings: CallBindings,
    /// `(kind, from, to)` already inserted; consulted for CFLOW only
    seen: AHashSet<(EdgeKind, SymbolId, SymbolId)>,
    stats: BuildStats,
}

impl<'p, P: ProgramFacts + ?Sized> GraphBuilder<'p, P> {
    pub fn new(program: &'p P, config: BuilderConfig) -> Self {
        Self {
            program,
            config,
            graph: DependenceGraph::new(),
            matrices: BTreeMap::new(),
            bindings: CallBindings::new(),
            seen: AHashSet::new(),
            stats: BuildStats::default(),
        }
    }

    /// Build the DUG for the whole program
    pub fn build(mut self) -> Result<BuildArtifacts> {
        let order = self.program.reverse_postorder(Orientation::Forward);
        info!("Building DUG over {} procedures", order.len());

        for proc in order {
            if !self.program.is_defined(proc) {
                debug!("skip undefined procedure {}", proc);
                self.stats.procedures_skipped += 1;
                continue;
            }
            self.build_procedure(proc)?;
        }

        info!(
            "DUG built: {} nodes, {} edges ({} CFLOW, {} CALL, {} RETURN)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.edge_count_by_kind(EdgeKind::CFlow),
            self.graph.edge_count_by_kind(EdgeKind::Call),
            self.graph.edge_count_by_kind(EdgeKind::Return),
        );

        Ok(BuildArtifacts {
            graph: self.graph,
            matrices: self.matrices,
            bindings: self.bindings,
            stats: self.stats,
        })
    }

    fn build_procedure(&mut self, proc: ProcId) -> Result<()> {
        let formals = self.program.formals(proc);
        let matrix = self
            .matrices
            .entry(proc)
            .or_insert_with(DependenceMatrix::new);
        for &formal in &formals {
            matrix.register(formal);
        }
        self.bindings.set_formals(proc, formals);

        for stmt in self.program.statements(proc) {
            self.stats.statements += 1;
            self.label_use_def_edges(stmt, proc)?;
            self.label_call_ret_edges(stmt, proc)?;
        }
        self.stats.procedures_built += 1;
        Ok(())
    }

    /// CFLOW edges `use -> def` for one statement
    pub fn label_use_def_edges(&mut self, stmt: StmtId, proc: ProcId) -> Result<()> {
        let mut resolved: FxHashMap<MemRefId, Vec<SymbolId>> = FxHashMap::default();
        let mut all: Vec<SymbolId> = Vec::new();

        for mem_ref in self.program.mem_refs(stmt) {
            let syms = resolve_mem_ref(self.program, proc, mem_ref);
            if syms.is_empty() {
                self.stats.unresolved_mem_refs += 1;
            }
            for &sym in &syms {
                let node = self.ensure_node(sym, proc)?;
                self.graph.note_reference(node, stmt, Some(mem_ref));
                if !all.contains(&sym) {
                    all.push(sym);
                }
            }
            resolved.insert(mem_ref, syms);
        }

        let uses = self.collect(&resolved, proc, self.program.use_mem_refs(stmt));
        let defs: Vec<SymbolId> = self
            .collect(&resolved, proc, self.program.def_mem_refs(stmt))
            .into_iter()
            .filter(|d| all.contains(d))
            .collect();

        for &u in &uses {
            for &d in &defs {
                if u == d {
                    continue;
                }
                self.insert_edge(u, d, EdgeKind::CFlow, None, proc, proc)?;
                self.matrix_mut(proc).record(u, d);
            }
        }
        Ok(())
    }

    fn collect(
        &self,
        resolved: &FxHashMap<MemRefId, Vec<SymbolId>>,
        proc: ProcId,
        mem_refs: Vec<MemRefId>,
    ) -> Vec<SymbolId> {
        let mut out: Vec<SymbolId> = Vec::new();
        for mem_ref in mem_refs {
            let syms = match resolved.get(&mem_ref) {
                Some(syms) => syms.clone(),
                None => resolve_mem_ref(self.program, proc, mem_ref),
            };
            for sym in syms {
                if !out.contains(&sym) {
                    out.push(sym);
                }
            }
        }
        out
    }

    /// CALL/RETURN edges for every resolved call site in `stmt`
    pub fn label_call_ret_edges(&mut self, stmt: StmtId, proc: ProcId) -> Result<()> {
        for call in self.program.call_sites(stmt) {
            let Some(callee) = self.program.call_target(call) else {
                debug!("skip {} in {}: unknown callee", call, proc);
                self.stats.dropped_calls += 1;
                continue;
            };
            if !self.program.is_defined(callee) {
                debug!("skip {} in {}: {} has no body", call, proc, callee);
                self.stats.dropped_calls += 1;
                continue;
            }
            self.label_call_site(call, proc, callee)?;
        }
        Ok(())
    }

    fn label_call_site(&mut self, call: CallSiteId, caller: ProcId, callee: ProcId) -> Result<()> {
        let mut binding = CallBinding::new(call, caller, callee);

        for (index, actual) in self.program.actuals(call).iter().enumerate() {
            let Some(formal) = self.program.bound_formal(call, index) else {
                debug!("{}: actual #{} has no formal in {}", call, index, callee);
                continue;
            };
            let by_reference = self.program.is_by_reference(callee, formal);

            for mem_ref in actual.mem_refs() {
                for sym in resolve_mem_ref(self.program, caller, mem_ref) {
                    self.insert_edge(sym, formal, EdgeKind::Call, Some(call), caller, callee)?;
                    if by_reference {
                        self.insert_edge(formal, sym, EdgeKind::Return, Some(call), callee, caller)?;
                    }
                    binding.bind(formal, sym);
                }
            }
        }

        self.bindings.insert(binding);
        Ok(())
    }

    /// Insert `from -> to`, creating both nodes.
    ///
    /// Self loops are never inserted; CFLOW edges are inserted at most once
    /// per `(from, to)`.
    pub fn insert_edge(
        &mut self,
        from: SymbolId,
        to: SymbolId,
        kind: EdgeKind,
        call: Option<CallSiteId>,
        from_proc: ProcId,
        to_proc: ProcId,
    ) -> Result<Option<EdgeId>> {
        if from == to {
            self.stats.self_loops_skipped += 1;
            return Ok(None);
        }
        if kind == EdgeKind::CFlow && !self.seen.insert((kind, from, to)) {
            self.stats.duplicate_cflow_skipped += 1;
            return Ok(None);
        }

        let source = self.ensure_node(from, from_proc)?;
        let sink = self.ensure_node(to, to_proc)?;
        let edge = DugEdge::new(kind, call, from_proc, to_proc);
        self.graph.add_edge(source, sink, edge).map(Some)
    }

    fn ensure_node(&mut self, sym: SymbolId, proc: ProcId) -> Result<NodeId> {
        if let Some(id) = self.graph.node_id(sym) {
            return Ok(id);
        }
        let limit = self.config.max_nodes;
        if self.graph.node_count() >= limit {
            return Err(ActivityError::ResourceLimit {
                what: "dug nodes",
                value: self.graph.node_count() + 1,
                limit,
            });
        }
        let loc = self.program.location_of(proc, sym);
        Ok(self.graph.get_or_create_node(sym, loc, proc))
    }

    fn matrix_mut(&mut self, proc: ProcId) -> &mut DependenceMatrix {
        self.matrices
            .entry(proc)
            .or_insert_with(DependenceMatrix::new)
    }
}
