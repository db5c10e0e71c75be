//! Activity marker
//!
//! Two dual, call-context-sensitive traversals over the DUG:
//! - `mark_varied` walks outgoing edges from independent symbols
//! - `mark_useful` walks incoming edges from dependent symbols, and only
//!   through nodes already varied
//!
//! Both run as an explicit frame stack. Every context push made before
//! descending into a node is undone when that node's frame is popped, in
//! the same order a recursive walk would.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::trace;

use super::context::{CallContextStack, ContextEntry};
use crate::errors::{ActivityError, Result};
use crate::features::dug::domain::{ActiveSets, DependenceGraph, EdgeId, EdgeKind, NodeId};
use crate::shared::models::{CallSiteId, ProcId};

/// Visited edges and the cycle guard, shared by all seeds of one pass
#[derive(Debug, Default, Clone)]
pub struct TraversalState {
    pub visited_edges: FxHashSet<EdgeId>,
    pub on_path: FxHashSet<NodeId>,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkStats {
    pub varied_entered: usize,
    pub useful_entered: usize,
    pub cflow_followed: usize,
    pub call_followed: usize,
    pub return_followed: usize,
    pub param_followed: usize,
    /// CALL/RETURN edges refused because the context did not match
    pub context_rejected: usize,
}

impl MarkStats {
    fn followed(&mut self, kind: EdgeKind) {
        match kind {
            EdgeKind::CFlow => self.cflow_followed += 1,
            EdgeKind::Call => self.call_followed += 1,
            EdgeKind::Return => self.return_followed += 1,
            EdgeKind::Param => self.param_followed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Varied,
    Useful,
}

impl Pass {
    /// Edge kind that enters a callee context (pushes its call id)
    fn entering(self) -> EdgeKind {
        match self {
            Pass::Varied => EdgeKind::Call,
            Pass::Useful => EdgeKind::Return,
        }
    }

    /// Edge kind that leaves a callee context (must match the top)
    fn leaving(self) -> EdgeKind {
        match self {
            Pass::Varied => EdgeKind::Return,
            Pass::Useful => EdgeKind::Call,
        }
    }
}

/// Context fix-up applied after a child frame returns
#[derive(Debug, Clone, Copy)]
enum Restore {
    Pop,
    PushBack(CallSiteId),
    Nothing,
}

impl Restore {
    fn apply(self, stack: &mut CallContextStack) {
        match self {
            Restore::Pop => {
                stack.pop();
            }
            Restore::PushBack(call) => stack.push_call(call),
            Restore::Nothing => {}
        }
    }
}

struct Frame {
    proc: ProcId,
    through_globals: bool,
    edges: Vec<EdgeId>,
    next: usize,
    /// Node being visited below this frame and the fix-up for it
    child: Option<(NodeId, Restore)>,
}

pub struct ActivityMarker<'a> {
    graph: &'a mut DependenceGraph,
    active: &'a mut ActiveSets,
    stats: MarkStats,
}

impl<'a> ActivityMarker<'a> {
    pub fn new(graph: &'a mut DependenceGraph, active: &'a mut ActiveSets) -> Self {
        Self {
            graph,
            active,
            stats: MarkStats::default(),
        }
    }

    pub fn stats(&self) -> &MarkStats {
        &self.stats
    }

    pub fn into_stats(self) -> MarkStats {
        self.stats
    }

    /// Mark `node` and everything forward-reachable from it under the
    /// call-context discipline as varied.
    pub fn mark_varied(
        &mut self,
        node: NodeId,
        stack: &mut CallContextStack,
        state: &mut TraversalState,
        proc: ProcId,
    ) -> Result<()> {
        self.traverse(Pass::Varied, node, stack, state, proc)
    }

    /// Mark `node` and every varied node backward-reachable from it as
    /// useful, publishing newly useful nodes into the active sets.
    pub fn mark_useful(
        &mut self,
        node: NodeId,
        stack: &mut CallContextStack,
        state: &mut TraversalState,
        proc: ProcId,
    ) -> Result<()> {
        self.traverse(Pass::Useful, node, stack, state, proc)
    }

    fn traverse(
        &mut self,
        pass: Pass,
        seed: NodeId,
        stack: &mut CallContextStack,
        state: &mut TraversalState,
        proc: ProcId,
    ) -> Result<()> {
        let mut frames: Vec<Frame> = Vec::new();
        match self.enter(pass, seed, proc, stack)? {
            Some(frame) => frames.push(frame),
            None => return Ok(()),
        }

        while let Some(top) = frames.last_mut() {
            if top.next == top.edges.len() {
                frames.pop();
                if let Some(parent) = frames.last_mut() {
                    if let Some((node, restore)) = parent.child.take() {
                        state.on_path.remove(&node);
                        restore.apply(stack);
                    }
                }
                continue;
            }

            let edge_id = top.edges[top.next];
            top.next += 1;
            let frame_proc = top.proc;
            let through_globals = top.through_globals;

            let view = self.graph.edge(edge_id).ok_or_else(|| {
                ActivityError::invariant(format!("edge {:?} listed but not registered", edge_id))
            })?;
            let kind = view.edge.kind;
            let call_site = view.edge.call_site;
            let (next, next_proc) = match pass {
                Pass::Varied => (view.sink, view.edge.sink_proc),
                Pass::Useful => (view.source, view.edge.source_proc),
            };

            if state.visited_edges.contains(&edge_id) || state.on_path.contains(&next) {
                continue;
            }
            state.on_path.insert(next);

            let restore = if kind == pass.entering() {
                let call = require_call_site(kind, edge_id, call_site)?;
                state.visited_edges.insert(edge_id);
                stack.push_call(call);
                Some(Restore::Pop)
            } else if kind == pass.leaving() {
                let call = require_call_site(kind, edge_id, call_site)?;
                state.visited_edges.insert(edge_id);
                if through_globals {
                    Some(Restore::Nothing)
                } else if stack.matches(call) {
                    stack.pop();
                    Some(Restore::PushBack(call))
                } else {
                    trace!("{} edge {:?} rejected: context top is not {}", kind.as_str(), edge_id, call);
                    self.stats.context_rejected += 1;
                    None
                }
            } else {
                if kind != EdgeKind::Param {
                    state.visited_edges.insert(edge_id);
                }
                if next_proc != frame_proc {
                    stack.push(ContextEntry::Global);
                    Some(Restore::Pop)
                } else {
                    Some(Restore::Nothing)
                }
            };

            let Some(restore) = restore else {
                state.on_path.remove(&next);
                continue;
            };
            self.stats.followed(kind);

            match self.enter(pass, next, next_proc, stack)? {
                Some(child) => {
                    if let Some(parent) = frames.last_mut() {
                        parent.child = Some((next, restore));
                    }
                    frames.push(child);
                }
                None => {
                    state.on_path.remove(&next);
                    restore.apply(stack);
                }
            }
        }
        Ok(())
    }

    /// Flag `node` for `pass` and open its frame. `None` when the useful
    /// pass reaches a node that was never varied.
    fn enter(
        &mut self,
        pass: Pass,
        node: NodeId,
        proc: ProcId,
        stack: &CallContextStack,
    ) -> Result<Option<Frame>> {
        let weight = self.graph.node_mut(node).ok_or_else(|| {
            ActivityError::invariant(format!("marker reached unregistered node {:?}", node))
        })?;

        match pass {
            Pass::Varied => {
                weight.varied = true;
                self.stats.varied_entered += 1;
            }
            Pass::Useful => {
                if !weight.varied {
                    return Ok(None);
                }
                if !weight.useful {
                    weight.useful = true;
                    self.active.symbols.insert(weight.symbol);
                    self.active.locations.insert(weight.location.clone());
                    self.active.stmts.extend(weight.stmts.iter().copied());
                    self.active.mem_refs.extend(weight.mem_refs.iter().copied());
                }
                self.stats.useful_entered += 1;
            }
        }

        let edges = match pass {
            Pass::Varied => self.graph.outgoing(node),
            Pass::Useful => self.graph.incoming(node),
        };
        Ok(Some(Frame {
            proc,
            through_globals: stack.through_globals(),
            edges,
            next: 0,
            child: None,
        }))
    }
}

fn require_call_site(kind: EdgeKind, edge: EdgeId, call_site: Option<CallSiteId>) -> Result<CallSiteId> {
    call_site.ok_or_else(|| {
        ActivityError::invariant(format!("{} edge {:?} has no call site", kind.as_str(), edge))
    })
}
