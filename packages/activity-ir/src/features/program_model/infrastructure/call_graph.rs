//! Call graph with petgraph
//!
//! Directed graph where nodes are procedures and an edge `A -> B` carries the
//! call site at which `A` calls `B`. Parallel edges are kept (one per site).

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{DfsPostOrder, IntoNeighbors, Reversed, Visitable};
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::features::program_model::ports::Orientation;
use crate::shared::models::{CallSiteId, ProcId};

#[derive(Debug, Default, Clone)]
pub struct CallGraph {
    graph: DiGraph<ProcId, CallSiteId>,
    proc_to_node: FxHashMap<ProcId, NodeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node for `proc`
    pub fn add_procedure(&mut self, proc: ProcId) -> NodeIndex {
        if let Some(&idx) = self.proc_to_node.get(&proc) {
            return idx;
        }
        let idx = self.graph.add_node(proc);
        self.proc_to_node.insert(proc, idx);
        idx
    }

    pub fn add_call(&mut self, caller: ProcId, callee: ProcId, site: CallSiteId) {
        let from = self.add_procedure(caller);
        let to = self.add_procedure(callee);
        self.graph.add_edge(from, to, site);
    }

    pub fn num_procedures(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_calls(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, proc: ProcId) -> bool {
        self.proc_to_node.contains_key(&proc)
    }

    /// Reverse-postorder over the whole graph.
    ///
    /// Roots (no incoming edge in the chosen orientation) are started first,
    /// in insertion order; every remaining node is then started in insertion
    /// order so that cyclic components without a root are still covered.
    pub fn reverse_postorder(&self, orientation: Orientation) -> Vec<ProcId> {
        let incoming = match orientation {
            Orientation::Forward => Direction::Incoming,
            Orientation::Reversed => Direction::Outgoing,
        };
        let roots = self.graph.node_indices().filter(|&idx| {
            self.graph
                .neighbors_directed(idx, incoming)
                .next()
                .is_none()
        });
        let starts: Vec<NodeIndex> = roots.chain(self.graph.node_indices()).collect();

        let post = match orientation {
            Orientation::Forward => postorder(&self.graph, starts),
            Orientation::Reversed => postorder(Reversed(&self.graph), starts),
        };

        post.into_iter()
            .rev()
            .map(|idx| self.graph[idx])
            .collect()
    }

    pub fn neighbors(&self, proc: ProcId, direction: Direction) -> Vec<ProcId> {
        let Some(&idx) = self.proc_to_node.get(&proc) else {
            return Vec::new();
        };
        let mut out: Vec<ProcId> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

fn postorder<G>(graph: G, starts: Vec<NodeIndex>) -> Vec<NodeIndex>
where
    G: IntoNeighbors<NodeId = NodeIndex> + Visitable<NodeId = NodeIndex>,
{
    let mut dfs = DfsPostOrder::empty(graph);
    let mut order = Vec::new();
    for start in starts {
        dfs.move_to(start);
        while let Some(nx) = dfs.next(graph) {
            order.push(nx);
        }
    }
    order
}
