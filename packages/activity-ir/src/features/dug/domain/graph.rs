//! Dependence-Use Graph
//!
//! Arena of nodes and edges (petgraph `DiGraph`) plus a symbol -> node map
//! that enforces one node per symbol. The graph only grows: there is no
//! removal API.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::edge::{DugEdge, EdgeKind};
use super::node::DugNode;
use crate::errors::{ActivityError, Result};
use crate::shared::models::{Location, MemRefId, ProcId, StmtId, SymbolId};

pub type NodeId = NodeIndex;
pub type EdgeId = EdgeIndex;

/// Borrowed view of one edge with its endpoints
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'g> {
    pub id: EdgeId,
    pub source: NodeId,
    pub sink: NodeId,
    pub edge: &'g DugEdge,
}

#[derive(Debug, Default, Clone)]
pub struct DependenceGraph {
    graph: DiGraph<DugNode, DugEdge>,
    symbol_to_node: FxHashMap<SymbolId, NodeId>,
}

impl DependenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for `sym`, created on first request.
    ///
    /// `loc` and `proc` are only used when the node is created.
    pub fn get_or_create_node(&mut self, sym: SymbolId, loc: Location, proc: ProcId) -> NodeId {
        if let Some(&id) = self.symbol_to_node.get(&sym) {
            return id;
        }
        let id = self.graph.add_node(DugNode::new(sym, loc, proc));
        self.symbol_to_node.insert(sym, id);
        id
    }

    pub fn has_node(&self, sym: SymbolId) -> bool {
        self.symbol_to_node.contains_key(&sym)
    }

    /// Node registered for `sym`, if any
    pub fn node_id(&self, sym: SymbolId) -> Option<NodeId> {
        self.symbol_to_node.get(&sym).copied()
    }

    /// Node registered for `sym`; a missing node is a builder bug.
    pub fn node_for(&self, sym: SymbolId) -> Result<NodeId> {
        self.node_id(sym).ok_or_else(|| {
            ActivityError::invariant(format!("no DUG node registered for {}", sym))
        })
    }

    /// Register an edge; indexed on both endpoints.
    pub fn add_edge(&mut self, source: NodeId, sink: NodeId, edge: DugEdge) -> Result<EdgeId> {
        if self.graph.node_weight(source).is_none() || self.graph.node_weight(sink).is_none() {
            return Err(ActivityError::invariant(format!(
                "{} edge between unregistered nodes {:?} -> {:?}",
                edge.kind.as_str(),
                source,
                sink
            )));
        }
        if edge.kind.needs_call_site() && edge.call_site.is_none() {
            return Err(ActivityError::invariant(format!(
                "{} edge without a call site",
                edge.kind.as_str()
            )));
        }
        Ok(self.graph.add_edge(source, sink, edge))
    }

    /// Record that `stmt` (through `mem_ref`) references the node's symbol
    pub fn note_reference(&mut self, node: NodeId, stmt: StmtId, mem_ref: Option<MemRefId>) {
        if let Some(weight) = self.graph.node_weight_mut(node) {
            weight.stmts.insert(stmt);
            if let Some(mem_ref) = mem_ref {
                weight.mem_refs.insert(mem_ref);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&DugNode> {
        self.graph.node_weight(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DugNode> {
        self.graph.node_weight_mut(id)
    }

    /// Node for `sym` by symbol
    pub fn node_by_symbol(&self, sym: SymbolId) -> Option<&DugNode> {
        self.node_id(sym).and_then(|id| self.node(id))
    }

    pub fn edge(&self, id: EdgeId) -> Option<EdgeView<'_>> {
        let (source, sink) = self.graph.edge_endpoints(id)?;
        let edge = self.graph.edge_weight(id)?;
        Some(EdgeView {
            id,
            source,
            sink,
            edge,
        })
    }

    /// Outgoing edges in insertion order
    pub fn outgoing(&self, id: NodeId) -> Vec<EdgeId> {
        self.edges_directed(id, Direction::Outgoing)
    }

    /// Incoming edges in insertion order
    pub fn incoming(&self, id: NodeId) -> Vec<EdgeId> {
        self.edges_directed(id, Direction::Incoming)
    }

    fn edges_directed(&self, id: NodeId, direction: Direction) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self
            .graph
            .edges_directed(id, direction)
            .map(|e| e.id())
            .collect();
        edges.sort();
        edges
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DugNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |id| (id, &self.graph[id]))
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(|e| EdgeView {
            id: e.id(),
            source: e.source(),
            sink: e.target(),
            edge: e.weight(),
        })
    }

    /// Edges `source_sym -> sink_sym` of the given kind
    pub fn edges_between(&self, source: SymbolId, sink: SymbolId, kind: EdgeKind) -> Vec<EdgeView<'_>> {
        let (Some(from), Some(to)) = (self.node_id(source), self.node_id(sink)) else {
            return Vec::new();
        };
        self.graph
            .edges_connecting(from, to)
            .filter(|e| e.weight().kind == kind)
            .map(|e| EdgeView {
                id: e.id(),
                source: from,
                sink: to,
                edge: e.weight(),
            })
            .collect()
    }

    pub fn has_edge(&self, source: SymbolId, sink: SymbolId, kind: EdgeKind) -> bool {
        !self.edges_between(source, sink, kind).is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge_count_by_kind(&self, kind: EdgeKind) -> usize {
        self.graph
            .edge_weights()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Serializable snapshot
    pub fn to_dto(&self) -> DugDto {
        DugDto {
            nodes: self
                .nodes()
                .map(|(id, node)| DugNodeDto {
                    id: id.index(),
                    node: node.clone(),
                })
                .collect(),
            edges: self
                .edges()
                .map(|view| DugEdgeDto {
                    source: self.graph[view.source].symbol,
                    sink: self.graph[view.sink].symbol,
                    edge: view.edge.clone(),
                })
                .collect(),
        }
    }
}

/// Serializable DTO for DependenceGraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DugDto {
    pub nodes: Vec<DugNodeDto>,
    pub edges: Vec<DugEdgeDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DugNodeDto {
    pub id: usize,
    #[serde(flatten)]
    pub node: DugNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DugEdgeDto {
    pub source: SymbolId,
    pub sink: SymbolId,
    #[serde(flatten)]
    pub edge: DugEdge,
}
