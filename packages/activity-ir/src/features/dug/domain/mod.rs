//! DUG domain models

pub mod active_sets;
pub mod bindings;
pub mod dep_matrix;
pub mod edge;
pub mod graph;
pub mod node;

pub use active_sets::ActiveSets;
pub use bindings::{CallBinding, CallBindings};
pub use dep_matrix::DependenceMatrix;
pub use edge::{DugEdge, EdgeKind};
pub use graph::{DependenceGraph, DugDto, DugEdgeDto, DugNodeDto, EdgeId, EdgeView, NodeId};
pub use node::DugNode;
