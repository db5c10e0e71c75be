//! Program model infrastructure

pub mod call_graph;
pub mod in_memory;

pub use call_graph::CallGraph;
pub use in_memory::ProgramModel;
