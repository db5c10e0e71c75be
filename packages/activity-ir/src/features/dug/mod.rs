//! # Dependence-Use Graph and activity analysis
//!
//! Symbol-level interprocedural dependence graph with four edge kinds
//! (CFLOW, CALL, RETURN, PARAM), per-procedure dependence matrices closed
//! bottom-up over the call graph, and the varied/useful marker that decides
//! which symbols, statements and memory references are active.
//!
//! ## Usage
//! ```text
//! let result = ActivityAnalysis::default().run(&program, &[x], &[y])?;
//! assert!(result.is_active(&ActiveEntity::from(y)));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{ActivityAnalysis, ActivityReport, ActivityResult, AnalysisStats};
pub use domain::{
    ActiveSets, CallBinding, CallBindings, DependenceGraph, DependenceMatrix, DugDto, DugEdge,
    DugNode, EdgeId, EdgeKind, EdgeView, NodeId,
};
pub use infrastructure::{
    ActivityMarker, BuildArtifacts, BuildStats, CallContextStack, ClosureStats, ContextEntry,
    DependenceClosure, GraphBuilder, MarkStats, TraversalState,
};
pub use ports::{ActiveEntity, ActivityQuery};
