/*
 * Activity IR - Dependence-Use Graph and Activity Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (ids, Location, MemRefExpr, Expr)
 * - features/    : Vertical slices (program_model → dug)
 * - config/      : Presets, per-phase configs, versioned YAML
 *
 * Pipeline:
 * - GraphBuilder      : CFLOW / CALL / RETURN edges per procedure
 * - DependenceClosure : Warshall closure + PARAM edges, callees first
 * - ActivityMarker    : varied (forward) and useful (backward) marking
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Edge insertion carries both endpoints' contexts
#![allow(clippy::needless_range_loop)] // Range loop for matrix indexing
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ActivityConfig, BuilderConfig, ClosureConfig, ClosureStrategy, Preset};
pub use errors::{ActivityError, Result};
pub use features::dug::{
    ActiveEntity, ActiveSets, ActivityAnalysis, ActivityQuery, ActivityResult, DependenceGraph,
    DependenceMatrix, DugEdge, DugNode, EdgeKind,
};
pub use features::program_model::{
    AliasOracle, CallGraphProvider, Orientation, ParamBindings, ProgramFacts, ProgramIr,
    ProgramModel,
};
pub use shared::models::{
    CallSiteId, Expr, Location, MemRefExpr, MemRefId, ProcId, StmtId, SymbolId,
};
