//! Program Model Ports - Interface Layer (Hexagonal Architecture)
//!
//! The activity analysis never looks at source code. Everything it knows
//! about a program comes through these four traits, each owned by a
//! different collaborator (IR, alias analysis, call graph, parameter
//! binding). `ProgramFacts` bundles them for the analysis entry points.

use crate::shared::models::{
    CallSiteId, Expr, Location, MemRefExpr, MemRefId, ProcId, StmtId, SymbolId,
};

/// Edge orientation used when ordering the call graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// caller -> callee
    Forward,
    /// callee -> caller
    Reversed,
}

/// Call graph protocol
///
/// Implementations can use any data structure (petgraph, HashMap, etc.)
pub trait CallGraphProvider {
    /// Every procedure exactly once, in reverse-postorder of a depth-first
    /// walk over the given orientation. Procedures unreachable from a root
    /// (cycles without an entry) still appear.
    fn reverse_postorder(&self, orientation: Orientation) -> Vec<ProcId>;

    /// Procedures called from `proc`
    fn callees(&self, proc: ProcId) -> Vec<ProcId>;

    /// Procedures that call `proc`
    fn callers(&self, proc: ProcId) -> Vec<ProcId>;
}

/// Per-procedure intermediate representation
pub trait ProgramIr {
    /// All procedures, defined or merely declared
    fn procedures(&self) -> Vec<ProcId>;

    /// Whether `proc` has a body to analyze
    fn is_defined(&self, proc: ProcId) -> bool;

    /// Statements of `proc` in program order
    fn statements(&self, proc: ProcId) -> Vec<StmtId>;

    /// Every memory reference occurring in `stmt` (defs, uses, call actuals)
    fn mem_refs(&self, stmt: StmtId) -> Vec<MemRefId>;

    /// Memory references `stmt` may write
    fn def_mem_refs(&self, stmt: StmtId) -> Vec<MemRefId>;

    /// Memory references `stmt` reads
    fn use_mem_refs(&self, stmt: StmtId) -> Vec<MemRefId>;

    /// Shape of a memory reference
    fn mem_ref_expr(&self, mem_ref: MemRefId) -> Option<MemRefExpr>;

    /// Call sites inside `stmt`
    fn call_sites(&self, stmt: StmtId) -> Vec<CallSiteId>;

    /// Procedure a call site invokes, when statically known
    fn call_target(&self, call: CallSiteId) -> Option<ProcId>;

    /// Formal parameters of `proc` in declaration order
    fn formals(&self, proc: ProcId) -> Vec<SymbolId>;

    /// Actual-argument expression trees of a call site, in argument order
    fn actuals(&self, call: CallSiteId) -> Vec<Expr>;
}

/// Alias / location collaborator
pub trait AliasOracle {
    /// Locations a memory reference in `proc` may name
    fn may_locs(&self, proc: ProcId, mem_ref: MemRefId) -> Vec<Location>;

    /// Location standing for `symbol` when seen from `proc`
    fn location_of(&self, proc: ProcId, symbol: SymbolId) -> Location;
}

/// Parameter-passing collaborator
pub trait ParamBindings {
    /// Whether writes to `formal` inside `proc` are visible to the caller
    fn is_by_reference(&self, proc: ProcId, formal: SymbolId) -> bool;

    /// Formal of the callee the `actual_index`-th actual of `call` binds to.
    /// `None` for surplus actuals and unresolved callees.
    fn bound_formal(&self, call: CallSiteId, actual_index: usize) -> Option<SymbolId>;
}

/// Everything the activity analysis consumes
pub trait ProgramFacts: ProgramIr + AliasOracle + ParamBindings + CallGraphProvider {}

impl<T> ProgramFacts for T where T: ProgramIr + AliasOracle + ParamBindings + CallGraphProvider {}
