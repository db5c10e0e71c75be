//! In-memory program model
//!
//! A fact store implementing every collaborator port. Front ends (or tests)
//! declare procedures, symbols, statements and calls; the model answers the
//! queries the activity analysis makes. It performs no alias analysis of its
//! own: a memory reference names the location its shape implies unless an
//! explicit may-location set was registered with `set_may_locs`.

use petgraph::Direction;
use rustc_hash::FxHashMap;

use super::call_graph::CallGraph;
use crate::features::program_model::domain::{
    CallSiteDecl, MemRefDecl, ProcedureDecl, StatementDecl, SymbolDecl, SymbolScope,
};
use crate::features::program_model::ports::{
    AliasOracle, CallGraphProvider, Orientation, ParamBindings, ProgramIr,
};
use crate::shared::models::{
    CallSiteId, Expr, Location, MemRefExpr, MemRefId, ProcId, StmtId, SymbolId,
};

#[derive(Debug, Default, Clone)]
pub struct ProgramModel {
    procedures: Vec<ProcedureDecl>,
    symbols: Vec<SymbolDecl>,
    statements: Vec<StatementDecl>,
    mem_refs: Vec<MemRefDecl>,
    call_sites: Vec<CallSiteDecl>,
    may_locs: FxHashMap<MemRefId, Vec<Location>>,
    call_graph: CallGraph,
}

impl ProgramModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Declarations
    // ═══════════════════════════════════════════════════════════════════

    /// Declare a procedure with a body
    pub fn add_procedure(&mut self, name: impl Into<String>) -> ProcId {
        self.push_procedure(name, true)
    }

    /// Declare a procedure without a body (library routine)
    pub fn declare_external(&mut self, name: impl Into<String>) -> ProcId {
        self.push_procedure(name, false)
    }

    fn push_procedure(&mut self, name: impl Into<String>, defined: bool) -> ProcId {
        let id = ProcId(self.procedures.len() as u32);
        self.procedures.push(ProcedureDecl::new(id, name, defined));
        self.call_graph.add_procedure(id);
        id
    }

    pub fn add_global(&mut self, name: impl Into<String>) -> SymbolId {
        self.push_symbol(name, SymbolScope::Global)
    }

    pub fn add_local(&mut self, proc: ProcId, name: impl Into<String>) -> SymbolId {
        self.push_symbol(name, SymbolScope::Local(proc))
    }

    /// Append a formal parameter to `proc`'s signature
    pub fn add_formal(&mut self, proc: ProcId, name: impl Into<String>, by_reference: bool) -> SymbolId {
        let sym = self.push_symbol(name, SymbolScope::Local(proc));
        if let Some(decl) = self.procedures.get_mut(proc.index()) {
            decl.formals.push(sym);
            if by_reference {
                decl.by_reference.insert(sym);
            }
        }
        sym
    }

    fn push_symbol(&mut self, name: impl Into<String>, scope: SymbolScope) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolDecl {
            id,
            name: name.into(),
            scope,
        });
        id
    }

    /// Register a memory reference not yet attached to a statement
    pub fn mem_ref(&mut self, expr: MemRefExpr) -> MemRefId {
        let id = MemRefId(self.mem_refs.len() as u32);
        self.mem_refs.push(MemRefDecl { expr, stmt: None });
        id
    }

    /// Leaf expression `sym` for use as an actual argument
    pub fn ref_expr(&mut self, sym: SymbolId) -> Expr {
        Expr::mem_ref(self.mem_ref(MemRefExpr::named(sym)))
    }

    /// Override the alias answer for one memory reference
    pub fn set_may_locs(&mut self, mem_ref: MemRefId, locs: Vec<Location>) {
        self.may_locs.insert(mem_ref, locs);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    /// Append a statement to `proc` from already registered memory references
    pub fn add_statement(&mut self, proc: ProcId, defs: Vec<MemRefId>, uses: Vec<MemRefId>) -> StmtId {
        let id = StmtId(self.statements.len() as u32);
        for m in defs.iter().chain(uses.iter()) {
            if let Some(decl) = self.mem_refs.get_mut(m.index()) {
                decl.stmt = Some(id);
            }
        }
        self.statements.push(StatementDecl {
            defs,
            uses,
            calls: Vec::new(),
        });
        if let Some(decl) = self.procedures.get_mut(proc.index()) {
            decl.statements.push(id);
        }
        id
    }

    /// `def = f(uses...)`, every operand a plain named reference
    pub fn assign(&mut self, proc: ProcId, def: SymbolId, uses: &[SymbolId]) -> StmtId {
        let def_ref = self.mem_ref(MemRefExpr::named(def));
        let use_refs = uses
            .iter()
            .map(|&u| self.mem_ref(MemRefExpr::named(u)))
            .collect();
        self.add_statement(proc, vec![def_ref], use_refs)
    }

    /// Call statement `callee(actuals...)` in `caller`.
    ///
    /// Memory references inside the actual expressions become uses of the
    /// call statement.
    pub fn add_call(&mut self, caller: ProcId, callee: ProcId, actuals: Vec<Expr>) -> CallSiteId {
        self.add_call_with_target(caller, Some(callee), actuals)
    }

    /// Call through a pointer whose target is unknown
    pub fn add_indirect_call(&mut self, caller: ProcId, actuals: Vec<Expr>) -> CallSiteId {
        self.add_call_with_target(caller, None, actuals)
    }

    fn add_call_with_target(&mut self, caller: ProcId, callee: Option<ProcId>, actuals: Vec<Expr>) -> CallSiteId {
        let uses: Vec<MemRefId> = actuals.iter().flat_map(Expr::mem_refs).collect();
        let stmt = self.add_statement(caller, Vec::new(), uses);
        let site = CallSiteId(self.call_sites.len() as u32);
        self.call_sites.push(CallSiteDecl {
            stmt,
            target: callee,
            actuals,
        });
        self.statements[stmt.index()].calls.push(site);
        if let Some(callee) = callee {
            self.call_graph.add_call(caller, callee, site);
        }
        site
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookups
    // ═══════════════════════════════════════════════════════════════════

    pub fn symbol_name(&self, sym: SymbolId) -> Option<&str> {
        self.symbols.get(sym.index()).map(|s| s.name.as_str())
    }

    pub fn procedure_name(&self, proc: ProcId) -> Option<&str> {
        self.procedures.get(proc.index()).map(|p| p.name.as_str())
    }

    /// Statement containing a call site
    pub fn call_statement(&self, call: CallSiteId) -> Option<StmtId> {
        self.call_sites.get(call.index()).map(|c| c.stmt)
    }

    /// Statement a memory reference was attached to
    pub fn mem_ref_statement(&self, mem_ref: MemRefId) -> Option<StmtId> {
        self.mem_refs.get(mem_ref.index()).and_then(|m| m.stmt)
    }

    pub fn call_graph(&self) -> &CallGraph {
        &self.call_graph
    }

    fn is_global(&self, sym: SymbolId) -> bool {
        matches!(
            self.symbols.get(sym.index()).map(|s| s.scope),
            Some(SymbolScope::Global)
        )
    }

    fn shape_location(&self, mem_ref: MemRefId, expr: &MemRefExpr) -> Location {
        match expr {
            MemRefExpr::Named { symbol } => Location::Named {
                symbol: *symbol,
                local: !self.is_global(*symbol),
            },
            MemRefExpr::Unnamed { site } => Location::Unnamed {
                site: *site,
                local: true,
            },
            MemRefExpr::Unknown => Location::Unknown,
            MemRefExpr::Deref { .. } => Location::Invisible { mem_ref },
            MemRefExpr::IdxAccess { base } => Location::subset_of(self.shape_location(mem_ref, base)),
        }
    }
}

impl ProgramIr for ProgramModel {
    fn procedures(&self) -> Vec<ProcId> {
        self.procedures.iter().map(|p| p.id).collect()
    }

    fn is_defined(&self, proc: ProcId) -> bool {
        self.procedures
            .get(proc.index())
            .map_or(false, |p| p.defined)
    }

    fn statements(&self, proc: ProcId) -> Vec<StmtId> {
        self.procedures
            .get(proc.index())
            .map(|p| p.statements.clone())
            .unwrap_or_default()
    }

    fn mem_refs(&self, stmt: StmtId) -> Vec<MemRefId> {
        self.statements
            .get(stmt.index())
            .map(StatementDecl::all_mem_refs)
            .unwrap_or_default()
    }

    fn def_mem_refs(&self, stmt: StmtId) -> Vec<MemRefId> {
        self.statements
            .get(stmt.index())
            .map(|s| s.defs.clone())
            .unwrap_or_default()
    }

    fn use_mem_refs(&self, stmt: StmtId) -> Vec<MemRefId> {
        self.statements
            .get(stmt.index())
            .map(|s| s.uses.clone())
            .unwrap_or_default()
    }

    fn mem_ref_expr(&self, mem_ref: MemRefId) -> Option<MemRefExpr> {
        self.mem_refs.get(mem_ref.index()).map(|m| m.expr.clone())
    }

    fn call_sites(&self, stmt: StmtId) -> Vec<CallSiteId> {
        self.statements
            .get(stmt.index())
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    fn call_target(&self, call: CallSiteId) -> Option<ProcId> {
        self.call_sites.get(call.index()).and_then(|c| c.target)
    }

    fn formals(&self, proc: ProcId) -> Vec<SymbolId> {
        self.procedures
            .get(proc.index())
            .map(|p| p.formals.clone())
            .unwrap_or_default()
    }

    fn actuals(&self, call: CallSiteId) -> Vec<Expr> {
        self.call_sites
            .get(call.index())
            .map(|c| c.actuals.clone())
            .unwrap_or_default()
    }
}

impl AliasOracle for ProgramModel {
    fn may_locs(&self, _proc: ProcId, mem_ref: MemRefId) -> Vec<Location> {
        if let Some(locs) = self.may_locs.get(&mem_ref) {
            return locs.clone();
        }
        match self.mem_refs.get(mem_ref.index()) {
            Some(decl) => vec![self.shape_location(mem_ref, &decl.expr)],
            None => vec![Location::Unknown],
        }
    }

    fn location_of(&self, _proc: ProcId, symbol: SymbolId) -> Location {
        Location::Named {
            symbol,
            local: !self.is_global(symbol),
        }
    }
}

impl ParamBindings for ProgramModel {
    fn is_by_reference(&self, proc: ProcId, formal: SymbolId) -> bool {
        self.procedures
            .get(proc.index())
            .map_or(false, |p| p.by_reference.contains(&formal))
    }

    fn bound_formal(&self, call: CallSiteId, actual_index: usize) -> Option<SymbolId> {
        let callee = self.call_sites.get(call.index())?.target?;
        self.procedures
            .get(callee.index())?
            .formals
            .get(actual_index)
            .copied()
    }
}

impl CallGraphProvider for ProgramModel {
    fn reverse_postorder(&self, orientation: Orientation) -> Vec<ProcId> {
        self.call_graph.reverse_postorder(orientation)
    }

    fn callees(&self, proc: ProcId) -> Vec<ProcId> {
        self.call_graph.neighbors(proc, Direction::Outgoing)
    }

    fn callers(&self, proc: ProcId) -> Vec<ProcId> {
        self.call_graph.neighbors(proc, Direction::Incoming)
    }
}
