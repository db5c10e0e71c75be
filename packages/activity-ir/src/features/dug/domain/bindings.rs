//! Call-site bindings recorded by the builder
//!
//! For every resolved call site: which caller symbols flow into which formal
//! of the callee. The closure uses these to push a callee's formal-to-formal
//! dependences back into its callers.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;

use crate::shared::models::{CallSiteId, ProcId, SymbolId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBinding {
    pub call: CallSiteId,
    pub caller: ProcId,
    pub callee: ProcId,
    /// Named actual symbols bound to each formal
    pub actuals_by_formal: BTreeMap<SymbolId, BTreeSet<SymbolId>>,
}

impl CallBinding {
    pub fn new(call: CallSiteId, caller: ProcId, callee: ProcId) -> Self {
        Self {
            call,
            caller,
            callee,
            actuals_by_formal: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, formal: SymbolId, actual: SymbolId) {
        self.actuals_by_formal
            .entry(formal)
            .or_default()
            .insert(actual);
    }

    /// Actuals bound to `formal` (empty when none are named)
    pub fn actuals_of(&self, formal: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.actuals_by_formal
            .get(&formal)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallBindings {
    formals: FxHashMap<ProcId, Vec<SymbolId>>,
    sites: BTreeMap<CallSiteId, CallBinding>,
    sites_by_callee: FxHashMap<ProcId, Vec<CallSiteId>>,
}

impl CallBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_formals(&mut self, proc: ProcId, formals: Vec<SymbolId>) {
        self.formals.insert(proc, formals);
    }

    /// Formals of `proc` in declaration order
    pub fn formals(&self, proc: ProcId) -> &[SymbolId] {
        self.formals.get(&proc).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, binding: CallBinding) {
        let call = binding.call;
        let callee = binding.callee;
        if self.sites.insert(call, binding).is_none() {
            self.sites_by_callee.entry(callee).or_default().push(call);
        }
    }

    pub fn site(&self, call: CallSiteId) -> Option<&CallBinding> {
        self.sites.get(&call)
    }

    pub fn caller_of(&self, call: CallSiteId) -> Option<ProcId> {
        self.sites.get(&call).map(|b| b.caller)
    }

    /// Recorded call sites invoking `callee`, in recording order
    pub fn sites_calling(&self, callee: ProcId) -> impl Iterator<Item = &CallBinding> + '_ {
        self.sites_by_callee
            .get(&callee)
            .into_iter()
            .flat_map(|calls| calls.iter())
            .filter_map(|call| self.sites.get(call))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
