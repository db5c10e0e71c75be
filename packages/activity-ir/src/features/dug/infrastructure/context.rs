//! Call/return context for context-sensitive marking
//!
//! A stack of call-site ids. `Global` is pushed when a traversal leaves the
//! current procedure through a non-call edge (a global or a PARAM summary);
//! while it is on top, any RETURN (forward) or CALL (backward) may be taken.

use std::fmt;

use crate::shared::models::CallSiteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextEntry {
    Call(CallSiteId),
    Global,
}

impl fmt::Display for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextEntry::Call(call) => write!(f, "{}", call),
            ContextEntry::Global => write!(f, "GLOBAL"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContextStack {
    entries: Vec<ContextEntry>,
}

impl CallContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ContextEntry) {
        self.entries.push(entry);
    }

    pub fn push_call(&mut self, call: CallSiteId) {
        self.entries.push(ContextEntry::Call(call));
    }

    pub fn pop(&mut self) -> Option<ContextEntry> {
        self.entries.pop()
    }

    pub fn top(&self) -> Option<ContextEntry> {
        self.entries.last().copied()
    }

    /// Top is the `Global` sentinel
    pub fn through_globals(&self) -> bool {
        self.top() == Some(ContextEntry::Global)
    }

    /// A return (or backward call) for `call` may be taken from here
    pub fn matches(&self, call: CallSiteId) -> bool {
        self.top() == Some(ContextEntry::Call(call))
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
