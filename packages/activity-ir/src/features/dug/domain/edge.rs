//! DUG edges

use serde::{Deserialize, Serialize};

use crate::shared::models::{CallSiteId, ProcId};

/// Dependence edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Use -> def inside one statement
    #[serde(rename = "CFLOW")]
    CFlow,
    /// Actual -> formal at a call site
    #[serde(rename = "CALL")]
    Call,
    /// By-reference formal -> actual at a call site
    #[serde(rename = "RETURN")]
    Return,
    /// Formal -> formal, from the closed dependence matrix of the callee
    #[serde(rename = "PARAM")]
    Param,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 4] = [EdgeKind::CFlow, EdgeKind::Call, EdgeKind::Return, EdgeKind::Param];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::CFlow => "CFLOW",
            EdgeKind::Call => "CALL",
            EdgeKind::Return => "RETURN",
            EdgeKind::Param => "PARAM",
        }
    }

    /// CALL and RETURN edges must name the call site they belong to
    pub fn needs_call_site(&self) -> bool {
        matches!(self, EdgeKind::Call | EdgeKind::Return)
    }
}

/// Edge weight. Endpoints live in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DugEdge {
    pub kind: EdgeKind,
    pub call_site: Option<CallSiteId>,
    /// Procedure context of the source endpoint
    pub source_proc: ProcId,
    /// Procedure context of the sink endpoint
    pub sink_proc: ProcId,
}

impl DugEdge {
    pub fn new(
        kind: EdgeKind,
        call_site: Option<CallSiteId>,
        source_proc: ProcId,
        sink_proc: ProcId,
    ) -> Self {
        Self {
            kind,
            call_site,
            source_proc,
            sink_proc,
        }
    }
}
