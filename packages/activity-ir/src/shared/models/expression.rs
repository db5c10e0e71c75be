//! Actual-argument expression trees
//!
//! A call site hands each actual argument over as a small tree. The builder
//! only cares about which memory references appear anywhere inside it.

use serde::{Deserialize, Serialize};

use super::ids::MemRefId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Leaf memory reference (`x`, `a[i]`, `*p`)
    MemRef { mem_ref: MemRefId },

    /// Literal
    Const { text: String },

    /// Operator application (`x + 1`, `f(x)` lowered to an opaque op)
    Op { operator: String, operands: Vec<Expr> },
}

impl Expr {
    #[inline]
    pub fn mem_ref(mem_ref: MemRefId) -> Self {
        Expr::MemRef { mem_ref }
    }

    pub fn constant(text: impl Into<String>) -> Self {
        Expr::Const { text: text.into() }
    }

    pub fn op(operator: impl Into<String>, operands: Vec<Expr>) -> Self {
        Expr::Op {
            operator: operator.into(),
            operands,
        }
    }

    /// Memory references anywhere in the sub-expression tree, pre-order.
    pub fn mem_refs(&self) -> Vec<MemRefId> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::MemRef { mem_ref } => out.push(*mem_ref),
                Expr::Const { .. } => {}
                Expr::Op { operands, .. } => stack.extend(operands.iter().rev()),
            }
        }
        out
    }
}
