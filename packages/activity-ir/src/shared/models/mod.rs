//! Shared models

mod expression;
mod ids;
mod location;
mod mem_ref;

pub use expression::Expr;
pub use ids::{CallSiteId, MemRefId, ProcId, StmtId, SymbolId};
pub use location::Location;
pub use mem_ref::MemRefExpr;
