//! Entity identifiers
//!
//! Every entity the analysis talks about is addressed by a dense `u32`
//! newtype. The collaborators that own the program (IR, alias analysis,
//! call graph) hand these out; the analysis never invents them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Program symbol (variable, formal parameter, global)
    SymbolId,
    "sym"
);
define_id!(
    /// Procedure (function, subroutine)
    ProcId,
    "proc"
);
define_id!(
    /// Statement inside a procedure body
    StmtId,
    "stmt"
);
define_id!(
    /// Memory reference occurrence inside a statement
    MemRefId,
    "mref"
);
define_id!(
    /// Call expression handle, unique per call site
    CallSiteId,
    "call"
);
