//! DUG infrastructure: builder, closure, marker

pub mod builder;
pub mod closure;
pub mod context;
pub mod marker;
pub mod resolver;

pub use builder::{BuildArtifacts, BuildStats, GraphBuilder};
pub use closure::{ClosureStats, DependenceClosure};
pub use context::{CallContextStack, ContextEntry};
pub use marker::{ActivityMarker, MarkStats, TraversalState};
pub use resolver::resolve_mem_ref;
