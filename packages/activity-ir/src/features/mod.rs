//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations

// Collaborator interfaces + in-memory program facts
pub mod program_model;

// Dependence-Use Graph, closure and activity marking
pub mod dug;
