//! # Program Model
//!
//! Collaborator interfaces the activity analysis consumes (IR, alias
//! oracle, call graph, parameter binding) plus an in-memory implementation
//! of all of them.
//!
//! ## Usage
//! ```text
//! use activity_ir::features::program_model::ProgramModel;
//!
//! let mut program = ProgramModel::new();
//! let main = program.add_procedure("main");
//! let x = program.add_local(main, "x");
//! let y = program.add_local(main, "y");
//! program.assign(main, y, &[x]);   // y = x + 1
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{SymbolDecl, SymbolScope};
pub use infrastructure::{CallGraph, ProgramModel};
pub use ports::{
    AliasOracle, CallGraphProvider, Orientation, ParamBindings, ProgramFacts, ProgramIr,
};
