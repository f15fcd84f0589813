// Per-database SQL dialects
// Each dialect walks the statement tree and emits SQL into a collector, overriding
// only the node kinds whose syntax differs from the ANSI baseline.

pub mod ansi;
mod collector;
pub use collector::*;
mod compat;
pub use compat::*;
mod context;
pub use context::*;
mod dialect;
pub use dialect::*;
pub mod dialects;
mod interface;
pub use interface::*;
mod lob;
pub use lob::*;
mod metadata;
pub use metadata::*;
mod query;
pub use query::*;
mod visitor;
pub use visitor::*;
