// SQLIL == SQL Intermediate Language
// The statement tree handed over by the query builder. Each dialect visitor walks
// this tree to produce SQL in its own syntax.

mod delete;
mod expr;
mod insert;
mod query;
mod select;
mod update;

pub use delete::*;
pub use expr::*;
pub use insert::*;
pub use query::*;
pub use select::*;
pub use update::*;
