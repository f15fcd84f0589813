// JDBC collaborator glue: connection configuration, driver resolution and
// detection of the dialect spoken by a JDBC url.

mod conf;
pub use conf::*;
mod detect;
pub use detect::*;
mod drivers;
pub use drivers::*;
