mod array;
mod parse;
mod r#type;
mod value;

pub use array::*;
pub use parse::encode_hex;
pub use r#type::*;
pub use value::*;

pub use chrono;
pub use rust_decimal;
pub use uuid;
