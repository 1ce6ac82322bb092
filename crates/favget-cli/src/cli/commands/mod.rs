//! CLI command handlers, one per file.

mod convert;
mod resolve;
mod serve;

pub use convert::{run_convert, ConvertArgs};
pub use resolve::run_resolve;
pub use serve::run_serve;
