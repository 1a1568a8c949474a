#![allow(unused_unsafe)]

pub mod builtin;
pub mod jobs;
pub mod libsh;
pub mod parse;
pub mod prelude;
pub mod procio;
pub mod signal;
pub mod state;
#[cfg(test)]
pub mod tests;

pub use parse::execute::process;
pub use parse::{InRedir, Locals, NdKind, NdRule, Node, OutRedir, Redirs, WriteMode};
pub use state::ShState;
