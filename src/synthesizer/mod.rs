pub mod ast;
pub mod structs;

pub use structs::{resolve_parameter_types, synthesize_structs};
