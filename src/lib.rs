//! idlgen - backend generation framework for an IDL compiler
//!
//! A resolved [`ast::Program`] is handed to a backend looked up in the
//! [`backend::Registry`]; [`backend::generate_program`] then walks the
//! program and calls the backend's hooks in declaration order.

pub mod ast;
pub mod backend;
pub mod utils;

pub use ast::Program;
pub use backend::{generate_program, Generator, GeneratorCore, Registry};
pub use utils::{Error, Result};
