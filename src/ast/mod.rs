//! AST node model - the resolved program handed to generators

pub mod decl;
pub mod loader;
pub mod program;
pub mod types;

pub use decl::{Const, ConstValue, Enum, EnumValue, Field, Function, Requiredness, Service, Struct, Typedef};
pub use program::Program;
pub use types::Type;
