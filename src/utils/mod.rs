//! Utility module

mod error;
pub mod format;
pub mod naming;

pub use error::{Error, Result};
pub use format::{docstring_comment, escape_string, Indenter, TempNames};
