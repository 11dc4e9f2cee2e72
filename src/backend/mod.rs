//! Backend module - Generator framework and built-in targets

pub mod generator;
pub mod options;
pub mod registry;

// Built-in targets
pub mod c;
pub mod json;

pub use generator::{generate_program, Generator, GeneratorCore, Phase};
pub use options::GeneratorOptions;
pub use registry::{GeneratorFactory, Registry};
