//! C Backend - Generate C headers from an IDL program
//!
//! Every program becomes one `<program>_types.h` under `gen-c/`.

mod c_codegen;

pub use c_codegen::CGenerator;

use crate::ast::Program;
use crate::backend::generator::Generator;
use crate::backend::options::GeneratorOptions;
use crate::backend::registry::GeneratorFactory;
use crate::utils::Result;

fn construct<'a>(program: &'a Program, options: &GeneratorOptions) -> Result<Box<dyn Generator<'a> + 'a>> {
    Ok(Box::new(CGenerator::new(program, options)?))
}

pub fn factory() -> GeneratorFactory {
    GeneratorFactory {
        id: "c",
        long_name: "C headers",
        documentation: "    guard_prefix=P   Prefix the include guard macro with P.\n",
        construct,
    }
}
