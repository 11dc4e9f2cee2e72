//! JSON Backend - Describe an IDL program as JSON
//!
//! Every program becomes one `<program>.json` under `gen-json/`.

mod json_codegen;

pub use json_codegen::JsonGenerator;

use crate::ast::Program;
use crate::backend::generator::Generator;
use crate::backend::options::GeneratorOptions;
use crate::backend::registry::GeneratorFactory;
use crate::utils::Result;

fn construct<'a>(program: &'a Program, options: &GeneratorOptions) -> Result<Box<dyn Generator<'a> + 'a>> {
    Ok(Box::new(JsonGenerator::new(program, options)?))
}

pub fn factory() -> GeneratorFactory {
    GeneratorFactory {
        id: "json",
        long_name: "JSON description",
        documentation: "    compact          Write the document without pretty-printing.\n",
        construct,
    }
}
