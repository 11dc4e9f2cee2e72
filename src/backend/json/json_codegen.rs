//! JSON Code Generator
//!
//! Describes the program as a single JSON document, one array per
//! declaration category, in dispatch order.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::ast::{Const, Enum, Program, Service, Struct, Typedef};
use crate::backend::generator::{Generator, GeneratorCore};
use crate::backend::options::GeneratorOptions;
use crate::utils::{Error, Result};

/// JSON description generator
pub struct JsonGenerator<'a> {
    core: GeneratorCore<'a>,
    /// Skip pretty-printing
    compact: bool,
    document: Map<String, Value>,
}

impl<'a> JsonGenerator<'a> {
    pub const OPTIONS: &'static [&'static str] = &["compact"];

    pub fn new(program: &'a Program, options: &GeneratorOptions) -> Result<Self> {
        options.ensure_known(Self::OPTIONS)?;
        Ok(Self {
            core: GeneratorCore::new(program, "gen-json"),
            compact: options.flag("compact"),
            document: Map::new(),
        })
    }

    /// The document built so far
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    fn push(&mut self, category: &str, entry: Value) {
        if let Value::Array(entries) = self
            .document
            .entry(category)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            entries.push(entry);
        }
    }

    fn render(&self) -> Result<String> {
        let doc = Value::Object(self.document.clone());
        let text = if self.compact {
            serde_json::to_string(&doc)
        } else {
            serde_json::to_string_pretty(&doc)
        };
        text.map_err(|e| Error::CodeGen(format!("json serialization failed: {}", e)))
    }
}

fn to_value<T: Serialize>(decl: &T) -> Result<Value> {
    serde_json::to_value(decl).map_err(|e| Error::CodeGen(format!("json serialization failed: {}", e)))
}

impl<'a> Generator<'a> for JsonGenerator<'a> {
    fn core(&self) -> &GeneratorCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GeneratorCore<'a> {
        &mut self.core
    }

    fn init_generator(&mut self) -> Result<()> {
        let out_dir = self.get_out_dir();
        fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

        let program = self.core.program();
        let includes: Vec<&str> = program.includes.iter().map(|p| p.name.as_str()).collect();
        self.document.insert("name".into(), json!(self.program_name()));
        self.document.insert("path".into(), json!(program.path));
        self.document.insert("includes".into(), json!(includes));
        self.document.insert("namespaces".into(), json!(program.namespaces));
        if let Some(doc) = &program.doc {
            self.document.insert("doc".into(), json!(doc));
        }
        for category in ["typedefs", "enums", "constants", "structs", "exceptions", "services"] {
            self.document.insert(category.into(), Value::Array(Vec::new()));
        }
        Ok(())
    }

    fn close_generator(&mut self) -> Result<()> {
        let text = self.render()?;
        let path = Path::new(&self.get_out_dir()).join(format!("{}.json", self.program_name()));
        fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        info!("wrote {}", path.display());
        Ok(())
    }

    fn generate_typedef(&mut self, typedef: &'a Typedef) -> Result<()> {
        let mut entry = to_value(typedef)?;
        let true_ty = self.true_type(&typedef.aliased)?;
        entry["true_type"] = json!(true_ty.to_string());
        self.push("typedefs", entry);
        Ok(())
    }

    fn generate_enum(&mut self, tenum: &'a Enum) -> Result<()> {
        let entry = to_value(tenum)?;
        self.push("enums", entry);
        Ok(())
    }

    /// Constants are written as one block
    fn generate_consts(&mut self, consts: &'a [Const]) -> Result<()> {
        let block = to_value(&consts)?;
        self.document.insert("constants".into(), block);
        Ok(())
    }

    fn generate_struct(&mut self, tstruct: &'a Struct) -> Result<()> {
        let entry = to_value(tstruct)?;
        self.push("structs", entry);
        Ok(())
    }

    /// Exceptions get their own category instead of the struct default
    fn generate_xception(&mut self, txception: &'a Struct) -> Result<()> {
        let entry = to_value(txception)?;
        self.push("exceptions", entry);
        Ok(())
    }

    fn generate_service(&mut self, tservice: &'a Service) -> Result<()> {
        let mut entry = to_value(tservice)?;
        entry["service_name"] = json!(self.get_service_name(tservice));
        self.push("services", entry);
        Ok(())
    }
}
