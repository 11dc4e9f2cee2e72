//! C Code Generator
//!
//! Emits one header per program with plain C declarations for every type,
//! constant and service of the IDL program.

use std::fs;
use std::path::Path;

use log::info;

use crate::ast::{Const, ConstValue, Enum, Field, Function, Program, Requiredness, Service, Struct, Type, Typedef};
use crate::backend::generator::{Generator, GeneratorCore};
use crate::backend::options::GeneratorOptions;
use crate::utils::naming::underscore;
use crate::utils::{docstring_comment, Error, Result};

/// Parts of the header, in output order.
///
/// Enums only need integers, so they go ahead of the typedefs that may alias
/// them even though typedefs are generated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble = 0,
    Enums = 1,
    Typedefs = 2,
    Body = 3,
}

/// C header generator
pub struct CGenerator<'a> {
    core: GeneratorCore<'a>,
    /// Prefix for the include guard macro
    guard_prefix: String,
    section: Section,
    sections: [String; 4],
    output: String,
}

impl<'a> CGenerator<'a> {
    pub const OPTIONS: &'static [&'static str] = &["guard_prefix"];

    pub fn new(program: &'a Program, options: &GeneratorOptions) -> Result<Self> {
        options.ensure_known(Self::OPTIONS)?;
        Ok(Self {
            core: GeneratorCore::new(program, "gen-c"),
            guard_prefix: options.get("guard_prefix").unwrap_or_default().to_string(),
            section: Section::Preamble,
            sections: Default::default(),
            output: String::new(),
        })
    }

    /// Get the generated header (for debugging), complete once generation closed
    pub fn get_c_source(&self) -> &str {
        &self.output
    }

    fn header_name(&self) -> String {
        format!("{}_types.h", self.program_name())
    }

    /// Include guard macro, with anything that is not a C identifier character replaced
    fn guard(&self) -> String {
        format!("{}{}_TYPES_H", self.guard_prefix, self.program_name())
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }

    fn current(&mut self) -> &mut String {
        &mut self.sections[self.section as usize]
    }

    /// Write indented line
    fn writeln(&mut self, line: &str) {
        let indent = if line.is_empty() { String::new() } else { self.core.indent() };
        let out = self.current();
        out.push_str(&indent);
        out.push_str(line);
        out.push('\n');
    }

    fn write_doc(&mut self, doc: &Option<String>) {
        if let Some(doc) = doc {
            let comment = docstring_comment(&self.core.indent(), "/**", " * ", doc, " */");
            self.current().push_str(&comment);
        }
    }

    /// Convert IDL type to C type
    fn type_to_c(&self, ty: &Type) -> String {
        match ty {
            Type::Void => "void".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Byte => "int8_t".to_string(),
            Type::I16 => "int16_t".to_string(),
            Type::I32 => "int32_t".to_string(),
            Type::I64 => "int64_t".to_string(),
            Type::Double => "double".to_string(),
            Type::String => "char*".to_string(),
            Type::Binary => "idl_binary".to_string(),
            Type::List(_) | Type::Set(_) => "idl_list".to_string(),
            Type::Map { .. } => "idl_map".to_string(),
            Type::Service(_) => "void*".to_string(),
            Type::Struct(name) | Type::Enum(name) | Type::Typedef(name) => c_name(name).to_string(),
        }
    }

    /// C type of a constant, with `const` applied to pointer targets
    fn const_type_to_c(&self, ty: &Type) -> String {
        match ty {
            Type::String => "const char*".to_string(),
            other => self.type_to_c(other),
        }
    }

    /// Struct members are held by pointer, so a field may name a struct
    /// defined further down the header or the enclosing struct itself
    fn field_decl(&self, field: &'a Field) -> Result<String> {
        let pointer = if matches!(self.true_type(&field.ty)?, Type::Struct(_)) { "*" } else { "" };
        Ok(format!("{}{} {};", self.type_to_c(&field.ty), pointer, field.name))
    }

    fn function_pointer(&self, function: &Function) -> String {
        let mut params = vec!["void* handler".to_string()];
        params.extend(
            function
                .args
                .iter()
                .map(|arg| format!("{} {}", self.type_to_c(&arg.ty), arg.name)),
        );
        format!(
            "{} (*{})({});",
            self.type_to_c(&function.returns),
            function.name,
            params.join(", ")
        )
    }

    /// Render a constant initializer.
    ///
    /// Container elements are emitted as separate static arrays into
    /// `helpers`, named with fresh temporaries.
    fn const_initializer(
        &mut self,
        owner: &str,
        ty: &'a Type,
        value: &ConstValue,
        helpers: &mut Vec<String>,
    ) -> Result<String> {
        let true_ty = self.true_type(ty)?;
        let mismatch = || Error::CodeGen(format!("constant {}: value does not match type {}", owner, ty));

        match (true_ty, value) {
            (Type::String | Type::Binary, ConstValue::String(_)) => {
                Ok(format!("\"{}\"", self.get_escaped_string(value)))
            }
            (Type::Bool, ConstValue::Integer(n)) => Ok(if *n != 0 { "true" } else { "false" }.to_string()),
            (Type::Byte | Type::I16 | Type::I32, ConstValue::Integer(n)) => Ok(n.to_string()),
            (Type::I64, ConstValue::Integer(n)) => Ok(format!("{}LL", n)),
            (Type::Double, ConstValue::Double(f)) => Ok(format!("{:?}", f)),
            (Type::Double, ConstValue::Integer(n)) => Ok(format!("{}.0", n)),
            (Type::Enum(_), ConstValue::Identifier(id)) => Ok(enum_constant(id)),
            (Type::Enum(_), ConstValue::Integer(n)) => Ok(n.to_string()),
            (_, ConstValue::Identifier(id)) => Ok(c_name(id).to_string()),
            (Type::List(elem) | Type::Set(elem), ConstValue::List(items)) => {
                if items.is_empty() {
                    return Ok("{ NULL, 0 }".to_string());
                }
                let elems = self.core.tmp("_elems");
                let mut rendered = Vec::with_capacity(items.len());
                for item in items {
                    rendered.push(self.const_initializer(owner, elem, item, helpers)?);
                }
                helpers.push(format!(
                    "static const {} {}[] = {{ {} }};",
                    self.const_type_to_c(elem),
                    elems,
                    rendered.join(", ")
                ));
                Ok(format!("{{ {}, {} }}", elems, items.len()))
            }
            (Type::Map { key, value: val_ty }, ConstValue::Map(entries)) => {
                if entries.is_empty() {
                    return Ok("{ NULL, NULL, 0 }".to_string());
                }
                let keys_name = self.core.tmp("_keys");
                let values_name = self.core.tmp("_values");
                let mut keys = Vec::with_capacity(entries.len());
                let mut values = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    keys.push(self.const_initializer(owner, key, k, helpers)?);
                    values.push(self.const_initializer(owner, val_ty, v, helpers)?);
                }
                helpers.push(format!(
                    "static const {} {}[] = {{ {} }};",
                    self.const_type_to_c(key),
                    keys_name,
                    keys.join(", ")
                ));
                helpers.push(format!(
                    "static const {} {}[] = {{ {} }};",
                    self.const_type_to_c(val_ty),
                    values_name,
                    values.join(", ")
                ));
                Ok(format!("{{ {}, {}, {} }}", keys_name, values_name, entries.len()))
            }
            _ => Err(mismatch()),
        }
    }

    /// Forward declare every struct so typedefs and fields can name it
    fn write_struct_declarations(&mut self, program: &Program) {
        if program.structs.is_empty() {
            return;
        }
        for tstruct in program.plain_structs().chain(program.exceptions()) {
            self.writeln(&format!("typedef struct {} {};", tstruct.name, tstruct.name));
        }
        self.writeln("");
    }

    fn write_header(&mut self, path: &Path) -> Result<()> {
        fs::write(path, &self.output).map_err(|e| Error::io(path, e))?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

/// Declarations of included programs are referenced by their bare name
fn c_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// `Color.RED` / `shared.Color.RED` -> `Color_RED`
fn enum_constant(id: &str) -> String {
    let mut parts: Vec<&str> = id.rsplitn(3, '.').take(2).collect();
    parts.reverse();
    parts.join("_")
}

impl<'a> Generator<'a> for CGenerator<'a> {
    fn core(&self) -> &GeneratorCore<'a> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GeneratorCore<'a> {
        &mut self.core
    }

    /// C file names use snake_case program names
    fn get_program_name(&self, program: &Program) -> String {
        underscore(&program.name)
    }

    fn init_generator(&mut self) -> Result<()> {
        let out_dir = self.get_out_dir();
        fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

        let program = self.core.program();
        let guard = self.guard();

        self.writeln(&format!("/* Generated by idlgen C backend from {} */", program.name));
        self.writeln(&format!("#ifndef {}", guard));
        self.writeln(&format!("#define {}", guard));
        self.writeln("");
        self.writeln("#include <stdbool.h>");
        self.writeln("#include <stddef.h>");
        self.writeln("#include <stdint.h>");
        for include in &program.includes {
            let header = format!("{}_types.h", self.get_program_name(include));
            self.writeln(&format!("#include \"{}\"", header));
        }
        self.writeln("");
        self.writeln("#ifndef IDL_CONTAINERS");
        self.writeln("#define IDL_CONTAINERS");
        self.writeln("typedef struct { const uint8_t* data; size_t len; } idl_binary;");
        self.writeln("typedef struct { const void* elems; size_t len; } idl_list;");
        self.writeln("typedef struct { const void* keys; const void* values; size_t len; } idl_map;");
        self.writeln("#endif");
        self.writeln("");
        self.write_doc(&program.doc);
        self.write_struct_declarations(program);
        Ok(())
    }

    fn close_generator(&mut self) -> Result<()> {
        let guard = self.guard();
        self.section = Section::Body;
        self.writeln(&format!("#endif /* {} */", guard));
        self.output = self.sections.concat();

        let path = Path::new(&self.get_out_dir()).join(self.header_name());
        self.write_header(&path)
    }

    fn generate_typedef(&mut self, typedef: &'a Typedef) -> Result<()> {
        self.section = Section::Typedefs;
        self.write_doc(&typedef.doc);
        let line = format!("typedef {} {};", self.type_to_c(&typedef.aliased), typedef.name);
        self.writeln(&line);
        self.writeln("");
        Ok(())
    }

    fn generate_enum(&mut self, tenum: &'a Enum) -> Result<()> {
        self.section = Section::Enums;
        self.write_doc(&tenum.doc);
        self.writeln("typedef enum {");
        self.core.indent_up();
        if tenum.values.is_empty() {
            // C forbids empty enums
            self.writeln(&format!("{}__EMPTY = 0", tenum.name));
        }
        let last = tenum.values.len().saturating_sub(1);
        for (i, value) in tenum.values.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            self.writeln(&format!("{}_{} = {}{}", tenum.name, value.name, value.value, sep));
        }
        self.core.indent_down();
        self.writeln(&format!("}} {};", tenum.name));
        self.writeln("");
        Ok(())
    }

    /// All constants go into one block
    fn generate_consts(&mut self, consts: &'a [Const]) -> Result<()> {
        if consts.is_empty() {
            return Ok(());
        }
        self.section = Section::Body;
        self.writeln("/* Constants */");
        for tconst in consts {
            let mut helpers = Vec::new();
            let init = self.const_initializer(&tconst.name, &tconst.ty, &tconst.value, &mut helpers)?;
            let true_ty = self.true_type(&tconst.ty)?;
            let decl = match true_ty {
                Type::String => format!("static const char* const {} = {};", tconst.name, init),
                _ => format!("static const {} {} = {};", self.type_to_c(&tconst.ty), tconst.name, init),
            };

            self.write_doc(&tconst.doc);
            for helper in helpers {
                self.writeln(&helper);
            }
            self.writeln(&decl);
        }
        self.writeln("");
        Ok(())
    }

    fn generate_struct(&mut self, tstruct: &'a Struct) -> Result<()> {
        self.section = Section::Body;
        self.write_doc(&tstruct.doc);
        self.writeln(&format!("struct {} {{", tstruct.name));
        self.core.indent_up();
        if tstruct.fields.is_empty() {
            // C forbids empty structs
            self.writeln("char _unused;");
        }
        for field in &tstruct.fields {
            self.write_doc(&field.doc);
            let decl = self.field_decl(field)?;
            self.writeln(&decl);
            if field.requiredness == Requiredness::Optional {
                self.writeln(&format!("bool __isset_{};", field.name));
            }
        }
        self.core.indent_down();
        self.writeln("};");
        self.writeln("");
        Ok(())
    }

    fn generate_service(&mut self, tservice: &'a Service) -> Result<()> {
        let name = self.get_service_name(tservice);
        self.section = Section::Body;
        self.write_doc(&tservice.doc);
        self.writeln(&format!("typedef struct {}If {{", name));
        self.core.indent_up();
        if let Some(parent) = &tservice.extends {
            self.writeln(&format!("{}If parent;", c_name(parent)));
        }
        if tservice.functions.is_empty() && tservice.extends.is_none() {
            self.writeln("char _unused;");
        }
        for function in &tservice.functions {
            self.write_doc(&function.doc);
            if function.oneway {
                self.writeln("/* oneway */");
            }
            if !function.exceptions.is_empty() {
                let throws: Vec<String> = function.exceptions.iter().map(|t| self.type_to_c(t)).collect();
                self.writeln(&format!("/* throws {} */", throws.join(", ")));
            }
            let decl = self.function_pointer(function);
            self.writeln(&decl);
        }
        self.core.indent_down();
        self.writeln(&format!("}} {}If;", name));
        self.writeln("");
        Ok(())
    }
}
