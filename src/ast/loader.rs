//! Loading resolved programs from their JSON form
//!
//! The IDL front end serializes the resolved AST; backends only ever see
//! the deserialized [`Program`].

use std::fs;
use std::path::Path;

use log::debug;

use super::program::Program;
use crate::utils::{Error, Result};

/// Parse a program from a JSON document
pub fn parse_program(json: &str) -> Result<Program> {
    let program: Program = serde_json::from_str(json)?;
    debug!(
        "loaded program {} ({} typedefs, {} enums, {} consts, {} structs, {} services, {} includes)",
        program.name,
        program.typedefs.len(),
        program.enums.len(),
        program.consts.len(),
        program.structs.len(),
        program.services.len(),
        program.includes.len(),
    );
    Ok(program)
}

/// Read and parse a program from a JSON file
pub fn load_program(path: &Path) -> Result<Program> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut program = parse_program(&source)?;
    if program.path.is_empty() {
        program.path = path.display().to_string();
    }
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstValue, Requiredness, Type};
    use pretty_assertions::assert_eq;

    const TUTORIAL: &str = r#"{
        "name": "tutorial",
        "out_path": "build",
        "namespaces": {"c": "tut"},
        "includes": [{"name": "shared", "structs": [{"name": "SharedStruct"}]}],
        "typedefs": [{"name": "MyInteger", "type": "i32"}],
        "enums": [{"name": "Operation", "values": [{"name": "ADD", "value": 1}, {"name": "SUBTRACT"}]}],
        "consts": [
            {"name": "INT32CONSTANT", "type": "i32", "value": {"integer": 9853}},
            {"name": "MAPCONSTANT", "type": {"map": {"key": "string", "value": "string"}},
             "value": {"map": [[{"string": "hello"}, {"string": "world"}]]}}
        ],
        "structs": [
            {"name": "Work", "fields": [
                {"id": 1, "name": "num1", "type": "i32", "default_value": {"integer": 0}},
                {"id": 4, "name": "comment", "type": "string", "requiredness": "optional"}
            ]},
            {"name": "InvalidOperation", "is_exception": true, "fields": [{"id": 1, "name": "whatOp", "type": "i32"}]}
        ],
        "services": [{"name": "Calculator", "extends": "shared.SharedService", "functions": [
            {"name": "ping"},
            {"name": "calculate", "returns": "i32",
             "args": [{"id": 1, "name": "logid", "type": "i32"}, {"id": 2, "name": "w", "type": {"struct": "Work"}}],
             "exceptions": [{"struct": "InvalidOperation"}]},
            {"name": "zip", "oneway": true}
        ]}]
    }"#;

    #[test]
    fn test_parse_tutorial() {
        let program = parse_program(TUTORIAL).unwrap();
        assert_eq!(program.name, "tutorial");
        assert_eq!(program.out_path, "build");
        assert_eq!(program.namespace("c"), Some("tut"));
        assert_eq!(program.include("shared").map(|p| p.structs.len()), Some(1));

        let op = &program.enums[0];
        assert_eq!(op.value("SUBTRACT").map(|v| v.value), Some(2));

        assert_eq!(program.consts[0].value, ConstValue::Integer(9853));
        let work = program.find_struct("Work").unwrap();
        assert_eq!(work.fields[1].requiredness, Requiredness::Optional);
        assert_eq!(program.exceptions().count(), 1);

        let calc = program.find_service("Calculator").unwrap();
        assert_eq!(calc.extends.as_deref(), Some("shared.SharedService"));
        assert_eq!(calc.functions[1].exceptions, vec![Type::Struct("InvalidOperation".into())]);
        assert!(calc.functions[2].oneway);
    }

    #[test]
    fn test_minimal_program_defaults() {
        let program = parse_program(r#"{"name": "empty"}"#).unwrap();
        assert_eq!(program, Program::new("empty"));
        assert_eq!(program.out_path, ".");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_program("{\"name\": 3}"), Err(Error::InvalidAst(_))));
    }

    #[test]
    fn test_load_program_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutorial.json");
        std::fs::write(&path, TUTORIAL).unwrap();

        let program = load_program(&path).unwrap();
        assert_eq!(program.path, path.display().to_string());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_program(Path::new("/nonexistent/idlgen/ast.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
