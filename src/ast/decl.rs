//! Declarations of an IDL program

use serde::{Deserialize, Serialize};

use super::types::Type;

/// Type alias declaration (`typedef i64 UserId`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typedef {
    pub name: String,
    /// The aliased type
    #[serde(rename = "type")]
    pub aliased: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Typedef {
    pub fn new(name: impl Into<String>, aliased: Type) -> Self {
        Self {
            name: name.into(),
            aliased,
            doc: None,
        }
    }
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DeclaredEnum")]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Enum value with its resolved integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
}

impl Enum {
    /// Build an enum from declared values, filling in omitted ones.
    ///
    /// An omitted value is one more than the previous value; the first
    /// omitted value of an enum is 0.
    pub fn from_declared(
        name: impl Into<String>,
        declared: Vec<(String, Option<i32>)>,
    ) -> Result<Self, String> {
        let name = name.into();
        let mut values = Vec::with_capacity(declared.len());
        // None once the previous value was i32::MAX
        let mut next = Some(0i32);
        let mut prev_name = String::new();

        for (value_name, explicit) in declared {
            let value = match explicit.or(next) {
                Some(value) => value,
                None => return Err(format!("enum {} overflows after value {}", name, prev_name)),
            };
            next = value.checked_add(1);
            prev_name.clone_from(&value_name);
            values.push(EnumValue {
                name: value_name,
                value,
            });
        }

        Ok(Self {
            name,
            values,
            doc: None,
        })
    }

    /// Find a value by name
    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Enum as it appears in the AST document, before value numbering
#[derive(Deserialize)]
struct DeclaredEnum {
    name: String,
    values: Vec<DeclaredEnumValue>,
    #[serde(default)]
    doc: Option<String>,
}

#[derive(Deserialize)]
struct DeclaredEnumValue {
    name: String,
    #[serde(default)]
    value: Option<i32>,
}

impl TryFrom<DeclaredEnum> for Enum {
    type Error = String;

    fn try_from(raw: DeclaredEnum) -> Result<Self, Self::Error> {
        let declared = raw.values.into_iter().map(|v| (v.name, v.value)).collect();
        let mut tenum = Enum::from_declared(raw.name, declared)?;
        tenum.doc = raw.doc;
        Ok(tenum)
    }
}

/// Constant literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Integer(i64),
    Double(f64),
    String(String),
    List(Vec<ConstValue>),
    Map(Vec<(ConstValue, ConstValue)>),
    /// Reference to another constant or an enum value
    Identifier(String),
}

impl ConstValue {
    /// The string payload, empty for non-string values
    pub fn as_str(&self) -> &str {
        match self {
            Self::String(s) => s,
            _ => "",
        }
    }
}

/// Constant declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: ConstValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Const {
    pub fn new(name: impl Into<String>, ty: Type, value: ConstValue) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
            doc: None,
        }
    }
}

/// Per-field optionality marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    Required,
    Optional,
    #[default]
    Default,
}

/// Struct field or function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub requiredness: Requiredness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ConstValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    pub fn new(id: i32, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id,
            name: name.into(),
            ty,
            requiredness: Requiredness::Default,
            default_value: None,
            doc: None,
        }
    }

    pub fn with_requiredness(mut self, requiredness: Requiredness) -> Self {
        self.requiredness = requiredness;
        self
    }
}

/// Struct or exception declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub is_exception: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Struct {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            is_exception: false,
            doc: None,
        }
    }

    pub fn exception(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            is_exception: true,
            ..Self::new(name, fields)
        }
    }

    pub fn field(&self, id: i32) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// Service function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default = "void_type")]
    pub returns: Type,
    #[serde(default)]
    pub args: Vec<Field>,
    /// Declared exception types
    #[serde(default)]
    pub exceptions: Vec<Type>,
    /// Fire-and-forget call without a response
    #[serde(default)]
    pub oneway: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

fn void_type() -> Type {
    Type::Void
}

impl Function {
    pub fn new(name: impl Into<String>, returns: Type, args: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            returns,
            args,
            exceptions: Vec::new(),
            oneway: false,
            doc: None,
        }
    }
}

/// Service declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Name of the extended service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, functions: Vec<Function>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            functions,
            doc: None,
        }
    }
}
