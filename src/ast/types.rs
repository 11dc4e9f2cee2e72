//! IDL type references

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type as written in an IDL declaration.
///
/// Named variants refer to declarations by name. A name of the form
/// `include.Name` refers to a declaration of an included program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Void,
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    List(Box<Type>),
    Set(Box<Type>),
    Map { key: Box<Type>, value: Box<Type> },
    Struct(String),
    Enum(String),
    Service(String),
    Typedef(String),
}

impl Type {
    pub fn list(elem: Type) -> Self {
        Self::List(Box::new(elem))
    }

    pub fn set(elem: Type) -> Self {
        Self::Set(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn typedef(name: impl Into<String>) -> Self {
        Self::Typedef(name.into())
    }

    /// Check if this is a primitive type (void included)
    pub fn is_base_type(&self) -> bool {
        matches!(
            self,
            Self::Void
                | Self::Bool
                | Self::Byte
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Double
                | Self::String
                | Self::Binary
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map { .. })
    }

    pub fn is_typedef(&self) -> bool {
        matches!(self, Self::Typedef(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Name of the referenced declaration for named types
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) | Self::Enum(name) | Self::Service(name) | Self::Typedef(name) => {
                Some(name)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::Byte => write!(f, "byte"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::Double => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::Binary => write!(f, "binary"),
            Self::List(elem) => write!(f, "list<{}>", elem),
            Self::Set(elem) => write!(f, "set<{}>", elem),
            Self::Map { key, value } => write!(f, "map<{},{}>", key, value),
            Self::Struct(name) | Self::Enum(name) | Self::Service(name) | Self::Typedef(name) => {
                write!(f, "{}", name)
            }
        }
    }
}
