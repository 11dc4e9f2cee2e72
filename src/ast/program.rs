//! A complete IDL program (compilation unit)

use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

use super::decl::{Const, Enum, Service, Struct, Typedef};
use super::types::Type;
use crate::utils::{Error, Result};

/// A fully resolved IDL program.
///
/// Declarations are kept in source order; the generator dispatch relies on
/// it. Exceptions live in `structs` with `is_exception` set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    /// Path of the IDL source file
    #[serde(default)]
    pub path: String,
    /// Root directory that backend output directories are created under
    #[serde(default = "default_out_path")]
    pub out_path: String,
    #[serde(default)]
    pub includes: Vec<Program>,
    /// Namespace per target language (e.g. `"c" -> "shared"`)
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub typedefs: Vec<Typedef>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub consts: Vec<Const>,
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub services: Vec<Service>,
}

fn default_out_path() -> String {
    ".".to_string()
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            out_path: default_out_path(),
            ..Default::default()
        }
    }

    /// Structs that are not exceptions, in declaration order
    pub fn plain_structs(&self) -> impl Iterator<Item = &Struct> {
        self.structs.iter().filter(|s| !s.is_exception)
    }

    /// Exceptions, in declaration order
    pub fn exceptions(&self) -> impl Iterator<Item = &Struct> {
        self.structs.iter().filter(|s| s.is_exception)
    }

    pub fn namespace(&self, language: &str) -> Option<&str> {
        self.namespaces.get(language).map(String::as_str)
    }

    pub fn include(&self, name: &str) -> Option<&Program> {
        self.includes.iter().find(|p| p.name == name)
    }

    pub fn find_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Look up a typedef by name, following `include.Name` qualification.
    ///
    /// Returns the program that owns the typedef together with it, since
    /// the aliased type is scoped to its owner.
    pub fn lookup_typedef(&self, name: &str) -> Option<(&Program, &Typedef)> {
        if let Some(typedef) = self.typedefs.iter().find(|t| t.name == name) {
            return Some((self, typedef));
        }
        let (include, rest) = name.split_once('.')?;
        self.include(include)?.lookup_typedef(rest)
    }

    /// Get the true type behind a series of typedefs.
    ///
    /// Fails on an unknown alias or when an alias chain revisits a typedef.
    pub fn true_type<'p>(&'p self, ty: &'p Type) -> Result<&'p Type> {
        let mut scope = self;
        let mut current = ty;
        let mut chain: Vec<String> = Vec::new();

        while let Type::Typedef(name) = current {
            let (owner, typedef) = scope
                .lookup_typedef(name)
                .ok_or_else(|| Error::UnresolvedType { name: name.clone() })?;

            let key = format!("{}.{}", owner.name, typedef.name);
            let seen = chain.contains(&key);
            chain.push(key);
            if seen {
                return Err(Error::TypedefCycle {
                    chain: chain.join(" -> "),
                });
            }

            trace!("typedef {} resolves to {}", name, typedef.aliased);
            scope = owner;
            current = &typedef.aliased;
        }
        Ok(current)
    }
}
