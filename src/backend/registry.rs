//! Generator registry - maps target ids to backend constructors
//!
//! The driver looks a backend up by the id given on the command line. A
//! registry can be built explicitly, or the process-wide one returned by
//! [`Registry::global`] can be used; the latter is filled with the built-in
//! backends on first access and never changes afterwards.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::debug;

use super::generator::Generator;
use super::options::GeneratorOptions;
use super::{c, json};
use crate::ast::Program;
use crate::utils::{Error, Result};

/// Constructs a backend bound to a program
pub type Constructor =
    for<'a> fn(&'a Program, &GeneratorOptions) -> Result<Box<dyn Generator<'a> + 'a>>;

/// Registry entry for one backend
#[derive(Clone, Copy)]
pub struct GeneratorFactory {
    /// Target id used on the command line (e.g. "c")
    pub id: &'static str,
    /// Human-readable name (e.g. "C headers")
    pub long_name: &'static str,
    /// Option documentation shown by `--list`
    pub documentation: &'static str,
    pub construct: Constructor,
}

impl std::fmt::Debug for GeneratorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorFactory")
            .field("id", &self.id)
            .field("long_name", &self.long_name)
            .finish()
    }
}

/// Target id to factory table
#[derive(Debug, Default)]
pub struct Registry {
    factories: BTreeMap<&'static str, GeneratorFactory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry holding every built-in backend
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for factory in [c::factory(), json::factory()] {
            registry
                .register(factory)
                .expect("built-in target ids are distinct");
        }
        registry
    }

    /// Process-wide registry, initialized once with the built-in backends
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::with_builtins)
    }

    /// Add a backend. Fails if the id is already taken.
    pub fn register(&mut self, factory: GeneratorFactory) -> Result<()> {
        if self.factories.contains_key(factory.id) {
            return Err(Error::DuplicateTarget {
                id: factory.id.to_string(),
            });
        }
        debug!("registered generator {}", factory.id);
        self.factories.insert(factory.id, factory);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GeneratorFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Registered factories, sorted by id
    pub fn factories(&self) -> impl Iterator<Item = &GeneratorFactory> {
        self.factories.values()
    }

    /// Construct the backend `id` for `program`.
    ///
    /// Nothing is constructed for an unknown id.
    pub fn create<'a>(
        &self,
        id: &str,
        options: &str,
        program: &'a Program,
    ) -> Result<Box<dyn Generator<'a> + 'a>> {
        let factory = self.get(id).ok_or_else(|| Error::UnsupportedTarget { id: id.to_string() })?;
        let options = GeneratorOptions::parse(id, options)?;
        debug!("creating generator {} for {}", id, program.name);
        (factory.construct)(program, &options)
    }

    /// Construct a backend from a command-line target spec (`id[:options]`)
    pub fn create_from_spec<'a>(
        &self,
        spec: &str,
        program: &'a Program,
    ) -> Result<Box<dyn Generator<'a> + 'a>> {
        let (id, options) = spec.split_once(':').unwrap_or((spec, ""));
        self.create(id, options, program)
    }
}
