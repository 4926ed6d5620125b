//! Registry loading, validation and lookup
//!
//! A `Registry` is rebuilt from its definition file on every run and never
//! written back.

use ahash::{AHashMap, AHashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::RegistryError;
use crate::tables::{callback_table, compose, primary_table};
use crate::types::{Argument, Operation, OperationSpec, RegistryFile};

/// Registry shipped with the generator, used when no registry file is given
const BUILTIN_REGISTRY: &str = include_str!("../data/fops.toml");

/// Ordered, immutable set of operations
#[derive(Debug, Clone, Default)]
pub struct Registry {
    operations: Vec<Operation>,
    /// Name to position in `operations`
    index: AHashMap<Arc<str>, usize>,
}

impl Registry {
    /// Load the built-in file operation table
    pub fn builtin() -> Result<Self, RegistryError> {
        debug!("Loading built-in registry");
        Self::from_toml_str(BUILTIN_REGISTRY)
    }

    /// Load a registry from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, RegistryError> {
        debug!("Loading registry from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&content)?;
        info!("Registry loaded: {} operations", registry.len());
        Ok(registry)
    }

    /// Parse, validate and compose a registry from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(content)?;
        Self::from_specs(&file.ops)
    }

    /// Validate registry entries and compose them into operations
    pub fn from_specs(specs: &[OperationSpec]) -> Result<Self, RegistryError> {
        validate_specs(specs)?;

        let operations = compose(primary_table(specs), callback_table(specs))?;
        let index = operations
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name.clone(), i))
            .collect();

        Ok(Registry { operations, index })
    }

    /// Build a registry from already composed operations
    ///
    /// For callers that supply substitution maps directly instead of
    /// deriving them from signatures.
    pub fn from_operations(operations: Vec<Operation>) -> Result<Self, RegistryError> {
        let mut index = AHashMap::with_capacity(operations.len());
        for (i, op) in operations.iter().enumerate() {
            if op.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(op.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateOperation(op.name.to_string()));
            }
        }
        Ok(Registry { operations, index })
    }

    /// Operations in registry order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.index.get(name).map(|&idx| &self.operations[idx])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn validate_specs(specs: &[OperationSpec]) -> Result<(), RegistryError> {
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(specs.len());

    for spec in specs {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if !seen.insert(spec.name.as_ref()) {
            return Err(RegistryError::DuplicateOperation(spec.name.to_string()));
        }

        validate_args(&spec.name, "argument", &spec.args)?;
        if let Some(cbk_args) = &spec.cbk_args {
            validate_args(&spec.name, "callback argument", cbk_args)?;
        }
    }

    Ok(())
}

fn validate_args(operation: &str, kind: &str, args: &[Argument]) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidArgument {
        operation: operation.to_string(),
        reason,
    };

    let mut names: AHashSet<&str> = AHashSet::with_capacity(args.len());
    for (position, arg) in args.iter().enumerate() {
        let position = position + 1;
        if arg.name.trim().is_empty() {
            return Err(invalid(format!("{} {} has an empty name", kind, position)));
        }
        if arg.ty.trim().is_empty() {
            return Err(invalid(format!("{} {} has an empty type", kind, position)));
        }
        if !names.insert(arg.name.as_ref()) {
            return Err(invalid(format!("{} '{}' is repeated", kind, arg.name)));
        }
    }

    Ok(())
}
