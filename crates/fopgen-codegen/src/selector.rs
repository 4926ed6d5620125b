//! Operation selection
//!
//! Which operations a driver generates for is described by one declarative
//! value, evaluated once per run against the registry. Output always follows
//! registry order, whatever order names are listed in.

use fopgen_registry::{Operation, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::errors::GenerateError;

/// Pseudo-operation present in the registry but never stubbed
pub const DEFAULT_RESERVED: &[&str] = &["getspec"];

/// Which registry operations a driver generates for
///
/// In TOML: `{ exclude = [...] }`, `{ include = [...] }` or `"journaled"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationSelector {
    /// Every operation except the named ones
    Exclude(BTreeSet<String>),
    /// Only the named operations
    Include(BTreeSet<String>),
    /// Only operations that carry journal metadata
    Journaled,
}

impl Default for OperationSelector {
    fn default() -> Self {
        OperationSelector::Exclude(BTreeSet::new())
    }
}

/// A selector plus the reserved names that are always left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFilter {
    selector: OperationSelector,
    reserved: BTreeSet<String>,
}

impl OperationFilter {
    pub fn new<I, S>(selector: OperationSelector, reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OperationFilter {
            selector,
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter with the default reserved set
    pub fn with_default_reserved(selector: OperationSelector) -> Self {
        Self::new(selector, DEFAULT_RESERVED.iter().copied())
    }

    pub fn selector(&self) -> &OperationSelector {
        &self.selector
    }

    pub fn reserved(&self) -> &BTreeSet<String> {
        &self.reserved
    }

    /// Operations to generate, in registry order
    ///
    /// An include list naming an operation the registry lacks, or naming a
    /// reserved operation, is a configuration error: silently skipping it
    /// would drop a stub the driver author asked for.
    pub fn select<'r>(&self, registry: &'r Registry) -> Result<Vec<&'r Operation>, GenerateError> {
        match &self.selector {
            OperationSelector::Include(names) => {
                if let Some(unknown) = names.iter().find(|n| !registry.contains(n)) {
                    return Err(GenerateError::UnknownOperation(unknown.clone()));
                }
                if let Some(reserved) = names.iter().find(|n| self.reserved.contains(*n)) {
                    return Err(GenerateError::ReservedOperation(reserved.clone()));
                }
            }
            OperationSelector::Exclude(names) => {
                for unknown in names.iter().filter(|n| !registry.contains(n)) {
                    warn!("Excluded operation '{}' is not in the registry", unknown);
                }
            }
            OperationSelector::Journaled => {}
        }

        Ok(registry
            .iter()
            .filter(|op| self.allows(op))
            .collect())
    }

    fn allows(&self, op: &Operation) -> bool {
        if self.reserved.contains(&*op.name) {
            return false;
        }
        match &self.selector {
            OperationSelector::Exclude(names) => !names.contains(&*op.name),
            OperationSelector::Include(names) => names.contains(&*op.name),
            OperationSelector::Journaled => op.is_journaled(),
        }
    }
}
