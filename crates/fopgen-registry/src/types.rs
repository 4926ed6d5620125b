//! Registry types
//!
//! This module provides:
//! - the on-disk registry entry types (`RegistryFile`, `OperationSpec`)
//! - the composed, immutable `Operation` record used during generation
//! - `SubstitutionMap`, the placeholder table a template is rendered against

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Inline capacity for argument lists; most operations take six or fewer
pub type ArgList = SmallVec<[Argument; 6]>;

// =============================================================================
// ON-DISK FORMAT
// =============================================================================

/// Top-level registry file: an ordered list of `[[op]]` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default, rename = "op")]
    pub ops: Vec<OperationSpec>,
}

/// One `[[op]]` entry as written in the registry file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperationSpec {
    pub name: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upname: Option<Arc<str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<JournalKind>,
    #[serde(default)]
    pub args: ArgList,
    /// `None` means the operation has no callback table entry at all,
    /// which differs from a callback that takes no arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbk_args: Option<ArgList>,
}

/// A single typed parameter of a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: Arc<str>,
    #[serde(rename = "type")]
    pub ty: Arc<str>,
}

impl Argument {
    pub fn new(name: &str, ty: &str) -> Self {
        Argument {
            name: Arc::from(name),
            ty: Arc::from(ty),
        }
    }
}

/// How a journaling translator locates the object an operation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JournalKind {
    FdOp,
    InodeOp,
    EntryOp,
}

impl fmt::Display for JournalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalKind::FdOp => write!(f, "fd-op"),
            JournalKind::InodeOp => write!(f, "inode-op"),
            JournalKind::EntryOp => write!(f, "entry-op"),
        }
    }
}

// =============================================================================
// COMPOSED RECORDS
// =============================================================================

/// Which signature a template is rendered against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Primary,
    Callback,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Primary => write!(f, "primary"),
            View::Callback => write!(f, "callback"),
        }
    }
}

/// Placeholder name to replacement text
///
/// Keys are stored without the surrounding `@` delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionMap(BTreeMap<String, String>);

impl SubstitutionMap {
    pub fn new() -> Self {
        SubstitutionMap(BTreeMap::new())
    }

    /// Set a placeholder, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SubstitutionMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An operation with every placeholder it can supply, built once per load
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub name: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<JournalKind>,
    pub primary: SubstitutionMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<SubstitutionMap>,
}

impl Operation {
    /// Substitution map for the given view, `None` if the operation has no
    /// callback table entry and the callback view is requested
    pub fn view(&self, view: View) -> Option<&SubstitutionMap> {
        match view {
            View::Primary => Some(&self.primary),
            View::Callback => self.callback.as_ref(),
        }
    }

    pub fn is_journaled(&self) -> bool {
        self.journal.is_some()
    }
}
