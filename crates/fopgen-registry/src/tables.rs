//! Primary and callback tables, and their composition into `Operation`s
//!
//! The primary table is ordered and drives output order. The callback table
//! is keyed by operation name and may cover only a subset of operations.
//! `compose` joins the two into immutable records, so no later step ever
//! mutates one table with values from the other.

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::errors::RegistryError;
use crate::signature::{signature_substitutions, ERROR_ARGS, LONG_ARGS, SHORT_ARGS};
use crate::types::{JournalKind, Operation, OperationSpec, SubstitutionMap};

pub const NAME: &str = "NAME";
pub const UPNAME: &str = "UPNAME";
pub const CBK_SHORT_ARGS: &str = "CBK_SHORT_ARGS";
pub const CBK_LONG_ARGS: &str = "CBK_LONG_ARGS";

/// One row of the primary table
#[derive(Debug, Clone)]
pub struct PrimaryEntry {
    pub name: Arc<str>,
    pub journal: Option<JournalKind>,
    pub subs: SubstitutionMap,
}

pub type CallbackTable = AHashMap<Arc<str>, SubstitutionMap>;

fn naming_substitutions(spec: &OperationSpec) -> SubstitutionMap {
    let upname = spec
        .upname
        .as_deref()
        .map_or_else(|| spec.name.to_uppercase(), str::to_string);

    let mut subs = SubstitutionMap::new();
    subs.insert(NAME, spec.name.as_ref());
    subs.insert(UPNAME, upname);
    subs
}

/// Build the ordered primary table from registry entries
pub fn primary_table(specs: &[OperationSpec]) -> Vec<PrimaryEntry> {
    specs
        .iter()
        .map(|spec| {
            let mut subs = naming_substitutions(spec);
            let signature = signature_substitutions(&spec.args);
            // ERROR_ARGS of the primary signature is never rendered; failure
            // unwinds use the callback's, merged in by `compose`.
            for key in [SHORT_ARGS, LONG_ARGS] {
                if let Some(value) = signature.get(key) {
                    subs.insert(key, value);
                }
            }
            PrimaryEntry {
                name: spec.name.clone(),
                journal: spec.journal,
                subs,
            }
        })
        .collect()
}

/// Build the callback table; entries without `cbk-args` are left out
pub fn callback_table(specs: &[OperationSpec]) -> CallbackTable {
    specs
        .iter()
        .filter_map(|spec| {
            let cbk_args = spec.cbk_args.as_ref()?;
            let naming = naming_substitutions(spec);
            let mut subs = signature_substitutions(cbk_args);
            for key in [NAME, UPNAME] {
                if let Some(value) = naming.get(key) {
                    subs.insert(key, value);
                }
            }
            Some((spec.name.clone(), subs))
        })
        .collect()
}

/// Join the primary table with the callback table
///
/// The primary view takes `ERROR_ARGS` from the callback signature, since
/// failure unwinds pass callback arguments, and also exposes the callback
/// argument lists as `CBK_SHORT_ARGS` / `CBK_LONG_ARGS`. Operations without
/// a callback entry keep no `ERROR_ARGS` at all, so a template that needs
/// it fails loudly instead of unwinding with the wrong values.
pub fn compose(
    primary: Vec<PrimaryEntry>,
    mut callbacks: CallbackTable,
) -> Result<Vec<Operation>, RegistryError> {
    let mut operations = Vec::with_capacity(primary.len());

    for entry in primary {
        let callback = callbacks.remove(&entry.name);
        let mut subs = entry.subs;

        match &callback {
            Some(cbk) => {
                for (merged, source) in [
                    (ERROR_ARGS, ERROR_ARGS),
                    (CBK_SHORT_ARGS, SHORT_ARGS),
                    (CBK_LONG_ARGS, LONG_ARGS),
                ] {
                    if let Some(value) = cbk.get(source) {
                        subs.insert(merged, value);
                    }
                }
            }
            None => debug!("Operation '{}' has no callback entry", entry.name),
        }

        operations.push(Operation {
            name: entry.name,
            journal: entry.journal,
            primary: subs,
            callback,
        });
    }

    if let Some(orphan) = callbacks.keys().min() {
        return Err(RegistryError::OrphanCallback(orphan.to_string()));
    }

    Ok(operations)
}
