//! fopgen operation registry
//!
//! This crate loads the table of operation signatures that every generated
//! plugin module must agree on, and turns it into immutable `Operation`
//! records carrying the placeholder text templates are rendered with.
//!
//! The registry is stored in TOML format as an ordered list of `[[op]]`
//! entries; entry order is output order.

#![deny(clippy::print_stdout)]

pub mod errors;
pub mod registry;
pub mod signature;
pub mod tables;
pub mod types;

pub use errors::RegistryError;
pub use registry::Registry;
pub use types::{
    ArgList, Argument, JournalKind, Operation, OperationSpec, RegistryFile, SubstitutionMap, View,
};
