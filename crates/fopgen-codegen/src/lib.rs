//! Template store, substitution engine and file injector
//!
//! Templates are parsed into a [`TemplateSet`] keyed by role, rendered per
//! operation against a registry view, and the concatenated result is
//! spliced into a target file wherever the trigger line appears.

#![deny(clippy::print_stdout)]

pub mod errors;
pub mod generate;
pub mod inject;
pub mod render;
pub mod selector;
pub mod template;

pub use errors::{GenerateError, RenderError, TemplateError};
pub use generate::{Generator, RoleBinding};
pub use inject::{inject, InjectionReport, Markers};
pub use render::{missing_placeholders, render};
pub use selector::{OperationFilter, OperationSelector, DEFAULT_RESERVED};
pub use template::{Template, TemplateSet, TemplateStore, INLINE_ROLE};
