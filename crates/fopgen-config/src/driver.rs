//! Driver definitions
//!
//! A driver names the template roles it renders, where their text comes
//! from and which operations it generates for.

use fopgen_codegen::{
    OperationFilter, OperationSelector, RoleBinding, TemplateSet, TemplateStore, INLINE_ROLE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::errors::ConfigError;

/// One `[[driver]]` entry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DriverConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Embedded template text; when absent the roles come from a template file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleBinding>,
    #[serde(default)]
    pub select: OperationSelector,
}

impl DriverConfig {
    pub fn is_inline(&self) -> bool {
        self.inline.is_some()
    }

    /// Roles in render order
    ///
    /// An inline driver without explicit roles renders its template once
    /// per operation against the primary view.
    pub fn bindings(&self) -> Vec<RoleBinding> {
        if self.is_inline() && self.roles.is_empty() {
            return vec![RoleBinding::primary(INLINE_ROLE)];
        }
        self.roles.clone()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyDriverName);
        }

        let bindings = self.bindings();
        if bindings.is_empty() {
            return Err(ConfigError::NoRoles(self.name.clone()));
        }
        if self.is_inline() && !matches!(bindings.as_slice(), [only] if only.role == INLINE_ROLE) {
            return Err(ConfigError::InlineRoles {
                driver: self.name.clone(),
                found: bindings
                    .iter()
                    .map(|b| b.role.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(())
    }

    /// Templates this driver renders
    ///
    /// File drivers need `template_file`; inline drivers must not be given
    /// one.
    pub fn templates(
        &self,
        store: &TemplateStore,
        template_file: Option<&Path>,
    ) -> Result<TemplateSet, ConfigError> {
        match (&self.inline, template_file) {
            (Some(text), None) => {
                debug!("Driver '{}' uses its inline template", self.name);
                Ok(TemplateSet::single(store.compile(INLINE_ROLE, text)?))
            }
            (None, Some(path)) => Ok(store.load(path)?),
            (Some(_), Some(_)) => Err(ConfigError::UnexpectedTemplateFile(self.name.clone())),
            (None, None) => Err(ConfigError::MissingTemplateFile(self.name.clone())),
        }
    }

    /// Operation filter for this driver with the given reserved names
    pub fn filter(&self, reserved: &[String]) -> OperationFilter {
        OperationFilter::new(self.select.clone(), reserved.iter().cloned())
    }
}
