//! Error types for template parsing and code generation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a template file
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid template pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Template file is empty")]
    Empty,

    #[error("Line {line}: template text before the first template-name marker")]
    StrayContent { line: usize },

    #[error("Line {line}: template-name marker without a role name")]
    EmptyRoleName { line: usize },

    #[error("Template '{role}' has no body")]
    EmptyTemplate { role: String },

    #[error("Template '{role}' is defined more than once")]
    DuplicateRole { role: String },
}

/// A placeholder with no value in the substitution map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no value for placeholder @{token}@")]
pub struct RenderError {
    pub token: String,
}

/// Errors that abort generation for a target file
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Operation '{operation}', template '{role}': {source}")]
    Lookup {
        operation: String,
        role: String,
        #[source]
        source: RenderError,
    },

    #[error("Template role '{0}' not found in template set")]
    MissingRole(String),

    #[error("Operation '{operation}' has no callback signature for template '{role}'")]
    MissingCallback { operation: String, role: String },

    #[error("Operation '{0}' is not in the registry")]
    UnknownOperation(String),

    #[error("Operation '{0}' is reserved and cannot be generated")]
    ReservedOperation(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_lookup_error_display() {
        let err = GenerateError::Lookup {
            operation: "open".to_string(),
            role: "fop".to_string(),
            source: RenderError {
                token: "UNKNOWN".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Operation 'open', template 'fop': no value for placeholder @UNKNOWN@"
        );
    }

    #[test]
    fn test_template_error_display() {
        let err = TemplateError::StrayContent { line: 3 };
        assert_eq!(
            err.to_string(),
            "Line 3: template text before the first template-name marker"
        );
    }
}
