//! Generation entry point
//!
//! A `Generator` ties together a registry, the templates a driver renders
//! (each bound to a registry view), an operation filter and the injection
//! markers. The generated block is the same for every trigger line, so it
//! is rendered at most once per run and only if a trigger is found.

use fopgen_registry::{Operation, Registry, View};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::errors::GenerateError;
use crate::inject::{inject, InjectionReport, Markers};
use crate::render::render;
use crate::selector::OperationFilter;
use crate::template::{Template, TemplateSet};

/// A template role together with the view it is rendered against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role: String,
    #[serde(default)]
    pub view: View,
}

impl RoleBinding {
    pub fn primary(role: &str) -> Self {
        RoleBinding {
            role: role.to_string(),
            view: View::Primary,
        }
    }

    pub fn callback(role: &str) -> Self {
        RoleBinding {
            role: role.to_string(),
            view: View::Callback,
        }
    }
}

#[derive(Debug, Clone)]
struct BoundTemplate {
    view: View,
    template: Template,
}

/// Renders and injects generated code for one driver invocation
#[derive(Debug, Clone)]
pub struct Generator<'r> {
    registry: &'r Registry,
    templates: Vec<BoundTemplate>,
    filter: OperationFilter,
    markers: Markers,
}

impl<'r> Generator<'r> {
    /// Resolve `bindings` against `templates`, in binding order
    pub fn new(
        registry: &'r Registry,
        templates: &TemplateSet,
        bindings: &[RoleBinding],
        filter: OperationFilter,
        markers: Markers,
    ) -> Result<Self, GenerateError> {
        let templates = bindings
            .iter()
            .map(|binding| {
                templates
                    .get(&binding.role)
                    .map(|template| BoundTemplate {
                        view: binding.view,
                        template: template.clone(),
                    })
                    .ok_or_else(|| GenerateError::MissingRole(binding.role.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Generator {
            registry,
            templates,
            filter,
            markers,
        })
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Operations this generator emits blocks for, in registry order
    pub fn operations(&self) -> Result<Vec<&'r Operation>, GenerateError> {
        self.filter.select(self.registry)
    }

    /// Render every selected operation through every bound template
    ///
    /// Blocks are ordered by operation, then by role. Each block ends with
    /// exactly one line break added if the template did not supply one.
    pub fn render_block(&self) -> Result<String, GenerateError> {
        let operations = self.operations()?;
        let mut out = String::new();

        for op in &operations {
            for bound in &self.templates {
                let mut block = self.render_one(op, bound)?;
                if !block.ends_with('\n') {
                    block.push('\n');
                }
                out.push_str(&block);
            }
        }

        info!(
            "Rendered {} operations x {} templates",
            operations.len(),
            self.templates.len()
        );
        Ok(out)
    }

    fn render_one(&self, op: &Operation, bound: &BoundTemplate) -> Result<String, GenerateError> {
        let role = bound.template.role();
        let subs = op
            .view(bound.view)
            .ok_or_else(|| GenerateError::MissingCallback {
                operation: op.name.to_string(),
                role: role.to_string(),
            })?;

        render(&bound.template, subs).map_err(|source| GenerateError::Lookup {
            operation: op.name.to_string(),
            role: role.to_string(),
            source,
        })
    }

    /// Copy `input` to `output`, replacing trigger lines with the block
    pub fn generate<R, W>(&self, input: R, output: &mut W) -> Result<InjectionReport, GenerateError>
    where
        R: BufRead,
        W: Write + ?Sized,
    {
        let mut cached: Option<Vec<u8>> = None;
        let report = inject(input, output, &self.markers, || {
            if let Some(block) = &cached {
                return Ok(block.clone());
            }
            let block = self.render_block()?.into_bytes();
            cached = Some(block.clone());
            Ok(block)
        })?;

        debug!(
            "Injection done: {} lines copied, {} triggers",
            report.passthrough_lines, report.triggers
        );
        Ok(report)
    }

    /// Generate into memory; nothing is returned unless generation succeeds
    pub fn generate_to_vec<R: BufRead>(
        &self,
        input: R,
    ) -> Result<(Vec<u8>, InjectionReport), GenerateError> {
        let mut output = Vec::new();
        let report = self.generate(input, &mut output)?;
        Ok((output, report))
    }
}
