//! Template store
//!
//! A template file holds several named templates. Each one starts with a
//! marker line of the form
//!
//! ```text
//! /* template-name fop */
//! ```
//!
//! and runs until the next marker or end of file. Body lines keep their
//! original line terminators.
//!
//! Templates are split into literal and placeholder segments when they are
//! loaded, so rendering a template against many operations never rescans
//! the text.

use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::errors::TemplateError;

/// Matches a role marker line; group 1 is the role name
pub const MARKER_PATTERN: &str = r"^/\* template-name (.*) \*/";

/// Matches an `@TOKEN@` placeholder; group 1 is the token
///
/// Any identifier case is accepted so a misspelled token such as
/// `@Long_args@` fails the lookup instead of being emitted as text.
pub const PLACEHOLDER_PATTERN: &str = r"@([A-Za-z][A-Za-z0-9_]*)@";

/// Role name given to a template embedded in a driver definition
pub const INLINE_ROLE: &str = "inline";

/// A piece of template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// One named template, pre-split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    role: String,
    text: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Raw template text as written
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct placeholder tokens in order of first use
    pub fn placeholders(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(token) = segment {
                if !tokens.contains(&token.as_str()) {
                    tokens.push(token);
                }
            }
        }
        tokens
    }
}

/// Templates from one template file, keyed by role
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// A set holding a single template
    pub fn single(template: Template) -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(template.role.clone(), template);
        TemplateSet { templates }
    }

    pub fn get(&self, role: &str) -> Option<&Template> {
        self.templates.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Scanner state while reading a template file
enum ScanState {
    /// Before the first marker
    Outside,
    /// Collecting the body of `role`
    Inside { role: String, body: String },
}

/// Parses template files and compiles inline templates
#[derive(Debug, Clone)]
pub struct TemplateStore {
    marker: Regex,
    placeholder: Regex,
}

impl TemplateStore {
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_patterns(MARKER_PATTERN, PLACEHOLDER_PATTERN)
    }

    /// Build a store with custom marker and placeholder patterns
    ///
    /// Both patterns must have one capture group holding the role name or
    /// token respectively.
    pub fn with_patterns(marker: &str, placeholder: &str) -> Result<Self, TemplateError> {
        Ok(TemplateStore {
            marker: Regex::new(marker)?,
            placeholder: Regex::new(placeholder)?,
        })
    }

    /// Load every template in a file
    pub fn load(&self, path: &Path) -> Result<TemplateSet, TemplateError> {
        debug!("Loading templates from {:?}", path);
        let io_error = |source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_error)?;
        self.parse(std::io::BufReader::new(file)).map_err(|e| match e {
            TemplateError::Io { source, .. } => io_error(source),
            other => other,
        })
    }

    /// Parse templates from text
    pub fn parse_str(&self, content: &str) -> Result<TemplateSet, TemplateError> {
        self.parse(content.as_bytes())
    }

    /// Parse templates from a reader, line by line
    pub fn parse<R: BufRead>(&self, mut reader: R) -> Result<TemplateSet, TemplateError> {
        let mut templates: BTreeMap<String, Template> = BTreeMap::new();
        let mut state = ScanState::Outside;
        let mut line = String::new();
        let mut line_number = 0;

        loop {
            line.clear();
            let read = reader.read_line(&mut line).map_err(|source| TemplateError::Io {
                path: Default::default(),
                source,
            })?;
            if read == 0 {
                break;
            }
            line_number += 1;

            if let Some(captures) = self.marker.captures(&line) {
                let role = captures
                    .get(1)
                    .map_or("", |m| m.as_str())
                    .trim()
                    .to_string();
                if role.is_empty() {
                    return Err(TemplateError::EmptyRoleName { line: line_number });
                }
                if let ScanState::Inside { role, body } = state {
                    self.flush(&mut templates, role, body)?;
                }
                state = ScanState::Inside {
                    role,
                    body: String::new(),
                };
                continue;
            }

            match &mut state {
                ScanState::Inside { body, .. } => body.push_str(&line),
                ScanState::Outside if line.trim().is_empty() => {}
                ScanState::Outside => {
                    return Err(TemplateError::StrayContent { line: line_number });
                }
            }
        }

        match state {
            ScanState::Inside { role, body } => self.flush(&mut templates, role, body)?,
            ScanState::Outside => return Err(TemplateError::Empty),
        }

        debug!("Parsed {} templates", templates.len());
        Ok(TemplateSet { templates })
    }

    /// Compile a single template from text, e.g. one embedded in a driver
    pub fn compile(&self, role: &str, text: &str) -> Result<Template, TemplateError> {
        if text.trim().is_empty() {
            return Err(TemplateError::EmptyTemplate {
                role: role.to_string(),
            });
        }
        Ok(Template {
            role: role.to_string(),
            text: text.to_string(),
            segments: self.split(text),
        })
    }

    fn flush(
        &self,
        templates: &mut BTreeMap<String, Template>,
        role: String,
        body: String,
    ) -> Result<(), TemplateError> {
        if templates.contains_key(&role) {
            return Err(TemplateError::DuplicateRole { role });
        }
        let template = self.compile(&role, &body)?;
        templates.insert(role, template);
        Ok(())
    }

    fn split(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for captures in self.placeholder.captures_iter(text) {
            let (Some(whole), Some(token)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(text[last..whole.start()].to_string()));
            }
            segments.push(Segment::Placeholder(token.as_str().to_string()));
            last = whole.end();
        }

        if last < text.len() {
            segments.push(Segment::Literal(text[last..].to_string()));
        }
        segments
    }
}
