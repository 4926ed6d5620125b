//! File injector
//!
//! Streams a target source file and replaces each trigger line with a
//! generated block bounded by sentinel comments. Every other line is copied
//! byte for byte, terminators included.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::errors::GenerateError;

pub const DEFAULT_TRIGGER: &str = "#pragma generate";
pub const DEFAULT_BEGIN_SENTINEL: &str = "/* BEGIN GENERATED CODE - DO NOT MODIFY */";
pub const DEFAULT_END_SENTINEL: &str = "/* END GENERATED CODE */";

/// Trigger substring and the sentinel lines written around generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Markers {
    pub trigger: String,
    pub begin_sentinel: String,
    pub end_sentinel: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            trigger: DEFAULT_TRIGGER.to_string(),
            begin_sentinel: DEFAULT_BEGIN_SENTINEL.to_string(),
            end_sentinel: DEFAULT_END_SENTINEL.to_string(),
        }
    }
}

impl Markers {
    pub fn is_trigger(&self, line: &[u8]) -> bool {
        let needle = self.trigger.as_bytes();
        !needle.is_empty() && line.windows(needle.len()).any(|w| w == needle)
    }
}

/// What an injection pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Input lines copied through unchanged
    pub passthrough_lines: usize,
    /// Trigger lines replaced by a generated block
    pub triggers: usize,
}

/// Copy `input` to `output`, replacing trigger lines with generated blocks
///
/// `block` is called once per trigger line and must return the text to put
/// between the sentinels. Input without a trigger line is copied unchanged
/// and `block` is never called.
pub fn inject<R, W, F>(
    mut input: R,
    output: &mut W,
    markers: &Markers,
    mut block: F,
) -> Result<InjectionReport, GenerateError>
where
    R: BufRead,
    W: Write + ?Sized,
    F: FnMut() -> Result<Vec<u8>, GenerateError>,
{
    let mut report = InjectionReport::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if markers.is_trigger(&line) {
            debug!("Trigger found after {} lines", report.passthrough_lines);
            report.triggers += 1;
            let generated = block()?;
            writeln!(output, "{}", markers.begin_sentinel)?;
            output.write_all(&generated)?;
            writeln!(output, "{}", markers.end_sentinel)?;
        } else {
            report.passthrough_lines += 1;
            output.write_all(&line)?;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::inject::*;
    use std::io::Cursor;

    fn run(input: &str) -> (String, InjectionReport) {
        let mut output = Vec::new();
        let report = inject(Cursor::new(input), &mut output, &Markers::default(), || {
            Ok(b"int32_t foo_open (loc_t *loc);\n".to_vec())
        })
        .unwrap_or_default();
        (String::from_utf8_lossy(&output).into_owned(), report)
    }

    #[test]
    fn test_trigger_replaced_with_block() {
        let (output, report) = run("before\n#pragma generate\nafter\n");
        assert_eq!(
            output,
            "before\n\
             /* BEGIN GENERATED CODE - DO NOT MODIFY */\n\
             int32_t foo_open (loc_t *loc);\n\
             /* END GENERATED CODE */\n\
             after\n"
        );
        assert_eq!(report.triggers, 1);
        assert_eq!(report.passthrough_lines, 2);
    }

    #[test]
    fn test_no_trigger_is_identity() {
        let input = "line one\r\n\tline two\n\nno newline at end";
        let mut called = false;
        let mut output = Vec::new();
        let report = inject(Cursor::new(input), &mut output, &Markers::default(), || {
            called = true;
            Ok(Vec::new())
        });
        assert!(report.is_ok_and(|r| r.triggers == 0 && r.passthrough_lines == 4));
        assert!(!called);
        assert_eq!(output, input.as_bytes());
    }

    #[test]
    fn test_non_utf8_passthrough() {
        let input: &[u8] = b"/* \xff\xfe */\n#pragma generate\n";
        let mut output = Vec::new();
        let result = inject(input, &mut output, &Markers::default(), || Ok(Vec::new()));
        assert!(result.is_ok());
        assert!(output.starts_with(b"/* \xff\xfe */\n"));
    }

    #[test]
    fn test_trigger_as_substring() {
        let (output, report) = run("  #pragma generate  /* here */\n");
        assert_eq!(report.triggers, 1);
        assert!(!output.contains("#pragma generate"));
    }

    #[test]
    fn test_trigger_on_last_line_without_newline() {
        let (output, _) = run("x\n#pragma generate");
        assert!(output.ends_with("/* END GENERATED CODE */\n"));
    }

    #[test]
    fn test_rerun_on_output_is_identity() {
        let (first, _) = run("a\n#pragma generate\nb\n");
        let (second, report) = run(&first);
        assert_eq!(report.triggers, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_block_error_aborts() {
        let mut output = Vec::new();
        let result = inject(
            Cursor::new("a\n#pragma generate\n"),
            &mut output,
            &Markers::default(),
            || Err(GenerateError::MissingRole("fop".to_string())),
        );
        assert!(matches!(result, Err(GenerateError::MissingRole(_))));
    }

    #[test]
    fn test_custom_markers() {
        let markers = Markers {
            trigger: "@@GEN@@".to_string(),
            begin_sentinel: "// begin".to_string(),
            end_sentinel: "// end".to_string(),
        };
        let mut output = Vec::new();
        let result = inject(Cursor::new("@@GEN@@\n"), &mut output, &markers, || {
            Ok(b"x\n".to_vec())
        });
        assert!(result.is_ok());
        assert_eq!(output, b"// begin\nx\n// end\n");
    }

    #[test]
    fn test_empty_trigger_never_matches() {
        let markers = Markers {
            trigger: String::new(),
            ..Markers::default()
        };
        assert!(!markers.is_trigger(b"anything\n"));
    }
}
