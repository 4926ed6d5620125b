//! Placeholder text derived from an argument list
//!
//! A signature yields three renderings:
//! - `SHORT_ARGS`: names only, for call sites (`fd, flags, xdata`)
//! - `LONG_ARGS`: `type name` pairs, for declarations
//! - `ERROR_ARGS`: a failure value per argument, for error unwinds

use crate::types::{Argument, SubstitutionMap};

pub const SHORT_ARGS: &str = "SHORT_ARGS";
pub const LONG_ARGS: &str = "LONG_ARGS";
pub const ERROR_ARGS: &str = "ERROR_ARGS";

/// Separator between declaration items; generated prototypes put one
/// parameter per line
const LONG_ARGS_SEPARATOR: &str = ",\n\t";

/// Failure value for an argument of the given C type
///
/// Pointers unwind as `NULL`, everything else as `-1`.
pub fn error_arg(ty: &str) -> &'static str {
    if ty.contains(" *") {
        "NULL"
    } else {
        "-1"
    }
}

pub fn short_args(args: &[Argument]) -> String {
    args.iter()
        .map(|a| a.name.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn long_args(args: &[Argument]) -> String {
    args.iter()
        .map(|a| format!("{} {}", a.ty, a.name))
        .collect::<Vec<_>>()
        .join(LONG_ARGS_SEPARATOR)
}

pub fn error_args(args: &[Argument]) -> String {
    args.iter()
        .map(|a| error_arg(&a.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// All three renderings of one signature
pub fn signature_substitutions(args: &[Argument]) -> SubstitutionMap {
    let mut subs = SubstitutionMap::new();
    subs.insert(SHORT_ARGS, short_args(args));
    subs.insert(LONG_ARGS, long_args(args));
    subs.insert(ERROR_ARGS, error_args(args));
    subs
}

#[cfg(test)]
mod tests {
    use crate::signature::*;

    fn writev_args() -> Vec<Argument> {
        vec![
            Argument::new("fd", "fd_t *"),
            Argument::new("count", "int32_t"),
            Argument::new("off", "off_t"),
            Argument::new("xdata", "dict_t *"),
        ]
    }

    #[test]
    fn test_error_arg() {
        assert_eq!(error_arg("fd_t *"), "NULL");
        assert_eq!(error_arg("struct iatt *"), "NULL");
        assert_eq!(error_arg("int32_t"), "-1");
        assert_eq!(error_arg("gf_seek_what_t"), "-1");
        // No space before the star: not recognized as a pointer
        assert_eq!(error_arg("char*"), "-1");
    }

    #[test]
    fn test_signature_renderings() {
        let args = writev_args();
        assert_eq!(short_args(&args), "fd, count, off, xdata");
        assert_eq!(
            long_args(&args),
            "fd_t * fd,\n\tint32_t count,\n\toff_t off,\n\tdict_t * xdata"
        );
        assert_eq!(error_args(&args), "NULL, -1, -1, NULL");
    }

    #[test]
    fn test_empty_signature() {
        let subs = signature_substitutions(&[]);
        assert_eq!(subs.get(SHORT_ARGS), Some(""));
        assert_eq!(subs.get(LONG_ARGS), Some(""));
        assert_eq!(subs.get(ERROR_ARGS), Some(""));
    }
}
