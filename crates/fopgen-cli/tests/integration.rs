//! Integration tests for fopgen

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BEGIN: &str = "/* BEGIN GENERATED CODE - DO NOT MODIFY */";
const END: &str = "/* END GENERATED CODE */";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command using the fixture config (small registry, test drivers)
fn fopgen_cmd() -> Command {
    with_config("fopgen.toml")
}

/// Command using only the built-in drivers and registry
fn builtin_cmd() -> Command {
    with_config("empty.toml")
}

fn with_config(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("fopgen");
    cmd.env("FOPGEN_CONFIG", fixture(name))
        .env("NO_COLOR", "1")
        .env_remove("FOPGEN_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap_or_else(|e| panic!("fopgen: {}", e));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_version() {
    fopgen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fopgen"));
}

#[test]
fn test_help() {
    fopgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trigger line"));
}

#[test]
fn test_invalid_command() {
    fopgen_cmd().arg("invalid").assert().failure().code(2);
}

#[test]
fn test_run_inline_driver_to_stdout() {
    let expected = format!(
        "#include \"xlator.h\"\n\
         #include \"defaults.h\"\n\
         \n\
         void\n\
         fdl_enqueue (xlator_t *this, call_stub_t *stub);\n\
         \n\
         {BEGIN}\n\
         int32_t foo_open (loc_t * loc,\n\
         \tint32_t flags);\n\
         {END}\n\
         \n\
         struct xlator_fops fops;\n"
    );

    fopgen_cmd()
        .args(["run", "proto"])
        .arg(fixture("fdl.c"))
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_run_writes_output_file() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let output = temp_dir.path().join("fdl-gen.c");

    fopgen_cmd()
        .args(["run", "proto"])
        .arg(fixture("fdl.c"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).unwrap_or_default();
    assert!(written.contains("int32_t foo_open (loc_t * loc,"));
    assert!(!written.contains("#pragma generate"));
}

#[test]
fn test_run_missing_placeholder_fails_without_output() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let output = temp_dir.path().join("broken.c");

    fopgen_cmd()
        .args(["run", "broken"])
        .arg(fixture("fdl.c"))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("@UNKNOWN@").and(predicate::str::contains("open")));

    assert!(!output.exists());
}

#[test]
fn test_run_without_trigger_copies_input() {
    let input = fs::read_to_string(fixture("plain.c")).unwrap_or_default();
    fopgen_cmd()
        .args(["run", "broken"])
        .arg(fixture("plain.c"))
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn test_run_file_driver_with_builtin_registry() {
    let stdout = stdout_of(
        builtin_cmd()
            .args(["run", "fdl"])
            .arg(fixture("fdl-tmpl.c"))
            .arg(fixture("fdl.c")),
    );

    assert_eq!(stdout.matches(BEGIN).count(), 1);
    assert_eq!(stdout.matches(END).count(), 1);
    assert!(!stdout.contains("#pragma generate"));
    assert!(stdout.contains("fdl_writev_continue (call_frame_t *frame, xlator_t *this,"));
    assert!(stdout.contains("fdl_ipc_cbk"));
    assert!(!stdout.contains("fdl_stat "));
    assert!(!stdout.contains("fdl_getspec"));

    let fop = stdout.find("fdl_writev (");
    let cbk = stdout.find("fdl_writev_cbk (");
    let next = stdout.find("fdl_create (");
    assert!(fop < cbk && cbk < next, "blocks are ordered by operation, then role");
}

#[test]
fn test_run_is_deterministic_and_idempotent() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let first_path = temp_dir.path().join("first.c");

    let run = |target: PathBuf, output: &PathBuf| {
        builtin_cmd()
            .args(["run", "defaults-decl"])
            .arg(target)
            .arg("-o")
            .arg(output)
            .assert()
            .success();
    };

    run(fixture("fdl.c"), &first_path);
    let first = fs::read(&first_path).unwrap_or_default();

    let second_path = temp_dir.path().join("second.c");
    run(fixture("fdl.c"), &second_path);
    assert_eq!(first, fs::read(&second_path).unwrap_or_default());

    let rerun_path = temp_dir.path().join("rerun.c");
    run(first_path.clone(), &rerun_path);
    assert_eq!(first, fs::read(&rerun_path).unwrap_or_default());
}

#[test]
fn test_run_argument_count_is_usage_error() {
    builtin_cmd()
        .args(["run", "fdl"])
        .arg(fixture("fdl.c"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("takes a template file"));

    builtin_cmd()
        .args(["run", "defaults-decl"])
        .arg(fixture("fdl-tmpl.c"))
        .arg(fixture("fdl.c"))
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_run_unknown_driver() {
    fopgen_cmd()
        .args(["run", "nope"])
        .arg(fixture("fdl.c"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Driver 'nope' not found"));
}

#[test]
fn test_run_missing_target() {
    fopgen_cmd()
        .args(["run", "proto", "does-not-exist.c"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.c"));
}

#[test]
fn test_drivers_lists_builtin_and_configured() {
    fopgen_cmd()
        .arg("drivers")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("jbr-server")
                .and(predicate::str::contains("proto"))
                .and(predicate::str::contains("Test prototypes")),
        );
}

#[test]
fn test_ops_json() {
    fopgen_cmd()
        .args(["ops", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"name\": \"open\"")
                .and(predicate::str::contains("\"SHORT_ARGS\": \"loc, flags\"")),
        );
}

#[test]
fn test_ops_for_include_driver() {
    let stdout = stdout_of(builtin_cmd().args(["ops", "utime-header"]));
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();

    assert_eq!(names.first(), Some(&"fsetxattr"));
    assert!(names.contains(&"writev"));
    assert!(!names.contains(&"lookup"));
    assert_eq!(names.len(), 20);
}

#[test]
fn test_templates_lists_roles_and_checks_driver() {
    builtin_cmd()
        .arg("templates")
        .arg(fixture("fdl-tmpl.c"))
        .args(["--check", "fdl"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cbk")
                .and(predicate::str::contains("continue"))
                .and(predicate::str::contains("ERROR_ARGS")),
        );
}

#[test]
fn test_templates_check_reports_missing_role() {
    builtin_cmd()
        .arg("templates")
        .arg(fixture("fdl-tmpl.c"))
        .args(["--check", "defaults"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing template role 'resume'"));
}

#[test]
fn test_config_path() {
    fopgen_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fopgen.toml").and(predicate::str::contains("FOPGEN_CONFIG")));
}

#[test]
fn test_config_show() {
    fopgen_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("registry = \"small-fops.toml\"")
                .and(predicate::str::contains("name = \"defaults-decl\"")),
        )
        .stderr(predicate::str::contains("Log file disabled"));
}

#[test]
fn test_config_rejects_trigger_inside_sentinel() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let config = temp_dir.path().join("fopgen.toml");
    assert!(fs::write(&config, "[markers]\ntrigger = \"GENERATED\"\n").is_ok());

    fopgen_cmd()
        .arg("--config")
        .arg(&config)
        .args(["run", "proto"])
        .arg(fixture("fdl.c"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("contains the trigger"));
}

#[test]
fn test_config_missing_explicit_file() {
    fopgen_cmd()
        .args(["--config", "missing.toml", "drivers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_log_file_is_appended() {
    let Ok(temp_dir) = TempDir::new() else {
        return;
    };
    let log = temp_dir.path().join("logs").join("fopgen.log");

    for _ in 0..2 {
        fopgen_cmd()
            .args(["run", "proto"])
            .arg(fixture("fdl.c"))
            .arg("--log-file")
            .arg(&log)
            .assert()
            .success();
    }

    let content = fs::read_to_string(&log).unwrap_or_default();
    assert_eq!(content.matches("SUCCESS").count(), 2);
    assert!(content.contains("[proto]"));
}
