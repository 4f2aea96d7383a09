//! Integration tests for the rdom CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const WIDGET: &str = "// Widgets\nclass Widget\n{\n    #region State\n    [Obsolete(\"old\", Error = true)]\n    private int size = 4;\n    #endregion\n\n    void Grow()\n    {\n        size++;\n    }\n}\n";

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("rdom").unwrap();
    cmd.arg("--no-color");
    cmd
}

/// Temporary directory holding `Widget.cs`
fn create_test_project(source: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Widget.cs"), source).unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_dump_shows_members_and_attributes() {
    let project = create_test_project(WIDGET);
    cli()
        .arg("dump")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("class Widget"))
        .stdout(predicate::str::contains("// Widgets"))
        .stdout(predicate::str::contains("field int size = 4"))
        .stdout(predicate::str::contains("Error = true (bool, name =)"))
        .stdout(predicate::str::contains("blank x1"));
}

#[test]
fn test_regions_lists_paired_group() {
    let project = create_test_project(WIDGET);
    cli()
        .arg("regions")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("State"))
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_regions_reports_missing_end() {
    let project = create_test_project("class C\n{\n    #region Open\n    int x;\n}\n");
    cli()
        .arg("regions")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("missing #endregion"));
}

#[test]
fn test_emit_canonical_source_unchanged() {
    let project = create_test_project(WIDGET);
    cli()
        .arg("emit")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout(WIDGET);
}

#[test]
fn test_emit_uses_discovered_config() {
    let project = create_test_project("class C\n{\n    int x;\n}\n");
    fs::write(
        project.path().join(".rdomrc.toml"),
        "[emit]\nindentStyle = \"tabs\"\n",
    )
    .unwrap();

    cli()
        .arg("emit")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout("class C\n{\n\tint x;\n}\n");
}

#[test]
fn test_emit_write_rewrites_file() {
    let project = create_test_project("class C {\nint x;\n}");
    let file = project.path().join("Widget.cs");
    cli().arg("emit").arg("--write").arg(&file).assert().success();
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "class C\n{\n    int x;\n}\n"
    );
}

#[test]
fn test_emit_write_refuses_lossy_model() {
    let source = "class C\n{\n    int P { get; set; }\n}\n";
    let project = create_test_project(source);
    let file = project.path().join("Widget.cs");
    cli()
        .arg("emit")
        .arg("--write")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Refusing to overwrite"));
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}

#[test]
fn test_skipped_constructs_are_reported_with_verbose() {
    let project = create_test_project("class C\n{\n    int P { get; set; }\n}\n");
    cli()
        .env_remove("RUST_LOG")
        .arg("-v")
        .arg("dump")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped:"));
}

#[test]
fn test_check_lossy_file_is_unstable() {
    let project = create_test_project("class C\n{\n    int P { get; set; }\n}\n");
    cli()
        .arg("check")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unstable"))
        .stdout(predicate::str::contains("not modelled:"));
}

#[test]
fn test_check_stable_file() {
    let project = create_test_project(WIDGET);
    cli()
        .arg("check")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("identical"));
}

#[test]
fn test_strict_flag_fails_on_unsupported_argument() {
    let project = create_test_project("[A(B.C)]\nclass C\n{\n}\n");
    cli()
        .arg("--strict")
        .arg("dump")
        .arg(project.path().join("Widget.cs"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported literal shape"));
}

#[test]
fn test_literal_name_colon_type_of() {
    cli()
        .args(["literal", "Bar: typeof(string)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("style: NameColon"))
        .stdout(predicate::str::contains("kind:  type"))
        .stdout(predicate::str::contains("emit:  Bar: typeof(string)"));
}

#[test]
fn test_missing_file_is_an_error() {
    cli()
        .args(["dump", "does-not-exist.cs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
