//! CLI integration tests for the openapi-deref binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("openapi-deref"))
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod deref_command {
    use super::*;

    #[test]
    fn basic_deref() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r##"{
                "components": { "A": { "type": "string" } },
                "B": { "$ref": "#/components/A" }
            }"##,
        );

        cmd()
            .args(["deref", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""B":{"type":"string"}"#));
    }

    #[test]
    fn scoped_deref_with_ignore() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r##"{
                "paths": { "/pets": { "$ref": "#/components/Pet" } },
                "components": {
                    "Pet": { "type": "object" },
                    "x-stackQL-resources": { "bad": { "$ref": "#/no/such/node" } }
                }
            }"##,
        );

        cmd()
            .args([
                "deref",
                spec.to_str().unwrap(),
                "--start-at",
                "$.paths",
                "--ignore",
                "$.components.x-stackQL-resources",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""/pets":{"type":"object"}"#))
            .stdout(predicate::str::contains(r##""$ref":"#/no/such/node""##));
    }

    #[test]
    fn yaml_in_yaml_out() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.yaml",
            "components:\n  A:\n    type: string\nB:\n  $ref: '#/components/A'\n",
        );

        cmd()
            .args(["deref", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("B:\n  type: string"));
    }

    #[test]
    fn yaml_in_json_out() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.yaml",
            "components:\n  A:\n    type: string\nB:\n  $ref: '#/components/A'\n",
        );

        cmd()
            .args(["deref", spec.to_str().unwrap(), "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""B":{"type":"string"}"#));
    }

    #[test]
    fn writes_output_file() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r##"{ "components": { "A": 1 }, "B": { "$ref": "#/components/A" } }"##,
        );
        let out = dir.path().join("resolved.json");

        cmd()
            .args([
                "deref",
                spec.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains(r#""B":1"#));
    }

    #[test]
    fn unresolvable_ref_exits_2() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", r##"{ "B": { "$ref": "#/missing" } }"##);

        cmd()
            .args(["deref", spec.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("#/missing"));
    }

    #[test]
    fn unmatched_start_at_exits_2() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", r#"{ "a": 1 }"#);

        cmd()
            .args(["deref", spec.to_str().unwrap(), "--start-at", "$.nowhere"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("$.nowhere"));
    }

    #[test]
    fn missing_file_exits_3() {
        cmd()
            .args(["deref", "/nonexistent/spec.yaml"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }
}

mod normalize_command {
    use super::*;

    #[test]
    fn flatten_all_of() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r#"{
                "schema": {
                    "allOf": [
                        { "properties": { "a": { "type": "string" } } },
                        { "properties": { "b": { "type": "number" } } }
                    ]
                }
            }"#,
        );

        cmd()
            .args(["normalize", spec.to_str().unwrap(), "--all-of"])
            .assert()
            .success()
            .stdout(predicate::str::contains("allOf").not())
            .stdout(predicate::str::contains(r#""a":{"type":"string"}"#))
            .stdout(predicate::str::contains(r#""b":{"type":"number"}"#));
    }

    #[test]
    fn pick_first_one_of() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r#"{ "schema": { "oneOf": [ { "type": "string" }, { "type": "number" } ] } }"#,
        );

        cmd()
            .args(["normalize", spec.to_str().unwrap(), "--one-of"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""schema":{"type":"string"}"#));
    }

    #[test]
    fn combined_flags_apply_in_sequence() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r#"{
                "schema": {
                    "anyOf": [
                        { "allOf": [ { "type": "object" } ] },
                        { "type": "integer" }
                    ]
                }
            }"#,
        );

        cmd()
            .args([
                "normalize",
                spec.to_str().unwrap(),
                "--all-of",
                "--any-of",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""schema":{"type":"object"}"#));
    }

    #[test]
    fn no_flags_is_an_error() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", r#"{}"#);

        cmd()
            .args(["normalize", spec.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("nothing to do"));
    }

    #[test]
    fn empty_one_of_exits_2() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", r#"{ "schema": { "oneOf": [] } }"#);

        cmd()
            .args(["normalize", spec.to_str().unwrap(), "--one-of"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("empty oneOf"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn clean_document_passes() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r##"{ "components": { "A": 1 }, "B": { "$ref": "#/components/A" } }"##,
        );

        cmd()
            .args(["check", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("OK"));
    }

    #[test]
    fn broken_ref_exits_1() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "spec.json", r##"{ "B": { "$ref": "#/missing" } }"##);

        cmd()
            .args(["check", spec.to_str().unwrap()])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("broken-ref"));
    }

    #[test]
    fn json_output_lists_diagnostics() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "spec.json",
            r##"{ "B": { "$ref": "#/missing" }, "C": { "oneOf": [] } }"##,
        );

        cmd()
            .args(["check", spec.to_str().unwrap(), "--json"])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains(r#""code": "broken-ref""#))
            .stdout(predicate::str::contains(r#""code": "empty-composition""#));
    }
}
