//! End-to-end tests for the coa-core binary.
//!
//! Every command runs with an empty config home so a developer's own
//! configuration cannot leak into the results.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const GENERATED_AT: &str = "2025-03-20T08:00:00Z";

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/unit.json")
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Env {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("coa-core").expect("coa-core binary should exist");
        cmd.env("XDG_CONFIG_HOME", self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("COA_CONFIG")
            .env_remove("COA_CONFIG_DIR")
            .env_remove("COA_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).output().expect("run coa-core");
        assert!(output.status.success(), "command failed: {:?}", output);
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }
}

// ============================================================================
// render
// ============================================================================

mod render {
    use super::*;

    #[test]
    fn html_to_stdout() {
        let env = Env::new();
        env.cmd()
            .args(["render", "--no-minify", "--generated-at", GENERATED_AT])
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
            .stdout(predicate::str::contains("SALM25-42"))
            .stdout(predicate::str::contains("WATER25-0042"))
            .stdout(predicate::str::contains("Salmonella — Page 1 of 1"))
            .stdout(predicate::str::contains(r#"<div class="draft-marker">DRAFT</div>"#));
    }

    #[test]
    fn completed_status_drops_draft_marker() {
        let env = Env::new();
        env.cmd()
            .args(["render", "--no-minify", "--status", "completed"])
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"<div class="draft-marker">DRAFT</div>"#).not());
    }

    #[test]
    fn json_document_to_file() {
        let env = Env::new();
        let out = env.path("out/coa.json");
        let status = env.json(&[
            "render",
            fixture().to_str().unwrap(),
            "--as",
            "json",
            "-o",
            out.to_str().unwrap(),
            "--generated-at",
            GENERATED_AT,
        ]);
        assert_eq!(status["status"], "ok");
        assert_eq!(status["unit_code"], "MIC-42");
        assert_eq!(status["pages"], 3);
        assert_eq!(status["draft"], true);

        let document =
            coa_report::serialize::from_json(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(document.pages.len(), 3);
        assert_eq!(document.meta.generated_at.to_rfc3339(), "2025-03-20T08:00:00+00:00");
        let sections: Vec<&str> = document.pages.iter().map(|p| p.section.as_str()).collect();
        assert_eq!(sections, vec!["Salmonella", "Water", "Antimicrobial Susceptibility"]);
    }

    #[test]
    fn no_ast_flag_removes_ast_pages() {
        let env = Env::new();
        let out = env.path("coa.json");
        let status = env.json(&[
            "render",
            fixture().to_str().unwrap(),
            "--as",
            "json",
            "--no-ast",
            "-o",
            out.to_str().unwrap(),
        ]);
        assert_eq!(status["pages"], 2);
    }

    #[test]
    fn identical_input_renders_identically() {
        let env = Env::new();
        let run = || {
            env.cmd()
                .args(["render", "--generated-at", GENERATED_AT])
                .arg(fixture())
                .output()
                .unwrap()
                .stdout
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        let env = Env::new();
        let snapshot = env.path("empty.json");
        std::fs::write(&snapshot, "{}").unwrap();
        env.cmd()
            .arg("render")
            .arg(&snapshot)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""status": "empty""#));
    }

    #[test]
    fn snapshot_from_stdin() {
        let env = Env::new();
        env.cmd()
            .args(["render", "-", "--no-minify"])
            .write_stdin(std::fs::read_to_string(fixture()).unwrap())
            .assert()
            .success()
            .stdout(predicate::str::contains("MIC-42"));
    }

    #[test]
    fn signature_overlay_embeds_image() {
        let env = Env::new();
        let sig = env.path("sig.png");
        std::fs::write(&sig, [0x89, b'P', b'N', b'G', 0x0d, 0x0a]).unwrap();
        env.cmd()
            .args(["render", "--no-minify"])
            .arg(fixture())
            .arg("--signature")
            .arg(format!("tested-by={}", sig.display()))
            .arg("--signer")
            .arg("reviewed-by=J. Mensah")
            .assert()
            .success()
            .stdout(predicate::str::contains("data:image/png;base64,"))
            .stdout(predicate::str::contains("J. Mensah"));
    }
}

// ============================================================================
// export
// ============================================================================

mod export {
    use super::*;

    #[test]
    fn writes_document_and_walks_states() {
        let env = Env::new();
        let out = env.path("print/coa.html");
        let events = env.path("events.jsonl");
        let result = env.json(&[
            "export",
            fixture().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--events",
            events.to_str().unwrap(),
        ]);

        assert_eq!(result["status"], "ok");
        assert_eq!(result["report"]["unit_code"], "MIC-42");
        assert_eq!(result["report"]["pages"], 3);
        assert_eq!(result["report"]["wait"]["outcome"], "settled");
        let states: Vec<&str> = result["report"]["states"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap())
            .collect();
        assert_eq!(
            states,
            vec!["idle", "assembling", "waiting_for_images", "print_triggered", "idle"]
        );

        assert!(std::fs::read_to_string(&out).unwrap().contains("MIC-42"));

        let trail = std::fs::read_to_string(&events).unwrap();
        let lines: Vec<Value> = trail
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "document.assembled");
        assert_eq!(lines[1]["stage"], "wait_images");
        assert_eq!(lines[2]["event"], "export.printed");
        assert_eq!(lines[2]["unit_code"], "MIC-42");
        assert!(lines[2]["run_id"].as_str().unwrap().starts_with("run-"));
    }

    #[test]
    fn logo_images_settle_before_print() {
        let env = Env::new();
        let logo = env.path("logo.png");
        std::fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();
        let out = env.path("coa.html");
        let result = env.json(&[
            "export",
            fixture().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--logo",
            logo.to_str().unwrap(),
        ]);
        assert_eq!(result["status"], "ok");
        assert_eq!(result["report"]["images"], 3);
        assert_eq!(result["report"]["wait"]["loaded"], 3);
    }

    #[test]
    fn summary_format() {
        let env = Env::new();
        let out = env.path("coa.html");
        env.cmd()
            .args(["export", "-f", "summary", "-o"])
            .arg(&out)
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains("MIC-42: 3 page(s), 0 image(s)"));
    }

    #[test]
    fn output_is_required() {
        let env = Env::new();
        env.cmd()
            .arg("export")
            .arg(fixture())
            .assert()
            .failure()
            .stderr(predicate::str::contains("--output"));
    }
}

// ============================================================================
// plan / report-number / hidden-diff
// ============================================================================

mod plan {
    use super::*;

    #[test]
    fn sections_and_report_numbers() {
        let env = Env::new();
        let plan = env.json(&["plan", fixture().to_str().unwrap()]);
        assert_eq!(plan["unit_code"], "MIC-42");
        assert_eq!(plan["pages"], 3);

        let sections = plan["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0]["report_number"], "SALM25-42");
        assert_eq!(sections[0]["page_rows"], serde_json::json!([3]));
        assert_eq!(sections[1]["visible_rows"], 2);
        assert_eq!(sections[1]["hidden_rows"], 1);
        assert_eq!(sections[2]["track"], "ast");
        assert_eq!(sections[2]["report_number"], "AST25-42");
    }

    #[test]
    fn summary_and_markdown() {
        let env = Env::new();
        env.cmd()
            .args(["plan", "-f", "summary"])
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("3 section(s), 3 page(s)"));

        env.cmd()
            .args(["plan", "-f", "md"])
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains("| Water | WATER25-0042 | 2 | 1 |"));
    }
}

mod report_number {
    use super::*;

    #[test]
    fn derived_from_unit_code() {
        let env = Env::new();
        env.cmd()
            .args([
                "report-number",
                "--unit-code",
                "MIC-42",
                "--disease",
                "Salmonella",
                "--date",
                "2025-03-14",
                "-f",
                "summary",
            ])
            .assert()
            .success()
            .stdout(predicate::str::diff("Salmonella: SALM25-42\n"));
    }

    #[test]
    fn ast_and_unmatched_codes() {
        let env = Env::new();
        let ast = env.json(&[
            "report-number",
            "--unit-code",
            "MB25-108",
            "--ast",
            "--date",
            "2026-01-02",
        ]);
        assert_eq!(ast["report_numbers"][0]["report_number"], "AST26-108");

        let raw = env.json(&[
            "report-number",
            "--unit-code",
            "LAB",
            "--disease",
            "Water",
            "--date",
            "2025-01-01",
        ]);
        assert_eq!(raw["report_numbers"][0]["report_number"], "LAB");
    }

    #[test]
    fn from_snapshot_uses_stored_override() {
        let env = Env::new();
        let numbers = env.json(&[
            "report-number",
            "--snapshot",
            fixture().to_str().unwrap(),
        ]);
        let water = numbers["report_numbers"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["section"] == "Water")
            .unwrap();
        assert_eq!(water["report_number"], "WATER25-0042");
    }

    #[test]
    fn requires_unit_code() {
        let env = Env::new();
        env.cmd()
            .args(["report-number", "--disease", "Salmonella"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--unit-code"));
    }
}

mod hidden_diff {
    use super::*;

    #[test]
    fn describes_hidden_and_shown() {
        let env = Env::new();
        let edited = std::fs::read_to_string(fixture())
            .unwrap()
            .replace(r#""hidden_indexes": ["3"]"#, r#""hidden_indexes": ["1", "2"]"#);
        let new = env.path("edited.json");
        std::fs::write(&new, edited).unwrap();

        let diff = env.json(&[
            "hidden-diff",
            fixture().to_str().unwrap(),
            new.to_str().unwrap(),
        ]);
        assert_eq!(diff["changed"], true);
        assert_eq!(diff["changes"][0]["description"], "Water: hidden [1, 2]");
        assert_eq!(diff["changes"][1]["description"], "Water: shown [3]");

        env.cmd()
            .args(["hidden-diff", "-f", "md"])
            .arg(fixture())
            .arg(fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains("No hidden-index changes."));
    }
}

// ============================================================================
// check / config / misc
// ============================================================================

mod check {
    use super::*;

    #[test]
    fn defaults_and_snapshot_ok() {
        let env = Env::new();
        let check = env.json(&["check", "--snapshot", fixture().to_str().unwrap()]);
        assert_eq!(check["status"], "ok");
        assert_eq!(check["checks"][0]["source"], "builtin default");
        assert_eq!(check["checks"][1]["unit_code"], "MIC-42");
        assert_eq!(check["checks"][1]["ast_renderable_rows"], 1);
    }

    #[test]
    fn malformed_snapshot_is_input_error() {
        let env = Env::new();
        let bad = env.path("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        env.cmd()
            .args(["check", "--snapshot"])
            .arg(&bad)
            .assert()
            .code(11)
            .stdout(predicate::str::contains(r#""status": "error""#));
    }
}

mod errors {
    use super::*;

    #[test]
    fn missing_snapshot_is_args_error() {
        let env = Env::new();
        env.cmd()
            .args(["render", "/nonexistent/unit.json"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("ERR_ARGS"));
    }

    #[test]
    fn malformed_snapshot_is_input_error() {
        let env = Env::new();
        let bad = env.path("bad.json");
        std::fs::write(&bad, r#"{"unit": {"diseases": []}}"#).unwrap();
        env.cmd()
            .args(["render", "-f", "md"])
            .arg(&bad)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("✗ Invalid Snapshot"));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let env = Env::new();
        env.cmd()
            .args(["render", "--config", "/nonexistent/coa.toml"])
            .arg(fixture())
            .assert()
            .code(12);
    }

    #[test]
    fn schema_mismatch_is_version_error() {
        let env = Env::new();
        let config = env.path("coa.toml");
        std::fs::write(&config, "schema_version = \"0.1.0\"\n").unwrap();
        env.cmd()
            .args(["plan", "--config"])
            .arg(&config)
            .arg(fixture())
            .assert()
            .code(13)
            .stderr(predicate::str::contains("ERR_VERSION"));
    }

    #[test]
    fn unknown_command_fails() {
        let env = Env::new();
        env.cmd()
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_role_rejected_by_parser() {
        let env = Env::new();
        env.cmd()
            .args(["render", "--signer", "janitor=X"])
            .arg(fixture())
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown signatory role"));
    }
}

mod config {
    use super::*;

    #[test]
    fn show_defaults() {
        let env = Env::new();
        let shown = env.json(&["config", "show"]);
        assert_eq!(shown["source"]["source"], "builtin default");
        assert_eq!(shown["config"]["pagination"]["disease"]["rows_per_page"], 45);
    }

    #[test]
    fn validate_explicit_file() {
        let env = Env::new();
        let config = env.path("coa.json");
        std::fs::write(&config, r#"{"print": {"image_wait_timeout_ms": 500}}"#).unwrap();
        env.cmd()
            .args(["config", "validate", "-f", "summary"])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("config validate: OK"));
    }
}

mod misc {
    use super::*;

    #[test]
    fn version_json() {
        let env = Env::new();
        let version = env.json(&["version"]);
        assert_eq!(version["coa_core_version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn completions_bash() {
        let env = Env::new();
        env.cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("coa-core"));
    }
}
