// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;

fn bin() -> Command {
    Command::cargo_bin("convlint").expect("bin")
}

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn conforming_repo_name_exits_zero() {
    bin()
        .args(["lint-name", "template-bicep-webapi"])
        .assert()
        .success()
        .stdout("summary: passed=2 failed=0 skipped=0 violations=0 total=2\n");
}

#[test]
fn conforming_module_name_exits_zero() {
    bin().args(["lint-name", "module-storage"]).assert().success();
}

#[test]
fn unknown_prefix_exits_one_with_finding() {
    let output = bin()
        .args(["lint-name", "foo-bar", "--format", "json"])
        .output()
        .expect("lint-name");
    assert_eq!(output.status.code(), Some(1));
    let payload: serde_json::Value = serde_json::from_slice(&output.stderr).expect("json");
    assert_eq!(
        payload.get("schema_version").and_then(|v| v.as_u64()),
        Some(1)
    );
    assert_eq!(
        payload["summary"]["violations"].as_u64(),
        Some(1)
    );
    let outcomes = payload["outcomes"].as_array().expect("outcomes");
    let kinds: Vec<&str> = outcomes
        .iter()
        .flat_map(|row| row["findings"].as_array().expect("findings"))
        .map(|finding| finding["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(kinds, vec!["unknown_prefix"]);
}

#[test]
fn empty_subject_exits_one() {
    let output = bin()
        .args(["lint-name", "template-bicep-", "--format", "json"])
        .output()
        .expect("lint-name");
    assert_eq!(output.status.code(), Some(1));
    let payload: serde_json::Value = serde_json::from_slice(&output.stderr).expect("json");
    let text = payload.to_string();
    assert!(text.contains("empty_subject"));
}

#[test]
fn empty_name_is_fatal() {
    let output = bin().args(["lint-name", ""]).output().expect("lint-name");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("convlint lint-name failed: invalid input"));
}

#[test]
fn guideline_names_route_without_kind() {
    bin().args(["lint-name", "lab-guide-storage"]).assert().success();
    // forced repo validation rejects a guideline-prefixed name
    bin()
        .args(["lint-name", "lab-guide-storage", "--kind", "repo"])
        .assert()
        .code(1);
}

#[test]
fn quiet_suppresses_output_but_keeps_exit_code() {
    let output = bin()
        .args(["--quiet", "lint-name", "foo-bar"])
        .output()
        .expect("lint-name");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn json_flag_forces_json_format() {
    let output = bin()
        .args(["--json", "lint-name", "ops-pipeline"])
        .output()
        .expect("lint-name");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["command"].as_str(), Some("lint-name"));
    assert_eq!(payload["subject"].as_str(), Some("ops-pipeline"));
}

#[test]
fn verbose_traces_the_exit_code() {
    let output = bin()
        .args(["--verbose", "lint-name", "demo-aks"])
        .output()
        .expect("lint-name");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exit=0"));
}

#[test]
fn rules_list_covers_all_domains() {
    let output = bin().args(["rules", "list"]).output().expect("rules list");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for header in ["[repo]", "[guideline]", "[script]"] {
        assert!(stdout.contains(header), "missing {header}");
    }
    assert!(stdout.contains("rules_script_guarded_directory_change"));
}

#[test]
fn rules_list_domain_filter_narrows_output() {
    let output = bin()
        .args(["rules", "list", "--domain", "repo", "--format", "json"])
        .output()
        .expect("rules list");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = payload["rules"].as_array().expect("rules");
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|row| row["domain"].as_str() == Some("repo")));
}

#[test]
fn rules_explain_shows_tables() {
    let output = bin()
        .args(["rules", "explain", "rules_repo_known_prefix"])
        .output()
        .expect("rules explain");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("id: rules_repo_known_prefix"));
    assert!(stdout.contains("prefixes: template-bicep-"));
}

#[test]
fn rules_explain_json_is_a_key_value_map() {
    let output = bin()
        .args([
            "rules",
            "explain",
            "rules_script_readme_sections",
            "--format",
            "json",
        ])
        .output()
        .expect("rules explain");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["id"].as_str(), Some("rules_script_readme_sections"));
    assert_eq!(
        payload["required_sections"].as_str(),
        Some("overview,prerequisites,usage,cleanup,resources")
    );
}

#[test]
fn rules_explain_rejects_malformed_ids() {
    let output = bin()
        .args(["rules", "explain", "not-a-rule"])
        .output()
        .expect("rules explain");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn rules_doctor_reports_clean_tables() {
    let output = bin()
        .args(["rules", "doctor", "--format", "json"])
        .output()
        .expect("rules doctor");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["status"].as_str(), Some("ok"));
    assert_eq!(payload["errors"].as_array().map(Vec::len), Some(0));
}

#[test]
fn help_command_list_matches_doc() {
    fn parse_commands_from_help(text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut in_commands = false;
        for line in text.lines() {
            if line.trim() == "Commands:" {
                in_commands = true;
                continue;
            }
            if in_commands {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with("Options:") {
                    break;
                }
                let cmd = trimmed
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if !cmd.is_empty() {
                    out.push(cmd);
                }
            }
        }
        out
    }

    let output = bin().arg("--help").output().expect("help");
    assert!(output.status.success());
    let help = String::from_utf8(output.stdout).expect("utf8");
    let observed = parse_commands_from_help(&help);

    let expected = fs::read_to_string(crate_root().join("docs/cli-command-list.md"))
        .expect("command list")
        .lines()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(observed, expected);
}
