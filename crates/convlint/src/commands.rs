// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use convlint_core::{
    exit_code_for_report, explain_output, list_output, render_json, render_jsonl, render_text,
    routes_as_guideline, run_lint, selected_rules, validate_rule_set, LintTarget, RuleSet,
};
use convlint_model::{schema_version, DomainId, LintReport, RuleId, ScriptOutline};

use crate::cli::{DomainArg, FormatArg, KindArg};

impl From<DomainArg> for DomainId {
    fn from(value: DomainArg) -> Self {
        match value {
            DomainArg::Repo => Self::Repo,
            DomainArg::Guideline => Self::Guideline,
            DomainArg::Script => Self::Script,
        }
    }
}

fn write_output_if_requested(out: Option<PathBuf>, rendered: &str) -> Result<(), String> {
    if let Some(path) = out {
        fs::write(&path, format!("{rendered}\n"))
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }
    Ok(())
}

fn render_report(report: &LintReport, format: FormatArg) -> Result<String, String> {
    match format {
        FormatArg::Text => Ok(render_text(report)),
        FormatArg::Json => render_json(report),
        FormatArg::Jsonl => render_jsonl(report),
    }
}

fn finish_lint(
    rules: &RuleSet,
    target: &LintTarget,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let report = run_lint(rules, target).map_err(|err| err.to_string())?;
    let rendered = render_report(&report, format)?;
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, exit_code_for_report(&report)))
}

pub(crate) fn run_lint_name(
    name: &str,
    kind: Option<KindArg>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let rules = RuleSet::builtin();
    let target = match kind {
        Some(KindArg::Repo) => LintTarget::RepoName(name.to_string()),
        Some(KindArg::Guideline) => LintTarget::GuidelineName(name.to_string()),
        None if routes_as_guideline(&rules, name) => {
            LintTarget::GuidelineName(name.to_string())
        }
        None => LintTarget::RepoName(name.to_string()),
    };
    finish_lint(&rules, &target, format, out)
}

pub(crate) fn run_lint_script(
    outline_path: &Path,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let text = fs::read_to_string(outline_path)
        .map_err(|err| format!("cannot read {}: {err}", outline_path.display()))?;
    let outline = ScriptOutline::from_toml_str(&text).map_err(|err| err.to_string())?;
    let rules = RuleSet::builtin();
    finish_lint(&rules, &LintTarget::Script(outline), format, out)
}

pub(crate) fn run_rules_list(
    domain: Option<DomainArg>,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let rules = RuleSet::builtin();
    let selected = selected_rules(&rules, domain.map(Into::into));
    let rendered = match format {
        FormatArg::Text => {
            let mut groups: BTreeMap<String, Vec<&convlint_model::RuleSpec>> = BTreeMap::new();
            for rule in selected.iter().copied() {
                groups.entry(rule.domain.to_string()).or_default().push(rule);
            }
            let mut blocks = Vec::new();
            for (domain, rules_in_domain) in groups {
                blocks.push(format!("[{domain}]\n{}", list_output(&rules_in_domain)));
            }
            blocks.join("\n\n")
        }
        FormatArg::Json => {
            let rows: Vec<serde_json::Value> = selected
                .iter()
                .map(|rule| {
                    serde_json::json!({
                        "id": rule.id.as_str(),
                        "domain": rule.domain.as_str(),
                        "title": rule.title,
                        "severity": rule.severity.as_str(),
                    })
                })
                .collect();
            serde_json::to_string_pretty(
                &serde_json::json!({"schema_version": schema_version(), "rules": rows}),
            )
            .map_err(|err| err.to_string())?
        }
        FormatArg::Jsonl => return Err("jsonl output is not supported for list".to_string()),
    };
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, 0))
}

pub(crate) fn run_rules_explain(
    rule_id: &str,
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let rules = RuleSet::builtin();
    let id = RuleId::parse(rule_id)?;
    let explain_text = explain_output(&rules, &id)?;
    let rendered = match format {
        FormatArg::Text => explain_text,
        FormatArg::Json => {
            let mut map = serde_json::Map::new();
            for line in explain_text.lines() {
                if let Some((key, value)) = line.split_once(": ") {
                    map.insert(
                        key.to_string(),
                        serde_json::Value::String(value.to_string()),
                    );
                }
            }
            serde_json::to_string_pretty(&serde_json::Value::Object(map))
                .map_err(|err| err.to_string())?
        }
        FormatArg::Jsonl => return Err("jsonl output is not supported for explain".to_string()),
    };
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, 0))
}

pub(crate) fn run_rules_doctor(
    format: FormatArg,
    out: Option<PathBuf>,
) -> Result<(String, i32), String> {
    let errors = validate_rule_set(&RuleSet::builtin());
    let status = if errors.is_empty() { "ok" } else { "failed" };
    let payload = serde_json::json!({
        "schema_version": schema_version(),
        "status": status,
        "errors": errors,
    });
    let rendered = match format {
        FormatArg::Text => format!(
            "status: {status}\nerrors: {}",
            payload["errors"].as_array().map_or(0, Vec::len)
        ),
        FormatArg::Json => serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?,
        FormatArg::Jsonl => serde_json::to_string(&payload).map_err(|err| err.to_string())?,
    };
    write_output_if_requested(out, &rendered)?;
    Ok((rendered, if status == "ok" { 0 } else { 1 }))
}
