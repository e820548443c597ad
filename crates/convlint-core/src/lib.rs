#![forbid(unsafe_code)]

use convlint_model::{
    schema_version, DomainId, Finding, LintError, LintReport, LintSummary, RuleId, RuleOutcome,
    RuleSpec, RuleStatus, ScriptOutline, Severity,
};

pub mod tables;

mod naming;
mod script;

pub use tables::{
    validate_rule_set, PrefixSpec, RuleSet, REQUIRED_README_SECTIONS, SHARED_CONFIG_FILE,
};

/// One subject submitted for validation. Each target is evaluated against the
/// rules of exactly one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintTarget {
    RepoName(String),
    GuidelineName(String),
    Script(ScriptOutline),
}

impl LintTarget {
    #[must_use]
    pub fn domain(&self) -> DomainId {
        match self {
            Self::RepoName(_) => DomainId::Repo,
            Self::GuidelineName(_) => DomainId::Guideline,
            Self::Script(_) => DomainId::Script,
        }
    }

    #[must_use]
    pub fn command(&self) -> &'static str {
        match self {
            Self::RepoName(_) | Self::GuidelineName(_) => "lint-name",
            Self::Script(_) => "lint-script",
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::RepoName(name) | Self::GuidelineName(name) => name,
            Self::Script(outline) => &outline.script,
        }
    }
}

#[derive(Debug)]
pub(crate) enum RuleError {
    Failed(String),
}

pub(crate) enum RuleEval {
    Skip(String),
    Findings(Vec<Finding>),
}

pub(crate) type RuleFn =
    fn(&RuleSet, &LintTarget, &RuleSpec) -> Result<RuleEval, RuleError>;

fn builtin_rule_fn(id: &RuleId) -> Option<RuleFn> {
    naming::builtin_naming_rule_fn(id).or_else(|| script::builtin_script_rule_fn(id))
}

fn sorted_findings(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(|a, b| {
        a.kind
            .as_str()
            .cmp(b.kind.as_str())
            .then_with(|| a.message.cmp(&b.message))
    });
    findings
}

fn reject_invalid_target(target: &LintTarget) -> Result<(), LintError> {
    if target.subject().trim().is_empty() {
        return Err(LintError::InvalidInput {
            detail: match target {
                LintTarget::RepoName(_) => "repository name cannot be empty".to_string(),
                LintTarget::GuidelineName(_) => "guideline file name cannot be empty".to_string(),
                LintTarget::Script(_) => "script outline must name a script".to_string(),
            },
        });
    }
    Ok(())
}

/// Evaluates every rule of the target's domain and assembles the report.
/// Pure: the result is a function of the target and the rule tables alone,
/// and the same target always yields the same report.
pub fn run_lint(rules: &RuleSet, target: &LintTarget) -> Result<LintReport, LintError> {
    reject_invalid_target(target)?;

    let mut outcomes: Vec<RuleOutcome> = Vec::new();
    for rule in rules.rules_for_domain(target.domain()) {
        let func = builtin_rule_fn(&rule.id).ok_or_else(|| LintError::RuleEvaluation {
            rule: rule.id.to_string(),
            detail: "rule has no evaluator".to_string(),
        })?;
        let eval = func(rules, target, rule).map_err(|RuleError::Failed(detail)| {
            LintError::RuleEvaluation {
                rule: rule.id.to_string(),
                detail,
            }
        })?;
        outcomes.push(match eval {
            RuleEval::Skip(reason) => RuleOutcome {
                rule: rule.id.clone(),
                status: RuleStatus::Skip,
                skip_reason: Some(reason),
                findings: Vec::new(),
            },
            RuleEval::Findings(findings) => {
                let findings = sorted_findings(findings);
                RuleOutcome {
                    rule: rule.id.clone(),
                    status: if findings.is_empty() {
                        RuleStatus::Pass
                    } else {
                        RuleStatus::Fail
                    },
                    skip_reason: None,
                    findings,
                }
            }
        });
    }
    outcomes.sort_by(|a, b| a.rule.as_str().cmp(b.rule.as_str()));

    let summary = LintSummary {
        schema_version: schema_version(),
        passed: outcomes
            .iter()
            .filter(|row| row.status == RuleStatus::Pass)
            .count() as u64,
        failed: outcomes
            .iter()
            .filter(|row| row.status == RuleStatus::Fail)
            .count() as u64,
        skipped: outcomes
            .iter()
            .filter(|row| row.status == RuleStatus::Skip)
            .count() as u64,
        violations: outcomes
            .iter()
            .flat_map(|row| row.findings.iter())
            .filter(|finding| finding.severity == Severity::Violation)
            .count() as u64,
        warnings: outcomes
            .iter()
            .flat_map(|row| row.findings.iter())
            .filter(|finding| finding.severity == Severity::Warning)
            .count() as u64,
        total: outcomes.len() as u64,
    };

    Ok(LintReport {
        schema_version: schema_version(),
        command: target.command().to_string(),
        subject: target.subject().to_string(),
        outcomes,
        summary,
    })
}

pub fn validate_repo_name(rules: &RuleSet, name: &str) -> Result<Vec<Finding>, LintError> {
    run_lint(rules, &LintTarget::RepoName(name.to_string())).map(LintReport::into_findings)
}

pub fn validate_guideline_file_name(
    rules: &RuleSet,
    name: &str,
) -> Result<Vec<Finding>, LintError> {
    run_lint(rules, &LintTarget::GuidelineName(name.to_string())).map(LintReport::into_findings)
}

pub fn validate_script_structure(
    rules: &RuleSet,
    outline: &ScriptOutline,
) -> Result<Vec<Finding>, LintError> {
    run_lint(rules, &LintTarget::Script(outline.clone())).map(LintReport::into_findings)
}

/// Routing for `lint-name` without an explicit kind: a leading match in the
/// guideline table validates as a guideline file name.
#[must_use]
pub fn routes_as_guideline(rules: &RuleSet, name: &str) -> bool {
    naming::leading_match(&rules.guideline_prefixes, name).is_some()
}

#[must_use]
pub fn selected_rules<'a>(rules: &'a RuleSet, domain: Option<DomainId>) -> Vec<&'a RuleSpec> {
    let mut out: Vec<&RuleSpec> = rules
        .rules
        .iter()
        .filter(|rule| domain.is_none_or(|wanted| rule.domain == wanted))
        .collect();
    out.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    out
}

pub fn list_output(rules: &[&RuleSpec]) -> String {
    rules
        .iter()
        .map(|rule| format!("{}\t{}", rule.id, rule.title))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn explain_output(rules: &RuleSet, id: &RuleId) -> Result<String, String> {
    let rule = rules
        .rule(id)
        .ok_or_else(|| format!("unknown rule id `{id}`"))?;
    let mut lines = vec![
        format!("id: {}", rule.id),
        format!("domain: {}", rule.domain),
        format!("title: {}", rule.title),
        format!("docs: {}", rule.docs),
        format!("severity: {}", rule.severity.as_str()),
    ];
    match rule.domain {
        DomainId::Repo | DomainId::Guideline => {
            let table = if rule.domain == DomainId::Repo {
                &rules.repo_prefixes
            } else {
                &rules.guideline_prefixes
            };
            lines.push(format!(
                "prefixes: {}",
                table
                    .iter()
                    .map(|spec| spec.prefix.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            ));
            for spec in table {
                lines.push(format!(
                    "subjects[{}]: {}",
                    spec.prefix,
                    spec.subjects.join(",")
                ));
            }
        }
        DomainId::Script => {
            if rule.id.as_str() == "rules_script_config_reference" {
                lines.push(format!("shared_config_file: {}", rules.shared_config_file));
            }
            if rule.id.as_str() == "rules_script_readme_sections" {
                lines.push(format!(
                    "required_sections: {}",
                    rules.required_readme_sections.join(",")
                ));
            }
        }
    }
    Ok(lines.join("\n"))
}

pub fn render_text(report: &LintReport) -> String {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        for finding in &outcome.findings {
            lines.push(format!(
                "{}: {} {}: {}",
                finding.severity.as_str(),
                finding.rule,
                finding.kind.as_str(),
                finding.message
            ));
        }
    }
    lines.push(format!(
        "summary: passed={} failed={} skipped={} violations={} total={}",
        report.summary.passed,
        report.summary.failed,
        report.summary.skipped,
        report.summary.violations,
        report.summary.total,
    ));
    lines.join("\n")
}

pub fn render_json(report: &LintReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

pub fn render_jsonl(report: &LintReport) -> Result<String, String> {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        lines.push(serde_json::to_string(outcome).map_err(|err| err.to_string())?);
    }
    Ok(lines.join("\n"))
}

#[must_use]
pub fn exit_code_for_report(report: &LintReport) -> i32 {
    if report.summary.violations > 0 {
        1
    } else {
        0
    }
}
