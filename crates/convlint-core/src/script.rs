use convlint_model::{Finding, FindingKind, RuleId, RuleSpec, ScriptOutline};

use crate::tables::RuleSet;
use crate::{LintTarget, RuleError, RuleEval, RuleFn};

pub(crate) fn builtin_script_rule_fn(id: &RuleId) -> Option<RuleFn> {
    match id.as_str() {
        "rules_script_config_reference" => Some(eval_config_reference),
        "rules_script_guarded_directory_change" => Some(eval_guarded_directory_change),
        "rules_script_readme_sections" => Some(eval_readme_sections),
        _ => None,
    }
}

fn target_outline<'a>(target: &'a LintTarget, rule: &RuleSpec) -> Result<&'a ScriptOutline, RuleError> {
    match target {
        LintTarget::Script(outline) => Ok(outline),
        LintTarget::RepoName(_) | LintTarget::GuidelineName(_) => Err(RuleError::Failed(format!(
            "{} expects a script outline target",
            rule.id
        ))),
    }
}

fn final_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn eval_config_reference(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let outline = target_outline(target, rule)?;
    let referenced = outline
        .dot_sources
        .iter()
        .any(|entry| final_segment(entry.trim()) == rules.shared_config_file);
    if referenced {
        return Ok(RuleEval::Findings(Vec::new()));
    }
    Ok(RuleEval::Findings(vec![Finding {
        rule: rule.id.clone(),
        kind: FindingKind::MissingConfigReference,
        severity: rule.severity,
        message: format!(
            "`{}` does not dot-source the shared configuration file `{}`",
            outline.script, rules.shared_config_file
        ),
        hint: Some(format!(
            "dot-source `{}` before any resource command",
            rules.shared_config_file
        )),
    }]))
}

fn eval_guarded_directory_change(
    _rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let outline = target_outline(target, rule)?;
    if !outline.changes_directory {
        return Ok(RuleEval::Skip(
            "script declares no directory change".to_string(),
        ));
    }
    if outline.guarded_directory_change {
        return Ok(RuleEval::Findings(Vec::new()));
    }
    Ok(RuleEval::Findings(vec![Finding {
        rule: rule.id.clone(),
        kind: FindingKind::UnguardedDirectoryChange,
        severity: rule.severity,
        message: format!(
            "`{}` changes directory without a guarded restore",
            outline.script
        ),
        hint: Some(
            "save the current location, change directory inside the protected block, restore it on every exit path"
                .to_string(),
        ),
    }]))
}

fn eval_readme_sections(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let outline = target_outline(target, rule)?;
    let declared: Vec<String> = outline
        .readme_sections
        .iter()
        .map(|section| section.trim().to_ascii_lowercase())
        .collect();
    let mut findings = Vec::new();
    for required in &rules.required_readme_sections {
        if !declared.iter().any(|section| section == required) {
            findings.push(Finding {
                rule: rule.id.clone(),
                kind: FindingKind::MissingReadmeSection,
                severity: rule.severity,
                message: format!(
                    "`{}` README is missing the `{required}` section",
                    outline.script
                ),
                hint: Some(format!("add a `{required}` section to the README")),
            });
        }
    }
    Ok(RuleEval::Findings(findings))
}
