use convlint_model::{Finding, FindingKind, RuleId, RuleSpec};

use crate::tables::{PrefixSpec, RuleSet};
use crate::{LintTarget, RuleError, RuleEval, RuleFn};

pub(crate) fn builtin_naming_rule_fn(id: &RuleId) -> Option<RuleFn> {
    match id.as_str() {
        "rules_repo_known_prefix" => Some(eval_repo_known_prefix),
        "rules_repo_nonempty_subject" => Some(eval_repo_nonempty_subject),
        "rules_guideline_known_prefix" => Some(eval_guideline_known_prefix),
        "rules_guideline_nonempty_subject" => Some(eval_guideline_nonempty_subject),
        _ => None,
    }
}

pub(crate) fn leading_match<'a>(prefixes: &'a [PrefixSpec], name: &str) -> Option<&'a PrefixSpec> {
    prefixes.iter().find(|spec| name.starts_with(&spec.prefix))
}

fn target_name<'a>(target: &'a LintTarget, rule: &RuleSpec) -> Result<&'a str, RuleError> {
    match target {
        LintTarget::RepoName(name) | LintTarget::GuidelineName(name) => Ok(name),
        LintTarget::Script(_) => Err(RuleError::Failed(format!(
            "{} expects a name target",
            rule.id
        ))),
    }
}

fn eval_known_prefix(prefixes: &[PrefixSpec], name: &str, rule: &RuleSpec) -> RuleEval {
    if leading_match(prefixes, name).is_some() {
        return RuleEval::Findings(Vec::new());
    }
    let registered = prefixes
        .iter()
        .map(|spec| spec.prefix.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    RuleEval::Findings(vec![Finding {
        rule: rule.id.clone(),
        kind: FindingKind::UnknownPrefix,
        severity: rule.severity,
        message: format!("no registered prefix matches `{name}`"),
        hint: Some(format!("registered prefixes: {registered}")),
    }])
}

fn eval_nonempty_subject(prefixes: &[PrefixSpec], name: &str, rule: &RuleSpec) -> RuleEval {
    let Some(spec) = leading_match(prefixes, name) else {
        return RuleEval::Skip("no registered prefix matched".to_string());
    };
    let subject = &name[spec.prefix.len()..];
    if subject.is_empty() {
        return RuleEval::Findings(vec![Finding {
            rule: rule.id.clone(),
            kind: FindingKind::EmptySubject,
            severity: rule.severity,
            message: format!("`{name}` names no subject after `{}`", spec.prefix),
            hint: Some("append a concise lowercase hyphen-separated subject".to_string()),
        }]);
    }
    RuleEval::Findings(Vec::new())
}

fn eval_repo_known_prefix(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let name = target_name(target, rule)?;
    Ok(eval_known_prefix(&rules.repo_prefixes, name, rule))
}

fn eval_repo_nonempty_subject(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let name = target_name(target, rule)?;
    Ok(eval_nonempty_subject(&rules.repo_prefixes, name, rule))
}

fn eval_guideline_known_prefix(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let name = target_name(target, rule)?;
    Ok(eval_known_prefix(&rules.guideline_prefixes, name, rule))
}

fn eval_guideline_nonempty_subject(
    rules: &RuleSet,
    target: &LintTarget,
    rule: &RuleSpec,
) -> Result<RuleEval, RuleError> {
    let name = target_name(target, rule)?;
    Ok(eval_nonempty_subject(&rules.guideline_prefixes, name, rule))
}
