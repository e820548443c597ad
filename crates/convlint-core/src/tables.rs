use std::collections::BTreeSet;

use convlint_model::{DomainId, RuleId, RuleSpec, Severity};

/// One registered name prefix and the subject tokens the convention documents
/// list for it. Subject tokens are documentation surfaced by `rules explain`;
/// they are never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSpec {
    pub prefix: String,
    pub subjects: Vec<String>,
}

pub const SHARED_CONFIG_FILE: &str = "config.ps1";

pub const REQUIRED_README_SECTIONS: [&str; 5] =
    ["overview", "prerequisites", "usage", "cleanup", "resources"];

#[derive(Debug, Clone)]
pub struct RuleSet {
    pub rules: Vec<RuleSpec>,
    /// Repository prefixes in match order; the first leading match wins.
    pub repo_prefixes: Vec<PrefixSpec>,
    /// Guideline file prefixes in match order.
    pub guideline_prefixes: Vec<PrefixSpec>,
    pub shared_config_file: String,
    pub required_readme_sections: Vec<String>,
}

fn prefix_spec(prefix: &str, subjects: &[&str]) -> PrefixSpec {
    PrefixSpec {
        prefix: prefix.to_string(),
        subjects: subjects.iter().map(ToString::to_string).collect(),
    }
}

fn rule_spec(id: &str, domain: DomainId, title: &str, docs: &str) -> RuleSpec {
    let parsed = RuleId::parse(id).unwrap_or_else(|err| panic!("builtin rule id {id}: {err}"));
    RuleSpec {
        id: parsed,
        domain,
        title: title.to_string(),
        docs: docs.to_string(),
        severity: Severity::Violation,
    }
}

impl RuleSet {
    /// The compiled-in convention tables. Immutable after construction; every
    /// validation call is a pure function of its input and these tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                rule_spec(
                    "rules_repo_known_prefix",
                    DomainId::Repo,
                    "repository name starts with a registered prefix",
                    "every repository name must lead with exactly one registered category prefix",
                ),
                rule_spec(
                    "rules_repo_nonempty_subject",
                    DomainId::Repo,
                    "repository name carries a subject after its prefix",
                    "a prefix alone names no repository; a subject must follow the prefix",
                ),
                rule_spec(
                    "rules_guideline_known_prefix",
                    DomainId::Guideline,
                    "guideline file name starts with a registered prefix",
                    "guideline and prompt files lead with one of the documented guideline prefixes",
                ),
                rule_spec(
                    "rules_guideline_nonempty_subject",
                    DomainId::Guideline,
                    "guideline file name carries a subject after its prefix",
                    "a guideline prefix alone names no file; a subject must follow the prefix",
                ),
                rule_spec(
                    "rules_script_config_reference",
                    DomainId::Script,
                    "script dot-sources the shared configuration file",
                    "tutorial scripts load centralized settings by dot-sourcing the shared config file",
                ),
                rule_spec(
                    "rules_script_guarded_directory_change",
                    DomainId::Script,
                    "directory changes restore the original location on every exit path",
                    "a script that changes directory must guard the change and restore the saved location",
                ),
                rule_spec(
                    "rules_script_readme_sections",
                    DomainId::Script,
                    "script README declares the required section set",
                    "every tutorial README carries the five documented sections",
                ),
            ],
            repo_prefixes: vec![
                prefix_spec(
                    "template-bicep-",
                    &["webapi", "webapp", "function", "storage", "vnet"],
                ),
                prefix_spec("template-arm-", &["webapi", "webapp", "storage"]),
                prefix_spec("module-", &["storage", "network", "monitoring", "identity"]),
                prefix_spec("demo-", &["aks", "appservice", "keyvault"]),
                prefix_spec("ops-", &["pipeline", "automation", "deployment"]),
            ],
            guideline_prefixes: vec![
                prefix_spec("guide-", &["azure-cli", "bicep", "powershell"]),
                prefix_spec("prompt-", &["azure-cli", "bicep", "powershell"]),
                prefix_spec("lab-guide-", &["appservice", "storage", "networking"]),
                prefix_spec("lab-prompt-", &["appservice", "storage", "networking"]),
                prefix_spec("learning-guide-", &["azure-fundamentals", "iac"]),
                prefix_spec("learning-prompt-", &["azure-fundamentals", "iac"]),
            ],
            shared_config_file: SHARED_CONFIG_FILE.to_string(),
            required_readme_sections: REQUIRED_README_SECTIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    #[must_use]
    pub fn rule(&self, id: &RuleId) -> Option<&RuleSpec> {
        self.rules.iter().find(|rule| rule.id == *id)
    }

    #[must_use]
    pub fn rules_for_domain(&self, domain: DomainId) -> Vec<&RuleSpec> {
        let mut out: Vec<&RuleSpec> = self
            .rules
            .iter()
            .filter(|rule| rule.domain == domain)
            .collect();
        out.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        out
    }
}

fn is_well_formed_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.ends_with('-')
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Table hygiene over a rule set. A valid builtin table yields an empty list;
/// anything else is a programming defect, not a lint finding.
pub fn validate_rule_set(rules: &RuleSet) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    let mut seen_rules = BTreeSet::new();
    for rule in &rules.rules {
        if !seen_rules.insert(rule.id.as_str().to_string()) {
            errors.push(format!("duplicate rule id `{}`", rule.id));
        }
        if rule.title.trim().is_empty() {
            errors.push(format!("{}: title must not be empty", rule.id));
        }
        if rule.docs.trim().is_empty() {
            errors.push(format!("{}: docs must not be empty", rule.id));
        }
        if crate::builtin_rule_fn(&rule.id).is_none() {
            errors.push(format!("{}: rule has no evaluator", rule.id));
        }
    }

    let mut seen_prefixes = BTreeSet::new();
    for spec in rules
        .repo_prefixes
        .iter()
        .chain(rules.guideline_prefixes.iter())
    {
        if !is_well_formed_prefix(&spec.prefix) {
            errors.push(format!(
                "invalid prefix `{}`: expected lowercase hyphenated with trailing hyphen",
                spec.prefix
            ));
        }
        if !seen_prefixes.insert(spec.prefix.clone()) {
            errors.push(format!("duplicate prefix `{}`", spec.prefix));
        }
    }

    if rules.repo_prefixes.is_empty() {
        errors.push("repo prefix table must not be empty".to_string());
    }
    if rules.guideline_prefixes.is_empty() {
        errors.push("guideline prefix table must not be empty".to_string());
    }
    if rules.shared_config_file.trim().is_empty() {
        errors.push("shared config file name must not be empty".to_string());
    }
    if rules.required_readme_sections.is_empty() {
        errors.push("required README section table must not be empty".to_string());
    }

    errors
}
