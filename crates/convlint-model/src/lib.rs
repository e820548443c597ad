#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[must_use]
pub const fn schema_version() -> u32 {
    1
}

fn is_lower_snake(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_canonical_rule_id(raw: &str) -> bool {
    let mut parts = raw.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("rules"), Some(domain), Some(name)) => {
            matches!(domain, "repo" | "guideline" | "script")
                && !name.is_empty()
                && parts.all(|p| !p.is_empty())
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn parse(value: &str) -> Result<Self, String> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err("rule id cannot be empty".to_string());
        }
        if !is_lower_snake(raw) {
            return Err(format!(
                "invalid rule id `{raw}`: expected lowercase snake_case"
            ));
        }
        if !is_canonical_rule_id(raw) {
            return Err(format!(
                "invalid rule id `{raw}`: expected rules_<repo|guideline|script>_<name>"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainId {
    Repo,
    Guideline,
    Script,
}

impl DomainId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Guideline => "guideline",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Violation,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Violation => "violation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnknownPrefix,
    EmptySubject,
    MissingConfigReference,
    UnguardedDirectoryChange,
    MissingReadmeSection,
}

impl FindingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownPrefix => "unknown_prefix",
            Self::EmptySubject => "empty_subject",
            Self::MissingConfigReference => "missing_config_reference",
            Self::UnguardedDirectoryChange => "unguarded_directory_change",
            Self::MissingReadmeSection => "missing_readme_section",
        }
    }
}

/// One reported non-conformance: which rule failed, what kind of violation it
/// is, and a message a human can act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: RuleId,
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub status: RuleStatus,
    pub skip_reason: Option<String>,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintSummary {
    pub schema_version: u32,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub violations: u64,
    pub warnings: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    pub schema_version: u32,
    pub command: String,
    pub subject: String,
    pub outcomes: Vec<RuleOutcome>,
    pub summary: LintSummary,
}

impl LintReport {
    pub fn findings(&self) -> Vec<&Finding> {
        self.outcomes
            .iter()
            .flat_map(|outcome| outcome.findings.iter())
            .collect()
    }

    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.outcomes
            .into_iter()
            .flat_map(|outcome| outcome.findings)
            .collect()
    }
}

/// Registry entry for one convention rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: RuleId,
    pub domain: DomainId,
    pub title: String,
    pub docs: String,
    pub severity: Severity,
}

/// Declared structure of a script, as read from an outline file: which files
/// it dot-sources, whether it changes directory (and guards the restore), and
/// which sections its README declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptOutline {
    pub script: String,
    pub dot_sources: Vec<String>,
    pub changes_directory: bool,
    pub guarded_directory_change: bool,
    pub readme_sections: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScriptOutline {
    script: String,
    #[serde(default)]
    dot_sources: Vec<String>,
    #[serde(default)]
    changes_directory: bool,
    #[serde(default)]
    guarded_directory_change: bool,
    #[serde(default)]
    readme_sections: Vec<String>,
}

impl ScriptOutline {
    pub fn from_toml_str(text: &str) -> Result<Self, LintError> {
        let raw: RawScriptOutline = toml::from_str(text).map_err(|err| LintError::InvalidInput {
            detail: format!("malformed script outline: {err}"),
        })?;
        let script = raw.script.trim().to_string();
        if script.is_empty() {
            return Err(LintError::InvalidInput {
                detail: "script outline must name a script".to_string(),
            });
        }
        Ok(Self {
            script,
            dot_sources: raw.dot_sources,
            changes_directory: raw.changes_directory,
            guarded_directory_change: raw.guarded_directory_change,
            readme_sections: raw.readme_sections,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LintError {
    /// Malformed or empty input, rejected before any rule evaluation.
    InvalidInput { detail: String },
    /// A rule table defect: a registered rule without an evaluator or an
    /// unparseable table entry. Surfaced immediately, never reported as a
    /// finding.
    RuleEvaluation { rule: String, detail: String },
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { detail } => write!(f, "invalid input: {detail}"),
            Self::RuleEvaluation { rule, detail } => {
                write!(f, "rule evaluation error: {rule} ({detail})")
            }
        }
    }
}

impl std::error::Error for LintError {}

pub fn report_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "convlint report",
        "type": "object",
        "required": ["schema_version", "command", "subject", "outcomes", "summary"],
        "properties": {
            "schema_version": {"type": "integer", "minimum": 1},
            "command": {"type": "string"},
            "subject": {"type": "string"},
            "outcomes": {"type": "array"},
            "summary": {
                "type": "object",
                "required": ["passed", "failed", "skipped", "violations", "warnings", "total"],
                "additionalProperties": {"type": "integer", "minimum": 0}
            }
        }
    })
}
