use convlint_core::{validate_guideline_file_name, validate_repo_name, RuleSet};
use convlint_model::FindingKind;
use proptest::prelude::*;
use proptest::test_runner::Config;

fn repo_prefixes() -> Vec<String> {
    RuleSet::builtin()
        .repo_prefixes
        .iter()
        .map(|spec| spec.prefix.clone())
        .collect()
}

fn guideline_prefixes() -> Vec<String> {
    RuleSet::builtin()
        .guideline_prefixes
        .iter()
        .map(|spec| spec.prefix.clone())
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn registered_repo_prefix_with_subject_lints_clean(
        index in 0usize..5,
        subject in "[a-z0-9]{1,12}(-[a-z0-9]{1,12}){0,3}"
    ) {
        let rules = RuleSet::builtin();
        let prefixes = repo_prefixes();
        let name = format!("{}{subject}", prefixes[index]);
        let findings = validate_repo_name(&rules, &name).expect("findings");
        prop_assert!(findings.is_empty(), "{name}: {findings:?}");
    }

    #[test]
    fn registered_guideline_prefix_with_subject_lints_clean(
        index in 0usize..6,
        subject in "[a-z0-9]{1,12}(-[a-z0-9]{1,12}){0,3}"
    ) {
        let rules = RuleSet::builtin();
        let prefixes = guideline_prefixes();
        let name = format!("{}{subject}", prefixes[index]);
        let findings = validate_guideline_file_name(&rules, &name).expect("findings");
        prop_assert!(findings.is_empty(), "{name}: {findings:?}");
    }

    #[test]
    fn names_without_a_registered_prefix_report_unknown_prefix(
        name in "[a-z]{2,10}(-[a-z0-9]{1,10}){0,3}"
    ) {
        let rules = RuleSet::builtin();
        prop_assume!(!repo_prefixes().iter().any(|p| name.starts_with(p.as_str())));
        let findings = validate_repo_name(&rules, &name).expect("findings");
        prop_assert_eq!(findings.len(), 1);
        prop_assert_eq!(findings[0].kind, FindingKind::UnknownPrefix);
    }

    #[test]
    fn validation_is_idempotent(name in "[a-z-]{1,24}") {
        let rules = RuleSet::builtin();
        let first = validate_repo_name(&rules, &name);
        let second = validate_repo_name(&rules, &name);
        prop_assert_eq!(first, second);
    }
}
