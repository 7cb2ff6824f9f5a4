use super::super::domain::LoanDecision;
use super::rules::RuleOutcome;

/// Threshold map from satisfied-rule count to a decision.
///
/// The boundaries are a hard contract: exactly 11 approves, 8 through 10 goes
/// to review, anything below 8 rejects.
pub fn decision_for(rules_satisfied: u8) -> LoanDecision {
    match rules_satisfied {
        11 => LoanDecision::Approve,
        8..=10 => LoanDecision::Review,
        _ => LoanDecision::Reject,
    }
}

/// Human-readable rationale enumerating the failed rules, with a trailing note
/// for rules that could not be judged due to missing data.
pub(crate) fn compose_reason(rules: &[RuleOutcome]) -> String {
    let failed: Vec<&RuleOutcome> = rules.iter().filter(|rule| !rule.satisfied).collect();
    if failed.is_empty() {
        return format!("all {} eligibility rules satisfied", rules.len());
    }

    let hard_failures: Vec<&str> = failed
        .iter()
        .filter(|rule| !rule.missing_data)
        .map(|rule| rule.rule.label())
        .collect();
    let unevaluable: Vec<&str> = failed
        .iter()
        .filter(|rule| rule.missing_data)
        .map(|rule| rule.rule.label())
        .collect();

    let mut reason = format!(
        "{}/{} rules satisfied",
        rules.len() - failed.len(),
        rules.len()
    );
    if !hard_failures.is_empty() {
        reason.push_str("; failed: ");
        reason.push_str(&hard_failures.join(", "));
    }
    if !unevaluable.is_empty() {
        reason.push_str("; not evaluable due to missing data: ");
        reason.push_str(&unevaluable.join(", "));
    }
    reason
}
