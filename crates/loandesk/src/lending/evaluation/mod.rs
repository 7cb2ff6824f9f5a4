mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;
pub use policy::decision_for;
pub use rules::{RuleKind, RuleOutcome};

use serde::{Deserialize, Serialize};

use super::domain::{CustomerId, LoanDecision};
use super::signals::DerivedSignals;

/// Stateless evaluator applying the fixed rule set to derived signals.
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, customer_id: &CustomerId, signals: &DerivedSignals) -> EvaluationOutcome {
        let rules = rules::evaluate_rules(signals, &self.config);
        let rules_satisfied = rules.iter().filter(|rule| rule.satisfied).count() as u8;
        let decision = policy::decision_for(rules_satisfied);
        let reason = policy::compose_reason(&rules);

        EvaluationOutcome {
            customer_id: customer_id.clone(),
            decision,
            rules_satisfied,
            reason,
            rules,
        }
    }
}

/// Evaluation output describing the decision and its per-rule trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub customer_id: CustomerId,
    pub decision: LoanDecision,
    pub rules_satisfied: u8,
    pub reason: String,
    pub rules: Vec<RuleOutcome>,
}
