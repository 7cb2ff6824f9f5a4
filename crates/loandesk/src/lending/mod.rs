//! Loan-eligibility pipeline: signal derivation, rule evaluation, decision
//! mapping, and the persisted decision-record lifecycle.

pub mod domain;
pub(crate) mod evaluation;
pub mod provider;
pub mod router;
pub mod service;
pub mod signals;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    BillingCycle, CreditCard, CustomerId, CustomerProfile, DecisionRecord, Loan, LoanDecision,
    Transaction, TransactionKind,
};
pub use evaluation::{
    decision_for, EvaluationConfig, EvaluationEngine, EvaluationOutcome, RuleKind, RuleOutcome,
};
pub use provider::{CustomerDataProvider, ProviderError};
pub use router::lending_router;
pub use service::{CustomerSummary, EvaluationServiceError, LoanDecisionService, MaskedCard};
pub use signals::{derive_signals, DerivedSignals};
pub use store::{
    DecisionPolicy, DecisionStore, InMemoryDecisionStore, JsonFileDecisionStore, StoreError,
};
