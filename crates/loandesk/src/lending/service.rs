use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::domain::{CreditCard, CustomerId, CustomerProfile, DecisionRecord, Loan, Transaction};
use super::evaluation::{EvaluationConfig, EvaluationEngine, EvaluationOutcome};
use super::provider::{CustomerDataProvider, ProviderError};
use super::signals::{derive_signals, DerivedSignals};
use super::store::{DecisionPolicy, DecisionStore, StoreError};

/// Service composing the customer data provider, rule engine, and decision
/// store into the evaluate/list surface exposed to transports.
pub struct LoanDecisionService<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
    engine: Arc<EvaluationEngine>,
    policy: DecisionPolicy,
}

impl<P, S> LoanDecisionService<P, S>
where
    P: CustomerDataProvider + 'static,
    S: DecisionStore + 'static,
{
    pub fn new(
        provider: Arc<P>,
        store: Arc<S>,
        config: EvaluationConfig,
        policy: DecisionPolicy,
    ) -> Self {
        Self {
            provider,
            store,
            engine: Arc::new(EvaluationEngine::new(config)),
            policy,
        }
    }

    /// Run the full pipeline for one customer and persist exactly one record.
    pub fn evaluate(
        &self,
        customer_id: &CustomerId,
    ) -> Result<DecisionRecord, EvaluationServiceError> {
        let (record, _outcome, _signals) = self.evaluate_recorded(customer_id)?;
        Ok(record)
    }

    /// Like [`evaluate`](Self::evaluate), but hands back the rule trail and
    /// signals the persisted record was derived from. One pipeline run; the
    /// stored decision and the returned breakdown can never diverge.
    pub fn evaluate_recorded(
        &self,
        customer_id: &CustomerId,
    ) -> Result<(DecisionRecord, EvaluationOutcome, DerivedSignals), EvaluationServiceError> {
        let (outcome, signals) = self.evaluate_outcome(customer_id)?;

        let record = DecisionRecord {
            id: Uuid::new_v4(),
            customer_id: customer_id.clone(),
            decision: outcome.decision,
            reason: outcome.reason.clone(),
            created_at: Utc::now(),
        };

        match self.policy {
            DecisionPolicy::AppendOnly => self.store.append(&record)?,
            DecisionPolicy::OverrideLatest => self.store.override_latest(customer_id, &record)?,
        }

        info!(
            customer_id = %record.customer_id,
            decision = record.decision.label(),
            rules_satisfied = outcome.rules_satisfied,
            policy = self.policy.label(),
            "loan decision recorded"
        );
        Ok((record, outcome, signals))
    }

    /// The evaluation pipeline without the store write, for summaries and
    /// dry runs.
    pub fn evaluate_outcome(
        &self,
        customer_id: &CustomerId,
    ) -> Result<(EvaluationOutcome, DerivedSignals), EvaluationServiceError> {
        let snapshot = self.snapshot(customer_id)?;
        let signals = snapshot.signals(self.engine.config());
        let outcome = self.engine.evaluate(customer_id, &signals);
        Ok((outcome, signals))
    }

    pub fn list_decisions(
        &self,
        customer_id: Option<&CustomerId>,
        limit: usize,
    ) -> Result<Vec<DecisionRecord>, EvaluationServiceError> {
        Ok(self.store.query(customer_id, limit)?)
    }

    /// Redacted customer view: profile, derived signals, and masked cards.
    pub fn customer_summary(
        &self,
        customer_id: &CustomerId,
    ) -> Result<CustomerSummary, EvaluationServiceError> {
        let snapshot = self.snapshot(customer_id)?;
        let signals = snapshot.signals(self.engine.config());
        let credit_cards = snapshot
            .cards
            .iter()
            .map(|card| MaskedCard {
                masked_number: card.masked_id(),
                credit_limit: card.credit_limit,
                current_balance: card.current_balance,
            })
            .collect();

        Ok(CustomerSummary {
            customer_id: snapshot.profile.customer_id,
            name: snapshot.profile.name,
            signals,
            credit_cards,
        })
    }

    fn snapshot(
        &self,
        customer_id: &CustomerId,
    ) -> Result<CustomerSnapshot, EvaluationServiceError> {
        let profile = self
            .provider
            .customer(customer_id)?
            .ok_or_else(|| EvaluationServiceError::CustomerNotFound(customer_id.clone()))?;
        let transactions = self
            .provider
            .transactions(customer_id, self.engine.config().transaction_lookback)?;
        let cards = self.provider.credit_cards(customer_id)?;
        let loans = self.provider.loans(customer_id)?;

        Ok(CustomerSnapshot {
            profile,
            transactions,
            cards,
            loans,
        })
    }
}

struct CustomerSnapshot {
    profile: CustomerProfile,
    transactions: Vec<Transaction>,
    cards: Vec<CreditCard>,
    loans: Vec<Loan>,
}

impl CustomerSnapshot {
    fn signals(&self, config: &EvaluationConfig) -> DerivedSignals {
        derive_signals(
            &self.profile,
            &self.transactions,
            &self.cards,
            &self.loans,
            config,
            Utc::now().date_naive(),
        )
    }
}

/// Card view with the number masked down to its last four characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedCard {
    pub masked_number: String,
    pub credit_limit: f64,
    pub current_balance: f64,
}

/// Sanitized representation of a customer exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub name: String,
    pub signals: DerivedSignals,
    pub credit_cards: Vec<MaskedCard>,
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
