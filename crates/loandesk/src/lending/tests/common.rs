use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::lending::domain::{
    BillingCycle, CreditCard, CustomerId, CustomerProfile, DecisionRecord, Loan, LoanDecision,
    Transaction, TransactionKind,
};
use crate::lending::provider::{CustomerDataProvider, ProviderError};
use crate::lending::signals::{derive_signals, DerivedSignals};
use crate::lending::store::{
    DecisionPolicy, DecisionStore, InMemoryDecisionStore, StoreError,
};
use crate::lending::{EvaluationConfig, LoanDecisionService};

pub(super) fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 26).expect("valid date")
}

pub(super) fn customer_id(raw: &str) -> CustomerId {
    CustomerId(raw.to_string())
}

pub(super) fn profile(id: &str, account_age_days: Option<i64>, today: NaiveDate) -> CustomerProfile {
    CustomerProfile {
        customer_id: customer_id(id),
        name: format!("Customer {id}"),
        account_creation_date: account_age_days.map(|days| today - Duration::days(days)),
    }
}

/// Statement entries most recent first: one salary credit and two debits per
/// simulated month.
pub(super) fn salary_ledger(
    today: NaiveDate,
    months: usize,
    salary: f64,
    rent: f64,
    groceries: f64,
) -> Vec<Transaction> {
    let mut entries = Vec::new();
    for m in 0..months {
        let anchor = today - Duration::days(30 * m as i64 + 1);
        entries.push(Transaction {
            date: anchor,
            amount: salary,
            kind: TransactionKind::Credit,
            description: "salary".to_string(),
        });
        entries.push(Transaction {
            date: anchor - Duration::days(1),
            amount: rent,
            kind: TransactionKind::Debit,
            description: "rent".to_string(),
        });
        entries.push(Transaction {
            date: anchor - Duration::days(2),
            amount: groceries,
            kind: TransactionKind::Debit,
            description: "groceries".to_string(),
        });
    }
    entries
}

pub(super) fn on_time_cycles(today: NaiveDate, count: usize, due: f64) -> Vec<BillingCycle> {
    (0..count)
        .map(|m| {
            let cycle_end = today - Duration::days(30 * m as i64 + 3);
            BillingCycle {
                cycle_start: cycle_end - Duration::days(29),
                cycle_end,
                amount_due: due,
                amount_paid: due,
                payment_date: Some(cycle_end - Duration::days(2)),
            }
        })
        .collect()
}

pub(super) fn healthy_card(today: NaiveDate) -> CreditCard {
    CreditCard {
        card_id: "4111222233334444".to_string(),
        credit_limit: 100_000.0,
        current_balance: 20_000.0,
        billing_cycles: on_time_cycles(today, 6, 4_500.0),
    }
}

pub(super) fn loan(id: &str, outstanding: f64) -> Loan {
    Loan {
        loan_id: id.to_string(),
        loan_type: "personal".to_string(),
        principal_amount: 200_000.0,
        outstanding_amount: outstanding,
        monthly_due: 5_000.0,
        last_payment_date: None,
    }
}

pub(super) struct CustomerFixture {
    pub(super) profile: CustomerProfile,
    pub(super) transactions: Vec<Transaction>,
    pub(super) cards: Vec<CreditCard>,
    pub(super) loans: Vec<Loan>,
}

impl CustomerFixture {
    pub(super) fn signals(&self, config: &EvaluationConfig, today: NaiveDate) -> DerivedSignals {
        derive_signals(
            &self.profile,
            &self.transactions,
            &self.cards,
            &self.loans,
            config,
            today,
        )
    }
}

/// Customer whose records satisfy all eleven rules.
pub(super) fn approve_fixture(id: &str, today: NaiveDate) -> CustomerFixture {
    CustomerFixture {
        profile: profile(id, Some(730), today),
        transactions: salary_ledger(today, 12, 55_000.0, 8_000.0, 6_000.0),
        cards: vec![healthy_card(today)],
        loans: vec![loan("loan-001", 120_000.0)],
    }
}

/// Same book as [`approve_fixture`] but on a 40-day-old account, so only the
/// account-age rule fails.
pub(super) fn review_fixture(id: &str, today: NaiveDate) -> CustomerFixture {
    let mut fixture = approve_fixture(id, today);
    fixture.profile.account_creation_date = Some(today - Duration::days(40));
    fixture
}

/// Customer satisfying exactly five rules: account age, transaction hygiene,
/// active loans, activity consistency, and the outlier screen. Income is below
/// the floor, monthly spend exceeds income, and there is no card history.
pub(super) fn reject_fixture(id: &str, today: NaiveDate) -> CustomerFixture {
    CustomerFixture {
        profile: profile(id, Some(400), today),
        transactions: salary_ledger(today, 4, 15_000.0, 9_000.0, 9_000.0),
        cards: Vec::new(),
        loans: Vec::new(),
    }
}

#[derive(Default)]
pub(super) struct MemoryProvider {
    customers: HashMap<CustomerId, CustomerFixture>,
}

impl MemoryProvider {
    pub(super) fn with_fixtures(fixtures: Vec<CustomerFixture>) -> Self {
        let mut customers = HashMap::new();
        for fixture in fixtures {
            customers.insert(fixture.profile.customer_id.clone(), fixture);
        }
        Self { customers }
    }
}

impl CustomerDataProvider for MemoryProvider {
    fn customer(&self, id: &CustomerId) -> Result<Option<CustomerProfile>, ProviderError> {
        Ok(self.customers.get(id).map(|fixture| fixture.profile.clone()))
    }

    fn transactions(
        &self,
        id: &CustomerId,
        limit: usize,
    ) -> Result<Vec<Transaction>, ProviderError> {
        Ok(self
            .customers
            .get(id)
            .map(|fixture| fixture.transactions.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn credit_cards(&self, id: &CustomerId) -> Result<Vec<CreditCard>, ProviderError> {
        Ok(self
            .customers
            .get(id)
            .map(|fixture| fixture.cards.clone())
            .unwrap_or_default())
    }

    fn loans(&self, id: &CustomerId) -> Result<Vec<Loan>, ProviderError> {
        Ok(self
            .customers
            .get(id)
            .map(|fixture| fixture.loans.clone())
            .unwrap_or_default())
    }
}

/// Store whose writes always fail, for error-propagation tests.
pub(super) struct FailingStore;

impl DecisionStore for FailingStore {
    fn append(&self, _record: &DecisionRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn override_latest(
        &self,
        _customer_id: &CustomerId,
        _record: &DecisionRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn query(
        &self,
        _customer_id: Option<&CustomerId>,
        _limit: usize,
    ) -> Result<Vec<DecisionRecord>, StoreError> {
        Ok(Vec::new())
    }
}

pub(super) fn build_service(
    provider: MemoryProvider,
    policy: DecisionPolicy,
) -> (
    LoanDecisionService<MemoryProvider, InMemoryDecisionStore>,
    Arc<InMemoryDecisionStore>,
) {
    let store = Arc::new(InMemoryDecisionStore::default());
    let service = LoanDecisionService::new(
        Arc::new(provider),
        store.clone(),
        EvaluationConfig::default(),
        policy,
    );
    (service, store)
}

pub(super) fn decision_record(
    customer: &str,
    decision: LoanDecision,
    created_at: DateTime<Utc>,
) -> DecisionRecord {
    DecisionRecord {
        id: Uuid::new_v4(),
        customer_id: customer_id(customer),
        decision,
        reason: "fixture".to_string(),
        created_at,
    }
}
