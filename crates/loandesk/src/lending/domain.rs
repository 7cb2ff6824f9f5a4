use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for bank customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable customer snapshot served by the configured data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub name: String,
    /// Missing or unparsable creation dates surface as `None`; the account-age
    /// rule then reports itself as not evaluable instead of failing hard.
    #[serde(default)]
    pub account_creation_date: Option<NaiveDate>,
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
    /// Catch-all for unrecognized wire values; counted as malformed input by
    /// the transaction-hygiene rule.
    #[serde(other)]
    Unknown,
}

/// Single bank-statement entry, ordered most-recent-first by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub description: String,
}

/// One statement cycle on a credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingCycle {
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
    #[serde(default)]
    pub amount_due: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl BillingCycle {
    /// A cycle counts as late when a due amount was never paid, was paid after
    /// the cycle closed, or was underpaid.
    pub fn is_late(&self) -> bool {
        if self.amount_due <= 0.0 {
            return false;
        }
        match self.payment_date {
            None => true,
            Some(paid_on) => paid_on > self.cycle_end || self.amount_paid < self.amount_due,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub card_id: String,
    #[serde(default)]
    pub credit_limit: f64,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    pub billing_cycles: Vec<BillingCycle>,
}

impl CreditCard {
    /// Card identifier masked down to the last four characters for summaries.
    pub fn masked_id(&self) -> String {
        let chars: Vec<char> = self.card_id.chars().collect();
        if chars.len() >= 4 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("****{tail}")
        } else {
            "****".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: String,
    #[serde(default)]
    pub loan_type: String,
    #[serde(default)]
    pub principal_amount: f64,
    #[serde(default)]
    pub outstanding_amount: f64,
    #[serde(default)]
    pub monthly_due: f64,
    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.outstanding_amount > 0.0
    }
}

/// Decision labels with the exact wire spelling reviewers and auditors see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanDecision {
    Approve,
    Review,
    Reject,
}

impl LoanDecision {
    pub const fn label(self) -> &'static str {
        match self {
            LoanDecision::Approve => "APPROVE",
            LoanDecision::Review => "REVIEW",
            LoanDecision::Reject => "REJECT",
        }
    }
}

/// Persisted outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: Uuid,
    pub customer_id: CustomerId,
    pub decision: LoanDecision,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
