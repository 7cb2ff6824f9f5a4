use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use loandesk::lending::{
    BillingCycle, CreditCard, CustomerDataProvider, CustomerId, CustomerProfile, Loan,
    ProviderError, Transaction, TransactionKind,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// On-disk seed shape: a single document listing customers with their nested
/// ledgers, cards, and loans.
#[derive(Debug, Deserialize)]
struct CustomerBookFile {
    #[serde(default)]
    customers: Vec<CustomerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct CustomerEntry {
    #[serde(flatten)]
    profile: CustomerProfile,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    credit_cards: Vec<CreditCard>,
    #[serde(default)]
    loans: Vec<Loan>,
}

/// Read-only customer data provider backed by a JSON seed document.
pub(crate) struct JsonCustomerBook {
    customers: HashMap<CustomerId, CustomerEntry>,
}

impl JsonCustomerBook {
    pub(crate) fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let raw = fs::read(path)?;
        let book: CustomerBookFile = serde_json::from_slice(&raw)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        Ok(Self::from_book(book))
    }

    pub(crate) fn sample(today: NaiveDate) -> Self {
        Self::from_book(sample_book(today))
    }

    fn from_book(book: CustomerBookFile) -> Self {
        let mut customers = HashMap::new();
        for mut entry in book.customers {
            // Providers hand out ledgers most-recent-first.
            entry.transactions.sort_by(|a, b| b.date.cmp(&a.date));
            customers.insert(entry.profile.customer_id.clone(), entry);
        }
        Self { customers }
    }

    /// Stable iteration order for the demo output.
    pub(crate) fn customer_ids(&self) -> Vec<CustomerId> {
        let mut ids: Vec<CustomerId> = self.customers.keys().cloned().collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        ids
    }
}

impl CustomerDataProvider for JsonCustomerBook {
    fn customer(&self, customer_id: &CustomerId) -> Result<Option<CustomerProfile>, ProviderError> {
        Ok(self
            .customers
            .get(customer_id)
            .map(|entry| entry.profile.clone()))
    }

    fn transactions(
        &self,
        customer_id: &CustomerId,
        limit: usize,
    ) -> Result<Vec<Transaction>, ProviderError> {
        Ok(self
            .customers
            .get(customer_id)
            .map(|entry| entry.transactions.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn credit_cards(&self, customer_id: &CustomerId) -> Result<Vec<CreditCard>, ProviderError> {
        Ok(self
            .customers
            .get(customer_id)
            .map(|entry| entry.credit_cards.clone())
            .unwrap_or_default())
    }

    fn loans(&self, customer_id: &CustomerId) -> Result<Vec<Loan>, ProviderError> {
        Ok(self
            .customers
            .get(customer_id)
            .map(|entry| entry.loans.clone())
            .unwrap_or_default())
    }
}

fn monthly_ledger(
    today: NaiveDate,
    months: i64,
    salary: f64,
    rent: f64,
    groceries: f64,
) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for month in 0..months {
        let anchor = today - Duration::days(30 * month + 1);
        transactions.push(Transaction {
            date: anchor,
            amount: salary,
            kind: TransactionKind::Credit,
            description: "salary credit".to_string(),
        });
        transactions.push(Transaction {
            date: anchor - Duration::days(1),
            amount: rent,
            kind: TransactionKind::Debit,
            description: "rent".to_string(),
        });
        transactions.push(Transaction {
            date: anchor - Duration::days(2),
            amount: groceries,
            kind: TransactionKind::Debit,
            description: "groceries".to_string(),
        });
    }
    transactions
}

fn on_time_cycles(today: NaiveDate, count: i64, due: f64) -> Vec<BillingCycle> {
    (0..count)
        .map(|cycle| {
            let cycle_end = today - Duration::days(30 * cycle + 3);
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

/// Built-in sample book used when no seed file is configured. One clean
/// profile, one young account, and one thin file with no credit history.
fn sample_book(today: NaiveDate) -> CustomerBookFile {
    let strong = CustomerEntry {
        profile: CustomerProfile {
            customer_id: CustomerId("cust-1001".to_string()),
            name: "Asha Verma".to_string(),
            account_creation_date: Some(today - Duration::days(730)),
        },
        transactions: monthly_ledger(today, 12, 62_000.0, 9_500.0, 5_500.0),
        credit_cards: vec![CreditCard {
            card_id: "5240001122339876".to_string(),
            credit_limit: 150_000.0,
            current_balance: 30_000.0,
            billing_cycles: on_time_cycles(today, 6, 6_200.0),
        }],
        loans: vec![Loan {
            loan_id: "loan-7001".to_string(),
            loan_type: "auto".to_string(),
            principal_amount: 300_000.0,
            outstanding_amount: 180_000.0,
            monthly_due: 8_400.0,
            last_payment_date: Some(today - Duration::days(12)),
        }],
    };

    let young = CustomerEntry {
        profile: CustomerProfile {
            customer_id: CustomerId("cust-1002".to_string()),
            name: "Rohan Mehta".to_string(),
            account_creation_date: Some(today - Duration::days(45)),
        },
        transactions: monthly_ledger(today, 4, 58_000.0, 9_000.0, 6_000.0),
        credit_cards: vec![CreditCard {
            card_id: "4111556677882451".to_string(),
            credit_limit: 80_000.0,
            current_balance: 12_000.0,
            billing_cycles: on_time_cycles(today, 4, 3_100.0),
        }],
        loans: vec![Loan {
            loan_id: "loan-7002".to_string(),
            loan_type: "personal".to_string(),
            principal_amount: 60_000.0,
            outstanding_amount: 25_000.0,
            monthly_due: 2_500.0,
            last_payment_date: Some(today - Duration::days(20)),
        }],
    };

    let thin = CustomerEntry {
        profile: CustomerProfile {
            customer_id: CustomerId("cust-1003".to_string()),
            name: "Kavya Nair".to_string(),
            account_creation_date: Some(today - Duration::days(400)),
        },
        transactions: monthly_ledger(today, 4, 18_000.0, 9_000.0, 8_500.0),
        credit_cards: Vec::new(),
        loans: Vec::new(),
    };

    CustomerBookFile {
        customers: vec![strong, young, thin],
    }
}
