use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{CreditCard, CustomerProfile, Loan, Transaction, TransactionKind};
use super::evaluation::EvaluationConfig;

/// Financial signals computed once per evaluation from the raw records.
///
/// The first five fields are the headline signals surfaced in customer
/// summaries; the rest are the sub-metrics individual rules consume. Optional
/// fields stay `None` when the underlying data cannot support an estimate, so
/// the corresponding rules degrade to "not evaluable" instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSignals {
    /// Largest credit-side amount in the lookback window; `None` without any
    /// credit transactions.
    pub monthly_income_estimate: Option<f64>,
    /// Total card balance over total limit, as a percentage; `None` when no
    /// card carries a limit.
    pub credit_utilization_pct: Option<f64>,
    pub active_loans_count: usize,
    pub recent_tx_count: usize,
    pub account_age_days: Option<i64>,
    /// Mean of per-calendar-month debit totals; `None` without any debits.
    pub avg_monthly_spend: Option<f64>,
    /// Distinct calendar months with at least one transaction in the window.
    pub active_months: usize,
    /// Transactions with a non-positive amount or an unrecognized type.
    pub malformed_tx_count: usize,
    /// Largest well-formed amount over the window mean; `None` when the window
    /// is too small to judge.
    pub largest_outlier_ratio: Option<f64>,
    pub billing_cycles_observed: usize,
    pub late_payment_count: usize,
}

/// Derive all signals for one customer. Pure and infallible: absent numeric
/// fields contribute zero to sums and `None` to estimates.
pub fn derive_signals(
    profile: &CustomerProfile,
    transactions: &[Transaction],
    cards: &[CreditCard],
    loans: &[Loan],
    config: &EvaluationConfig,
    today: NaiveDate,
) -> DerivedSignals {
    let window: Vec<&Transaction> = transactions
        .iter()
        .take(config.transaction_lookback)
        .collect();

    let monthly_income_estimate = window
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Credit && tx.amount > 0.0)
        .map(|tx| tx.amount)
        .fold(None, |best: Option<f64>, amount| {
            Some(best.map_or(amount, |b| b.max(amount)))
        });

    let total_limit: f64 = cards.iter().map(|card| card.credit_limit.max(0.0)).sum();
    let total_balance: f64 = cards
        .iter()
        .map(|card| card.current_balance.max(0.0))
        .sum();
    let credit_utilization_pct = if total_limit > 0.0 {
        Some(total_balance / total_limit * 100.0)
    } else {
        None
    };

    let mut monthly_spend: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut months: BTreeSet<(i32, u32)> = BTreeSet::new();
    let mut malformed_tx_count = 0;
    for tx in &window {
        months.insert((tx.date.year(), tx.date.month()));
        if tx.amount <= 0.0 || tx.kind == TransactionKind::Unknown {
            malformed_tx_count += 1;
            continue;
        }
        if tx.kind == TransactionKind::Debit {
            *monthly_spend
                .entry((tx.date.year(), tx.date.month()))
                .or_insert(0.0) += tx.amount;
        }
    }
    let avg_monthly_spend = if monthly_spend.is_empty() {
        None
    } else {
        Some(monthly_spend.values().sum::<f64>() / monthly_spend.len() as f64)
    };

    let well_formed: Vec<f64> = window
        .iter()
        .filter(|tx| tx.amount > 0.0 && tx.kind != TransactionKind::Unknown)
        .map(|tx| tx.amount)
        .collect();
    let largest_outlier_ratio = if well_formed.len() >= config.outlier_min_transactions {
        let mean = well_formed.iter().sum::<f64>() / well_formed.len() as f64;
        let largest = well_formed.iter().cloned().fold(0.0_f64, f64::max);
        if mean > 0.0 {
            Some(largest / mean)
        } else {
            None
        }
    } else {
        None
    };

    let cycles: Vec<_> = cards
        .iter()
        .flat_map(|card| card.billing_cycles.iter())
        .collect();
    let late_payment_count = cycles.iter().filter(|cycle| cycle.is_late()).count();

    DerivedSignals {
        monthly_income_estimate,
        credit_utilization_pct,
        active_loans_count: loans.iter().filter(|loan| loan.is_active()).count(),
        recent_tx_count: window.len(),
        account_age_days: profile
            .account_creation_date
            .map(|created| (today - created).num_days()),
        avg_monthly_spend,
        active_months: months.len(),
        malformed_tx_count,
        largest_outlier_ratio,
        billing_cycles_observed: cycles.len(),
        late_payment_count,
    }
}
