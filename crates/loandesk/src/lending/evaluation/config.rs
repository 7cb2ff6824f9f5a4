use serde::{Deserialize, Serialize};

/// Thresholds backing the fixed eligibility rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub minimum_monthly_income: f64,
    pub minimum_account_age_days: i64,
    pub max_late_payments: usize,
    pub max_credit_utilization_pct: f64,
    pub max_active_loans: usize,
    /// How many of the most recent transactions feed signal derivation.
    pub transaction_lookback: usize,
    pub min_recent_transactions: usize,
    pub min_active_months: usize,
    /// A transaction is an outlier when it exceeds this multiple of the
    /// window mean.
    pub outlier_multiplier: f64,
    /// Below this many well-formed transactions the outlier screen reports
    /// itself as not evaluable.
    pub outlier_min_transactions: usize,
    /// Income must cover this multiple of average monthly spend to count as a
    /// liquidity buffer.
    pub liquidity_buffer_ratio: f64,
    pub min_billing_cycles: usize,
    pub min_on_time_ratio: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            minimum_monthly_income: 20_000.0,
            minimum_account_age_days: 180,
            max_late_payments: 2,
            max_credit_utilization_pct: 70.0,
            max_active_loans: 1,
            transaction_lookback: 50,
            min_recent_transactions: 10,
            min_active_months: 3,
            outlier_multiplier: 10.0,
            outlier_min_transactions: 5,
            liquidity_buffer_ratio: 1.25,
            min_billing_cycles: 3,
            min_on_time_ratio: 0.75,
        }
    }
}
