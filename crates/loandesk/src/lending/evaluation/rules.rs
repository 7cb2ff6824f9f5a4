use serde::{Deserialize, Serialize};

use super::super::signals::DerivedSignals;
use super::config::EvaluationConfig;

/// The eleven fixed eligibility checks, in policy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    IncomeFloor,
    AccountAge,
    PaymentHistory,
    TransactionHygiene,
    CreditUtilization,
    ActiveLoans,
    SpendMargin,
    ActivityConsistency,
    OutlierScreen,
    LiquidityBuffer,
    CreditHistoryDepth,
}

impl RuleKind {
    pub const ALL: [RuleKind; 11] = [
        RuleKind::IncomeFloor,
        RuleKind::AccountAge,
        RuleKind::PaymentHistory,
        RuleKind::TransactionHygiene,
        RuleKind::CreditUtilization,
        RuleKind::ActiveLoans,
        RuleKind::SpendMargin,
        RuleKind::ActivityConsistency,
        RuleKind::OutlierScreen,
        RuleKind::LiquidityBuffer,
        RuleKind::CreditHistoryDepth,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RuleKind::IncomeFloor => "income floor",
            RuleKind::AccountAge => "account age",
            RuleKind::PaymentHistory => "payment history",
            RuleKind::TransactionHygiene => "transaction hygiene",
            RuleKind::CreditUtilization => "credit utilization",
            RuleKind::ActiveLoans => "active loans",
            RuleKind::SpendMargin => "income-spend margin",
            RuleKind::ActivityConsistency => "transaction activity",
            RuleKind::OutlierScreen => "outlier screen",
            RuleKind::LiquidityBuffer => "liquidity buffer",
            RuleKind::CreditHistoryDepth => "credit history depth",
        }
    }
}

/// Pass/fail detail for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleKind,
    pub satisfied: bool,
    /// True when the rule could not be judged because its inputs were absent.
    /// Such rules count as unsatisfied.
    pub missing_data: bool,
    pub detail: String,
}

impl RuleOutcome {
    fn pass(rule: RuleKind, detail: String) -> Self {
        Self {
            rule,
            satisfied: true,
            missing_data: false,
            detail,
        }
    }

    fn fail(rule: RuleKind, detail: String) -> Self {
        Self {
            rule,
            satisfied: false,
            missing_data: false,
            detail,
        }
    }

    fn unevaluable(rule: RuleKind, detail: String) -> Self {
        Self {
            rule,
            satisfied: false,
            missing_data: true,
            detail,
        }
    }
}

pub(crate) fn evaluate_rules(
    signals: &DerivedSignals,
    config: &EvaluationConfig,
) -> Vec<RuleOutcome> {
    let mut outcomes = Vec::with_capacity(RuleKind::ALL.len());

    outcomes.push(match signals.monthly_income_estimate {
        Some(income) if income >= config.minimum_monthly_income => RuleOutcome::pass(
            RuleKind::IncomeFloor,
            format!(
                "income estimate {income:.0} meets floor {:.0}",
                config.minimum_monthly_income
            ),
        ),
        Some(income) => RuleOutcome::fail(
            RuleKind::IncomeFloor,
            format!(
                "income estimate {income:.0} below floor {:.0}",
                config.minimum_monthly_income
            ),
        ),
        None => RuleOutcome::unevaluable(
            RuleKind::IncomeFloor,
            "no credit transactions to estimate income".to_string(),
        ),
    });

    outcomes.push(match signals.account_age_days {
        Some(days) if days >= config.minimum_account_age_days => RuleOutcome::pass(
            RuleKind::AccountAge,
            format!("account is {days} days old"),
        ),
        Some(days) => RuleOutcome::fail(
            RuleKind::AccountAge,
            format!(
                "account is {days} days old, below required {}",
                config.minimum_account_age_days
            ),
        ),
        None => RuleOutcome::unevaluable(
            RuleKind::AccountAge,
            "account creation date missing".to_string(),
        ),
    });

    outcomes.push(if signals.billing_cycles_observed == 0 {
        RuleOutcome::unevaluable(
            RuleKind::PaymentHistory,
            "no billing cycles on record".to_string(),
        )
    } else if signals.late_payment_count <= config.max_late_payments {
        RuleOutcome::pass(
            RuleKind::PaymentHistory,
            format!(
                "{} late payment(s) within allowance {}",
                signals.late_payment_count, config.max_late_payments
            ),
        )
    } else {
        RuleOutcome::fail(
            RuleKind::PaymentHistory,
            format!(
                "{} late payment(s) exceeds allowance {}",
                signals.late_payment_count, config.max_late_payments
            ),
        )
    });

    outcomes.push(if signals.recent_tx_count == 0 {
        RuleOutcome::unevaluable(
            RuleKind::TransactionHygiene,
            "no recent transactions to inspect".to_string(),
        )
    } else if signals.malformed_tx_count == 0 {
        RuleOutcome::pass(
            RuleKind::TransactionHygiene,
            "no malformed transactions in window".to_string(),
        )
    } else {
        RuleOutcome::fail(
            RuleKind::TransactionHygiene,
            format!(
                "{} malformed transaction(s) in window",
                signals.malformed_tx_count
            ),
        )
    });

    outcomes.push(match signals.credit_utilization_pct {
        Some(pct) if pct < config.max_credit_utilization_pct => RuleOutcome::pass(
            RuleKind::CreditUtilization,
            format!(
                "utilization {pct:.1}% under {:.0}%",
                config.max_credit_utilization_pct
            ),
        ),
        Some(pct) => RuleOutcome::fail(
            RuleKind::CreditUtilization,
            format!(
                "utilization {pct:.1}% at or above {:.0}%",
                config.max_credit_utilization_pct
            ),
        ),
        None => RuleOutcome::unevaluable(
            RuleKind::CreditUtilization,
            "no credit limit on record".to_string(),
        ),
    });

    outcomes.push(if signals.active_loans_count <= config.max_active_loans {
        RuleOutcome::pass(
            RuleKind::ActiveLoans,
            format!(
                "{} active loan(s) within allowance {}",
                signals.active_loans_count, config.max_active_loans
            ),
        )
    } else {
        RuleOutcome::fail(
            RuleKind::ActiveLoans,
            format!(
                "{} active loan(s) exceeds allowance {}",
                signals.active_loans_count, config.max_active_loans
            ),
        )
    });

    outcomes.push(
        match (signals.monthly_income_estimate, signals.avg_monthly_spend) {
            (Some(income), Some(spend)) if income > spend => RuleOutcome::pass(
                RuleKind::SpendMargin,
                format!("income {income:.0} clears monthly spend {spend:.0}"),
            ),
            (Some(income), Some(spend)) => RuleOutcome::fail(
                RuleKind::SpendMargin,
                format!("monthly spend {spend:.0} absorbs income {income:.0}"),
            ),
            _ => RuleOutcome::unevaluable(
                RuleKind::SpendMargin,
                "income or spend estimate unavailable".to_string(),
            ),
        },
    );

    outcomes.push(
        if signals.recent_tx_count >= config.min_recent_transactions
            && signals.active_months >= config.min_active_months
        {
            RuleOutcome::pass(
                RuleKind::ActivityConsistency,
                format!(
                    "{} transactions across {} month(s)",
                    signals.recent_tx_count, signals.active_months
                ),
            )
        } else {
            RuleOutcome::fail(
                RuleKind::ActivityConsistency,
                format!(
                    "{} transactions across {} month(s) below expected activity",
                    signals.recent_tx_count, signals.active_months
                ),
            )
        },
    );

    outcomes.push(match signals.largest_outlier_ratio {
        Some(ratio) if ratio <= config.outlier_multiplier => RuleOutcome::pass(
            RuleKind::OutlierScreen,
            format!("largest transaction {ratio:.1}x the window mean"),
        ),
        Some(ratio) => RuleOutcome::fail(
            RuleKind::OutlierScreen,
            format!(
                "largest transaction {ratio:.1}x the window mean exceeds {:.0}x",
                config.outlier_multiplier
            ),
        ),
        None => RuleOutcome::unevaluable(
            RuleKind::OutlierScreen,
            "too few transactions to screen outliers".to_string(),
        ),
    });

    outcomes.push(
        match (signals.monthly_income_estimate, signals.avg_monthly_spend) {
            (Some(income), Some(spend)) if income >= config.liquidity_buffer_ratio * spend => {
                RuleOutcome::pass(
                    RuleKind::LiquidityBuffer,
                    format!(
                        "income covers {:.2}x monthly spend",
                        config.liquidity_buffer_ratio
                    ),
                )
            }
            (Some(_), Some(_)) => RuleOutcome::fail(
                RuleKind::LiquidityBuffer,
                format!(
                    "buffer below {:.2}x monthly spend",
                    config.liquidity_buffer_ratio
                ),
            ),
            _ => RuleOutcome::unevaluable(
                RuleKind::LiquidityBuffer,
                "income or spend estimate unavailable".to_string(),
            ),
        },
    );

    outcomes.push(if signals.billing_cycles_observed == 0 {
        RuleOutcome::unevaluable(
            RuleKind::CreditHistoryDepth,
            "no billing history on record".to_string(),
        )
    } else if signals.billing_cycles_observed < config.min_billing_cycles {
        RuleOutcome::fail(
            RuleKind::CreditHistoryDepth,
            format!(
                "only {} billing cycle(s) on record, need {}",
                signals.billing_cycles_observed, config.min_billing_cycles
            ),
        )
    } else {
        let on_time = signals.billing_cycles_observed - signals.late_payment_count;
        let on_time_ratio = on_time as f64 / signals.billing_cycles_observed as f64;
        if on_time_ratio >= config.min_on_time_ratio {
            RuleOutcome::pass(
                RuleKind::CreditHistoryDepth,
                format!(
                    "{} cycles with {:.0}% paid on time",
                    signals.billing_cycles_observed,
                    on_time_ratio * 100.0
                ),
            )
        } else {
            RuleOutcome::fail(
                RuleKind::CreditHistoryDepth,
                format!(
                    "only {:.0}% of {} cycles paid on time",
                    on_time_ratio * 100.0,
                    signals.billing_cycles_observed
                ),
            )
        }
    });

    outcomes
}
