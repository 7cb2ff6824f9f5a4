use chrono::Duration;

use super::common::*;
use crate::lending::domain::{CreditCard, Transaction, TransactionKind};
use crate::lending::EvaluationConfig;

fn config() -> EvaluationConfig {
    EvaluationConfig::default()
}

#[test]
fn income_estimate_is_largest_credit_in_window() {
    let today = fixed_today();
    let fixture = approve_fixture("sig-income", today);

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.monthly_income_estimate, Some(55_000.0));
}

#[test]
fn income_estimate_absent_without_credit_transactions() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-no-credit", today);
    fixture
        .transactions
        .retain(|tx| tx.kind != TransactionKind::Credit);

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.monthly_income_estimate, None);
}

#[test]
fn utilization_is_balance_over_limit_in_percent() {
    let today = fixed_today();
    let fixture = approve_fixture("sig-util", today);

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.credit_utilization_pct, Some(20.0));
}

#[test]
fn utilization_absent_when_total_limit_is_zero() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-zero-limit", today);
    fixture.cards = vec![CreditCard {
        card_id: "0000".to_string(),
        credit_limit: 0.0,
        current_balance: 5_000.0,
        billing_cycles: Vec::new(),
    }];

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.credit_utilization_pct, None);
}

#[test]
fn only_outstanding_loans_count_as_active() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-loans", today);
    fixture.loans = vec![
        loan("paid-off", 0.0),
        loan("running-1", 10_000.0),
        loan("running-2", 2_500.0),
    ];

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.active_loans_count, 2);
}

#[test]
fn account_age_absent_without_creation_date() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-no-age", today);
    fixture.profile.account_creation_date = None;

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.account_age_days, None);
}

#[test]
fn account_age_counts_days_since_creation() {
    let today = fixed_today();
    let fixture = review_fixture("sig-age", today);

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.account_age_days, Some(40));
}

#[test]
fn lookback_window_drops_older_transactions() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-window", today);
    // 50 recent debits followed by an old out-of-window windfall credit.
    fixture.transactions = (0..50)
        .map(|i| Transaction {
            date: today - Duration::days(i),
            amount: 100.0,
            kind: TransactionKind::Debit,
            description: "coffee".to_string(),
        })
        .collect();
    fixture.transactions.push(Transaction {
        date: today - Duration::days(200),
        amount: 999_999.0,
        kind: TransactionKind::Credit,
        description: "inheritance".to_string(),
    });

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.recent_tx_count, 50);
    assert_eq!(signals.monthly_income_estimate, None);
}

#[test]
fn monthly_spend_averages_per_calendar_month() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-spend", today);
    fixture.transactions = vec![
        Transaction {
            date: today - Duration::days(1),
            amount: 1_000.0,
            kind: TransactionKind::Debit,
            description: "rent".to_string(),
        },
        Transaction {
            date: today - Duration::days(2),
            amount: 2_000.0,
            kind: TransactionKind::Debit,
            description: "bills".to_string(),
        },
        Transaction {
            date: today - Duration::days(40),
            amount: 3_000.0,
            kind: TransactionKind::Debit,
            description: "rent".to_string(),
        },
    ];

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.avg_monthly_spend, Some(3_000.0));
}

#[test]
fn malformed_entries_are_counted_not_fatal() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-malformed", today);
    fixture.transactions.push(Transaction {
        date: today,
        amount: 0.0,
        kind: TransactionKind::Credit,
        description: "zero amount".to_string(),
    });
    fixture.transactions.push(Transaction {
        date: today,
        amount: 50.0,
        kind: TransactionKind::Unknown,
        description: "unrecognized type".to_string(),
    });

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.malformed_tx_count, 2);
}

#[test]
fn late_cycles_are_detected() {
    let today = fixed_today();
    let mut fixture = approve_fixture("sig-late", today);
    let card = &mut fixture.cards[0];
    // One payment after the cycle closed, one underpayment, one never paid.
    card.billing_cycles[0].payment_date = Some(card.billing_cycles[0].cycle_end + Duration::days(5));
    card.billing_cycles[1].amount_paid = 100.0;
    card.billing_cycles[2].payment_date = None;

    let signals = fixture.signals(&config(), today);

    assert_eq!(signals.billing_cycles_observed, 6);
    assert_eq!(signals.late_payment_count, 3);
}
