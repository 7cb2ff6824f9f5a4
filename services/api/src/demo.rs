use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use loandesk::error::AppError;
use loandesk::lending::{
    DecisionPolicy, EvaluationConfig, InMemoryDecisionStore, LoanDecisionService,
};

use crate::infra::JsonCustomerBook;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Keep only the latest decision per customer instead of the full trail
    #[arg(long)]
    pub(crate) override_policy: bool,
    /// Evaluate each sample customer this many times
    #[arg(long, default_value_t = 1)]
    pub(crate) rounds: u32,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = if args.override_policy {
        DecisionPolicy::OverrideLatest
    } else {
        DecisionPolicy::AppendOnly
    };

    let provider = Arc::new(JsonCustomerBook::sample(Utc::now().date_naive()));
    let store = Arc::new(InMemoryDecisionStore::default());
    let service = LoanDecisionService::new(
        provider.clone(),
        store,
        EvaluationConfig::default(),
        policy,
    );

    println!("Loan eligibility demo ({} persistence)", policy.label());

    for round in 0..args.rounds.max(1) {
        if args.rounds > 1 {
            println!("\n=== Round {} ===", round + 1);
        }
        for customer_id in provider.customer_ids() {
            println!("\nCustomer {}", customer_id);

            let (record, outcome, signals) = match service.evaluate_recorded(&customer_id) {
                Ok(result) => result,
                Err(err) => {
                    println!("  Evaluation unavailable: {}", err);
                    continue;
                }
            };

            match signals.monthly_income_estimate {
                Some(income) => println!("  Estimated monthly income: {:.0}", income),
                None => println!("  Estimated monthly income: unavailable"),
            }
            match signals.credit_utilization_pct {
                Some(pct) => println!("  Credit utilization: {:.1}%", pct),
                None => println!("  Credit utilization: no limit on record"),
            }
            println!(
                "  Active loans: {} / recent transactions: {}",
                signals.active_loans_count, signals.recent_tx_count
            );

            println!("  Rule breakdown:");
            for rule in &outcome.rules {
                let mark = if rule.satisfied { "PASS" } else { "FAIL" };
                println!("    [{}] {}: {}", mark, rule.rule.label(), rule.detail);
            }

            println!(
                "  Decision: {} ({}/11 rules) recorded as {}",
                record.decision.label(),
                outcome.rules_satisfied,
                record.id
            );
        }
    }

    match service.list_decisions(None, usize::MAX) {
        Ok(records) => {
            println!("\nDecision log ({} record(s), most recent first)", records.len());
            for record in records {
                println!(
                    "  {} {} {} - {}",
                    record.created_at.format("%Y-%m-%d %H:%M:%S"),
                    record.customer_id,
                    record.decision.label(),
                    record.reason
                );
            }
        }
        Err(err) => println!("\nDecision log unavailable: {}", err),
    }

    Ok(())
}
