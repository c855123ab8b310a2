//! Find-match walkthrough over the sample sales invoices

use bankrec_core::utils::{init_tracing, MemoryRecordSource};
use bankrec_core::{CurrencyFormatter, EngineConfig, MatchStrategy, Money, SelectionSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("🏦 Bank Reconciliation - Find Match Example\n");

    let source = MemoryRecordSource::with_sample_records();
    let config = EngineConfig::with_strategy(MatchStrategy::DynamicProgramming);
    let formatter = CurrencyFormatter::from_settings(&config.currency);

    // 1. Statement line to reconcile
    let statement_amount = Money::parse("483.00", config.currency.minor_unit_digits)?;
    println!(
        "📄 Statement line: {}",
        formatter.format(statement_amount)
    );

    let mut session = SelectionSession::load(&source, statement_amount, config).await?;
    println!("  {} candidate records fit the amount:", session.candidates().len());
    for record in session.candidates() {
        println!(
            "    {:>3}  {:<22} {:<7} {:>10}",
            record.id(),
            record.counterparty(),
            record.date(),
            formatter.format(record.amount())
        );
    }
    println!();

    // 2. Manual selection that does not fit
    let gateway = session
        .candidates()
        .iter()
        .find(|r| r.counterparty() == "Gateway Motors")
        .cloned();
    let smart = session
        .candidates()
        .iter()
        .find(|r| r.counterparty() == "SMART Agency")
        .cloned();
    if let (Some(gateway), Some(smart)) = (gateway, smart) {
        session.toggle(&gateway, true)?;
        println!(
            "  ✓ Selected {} ({} left)",
            gateway.counterparty(),
            session.formatted_remaining(&formatter)
        );
        if session.toggle(&smart, true).is_err() {
            if let Some(message) = session.error_message() {
                println!("  ✗ {}", message.replace('\n', " "));
            }
        }
        session.clear_error();
        session.clear_selection();
    }
    println!();

    // 3. Automatic match
    println!("🔎 Searching for a match...");
    match session.auto_match() {
        Ok(report) => {
            println!("  Found with {}:", report.strategy);
            for record in &report.applied {
                println!(
                    "    ✓ {} - {}",
                    record.counterparty(),
                    formatter.format(record.amount())
                );
            }
            for record in &report.rejected {
                println!("    ✗ skipped {}", record.counterparty());
            }
        }
        Err(error) => println!("  {}", error.user_message()),
    }

    println!(
        "\n💰 Remaining: {}",
        session.formatted_remaining(&formatter)
    );
    Ok(())
}
