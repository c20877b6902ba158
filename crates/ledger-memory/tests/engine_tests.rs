//! End-to-end runs of the analytics engine over the in-memory ledger.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use hearthfolio_core::engine::AnalyticsEngine;
use hearthfolio_core::fixed_income::{CompoundingFrequency, FixedDepositTerms};
use hearthfolio_core::health::{HealthConfig, HealthOutcome};
use hearthfolio_core::holdings::Holding;
use hearthfolio_core::instruments::{AssetClass, Instrument, MarketCapTier};
use hearthfolio_core::ledger::{Transaction, TransactionType};
use hearthfolio_core::performance::XirrOutcome;
use hearthfolio_core::rebalancing::AllocationTargets;
use hearthfolio_core::zones::{PriceZone, ZoneStatus, ZoneType};
use hearthfolio_ledger_memory::InMemoryLedger;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn trade(
    id: &str,
    instrument: &str,
    tx_type: TransactionType,
    day: NaiveDate,
    quantity: Decimal,
    unit_price: Decimal,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument.to_string(),
        transaction_type: tx_type,
        transaction_date: day,
        quantity: Some(quantity),
        unit_price: Some(unit_price),
        amount: Decimal::ZERO,
        sequence: 0,
    }
}

fn contribution(id: &str, instrument: &str, day: NaiveDate, amount: Decimal) -> Transaction {
    Transaction {
        id: id.to_string(),
        instrument_id: instrument.to_string(),
        transaction_type: TransactionType::Contribution,
        transaction_date: day,
        quantity: None,
        unit_price: None,
        amount,
        sequence: 0,
    }
}

fn sample_ledger() -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    ledger
        .upsert_instrument(
            Instrument::new("HDFCBANK", "HDFCBANK", "HDFC Bank", AssetClass::Equity)
                .with_sector("Banking")
                .with_market_cap_tier(MarketCapTier::Large)
                .with_buy_zone(PriceZone::range(dec!(1400), dec!(1500)).unwrap()),
        )
        .unwrap();
    ledger
        .upsert_instrument(
            Instrument::new("TATAMOTORS", "TATAMOTORS", "Tata Motors", AssetClass::Equity)
                .with_sector("Auto")
                .with_market_cap_tier(MarketCapTier::Mid),
        )
        .unwrap();
    ledger
        .upsert_instrument(Instrument::new("EPF", "EPF", "Provident Fund", AssetClass::Retirement))
        .unwrap();

    ledger
        .append_transaction(trade(
            "t1",
            "HDFCBANK",
            TransactionType::Buy,
            date(2024, 1, 2),
            dec!(10),
            dec!(1450),
        ))
        .unwrap();
    ledger
        .append_transaction(trade(
            "t2",
            "TATAMOTORS",
            TransactionType::Buy,
            date(2024, 2, 1),
            dec!(20),
            dec!(900),
        ))
        .unwrap();
    ledger
        .append_transaction(trade(
            "t3",
            "TATAMOTORS",
            TransactionType::Sell,
            date(2024, 6, 1),
            dec!(5),
            dec!(1000),
        ))
        .unwrap();
    ledger
        .append_transaction(contribution("t4", "EPF", date(2024, 1, 31), dec!(10000)))
        .unwrap();

    ledger.set_price("HDFCBANK", dec!(1480)).unwrap();
    ledger.set_price("TATAMOTORS", dec!(950)).unwrap();
    ledger
}

#[test]
fn holdings_across_asset_classes() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let computation = engine.compute_holdings(None).unwrap();

    assert_eq!(computation.holdings.len(), 3);
    assert!(computation.issues.is_empty());

    let tata = computation
        .holdings
        .iter()
        .find(|h| h.instrument_id() == "TATAMOTORS")
        .unwrap();
    match tata {
        Holding::Position {
            quantity,
            average_cost,
            realized_gain,
            current_value,
            ..
        } => {
            assert_eq!(*quantity, dec!(15));
            assert_eq!(*average_cost, dec!(900));
            assert_eq!(*realized_gain, dec!(500));
            assert_eq!(*current_value, Some(dec!(14250)));
        }
        other => panic!("expected a position, got {other:?}"),
    }

    let epf = computation
        .holdings
        .iter()
        .find(|h| h.instrument_id() == "EPF")
        .unwrap();
    assert_eq!(epf.invested_amount(), dec!(10000));
}

#[test]
fn same_day_transactions_replay_in_insertion_order() {
    let ledger = InMemoryLedger::new();
    ledger
        .upsert_instrument(
            Instrument::new("X", "X", "X Ltd", AssetClass::Equity)
                .with_market_cap_tier(MarketCapTier::Large),
        )
        .unwrap();
    // Sell covered only if the buy replays first.
    ledger
        .append_transaction(trade("t1", "X", TransactionType::Buy, date(2024, 3, 1), dec!(5), dec!(10)))
        .unwrap();
    ledger
        .append_transaction(trade("t2", "X", TransactionType::Sell, date(2024, 3, 1), dec!(5), dec!(12)))
        .unwrap();

    let engine = AnalyticsEngine::new(Arc::new(ledger));
    let computation = engine.compute_holdings(None).unwrap();
    assert!(computation.issues.is_empty());
    assert!(computation.holdings.is_empty());
    assert_eq!(computation.realized_gain("X"), Some(dec!(10)));
}

#[test]
fn unified_xirr_is_a_definite_outcome() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    match engine.compute_xirr(None).unwrap() {
        XirrOutcome::Rate { .. } => {}
        other => panic!("expected a rate, got {other:?}"),
    }
}

#[test]
fn per_class_xirr_covers_every_class() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let by_class = engine.compute_xirr_by_class().unwrap();
    assert!(by_class.contains_key(&AssetClass::Equity));
    assert!(by_class.contains_key(&AssetClass::Retirement));
}

#[test]
fn health_reports_concentration_over_two_stocks() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let outcome = engine
        .compute_concentration_and_diversification(
            &HealthConfig::default(),
            &AllocationTargets::default(),
        )
        .unwrap();
    match outcome {
        HealthOutcome::Report(report) => {
            assert_eq!(report.concentration.top3_pct, dec!(100.00));
            assert_eq!(report.diversification.instrument_count, 2);
        }
        HealthOutcome::NoData => panic!("expected a report"),
    }
}

#[test]
fn rebalancing_flags_two_large_positions() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let report = engine
        .compute_rebalancing(&AllocationTargets::default())
        .unwrap();
    // Both stocks tower over their per-stock targets.
    assert_eq!(report.reduce.len(), 2);
    assert!(report.add.is_empty());
}

#[test]
fn price_zone_alerts_for_quoted_instruments() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let alerts = engine.evaluate_price_zones().unwrap();

    let hdfc = &alerts["HDFCBANK"];
    assert_eq!(hdfc.len(), 1);
    assert_eq!(hdfc[0].zone_type, ZoneType::Buy);
    assert_eq!(hdfc[0].status, ZoneStatus::InZone);
    // No zones configured for the others.
    assert!(!alerts.contains_key("TATAMOTORS"));
}

#[test]
fn fd_maturity_through_the_facade() {
    let engine = AnalyticsEngine::new(Arc::new(InMemoryLedger::new()));
    let projection = engine
        .compute_fd_maturity(&FixedDepositTerms {
            principal: dec!(100000),
            annual_rate_pct: dec!(7),
            start_date: date(2024, 1, 1),
            maturity_date: date(2024, 12, 31),
            frequency: CompoundingFrequency::Quarterly,
        })
        .unwrap();
    assert!((projection.maturity_amount - dec!(107185.90)).abs() <= dec!(0.01));
}

#[test]
fn repeated_runs_return_identical_holdings() {
    let engine = AnalyticsEngine::new(Arc::new(sample_ledger()));
    let first = engine.compute_holdings(None).unwrap();
    let second = engine.compute_holdings(None).unwrap();
    assert_eq!(first.holdings, second.holdings);
    assert_eq!(first.realized, second.realized);
}
