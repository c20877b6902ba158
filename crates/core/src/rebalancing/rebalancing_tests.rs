use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::instruments::{AssetClass, Instrument, MarketCapTier};
use crate::test_fixtures::{buy, date, MockLedger};
use crate::zones::PriceZone;

use super::rebalancing_model::{
    AllocationTargets, GroupStatus, PortfolioRebalanceStatus, StockAllocationStatus,
};
use super::rebalancing_service::{
    classify_stock_allocation, RebalancingService, RebalancingServiceTrait,
};

fn stock(id: &str, tier: Option<MarketCapTier>, sector: &str) -> Instrument {
    let mut instrument =
        Instrument::new(id, id, format!("{id} Ltd"), AssetClass::Equity).with_sector(sector);
    if let Some(tier) = tier {
        instrument = instrument.with_market_cap_tier(tier);
    }
    instrument
}

/// Buys `invested / 100` units at 100 so the invested amount lands exactly.
fn invest(ledger: MockLedger, id: &str, invested: Decimal, sequence: i64) -> MockLedger {
    ledger.with_transaction(buy(
        &format!("t{sequence}"),
        id,
        date(2024, 1, 10),
        invested / dec!(100),
        dec!(100),
        sequence,
    ))
}

fn report_of(ledger: MockLedger) -> super::rebalancing_model::RebalancingReport {
    RebalancingService::new(Arc::new(ledger))
        .compute_rebalancing(&AllocationTargets::default())
        .unwrap()
}

#[test]
fn test_classify_stock_allocation_bands() {
    let targets = AllocationTargets::default();
    assert_eq!(
        classify_stock_allocation(dec!(6), Some(MarketCapTier::Large), &targets),
        StockAllocationStatus::OverAllocated
    );
    assert_eq!(
        classify_stock_allocation(dec!(5.5), Some(MarketCapTier::Large), &targets),
        StockAllocationStatus::Balanced
    );
    assert_eq!(
        classify_stock_allocation(dec!(5), Some(MarketCapTier::Large), &targets),
        StockAllocationStatus::Balanced
    );
    assert_eq!(
        classify_stock_allocation(dec!(4.9), Some(MarketCapTier::Large), &targets),
        StockAllocationStatus::UnderAllocated
    );
    assert_eq!(
        classify_stock_allocation(dec!(2.4), Some(MarketCapTier::Micro), &targets),
        StockAllocationStatus::Balanced
    );
    // No tier means no threshold to judge against.
    assert_eq!(
        classify_stock_allocation(dec!(60), None, &targets),
        StockAllocationStatus::Balanced
    );
}

#[test]
fn test_at_target_portfolio_is_balanced_with_empty_lists() {
    let ledger = MockLedger::new()
        .with_instrument(stock("LRG", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("FUND", None, "Other"));
    let ledger = invest(ledger, "LRG", dec!(525), 1);
    let ledger = invest(ledger, "FUND", dec!(9475), 2);

    let report = report_of(ledger);
    assert_eq!(report.status, PortfolioRebalanceStatus::Balanced);
    assert!(report.reduce.is_empty());
    assert!(report.add.is_empty());
}

#[test]
fn test_thresholds_apply_to_unrounded_share() {
    // 5504 of 100000 is 5.504%, which rounds to the 5.50% green max for a
    // large cap but still sits above it. The position must be flagged.
    let ledger = MockLedger::new()
        .with_instrument(stock("EDGE", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("REST", None, "Other"));
    let ledger = invest(ledger, "EDGE", dec!(5504), 1);
    let ledger = invest(ledger, "REST", dec!(94496), 2);

    let report = report_of(ledger);
    assert_eq!(report.status, PortfolioRebalanceStatus::ActionSuggested);
    assert_eq!(report.reduce.len(), 1);
    let item = &report.reduce[0];
    assert_eq!(item.instrument_id, "EDGE");
    assert_eq!(item.current_pct, dec!(5.50));
    assert_eq!(item.reduce_amount, dec!(4.00));
}

#[test]
fn test_empty_portfolio_is_explicitly_balanced() {
    let report = report_of(MockLedger::new());
    assert_eq!(report.status, PortfolioRebalanceStatus::Balanced);
    assert!(report.tier_recommendations.is_empty());
}

#[test]
fn test_overweight_stock_lands_in_reduce_list() {
    let ledger = MockLedger::new()
        .with_instrument(stock("BIG", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("REST", None, "Other"));
    let ledger = invest(ledger, "BIG", dec!(3000), 1);
    let ledger = invest(ledger, "REST", dec!(7000), 2);

    let report = report_of(ledger);
    assert_eq!(report.status, PortfolioRebalanceStatus::ActionSuggested);
    assert_eq!(report.reduce.len(), 1);
    let item = &report.reduce[0];
    assert_eq!(item.current_pct, dec!(30.00));
    assert_eq!(item.target_pct, dec!(5.5));
    assert_eq!(item.excess_pct, dec!(24.50));
    assert_eq!(item.reduce_amount, dec!(2450.00));
    assert!(item.reason.contains("over-allocated"));
}

#[test]
fn test_add_list_sorted_by_shortfall_with_buy_zone_flag() {
    let ledger = MockLedger::new()
        .with_instrument(
            stock("LRG", Some(MarketCapTier::Large), "Banking")
                .with_buy_zone(PriceZone::range(dec!(90), dec!(110)).unwrap()),
        )
        .with_instrument(stock("MID", Some(MarketCapTier::Mid), "Auto"))
        .with_instrument(stock("REST", None, "Other"))
        .with_price("LRG", dec!(100));
    let ledger = invest(ledger, "LRG", dec!(200), 1); // 2%, shortfall 3
    let ledger = invest(ledger, "MID", dec!(100), 2); // 1%, shortfall 2
    let ledger = invest(ledger, "REST", dec!(9700), 3);

    let report = report_of(ledger);
    assert_eq!(report.add.len(), 2);
    assert_eq!(report.add[0].instrument_id, "LRG");
    assert_eq!(report.add[0].shortfall_pct, dec!(3.00));
    assert!(report.add[0].in_buy_zone);
    assert!(report.add[0].reason.contains("in buy zone"));
    assert_eq!(report.add[1].instrument_id, "MID");
    assert!(!report.add[1].in_buy_zone);
}

#[test]
fn test_add_list_tie_broken_by_instrument_id() {
    let ledger = MockLedger::new()
        .with_instrument(stock("BBB", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("AAA", Some(MarketCapTier::Large), "Auto"))
        .with_instrument(stock("REST", None, "Other"));
    let ledger = invest(ledger, "BBB", dec!(200), 1);
    let ledger = invest(ledger, "AAA", dec!(200), 2);
    let ledger = invest(ledger, "REST", dec!(9600), 3);

    let report = report_of(ledger);
    let ids: Vec<_> = report.add.iter().map(|a| a.instrument_id.as_str()).collect();
    assert_eq!(ids, vec!["AAA", "BBB"]);
}

#[test]
fn test_tier_group_statuses() {
    // Large at 46% of equity: above 90% of the 50% cap but not over it.
    let ledger = MockLedger::new()
        .with_instrument(stock("LRG", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("MID", Some(MarketCapTier::Mid), "Auto"))
        .with_instrument(stock("MIC", Some(MarketCapTier::Micro), "Chemicals"));
    let ledger = invest(ledger, "LRG", dec!(4600), 1);
    let ledger = invest(ledger, "MID", dec!(5000), 2); // 50% vs 30% cap
    let ledger = invest(ledger, "MIC", dec!(400), 3); // 4% vs 15% cap, under 7.5%

    let report = report_of(ledger);
    let status_of = |label: &str| {
        report
            .tier_recommendations
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.status)
            .unwrap()
    };
    assert_eq!(status_of("LARGE"), GroupStatus::ModerateOverweight);
    assert_eq!(status_of("MID"), GroupStatus::Overweight);
    assert_eq!(status_of("MICRO"), GroupStatus::Underweight);
}

#[test]
fn test_unknown_tier_group_gets_guidance() {
    let ledger = MockLedger::new()
        .with_instrument(stock("MYST", None, "Banking"))
        .with_instrument(stock("LRG", Some(MarketCapTier::Large), "Banking"));
    let ledger = invest(ledger, "MYST", dec!(5000), 1);
    let ledger = invest(ledger, "LRG", dec!(5000), 2);

    let report = report_of(ledger);
    let unknown = report
        .tier_recommendations
        .iter()
        .find(|g| g.label == "UNKNOWN")
        .unwrap();
    assert_eq!(unknown.status, GroupStatus::Unknown);
    assert!(unknown.reason.contains("market cap tier"));
    assert_eq!(unknown.max_allowed_pct, None);
}

#[test]
fn test_sector_group_overweight() {
    let ledger = MockLedger::new()
        .with_instrument(stock("A", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("B", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("C", Some(MarketCapTier::Large), "Auto"));
    let ledger = invest(ledger, "A", dec!(2000), 1);
    let ledger = invest(ledger, "B", dec!(1000), 2);
    let ledger = invest(ledger, "C", dec!(7000), 3);

    let report = report_of(ledger);
    let banking = report
        .sector_recommendations
        .iter()
        .find(|g| g.label == "Banking")
        .unwrap();
    // 30% of equity against the 20% sector cap.
    assert_eq!(banking.status, GroupStatus::Overweight);
    assert_eq!(banking.percentage, dec!(30.00));
    assert_eq!(banking.instrument_count, 2);
}

#[test]
fn test_groups_sorted_by_percentage_desc() {
    let ledger = MockLedger::new()
        .with_instrument(stock("A", Some(MarketCapTier::Large), "Banking"))
        .with_instrument(stock("B", Some(MarketCapTier::Mid), "Auto"));
    let ledger = invest(ledger, "A", dec!(3000), 1);
    let ledger = invest(ledger, "B", dec!(7000), 2);

    let report = report_of(ledger);
    assert_eq!(report.tier_recommendations[0].label, "MID");
    assert_eq!(report.tier_recommendations[1].label, "LARGE");
}
