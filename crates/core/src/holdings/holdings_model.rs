use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::instruments::{AssetClass, MarketCapTier};

/// A reconstructed holding.
///
/// Market-traded instruments become `Position` (quantity and average cost
/// are meaningful); contribution-driven instruments become `Balance`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "holdingType")]
#[serde(rename_all = "camelCase")]
pub enum Holding {
    #[serde(rename_all = "camelCase")]
    Position {
        instrument_id: String,
        symbol: String,
        name: String,
        asset_class: AssetClass,
        #[serde(skip_serializing_if = "Option::is_none")]
        sector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        market_cap_tier: Option<MarketCapTier>,
        quantity: Decimal,
        average_cost: Decimal,
        invested_amount: Decimal,
        realized_gain: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_price: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_value: Option<Decimal>,
    },
    #[serde(rename_all = "camelCase")]
    Balance {
        instrument_id: String,
        symbol: String,
        name: String,
        asset_class: AssetClass,
        invested_amount: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_value: Option<Decimal>,
    },
}

impl Holding {
    pub fn instrument_id(&self) -> &str {
        match self {
            Holding::Position { instrument_id, .. } => instrument_id,
            Holding::Balance { instrument_id, .. } => instrument_id,
        }
    }

    pub fn asset_class(&self) -> AssetClass {
        match self {
            Holding::Position { asset_class, .. } => *asset_class,
            Holding::Balance { asset_class, .. } => *asset_class,
        }
    }

    pub fn sector(&self) -> Option<&str> {
        match self {
            Holding::Position { sector, .. } => sector.as_deref(),
            Holding::Balance { .. } => None,
        }
    }

    pub fn market_cap_tier(&self) -> Option<MarketCapTier> {
        match self {
            Holding::Position {
                market_cap_tier, ..
            } => *market_cap_tier,
            Holding::Balance { .. } => None,
        }
    }

    pub fn invested_amount(&self) -> Decimal {
        match self {
            Holding::Position {
                invested_amount, ..
            } => *invested_amount,
            Holding::Balance {
                invested_amount, ..
            } => *invested_amount,
        }
    }

    /// Market value when a price is known, cost basis otherwise.
    pub fn effective_value(&self) -> Decimal {
        match self {
            Holding::Position {
                current_value,
                invested_amount,
                ..
            } => current_value.unwrap_or(*invested_amount),
            Holding::Balance {
                current_value,
                invested_amount,
                ..
            } => current_value.unwrap_or(*invested_amount),
        }
    }
}

/// Realized gain of one instrument, kept even after full liquidation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealizedGain {
    pub instrument_id: String,
    pub amount: Decimal,
}

/// Result of a holdings computation. Per-instrument failures land in
/// `issues`; the remaining instruments are unaffected.
#[derive(Debug, Default)]
pub struct HoldingsComputation {
    pub holdings: Vec<Holding>,
    pub realized: Vec<RealizedGain>,
    pub issues: Vec<Error>,
}

impl HoldingsComputation {
    pub fn total_invested(&self) -> Decimal {
        self.holdings.iter().map(|h| h.invested_amount()).sum()
    }

    pub fn total_value(&self) -> Decimal {
        self.holdings.iter().map(|h| h.effective_value()).sum()
    }

    pub fn realized_gain(&self, instrument_id: &str) -> Option<Decimal> {
        self.realized
            .iter()
            .find(|r| r.instrument_id == instrument_id)
            .map(|r| r.amount)
    }
}
