use serde::{Deserialize, Serialize};

use crate::zones::PriceZone;

/// Broad asset class of a tracked instrument.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Equity,
    MutualFund,
    FixedDeposit,
    Retirement,
    Savings,
    Lending,
    Alternative,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Equity => "EQUITY",
            AssetClass::MutualFund => "MUTUAL_FUND",
            AssetClass::FixedDeposit => "FIXED_DEPOSIT",
            AssetClass::Retirement => "RETIREMENT",
            AssetClass::Savings => "SAVINGS",
            AssetClass::Lending => "LENDING",
            AssetClass::Alternative => "ALTERNATIVE",
        }
    }

    /// Market-traded classes carry quantities and unit prices; the rest are
    /// balance-style holdings tracked by amount alone.
    pub fn is_market_traded(&self) -> bool {
        matches!(self, AssetClass::Equity | AssetClass::MutualFund)
    }
}

/// Market capitalization tier, used for stock allocation targets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketCapTier {
    Large,
    Mid,
    Small,
    Micro,
}

impl MarketCapTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapTier::Large => "LARGE",
            MarketCapTier::Mid => "MID",
            MarketCapTier::Small => "SMALL",
            MarketCapTier::Micro => "MICRO",
        }
    }
}

/// A tracked instrument and its static metadata.
///
/// Sector, cap tier, and zones are optional; analytics that need them skip
/// or bucket instruments that lack them rather than failing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub asset_class: AssetClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_tier: Option<MarketCapTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_zone: Option<PriceZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_zone: Option<PriceZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_zone: Option<PriceZone>,
}

impl Instrument {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_class: AssetClass,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            asset_class,
            sector: None,
            market_cap_tier: None,
            buy_zone: None,
            sell_zone: None,
            average_zone: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_market_cap_tier(mut self, tier: MarketCapTier) -> Self {
        self.market_cap_tier = Some(tier);
        self
    }

    pub fn with_buy_zone(mut self, zone: PriceZone) -> Self {
        self.buy_zone = Some(zone);
        self
    }

    pub fn with_sell_zone(mut self, zone: PriceZone) -> Self {
        self.sell_zone = Some(zone);
        self
    }

    pub fn with_average_zone(mut self, zone: PriceZone) -> Self {
        self.average_zone = Some(zone);
        self
    }
}
