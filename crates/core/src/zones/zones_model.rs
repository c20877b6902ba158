use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A user-defined decision zone for an instrument: either an exact price or
/// a closed inclusive price range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "zoneKind", rename_all = "camelCase")]
pub enum PriceZone {
    Point { price: Decimal },
    Range { low: Decimal, high: Decimal },
}

impl PriceZone {
    /// Builds a range zone, rejecting inverted bounds.
    pub fn range(low: Decimal, high: Decimal) -> Result<Self> {
        if low > high {
            return Err(ValidationError::InvertedZone { low, high }.into());
        }
        Ok(PriceZone::Range { low, high })
    }

    /// Parses the user-facing zone notation: `"250"` for a point,
    /// `"250-300"` for a range.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MalformedZone("empty zone string".to_string()).into());
        }
        match raw.split_once('-') {
            Some((lo, hi)) => {
                let low: Decimal = lo
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::MalformedZone(raw.to_string()))?;
                let high: Decimal = hi
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::MalformedZone(raw.to_string()))?;
                PriceZone::range(low, high)
            }
            None => {
                let price: Decimal = raw
                    .parse()
                    .map_err(|_| ValidationError::MalformedZone(raw.to_string()))?;
                Ok(PriceZone::Point { price })
            }
        }
    }

    /// Inclusive lower boundary of the zone.
    pub fn low(&self) -> Decimal {
        match self {
            PriceZone::Point { price } => *price,
            PriceZone::Range { low, .. } => *low,
        }
    }

    /// Inclusive upper boundary of the zone.
    pub fn high(&self) -> Decimal {
        match self {
            PriceZone::Point { price } => *price,
            PriceZone::Range { high, .. } => *high,
        }
    }

    /// Whether the price sits inside the zone (boundaries inclusive).
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.low() && price <= self.high()
    }
}

/// The three zone types an instrument can define.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ZoneType {
    Buy,
    Sell,
    Average,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Buy => "buy",
            ZoneType::Sell => "sell",
            ZoneType::Average => "average",
        }
    }
}

/// How the current price relates to one zone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ZoneStatus {
    /// Price is inside the zone (or equals it, for point zones).
    InZone,
    /// Price is within the proximity band on the approach side.
    NearZone,
}

/// One fired alert for one instrument and zone type.
///
/// `distance_pct` is measured against the nearer zone boundary, signed:
/// positive when the price is above that boundary, negative when below,
/// zero when inside the zone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAlert {
    pub zone_type: ZoneType,
    pub status: ZoneStatus,
    pub distance_pct: Decimal,
}

/// Proximity configuration for the zone evaluator.
#[derive(Debug, Clone, Copy)]
pub struct ZoneConfig {
    /// Fraction of the boundary price treated as "near" (0.05 = 5%).
    pub proximity_pct: Decimal,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            proximity_pct: rust_decimal_macros::dec!(0.05),
        }
    }
}
