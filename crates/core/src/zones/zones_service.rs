//! Price-zone alert evaluation.
//!
//! Each zone type is evaluated independently; an instrument can be in its
//! average zone and near its sell zone at the same time, so the evaluator
//! returns a set of alerts rather than a single state.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::instruments::Instrument;
use crate::ledger::LedgerReaderTrait;

use super::zones_model::{PriceZone, ZoneAlert, ZoneConfig, ZoneStatus, ZoneType};

/// Trait for the zone alert service.
pub trait ZoneAlertServiceTrait: Send + Sync {
    /// Evaluates every tracked instrument's zones against its current price.
    /// Instruments without zones or without a quoted price produce no entry.
    fn evaluate_price_zones(&self) -> Result<HashMap<String, Vec<ZoneAlert>>>;
}

pub struct ZoneAlertService {
    ledger: Arc<dyn LedgerReaderTrait>,
    config: ZoneConfig,
}

impl ZoneAlertService {
    pub fn new(ledger: Arc<dyn LedgerReaderTrait>, config: ZoneConfig) -> Self {
        Self { ledger, config }
    }

    /// Evaluates all defined zones of one instrument at the given price.
    pub fn evaluate_instrument(&self, instrument: &Instrument, price: Decimal) -> Vec<ZoneAlert> {
        let mut alerts = Vec::new();
        let zones = [
            (ZoneType::Buy, instrument.buy_zone),
            (ZoneType::Sell, instrument.sell_zone),
            (ZoneType::Average, instrument.average_zone),
        ];
        for (zone_type, zone) in zones {
            if let Some(zone) = zone {
                if let Some(alert) = classify_zone(zone_type, &zone, price, &self.config) {
                    alerts.push(alert);
                }
            }
        }
        alerts
    }
}

impl ZoneAlertServiceTrait for ZoneAlertService {
    fn evaluate_price_zones(&self) -> Result<HashMap<String, Vec<ZoneAlert>>> {
        let instruments = self.ledger.list_instruments()?;
        let mut result = HashMap::new();

        for instrument in &instruments {
            if instrument.buy_zone.is_none()
                && instrument.sell_zone.is_none()
                && instrument.average_zone.is_none()
            {
                continue;
            }
            let price = match self.ledger.get_current_price(&instrument.id)? {
                Some(price) => price,
                None => {
                    debug!(
                        "Instrument {} has zones but no current price. Skipping.",
                        instrument.id
                    );
                    continue;
                }
            };
            let alerts = self.evaluate_instrument(instrument, price);
            if !alerts.is_empty() {
                result.insert(instrument.id.clone(), alerts);
            }
        }
        Ok(result)
    }
}

/// Classifies one price against one zone.
///
/// "Near" is directional: a buy zone is approached from above (price falling
/// toward it), a sell zone from below (price rising toward it); an average
/// zone is approached from either side.
pub fn classify_zone(
    zone_type: ZoneType,
    zone: &PriceZone,
    price: Decimal,
    config: &ZoneConfig,
) -> Option<ZoneAlert> {
    if zone.contains(price) {
        return Some(ZoneAlert {
            zone_type,
            status: ZoneStatus::InZone,
            distance_pct: Decimal::ZERO,
        });
    }

    let above = price > zone.high();
    let near = match zone_type {
        ZoneType::Buy => above && price <= zone.high() * (Decimal::ONE + config.proximity_pct),
        ZoneType::Sell => !above && price >= zone.low() * (Decimal::ONE - config.proximity_pct),
        ZoneType::Average => {
            if above {
                price <= zone.high() * (Decimal::ONE + config.proximity_pct)
            } else {
                price >= zone.low() * (Decimal::ONE - config.proximity_pct)
            }
        }
    };

    if !near {
        return None;
    }

    let boundary = if above { zone.high() } else { zone.low() };
    let distance_pct = if boundary.is_zero() {
        Decimal::ZERO
    } else {
        ((price - boundary) / boundary * dec!(100)).round_dp(DISPLAY_DECIMAL_PRECISION)
    };

    Some(ZoneAlert {
        zone_type,
        status: ZoneStatus::NearZone,
        distance_pct,
    })
}
