mod zones_model;
mod zones_service;

pub use zones_model::{PriceZone, ZoneAlert, ZoneConfig, ZoneStatus, ZoneType};
pub use zones_service::{classify_zone, ZoneAlertService, ZoneAlertServiceTrait};
