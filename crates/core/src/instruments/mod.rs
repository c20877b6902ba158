mod instruments_model;

pub use instruments_model::{AssetClass, Instrument, MarketCapTier};
