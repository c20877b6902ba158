pub const TRANSACTION_TYPE_BUY: &str = "BUY";
pub const TRANSACTION_TYPE_SELL: &str = "SELL";
pub const TRANSACTION_TYPE_CONTRIBUTION: &str = "CONTRIBUTION";
pub const TRANSACTION_TYPE_INTEREST: &str = "INTEREST";
