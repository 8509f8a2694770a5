mod money;
mod period;

pub use money::round_money;
pub use period::PeriodKey;

pub type UserId = String;
pub type CurrencyCode = String;
