use rust_decimal::Decimal;

use crate::types::CurrencyCode;

pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

/// Commission rates and weekly limits applied by the fee policy.
///
/// All limits are expressed in units of `base_currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    pub base_currency: CurrencyCode,
    pub deposit_rate: Decimal,
    pub business_withdraw_rate: Decimal,
    pub private_withdraw_rate: Decimal,
    /// Number of private withdrawals per week that may be free of charge.
    pub max_free_transactions: u32,
    /// Weekly private withdrawal total that may be free of charge.
    pub free_amount_limit: Decimal
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            deposit_rate: Decimal::new(3, 4),
            business_withdraw_rate: Decimal::new(5, 3),
            private_withdraw_rate: Decimal::new(3, 3),
            max_free_transactions: 3,
            free_amount_limit: Decimal::from(1000)
        }
    }
}

impl FeeSchedule {
    /// The default schedule normalized against a different base currency.
    pub fn with_base_currency(base_currency: impl Into<CurrencyCode>) -> Self {
        Self {
            base_currency: base_currency.into(),
            ..Self::default()
        }
    }
}
