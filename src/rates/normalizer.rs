use rust_decimal::Decimal;

use crate::rates::{RateError, RateSnapshot};
use crate::types::{round_money, CurrencyCode};

/// Converts amounts into the base currency using a fixed rate snapshot.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizer {
    base_currency: CurrencyCode,
    snapshot: RateSnapshot
}

impl CurrencyNormalizer {
    pub fn new(base_currency: impl Into<CurrencyCode>, snapshot: RateSnapshot) -> Self {
        Self {
            base_currency: base_currency.into(),
            snapshot
        }
    }

    /// Returns `amount` expressed in the base currency, rounded to cents.
    ///
    /// The rounded value is what gets accumulated into weekly totals, so any
    /// rounding error carries into later fee decisions.
    ///
    /// # Errors
    /// Returns `RateError::UnknownCurrency` if the snapshot has no rate for `currency`.
    pub fn normalize(&self, amount: Decimal, currency: &str) -> Result<Decimal, RateError> {
        if currency == self.base_currency {
            return Ok(round_money(amount));
        }

        let rate = self.snapshot.rate(currency).ok_or_else(|| RateError::UnknownCurrency {
            currency: currency.to_string()
        })?;

        let converted = amount.checked_div(rate).ok_or_else(|| RateError::InvalidRate {
            currency: currency.to_string(),
            rate
        })?;

        Ok(round_money(converted))
    }
}
