use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::rates::RateError;
use crate::types::CurrencyCode;

/// Body returned by the exchange rate service. Only `rates` is consulted.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<CurrencyCode, Decimal>
}

/// Immutable exchange rates relative to the base currency.
///
/// A rate of `1.1497` for `USD` means one base unit buys 1.1497 USD. The base
/// currency itself is never listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    rates: HashMap<CurrencyCode, Decimal>
}

impl RateSnapshot {
    /// Builds a snapshot, rejecting zero or negative rates.
    pub fn new(rates: HashMap<CurrencyCode, Decimal>) -> Result<Self, RateError> {
        if let Some((currency, rate)) = rates.iter().find(|(_, rate)| **rate <= Decimal::ZERO) {
            return Err(RateError::InvalidRate {
                currency: currency.clone(),
                rate: *rate
            });
        }

        Ok(Self { rates })
    }

    /// Parses the `{"rates": {...}}` document served by the rate collaborator.
    pub fn from_json(body: &str) -> Result<Self, RateError> {
        let payload: RatesPayload = serde_json::from_str(body)?;
        Self::new(payload.rates)
    }

    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
