use std::io;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::CurrencyCode;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("No exchange rate available for currency [{currency}]")]
    UnknownCurrency {
        currency: CurrencyCode
    },
    #[error("Exchange rate [{rate}] for currency [{currency}] must be positive")]
    InvalidRate {
        currency: CurrencyCode,
        rate: Decimal
    },
    #[error("Exchange rate request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Exchange rate service responded with status [{status}]: {message}")]
    Status {
        status: u16,
        message: String
    },
    #[error("Exchange rate payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Exchange rate file [{}] could not be read: {source}", .path.display())]
    File {
        path: PathBuf,
        source: io::Error
    }
}

impl RateError {
    /// Whether a failed fetch may succeed when the request is repeated.
    ///
    /// Only transport-level trouble, throttling and server-side failures
    /// qualify. Lookup, validation and decoding failures are final.
    pub fn is_transient(&self) -> bool {
        match self {
            RateError::Request(error) => error.is_timeout() || error.is_connect(),
            RateError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            RateError::UnknownCurrency { .. }
            | RateError::InvalidRate { .. }
            | RateError::Decode(_)
            | RateError::File { .. } => false
        }
    }
}
