mod errors;
mod file_source;
mod http_source;
mod normalizer;
mod snapshot;

pub use errors::RateError;
pub use file_source::FileRateSource;
pub use http_source::{HttpRateSource, DEFAULT_MAX_ATTEMPTS, DEFAULT_RATES_URL, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use normalizer::CurrencyNormalizer;
pub use snapshot::RateSnapshot;

/// A collaborator able to produce the exchange rate snapshot for a run.
///
/// The snapshot is fetched once before the first record is processed and is
/// never refreshed afterwards.
pub trait RateSource {
    async fn fetch(&self) -> Result<RateSnapshot, RateError>;
}
