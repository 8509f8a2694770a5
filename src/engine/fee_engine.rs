use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::debug;

use crate::engine::EngineError;
use crate::models::{FeeSchedule, Transaction};
use crate::policy::FeePolicy;
use crate::rates::{CurrencyNormalizer, RateSnapshot};
use crate::storage::StatsStorage;

const FIELDS_PER_RECORD: usize = 6;

/// Single pass fee calculator over an ordered batch of transactions.
///
/// Every record is normalized, folded into its weekly aggregate and priced
/// before the next one is read. Fees already emitted are never revisited.
pub struct FeeEngine<S: StatsStorage> {
    normalizer: CurrencyNormalizer,
    stats: S,
    policy: FeePolicy
}

impl<S: StatsStorage> FeeEngine<S> {
    /// Creates an engine for one run. `stats` should be empty.
    pub fn new(schedule: FeeSchedule, snapshot: RateSnapshot, stats: S) -> Self {
        Self {
            normalizer: CurrencyNormalizer::new(schedule.base_currency.clone(), snapshot),
            stats,
            policy: FeePolicy::new(schedule)
        }
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Prices one transaction and records it in the weekly aggregates.
    ///
    /// # Errors
    /// Returns `EngineError::Rate` if the transaction currency has no exchange rate.
    pub fn process(&mut self, transaction: &Transaction) -> Result<Decimal, EngineError> {
        let normalized = self.normalizer.normalize(transaction.amount, &transaction.currency_code)?;
        let aggregate = self.stats.update(transaction.aggregate_key(), normalized)
            .ok_or_else(|| EngineError::overflow(transaction))?;
        let fee = self.policy.compute_fee(Some(&aggregate), transaction)
            .ok_or_else(|| EngineError::overflow(transaction))?;

        debug!(
            "User [{}] {} {} of {} {} in {}: fee {fee}",
            transaction.user_id,
            transaction.merchant_type,
            transaction.transaction_type,
            transaction.amount,
            transaction.currency_code,
            transaction.period_key()
        );

        Ok(fee)
    }

    /// Reads header-less CSV records from `reader` and writes one fee per line
    /// to `writer`, in input order. Returns the number of records processed.
    ///
    /// The first record that cannot be parsed or priced aborts the run.
    pub fn run<R: Read, W: Write>(&mut self, reader: R, mut writer: W) -> Result<usize, EngineError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut processed = 0;

        for result in reader.records() {
            let record = result.map_err(|error| {
                let line = error.position().map(|position| position.line()).unwrap_or_default();
                EngineError::from_csv(line, error)
            })?;
            let transaction = parse_record(&record)?;
            let fee = self.process(&transaction)?;

            writeln!(writer, "{fee}")?;
            processed += 1;
        }

        writer.flush()?;

        Ok(processed)
    }

    /// Runs the batch stored in the CSV file at `path`.
    ///
    /// # Errors
    /// Returns `EngineError::InputNotFound` before any processing if the file does not exist.
    pub fn run_file<W: Write>(&mut self, path: &Path, writer: W) -> Result<usize, EngineError> {
        if !path.exists() {
            return Err(EngineError::InputNotFound { path: path.to_path_buf() });
        }

        let file = File::open(path)?;
        self.run(BufReader::new(file), writer)
    }
}

fn parse_record(record: &StringRecord) -> Result<Transaction, EngineError> {
    let line = record.position().map(|position| position.line()).unwrap_or_default();

    if record.len() != FIELDS_PER_RECORD {
        return Err(EngineError::malformed_record(
            line,
            format!("expected {FIELDS_PER_RECORD} fields but found {}", record.len())
        ));
    }

    record.deserialize(None).map_err(|error| EngineError::from_csv(line, error))
}
