use super::{EngineError, FeeEngine};

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use crate::models::{AggregateKey, FeeSchedule, TransactionType};
use crate::rates::{RateError, RateSnapshot};
use crate::storage::{StatsStorage, WeeklyStatsTracker};
use crate::types::PeriodKey;

fn create_engine() -> Result<FeeEngine<WeeklyStatsTracker>> {
    let rates = HashMap::from([
        ("USD".to_string(), Decimal::from_str("1.1497")?),
        ("JPY".to_string(), Decimal::from_str("129.53")?)
    ]);

    Ok(FeeEngine::new(FeeSchedule::default(), RateSnapshot::new(rates)?, WeeklyStatsTracker::new()))
}

fn run_batch(engine: &mut FeeEngine<WeeklyStatsTracker>, csv_content: &str) -> Result<Vec<String>, EngineError> {
    let mut output = Vec::new();
    engine.run(csv_content.as_bytes(), &mut output)?;

    Ok(String::from_utf8_lossy(&output).lines().map(str::to_string).collect())
}

#[test]
fn test_engine_first_three_small_withdrawals_are_free_then_charged() -> Result<()> {
    let mut engine = create_engine()?;
    let fees = run_batch(&mut engine, "\
2016-01-04,7,private,withdraw,200.00,EUR
2016-01-05,7,private,withdraw,200.00,EUR
2016-01-06,7,private,withdraw,200.00,EUR
2016-01-07,7,private,withdraw,500.00,EUR
")?;

    assert_eq!(fees, vec!["0.00", "0.00", "0.00", "1.50"]);

    Ok(())
}

#[test]
fn test_engine_charges_excess_of_first_large_withdrawal() -> Result<()> {
    let mut engine = create_engine()?;
    let fees = run_batch(&mut engine, "2016-01-04,7,private,withdraw,1200.00,EUR\n")?;

    assert_eq!(fees, vec!["0.60"]);

    Ok(())
}

#[test]
fn test_engine_processes_historical_batch() -> Result<()> {
    let mut engine = create_engine()?;
    let fees = run_batch(&mut engine, "\
2014-12-31,4,private,withdraw,1200.00,EUR
2015-01-01,4,private,withdraw,1000.00,EUR
2016-01-05,4,private,withdraw,1000.00,EUR
2016-01-05,1,private,deposit,200.00,EUR
2016-01-06,2,business,withdraw,300.00,EUR
2016-01-06,1,private,withdraw,30000,JPY
2016-01-07,1,private,withdraw,1000.00,EUR
2016-01-07,1,private,withdraw,100.00,USD
2016-01-10,1,private,withdraw,100.00,EUR
2016-01-10,2,business,deposit,10000.00,EUR
2016-01-10,3,private,withdraw,1000.00,EUR
2016-02-15,1,private,withdraw,300.00,EUR
2016-02-19,5,private,withdraw,3000000,JPY
")?;

    assert_eq!(fees, vec![
        "0.60", "3.00", "0.00", "0.06", "1.50", "0.00", "0.69",
        "0.30", "0.30", "3.00", "0.00", "0.00", "9000.00"
    ]);

    Ok(())
}

#[test]
fn test_engine_accumulates_rounded_normalized_amounts() -> Result<()> {
    let mut engine = create_engine()?;
    run_batch(&mut engine, "\
2016-01-06,1,private,withdraw,30000,JPY
2016-01-07,1,private,withdraw,100.00,USD
")?;

    let key = AggregateKey {
        period: PeriodKey::new(2016, 1),
        user_id: "1".to_string(),
        transaction_type: TransactionType::Withdraw
    };
    let aggregate = engine.stats().get(&key).ok_or_else(|| anyhow!("aggregate missing"))?;

    assert_eq!(aggregate.total_transactions, 2);
    assert_eq!(aggregate.total_amount, Decimal::from_str("318.59")?);

    Ok(())
}

#[test]
fn test_engine_keeps_users_weeks_and_types_apart() -> Result<()> {
    let mut engine = create_engine()?;
    let fees = run_batch(&mut engine, "\
2016-01-04,1,private,withdraw,1000.00,EUR
2016-01-04,2,private,withdraw,1000.00,EUR
2016-01-04,1,private,deposit,1000.00,EUR
2016-01-11,1,private,withdraw,1000.00,EUR
2017-01-02,1,private,withdraw,1000.00,EUR
2016-01-05,1,private,withdraw,10.00,EUR
")?;

    assert_eq!(fees, vec!["0.00", "0.00", "0.30", "0.00", "0.00", "0.03"]);
    assert_eq!(engine.stats().len(), 5);

    Ok(())
}

#[test]
fn test_engine_attributes_december_dates_to_following_year() -> Result<()> {
    let mut engine = create_engine()?;
    let fees = run_batch(&mut engine, "\
2013-12-02,1,private,withdraw,800.00,EUR
2014-12-01,1,private,withdraw,800.00,EUR
2014-12-29,1,private,withdraw,800.00,EUR
2015-01-02,1,private,withdraw,800.00,EUR
")?;

    // 2013-12-02 and 2014-12-01 are ISO week 49 but land in 2014 and 2015.
    // 2014-12-29 and 2015-01-02 share ISO week 1 and the 2015 bucket.
    assert_eq!(fees, vec!["0.00", "0.00", "0.00", "1.80"]);

    Ok(())
}

#[test]
fn test_engine_aborts_on_unknown_currency() -> Result<()> {
    let mut engine = create_engine()?;
    let mut output = Vec::new();
    let result = engine.run("\
2016-01-04,1,private,deposit,100.00,EUR
2016-01-04,1,private,deposit,100.00,GBP
2016-01-04,1,private,deposit,100.00,EUR
".as_bytes(), &mut output);

    assert!(matches!(result, Err(EngineError::Rate(RateError::UnknownCurrency { .. }))));
    assert_eq!(String::from_utf8_lossy(&output), "0.03\n");

    Ok(())
}

#[test]
fn test_engine_aborts_on_malformed_records() -> Result<()> {
    let test_cases = vec![
        "2016-01-04,1,private,deposit,100.00\n",
        "2016-01-04,1,private,deposit,100.00,EUR,extra\n",
        "2016-01-04,1,private,transfer,100.00,EUR\n",
        "2016-01-04,1,private,deposit,lots,EUR\n",
        "2016-13-04,1,private,deposit,100.00,EUR\n",
    ];

    for csv_content in test_cases {
        let mut engine = create_engine()?;
        let result = run_batch(&mut engine, &format!("2016-01-04,1,private,deposit,1.00,EUR\n{csv_content}"));

        assert!(
            matches!(result, Err(EngineError::MalformedRecord { line: 2, .. })),
            "expected malformed record for {csv_content:?}, got {result:?}"
        );
    }

    Ok(())
}

#[test]
fn test_engine_run_file_reports_missing_input() -> Result<()> {
    let mut engine = create_engine()?;
    let result = engine.run_file(Path::new("missing.csv"), Vec::new());

    assert!(matches!(result, Err(EngineError::InputNotFound { .. })));
    assert_eq!(engine.stats().len(), 0);

    Ok(())
}

#[test]
fn test_engine_run_file_processes_csv_on_disk() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "2016-01-05,1,private,deposit,200.00,EUR")?;
    writeln!(file, "2016-01-06,2,business,withdraw,300.00,EUR")?;

    let mut engine = create_engine()?;
    let mut output = Vec::new();
    let processed = engine.run_file(file.path(), &mut output)?;

    assert_eq!(processed, 2);
    assert_eq!(String::from_utf8(output)?, "0.06\n1.50\n");

    Ok(())
}

#[test]
fn test_engine_reports_overflowing_weekly_total_as_error() -> Result<()> {
    let mut engine = create_engine()?;
    let result = run_batch(&mut engine, "\
2016-01-04,1,private,withdraw,50000000000000000000000000000,EUR
2016-01-05,1,private,withdraw,50000000000000000000000000000,EUR
");

    match result {
        Err(EngineError::Overflow { user_id, date }) => {
            assert_eq!(user_id, "1");
            assert_eq!(date.to_string(), "2016-01-05");
        }
        other => return Err(anyhow!("expected overflow error, got {other:?}"))
    }

    Ok(())
}

#[test]
fn test_engine_keeps_parse_error_as_source_of_malformed_record() -> Result<()> {
    let mut engine = create_engine()?;
    let result = run_batch(&mut engine, "2016-01-04,1,private,deposit,lots,EUR\n");

    match result {
        Err(error @ EngineError::MalformedRecord { line: 1, .. }) => {
            assert!(std::error::Error::source(&error).is_some());
        }
        other => return Err(anyhow!("expected malformed record, got {other:?}"))
    }

    let result = run_batch(&mut engine, "2016-01-04,1,private,deposit\n");
    assert!(matches!(result, Err(EngineError::MalformedRecord { source: None, .. })));

    Ok(())
}
