use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Transaction;
use crate::rates::RateError;
use crate::types::UserId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("There is no file {}", .path.display())]
    InputNotFound {
        path: PathBuf
    },
    #[error("Malformed record on line [{line}]: {reason}")]
    MalformedRecord {
        line: u64,
        reason: String,
        #[source]
        source: Option<csv::Error>
    },
    #[error("Numeric overflow occurred for transaction of user [{user_id}] on [{date}]")]
    Overflow {
        user_id: UserId,
        date: NaiveDate
    },
    #[error(transparent)]
    Rate(#[from] RateError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error)
}

impl EngineError {
    pub fn malformed_record(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { line, reason: reason.into(), source: None }
    }

    pub fn from_csv(line: u64, error: csv::Error) -> Self {
        Self::MalformedRecord {
            line,
            reason: "record could not be parsed".to_string(),
            source: Some(error)
        }
    }

    pub fn overflow(transaction: &Transaction) -> Self {
        Self::Overflow {
            user_id: transaction.user_id.clone(),
            date: transaction.date
        }
    }
}
