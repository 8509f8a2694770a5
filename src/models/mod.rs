mod aggregate;
mod fee_schedule;
mod transaction;

use serde::Deserialize;
use std::fmt::{self, Display, Formatter};

pub use aggregate::{AggregateKey, WeeklyAggregate};
pub use fee_schedule::{FeeSchedule, DEFAULT_BASE_CURRENCY};
pub use transaction::Transaction;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdraw
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantType {
    Private,
    Business
}

impl Display for TransactionType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deposit => formatter.write_str("deposit"),
            TransactionType::Withdraw => formatter.write_str("withdraw")
        }
    }
}

impl Display for MerchantType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MerchantType::Private => formatter.write_str("private"),
            MerchantType::Business => formatter.write_str("business")
        }
    }
}
