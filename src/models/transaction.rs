use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{AggregateKey, MerchantType, TransactionType};
use crate::types::{CurrencyCode, PeriodKey, UserId};

/// Represents a single row from the input CSV file.
///
/// Rows carry no header, so fields are deserialized by position in the order
/// declared here: `date,user,merchant type,type,amount,currency`.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// Calendar date of the operation (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Opaque identifier of the paying user.
    pub user_id: UserId,
    /// Whether the user is a private person or a business.
    pub merchant_type: MerchantType,
    /// The type of operation (deposit or withdraw).
    pub transaction_type: TransactionType,
    /// Amount in the transaction's own currency, parsed as an exact decimal.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Currency the amount is expressed in.
    pub currency_code: CurrencyCode
}

impl Transaction {
    pub fn period_key(&self) -> PeriodKey {
        PeriodKey::from_date(self.date)
    }

    /// The weekly stats bucket this transaction contributes to.
    pub fn aggregate_key(&self) -> AggregateKey {
        AggregateKey {
            period: self.period_key(),
            user_id: self.user_id.clone(),
            transaction_type: self.transaction_type
        }
    }
}
