use rust_decimal::Decimal;

use crate::models::TransactionType;
use crate::types::{PeriodKey, UserId};

/// Composite key of a weekly aggregate: one user, one operation type, one week.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AggregateKey {
    pub period: PeriodKey,
    pub user_id: UserId,
    pub transaction_type: TransactionType
}

/// Running count and base-currency total for one [`AggregateKey`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WeeklyAggregate {
    pub total_transactions: u32,
    pub total_amount: Decimal
}

impl WeeklyAggregate {
    pub fn new(normalized_amount: Decimal) -> Self {
        Self {
            total_transactions: 1,
            total_amount: normalized_amount
        }
    }

    /// Returns the aggregate with one more transaction folded in, or `None`
    /// if the count or the running total would overflow.
    pub fn checked_record(self, normalized_amount: Decimal) -> Option<Self> {
        Some(Self {
            total_transactions: self.total_transactions.checked_add(1)?,
            total_amount: self.total_amount.checked_add(normalized_amount)?
        })
    }
}
