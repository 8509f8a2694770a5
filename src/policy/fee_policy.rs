use rust_decimal::Decimal;

use crate::models::{FeeSchedule, MerchantType, Transaction, TransactionType, WeeklyAggregate};
use crate::types::round_money;

/// Decides the commission owed for a single transaction.
///
/// The policy is a pure function of the schedule, the transaction and the
/// user's weekly aggregate. The aggregate must already include the
/// transaction being priced.
#[derive(Debug, Clone)]
pub struct FeePolicy {
    schedule: FeeSchedule
}

impl FeePolicy {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Returns the fee rounded to cents, in the transaction's own currency
    /// except for the partial allowance case, which is charged on the
    /// base-currency excess. Returns `None` if the fee overflows.
    pub fn compute_fee(&self, aggregate: Option<&WeeklyAggregate>, transaction: &Transaction) -> Option<Decimal> {
        let fee = match (transaction.transaction_type, transaction.merchant_type, aggregate) {
            (TransactionType::Deposit, _, _) => transaction.amount.checked_mul(self.schedule.deposit_rate)?,
            (TransactionType::Withdraw, MerchantType::Business, _) => {
                transaction.amount.checked_mul(self.schedule.business_withdraw_rate)?
            }
            (TransactionType::Withdraw, MerchantType::Private, Some(aggregate)) => {
                self.private_withdraw_fee(aggregate, transaction.amount)?
            }
            (TransactionType::Withdraw, MerchantType::Private, None) => Decimal::ZERO
        };

        Some(round_money(fee))
    }

    fn private_withdraw_fee(&self, aggregate: &WeeklyAggregate, amount: Decimal) -> Option<Decimal> {
        let schedule = &self.schedule;
        let count = aggregate.total_transactions;
        let total = aggregate.total_amount;

        if count <= schedule.max_free_transactions && total <= schedule.free_amount_limit {
            return Some(Decimal::ZERO);
        }

        if count > schedule.max_free_transactions {
            return amount.checked_mul(schedule.private_withdraw_rate);
        }

        // Within the free count but over the amount limit.
        if count > 2 {
            return amount.checked_mul(schedule.private_withdraw_rate);
        }

        let excess = total.checked_sub(schedule.free_amount_limit)?;
        if excess > schedule.free_amount_limit {
            return amount.checked_mul(schedule.private_withdraw_rate);
        }

        excess.checked_mul(schedule.private_withdraw_rate)
    }
}
