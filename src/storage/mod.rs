mod weekly_stats;

use rust_decimal::Decimal;

use crate::models::{AggregateKey, WeeklyAggregate};

pub use weekly_stats::WeeklyStatsTracker;

/// Holds the running weekly aggregates for the lifetime of one batch run.
///
/// Aggregates are keyed per user, so an implementation partitioned by
/// `user_id` never has to coordinate writes between partitions.
pub trait StatsStorage {
    /// Folds `normalized_amount` into the aggregate for `key` and returns the
    /// aggregate as it stands after the update.
    ///
    /// Returns `None` and leaves the stored aggregate untouched if the running
    /// totals would overflow.
    fn update(&mut self, key: AggregateKey, normalized_amount: Decimal) -> Option<WeeklyAggregate>;
    fn len(&self) -> usize;
}
