use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::{AggregateKey, WeeklyAggregate};
use crate::storage::StatsStorage;

/// In-memory weekly aggregates. Entries are created on first use and are
/// never evicted during a run.
#[derive(Debug, Default)]
pub struct WeeklyStatsTracker {
    aggregates: HashMap<AggregateKey, WeeklyAggregate>
}

impl WeeklyStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self, key: &AggregateKey) -> Option<WeeklyAggregate> {
        self.aggregates.get(key).copied()
    }
}

impl StatsStorage for WeeklyStatsTracker {
    fn update(&mut self, key: AggregateKey, normalized_amount: Decimal) -> Option<WeeklyAggregate> {
        let aggregate = match self.aggregates.entry(key) {
            Entry::Occupied(mut entry) => {
                let aggregate = entry.get().checked_record(normalized_amount)?;
                entry.insert(aggregate);
                aggregate
            }
            Entry::Vacant(entry) => *entry.insert(WeeklyAggregate::new(normalized_amount))
        };

        trace!("Weekly aggregate now at {} transactions totalling {}", aggregate.total_transactions, aggregate.total_amount);

        Some(aggregate)
    }

    fn len(&self) -> usize {
        self.aggregates.len()
    }
}
