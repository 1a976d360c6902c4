//! Interest rate in force over the life of a loan

use chrono::NaiveDate;

use crate::loan::InterestRateChange;

/// Scheduled rate changes, consumed in date order as the schedule advances
#[derive(Debug, Clone)]
pub struct RateTimeline {
    initial: f64,
    changes: Vec<InterestRateChange>,
    next: usize,
    current: f64,
}

impl RateTimeline {
    pub fn new(initial_rate: f64, changes: &[InterestRateChange]) -> Self {
        let mut changes = changes.to_vec();
        changes.sort_by_key(|c| c.date);
        Self {
            initial: initial_rate,
            changes,
            next: 0,
            current: initial_rate,
        }
    }

    /// Rate currently in force (percent)
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Consume every change dated on or before `date` and return the rate in force.
    /// Never reverts to an earlier rate.
    pub fn advance_to(&mut self, date: NaiveDate) -> f64 {
        while let Some(change) = self.changes.get(self.next) {
            if change.date > date {
                break;
            }
            self.current = change.new_rate;
            self.next += 1;
        }
        self.current
    }

    /// Stateless lookup of the rate in force at `date`
    pub fn rate_at(&self, date: NaiveDate) -> f64 {
        self.changes
            .iter()
            .take_while(|c| c.date <= date)
            .last()
            .map_or(self.initial, |c| c.new_rate)
    }
}
