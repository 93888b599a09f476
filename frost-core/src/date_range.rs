use chrono::{Days, NaiveDate};

/// Inclusive range of calendar days, yielded oldest first.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The `count` days strictly after `anchor`.
    ///
    /// Returns an empty range when `count` is zero or would overflow the
    /// calendar.
    pub fn following(anchor: NaiveDate, count: u64) -> DateRange {
        match (
            anchor.succ_opt(),
            anchor.checked_add_days(Days::new(count)),
        ) {
            (Some(start), Some(end)) if count > 0 => DateRange(start, end),
            _ => DateRange(anchor, anchor.pred_opt().unwrap_or(anchor)),
        }
    }

    /// Number of days the range still yields.
    pub fn num_days(&self) -> i64 {
        ((self.1 - self.0).num_days() + 1).max(0)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // end of the calendar, close the range
            None => self.1 = current.pred_opt().unwrap_or(current),
        }
        Some(current)
    }
}
