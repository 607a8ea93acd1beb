use chrono::{DateTime, Datelike, Utc, Weekday};

/// Days on which batches are acknowledged without touching the platform
#[derive(Debug, Clone, Default)]
pub struct SchedulePolicy {
    pub skip_weekdays: Vec<Weekday>,
}

impl SchedulePolicy {
    pub fn new(skip_weekdays: Vec<Weekday>) -> Self {
        Self { skip_weekdays }
    }

    /// Reason to skip processing at `now`, if any
    pub fn should_skip(&self, now: DateTime<Utc>) -> Option<String> {
        let today = now.weekday();
        self.skip_weekdays
            .contains(&today)
            .then(|| format!("Processing is paused on {}", today))
    }
}
