// Order reconciliation pipeline
pub mod date_range;
pub mod pipeline;
pub mod reconciler;
pub mod schedule;

pub use date_range::{resolve_date_range, DateRange};
pub use pipeline::{SyncOutcome, SyncService};
pub use schedule::SchedulePolicy;
