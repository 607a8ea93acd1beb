use chrono::{DateTime, Duration, DurationRound, Utc};

use crate::error::{AppError, AppResult};
use crate::orders::models::LocalOrder;

const QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Closed UTC interval with whole-second bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn start_param(&self) -> String {
        self.start.format(QUERY_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(QUERY_FORMAT).to_string()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start <= *ts && *ts <= self.end
    }
}

/// Query window covering every order in the batch, widened by `lookback`
pub fn resolve_date_range(orders: &[LocalOrder], lookback: Duration) -> AppResult<DateRange> {
    let oldest = orders.iter().map(|o| o.created_at).min();
    let newest = orders.iter().map(|o| o.created_at).max();

    let (Some(oldest), Some(newest)) = (oldest, newest) else {
        return Err(AppError::InvalidInput(
            "cannot derive a date range from an empty order batch".to_string(),
        ));
    };

    let start = oldest.checked_sub_signed(lookback).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "lookback of {} days before {} is out of range",
            lookback.num_days(),
            oldest
        ))
    })?;

    Ok(DateRange {
        start: floor_to_second(start)?,
        end: ceil_to_second(newest)?,
    })
}

fn floor_to_second(ts: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    ts.duration_trunc(Duration::seconds(1))
        .map_err(|e| AppError::InvalidInput(format!("timestamp out of range: {}", e)))
}

fn ceil_to_second(ts: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let floored = floor_to_second(ts)?;
    if floored == ts {
        Ok(ts)
    } else {
        Ok(floored + Duration::seconds(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(name: &str, created_at: DateTime<Utc>) -> LocalOrder {
        LocalOrder {
            name: name.to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_range_spans_batch_plus_lookback() {
        let orders = vec![
            order("A2", Utc.with_ymd_and_hms(2024, 1, 12, 9, 30, 0).unwrap()),
            order("A1", Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()),
            order("A3", Utc.with_ymd_and_hms(2024, 1, 11, 18, 0, 0).unwrap()),
        ];

        let range = resolve_date_range(&orders, Duration::days(1)).unwrap();

        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 12, 9, 30, 0).unwrap());
        assert_eq!(range.start_param(), "2024-01-09T00:00:00Z");
        assert_eq!(range.end_param(), "2024-01-12T09:30:00Z");
    }

    #[test]
    fn test_every_order_inside_range() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let orders: Vec<_> = (0..20)
            .map(|i| {
                let ts = base + Duration::minutes(i * 97) + Duration::milliseconds(i * 131);
                order(&format!("#{}", i), ts)
            })
            .collect();

        for days in [0, 1, 3] {
            let lookback = Duration::days(days);
            let range = resolve_date_range(&orders, lookback).unwrap();

            assert!(orders.iter().all(|o| range.contains(&o.created_at)));
            assert!(range.end - range.start >= lookback);
        }
    }

    #[test]
    fn test_subsecond_bounds_widen_outward() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap() + Duration::milliseconds(250);
        let range = resolve_date_range(&[order("A1", ts)], Duration::days(1)).unwrap();

        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 9, 12, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 1).unwrap());
    }

    #[test]
    fn test_oversized_lookback_rejected() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let lookback = Duration::try_days(100_000_000).unwrap();

        let err = resolve_date_range(&[order("A1", ts)], lookback).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = resolve_date_range(&[order("A1", ts)], Duration::MAX).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = resolve_date_range(&[], Duration::days(1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
