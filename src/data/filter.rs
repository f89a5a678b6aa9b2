use chrono::NaiveDateTime;
use log::debug;

use super::model::{CtdProfile, RawMetoceanTable, Timestamped};

// ---------------------------------------------------------------------------
// Time range selection
// ---------------------------------------------------------------------------

/// A closed interval `[start, end]` on the cruise timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// Sort `rows` chronologically, then keep the ones inside the range.
    ///
    /// File order is not trusted to be chronological, so the sort always
    /// happens first.
    pub fn select<T: Timestamped>(&self, mut rows: Vec<T>) -> Vec<T> {
        let before = rows.len();
        sort_by_time(&mut rows);
        let lo = rows.partition_point(|r| r.timestamp() < self.start);
        let hi = rows.partition_point(|r| r.timestamp() <= self.end);
        let selected: Vec<T> = if lo < hi {
            rows.drain(lo..hi).collect()
        } else {
            Vec::new()
        };
        debug_assert!(selected.iter().all(|r| self.contains(r.timestamp())));
        debug!(
            "time range {} .. {}: {} of {} rows",
            self.start,
            self.end,
            selected.len(),
            before
        );
        selected
    }
}

/// Stable ascending sort by timestamp.
pub fn sort_by_time<T: Timestamped>(rows: &mut [T]) {
    rows.sort_by_key(|r| r.timestamp());
}

impl RawMetoceanTable {
    /// Keep only the rows inside `range`, in chronological order.
    pub fn select_range(self, range: &TimeRange) -> RawMetoceanTable {
        RawMetoceanTable {
            records: range.select(self.records),
        }
    }
}

// ---------------------------------------------------------------------------
// Depth ordering
// ---------------------------------------------------------------------------

/// Order a profile shallow-to-deep so the plotted line follows the cast,
/// whatever order the instrument wrote the rows in.
pub fn order_by_depth(mut profile: CtdProfile) -> CtdProfile {
    profile
        .samples
        .sort_by(|a, b| a.depth.total_cmp(&b.depth));
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ProfileSample, RawMetoceanRecord};
    use chrono::NaiveDate;

    fn ts(day: u32, h: u32, m: u32) -> NaiveDateTime {
        let (month, day) = if day > 30 { (7, day - 30) } else { (6, day) };
        NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(time: NaiveDateTime) -> RawMetoceanRecord {
        RawMetoceanRecord {
            time,
            tsg_temp: Some(15.0),
            tsg_salinity: Some(35.0),
            wind_speed_true: Some(5.0),
            air_temperature: Some(12.0),
            latitude: Some(-34.0),
            longitude: None,
        }
    }

    fn cruise() -> TimeRange {
        TimeRange::new(ts(28, 17, 10), ts(34, 23, 50))
    }

    #[test]
    fn select_is_inclusive_and_sorted() {
        let rows = vec![
            record(ts(34, 23, 50)),
            record(ts(28, 17, 0)),
            record(ts(30, 12, 0)),
            record(ts(28, 17, 10)),
            record(ts(35, 0, 0)),
            record(ts(29, 1, 0)),
        ];
        let range = cruise();
        let selected = range.select(rows);

        let times: Vec<_> = selected.iter().map(|r| r.time).collect();
        assert_eq!(
            times,
            vec![ts(28, 17, 10), ts(29, 1, 0), ts(30, 12, 0), ts(34, 23, 50)]
        );
        assert!(times.iter().all(|t| range.contains(*t)));
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn select_outside_range_is_empty() {
        let rows = vec![record(ts(1, 0, 0)), record(ts(2, 0, 0))];
        assert!(cruise().select(rows).is_empty());
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let range = TimeRange::new(ts(30, 0, 0), ts(29, 0, 0));
        let rows = vec![record(ts(29, 12, 0))];
        assert!(range.select(rows).is_empty());
    }

    #[test]
    fn select_range_keeps_duplicate_timestamps() {
        let table = RawMetoceanTable {
            records: vec![record(ts(29, 0, 0)), record(ts(29, 0, 0))],
        };
        assert_eq!(table.select_range(&cruise()).records.len(), 2);
    }

    #[test]
    fn order_by_depth_sorts_shallow_to_deep() {
        let sample = |depth: f64| ProfileSample {
            date: String::new(),
            time: String::new(),
            depth,
            temperature: 20.0 - depth / 100.0,
            salinity: 35.0,
        };
        let profile = CtdProfile {
            samples: vec![sample(500.0), sample(2.0), sample(120.0)],
        };
        let ordered = order_by_depth(profile);
        assert_eq!(ordered.depths(), vec![2.0, 120.0, 500.0]);
    }
}
