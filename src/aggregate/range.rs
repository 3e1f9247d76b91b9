use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Calendar date span covered by a set of orbits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    begin: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, `None` if `end` precedes `begin`
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }

    /// Range from the earliest orbit start and the latest orbit end
    pub fn from_datetimes(begin: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        Self::new(begin.date(), end.date())
    }

    /// First calendar date
    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    /// Last calendar date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both ends fall on the same calendar day
    pub fn is_single_day(&self) -> bool {
        self.begin == self.end
    }

    /// Compact token used in output file names, e.g. `20190801_20190803`
    pub fn file_token(&self) -> String {
        format!("{}_{}", self.begin.format("%Y%m%d"), self.end.format("%Y%m%d"))
    }

    /// Human-readable form, e.g. `August 01, 2019 - August 03, 2019`,
    /// or just `August 01, 2019` for a single day
    pub fn display_text(&self) -> String {
        let end = self.end.format("%B %d, %Y").to_string();
        if self.is_single_day() {
            end
        } else {
            format!("{} - {}", self.begin.format("%B %d, %Y"), end)
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Running min/max over decoded orbit datetimes
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RangeReducer {
    earliest_start: Option<NaiveDateTime>,
    latest_end: Option<NaiveDateTime>,
}

impl RangeReducer {
    pub(crate) fn add_starts(&mut self, starts: &[NaiveDateTime]) {
        if let Some(min) = starts.iter().min().copied() {
            self.earliest_start = Some(self.earliest_start.map_or(min, |cur| cur.min(min)));
        }
    }

    pub(crate) fn add_ends(&mut self, ends: &[NaiveDateTime]) {
        if let Some(max) = ends.iter().max().copied() {
            self.latest_end = Some(self.latest_end.map_or(max, |cur| cur.max(max)));
        }
    }

    pub(crate) fn earliest_start(&self) -> Option<NaiveDateTime> {
        self.earliest_start
    }

    pub(crate) fn latest_end(&self) -> Option<NaiveDateTime> {
        self.latest_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(DateRange::new(date(2019, 8, 2), date(2019, 8, 1)).is_none());
        assert!(DateRange::new(date(2019, 8, 1), date(2019, 8, 1)).is_some());
    }

    #[test]
    fn test_file_token() {
        let range = DateRange::new(date(2019, 8, 1), date(2019, 8, 3)).unwrap();
        assert_eq!(range.file_token(), "20190801_20190803");
    }

    #[test]
    fn test_display_range_form() {
        let range = DateRange::new(date(2019, 8, 1), date(2019, 8, 3)).unwrap();
        assert!(!range.is_single_day());
        assert_eq!(range.to_string(), "August 01, 2019 - August 03, 2019");
    }

    #[test]
    fn test_display_single_day_form() {
        let range = DateRange::new(date(2019, 8, 2), date(2019, 8, 2)).unwrap();
        assert!(range.is_single_day());
        assert_eq!(range.display_text(), "August 02, 2019");
        assert_eq!(range.file_token(), "20190802_20190802");
    }

    #[test]
    fn test_from_datetimes_truncates_to_dates() {
        let begin = date(2019, 8, 2).and_hms_opt(23, 59, 59).unwrap();
        let end = date(2019, 8, 2).and_hms_opt(0, 0, 1).unwrap();
        // same day, even though the end time of day precedes the begin time of day
        let range = DateRange::from_datetimes(begin, end).unwrap();
        assert!(range.is_single_day());
    }

    #[test]
    fn test_reducer_min_max() {
        let t = |h| date(2019, 8, 2).and_hms_opt(h, 0, 0).unwrap();
        let mut reducer = RangeReducer::default();
        assert_eq!(reducer.earliest_start(), None);

        reducer.add_starts(&[t(5), t(3)]);
        reducer.add_starts(&[]);
        reducer.add_starts(&[t(4)]);
        reducer.add_ends(&[t(6)]);
        reducer.add_ends(&[t(9), t(7)]);

        assert_eq!(reducer.earliest_start(), Some(t(3)));
        assert_eq!(reducer.latest_end(), Some(t(9)));
    }
}
