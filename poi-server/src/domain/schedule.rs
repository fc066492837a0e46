//! Weekly opening-hours schedules.
//!
//! POI layers carry opening hours as a small rule language, for example
//! `Mo-Fr 09:00-17:00; Sa 10:00-14:00, 18:00-23:30`. Each `;`-separated clause
//! names a day (or an inclusive day range) followed by one or more
//! comma-separated `HH:MM-HH:MM` intervals. An interval whose end is earlier
//! than its start runs past midnight.
//!
//! Parsing is forgiving: clauses with unknown day codes and intervals with
//! non-numeric components are dropped rather than reported, because the data
//! comes from hand-edited attribute tables. [`is_open`] never fails.

use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Two-letter day codes, indexed from Sunday.
const DAY_CODES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Errors from parsing a schedule or one of its clauses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Clause has a day token but nothing after it
    #[error("clause has no time ranges: {0:?}")]
    MissingTimes(String),

    /// Day token is not a known day code or day range
    #[error("unknown day token: {0:?}")]
    UnknownDay(String),

    /// Every interval in the clause was malformed
    #[error("clause has no valid time range: {0:?}")]
    NoValidInterval(String),

    /// No clause in the schedule survived parsing
    #[error("schedule contains no usable clause")]
    Empty,
}

/// Inclusive range of weekdays, 0 = Sunday through 6 = Saturday.
///
/// Ranges never wrap across the end of the week: `Fr-Mo` parses, but
/// `start > end` means it matches no day at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: u8,
    end: u8,
}

impl DayRange {
    /// Parse a day token: either a single code (`We`) or a range (`Mo-Fr`).
    pub fn parse(token: &str) -> Result<Self, ScheduleError> {
        let unknown = || ScheduleError::UnknownDay(token.to_string());

        if token.contains('-') {
            let mut parts = token.split('-');
            let start = parts.next().and_then(day_index).ok_or_else(unknown)?;
            let end = parts.next().and_then(day_index).ok_or_else(unknown)?;
            Ok(Self { start, end })
        } else {
            let day = day_index(token).ok_or_else(unknown)?;
            Ok(Self {
                start: day,
                end: day,
            })
        }
    }

    /// First day of the range.
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> u8 {
        self.end
    }

    /// Whether `weekday` (days from Sunday) falls inside the range.
    pub fn contains(&self, weekday: u8) -> bool {
        self.start <= weekday && weekday <= self.end
    }
}

fn day_index(code: &str) -> Option<u8> {
    DAY_CODES
        .iter()
        .position(|c| *c == code)
        .map(|i| i as u8)
}

/// Half-open interval of minutes since midnight.
///
/// `end` may exceed [`MINUTES_PER_DAY`] when the interval runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: u32,
    end: u32,
}

impl TimeInterval {
    /// Build an interval from minute offsets, pushing `end` into the next
    /// day when it is earlier than `start`.
    pub fn new(start: u32, end: u32) -> Self {
        let end = if end < start {
            end + MINUTES_PER_DAY
        } else {
            end
        };
        Self { start, end }
    }

    /// Parse `HH:MM-HH:MM`. Returns `None` for anything malformed.
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split('-');
        let start = parse_clock(parts.next()?)?;
        let end = parse_clock(parts.next()?)?;
        Some(Self::new(start, end))
    }

    /// Start, in minutes since midnight.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// End, in minutes since midnight of the start day.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Whether `minutes` lies in `[start, end)`.
    ///
    /// `minutes` is compared as-is: an overnight interval such as
    /// `22:00-02:00` covers 22:00 up to midnight of its own day only.
    pub fn contains(&self, minutes: u32) -> bool {
        self.start <= minutes && minutes < self.end
    }
}

/// Parse `HH:MM` into minutes since midnight.
///
/// Components are not range-checked beyond being non-negative integers;
/// trailing `:SS` components are ignored.
fn parse_clock(s: &str) -> Option<u32> {
    let mut parts = s.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// One clause of a schedule: a day range and the intervals open on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRule {
    pub days: DayRange,
    pub intervals: Vec<TimeInterval>,
}

impl WeeklyRule {
    /// Parse a single clause such as `Mo-Fr 09:00-12:00, 13:00-17:00`.
    pub fn parse(clause: &str) -> Result<Self, ScheduleError> {
        let clause = clause.trim();
        let (day_token, times) = clause
            .split_once(char::is_whitespace)
            .ok_or_else(|| ScheduleError::MissingTimes(clause.to_string()))?;

        let days = DayRange::parse(day_token)?;

        let intervals: Vec<TimeInterval> = times
            .split(',')
            .map(str::trim)
            .filter(|t| t.contains('-'))
            .filter_map(TimeInterval::parse)
            .collect();

        if intervals.is_empty() {
            return Err(ScheduleError::NoValidInterval(clause.to_string()));
        }

        Ok(Self { days, intervals })
    }

    /// Whether the rule covers `minutes` on `weekday`.
    pub fn matches(&self, weekday: u8, minutes: u32) -> bool {
        self.days.contains(weekday) && self.intervals.iter().any(|i| i.contains(minutes))
    }
}

/// A parsed opening-hours schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    rules: Vec<WeeklyRule>,
}

impl Schedule {
    /// Parse a schedule, dropping clauses that do not parse.
    ///
    /// Fails only when no clause survives.
    ///
    /// # Examples
    ///
    /// ```
    /// use poi_server::domain::Schedule;
    ///
    /// let schedule = Schedule::parse("Mo-Fr 09:00-17:00; Xx 10:00-11:00").unwrap();
    /// assert_eq!(schedule.rules().len(), 1);
    ///
    /// assert!(Schedule::parse("closed").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ScheduleError> {
        let rules: Vec<WeeklyRule> = text
            .split(';')
            .filter_map(|clause| WeeklyRule::parse(clause).ok())
            .collect();

        if rules.is_empty() {
            return Err(ScheduleError::Empty);
        }

        Ok(Self { rules })
    }

    /// The clauses that survived parsing, in textual order.
    pub fn rules(&self) -> &[WeeklyRule] {
        &self.rules
    }

    /// Whether any clause covers the local wall-clock time `at`.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        let weekday = at.weekday().num_days_from_sunday() as u8;
        let minutes = at.hour() * 60 + at.minute();
        self.rules.iter().any(|r| r.matches(weekday, minutes))
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether a POI with the given opening-hours text is open at `at`.
///
/// Absent or unparseable schedules count as closed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use poi_server::domain::is_open;
///
/// // 2024-03-12 is a Tuesday
/// let at = NaiveDate::from_ymd_opt(2024, 3, 12)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// assert!(is_open(Some("Mo-Fr 09:00-17:00"), at));
/// assert!(!is_open(None, at));
/// ```
pub fn is_open(schedule: Option<&str>, at: NaiveDateTime) -> bool {
    schedule
        .and_then(|text| Schedule::parse(text).ok())
        .is_some_and(|s| s.is_open_at(at))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn any_instant() -> impl Strategy<Value = NaiveDateTime> {
        (0i64..(7 * 24 * 60)).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::minutes(offset)
        })
    }

    proptest! {
        /// Evaluation is total over arbitrary text
        #[test]
        fn never_panics(text in ".*", at in any_instant()) {
            let _ = is_open(Some(&text), at);
        }

        /// A whole-week clause is open at every minute of the day
        #[test]
        fn full_week_always_open(at in any_instant()) {
            prop_assert!(is_open(Some("Su-Sa 00:00-24:00"), at));
        }

        /// Clause order only matters for which clause matches, not whether one does
        #[test]
        fn clause_order_irrelevant(at in any_instant()) {
            let a = "Mo-Fr 09:00-17:00; Sa 10:00-02:00";
            let b = "Sa 10:00-02:00; Mo-Fr 09:00-17:00";
            prop_assert_eq!(is_open(Some(a), at), is_open(Some(b), at));
        }
    }
}
