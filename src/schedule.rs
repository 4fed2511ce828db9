use crate::{
    error::Error,
    field::{FieldKind, Parameter},
    utils,
    value::Value,
    Result,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::{
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
    sync::OnceLock,
};

/// Cap on resolve/invalidate passes of the fixed-point search. A schedule
/// whose day and month constraints can never agree (i.e. `30 2` for day and
/// month) keeps exchanging carries, the cap turns that into `None`.
const MAX_RESOLUTION_PASSES: u32 = 5000;

/// How many consecutive months the day search inspects before giving up,
/// roughly a hundred years. An nth-weekday occurrence that no month ever has
/// (i.e. a sixth Monday) exhausts this horizon.
const MONTH_SCAN_HORIZON: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Represents a validated cron schedule.
///
/// A schedule holds the five parsed field parameters and answers occurrence
/// queries over [`NaiveDateTime`] values. All queries work at minute
/// resolution, seconds of the anchor timestamp are truncated, and both search
/// directions are inclusive of the anchor itself.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub struct Schedule {
    parameters: [Parameter; 5],
    display: OnceLock<String>,
}

impl Schedule {
    /// Parses and validates a five-field schedule string.
    ///
    /// Parsing itself never rejects a field, so validation reports every
    /// faulty field at once via [`Error::InvalidSchedule`]. A wrong number of
    /// fields is reported as [`Error::InvalidFieldCount`] without looking at
    /// the field contents.
    ///
    /// # Examples
    /// ```rust
    /// # use cron_compass::{Result, Schedule};
    /// # fn main() -> Result<()> {
    /// let schedule = Schedule::new("0 12 1-7 * MON")?;
    /// assert_eq!(schedule.to_string(), "0 12 1-7 * MON");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(schedule: impl Into<String>) -> Result<Self> {
        let schedule = schedule.into();
        let fields: Vec<&str> = schedule.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(Error::InvalidFieldCount(schedule));
        }

        Self::from_parameters([
            Parameter::new(FieldKind::Minute, fields[0]),
            Parameter::new(FieldKind::Hour, fields[1]),
            Parameter::new(FieldKind::Day, fields[2]),
            Parameter::new(FieldKind::Month, fields[3]),
            Parameter::new(FieldKind::Weekday, fields[4]),
        ])
    }

    /// Validates five pre-built parameters into a schedule.
    ///
    /// # Panics
    ///
    /// Panics if the parameters aren't ordered as minute, hour, day of month,
    /// month, day of week.
    pub fn from_parameters(parameters: [Parameter; 5]) -> Result<Self> {
        for (parameter, kind) in parameters.iter().zip(FieldKind::ORDER) {
            assert_eq!(
                parameter.kind(),
                kind,
                "parameters must be ordered as minute, hour, day of month, month, day of week"
            );
        }

        let errors: Vec<Error> = parameters.iter().filter_map(|parameter| parameter.validate().err()).collect();
        if errors.is_empty() {
            Ok(Self {
                parameters,
                display: OnceLock::new(),
            })
        } else {
            Err(Error::InvalidSchedule(errors))
        }
    }

    /// All five field parameters, in field order.
    pub fn parameters(&self) -> &[Parameter; 5] {
        &self.parameters
    }

    /// The parameter of a particular field.
    pub fn parameter(&self, kind: FieldKind) -> &Parameter {
        &self.parameters[kind as usize]
    }

    /// The closest matching timestamp at or after `anchor`, or `None` if the
    /// schedule has no reachable occurrence in that direction.
    pub fn next(&self, anchor: &NaiveDateTime) -> Option<NaiveDateTime> {
        self.find_closest(*anchor, Direction::Forward)
    }

    /// The closest matching timestamp at or before `anchor`.
    pub fn previous(&self, anchor: &NaiveDateTime) -> Option<NaiveDateTime> {
        self.find_closest(*anchor, Direction::Backward)
    }

    /// True if the timestamp (with seconds truncated) matches the schedule.
    pub fn matches(&self, timestamp: &NaiveDateTime) -> bool {
        let truncated = truncate(*timestamp);
        self.find_closest(truncated, Direction::Forward) == Some(truncated)
    }

    /// Lazy series of matching timestamps at or after `anchor`, in ascending
    /// order.
    pub fn iter(&self, anchor: &NaiveDateTime) -> impl Iterator<Item = NaiveDateTime> {
        Occurrences::new(self.clone(), *anchor, Direction::Forward)
    }

    /// Lazy series of matching timestamps at or before `anchor`, in
    /// descending order.
    pub fn iter_back(&self, anchor: &NaiveDateTime) -> impl Iterator<Item = NaiveDateTime> {
        Occurrences::new(self.clone(), *anchor, Direction::Backward)
    }

    /// Up to `count` occurrences at or after `anchor`. A zero count is
    /// bumped to one.
    pub fn next_occurrences(&self, anchor: &NaiveDateTime, count: usize) -> impl Iterator<Item = NaiveDateTime> {
        self.iter(anchor).take(count.max(1))
    }

    /// Up to `count` occurrences at or before `anchor`, in descending order.
    /// A zero count is bumped to one.
    pub fn previous_occurrences(&self, anchor: &NaiveDateTime, count: usize) -> impl Iterator<Item = NaiveDateTime> {
        self.iter_back(anchor).take(count.max(1))
    }

    /// All occurrences in the `[from, to)` interval, ascending. An inverted
    /// interval yields nothing.
    pub fn occurrences_between(
        &self,
        from: &NaiveDateTime,
        to: &NaiveDateTime,
    ) -> impl Iterator<Item = NaiveDateTime> {
        let to = *to;
        self.iter(from).take_while(move |timestamp| *timestamp < to)
    }

    /// All occurrences in the `(to, from]` interval, descending. An inverted
    /// interval yields nothing.
    pub fn previous_occurrences_between(
        &self,
        from: &NaiveDateTime,
        to: &NaiveDateTime,
    ) -> impl Iterator<Item = NaiveDateTime> {
        let to = *to;
        self.iter_back(from).take_while(move |timestamp| *timestamp > to)
    }

    /// Fixed-point search for the closest matching timestamp.
    ///
    /// Each pass resolves the minute, hour, day and month levels in order.
    /// Resolving a level to a different value invalidates the levels below it
    /// (they restart from the direction's extreme), except that a minute or
    /// hour field holding a single fixed number is pinned and survives
    /// higher-level changes. Carries propagate upwards: past the last minute
    /// of the hour, the last hour of the day, and so on. The loop ends when
    /// every level is matched simultaneously.
    fn find_closest(&self, anchor: NaiveDateTime, direction: Direction) -> Option<NaiveDateTime> {
        let back = direction == Direction::Backward;
        let mut datum = truncate(anchor);

        let minute_is_fixed = matches!(self.parameter(FieldKind::Minute).value(), Value::Number(_));
        let hour_is_fixed = matches!(self.parameter(FieldKind::Hour).value(), Value::Number(_));
        let (min_minute, max_minute) = FieldKind::Minute.min_max();
        let (min_hour, max_hour) = FieldKind::Hour.min_max();

        let mut matched_minute = 0;
        let mut matched_hour = 0;
        let mut minute_matched = false;
        let mut hour_matched = false;
        let mut day_matched = false;
        let mut month_matched = false;

        let mut passes = 0;
        while !(minute_matched && hour_matched && day_matched && month_matched) {
            passes += 1;
            if passes > MAX_RESOLUTION_PASSES {
                return None;
            }

            if !minute_matched {
                let mut carry = 0i64;
                matched_minute =
                    closest_value(self.parameter(FieldKind::Minute).matches(), datum.minute() as u16, back, &mut carry)?;
                datum = datum
                    .with_minute(matched_minute as u32)?
                    .checked_add_signed(TimeDelta::hours(carry))?;
                minute_matched = true;
            }

            if !hour_matched {
                let mut carry = 0i64;
                matched_hour =
                    closest_value(self.parameter(FieldKind::Hour).matches(), datum.hour() as u16, back, &mut carry)?;
                if matched_hour != datum.hour() as u16 && !minute_is_fixed {
                    minute_matched = false;
                }
                let minute = if minute_matched {
                    matched_minute
                } else if back {
                    max_minute
                } else {
                    min_minute
                };
                datum = datum
                    .with_hour(matched_hour as u32)?
                    .with_minute(minute as u32)?
                    .checked_add_signed(TimeDelta::days(carry))?;
                hour_matched = true;
            }

            if !day_matched {
                let mut carry = 0i32;
                let matched_day = self.closest_day(datum.date(), back, &mut carry)?;
                // A carry means the day changed even when the day-of-month
                // number happens to repeat in the target month.
                if matched_day != datum.day() as u16 || carry != 0 {
                    if !hour_is_fixed {
                        hour_matched = false;
                    }
                    if !minute_is_fixed {
                        minute_matched = false;
                    }
                }
                if carry != 0 {
                    month_matched = false;
                }
                let hour = if hour_matched {
                    matched_hour
                } else if back {
                    max_hour
                } else {
                    min_hour
                };
                let minute = if minute_matched {
                    matched_minute
                } else if back {
                    max_minute
                } else {
                    min_minute
                };
                let (year, month) = utils::add_months(datum.year(), datum.month() as u16, carry);
                datum = NaiveDate::from_ymd_opt(year, month as u32, matched_day as u32)?
                    .and_hms_opt(hour as u32, minute as u32, 0)?;
                day_matched = true;
            }

            if !month_matched {
                let mut carry = 0i64;
                let matched_month =
                    closest_value(self.parameter(FieldKind::Month).matches(), datum.month() as u16, back, &mut carry)?;
                let matched_year = datum.year() + carry as i32;
                if matched_month != datum.month() as u16 || matched_year != datum.year() {
                    day_matched = false;
                    hour_matched = false;
                    minute_matched = false;
                    let day = if back {
                        utils::days_in_month(matched_year, matched_month)
                    } else {
                        1
                    };
                    let hour = if back { max_hour } else { min_hour };
                    let minute = if back { max_minute } else { min_minute };
                    datum = NaiveDate::from_ymd_opt(matched_year, matched_month as u32, day as u32)?
                        .and_hms_opt(hour as u32, minute as u32, 0)?;
                }
                month_matched = true;
            }
        }

        Some(datum)
    }

    /// Closest matching day, scanning month by month from `start`.
    ///
    /// `carry` receives the number of months skipped. The scan restarts from
    /// the first (or, going backward, the last) day of each subsequent month,
    /// so matches on those days are found inclusively.
    fn closest_day(&self, start: NaiveDate, back: bool, carry: &mut i32) -> Option<u16> {
        let mut year = start.year();
        let mut month = start.month() as u16;
        let mut probe = start.day() as u16;

        for _ in 0..MONTH_SCAN_HORIZON {
            let pattern = self.day_pattern(year, month);
            if pattern.binary_search(&probe).is_ok() {
                return Some(probe);
            }
            let found = if back {
                pattern.iter().rev().find(|&&day| day < probe)
            } else {
                pattern.iter().find(|&&day| day > probe)
            };
            if let Some(&day) = found {
                return Some(day);
            }

            let (next_year, next_month) = utils::add_months(year, month, if back { -1 } else { 1 });
            *carry += if back { -1 } else { 1 };
            year = next_year;
            month = next_month;
            probe = if back { utils::days_in_month(year, month) } else { 1 };
        }

        None
    }

    /// Days of a particular month the schedule can fire on.
    ///
    /// The day field is expanded against the month's length first, then
    /// intersected with the day-of-week constraint. An nth-weekday constraint
    /// picks the nth element of the intersection, or nothing if the month has
    /// fewer occurrences.
    fn day_pattern(&self, year: i32, month: u16) -> Vec<u16> {
        let days_in_month = utils::days_in_month(year, month);
        let days = self.parameter(FieldKind::Day).value().expand(FieldKind::Day, days_in_month);

        let weekday = self.parameter(FieldKind::Weekday);
        match weekday.value() {
            Value::Any => days,
            value => {
                let weekdays = weekday.matches();
                let filtered: Vec<u16> = days
                    .into_iter()
                    .filter(|&day| weekdays.contains(&utils::day_of_week(year, month, day)))
                    .collect();
                if let Value::NthWeekday(_, occurrence) = value {
                    occurrence
                        .as_number()
                        .and_then(|n| filtered.get(n as usize - 1))
                        .map(|&day| vec![day])
                        .unwrap_or_default()
                } else {
                    filtered
                }
            }
        }
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = self.display.get_or_init(|| {
            self.parameters
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        });
        write!(f, "{display}")
    }
}

/// Equality is over the canonical string form, i.e. `0 12 * * MON` equals
/// `00 12 * * mon`.
impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
    }
}

// Valid schedules carry no faulty values, so canonical-string equality is
// reflexive for them.
impl Eq for Schedule {}

impl Hash for Schedule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl TryFrom<&str> for Schedule {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Schedule::new(value)
    }
}

impl TryFrom<String> for Schedule {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Schedule::new(value)
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Schedule::new(s)
    }
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}

/// Lazy occurrence series, shared by both directions.
#[derive(Debug, Clone)]
struct Occurrences {
    schedule: Schedule,
    direction: Direction,
    next: Option<NaiveDateTime>,
}

impl Occurrences {
    fn new(schedule: Schedule, anchor: NaiveDateTime, direction: Direction) -> Self {
        let next = schedule.find_closest(anchor, direction);
        Self {
            schedule,
            direction,
            next,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = match self.direction {
            Direction::Forward => current.checked_add_signed(TimeDelta::minutes(1)),
            Direction::Backward => current.checked_sub_signed(TimeDelta::minutes(1)),
        }
        .and_then(|probe| self.schedule.find_closest(probe, self.direction));
        Some(current)
    }
}

fn truncate(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), timestamp.minute(), 0)
        .unwrap_or(timestamp)
}

/// Closest pattern element to `value`, inclusive. When no element lies in the
/// search direction the pattern wraps around and `carry` is set to the unit
/// step towards the adjacent period. Empty patterns have no closest element.
fn closest_value(pattern: &[u16], value: u16, back: bool, carry: &mut i64) -> Option<u16> {
    if pattern.binary_search(&value).is_ok() {
        return Some(value);
    }

    if back {
        match pattern.iter().rev().find(|&&item| item < value) {
            Some(&item) => Some(item),
            None => {
                *carry = -1;
                pattern.last().copied()
            }
        }
    } else {
        match pattern.iter().find(|&&item| item > value) {
            Some(&item) => Some(item),
            None => {
                *carry = 1;
                pattern.first().copied()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rstest_reuse::{apply, template};
    use std::time::Duration;

    fn dt(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .unwrap_or_else(|e| panic!("invalid test timestamp '{value}': {e}"))
    }

    #[template]
    #[rstest]
    #[case("* * * * *")]
    #[case("0 12 * * *")]
    #[case("0 12 1-7 * MON")]
    #[case("* 12 1-7 1/3 MON")]
    #[case("0 12 * * 1#1")]
    #[case("0 1,2,3,4/2 * * *")]
    #[case("*/15 */3 25-31 JAN-MAR FRI")]
    #[case("30-59/2 0 1 1 SUN#2")]
    fn valid_schedules(#[case] schedule: &str) {}

    #[apply(valid_schedules)]
    fn create_valid_schedule(#[case] schedule: &str) {
        assert!(Schedule::new(schedule).is_ok(), "schedule = {schedule}");
    }

    #[apply(valid_schedules)]
    fn canonical_display_round_trip(#[case] schedule: &str) {
        let parsed = Schedule::new(schedule).unwrap();
        let canonical = parsed.to_string();
        assert_eq!(
            Schedule::new(canonical.as_str()).unwrap().to_string(),
            canonical,
            "schedule = {schedule}"
        );
    }

    #[rstest]
    #[case("")]
    #[case("0 12")]
    #[case("1 2 3 4")]
    #[case("1 2 3 4 5 6")]
    fn wrong_field_count(#[case] schedule: &str) {
        assert!(
            matches!(Schedule::new(schedule), Err(Error::InvalidFieldCount(s)) if s == schedule),
            "schedule = {schedule}"
        );
    }

    #[rstest]
    #[case("62 0 1 1 *", 1)]
    #[case("0 0 1 1 MON#7", 1)]
    #[case("62 25 1 1 *", 2)]
    #[case("62 25 33 0 7", 5)]
    fn validation_reports_every_faulty_field(#[case] schedule: &str, #[case] expected: usize) {
        let error = Schedule::new(schedule).unwrap_err();
        assert!(matches!(error, Error::InvalidSchedule(_)), "schedule = {schedule}");
        assert_eq!(error.details().len(), expected, "schedule = {schedule}");
    }

    #[rstest]
    #[case("0 12 * * *", "2020-09-29T13:00:00", "2020-09-30T12:00:00")]
    #[case("0 12 * * *", "2020-09-29T12:00:00", "2020-09-29T12:00:00")]
    #[case("0 12 * * *", "2020-09-29T12:00:30", "2020-09-29T12:00:00")]
    #[case("25 * * * *", "2020-09-29T00:21:00", "2020-09-29T00:25:00")]
    #[case("0 */3 * * *", "2020-09-29T13:01:00", "2020-09-29T15:00:00")]
    #[case("0 1,2,3,4/2 * * *", "2020-09-29T13:00:00", "2020-09-29T14:00:00")]
    #[case("0 12 1-7 * MON", "2020-09-29T13:00:00", "2020-10-05T12:00:00")]
    #[case("* 12 1-7 1/3 MON", "2020-11-29T23:15:00", "2021-01-04T12:00:00")]
    #[case("0 12 * * 1#1", "2020-08-01T00:00:00", "2020-08-03T12:00:00")]
    #[case("0 12 * * 1#5", "2020-08-01T00:00:00", "2020-08-31T12:00:00")]
    #[case("0 0 29 2 *", "2020-03-01T00:00:00", "2024-02-29T00:00:00")]
    #[case("0 0 31 * *", "2020-09-10T00:00:00", "2020-10-31T00:00:00")]
    #[case("*/20 5 15 * *", "2020-01-10T05:07:00", "2020-01-15T05:00:00")]
    #[case("30 */5 8 * MON", "2020-09-08T02:07:00", "2021-02-08T00:30:00")]
    #[timeout(Duration::from_secs(1))]
    fn next(#[case] schedule: &str, #[case] anchor: &str, #[case] expected: &str) {
        let schedule = Schedule::new(schedule).unwrap();
        assert_eq!(schedule.next(&dt(anchor)), Some(dt(expected)), "schedule = {schedule}");
    }

    #[rstest]
    #[case("0 12 * * *", "2020-09-29T11:00:00", "2020-09-28T12:00:00")]
    #[case("0 12 * * *", "2020-09-29T12:00:00", "2020-09-29T12:00:00")]
    #[case("0 1,2,3,4/2 * * *", "2020-09-29T11:00:00", "2020-09-29T10:00:00")]
    #[case("30 * * * *", "2020-09-29T10:15:00", "2020-09-29T09:30:00")]
    #[case("0 12 1-7 * MON", "2020-09-29T11:00:00", "2020-09-07T12:00:00")]
    #[case("0 12 31 * *", "2020-05-01T00:00:00", "2020-03-31T12:00:00")]
    #[case("0 12 1-7 2/2 MON", "2020-09-29T11:00:00", "2020-08-03T12:00:00")]
    #[case("*/20 5 15 * *", "2020-01-20T05:07:00", "2020-01-15T05:40:00")]
    #[case("30 */5 8 * MON", "2020-09-08T02:07:00", "2020-06-08T20:30:00")]
    #[timeout(Duration::from_secs(1))]
    fn previous(#[case] schedule: &str, #[case] anchor: &str, #[case] expected: &str) {
        let schedule = Schedule::new(schedule).unwrap();
        assert_eq!(schedule.previous(&dt(anchor)), Some(dt(expected)), "schedule = {schedule}");
    }

    #[rstest]
    #[case("0 0 30 2 *")]
    #[case("5-1 0 * * *")]
    #[timeout(Duration::from_secs(30))]
    fn unreachable_schedule_yields_none(#[case] schedule: &str) {
        let schedule = Schedule::new(schedule).unwrap();
        assert_eq!(schedule.next(&dt("2020-01-01T00:00:00")), None, "schedule = {schedule}");
        assert_eq!(schedule.previous(&dt("2020-01-01T00:00:00")), None, "schedule = {schedule}");
    }

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    fn first_monday_noon_series() {
        let schedule = Schedule::new("0 12 * * 1#1").unwrap();
        let occurrences: Vec<NaiveDateTime> = schedule.next_occurrences(&dt("2020-08-01T00:00:00"), 6).collect();

        let expected: Vec<NaiveDateTime> = [
            "2020-08-03T12:00:00",
            "2020-09-07T12:00:00",
            "2020-10-05T12:00:00",
            "2020-11-02T12:00:00",
            "2020-12-07T12:00:00",
            "2021-01-04T12:00:00",
        ]
        .iter()
        .map(|s| dt(s))
        .collect();

        assert_eq!(occurrences, expected);
    }

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    fn backward_series_descends_without_gaps() {
        let schedule = Schedule::new("0 12 1-7 * MON").unwrap();
        let occurrences: Vec<NaiveDateTime> = schedule.previous_occurrences(&dt("2020-10-29T13:00:00"), 3).collect();

        let expected: Vec<NaiveDateTime> = ["2020-10-05T12:00:00", "2020-09-07T12:00:00", "2020-08-03T12:00:00"]
            .iter()
            .map(|s| dt(s))
            .collect();

        assert_eq!(occurrences, expected);
    }

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    fn zero_count_still_yields_one_occurrence() {
        let schedule = Schedule::new("0 12 * * *").unwrap();
        assert_eq!(
            schedule.next_occurrences(&dt("2020-09-29T13:00:00"), 0).count(),
            1
        );
        assert_eq!(
            schedule.previous_occurrences(&dt("2020-09-29T13:00:00"), 0).count(),
            1
        );
    }

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    fn occurrences_between_is_half_open() {
        let schedule = Schedule::new("0 12 * * *").unwrap();

        let within: Vec<NaiveDateTime> = schedule
            .occurrences_between(&dt("2020-09-01T00:00:00"), &dt("2020-09-04T12:00:00"))
            .collect();
        let expected: Vec<NaiveDateTime> = ["2020-09-01T12:00:00", "2020-09-02T12:00:00", "2020-09-03T12:00:00"]
            .iter()
            .map(|s| dt(s))
            .collect();
        assert_eq!(within, expected);

        // Inverted interval.
        assert_eq!(
            schedule
                .occurrences_between(&dt("2020-09-04T00:00:00"), &dt("2020-09-01T00:00:00"))
                .count(),
            0
        );
    }

    #[rstest]
    #[timeout(Duration::from_secs(1))]
    fn previous_occurrences_between_excludes_lower_bound() {
        let schedule = Schedule::new("0 12 * * *").unwrap();

        let within: Vec<NaiveDateTime> = schedule
            .previous_occurrences_between(&dt("2020-09-04T13:00:00"), &dt("2020-09-02T12:00:00"))
            .collect();
        let expected: Vec<NaiveDateTime> = ["2020-09-04T12:00:00", "2020-09-03T12:00:00"]
            .iter()
            .map(|s| dt(s))
            .collect();
        assert_eq!(within, expected);

        assert_eq!(
            schedule
                .previous_occurrences_between(&dt("2020-09-01T00:00:00"), &dt("2020-09-04T00:00:00"))
                .count(),
            0
        );
    }

    #[rstest]
    #[timeout(Duration::from_secs(5))]
    fn forward_iterator_is_strictly_increasing() {
        let schedule = Schedule::new("*/20 */6 * * *").unwrap();
        let occurrences: Vec<NaiveDateTime> = schedule.iter(&dt("2020-12-30T07:11:00")).take(30).collect();

        assert_eq!(occurrences.len(), 30);
        for pair in occurrences.windows(2) {
            assert!(pair[0] < pair[1], "out of order: {} then {}", pair[0], pair[1]);
        }
        for occurrence in &occurrences {
            assert!(schedule.matches(occurrence), "non-matching occurrence: {occurrence}");
        }
    }

    #[rstest]
    #[case("0 12 * * 1#1", "2020-11-02T12:00:00", true)]
    #[case("0 12 * * 1#1", "2020-11-02T12:00:30", true)]
    #[case("0 12 * * 1#1", "2020-11-09T12:00:00", false)]
    #[case("0 12 * * 1#1", "2020-11-02T12:01:00", false)]
    #[case("* * * * *", "2020-11-02T23:59:59", true)]
    #[timeout(Duration::from_secs(1))]
    fn matches(#[case] schedule: &str, #[case] timestamp: &str, #[case] expected: bool) {
        let schedule = Schedule::new(schedule).unwrap();
        assert_eq!(schedule.matches(&dt(timestamp)), expected, "timestamp = {timestamp}");
    }

    #[rstest]
    #[case("0 12 * * *", "2020-09-29T13:00:00")]
    #[case("*/7 3 * MAR SUN", "2021-06-15T08:30:00")]
    #[case("0 12 1-7 * MON", "2020-02-29T23:59:00")]
    #[timeout(Duration::from_secs(1))]
    fn closest_matches_are_inclusive_and_stable(#[case] schedule: &str, #[case] anchor: &str) {
        let schedule = Schedule::new(schedule).unwrap();
        let anchor = dt(anchor);

        let next = schedule.next(&anchor).unwrap();
        assert!(next >= anchor);
        assert!(schedule.matches(&next));
        assert_eq!(schedule.next(&next), Some(next));

        let previous = schedule.previous(&anchor).unwrap();
        assert!(previous <= anchor);
        assert!(schedule.matches(&previous));
        assert_eq!(schedule.previous(&previous), Some(previous));

        // Re-anchoring just before a match returns the same instant.
        let nudged = next.checked_sub_signed(TimeDelta::minutes(1)).unwrap();
        assert_eq!(schedule.next(&nudged), Some(next));
    }

    #[test]
    fn conversions() {
        let schedule: Schedule = "0 12 * * mon".parse().unwrap();
        assert_eq!(schedule, Schedule::try_from("00 12 * * MON").unwrap());
        assert_eq!(String::from(schedule), "0 12 * * MON");
        assert!(Schedule::try_from("not a schedule".to_string()).is_err());
    }

    #[test]
    fn equality_and_hashing_are_canonical() {
        use std::collections::HashSet;

        let first = Schedule::new("0 12 * * mon").unwrap();
        let second = Schedule::new("00 12 * * MON").unwrap();
        assert_eq!(first, second);

        let mut set = HashSet::new();
        set.insert(first);
        assert!(set.contains(&second));
    }

    #[test]
    #[should_panic(expected = "parameters must be ordered")]
    fn from_parameters_rejects_misordered_fields() {
        let _ = Schedule::from_parameters([
            Parameter::new(FieldKind::Hour, "0"),
            Parameter::new(FieldKind::Minute, "12"),
            Parameter::new(FieldKind::Day, "*"),
            Parameter::new(FieldKind::Month, "*"),
            Parameter::new(FieldKind::Weekday, "*"),
        ]);
    }
}
