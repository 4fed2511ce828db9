use crate::{field::FieldKind, series::SeriesWithStep, utils};
use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

pub(crate) const DAYS_OF_WEEK: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
pub(crate) const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Parsed form of a single schedule field token.
///
/// Parsing never fails: a token that matches no known shape becomes
/// [`Invalid`](Value::Invalid) and is reported during validation, so a whole
/// schedule can be checked in one pass with every faulty field named.
#[derive(Debug, Clone)]
pub enum Value {
    /// Any value (`*`).
    Any,
    /// Single numeric value.
    Number(u16),
    /// Weekday mnemonic (`SUN`..`SAT`), stored as 0-6.
    NamedWeekday(u16),
    /// Month mnemonic (`JAN`..`DEC`), stored as 1-12.
    NamedMonth(u16),
    /// Comma-separated list of values or patterns.
    List(Vec<Value>),
    /// Inclusive range of values (`0-15`).
    Range(Box<Value>, Box<Value>),
    /// Repeating values with a step (`*/12`, `10/5`).
    Step(Box<Value>, Box<Value>),
    /// Range of values with a step (`30-59/2`).
    SteppedRange(Box<Value>, Box<Value>, Box<Value>),
    /// The nth weekday within the month (`FRI#1`, `1#4`).
    NthWeekday(Box<Value>, Box<Value>),
    /// Unrecognized token, preserved verbatim for validation reporting.
    Invalid {
        /// Original token text.
        raw: String,
        /// Why the token was rejected.
        reason: String,
    },
}

impl Value {
    /// Parses a single field token.
    ///
    /// Composite shapes (lists, ranges, steps, nth-weekday) are split first
    /// and each part is parsed recursively, so a malformed part surfaces as a
    /// nested [`Invalid`](Value::Invalid) with its own reason.
    pub fn parse(input: &str) -> Self {
        if input == "*" {
            return Value::Any;
        }
        if let Ok(number) = input.parse::<u16>() {
            return Value::Number(number);
        }
        if let Some(index) = utils::parse_name_value(input, &DAYS_OF_WEEK) {
            return Value::NamedWeekday(index);
        }
        if let Some(index) = utils::parse_name_value(input, &MONTHS) {
            return Value::NamedMonth(index + 1);
        }
        if input.contains(',') {
            return Value::List(input.split(',').map(Value::parse).collect());
        }
        if let Some((start, rest)) = input.split_once('-') {
            if let Some((end, step)) = rest.split_once('/') {
                return Value::SteppedRange(
                    Box::new(Value::parse(start)),
                    Box::new(Value::parse(end)),
                    Box::new(Value::parse(step)),
                );
            }
            return Value::Range(Box::new(Value::parse(start)), Box::new(Value::parse(rest)));
        }
        if let Some((start, step)) = input.split_once('/') {
            return Value::Step(Box::new(Value::parse(start)), Box::new(Value::parse(step)));
        }
        if let Some((weekday, occurrence)) = input.split_once('#') {
            return Value::NthWeekday(Box::new(Value::parse(weekday)), Box::new(Value::parse(occurrence)));
        }

        let reason = if input.is_empty() {
            "empty value".to_string()
        } else {
            format!("'{input}' is not a valid value")
        };
        Value::Invalid {
            raw: input.to_string(),
            reason,
        }
    }

    /// Numeric content of a singular value.
    pub(crate) fn as_number(&self) -> Option<u16> {
        match self {
            Value::Number(value) | Value::NamedWeekday(value) | Value::NamedMonth(value) => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn is_singular(&self) -> bool {
        self.as_number().is_some()
    }

    /// True if the value, or any of its parts, failed to parse.
    pub fn has_fault(&self) -> bool {
        match self {
            Value::Invalid { .. } => true,
            Value::List(items) => items.iter().any(Value::has_fault),
            Value::Range(start, end) => start.has_fault() || end.has_fault(),
            Value::Step(start, step) => start.has_fault() || step.has_fault(),
            Value::SteppedRange(start, end, step) => start.has_fault() || end.has_fault() || step.has_fault(),
            Value::NthWeekday(weekday, occurrence) => weekday.has_fault() || occurrence.has_fault(),
            _ => false,
        }
    }

    /// Sorted, deduplicated set of concrete field values, clipped to
    /// `domain_max` (the day field is expanded against the length of a
    /// particular month).
    ///
    /// An inverted range produces an empty set, as does a singular value that
    /// exceeds `domain_max`. For nth-weekday values only the weekday part is
    /// expanded, selection of the nth occurrence happens during day matching.
    pub(crate) fn expand(&self, kind: FieldKind, domain_max: u16) -> Vec<u16> {
        let mut out = BTreeSet::new();
        self.collect_into(kind, kind.min_max().0, domain_max, &mut out);
        out.into_iter().collect()
    }

    fn collect_into(&self, kind: FieldKind, min: u16, max: u16, out: &mut BTreeSet<u16>) {
        match self {
            Value::Any => out.extend(SeriesWithStep::new(min, max, 1)),
            Value::Number(value) | Value::NamedWeekday(value) | Value::NamedMonth(value) => {
                if (min..=max).contains(value) {
                    out.insert(*value);
                }
            }
            Value::List(items) => {
                for item in items {
                    item.collect_into(kind, min, max, out);
                }
            }
            Value::Range(start, end) => {
                if let (Some(start), Some(end)) = (start.as_number(), end.as_number()) {
                    let end = end.min(max);
                    if start >= min && start <= end {
                        out.extend(SeriesWithStep::new(start, end, 1));
                    }
                }
            }
            Value::Step(start, step) => {
                let start = if matches!(**start, Value::Any) {
                    Some(min)
                } else {
                    start.as_number()
                };
                if let (Some(start), Some(step)) = (start, step.as_number()) {
                    if step > 0 && start >= min && start <= max {
                        out.extend(SeriesWithStep::new(start, max, step));
                    }
                }
            }
            Value::SteppedRange(start, end, step) => {
                if let (Some(start), Some(end), Some(step)) = (start.as_number(), end.as_number(), step.as_number()) {
                    let end = end.min(max);
                    if step > 0 && start >= min && start <= end {
                        out.extend(SeriesWithStep::new(start, end, step));
                    }
                }
            }
            Value::NthWeekday(weekday, _) => weekday.collect_into(kind, min, max, out),
            Value::Invalid { .. } => {}
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Any => write!(f, "*"),
            Value::Number(value) => write!(f, "{value}"),
            Value::NamedWeekday(value) => write!(f, "{}", DAYS_OF_WEEK[*value as usize]),
            Value::NamedMonth(value) => write!(f, "{}", MONTHS[*value as usize - 1]),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", items.join(","))
            }
            Value::Range(start, end) => write!(f, "{start}-{end}"),
            Value::Step(start, step) => write!(f, "{start}/{step}"),
            Value::SteppedRange(start, end, step) => write!(f, "{start}-{end}/{step}"),
            Value::NthWeekday(weekday, occurrence) => write!(f, "{weekday}#{occurrence}"),
            Value::Invalid { raw, .. } => write!(f, "{raw}"),
        }
    }
}

/// Equality is over the canonical string form, so `SUN` equals `sun` but not
/// `0`. Values with parse faults are never equal to anything, themselves
/// included, which is why `Eq` is deliberately not implemented.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        !self.has_fault() && !other.has_fault() && self.to_string() == other.to_string()
    }
}
