use crate::{error::Error, value::Value, Result};
use std::{
    fmt::{Display, Formatter},
    sync::OnceLock,
};

/// Position of a field within a five-field schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Minute of the hour, 0-59.
    Minute = 0,
    /// Hour of the day, 0-23.
    Hour = 1,
    /// Day of the month, 1-31.
    Day = 2,
    /// Month of the year, 1-12.
    Month = 3,
    /// Day of the week, 0 (Sunday) to 6 (Saturday).
    Weekday = 4,
}

impl FieldKind {
    pub(crate) const ORDER: [FieldKind; 5] = [
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::Day,
        FieldKind::Month,
        FieldKind::Weekday,
    ];

    /// Inclusive bounds of the field's value domain.
    pub fn min_max(&self) -> (u16, u16) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::Day => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::Weekday => (0, 6),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::Day => "day of month",
            FieldKind::Month => "month",
            FieldKind::Weekday => "day of week",
        };
        write!(f, "{name}")
    }
}

/// A single schedule field: a parsed [`Value`] bound to its [`FieldKind`].
///
/// Construction never fails, faulty tokens are carried along and surface from
/// [`validate()`](Parameter::validate). The expanded match set is computed
/// lazily and cached.
#[derive(Debug, Clone)]
pub struct Parameter {
    kind: FieldKind,
    value: Value,
    matches: OnceLock<Vec<u16>>,
}

impl Parameter {
    /// Parses a raw field token.
    pub fn new(kind: FieldKind, input: &str) -> Self {
        Self::from_value(kind, Value::parse(input))
    }

    /// Wraps an already parsed value.
    pub fn from_value(kind: FieldKind, value: Value) -> Self {
        Self {
            kind,
            value,
            matches: OnceLock::new(),
        }
    }

    /// Field this parameter belongs to.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Parsed value of the field.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// True if the value would fail validation.
    pub fn is_fault(&self) -> bool {
        self.validate().is_err()
    }

    /// Checks the value against the field's domain and allowed shapes.
    pub fn validate(&self) -> Result<()> {
        validate_value(self.kind, &self.value)
    }

    /// Sorted set of concrete values the field matches, over its full domain.
    ///
    /// The day field is re-expanded per month by the matching engine, the
    /// cached set here covers the full 1-31 domain.
    pub(crate) fn matches(&self) -> &[u16] {
        self.matches
            .get_or_init(|| self.value.expand(self.kind, self.kind.min_max().1))
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

fn validate_value(kind: FieldKind, value: &Value) -> Result<()> {
    let (min, max) = kind.min_max();
    match value {
        Value::Any => Ok(()),
        Value::Invalid { reason, .. } => Err(Error::InvalidValue {
            kind,
            reason: reason.clone(),
        }),
        Value::Number(number) => {
            if (min..=max).contains(number) {
                Ok(())
            } else {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("{number} is out of the {min}-{max} range"),
                })
            }
        }
        // Parsing only produces in-range named values, but the variants are
        // public, so constructed ones are range-checked before the value is
        // formatted into any message.
        Value::NamedWeekday(number) => {
            let (weekday_min, weekday_max) = FieldKind::Weekday.min_max();
            if !(weekday_min..=weekday_max).contains(number) {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("{number} is out of the {weekday_min}-{weekday_max} range"),
                })
            } else if kind == FieldKind::Weekday {
                Ok(())
            } else {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("'{value}' is only allowed in the day of week field"),
                })
            }
        }
        Value::NamedMonth(number) => {
            let (month_min, month_max) = FieldKind::Month.min_max();
            if !(month_min..=month_max).contains(number) {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("{number} is out of the {month_min}-{month_max} range"),
                })
            } else if kind == FieldKind::Month {
                Ok(())
            } else {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("'{value}' is only allowed in the month field"),
                })
            }
        }
        Value::List(items) => items.iter().try_for_each(|item| validate_value(kind, item)),
        Value::Range(start, end) => {
            validate_bound(kind, start)?;
            validate_bound(kind, end)
        }
        Value::Step(start, step) => {
            if !matches!(**start, Value::Any) {
                validate_bound(kind, start)?;
            }
            validate_step(kind, step)
        }
        Value::SteppedRange(start, end, step) => {
            validate_bound(kind, start)?;
            validate_bound(kind, end)?;
            validate_step(kind, step)
        }
        Value::NthWeekday(weekday, occurrence) => {
            if kind != FieldKind::Weekday {
                return Err(Error::InvalidValue {
                    kind,
                    reason: format!("'{value}' is only allowed in the day of week field"),
                });
            }
            validate_bound(kind, weekday)?;
            if matches!(**occurrence, Value::Number(n) if (1..=6).contains(&n)) {
                Ok(())
            } else {
                Err(Error::InvalidValue {
                    kind,
                    reason: format!("occurrence in '{value}' must be a number between 1 and 6"),
                })
            }
        }
    }
}

/// Range bounds, step starts and nth-weekday bases have to be single values.
fn validate_bound(kind: FieldKind, value: &Value) -> Result<()> {
    match value {
        Value::Invalid { reason, .. } => Err(Error::InvalidValue {
            kind,
            reason: reason.clone(),
        }),
        singular if singular.is_singular() => validate_value(kind, singular),
        other => Err(Error::InvalidValue {
            kind,
            reason: format!("'{other}' is not a single value"),
        }),
    }
}

fn validate_step(kind: FieldKind, step: &Value) -> Result<()> {
    let max = kind.min_max().1;
    match step {
        Value::Invalid { reason, .. } => Err(Error::InvalidValue {
            kind,
            reason: reason.clone(),
        }),
        Value::Number(number) if (1..=max).contains(number) => Ok(()),
        other => Err(Error::InvalidValue {
            kind,
            reason: format!("'{other}' is not a valid step increment"),
        }),
    }
}
