//! Five-field cron expression parser, validator and closest-date matcher.
#![deny(unsafe_code, warnings, missing_docs)]

//! This crate interprets classic five-field cron schedules (minute, hour,
//! day of month, month, day of week) and answers two questions:
//! - is this string a valid schedule?
//! - what is the nearest date/time, before or after a given anchor, that
//!   matches it?
//!
//! It is a pure calendar-arithmetic library: it never runs jobs, sleeps or
//! reads the clock. All computation is over [`chrono::NaiveDateTime`] values
//! with minute resolution (seconds are truncated), without any timezone or
//! daylight-saving awareness.
//!
//! ## Schedule format
//!
//! A schedule is five whitespace-separated fields:
//!
//! | Field        | Allowed values  | Allowed special characters |
//! |--------------|-----------------|----------------------------|
//! | Minute       | 0-59            | * , - /                    |
//! | Hour         | 0-23            | * , - /                    |
//! | Day of month | 1-31            | * , - /                    |
//! | Month        | 1-12 or JAN-DEC | * , - /                    |
//! | Day of week  | 0-6 or SUN-SAT  | * , - / #                  |
//!
//! Pattern meanings:
//! - `*` - every possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `1,2-5`;
//! - `-` - inclusive range of values, i.e. `0-15`, `JAN-MAR`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`;
//! - `#` - the nth given day of the week within the month, i.e. `FRI#1`, `1#4`.
//!
//! The `L`, `W` and `?` symbols of extended cron dialects are not supported
//! and are rejected at validation, as are seconds and years fields.
//!
//! ## How to use
//!
//! The central entity is the [`Schedule`] structure:
//! - [`new()`](Schedule::new) parses and validates a schedule string;
//! - [`next()`](Schedule::next) and [`previous()`](Schedule::previous) find
//!   the nearest matching timestamp in either direction, inclusive of the
//!   anchor;
//! - [`iter()`](Schedule::iter) and [`iter_back()`](Schedule::iter_back)
//!   produce lazy series of matching timestamps.
//!
//! ### Example with `next` and `previous`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_compass::{Result, Schedule};
//!
//! fn noon_neighbours() -> Result<()> {
//!     let schedule = Schedule::new("0 12 * * *")?;
//!     let anchor = NaiveDate::from_ymd_opt(2020, 9, 29).unwrap().and_hms_opt(13, 0, 0).unwrap();
//!
//!     let next = schedule.next(&anchor).unwrap();
//!     assert_eq!(next, NaiveDate::from_ymd_opt(2020, 9, 30).unwrap().and_hms_opt(12, 0, 0).unwrap());
//!
//!     let previous = schedule.previous(&anchor).unwrap();
//!     assert_eq!(previous, NaiveDate::from_ymd_opt(2020, 9, 29).unwrap().and_hms_opt(12, 0, 0).unwrap());
//!
//!     Ok(())
//! }
//! # noon_neighbours().unwrap();
//! ```
//!
//! ### Example with `iter`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_compass::{Result, Schedule};
//!
//! fn first_mondays() -> Result<()> {
//!     let schedule = Schedule::new("0 12 * * 1#1")?;
//!     let anchor = NaiveDate::from_ymd_opt(2020, 8, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//!     // Noon of the next six first Mondays of the month.
//!     schedule.iter(&anchor).take(6).for_each(|t| println!("match: {t}"));
//!
//!     Ok(())
//! }
//! # first_mondays().unwrap();
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html)
//!   and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html)
//!   trait implementations for [`Schedule`] via its canonical string form.

/// Crate specific Error implementation.
pub mod error;
mod field;
/// Validated schedule aggregate and the closest-date queries.
pub mod schedule;
mod series;
mod utils;
mod value;

pub use error::Error;
pub use field::{FieldKind, Parameter};
pub use schedule::Schedule;
pub use value::Value;

/// Convenient alias for `Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
