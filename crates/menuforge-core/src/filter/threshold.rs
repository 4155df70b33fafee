//! Date thresholds parsed from configuration text.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use super::{with_date, DateField};
use crate::domain::Recipe;
use crate::error::{MenuForgeError, Result};

/// A point in time plus the side of it a date filter keeps.
///
/// Accepted text forms:
///
/// | Text           | Meaning                                   |
/// |----------------|-------------------------------------------|
/// | `2024-03-01`   | on or after local midnight of that date   |
/// | `-2024-03-01`  | on or before local midnight of that date  |
/// | `30days`       | on or after 30 days ago                   |
/// | `-30days`      | on or before 30 days ago                  |
///
/// The offset unit is any in-order selection of the letters of `days`, in
/// any case: `30`, `30d`, `30day`, `30ds` and `30DAYS` all mean 30 days.
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use menuforge_core::DateThreshold;
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
/// let t = DateThreshold::parse_relative_to("-14days", now).unwrap();
/// assert!(!t.after);
/// assert_eq!(t.at, now - Duration::days(14));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateThreshold {
    pub at: DateTime<Utc>,
    pub after: bool,
}

impl DateThreshold {
    pub fn new(at: DateTime<Utc>, after: bool) -> Self {
        Self { at, after }
    }

    /// Parses threshold text relative to the current local time.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_relative_to(text, Local::now())
    }

    /// Parses threshold text; offsets count back from `now`.
    pub fn parse_relative_to<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> Result<Self> {
        Self::parse_with_direction(text, now, false)
    }

    /// Parses threshold text; offsets count forward from `now`.
    pub fn parse_future<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> Result<Self> {
        Self::parse_with_direction(text, now, true)
    }

    /// Applies the threshold to `field` of each recipe.
    pub fn filter<'a>(
        &self,
        recipes: impl IntoIterator<Item = &'a Recipe>,
        field: DateField,
    ) -> Vec<&'a Recipe> {
        with_date(recipes, field, self.at, self.after)
    }

    fn parse_with_direction<Tz: TimeZone>(
        text: &str,
        now: DateTime<Tz>,
        future: bool,
    ) -> Result<Self> {
        let text = text.trim();
        let (after, body) = match text.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, text),
        };

        if let Some(date) = parse_date(body) {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
                .ok_or_else(|| {
                    MenuForgeError::Config(format!("Date {body} has no local midnight"))
                })?;
            return Ok(Self::new(midnight.with_timezone(&Utc), after));
        }

        let invalid = || {
            MenuForgeError::Config(format!(
                "Invalid time offset format: {text}. Value must be in form of '-XXdays'"
            ))
        };
        let offset = parse_day_offset(body)
            .and_then(Duration::try_days)
            .ok_or_else(invalid)?;
        let at = if future {
            now.checked_add_signed(offset)
        } else {
            now.checked_sub_signed(offset)
        }
        .ok_or_else(invalid)?;
        Ok(Self::new(at.with_timezone(&Utc), after))
    }
}

// Only strict `YYYY-MM-DD`; chrono alone would also accept unpadded fields.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn parse_day_offset(text: &str) -> Option<i64> {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return None;
    }
    let (digits, unit) = text.split_at(digits_end);
    let mut rest = unit.as_bytes();
    for letter in *b"days" {
        if let Some((first, tail)) = rest.split_first() {
            if first.to_ascii_lowercase() == letter {
                rest = tail;
            }
        }
    }
    if rest.is_empty() {
        digits.parse().ok()
    } else {
        None
    }
}
