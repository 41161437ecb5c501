//! UTC timestamps with subsecond precision.

use std::{borrow::Borrow, fmt::Display, ops::Add, time::Duration};
use time::format_description::well_known::Rfc3339;

/// A UTC datetime with subsecond precision.
///
/// Serialization uses RFC3339. In SQLite the value is stored as text in a
/// fixed layout, so that comparisons in SQL agree with comparisons in Rust.
///
/// # Examples
///
/// ```
/// # use acp_sqlite::types::DateTime;
/// # use time::OffsetDateTime;
/// let now = OffsetDateTime::now_utc();
/// let datetime = DateTime::from(now);
/// println!("{}", datetime); // Prints in RFC3339 format
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    sqlx::Type,
)]
#[serde(from = "DateTimeDto", into = "DateTimeDto")]
#[sqlx(transparent)]
pub struct DateTime(time::PrimitiveDateTime);

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: time::OffsetDateTime = (*self).into();
        let formatted = value.format(&Rfc3339).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl<T: Borrow<time::OffsetDateTime>> From<T> for DateTime {
    fn from(value: T) -> Self {
        let utc = value.borrow().to_offset(time::UtcOffset::UTC);
        Self(time::PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<DateTime> for time::OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0.assume_utc()
    }
}

impl Add<Duration> for DateTime {
    type Output = Self;

    /// Saturates at the largest representable datetime.
    fn add(self, rhs: Duration) -> Self::Output {
        let rhs = time::Duration::try_from(rhs).unwrap_or(time::Duration::MAX);
        Self(
            self.0
                .checked_add(rhs)
                .unwrap_or(time::PrimitiveDateTime::MAX),
        )
    }
}

// (De)serialization always goes through RFC3339

#[derive(serde::Serialize, serde::Deserialize)]
struct DateTimeDto(#[serde(with = "time::serde::rfc3339")] time::OffsetDateTime);

impl From<DateTimeDto> for DateTime {
    fn from(value: DateTimeDto) -> Self {
        value.0.into()
    }
}

impl From<DateTime> for DateTimeDto {
    fn from(value: DateTime) -> Self {
        DateTimeDto(value.into())
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for DateTime {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> std::borrow::Cow<'static, str> {
        "DateTime".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "format": "date-time",
        })
    }
}
