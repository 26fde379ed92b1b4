use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Format of purchase dates, e.g. `17 Mar 2021 10:00:00 GMT`
const FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

/// Timestamp as sent by the fan API. `null` decodes to the zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(Option<DateTime<Utc>>);

impl Time {
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        let date = NaiveDateTime::parse_from_str(value, FORMAT)?;
        Ok(Self(Some(date.and_utc())))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(Some(value))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.to_rfc3339()),
            None => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::default()),
            Some(value) => Self::parse(&value)
                .map_err(|err| de::Error::custom(format!("invalid time {value:?}: {err}"))),
        }
    }
}
