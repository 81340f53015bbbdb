use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Timestamp in the form the gateway exchanges: a UTC local date-time
/// without offset, e.g. `2020-06-01T12:00:00.000000`.
///
/// Parsing also accepts RFC 3339 values; they are normalised to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GatewayTimestamp(pub OffsetDateTime);

fn format_wire(datetime: &OffsetDateTime) -> std::result::Result<String, time::error::Format> {
    datetime.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]"
    ))
}

fn parse_naive(s: &str) -> std::result::Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
}

impl GatewayTimestamp {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime.to_offset(UtcOffset::UTC))
    }

    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }
}

impl fmt::Display for GatewayTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format_wire(&self.0).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for GatewayTimestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(naive) = parse_naive(s) {
            return Ok(Self(naive.assume_utc()));
        }
        OffsetDateTime::parse(s, &Rfc3339)
            .map(Self::new)
            .map_err(|e| CoreError::invalid_timestamp(format!("'{s}': {e}")))
    }
}

impl From<OffsetDateTime> for GatewayTimestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self::new(value)
    }
}

impl Serialize for GatewayTimestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = format_wire(&self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for GatewayTimestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        GatewayTimestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}
