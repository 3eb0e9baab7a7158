//! Serde support for human-readable durations (`"5s"`, `"2m 30s"`).
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Foo {
//!     #[serde(with = "crate::humantime_serde")]
//!     timeout: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_str(DurationVisitor)
}

pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a duration such as \"5s\" or \"1m 30s\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Duration, E>
    where
        E: de::Error,
    {
        humantime::parse_duration(v)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
