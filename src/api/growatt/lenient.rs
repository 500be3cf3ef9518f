//! Decoders for the loosely typed Growatt payloads.

use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_with::{DeserializeAs, serde_as};

/// Number that may also come as a string.
///
/// `null` and an empty string decode into the default value.
pub struct Lenient;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber<T> {
    Native(T),
    Text(String),
}

impl<'de, T> DeserializeAs<'de, T> for Lenient
where
    T: Deserialize<'de> + FromStr + Default,
{
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        match Option::<RawNumber<T>>::deserialize(deserializer)? {
            None => Ok(T::default()),
            Some(RawNumber::Native(value)) => Ok(value),
            Some(RawNumber::Text(text)) if text.trim().is_empty() => Ok(T::default()),
            Some(RawNumber::Text(text)) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format_args!("invalid number: `{text}`"))),
        }
    }
}

/// Identifier that may come as a number.
pub struct Identifier;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> DeserializeAs<'de, String> for Identifier {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<RawIdentifier>::deserialize(deserializer)? {
            None => String::new(),
            Some(RawIdentifier::Text(text)) => text,
            Some(RawIdentifier::Number(number)) => number.to_string(),
        })
    }
}

/// Intraday power series keyed by the `HH:MM` time of day, in watts.
///
/// Accepted shapes:
///
/// - `{"HH:MM": power, …}`
/// - `[{"time": "…", "power": …}, …]`
/// - `[["…", power], …]`
///
/// Timestamps like `YYYY-MM-DD HH:MM` are reduced to the time of day.
/// The points keep their payload order, repeated timestamps included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerSeries(pub Vec<(String, f64)>);

#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPowerSeries {
    Map(#[serde_as(as = "BTreeMap<_, Lenient>")] BTreeMap<String, f64>),
    Points(Vec<RawPowerPoint>),
}

#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPowerPoint {
    Object {
        time: String,

        #[serde_as(as = "Lenient")]
        #[serde(default)]
        power: f64,
    },
    Pair(String, #[serde_as(as = "Lenient")] f64),
}

impl<'de> Deserialize<'de> for PowerSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = match Option::<RawPowerSeries>::deserialize(deserializer)? {
            None => return Ok(Self::default()),
            Some(RawPowerSeries::Map(map)) => map.into_iter().collect::<Vec<_>>(),
            Some(RawPowerSeries::Points(points)) => points
                .into_iter()
                .map(|point| match point {
                    RawPowerPoint::Object { time, power } | RawPowerPoint::Pair(time, power) => {
                        (time, power)
                    }
                })
                .collect(),
        };
        Ok(Self(
            points
                .into_iter()
                .map(|(time, power)| (strip_date(&time).to_owned(), power))
                .collect(),
        ))
    }
}

/// `2025-02-03 12:05` → `12:05`.
pub fn strip_date(timestamp: &str) -> &str {
    timestamp.trim().rsplit_once(' ').map_or_else(|| timestamp.trim(), |(_, time)| time)
}
