//! Field-level (de)serialization rules shared by the resource schemas.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Omit-if-empty test for `skip_serializing_if`.
pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers the API may send either as JSON numbers or as numeric strings.
/// `null` reads as zero.
pub(crate) fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr<N> {
        Number(N),
        Text(String),
    }

    match Option::<Repr<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(Repr::Number(n)) => Ok(n),
        Some(Repr::Text(s)) => s
            .trim()
            .parse()
            .map_err(|err| D::Error::custom(format!("invalid number {s:?}: {err}"))),
    }
}

/// Version numbers that the API writes as JSON strings on some resources.
///
/// Serializes as a string; accepts a string, a number, or `null`.
pub(crate) mod string_number {
    use serde::{Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        super::lenient_number(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, with = "string_number", skip_serializing_if = "is_default")]
        version: u32,
        #[serde(default, deserialize_with = "null_as_default")]
        comment: String,
    }

    #[test]
    fn version_is_written_as_string() {
        let json = serde_json::to_value(Sample {
            version: 7,
            comment: String::new(),
        })
        .unwrap();
        assert_eq!(json["version"], "7");
    }

    #[test]
    fn zero_version_is_omitted() {
        let json = serde_json::to_value(Sample::default()).unwrap();
        assert!(json.get("version").is_none());
    }

    #[test]
    fn version_accepts_string_number_or_null() {
        let p: Sample = serde_json::from_str(r#"{"version":"12"}"#).unwrap();
        assert_eq!(p.version, 12);
        let p: Sample = serde_json::from_str(r#"{"version":12}"#).unwrap();
        assert_eq!(p.version, 12);
        let p: Sample = serde_json::from_str(r#"{"version":null}"#).unwrap();
        assert_eq!(p.version, 0);
    }

    #[test]
    fn garbage_version_is_rejected() {
        let err = serde_json::from_str::<Sample>(r#"{"version":"twelve"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid number \"twelve\""));
    }

    #[derive(Debug, Deserialize)]
    struct Sizes {
        #[serde(default, deserialize_with = "lenient_number")]
        period: u32,
        #[serde(default, deserialize_with = "lenient_number")]
        level: u8,
    }

    #[test]
    fn lenient_number_reads_quoted_digits() {
        let s: Sizes = serde_json::from_str(r#"{"period":"3600","level":" 9 "}"#).unwrap();
        assert_eq!((s.period, s.level), (3600, 9));
        let s: Sizes = serde_json::from_str(r#"{"period":3600,"level":null}"#).unwrap();
        assert_eq!((s.period, s.level), (3600, 0));
    }

    #[test]
    fn lenient_number_rejects_out_of_range_text() {
        let err = serde_json::from_str::<Sizes>(r#"{"level":"300"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid number \"300\""));
    }

    #[test]
    fn null_string_becomes_empty() {
        let p: Sample = serde_json::from_str(r#"{"comment":null}"#).unwrap();
        assert_eq!(p.comment, "");
    }
}
