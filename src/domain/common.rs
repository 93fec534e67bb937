use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the backend. Accepts numeric and string ids on the
/// wire and always renders as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => RecordId(value),
            RawId::Integer(value) => RecordId(value.to_string()),
        })
    }
}

/// List of short labels (ticket numbers) that may be sent as numbers, strings
/// or a single comma-separated string.
pub mod label_list {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLabels {
        List(Vec<RawId>),
        Joined(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawLabels>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(RawLabels::List(items)) => items
                .into_iter()
                .map(|item| match item {
                    RawId::Text(value) => value,
                    RawId::Integer(value) => value.to_string(),
                })
                .collect(),
            Some(RawLabels::Joined(joined)) => split_labels(&joined),
        })
    }

    pub fn serialize<S>(labels: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&labels.join(", "))
    }
}

/// Splits a comma-separated list, trimming blanks.
pub fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

fn parse_raw_amount<E: serde::de::Error>(raw: RawAmount) -> Result<Option<f64>, E> {
    match raw {
        RawAmount::Number(value) => Ok(Some(value)),
        RawAmount::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("invalid amount `{}`", trimmed)))
            }
        }
    }
}

/// Amount fields arrive as JSON numbers or as decimal strings depending on the
/// backend column type.
pub mod amount {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAmount::deserialize(deserializer)?;
        Ok(parse_raw_amount::<D::Error>(raw)?.unwrap_or(0.0))
    }
}

pub mod optional_amount {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawAmount>::deserialize(deserializer)? {
            Some(raw) => parse_raw_amount::<D::Error>(raw),
            None => Ok(None),
        }
    }
}
