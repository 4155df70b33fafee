//! Deserialization helpers for the recipe-server JSON shape.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use super::ids::KeywordId;
use super::recipe::parse_timestamp;

/// Either a bare id or an object carrying an `id` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRef {
    Id(u64),
    Object { id: u64 },
}

impl IdRef {
    fn id(&self) -> u64 {
        match self {
            IdRef::Id(id) | IdRef::Object { id } => *id,
        }
    }
}

pub(super) fn keyword_ids<'de, D>(deserializer: D) -> Result<Vec<KeywordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<IdRef>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(refs.iter().map(|r| KeywordId::new(r.id())).collect())
}

pub(super) fn optional_object_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRef>::deserialize(deserializer)?.map(|r| r.id()))
}

// Ratings arrive as integers or floats; anything outside 0..=5 is rejected.
pub(super) fn rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if (0.0..=5.0).contains(&value) => Ok(Some(value.round() as u8)),
        Some(value) => Err(D::Error::custom(format!(
            "rating {value} is outside the range 0 to 5"
        ))),
    }
}

pub(super) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {text}")))
}

// A missing or unparsable last-cooked value means the recipe was never cooked.
pub(super) fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.as_deref().and_then(parse_timestamp))
}
