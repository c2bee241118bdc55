use serde::{Deserialize, Deserializer, Serialize};

/// The preferences payload submitted by the planning form. Lives for one
/// request only; nothing here is persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    #[serde(default)]
    pub destinations: Option<String>,
    /// Trip length in days. Form clients send this as a string, API
    /// clients as a number; both are accepted.
    #[serde(deserialize_with = "number_or_string_u32")]
    pub travel_time: u32,
    #[serde(deserialize_with = "number_or_string_f64")]
    pub budget: f64,
    #[serde(default)]
    pub trip_type: Option<TripType>,
    #[serde(default)]
    pub activities: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Relaxing,
    Activities,
    Backpacking,
    Sightseeing,
}

impl TripType {
    pub fn as_str(&self) -> &str {
        match self {
            TripType::Relaxing => "relaxing",
            TripType::Activities => "activities",
            TripType::Backpacking => "backpacking",
            TripType::Sightseeing => "sightseeing",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_or_string_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got \"{}\"", text))),
    }
}

fn number_or_string_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => value,
        NumberOrString::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("expected a whole number, got \"{}\"", text))
        })?,
    };

    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "expected a whole number of days, got {}",
            value
        )));
    }

    Ok(value as u32)
}
