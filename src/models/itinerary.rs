use serde::{Deserialize, Serialize};

use crate::models::hotel::HotelOffer;

/// The shape the completion API is asked to produce, and the success body
/// of `POST /api/recommendations`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeneratedItineraries {
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub name: String,
    pub overview: String,
    pub daily_plan: Vec<DayPlan>,
    /// Free-text estimate, e.g. "$1450". Not a numeric field.
    pub total_cost: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub locations: Vec<String>,
    pub activities: Vec<Activity>,
    pub transportation: Transportation,
    pub total_day_cost: String,
    /// Attached by the enrichment pass; absent when the lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<DayImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<HotelOffer>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Activity {
    pub name: String,
    pub duration: String,
    pub cost: String,
    pub description: String,
    /// `[lat, lng]`, expected WGS84 but not enforced.
    pub coordinates: (f64, f64),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Transportation {
    pub method: String,
    pub duration: String,
    pub cost: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DayImage {
    pub url: String,
    pub credit: ImageCredit,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImageCredit {
    pub name: String,
    pub link: String,
}
