use serde::{Deserialize, Serialize};

/// A lodging suggestion attached to a day of an itinerary. Wire names are
/// snake_case; the booking frontend consumes them as-is.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HotelOffer {
    pub hotel_id: String,
    pub name: String,
    /// Free text; the city-level hotel listing carries no prices.
    pub price_per_night: String,
    pub rating: u32,
    pub description: String,
    pub amenities: Vec<String>,
    pub location: GeoCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Empty when no representative photo could be found; renderers supply
    /// their own placeholder.
    pub image_url: String,
    pub booking_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct GeoCode {
    pub latitude: f64,
    pub longitude: f64,
}
