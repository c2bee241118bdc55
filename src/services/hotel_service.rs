use chrono::NaiveDate;
use futures::future::join_all;
use serde::Deserialize;
use std::{env, time::Duration};

use crate::models::hotel::{GeoCode, HotelOffer};
use crate::services::image_service::ImageService;

const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";
const MAX_OFFERS: usize = 3;
const SEARCH_RADIUS_KM: u32 = 5;

const DEFAULT_CITY: &str = "Paris";
const DEFAULT_CITY_CODE: &str = "PAR";

// City coverage mirrors the markets the planner launched with.
const CITY_CODES: [(&str, &str); 7] = [
    ("Bucharest", "BUH"),
    ("Cluj-Napoca", "CLJ"),
    ("Timisoara", "TSR"),
    ("Sibiu", "SBZ"),
    ("Brasov", "BRV"),
    ("Iasi", "IAS"),
    ("Paris", "PAR"),
];

#[derive(Debug)]
pub enum HotelLookupError {
    MissingCredentials,
    Token(String),
    Search(String),
}

impl std::fmt::Display for HotelLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HotelLookupError::MissingCredentials => write!(f, "Missing Amadeus credentials"),
            HotelLookupError::Token(err) => {
                write!(f, "Failed to authenticate with hotel API: {}", err)
            }
            HotelLookupError::Search(err) => write!(f, "Hotel search failed: {}", err),
        }
    }
}

impl std::error::Error for HotelLookupError {}

/// Seam between the itinerary generator and the hotel search. The
/// generator treats any error as "no hotels for this day".
pub trait HotelLookup {
    async fn hotels_for_location(
        &self,
        location: &str,
        budget: f64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<HotelOffer>, HotelLookupError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct HotelListResponse {
    #[serde(default)]
    data: Vec<HotelListing>,
}

#[derive(Debug, Deserialize)]
struct HotelListing {
    #[serde(rename = "hotelId")]
    hotel_id: String,
    name: String,
    rating: Option<String>,
    #[serde(rename = "geoCode")]
    geo_code: ListingGeoCode,
    address: Option<ListingAddress>,
}

#[derive(Debug, Deserialize)]
struct ListingGeoCode {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ListingAddress {
    #[serde(rename = "cityName")]
    city_name: Option<String>,
}

#[derive(Clone)]
pub struct HotelService {
    http_client: reqwest::Client,
    credentials: Option<(String, String)>,
    base_url: String,
    images: ImageService,
}

impl HotelService {
    pub fn new(images: ImageService) -> Result<Self, Box<dyn std::error::Error>> {
        let credentials = match (
            env::var("AMADEUS_CLIENT_ID"),
            env::var("AMADEUS_CLIENT_SECRET"),
        ) {
            (Ok(id), Ok(secret)) => Some((id, secret)),
            _ => None,
        };

        Self::with_config(credentials, DEFAULT_BASE_URL.to_string(), images)
    }

    pub fn with_config(
        credentials: Option<(String, String)>,
        base_url: String,
        images: ImageService,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            credentials,
            base_url,
            images,
        })
    }

    /// Up to three lodging suggestions near the resolved city, best effort.
    /// The dates and budget travel with the request for parity with the
    /// booking flow; the city-level listing itself is date- and price-blind.
    pub async fn get_hotel_recommendations(
        &self,
        location: &str,
        budget: f64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<HotelOffer>, HotelLookupError> {
        let (client_id, client_secret) = self
            .credentials
            .as_ref()
            .ok_or(HotelLookupError::MissingCredentials)?;

        let city_name = resolve_city_name(location);
        let city_code = city_code_for(city_name);

        println!(
            "Searching hotels in {} ({}) for {} to {}, budget ${}",
            city_name, city_code, check_in, check_out, budget
        );

        let token = self.fetch_access_token(client_id, client_secret).await?;
        let listings = self.fetch_hotels_by_city(&token, city_code).await?;

        let mut offers: Vec<HotelOffer> = listings
            .into_iter()
            .take(MAX_OFFERS)
            .map(|listing| {
                let city = listing
                    .address
                    .as_ref()
                    .and_then(|address| address.city_name.clone());
                let rating = listing
                    .rating
                    .as_deref()
                    .and_then(|rating| rating.trim().parse().ok())
                    .unwrap_or(0);

                HotelOffer {
                    booking_url: format!("https://www.amadeus.com/hotel/{}", listing.hotel_id),
                    description: format!(
                        "Hotel in {}",
                        city.as_deref().unwrap_or(city_name)
                    ),
                    hotel_id: listing.hotel_id,
                    name: listing.name,
                    price_per_night: "Contact for price".to_string(),
                    rating,
                    amenities: Vec::new(),
                    location: GeoCode {
                        latitude: listing.geo_code.latitude,
                        longitude: listing.geo_code.longitude,
                    },
                    address: None,
                    city,
                    image_url: String::new(),
                }
            })
            .collect();

        self.attach_hotel_images(&mut offers, city_name).await;

        Ok(offers)
    }

    /// Fetch a representative photo for each offer concurrently. A hotel
    /// that matches nothing gets one generic try before its image stays
    /// empty for the renderer to placeholder.
    async fn attach_hotel_images(&self, offers: &mut [HotelOffer], city_name: &str) {
        let futures: Vec<_> = offers
            .iter_mut()
            .map(|offer| async move {
                let query = format!("{} {} hotel", offer.name, city_name);
                let image = match self.images.search_photo(&query).await {
                    Some(image) => Some(image),
                    None => self.images.search_photo("luxury hotel building").await,
                };

                if let Some(image) = image {
                    offer.image_url = image.url;
                }
            })
            .collect();

        join_all(futures).await;
    }

    async fn fetch_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, HotelLookupError> {
        let url = format!(
            "{}/v1/security/oauth2/token",
            self.base_url.trim_end_matches('/')
        );
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self
            .http_client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|err| HotelLookupError::Token(err.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| HotelLookupError::Token(err.to_string()))?;

        if !status.is_success() {
            return Err(HotelLookupError::Token(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        let token: TokenResponse = serde_json::from_str(&response_text).map_err(|err| {
            HotelLookupError::Token(format!("Failed to parse token response: {}", err))
        })?;

        Ok(token.access_token)
    }

    async fn fetch_hotels_by_city(
        &self,
        token: &str,
        city_code: &str,
    ) -> Result<Vec<HotelListing>, HotelLookupError> {
        let url = format!(
            "{}/v1/reference-data/locations/hotels/by-city",
            self.base_url.trim_end_matches('/')
        );

        let radius = SEARCH_RADIUS_KM.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("cityCode", city_code),
                ("radius", radius.as_str()),
                ("radiusUnit", "KM"),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| HotelLookupError::Search(err.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| HotelLookupError::Search(err.to_string()))?;

        if !status.is_success() {
            return Err(HotelLookupError::Search(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        let listing: HotelListResponse = serde_json::from_str(&response_text).map_err(|err| {
            HotelLookupError::Search(format!(
                "Failed to parse hotel list response: {}. Response: {}",
                err, response_text
            ))
        })?;

        Ok(listing.data)
    }
}

impl HotelLookup for HotelService {
    async fn hotels_for_location(
        &self,
        location: &str,
        budget: f64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<HotelOffer>, HotelLookupError> {
        self.get_hotel_recommendations(location, budget, check_in, check_out)
            .await
    }
}

/// "Eiffel Tower Paris" -> "Paris". The last whitespace/comma token is the
/// city guess; multi-word city names lose their leading tokens and
/// unrecognized cities fall through to the default code.
fn resolve_city_name(location: &str) -> &str {
    location
        .split([' ', ','])
        .filter(|part| !part.is_empty())
        .last()
        .unwrap_or(DEFAULT_CITY)
}

fn city_code_for(city_name: &str) -> &'static str {
    CITY_CODES
        .iter()
        .find(|(name, _)| *name == city_name)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_CITY_CODE)
}
