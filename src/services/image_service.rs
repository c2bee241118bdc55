use rand::Rng;
use serde::Deserialize;
use std::{env, time::Duration};

use crate::models::itinerary::{DayImage, ImageCredit};

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

// Pre-selected travel photos served when the live search is unavailable.
// The attribution is correct for the photo, not for the queried location;
// that tradeoff is accepted.
const FALLBACK_IMAGES: [(&str, &str, &str); 5] = [
    (
        "https://images.unsplash.com/photo-1500835556837-99ac94a94552",
        "Dino Reichmuth",
        "https://unsplash.com/@dinoreichmuth",
    ),
    (
        "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1",
        "Brigitte Tohm",
        "https://unsplash.com/@brigittetohm",
    ),
    (
        "https://images.unsplash.com/photo-1469854523086-cc02fe5d8800",
        "Norbert Kowalczyk",
        "https://unsplash.com/@norbertkowalczyk",
    ),
    (
        "https://images.unsplash.com/photo-1488085061387-422e29b40080",
        "Jaime Dantas",
        "https://unsplash.com/@jaimedantas",
    ),
    (
        "https://images.unsplash.com/photo-1473496169904-658ba7c44d8a",
        "Toa Heftiba",
        "https://unsplash.com/@heftiba",
    ),
];

#[derive(Debug)]
pub enum ImageLookupError {
    SearchFailed(String),
}

impl std::fmt::Display for ImageLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageLookupError::SearchFailed(err) => write!(f, "Image search failed: {}", err),
        }
    }
}

impl std::error::Error for ImageLookupError {}

/// Seam between the itinerary generator and the photo search so enrichment
/// failure handling stays testable. The production implementation never
/// returns an error.
pub trait ImageLookup {
    async fn location_image(&self, query: &str) -> Result<DayImage, ImageLookupError>;
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoResult {
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    links: PhotoUserLinks,
}

#[derive(Debug, Deserialize)]
struct PhotoUserLinks {
    html: String,
}

#[derive(Clone)]
pub struct ImageService {
    http_client: reqwest::Client,
    access_key: Option<String>,
    base_url: String,
}

impl ImageService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(
            env::var("UNSPLASH_ACCESS_KEY").ok(),
            DEFAULT_BASE_URL.to_string(),
        )
    }

    pub fn with_config(
        access_key: Option<String>,
        base_url: String,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            access_key,
            base_url,
        })
    }

    /// Look up one landscape photo for the query. All failure is absorbed:
    /// missing key, API errors, and empty result sets fall back to a random
    /// pre-selected travel photo, so the result is always displayable.
    pub async fn get_location_image(&self, query: &str) -> DayImage {
        if self.access_key.is_none() {
            println!("Missing Unsplash access key, using fallback image");
            return random_fallback_image();
        }

        match self.search_photo(query).await {
            Some(image) => image,
            None => {
                println!("No image available for \"{}\", using fallback", query);
                random_fallback_image()
            }
        }
    }

    /// Strict single-result search: `None` instead of a fallback photo.
    /// Hotel enrichment uses this because an unrelated stock photo is worse
    /// than no photo next to a hotel name.
    pub async fn search_photo(&self, query: &str) -> Option<DayImage> {
        let access_key = self.access_key.as_ref()?;

        println!("Fetching image for query: {}", query);

        let url = format!("{}/search/photos", self.base_url.trim_end_matches('/'));
        let response = match self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("page", "1"),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .header("Authorization", format!("Client-ID {}", access_key))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                eprintln!("Unsplash request failed (likely rate limit): {}", err);
                return None;
            }
        };

        if !response.status().is_success() {
            eprintln!("Unsplash API error: HTTP {}", response.status());
            return None;
        }

        let search: PhotoSearchResponse = match response.json().await {
            Ok(search) => search,
            Err(err) => {
                eprintln!("Failed to decode Unsplash response: {}", err);
                return None;
            }
        };

        let photo = search.results.into_iter().next()?;

        Some(DayImage {
            url: photo.urls.regular,
            credit: ImageCredit {
                name: photo.user.name,
                link: photo.user.links.html,
            },
        })
    }
}

impl ImageLookup for ImageService {
    async fn location_image(&self, query: &str) -> Result<DayImage, ImageLookupError> {
        Ok(self.get_location_image(query).await)
    }
}

fn random_fallback_image() -> DayImage {
    let index = rand::thread_rng().gen_range(0..FALLBACK_IMAGES.len());
    println!("Using fallback image #{}", index + 1);

    let (url, name, link) = FALLBACK_IMAGES[index];
    DayImage {
        url: url.to_string(),
        credit: ImageCredit {
            name: name.to_string(),
            link: link.to_string(),
        },
    }
}
