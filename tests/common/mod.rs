use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};

use tripforge_api::routes;
use tripforge_api::services::completion_service::CompletionService;
use tripforge_api::services::hotel_service::HotelService;
use tripforge_api::services::image_service::ImageService;
use tripforge_api::services::recommendation_service::RecommendationService;

/// Builds the real route table against configurable upstream endpoints so
/// tests can point every external call at a mockito server. Defaults: a
/// completion key is present, photo and hotel credentials are absent, so
/// images fall back and hotel enrichment degrades to "no hotels".
pub struct TestApp {
    pub completion_base_url: String,
    pub openai_api_key: Option<String>,
    pub unsplash_base_url: String,
    pub unsplash_access_key: Option<String>,
    pub amadeus_base_url: String,
    pub amadeus_credentials: Option<(String, String)>,
}

impl TestApp {
    pub fn new(completion_base_url: String) -> Self {
        Self {
            completion_base_url,
            openai_api_key: Some("test-key".to_string()),
            // Unroutable: any accidental call fails fast instead of
            // leaving the test hanging on a live endpoint.
            unsplash_base_url: "http://127.0.0.1:1".to_string(),
            unsplash_access_key: None,
            amadeus_base_url: "http://127.0.0.1:1".to_string(),
            amadeus_credentials: None,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let images = ImageService::with_config(
            self.unsplash_access_key.clone(),
            self.unsplash_base_url.clone(),
        )
        .expect("Failed to build photo search client");
        let hotels = HotelService::with_config(
            self.amadeus_credentials.clone(),
            self.amadeus_base_url.clone(),
            images.clone(),
        )
        .expect("Failed to build hotel search client");
        let completion = CompletionService::with_config(
            self.openai_api_key.clone(),
            self.completion_base_url.clone(),
            "gpt-3.5-turbo".to_string(),
        )
        .expect("Failed to build completion client");
        let recommendations = web::Data::new(RecommendationService::new(completion, images, hotels));

        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(recommendations)
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .route(
                        "/recommendations",
                        web::post().to(routes::recommendations::generate),
                    ),
            )
    }
}

/// A chat-completions body whose single choice carries `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
    .to_string()
}

/// Two well-formed itinerary options with `days` entries each, numbered
/// 1..=days, two locations per day.
pub fn sample_itineraries_json(days: u32) -> String {
    let daily_plan = |theme: &str| -> Vec<serde_json::Value> {
        (1..=days)
            .map(|day| {
                serde_json::json!({
                    "day": day,
                    "locations": [format!("{} Spot {}", theme, day), "City Center"],
                    "activities": [{
                        "name": format!("{} activity {}", theme, day),
                        "duration": "2 hours",
                        "cost": "$40",
                        "description": "A memorable stop",
                        "coordinates": [41.9028, 12.4964]
                    }],
                    "transportation": { "method": "train", "duration": "1 hour", "cost": "$15" },
                    "totalDayCost": "$150"
                })
            })
            .collect()
    };

    serde_json::json!({
        "itineraries": [
            {
                "name": "Classic Highlights",
                "overview": "The landmark route",
                "dailyPlan": daily_plan("Classic"),
                "totalCost": "$1400"
            },
            {
                "name": "Hidden Gems",
                "overview": "Off the beaten path",
                "dailyPlan": daily_plan("Hidden"),
                "totalCost": "$1250"
            }
        ]
    })
    .to_string()
}
