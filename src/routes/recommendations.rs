use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::models::preferences::TripPreferences;
use crate::services::hotel_service::HotelService;
use crate::services::image_service::ImageService;
use crate::services::recommendation_service::RecommendationService;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/*
    /api/recommendations
*/
pub async fn generate(
    data: web::Data<RecommendationService<ImageService, HotelService>>,
    input: web::Json<TripPreferences>,
) -> impl Responder {
    let preferences = input.into_inner();

    // Form clients send travelTime/budget as strings; whatever survives
    // deserialization still has to be a sensible trip before it reaches
    // the prompt.
    if preferences.travel_time == 0 {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "travelTime must be a positive number of days".to_string(),
            details: None,
        });
    }
    if !preferences.budget.is_finite() || preferences.budget <= 0.0 {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "budget must be a positive number".to_string(),
            details: None,
        });
    }

    match data.generate_recommendations(&preferences).await {
        Ok(generated) => HttpResponse::Ok().json(generated),
        Err(err) => {
            eprintln!("Failed to generate recommendations: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to generate recommendations".to_string(),
                details: Some(err.to_string()),
            })
        }
    }
}
