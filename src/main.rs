use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripforge_api::routes;
use tripforge_api::services::completion_service::CompletionService;
use tripforge_api::services::hotel_service::HotelService;
use tripforge_api::services::image_service::ImageService;
use tripforge_api::services::recommendation_service::RecommendationService;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    // Upstream client handles are process-wide; everything else is
    // request-scoped.
    let images = ImageService::new().expect("Failed to build photo search client");
    let hotels = HotelService::new(images.clone()).expect("Failed to build hotel search client");
    let completion = CompletionService::new().expect("Failed to build completion client");
    let recommendations = web::Data::new(RecommendationService::new(completion, images, hotels));

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(recommendations.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .route(
                        "/recommendations",
                        web::post().to(routes::recommendations::generate),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
