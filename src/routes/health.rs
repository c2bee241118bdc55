use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check() -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let completion_result = check_completion_api();
    health
        .services
        .insert("completion_api".to_string(), completion_result.clone());

    let photo_result = check_photo_search();
    health
        .services
        .insert("photo_search".to_string(), photo_result.clone());

    let hotel_result = check_hotel_search();
    health
        .services
        .insert("hotel_search".to_string(), hotel_result.clone());

    // A missing photo key only means fallback images, so it does not
    // degrade the overall status.
    if completion_result.status != "ok" || hotel_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_completion_api() -> ServiceStatus {
    match env::var("OPENAI_API_KEY") {
        Ok(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Completion API key configured ({})", mask_key(&key))),
        },
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        },
    }
}

fn check_photo_search() -> ServiceStatus {
    match env::var("UNSPLASH_ACCESS_KEY") {
        Ok(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Photo search key configured ({})", mask_key(&key))),
        },
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some(
                "UNSPLASH_ACCESS_KEY not configured; serving fallback images".to_string(),
            ),
        },
    }
}

fn check_hotel_search() -> ServiceStatus {
    let client_id = env::var("AMADEUS_CLIENT_ID").ok();
    let client_secret = env::var("AMADEUS_CLIENT_SECRET").ok();

    if let (Some(id), Some(_)) = (&client_id, &client_secret) {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Hotel search configured, Client ID: {}", mask_key(id))),
        }
    } else {
        let mut missing = Vec::new();

        if client_id.is_none() {
            missing.push("AMADEUS_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("AMADEUS_CLIENT_SECRET");
        }

        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Missing configuration: {}", missing.join(", "))),
        }
    }
}

fn mask_key(key: &str) -> String {
    if key.len() > 8 {
        format!("{}***{}", &key[0..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}
