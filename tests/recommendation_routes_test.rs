mod common;

use actix_web::{http::header, test};
use serde_json::json;
use serial_test::serial;

use common::{completion_body, sample_itineraries_json, TestApp};

#[actix_rt::test]
#[serial]
async fn test_generate_recommendations_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&sample_itineraries_json(3)))
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500,
            "tripType": "sightseeing",
            "activities": "museums"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let itineraries = body["itineraries"].as_array().unwrap();
    assert_eq!(itineraries.len(), 2);

    for itinerary in itineraries {
        let daily_plan = itinerary["dailyPlan"].as_array().unwrap();
        assert_eq!(daily_plan.len(), 3);

        let mut days: Vec<u64> = daily_plan
            .iter()
            .map(|day| day["day"].as_u64().unwrap())
            .collect();
        days.sort_unstable();
        assert_eq!(days, vec![1, 2, 3]);

        for day in daily_plan {
            // No photo key configured: every day still gets a fallback
            // image with a real attribution.
            assert!(day["image"]["url"].as_str().is_some());
            assert!(day["image"]["credit"]["name"].as_str().is_some());
            // No hotel credentials: the field is absent, not an empty list.
            assert!(day.get("hotels").is_none());
        }
    }
}

#[actix_rt::test]
#[serial]
async fn test_form_style_string_fields_are_accepted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&sample_itineraries_json(2)))
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Romania",
            "travelTime": "2",
            "budget": "800",
            "tripType": "backpacking",
            "activities": "hiking"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_rt::test]
#[serial]
async fn test_fenced_completion_is_cleaned_before_parsing() {
    let mut server = mockito::Server::new_async().await;
    let fenced = format!("```json\n{}\n```", sample_itineraries_json(3));
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&fenced))
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["itineraries"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
#[serial]
async fn test_zero_travel_time_is_rejected() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "travelTime": 0,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("travelTime"));
}

#[actix_rt::test]
#[serial]
async fn test_negative_budget_is_rejected() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "travelTime": 3,
            "budget": -100
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("budget"));
}

#[actix_rt::test]
#[serial]
async fn test_non_numeric_travel_time_is_rejected() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "travelTime": "a week",
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_rt::test]
#[serial]
async fn test_completion_failure_returns_structured_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"].as_str().unwrap(),
        "Failed to generate recommendations"
    );
    assert!(body["details"].as_str().is_some());
}

#[actix_rt::test]
#[serial]
async fn test_malformed_completion_yields_500_not_garbage() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"itineraries": [{"name": "Trunc"#))
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["details"].as_str().unwrap().contains("not a valid itinerary"));
}

#[actix_rt::test]
#[serial]
async fn test_empty_choices_yield_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
}

#[actix_rt::test]
#[serial]
async fn test_wrong_day_count_from_completion_yields_500() {
    let mut server = mockito::Server::new_async().await;
    // Completion returns 2-day plans for a 3-day request.
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&sample_itineraries_json(2)))
        .create_async()
        .await;

    let test_app = TestApp::new(server.url());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "destinations": "Italy",
            "travelTime": 3,
            "budget": 1500
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
}

#[actix_rt::test]
#[serial]
async fn test_malformed_json_body_is_a_client_error() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_payload("{ invalid json")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_rt::test]
#[serial]
async fn test_wrong_method_is_rejected() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/recommendations")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 405); // Method Not Allowed
}

#[actix_rt::test]
#[serial]
async fn test_health_reports_upstream_configuration() {
    let test_app = TestApp::new("http://127.0.0.1:1".to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["status"].as_str().is_some());
    assert!(body["version"].as_str().is_some());
    let services = body["services"].as_object().unwrap();
    assert!(services.contains_key("completion_api"));
    assert!(services.contains_key("photo_search"));
    assert!(services.contains_key("hotel_search"));
}
