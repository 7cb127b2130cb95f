use actix_web::{get, http::StatusCode, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use super::respond_empty;

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

#[get("/")]
pub async fn home() -> impl Responder {
    respond_empty(StatusCode::OK, "Welcome to the tickbox todo service!")
}

#[get("/about")]
pub async fn about() -> impl Responder {
    respond_empty(
        StatusCode::OK,
        "tickbox keeps a private todo list for every registered user",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(App::new().service(health)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_home_and_about() {
        let app = test::init_service(
            App::new()
                .service(home)
                .service(web::scope("/api/v1").service(about)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["status_code"], 200);
        assert!(json.get("data").is_none());

        let req = test::TestRequest::get().uri("/api/v1/about").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
