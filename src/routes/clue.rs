//! Clue demo server.
//!
//! - GET /          (all three lists)
//! - GET /suspects
//! - GET /rooms
//! - GET /weapons
//!
//! Every path answers CORS preflights; unknown paths get a JSON 404.

use axum::http::{header, HeaderName, Method, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::errors::ErrorResponse;

pub const SUSPECTS: [&str; 10] = [
    "Kevin Gary",
    "Tim Lindquist",
    "Srividya Bansal",
    "Alexandra Mehlhase",
    "Robert Heinrichs",
    "Ruben Acuna",
    "Ashraf Gaffar",
    "Javier Gonzalez-Sanchez",
    "Ajay Bansal",
    "Doug Sandy",
];

pub const ROOMS: [&str; 5] = ["Student Union", "Classroom", "Slack", "Library", "Rec Center"];

pub const WEAPONS: [&str; 5] = [
    "Failing Grade",
    "Academic Status Report",
    "Baseball Bat",
    "Coffee Parrot",
    "Fiesta Parrot",
];

const NOT_FOUND_DESCRIPTION: &str = "The page could not be found :(";

/// All three lists.
#[derive(Debug, Serialize, ToSchema)]
pub struct AllCluesResponse {
    pub suspects: Vec<&'static str>,
    pub rooms: Vec<&'static str>,
    pub weapons: Vec<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuspectsResponse {
    pub suspects: Vec<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomsResponse {
    pub rooms: Vec<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeaponsResponse {
    pub weapons: Vec<&'static str>,
}

/// All suspects, rooms and weapons in one document.
#[utoipa::path(
    get,
    path = "/",
    tag = "Clue",
    responses(
        (status = 200, description = "All three clue lists", body = AllCluesResponse),
    )
)]
pub async fn get_all() -> Json<AllCluesResponse> {
    tracing::debug!("/ root GET operation triggered");
    Json(AllCluesResponse {
        suspects: SUSPECTS.to_vec(),
        rooms: ROOMS.to_vec(),
        weapons: WEAPONS.to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/suspects",
    tag = "Clue",
    responses(
        (status = 200, description = "All suspects", body = SuspectsResponse),
    )
)]
pub async fn get_suspects() -> Json<SuspectsResponse> {
    tracing::debug!("/suspects GET operation triggered");
    Json(SuspectsResponse {
        suspects: SUSPECTS.to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "Clue",
    responses(
        (status = 200, description = "All rooms", body = RoomsResponse),
    )
)]
pub async fn get_rooms() -> Json<RoomsResponse> {
    tracing::debug!("/rooms GET operation triggered");
    Json(RoomsResponse {
        rooms: ROOMS.to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/weapons",
    tag = "Clue",
    responses(
        (status = 200, description = "All weapons", body = WeaponsResponse),
    )
)]
pub async fn get_weapons() -> Json<WeaponsResponse> {
    tracing::debug!("/weapons GET operation triggered");
    Json(WeaponsResponse {
        weapons: WEAPONS.to_vec(),
    })
}

/// Fallback for every unknown path.
pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    tracing::debug!(
        "Error [status : 404, description: {}] for {} {}",
        NOT_FOUND_DESCRIPTION,
        method,
        uri
    );
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: StatusCode::NOT_FOUND.as_u16(),
            err_description: NOT_FOUND_DESCRIPTION.to_string(),
        }),
    )
}

/// Wildcard CORS; preflight `OPTIONS` on any path answers 200.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::CONTENT_LENGTH,
            HeaderName::from_static("x-requested-with"),
        ])
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_all))
        .route("/suspects", get(get_suspects))
        .route("/rooms", get(get_rooms))
        .route("/weapons", get(get_weapons))
        .fallback(not_found)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clue_client::ClueClient;
    use std::net::SocketAddr;

    /// Serve the router on an ephemeral port and return its base URL.
    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_root_through_clue_client() {
        let base = spawn_server().await;
        let lists = ClueClient::new(&base).fetch_all().await.unwrap();

        assert_eq!(lists.suspects.len(), 10);
        assert_eq!(lists.rooms, ROOMS.to_vec());
        assert_eq!(lists.weapons, WEAPONS.to_vec());
    }

    #[tokio::test]
    async fn test_single_list_endpoints() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        for (endpoint, expected) in [
            ("suspects", SUSPECTS.to_vec()),
            ("rooms", ROOMS.to_vec()),
            ("weapons", WEAPONS.to_vec()),
        ] {
            let response = client
                .get(format!("{}/{}", base, endpoint))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
            let body: serde_json::Value = response.json().await.unwrap();
            assert_eq!(body[endpoint], serde_json::json!(expected), "{}", endpoint);
            assert_eq!(body.as_object().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let base = spawn_server().await;

        let response = reqwest::Client::new()
            .get(format!("{}/candlestick", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": 404, "errDescription": "The page could not be found :(" })
        );
    }

    #[tokio::test]
    async fn test_unknown_path_through_clue_client() {
        let base = spawn_server().await;
        let err = ClueClient::new(&format!("{}/nowhere", base))
            .fetch_all()
            .await
            .unwrap_err();
        assert_eq!(err.error_number(), 404);
    }

    #[tokio::test]
    async fn test_preflight_and_cors_headers() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let preflight = client
            .request(reqwest::Method::OPTIONS, format!("{}/anything", base))
            .header("Origin", "http://example.com")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .unwrap();
        assert_eq!(preflight.status(), reqwest::StatusCode::OK);
        assert_eq!(
            preflight.headers()["access-control-allow-origin"],
            "*"
        );

        let response = client
            .get(format!("{}/rooms", base))
            .header("Origin", "http://example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
    }
}
