//! Dashboard HTTP endpoints.
//!
//! - GET /?city=NAME
//! - GET /forecast?row=nearest|selected&city=NAME
//! - GET /clue

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::helpers::escape_html;
use crate::services::clue_client::{ClueClient, ClueClientError};
use crate::services::conditions::ConditionStore;
use crate::services::forecast_panel::render_forecast;
use crate::services::refresh::{refresh_dashboard, Dashboard};
use crate::services::table::RowId;
use crate::services::weather_api::{ForecastReport, WeatherApiClient};

/// Shared application state for dashboard endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<AppConfig>,
    pub(crate) weather_client: WeatherApiClient,
    pub(crate) conditions: ConditionStore,
    pub(crate) clue_client: ClueClient,
}

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// City for the SELECTED row; defaults to the first monitored city.
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowParam {
    Nearest,
    Selected,
}

impl From<RowParam> for RowId {
    fn from(row: RowParam) -> Self {
        match row {
            RowParam::Nearest => RowId::Nearest,
            RowParam::Selected => RowId::Selected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub row: RowParam,
    pub city: Option<String>,
}

/// Resolve the SELECTED city, rejecting anything outside the monitored list.
fn selected_city(config: &AppConfig, requested: Option<String>) -> Result<String, AppError> {
    match requested {
        None => Ok(config.default_city().to_string()),
        Some(city) if config.is_monitored(&city) => Ok(city),
        Some(city) => Err(AppError::BadRequest(format!(
            "'{}' is not one of the monitored cities",
            city
        ))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Full dashboard: aggregate header, city selector and the two-row table.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Dashboard, AppError> {
    let selected = selected_city(&state.config, params.city)?;

    // Load the catalog in the background so the forecast action finds it cached
    state.conditions.warm(&state.weather_client);

    Ok(refresh_dashboard(
        &state.weather_client,
        &state.config.cities,
        &state.config.nearest_city,
        &selected,
    )
    .await)
}

/// Forecast panel for one of the two rows.
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Html<String>, AppError> {
    let city = match RowId::from(params.row) {
        RowId::Nearest => state.config.nearest_city.clone(),
        RowId::Selected => selected_city(&state.config, params.city)?,
    };

    let report: ForecastReport = state.weather_client.fetch_report(&city).await?;
    let catalog = state.conditions.get_or_load(&state.weather_client).await;
    let panel = render_forecast(report, &catalog);

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html><head><title>Forecast</title></head>\n<body>\n\
         <p><a href=\"/\">Back</a></p>\n{}</body></html>\n",
        panel.to_html()
    )))
}

/// The three clue lists, fetched from the clue server.
pub async fn get_clue(State(state): State<AppState>) -> Response {
    match state.clue_client.fetch_all().await {
        Ok(lists) => Html(format!(
            "<!DOCTYPE html>\n<html><head><title>Clue</title></head>\n<body>\n\
             <p><strong>Suspects: </strong><span id=\"suspects\">{}</span></p>\n\
             <p><strong>Rooms: </strong><span id=\"rooms\">{}</span></p>\n\
             <p><strong>Weapons: </strong><span id=\"weapons\">{}</span></p>\n</body></html>\n",
            escape_html(&lists.suspects.join(", ")),
            escape_html(&lists.rooms.join(", ")),
            escape_html(&lists.weapons.join(", ")),
        ))
        .into_response(),
        Err(e) => {
            tracing::error!("Clue request failed: {}", e);
            let status = match &e {
                ClueClientError::Server { error, .. } => {
                    StatusCode::from_u16(*error).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                ClueClientError::Unreachable(_) | ClueClientError::Malformed(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (
                status,
                Html(format!(
                    "<!DOCTYPE html>\n<html><head><title>Error</title></head>\n<body>\
                     <h1>Error {}</h1>{}</body></html>\n",
                    e.error_number(),
                    escape_html(&e.description())
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::weather_api::tests::{current_body, forecast_body};
    use axum::Json;
    use axum::body::to_bytes;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_root: &str, conditions_url: &str, clue_url: &str) -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "WEATHER_API_KEY" => Some("k".to_string()),
            "WEATHER_API_ROOT" => Some(api_root.to_string()),
            "WEATHER_CONDITIONS_URL" => Some(conditions_url.to_string()),
            "CLUE_URL" => Some(clue_url.to_string()),
            "CITIES" => Some("Paris,Rome".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn state(config: AppConfig) -> AppState {
        AppState {
            weather_client: WeatherApiClient::new(
                &config.weather_api_root,
                &config.weather_api_key,
                &config.conditions_url,
            ),
            clue_client: ClueClient::new(&config.clue_url),
            conditions: ConditionStore::new(),
            config: Arc::new(config),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_selected_city_defaults_to_first() {
        let config = config("http://x", "http://x", "http://x");
        assert_eq!(selected_city(&config, None).unwrap(), "Paris");
        assert_eq!(selected_city(&config, Some("Rome".into())).unwrap(), "Rome");
        assert!(matches!(
            selected_city(&config, Some("Atlantis".into())),
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_handler() {
        let mock_server = MockServer::start().await;
        for (city, temp) in [("Paris", 12.0), ("Rome", 22.0), ("Suntree", 27.0)] {
            Mock::given(method("GET"))
                .and(path("/current.json"))
                .and(query_param("q", city))
                .respond_with(ResponseTemplate::new(200).set_body_json(current_body(city, temp)))
                .mount(&mock_server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/conditions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let state = state(config(&uri, &format!("{}/conditions.json", uri), "http://x"));
        let conditions = state.conditions.clone();

        let dashboard = get_dashboard(
            State(state),
            Query(DashboardQuery {
                city: Some("Rome".to_string()),
            }),
        )
        .await
        .unwrap();
        let response = dashboard.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::timeout(Duration::from_secs(5), async {
            while !conditions.is_loaded().await {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("<span id=\"city-averages-hottest\">Rome</span>"));
        assert!(html.contains("<span id=\"city-averages-temp\">17</span>"));
        let nearest = html.find("closest-city-record\"").unwrap();
        let selected = html.find("select-city-record\"").unwrap();
        assert!(nearest < selected);
    }

    #[tokio::test]
    async fn test_dashboard_renders_while_catalog_hangs() {
        let mock_server = MockServer::start().await;
        for (city, temp) in [("Paris", 12.0), ("Rome", 22.0), ("Suntree", 27.0)] {
            Mock::given(method("GET"))
                .and(path("/current.json"))
                .and(query_param("q", city))
                .respond_with(ResponseTemplate::new(200).set_body_json(current_body(city, temp)))
                .mount(&mock_server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/conditions.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let state = state(config(&uri, &format!("{}/conditions.json", uri), "http://x"));
        let conditions = state.conditions.clone();

        let dashboard = tokio::time::timeout(
            Duration::from_secs(3),
            get_dashboard(State(state), Query(DashboardQuery { city: None })),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(dashboard.into_response().status(), StatusCode::OK);

        // The health check reads the store while the catalog fetch is still pending
        let Json(health) = tokio::time::timeout(
            Duration::from_secs(1),
            crate::routes::health::health_check(State(conditions)),
        )
        .await
        .unwrap();
        assert!(!health.conditions_loaded);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_unknown_city() {
        let state = state(config("http://127.0.0.1:1", "http://127.0.0.1:1", "http://x"));
        let result = get_dashboard(
            State(state),
            Query(DashboardQuery {
                city: Some("Atlantis".to_string()),
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_handler_nearest_row() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("q", "Suntree"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Suntree", 1063)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/conditions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "code": 1063, "day": "Patchy rain possible", "night": "Patchy rain nearby" }
            ])))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let state = state(config(&uri, &format!("{}/conditions.json", uri), "http://x"));

        let Html(html) = get_forecast(
            State(state),
            Query(ForecastQuery {
                row: RowParam::Nearest,
                city: Some("Paris".to_string()),
            }),
        )
        .await
        .unwrap();

        assert!(html.contains("<span id=\"city-forecast-name\">Suntree</span>"));
        assert!(html.contains(
            "It will be Patchy rain possible during the day and Patchy rain nearby at night."
        ));
    }

    #[tokio::test]
    async fn test_forecast_handler_remote_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "code": 1002, "message": "API key not provided." }
            })))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let state = state(config(&uri, &uri, "http://x"));
        let result = get_forecast(
            State(state),
            Query(ForecastQuery {
                row: RowParam::Selected,
                city: None,
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Error 401</h1>"));
    }

    #[tokio::test]
    async fn test_clue_page_unreachable() {
        let state = state(config("http://x", "http://x", "http://127.0.0.1:1/"));
        let response = get_clue(State(state)).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Error 0</h1>"));
    }
}
