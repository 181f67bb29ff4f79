//! Weather API client (`current.json` / `forecast.json`).
//!
//! The API signals its own failures with an `{"error": {"code", "message"}}`
//! body, often alongside HTTP 200, so the body is inspected before the status.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::conditions::WeatherCondition;

/// Which report endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Current,
    Forecast,
}

impl ReportKind {
    fn endpoint(self) -> &'static str {
        match self {
            ReportKind::Current => "current.json",
            ReportKind::Forecast => "forecast.json",
        }
    }
}

/// Client for the weather API.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    api_root: String,
    api_key: String,
    conditions_url: String,
}

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    pub city_name: String,
    pub local_time: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub wind_kph: f64,
    pub visibility_km: f64,
}

/// Day-level extremes from the first forecast day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayStats {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub maxwind_kph: f64,
    pub maxwind_mph: f64,
    pub totalprecip_mm: f64,
    pub totalprecip_in: f64,
    pub avgvis_km: f64,
    pub avgvis_miles: f64,
    pub avghumidity: f64,
    pub condition: DayCondition,
}

/// Only the code is kept; the sentence comes from the condition catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayCondition {
    pub code: i64,
}

/// Sun and moon times, as the API formats them (e.g. "07:42 AM").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
}

/// Current conditions plus the first forecast day for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub current: CityReport,
    pub date: NaiveDate,
    pub day: DayStats,
    pub astro: Astro,
}

/// A report type that one of the API endpoints produces.
pub trait Report: Sized {
    const KIND: ReportKind;

    fn from_body(body: serde_json::Value) -> Result<Self, AppError>;
}

// --- Weather API JSON response types ---

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    wind_kph: f64,
    vis_km: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    location: ApiLocation,
    current: ApiCurrent,
    forecast: ApiForecast,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: DayStats,
    astro: Astro,
}

fn city_report(location: ApiLocation, current: ApiCurrent) -> CityReport {
    CityReport {
        city_name: location.name,
        local_time: location.localtime,
        temperature_c: current.temp_c,
        feels_like_c: current.feelslike_c,
        wind_kph: current.wind_kph,
        visibility_km: current.vis_km,
    }
}

fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| {
        AppError::ExternalServiceError(format!("weather API response structure error: {}", e))
    })
}

impl Report for CityReport {
    const KIND: ReportKind = ReportKind::Current;

    fn from_body(body: serde_json::Value) -> Result<Self, AppError> {
        let parsed: ApiCurrentResponse = parse_body(body)?;
        Ok(city_report(parsed.location, parsed.current))
    }
}

impl Report for ForecastReport {
    const KIND: ReportKind = ReportKind::Forecast;

    fn from_body(body: serde_json::Value) -> Result<Self, AppError> {
        let parsed: ApiForecastResponse = parse_body(body)?;
        let first = parsed.forecast.forecastday.into_iter().next().ok_or_else(|| {
            AppError::ExternalServiceError("weather API returned no forecast days".to_string())
        })?;
        Ok(ForecastReport {
            current: city_report(parsed.location, parsed.current),
            date: first.date,
            day: first.day,
            astro: first.astro,
        })
    }
}

/// Map a transport failure. Connect and timeout failures are the
/// "could not reach the host" class; everything else is an upstream fault.
fn request_error(url: &str, e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::Network(url.to_string())
    } else {
        AppError::ExternalServiceError(format!("weather API request failed: {}", e))
    }
}

impl WeatherApiClient {
    pub fn new(api_root: &str, api_key: &str, conditions_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_root: api_root.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            conditions_url: conditions_url.to_string(),
        }
    }

    /// Fetch one report for `city`. No retries: any failure is returned as is.
    pub async fn fetch_report<R: Report>(&self, city: &str) -> Result<R, AppError> {
        let body = self.fetch_body(R::KIND, city).await?;
        R::from_body(body)
    }

    async fn fetch_body(&self, kind: ReportKind, city: &str) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/{}", self.api_root, kind.endpoint());
        tracing::debug!("Fetch request made: {}?q={}", url, city);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!(
                "weather API JSON parse error (HTTP {}): {}",
                status, e
            ))
        })?;

        if let Some(error) = body.get("error") {
            let error: ApiErrorBody = serde_json::from_value(error.clone()).map_err(|e| {
                AppError::ExternalServiceError(format!("weather API error body malformed: {}", e))
            })?;
            tracing::debug!("Error handled: [{} - {}]", error.code, error.message);
            return Err(AppError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "weather API returned HTTP {}",
                status
            )));
        }

        Ok(body)
    }

    /// Fetch the static condition catalog.
    pub async fn fetch_condition_catalog(&self) -> Result<Vec<WeatherCondition>, AppError> {
        let url = &self.conditions_url;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "condition catalog returned HTTP {}",
                response.status()
            )));
        }

        let conditions: Vec<WeatherCondition> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("condition catalog parse error: {}", e))
        })?;
        tracing::debug!("Weather conditions API fetched: {}", url);
        Ok(conditions)
    }
}
