//! One full dashboard refresh.
//!
//! Every request builds a fresh `Dashboard`: the aggregate loop awaits one
//! city at a time, then the NEAREST and SELECTED rows are fetched one after
//! the other. The first failure stops the cycle and puts the table in its
//! error state.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::errors::AppError;
use crate::helpers::{escape_html, fmt_measure};
use crate::services::aggregate::{fold_report, AggregateState};
use crate::services::table::{CityTable, RowId, TableState};
use crate::services::weather_api::{CityReport, WeatherApiClient};

/// Everything one page load shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub cities: Vec<String>,
    pub nearest_city: String,
    pub selected_city: String,
    pub aggregate: AggregateState,
    pub table: CityTable,
}

impl Dashboard {
    fn new(cities: &[String], nearest_city: &str, selected_city: &str) -> Self {
        Self {
            cities: cities.to_vec(),
            nearest_city: nearest_city.to_string(),
            selected_city: selected_city.to_string(),
            aggregate: AggregateState::new(cities.len()),
            table: CityTable::new(),
        }
    }
}

/// Run one refresh cycle. Failures are recorded in the table, not returned.
pub async fn refresh_dashboard(
    client: &WeatherApiClient,
    cities: &[String],
    nearest_city: &str,
    selected_city: &str,
) -> Dashboard {
    let mut dashboard = Dashboard::new(cities, nearest_city, selected_city);

    match populate(client, &mut dashboard).await {
        Ok(()) => tracing::debug!("Main page refreshed"),
        Err(e) => {
            tracing::error!("Refresh aborted: {}", e);
            dashboard.table.fail(&e);
        }
    }

    dashboard
}

async fn populate(client: &WeatherApiClient, dashboard: &mut Dashboard) -> Result<(), AppError> {
    for city in &dashboard.cities {
        let report: CityReport = client.fetch_report(city).await?;
        dashboard.aggregate = fold_report(dashboard.aggregate.clone(), city, &report);
    }

    let nearest: CityReport = client.fetch_report(&dashboard.nearest_city).await?;
    dashboard
        .table
        .render_row(RowId::Nearest, &dashboard.nearest_city, &nearest);

    let selected: CityReport = client.fetch_report(&dashboard.selected_city).await?;
    dashboard
        .table
        .render_row(RowId::Selected, &dashboard.selected_city, &selected);

    Ok(())
}

impl Dashboard {
    fn selector_html(&self) -> String {
        let mut html = String::from(
            "<form method=\"get\" action=\"/\">\n<select id=\"city-select\" name=\"city\">\n",
        );
        for city in &self.cities {
            let selected = if *city == self.selected_city {
                " selected"
            } else {
                ""
            };
            html.push_str(&format!(
                "<option value=\"{city}\"{selected}>{city}</option>\n",
                city = escape_html(city),
                selected = selected,
            ));
        }
        html.push_str("</select>\n<input type=\"submit\" value=\"Show\">\n</form>\n");
        html
    }

    fn averages_html(&self) -> String {
        let hottest = self
            .aggregate
            .hottest
            .city_name
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "none".to_string());
        format!(
            "<p>Average temperature: <span id=\"city-averages-temp\">{}</span>&#176;C, \
             hottest city: <span id=\"city-averages-hottest\">{}</span></p>\n",
            fmt_measure((self.aggregate.average_temperature_c * 10.0).round() / 10.0),
            hottest,
        )
    }

    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>City weather</title></head>\n<body>\n\
             <h1>City weather</h1>\n{}{}{}<div id=\"forecast-info\"></div>\n</body></html>\n",
            self.averages_html(),
            self.selector_html(),
            self.table.to_html(),
        )
    }
}

impl IntoResponse for Dashboard {
    fn into_response(self) -> Response {
        match self.table.state() {
            TableState::Error(page) => page.clone().into_response(),
            TableState::Empty | TableState::Populated => {
                (StatusCode::OK, Html(self.to_html())).into_response()
            }
        }
    }
}
