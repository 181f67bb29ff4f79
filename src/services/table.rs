//! The two-row city table.
//!
//! Rows are rebuilt from scratch on every render and appended at the end, the
//! way a fresh `<tr>` would be; `fix_order` then moves the NEAREST row
//! directly in front of the SELECTED row so the order never depends on which
//! row was rendered last.
//!
//! State machine: `Empty -> Populated` on the first render, `Populated ->
//! Populated` on later renders, and anything `-> Error` on failure. `Error` is
//! terminal for the lifetime of the table; a new table starts `Empty`.

use crate::errors::{AppError, ErrorPage};
use crate::helpers::{escape_html, fmt_measure, query_value};
use crate::services::weather_api::CityReport;

/// Temperatures below this get a "feels like" qualifier.
const FEELS_LIKE_BELOW_C: f64 = 20.0;

/// Which of the two fixed rows a render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowId {
    Nearest,
    Selected,
}

impl RowId {
    /// Element id of the `<tr>`.
    pub fn element_id(self) -> &'static str {
        match self {
            RowId::Nearest => "closest-city-record",
            RowId::Selected => "select-city-record",
        }
    }

    /// Value of the `row` query parameter of the forecast action.
    pub fn as_param(self) -> &'static str {
        match self {
            RowId::Nearest => "nearest",
            RowId::Selected => "selected",
        }
    }
}

/// Which city a row currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowBinding {
    pub row_id: RowId,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub binding: TableRowBinding,
    /// City, local time, temperature, wind, visibility, forecast control.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Empty,
    Populated,
    Error(ErrorPage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    rows: Vec<RenderedRow>,
    state: TableState,
}

impl Default for CityTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Temperature cell text: `19<br>(Feels like 17)` below 20 °C, bare otherwise.
pub fn temperature_cell(report: &CityReport) -> String {
    let temperature = fmt_measure(report.temperature_c);
    if report.temperature_c < FEELS_LIKE_BELOW_C {
        format!(
            "{}<br>(Feels like {})",
            temperature,
            fmt_measure(report.feels_like_c)
        )
    } else {
        temperature
    }
}

fn forecast_control(binding: &TableRowBinding) -> String {
    format!(
        "<a class=\"forecast-button\" id=\"{id}-input\" href=\"/forecast?row={row}&amp;city={city}\">Forecast</a>",
        id = binding.row_id.element_id(),
        row = binding.row_id.as_param(),
        city = escape_html(&query_value(&binding.city)),
    )
}

impl CityTable {
    pub fn new() -> Self {
        Self {
            rows: Vec::with_capacity(2),
            state: TableState::Empty,
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    /// Current top-to-bottom row order.
    #[cfg(test)]
    pub fn row_order(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.binding.row_id).collect()
    }

    /// Clear and rebuild one row from a report, then restore the row order.
    ///
    /// `city` is the city the row is bound to, which may differ from the
    /// name the API reports. Ignored once the table is in the error state.
    pub fn render_row(&mut self, row_id: RowId, city: &str, report: &CityReport) {
        if matches!(self.state, TableState::Error(_)) {
            tracing::debug!(
                "Ignoring render of {} after failure",
                row_id.element_id()
            );
            return;
        }

        let binding = TableRowBinding {
            row_id,
            city: city.to_string(),
        };
        let cells = vec![
            escape_html(&report.city_name),
            escape_html(&report.local_time),
            temperature_cell(report),
            fmt_measure(report.wind_kph),
            fmt_measure(report.visibility_km),
            forecast_control(&binding),
        ];

        self.rows.retain(|r| r.binding.row_id != row_id);
        self.rows.push(RenderedRow { binding, cells });
        self.state = TableState::Populated;

        tracing::debug!("City information updated: {}", report.city_name);
        self.fix_order();
    }

    /// Move the NEAREST row directly in front of the SELECTED row.
    /// A no-op when either row is missing or the order is already right.
    pub fn fix_order(&mut self) {
        let nearest = self.position(RowId::Nearest);
        let selected = self.position(RowId::Selected);
        if let (Some(n), Some(s)) = (nearest, selected) {
            if n + 1 == s {
                return;
            }
            let row = self.rows.remove(n);
            let target = if n < s { s - 1 } else { s };
            self.rows.insert(target, row);
        }
    }

    /// Replace the whole surface with an error page.
    pub fn fail(&mut self, err: &AppError) {
        self.state = TableState::Error(err.page());
    }

    fn position(&self, row_id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.binding.row_id == row_id)
    }

    /// The `<table>` element. Empty and error tables render only the header.
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<table id=\"city-table\">\n<tr><th>City</th><th>Local time</th>\
             <th>Temperature (&#176;C)</th><th>Wind (kph)</th><th>Visibility (km)</th><th></th></tr>\n",
        );
        if self.state == TableState::Populated {
            for row in &self.rows {
                html.push_str(&format!("<tr id=\"{}\">", row.binding.row_id.element_id()));
                for cell in &row.cells {
                    html.push_str("<td>");
                    html.push_str(cell);
                    html.push_str("</td>");
                }
                html.push_str("</tr>\n");
            }
        }
        html.push_str("</table>\n");
        html
    }
}
