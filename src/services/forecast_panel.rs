//! Secondary forecast panel shown by a row's "Forecast" action.

use crate::helpers::{escape_html, fmt_measure};
use crate::services::conditions::ConditionCatalog;
use crate::services::weather_api::ForecastReport;

/// A forecast ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPanel {
    pub report: ForecastReport,
    /// Condition sentence from the catalog; `None` when the code is unknown.
    pub condition_text: Option<String>,
}

/// Build the panel for a forecast, describing its condition code from the catalog.
/// An unknown code leaves the condition sentence empty.
pub fn render_forecast(report: ForecastReport, catalog: &ConditionCatalog) -> ForecastPanel {
    tracing::debug!(
        "Forecast for {} on day {}",
        report.current.city_name,
        report.date
    );
    let condition_text = catalog.describe(report.day.condition.code);
    ForecastPanel {
        report,
        condition_text,
    }
}

/// One `<strong>label</strong> value` line with metric and imperial units.
fn dual_line(label: &str, metric: f64, metric_unit: &str, imperial: f64, imperial_unit: &str) -> String {
    format!(
        "    <strong>{}: </strong>{}{} ({}{})<br>\n",
        label,
        fmt_measure(metric),
        metric_unit,
        fmt_measure(imperial),
        imperial_unit
    )
}

impl ForecastPanel {
    pub fn to_html(&self) -> String {
        let report = &self.report;
        let day = &report.day;
        let astro = &report.astro;

        let mut html = format!(
            "<div id=\"forecast-info\">\n<h3>Forecast for <span id=\"city-forecast-name\">{}</span> on \
             <span id=\"city-forecast-date\">{}</span>:</h3>\n",
            escape_html(&report.current.city_name),
            report.date.format("%Y-%m-%d"),
        );

        html.push_str("  <div id=\"forecast-day\">\n    <h4>Day</h4>\n");
        html.push_str(&dual_line("High", day.maxtemp_c, "&#176;C", day.maxtemp_f, "&#176;F"));
        html.push_str(&dual_line("Low", day.mintemp_c, "&#176;C", day.mintemp_f, "&#176;F"));
        html.push_str(&dual_line("Average", day.avgtemp_c, "&#176;C", day.avgtemp_f, "&#176;F"));
        html.push_str(&dual_line("Max wind speed", day.maxwind_kph, "KPH", day.maxwind_mph, "MPH"));
        html.push_str(&dual_line(
            "Total precipitation",
            day.totalprecip_mm,
            "mm",
            day.totalprecip_in,
            "in",
        ));
        html.push_str(&dual_line(
            "Average visibility",
            day.avgvis_km,
            "km",
            day.avgvis_miles,
            "miles",
        ));
        html.push_str(&format!(
            "    <strong>Average humidity: </strong>{}<br>\n",
            fmt_measure(day.avghumidity)
        ));
        html.push_str(&format!(
            "    <strong>Condition: </strong><span id=\"condition-text\">{}</span>\n  </div>\n",
            self.condition_text
                .as_deref()
                .map(escape_html)
                .unwrap_or_default()
        ));

        html.push_str("  <div id=\"forecast-astro\">\n    <h4>Astro</h4>\n");
        for (label, value) in [
            ("Sunrise", &astro.sunrise),
            ("Sunset", &astro.sunset),
            ("Moonrise", &astro.moonrise),
            ("Moonset", &astro.moonset),
        ] {
            html.push_str(&format!(
                "    <strong>{}: </strong>{}<br>\n",
                label,
                escape_html(value)
            ));
        }
        html.push_str("  </div>\n</div>\n");
        html
    }
}
