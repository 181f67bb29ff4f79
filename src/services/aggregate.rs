//! Average temperature and hottest city across the monitored cities.
//!
//! The average is accumulated by adding `temperature / total_city_count` per
//! folded report, so it only means something once every city has been folded.

use crate::services::weather_api::CityReport;

/// Hottest city seen so far in the current refresh cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HottestCity {
    pub city_name: Option<String>,
    pub temperature_c: Option<f64>,
}

/// Aggregate over the monitored city list, rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState {
    pub average_temperature_c: f64,
    pub hottest: HottestCity,
    /// Number of cities the average is divided over.
    total_city_count: usize,
}

impl AggregateState {
    pub fn new(total_city_count: usize) -> Self {
        Self {
            average_temperature_c: 0.0,
            hottest: HottestCity::default(),
            total_city_count,
        }
    }
}

/// Fold one city's report into the aggregate.
///
/// The first folded city always becomes the hottest; after that a city only
/// replaces it with a strictly greater temperature, so ties keep the earlier city.
pub fn fold_report(state: AggregateState, city_name: &str, report: &CityReport) -> AggregateState {
    let temperature_c = report.temperature_c;

    let replace = match state.hottest.temperature_c {
        None => true,
        Some(current) => temperature_c > current,
    };
    let hottest = if replace {
        HottestCity {
            city_name: Some(city_name.to_string()),
            temperature_c: Some(temperature_c),
        }
    } else {
        state.hottest
    };

    // A zero count only happens when folding into a state built for no cities
    let divisor = state.total_city_count.max(1) as f64;

    tracing::debug!(
        "City {} has a temperature of {}",
        city_name,
        temperature_c
    );

    AggregateState {
        average_temperature_c: state.average_temperature_c + temperature_c / divisor,
        hottest,
        total_city_count: state.total_city_count,
    }
}
