/// Default upstream weather API root (`<root>/current.json`, `<root>/forecast.json`).
const DEFAULT_WEATHER_API_ROOT: &str = "https://api.weatherapi.com/v1";
/// Default location of the static weather condition catalog.
const DEFAULT_CONDITIONS_URL: &str = "https://www.weatherapi.com/docs/weather_conditions.json";
const DEFAULT_NEAREST_CITY: &str = "Suntree";
const DEFAULT_CITIES: &str = "Paris,London,Dubai,Moscow,Rome";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weather_api_root: String,
    pub weather_api_key: String,
    pub conditions_url: String,
    /// City pinned in the first table row.
    pub nearest_city: String,
    /// Monitored cities: the selector options and the aggregate inputs.
    pub cities: Vec<String>,
    pub port: u16,
    pub clue_port: u16,
    /// Base URL the `/clue` page fetches from.
    pub clue_url: String,
    /// Process-wide debug logging switch.
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let weather_api_key = lookup("WEATHER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("WEATHER_API_KEY"))?;

        let cities_raw = lookup("CITIES").unwrap_or_else(|| DEFAULT_CITIES.to_string());
        let cities = parse_city_list(&cities_raw);
        if cities.is_empty() {
            return Err(ConfigError::Invalid {
                var: "CITIES",
                value: cities_raw,
            });
        }

        let port = parse_port(&lookup, "PORT", 8080)?;
        let clue_port = parse_port(&lookup, "CLUE_PORT", 8088)?;

        let debug = match lookup("DEBUG") {
            None => true,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                var: "DEBUG",
                value: raw,
            })?,
        };

        Ok(Self {
            weather_api_root: lookup("WEATHER_API_ROOT")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_ROOT.to_string()),
            weather_api_key,
            conditions_url: lookup("WEATHER_CONDITIONS_URL")
                .unwrap_or_else(|| DEFAULT_CONDITIONS_URL.to_string()),
            nearest_city: lookup("NEAREST_CITY").unwrap_or_else(|| DEFAULT_NEAREST_CITY.to_string()),
            cities,
            port,
            clue_port,
            clue_url: lookup("CLUE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/", clue_port)),
            debug,
        })
    }

    /// The city shown in the SELECTED row when the request names none.
    pub fn default_city(&self) -> &str {
        // `from_lookup` rejects an empty list
        self.cities.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_monitored(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }
}

fn parse_city_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_port<F>(lookup: &F, var: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
