pub mod aggregate;
pub mod clue_client;
pub mod conditions;
pub mod forecast_panel;
pub mod refresh;
pub mod table;
pub mod weather_api;
