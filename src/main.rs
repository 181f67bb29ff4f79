// City Weather Table v0.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::dashboard::AppState;
use services::clue_client::ClueClient;
use services::conditions::ConditionStore;
use services::weather_api::WeatherApiClient;

/// City Weather Table: OpenAPI specification for the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "City Weather Table",
        version = "0.1.0",
        description = "Server-rendered weather dashboard for a fixed list of cities, \
            plus the clue demo API served on its own port.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Clue", description = "Clue demo server (separate port)"),
    ),
    paths(
        routes::health::health_check,
        routes::clue::get_all,
        routes::clue::get_suspects,
        routes::clue::get_rooms,
        routes::clue::get_weapons,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::clue::AllCluesResponse,
            routes::clue::SuspectsResponse,
            routes::clue::RoomsResponse,
            routes::clue::WeaponsResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "weather_table=debug,tower_http=debug"
    } else {
        "weather_table=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn dashboard_router(config: &Arc<AppConfig>) -> Router {
    let conditions = ConditionStore::new();

    let app_state = AppState {
        config: config.clone(),
        weather_client: WeatherApiClient::new(
            &config.weather_api_root,
            &config.weather_api_key,
            &config.conditions_url,
        ),
        conditions: conditions.clone(),
        clue_client: ClueClient::new(&config.clue_url),
    };

    let page_routes = Router::new()
        .route("/", get(routes::dashboard::get_dashboard))
        .route("/forecast", get(routes::dashboard::get_forecast))
        .route("/clue", get(routes::dashboard::get_clue))
        .with_state(app_state);

    // Health check reports on the shared condition catalog
    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(conditions);

    Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

async fn serve(name: &'static str, port: u16, app: Router) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} listening on {}", name, addr);
    axum::serve(listener, app).await
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Debug stays on until the config says otherwise
    init_tracing(config.as_ref().map(|c| c.debug).unwrap_or(true));

    let config = match config {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Monitoring {} cities ({}), nearest city {}",
        config.cities.len(),
        config.cities.join(", "),
        config.nearest_city
    );
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let result = tokio::try_join!(
        serve("Dashboard", config.port, dashboard_router(&config)),
        serve("Clue server", config.clue_port, routes::clue::router()),
    );

    if let Err(e) = result {
        tracing::error!("Server terminated unexpectedly: {}", e);
        std::process::exit(1);
    }
}
