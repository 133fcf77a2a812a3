// Bazi Naming - Web Server
// JSON API over the naming engine plus the static front page

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use bazi_naming::{
    BirthMoment, ElementAnalysis, NamingConfig, NamingEngine, NamingError, NamingReport,
    NamingRequest, Pillar,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state
#[derive(Clone)]
struct AppState {
    engine: NamingEngine,
    seed: Option<u64>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Birth moment query string: ?year=1990&month=2&day=4&hour=10
#[derive(Debug, Deserialize)]
struct BirthQuery {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    seed: Option<u64>,
}

impl BirthQuery {
    fn birth(&self) -> Result<BirthMoment, NamingError> {
        BirthMoment::new(self.year, self.month, self.day, self.hour)
    }
}

/// Chart response
#[derive(Serialize)]
struct ChartResponse {
    pillars: [Pillar; 4],
    chart_text: String,
    zodiac: String,
    analysis: ElementAnalysis,
}

fn error_response(err: NamingError) -> Response {
    let status = match err {
        NamingError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "naming failed");
    }

    (status, Json(ApiResponse::err(err.to_string()))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/chart - Four pillars and element analysis
async fn get_chart(State(state): State<AppState>, Query(query): Query<BirthQuery>) -> Response {
    let birth = match query.birth() {
        Ok(birth) => birth,
        Err(e) => return error_response(e),
    };

    let (chart, analysis) = state.engine.chart(&birth);
    let response = ChartResponse {
        pillars: chart.pillars(),
        chart_text: chart.to_string(),
        zodiac: chart.zodiac().to_string(),
        analysis,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/names/:surname - Three element-guided names
async fn get_names(
    State(state): State<AppState>,
    Path(surname): Path<String>,
    Query(query): Query<BirthQuery>,
) -> Response {
    // Decode URL-encoded surname
    let decoded_surname = urlencoding::decode(&surname)
        .unwrap_or_else(|_| surname.clone().into())
        .into_owned();

    let birth = match query.birth() {
        Ok(birth) => birth,
        Err(e) => return error_response(e),
    };

    let request = NamingRequest::new(&decoded_surname, birth);
    let result: Result<NamingReport, NamingError> = match query.seed.or(state.seed) {
        Some(seed) => state.engine.generate_seeded(&request, seed),
        None => state.engine.generate_random(&request),
    };

    match result {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::ok(report))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bazi_naming::init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = NamingConfig::load(config_path.as_deref())?;
    let engine = config.build_engine()?;

    // Create shared state
    let state = AppState {
        engine,
        seed: config.seed,
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/chart", get(get_chart))
        .route("/names/:surname", get(get_names))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!(addr = %config.bind_addr, "server running");
    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: /api/names/王?year=1990&month=2&day=4&hour=10");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
