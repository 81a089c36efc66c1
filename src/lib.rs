pub mod error;
pub mod handlers;
pub mod lessons;
pub mod models;
pub mod openapi;
pub mod settings;
pub mod sheets;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Router, routing::get};
use handlers::{get_lesson, get_lesson_without_id, healthz_live, healthz_ready, list_lessons, root};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::sheets::{GoogleSheetsClient, SheetReader};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub reader: Arc<dyn SheetReader>,
}

impl AppState {
    pub fn new(settings: Settings, reader: Arc<dyn SheetReader>) -> Self {
        Self { settings, reader }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let reader = GoogleSheetsClient::new(&settings)?;
    let state = AppState::new(settings, Arc::new(reader));

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Lesson Schedule API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/api/lessons", get(list_lessons))
        .route("/api/lessons/", get(get_lesson_without_id))
        .route("/api/lessons/{id}", get(get_lesson))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    if let Some(origin) = state.settings.cors_allow_origin.as_deref() {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => {
                router = router.layer(
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods([Method::GET]),
                );
            }
            Err(err) => warn!(error = %err, origin, "ignoring invalid CORS origin"),
        }
    }

    router.layer(trace_layer)
}
