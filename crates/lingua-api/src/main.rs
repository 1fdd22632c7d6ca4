//! lingua-api - HTTP API server for lingua-tutor

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lingua_chat::{ChatService, TranscriptionPipeline};
use lingua_core::defaults;
use lingua_db::Database;
use lingua_inference::{ConfigService, LlmClient, WhisperBackend};

// =============================================================================
// APP STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    chats: ChatService,
    pipeline: TranscriptionPipeline,
    config: Arc<ConfigService>,
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "lingua_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lingua_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Database
    let database_url = std::env::var(defaults::ENV_DATABASE_URL)
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    // Inference stack: injected config, multi-provider LLM client, speech
    let config = Arc::new(ConfigService::from_env());
    let llm = Arc::new(LlmClient::new(config.clone())?);
    let whisper = Arc::new(WhisperBackend::new(config.clone())?);

    let chats = ChatService::new(
        db.chats.clone(),
        db.messages.clone(),
        db.documents.clone(),
        llm.clone(),
    );
    let pipeline = TranscriptionPipeline::new(whisper, llm, config.clone());

    let state = AppState {
        db,
        chats,
        pipeline,
        config,
    };

    // Build router
    let app = Router::new()
        .route("/", get(root_info))
        .route("/health", get(health_check))
        // Chats
        .route(
            "/api/chats",
            get(handlers::chats::list_chats).post(handlers::chats::create_chat),
        )
        .route(
            "/api/chats/:id",
            get(handlers::chats::get_chat).delete(handlers::chats::delete_chat),
        )
        .route("/api/chats/:id/messages", post(handlers::chats::send_message))
        // Documents
        .route(
            "/api/documents",
            get(handlers::documents::list_documents),
        )
        .route("/api/documents/upload", post(handlers::documents::upload_document))
        .route(
            "/api/documents/:id",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        // Categories
        .route(
            "/api/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/api/categories/:id",
            axum::routing::delete(handlers::categories::delete_category),
        )
        // Grammar rules
        .route(
            "/api/grammar-rules",
            get(handlers::grammar::list_grammar_rules).post(handlers::grammar::create_grammar_rule),
        )
        .route(
            "/api/grammar-rules/:id",
            axum::routing::delete(handlers::grammar::delete_grammar_rule),
        )
        // Audio
        .route("/api/audio/transcribe", post(handlers::audio::transcribe))
        .route(
            "/api/audio/transcribe-and-send",
            post(handlers::audio::transcribe_and_send),
        )
        .route("/api/audio/formats", get(handlers::audio::formats))
        // Config
        .route(
            "/api/config",
            get(handlers::config::get_config).post(handlers::config::update_llm_config),
        )
        .route(
            "/api/config/whisper",
            post(handlers::config::update_whisper_config),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
        )
        // Audio uploads are capped at 25 MB; leave headroom for the
        // multipart framing.
        .layer(RequestBodyLimitLayer::new(defaults::MAX_AUDIO_SIZE_BYTES + 64 * 1024))
        .with_state(state);

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(defaults::SERVER_PORT);
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}

async fn root_info() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "lingua-tutor",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    BadRequest(String),
    ServiceUnavailable(String),
    BadGateway(String),
    Internal(String),
}

impl From<lingua_core::Error> for ApiError {
    fn from(err: lingua_core::Error) -> Self {
        use lingua_core::Error;
        match err {
            Error::NotFound(_) | Error::ChatNotFound(_) | Error::DocumentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::MissingCredential(msg) => ApiError::BadRequest(msg),
            Error::UpstreamUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            Error::Upstream(msg) => ApiError::BadGateway(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
