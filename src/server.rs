use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::api::{ApiErrorResponse, ApiExportRequest, ApiGenerateRequest, ApiGenerateResponse};
use crate::error::{Error, Result};
use adify::config::Settings;
use adify::export::{variants_to_csv, EXPORT_FILENAME, EXPORT_MIME};
use adify::pipeline::{run_action_with_progress, Outcome};
use adify::{CopyGenerator, CopyScorer, Platform, Variant};

type Channels = Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>;

#[derive(Clone)]
pub struct AppState {
    generator: CopyGenerator,
    scorer: Arc<CopyScorer>,
    channels: Channels,
}

impl AppState {
    pub fn new(generator: CopyGenerator, scorer: CopyScorer) -> Self {
        Self {
            generator,
            scorer: Arc::new(scorer),
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// How long a progress channel outlives the request that opened it.
const CHANNEL_TTL: Duration = Duration::from_secs(10);

pub async fn serve(args: crate::ServeArgs, settings: Settings) -> Result<()> {
    let state = AppState::new(
        CopyGenerator::from_settings(&settings),
        CopyScorer::new(settings.scoring.clone()),
    );

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = build_router(state).fallback_service(static_service);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| Error::Server(format!("invalid bind address: {}", err)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| Error::Server(format!("failed to bind server: {}", err)))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|err| Error::Server(err.to_string()))?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/platforms", get(platforms))
        .route("/api/generate", post(generate_handler))
        .route("/api/generate/stream", get(stream_handler))
        .route("/api/export", post(export_handler))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn platforms() -> Json<Vec<&'static str>> {
    Json(Platform::ALL.iter().map(|platform| platform.label()).collect())
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiGenerateRequest>,
) -> Response {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let user_request = match request.into_request() {
        Ok(user_request) => user_request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, Some(request_id), err, None),
    };

    let sender = get_or_create_channel(&state, &request_id).await;
    let outcome = run_action_with_progress(&state.generator, &state.scorer, &user_request, |stage| {
        send_event(&sender, stage.event(), &stage.message());
    })
    .await;
    schedule_cleanup(state.channels.clone(), request_id.clone());

    match outcome {
        Outcome::Ok(report) => match variants_to_csv(&report.variants) {
            Ok(bytes) => {
                let csv = String::from_utf8_lossy(&bytes).into_owned();
                Json(ApiGenerateResponse::from_report(report, csv, request_id)).into_response()
            }
            Err(err) => {
                send_event(&sender, "error", "Export failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, Some(request_id), err.to_string(), None)
            }
        },
        Outcome::ValidationError(message) => {
            send_event(&sender, "error", &message);
            error_response(StatusCode::BAD_REQUEST, Some(request_id), message, None)
        }
        failed @ (Outcome::GenerationEmpty | Outcome::ParseEmpty { .. }) => {
            let message = failed.message().unwrap_or_default().to_string();
            send_event(&sender, "error", &message);
            let raw_text = match failed {
                Outcome::ParseEmpty { raw_text } => Some(raw_text),
                _ => None,
            };
            warn!(request_id = %request_id, "no variants extracted");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, Some(request_id), message, raw_text)
        }
    }
}

async fn export_handler(Json(request): Json<ApiExportRequest>) -> Response {
    let variants: Vec<Variant> = request.variants.into_iter().map(Variant::from).collect();
    match variants_to_csv(&variants) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, None, err.to_string(), None),
    }
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> std::result::Result<
    Sse<impl tokio_stream::Stream<Item = std::result::Result<Event, std::convert::Infallible>>>,
    StatusCode,
> {
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    schedule_cleanup(state.channels.clone(), query.request_id);
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming generation status");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

fn error_response(
    status: StatusCode,
    request_id: Option<String>,
    error: String,
    raw_text: Option<String>,
) -> Response {
    (
        status,
        Json(ApiErrorResponse {
            request_id,
            error,
            raw_text,
        }),
    )
        .into_response()
}

async fn get_or_create_channel(state: &AppState, request_id: &str) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(channels: Channels, request_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(CHANNEL_TTL).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
