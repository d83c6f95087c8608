//! LCARS Console HTTP gateway: shared state and the axum router.

pub mod error;
mod handlers;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use lcars_core::guard::RateLimit;
use lcars_core::services::{ChatClient, IssClient, NasaClient, RoutingClient, WeatherClient};
use lcars_core::{ChatBackend, Composer, Console, LcarsConfig, RateLimiter, Terminal, WeatherSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

pub struct AppState {
    pub config: LcarsConfig,
    pub console: Arc<Console>,
    pub weather: Arc<WeatherClient>,
    pub nasa: NasaClient,
    pub iss: IssClient,
    pub routing: RoutingClient,
    pub chat: Arc<dyn ChatBackend>,
    limiter: Mutex<RateLimiter>,
    terminal: Mutex<Terminal>,
}

impl AppState {
    /// Wires the seeded console and the feed clients from `config`.
    pub fn new(config: LcarsConfig) -> Self {
        let timeout = config.fetch_timeout();
        let chat = ChatClient::new(config.anthropic_key(), timeout).with_model(&config.anthropic_model);
        Self::with_parts(config, Arc::new(Console::seeded()), Arc::new(chat))
    }

    /// Same as [`AppState::new`] with an explicit store and chat backend.
    pub fn with_parts(config: LcarsConfig, console: Arc<Console>, chat: Arc<dyn ChatBackend>) -> Self {
        let timeout = config.fetch_timeout();
        Self {
            weather: Arc::new(WeatherClient::new(timeout)),
            nasa: NasaClient::new(&config.nasa_api_key, timeout),
            iss: IssClient::new(timeout),
            routing: RoutingClient::new(config.tomtom_key(), timeout),
            limiter: Mutex::new(RateLimiter::new(RateLimit::per_minute(config.chat_rate_limit))),
            terminal: Mutex::new(Terminal::new()),
            console,
            chat,
            config,
        }
    }

    pub fn limiter(&self) -> MutexGuard<'_, RateLimiter> {
        self.limiter.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn terminal(&self) -> MutexGuard<'_, Terminal> {
        self.terminal.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// City from settings, else the configured default.
    pub fn city(&self) -> String {
        let city = self.console.settings().default_city;
        if city.trim().is_empty() {
            self.config.default_city.clone()
        } else {
            city
        }
    }

    /// Per-request composer over the live store and clients.
    pub fn composer(&self) -> Composer {
        let weather: Arc<dyn WeatherSource> = self.weather.clone();
        Composer::new(self.console.clone(), weather, self.chat.clone())
            .with_city(self.city())
            .with_rng(StdRng::from_entropy())
    }
}

/// Logs method, path, status and latency for every request.
async fn log_traffic(
    connect: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    let peer = connect.map(|ConnectInfo(addr)| addr.to_string()).unwrap_or_default();
    tracing::info!(
        target: "lcars::gateway",
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        peer = %peer,
        "request"
    );
    response
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(handlers::records::list_tasks).post(handlers::records::create_task))
        .route("/api/tasks/stats", get(handlers::records::task_stats))
        .route("/api/tasks/:id/complete", patch(handlers::records::complete_task))
        .route("/api/tasks/:id", delete(handlers::records::delete_task))
        .route(
            "/api/calendar/events",
            get(handlers::records::list_events).post(handlers::records::create_event),
        )
        .route("/api/calendar/events/:id", delete(handlers::records::delete_event))
        .route(
            "/api/notifications",
            get(handlers::records::list_notifications).post(handlers::records::create_notification),
        )
        .route("/api/notifications/mark-all-read", post(handlers::records::mark_all_read))
        .route("/api/notifications/:id/read", patch(handlers::records::mark_read))
        .route("/api/notifications/:id", delete(handlers::records::delete_notification))
        .route(
            "/api/settings",
            get(handlers::records::get_settings).put(handlers::records::update_settings),
        )
        .route("/api/analytics/stats", get(handlers::records::analytics_stats))
        .route(
            "/api/travel/routes",
            get(handlers::records::list_routes).post(handlers::records::save_route),
        )
        .route("/api/travel/routes/:id", delete(handlers::records::delete_route))
        .route("/api/weather", get(handlers::feeds::weather))
        .route("/api/weather/current", get(handlers::feeds::current_weather))
        .route("/api/nasa/apod", get(handlers::feeds::apod))
        .route("/api/iss/location", get(handlers::feeds::iss_location))
        .route("/api/travel/route", get(handlers::feeds::travel_route))
        .route("/api/ai/chat", post(handlers::assistant::ai_chat))
        .route("/api/ai/rate-limit", get(handlers::assistant::rate_limit))
        .route("/api/assistant/command", post(handlers::assistant::command))
        .route("/api/assistant/chat", post(handlers::assistant::chat))
        .route("/api/assistant/sentiment", post(handlers::assistant::sentiment))
        .route("/api/panels", get(handlers::assistant::panels))
        .route("/api/terminal", post(handlers::assistant::terminal))
        .route("/api/terminal/staged", get(handlers::assistant::take_staged))
        .layer(middleware::from_fn(log_traffic))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
