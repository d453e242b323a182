use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Logging settings.
///
/// # Environment Variables
///
/// - `LOG_LEVEL`: default level for this service's crates (default: `info`),
///   ignored when `RUST_LOG` is set
/// - `LOG_FORMAT`: `compact` or `json` (default: `compact`)
/// - `LOG_DIR`: when set, structured JSON logs are also written to a daily
///   rolling file in this directory
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Self {
            level: lookup("LOG_LEVEL")
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "info".to_string()),
            format,
            dir: lookup("LOG_DIR").filter(|v| !v.trim().is_empty()),
        }
    }

    fn default_directives(&self) -> String {
        format!(
            "{crate_name}={level},maleva_auth={level},maleva_cache={level},tower_http=warn,axum::rejection=trace",
            crate_name = env!("CARGO_CRATE_NAME"),
            level = self.level,
        )
    }
}

/// Logs every request with a request id, reusing the caller's `x-request-id`
/// when present and echoing it on the response.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let mut response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    macro_rules! completed {
        ($mac:ident, $msg:tt) => {
            $mac!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                latency_ms = %latency_ms,
                $msg
            )
        };
    }

    match status {
        500..=599 => completed!(error, "Server error"),
        400..=499 => completed!(warn, "Client error"),
        _ => completed!(info, "Request completed"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Installs the global subscriber: console output in the configured format,
/// plus a daily rolling JSON file when a log directory is configured.
pub fn init_tracing(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.default_directives()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (compact_layer, json_layer) = match settings.format {
        LogFormat::Compact => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
    };

    let mut file_error = None;
    let file_layer = settings.dir.as_deref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            file_error = Some(format!("failed to create log directory {}: {}", dir, e));
            return None;
        }
        let appender = tracing_appender::rolling::daily(dir, "maleva.json");
        Some(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_current_span(true)
                .with_span_list(true),
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        warn!(error = %e, "File logging disabled");
    }
}
