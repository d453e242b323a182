use dotenvy::dotenv;
use maleva::logging::{LogSettings, init_tracing};
use maleva::maleva_config::ServerConfig;
use maleva::metrics::{init_metrics, metrics_app};
use maleva::router::init_router;
use maleva::state::init_app_state;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing(&LogSettings::from_env());

    let server_config = ServerConfig::from_env();
    let state = match init_app_state(&server_config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = ?e, "Failed to start");
            std::process::exit(1);
        }
    };

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let listener = match tokio::net::TcpListener::bind(&server_config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %server_config.addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %server_config.addr, "🚀 Server running");
    info!("📚 Swagger UI available at /swagger-ui, Scalar at /scalar");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
