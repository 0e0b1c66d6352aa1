use server::app;
use server::state::{ServerState, Settings};
use std::net::SocketAddr;
use util::{config, logging::init_logging};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging("server");

    let settings = Settings::from_config();
    tracing::info!(
        default_bus = %settings.default_bus_no,
        radius_m = settings.geofence_radius_meters,
        max_token_age_s = settings.token_max_age_seconds,
        "Attendance policy loaded"
    );
    let app = app(ServerState::new(settings));

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Server crashed");
}
