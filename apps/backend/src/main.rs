use actix_web::{web, App, HttpServer};
use pose_arena::config::GameConfig;
use pose_arena::infra::state::build_state;
use pose_arena::middleware::cors::cors_middleware;
use pose_arena::middleware::request_trace::RequestTrace;
use pose_arena::middleware::structured_logger::StructuredLogger;
use pose_arena::middleware::trace_span::TraceSpan;
use pose_arena::routes;
use pose_arena::services::spawn_clock;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("ARENA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("ARENA_PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ ARENA_PORT must be a valid port number");
            std::process::exit(1);
        });

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if config.oracle_url.is_none() {
        eprintln!("❌ ARENA_ORACLE_URL must be set");
        std::process::exit(1);
    }
    let tick_interval = config.tick_interval;

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting Pose Arena on http://{}:{}", host, port);

    let shutdown = CancellationToken::new();
    let clock = spawn_clock(app_state.coordinator.clone(), tick_interval, shutdown.clone());

    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.cancel();
    if let Err(e) = clock.await {
        eprintln!("❌ Clock task failed: {e}");
    }
    info!("Server stopped");
    result
}
