use actix_web::web;

pub mod health;
pub mod lobby;
pub mod play;
pub mod realtime;
pub mod session;
pub mod snapshot;

/// Registers every route. `main.rs` wraps the same configuration in the
/// tracing, logging and CORS middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(
        web::scope("/api")
            .configure(lobby::configure_routes)
            .configure(session::configure_routes)
            .configure(play::configure_routes)
            .configure(snapshot::configure_routes)
            .configure(realtime::configure_routes),
    );
}
