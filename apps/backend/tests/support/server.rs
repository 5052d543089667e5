use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use pose_arena::middleware::request_trace::RequestTrace;
use pose_arena::middleware::structured_logger::StructuredLogger;
use pose_arena::middleware::trace_span::TraceSpan;
use pose_arena::routes;
use pose_arena::state::app_state::AppState;
use pose_arena::ws::hub::SyncHub;

/// Real server on an ephemeral port, for websocket clients.
pub async fn start_test_server(
    state: AppState,
) -> Result<(ServerHandle, SocketAddr), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((handle, addr))
}

pub fn ws_url(addr: SocketAddr, connection: impl std::fmt::Display) -> String {
    format!("ws://{addr}/api/ws?connection_id={connection}")
}

pub async fn wait_for_sockets(
    hub: &SyncHub,
    expected: usize,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = tokio::time::Instant::now();
    loop {
        if hub.socket_count() == expected {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(format!(
                "timeout waiting for socket_count == {expected} (got {})",
                hub.socket_count()
            )
            .into());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
