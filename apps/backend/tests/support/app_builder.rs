use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use pose_arena::middleware::request_trace::RequestTrace;
use pose_arena::middleware::structured_logger::StructuredLogger;
use pose_arena::middleware::trace_span::TraceSpan;
use pose_arena::routes;
use pose_arena::state::app_state::AppState;

/// Production routes behind the same tracing middleware `main.rs` uses
/// (CORS is left out; test requests carry no `Origin`).
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
