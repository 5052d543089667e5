use actix_web::web;

use crate::ws::session::upgrade;

/// GET /api/ws?connection_id=
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(upgrade)));
}
