mod get_available_slots;

use actix_web::web;
use get_available_slots::get_available_slots_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/services/{service_id}/slots",
        web::get().to(get_available_slots_controller),
    );
}
