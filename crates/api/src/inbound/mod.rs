mod handle_inbound_booking;

use actix_web::web;
use handle_inbound_booking::handle_inbound_booking_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/inbound/{channel}",
        web::post().to(handle_inbound_booking_controller),
    );
}
