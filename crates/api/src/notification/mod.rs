mod get_conversion_stats;

use actix_web::web;
use get_conversion_stats::get_conversion_stats_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/notifications/stats",
        web::get().to(get_conversion_stats_controller),
    );
}
