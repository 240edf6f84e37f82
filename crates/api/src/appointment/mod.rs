mod cancel_appointment;
pub mod create_appointment;
mod get_appointment;
mod get_appointment_reminders;
mod reschedule_appointment;
mod subscribers;
mod update_appointment_status;

use actix_web::web;
use cancel_appointment::cancel_appointment_controller;
use create_appointment::create_appointment_controller;
use get_appointment::get_appointment_controller;
use get_appointment_reminders::get_appointment_reminders_controller;
use reschedule_appointment::reschedule_appointment_controller;
use update_appointment_status::update_appointment_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tenants/{tenant_id}/appointments",
        web::post().to(create_appointment_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/appointments/{appointment_id}",
        web::get().to(get_appointment_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/appointments/{appointment_id}/cancel",
        web::post().to(cancel_appointment_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/appointments/{appointment_id}/status",
        web::put().to(update_appointment_status_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/appointments/{appointment_id}/reschedule",
        web::post().to(reschedule_appointment_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/appointments/{appointment_id}/reminders",
        web::get().to(get_appointment_reminders_controller),
    );
}
