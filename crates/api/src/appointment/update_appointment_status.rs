use super::get_appointment::find_tenant_appointment;
use super::subscribers::SyncRemindersOnStatusUpdated;
use crate::error::SalonError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::update_appointment_status::*;
use salon_scheduler_domain::{Appointment, AppointmentStatus, InvalidTransition, ID};
use salon_scheduler_infra::{AppointmentWrite, SalonContext};

pub async fn update_appointment_status_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let usecase = UpdateAppointmentStatusUseCase {
        tenant_id: path.tenant_id.clone(),
        appointment_id: path.appointment_id.clone(),
        status: body.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| HttpResponse::Ok().json(APIResponse::new(appointment)))
        .map_err(SalonError::from)
}

#[derive(Debug)]
pub struct UpdateAppointmentStatusUseCase {
    pub tenant_id: ID,
    pub appointment_id: ID,
    pub status: AppointmentStatus,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTransition(InvalidTransition),
    /// The appointment changed between reading and writing it
    Stale,
    StorageError,
}

impl From<UseCaseError> for SalonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The appointment with id: {}, was not found.", id))
            }
            UseCaseError::InvalidTransition(e) => Self::BadClientData(e.to_string()),
            UseCaseError::Stale => Self::Conflict(
                "The appointment was changed by another request. Fetch it and try again.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateAppointmentStatusUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateAppointmentStatus";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let mut appointment = find_tenant_appointment(&self.tenant_id, &self.appointment_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.appointment_id.clone()))?;
        if appointment.status == self.status {
            return Ok(appointment);
        }

        let previous_status = appointment.status;
        appointment
            .set_status(self.status, ctx.sys.get_timestamp_millis())
            .map_err(UseCaseError::InvalidTransition)?;
        match ctx
            .repos
            .appointments
            .save(&appointment, previous_status)
            .await
        {
            Ok(AppointmentWrite::Written) => Ok(appointment),
            Ok(_) => Err(UseCaseError::Stale),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnStatusUpdated)]
    }
}
