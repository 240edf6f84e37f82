use super::get_appointment::find_tenant_appointment;
use super::subscribers::RemoveRemindersOnAppointmentCancelled;
use crate::error::SalonError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::cancel_appointment::*;
use salon_scheduler_domain::{Appointment, AppointmentStatus, InvalidTransition, ID};
use salon_scheduler_infra::{AppointmentWrite, SalonContext};

pub async fn cancel_appointment_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let usecase = CancelAppointmentUseCase {
        tenant_id: path.tenant_id.clone(),
        appointment_id: path.appointment_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| HttpResponse::Ok().json(APIResponse::new(appointment)))
        .map_err(SalonError::from)
}

/// Cancels the appointment and drops its reminders. Cancelling a cancelled
/// appointment changes nothing.
#[derive(Debug)]
pub struct CancelAppointmentUseCase {
    pub tenant_id: ID,
    pub appointment_id: ID,
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
impl UseCase for CancelAppointmentUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelAppointment";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let mut appointment = find_tenant_appointment(&self.tenant_id, &self.appointment_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.appointment_id.clone()))?;
        if appointment.status == AppointmentStatus::Cancelled {
            return Ok(appointment);
        }

        let previous_status = appointment.status;
        appointment
            .set_status(AppointmentStatus::Cancelled, ctx.sys.get_timestamp_millis())
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
        vec![Box::new(RemoveRemindersOnAppointmentCancelled)]
    }
}
