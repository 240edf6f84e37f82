use super::get_appointment::find_tenant_appointment;
use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_appointment_reminders::*;
use salon_scheduler_domain::{ReminderJob, ID};
use salon_scheduler_infra::SalonContext;

pub async fn get_appointment_reminders_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let usecase = GetAppointmentRemindersUseCase {
        tenant_id: path.tenant_id.clone(),
        appointment_id: path.appointment_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(SalonError::from)
}

#[derive(Debug)]
pub struct GetAppointmentRemindersUseCase {
    pub tenant_id: ID,
    pub appointment_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for SalonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The appointment with id: {}, was not found.", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentRemindersUseCase {
    type Response = Vec<ReminderJob>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAppointmentReminders";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let appointment = find_tenant_appointment(&self.tenant_id, &self.appointment_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.appointment_id.clone()))?;

        ctx.repos
            .reminder_jobs
            .find_by_appointment(&appointment.id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
