use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_appointment::*;
use salon_scheduler_domain::{Appointment, ID};
use salon_scheduler_infra::SalonContext;

pub async fn get_appointment_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let usecase = GetAppointmentUseCase {
        tenant_id: path.tenant_id.clone(),
        appointment_id: path.appointment_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| HttpResponse::Ok().json(APIResponse::new(appointment)))
        .map_err(SalonError::from)
}

#[derive(Debug)]
pub struct GetAppointmentUseCase {
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

/// Appointment of the tenant, appointments of other tenants are treated as missing
pub async fn find_tenant_appointment(
    tenant_id: &ID,
    appointment_id: &ID,
    ctx: &SalonContext,
) -> anyhow::Result<Option<Appointment>> {
    let appointment = ctx.repos.appointments.find(appointment_id).await?;
    Ok(appointment.filter(|a| a.tenant_id == *tenant_id))
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAppointment";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        find_tenant_appointment(&self.tenant_id, &self.appointment_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.appointment_id.clone()))
    }
}
