use super::get_appointment::find_tenant_appointment;
use super::subscribers::MoveRemindersOnAppointmentRescheduled;
use crate::error::SalonError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::reschedule_appointment::*;
use salon_scheduler_domain::{conflict::has_conflict, Appointment, AppointmentStatus, ID};
use salon_scheduler_infra::{AppointmentWrite, SalonContext};

pub async fn reschedule_appointment_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let body = body.0;
    let usecase = RescheduleAppointmentUseCase {
        tenant_id: path.tenant_id.clone(),
        appointment_id: path.appointment_id.clone(),
        start_ts: body.start_ts,
        resource_id: body.resource_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.cancelled, res.appointment)))
        .map_err(SalonError::from)
}

/// Moves an active appointment by cancelling it and booking a new one for
/// the same client and service. Both happen together or not at all.
#[derive(Debug)]
pub struct RescheduleAppointmentUseCase {
    pub tenant_id: ID,
    pub appointment_id: ID,
    pub start_ts: i64,
    pub resource_id: Option<ID>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RescheduledAppointment {
    pub cancelled: Appointment,
    pub appointment: Appointment,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotActive(AppointmentStatus),
    ServiceNotFound(ID),
    ResourceNotFound(ID),
    InvalidStartTime,
    Conflict,
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
            UseCaseError::NotActive(status) => Self::BadClientData(format!(
                "Only scheduled or confirmed appointments can be rescheduled, this one is {}",
                status
            )),
            UseCaseError::ServiceNotFound(id) => {
                Self::NotFound(format!("The service with id: {}, was not found.", id))
            }
            UseCaseError::ResourceNotFound(id) => {
                Self::NotFound(format!("The resource with id: {}, was not found.", id))
            }
            UseCaseError::InvalidStartTime => {
                Self::BadClientData("The start time must be a positive timestamp in millis".into())
            }
            UseCaseError::Conflict => Self::Conflict(
                "The requested time is not available for the resource. Pick another time.".into(),
            ),
            UseCaseError::Stale => Self::Conflict(
                "The appointment was changed by another request. Fetch it and try again.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleAppointmentUseCase {
    type Response = RescheduledAppointment;

    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleAppointment";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let old = find_tenant_appointment(&self.tenant_id, &self.appointment_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.appointment_id.clone()))?;
        if !old.is_active() {
            return Err(UseCaseError::NotActive(old.status));
        }
        if self.start_ts < 0 {
            return Err(UseCaseError::InvalidStartTime);
        }

        let service = match ctx.repos.services.find(&old.service_id).await {
            Ok(Some(service)) if service.tenant_id == self.tenant_id => service,
            Ok(_) => return Err(UseCaseError::ServiceNotFound(old.service_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let resource_id = match &self.resource_id {
            Some(resource_id) => match ctx.repos.resources.find(resource_id).await {
                Ok(Some(resource)) if resource.tenant_id == self.tenant_id => resource.id,
                Ok(_) => return Err(UseCaseError::ResourceNotFound(resource_id.clone())),
                Err(_) => return Err(UseCaseError::StorageError),
            },
            None => old.resource_id.clone(),
        };

        let start_ts = self.start_ts;
        let end_ts = service
            .end_of(start_ts)
            .ok_or(UseCaseError::InvalidStartTime)?;
        let existing = ctx
            .repos
            .appointments
            .find_by_resource(&resource_id, start_ts, end_ts)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if has_conflict(start_ts, end_ts, &existing, Some(&old.id)) {
            return Err(UseCaseError::Conflict);
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut cancelled = old.clone();
        cancelled.status = AppointmentStatus::Cancelled;
        cancelled.updated = now;
        let appointment = Appointment {
            id: Default::default(),
            tenant_id: old.tenant_id,
            resource_id,
            service_id: old.service_id,
            client_id: old.client_id,
            start_ts,
            end_ts,
            status: AppointmentStatus::Scheduled,
            created: now,
            updated: now,
        };

        match ctx
            .repos
            .appointments
            .reschedule(&cancelled, old.status, &appointment)
            .await
        {
            Ok(AppointmentWrite::Written) => Ok(RescheduledAppointment {
                cancelled,
                appointment,
            }),
            Ok(AppointmentWrite::Conflict) => Err(UseCaseError::Conflict),
            Ok(AppointmentWrite::Stale) => Err(UseCaseError::Stale),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(MoveRemindersOnAppointmentRescheduled)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::appointment::create_appointment::CreateAppointmentUseCase;
    use crate::shared::testing::{
        phone_identity, setup, TestContext, UnavailableServiceRepo, FRIDAY, HOUR,
    };
    use salon_scheduler_domain::{Resource, Tenant};
    use std::sync::Arc;

    async fn book(c: &TestContext, start_ts: i64, phone: &str) -> Appointment {
        let usecase = CreateAppointmentUseCase {
            tenant_id: c.tenant.id.clone(),
            resource_id: c.resource.id.clone(),
            service_id: c.service.id.clone(),
            client: phone_identity(phone),
            start_ts,
        };
        execute(usecase, &c.ctx).await.unwrap()
    }

    fn reschedule(c: &TestContext, appointment: &Appointment, start_ts: i64) -> RescheduleAppointmentUseCase {
        RescheduleAppointmentUseCase {
            tenant_id: c.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
            start_ts,
            resource_id: None,
        }
    }

    #[actix_web::test]
    async fn it_moves_appointment_and_reminders() {
        let c = setup().await;
        let old = book(&c, FRIDAY + 15 * HOUR, "+4711111111").await;

        // Overlapping its own old interval is fine
        let res = execute(reschedule(&c, &old, FRIDAY + 15 * HOUR + HOUR / 2), &c.ctx)
            .await
            .unwrap();
        assert_eq!(res.cancelled.id, old.id);
        assert_eq!(res.cancelled.status, AppointmentStatus::Cancelled);
        assert_ne!(res.appointment.id, old.id);
        assert_eq!(res.appointment.client_id, old.client_id);
        assert_eq!(res.appointment.end_ts - res.appointment.start_ts, HOUR);

        let stored_old = c.ctx.repos.appointments.find(&old.id).await.unwrap().unwrap();
        assert_eq!(stored_old.status, AppointmentStatus::Cancelled);

        let jobs = &c.ctx.repos.reminder_jobs;
        assert!(jobs.find_by_appointment(&old.id).await.unwrap().is_empty());
        let new_jobs = jobs.find_by_appointment(&res.appointment.id).await.unwrap();
        assert_eq!(new_jobs.len(), 2);
        assert_eq!(new_jobs[1].fire_at, res.appointment.start_ts - HOUR);
    }

    #[actix_web::test]
    async fn conflicting_reschedule_keeps_old_appointment() {
        let c = setup().await;
        let old = book(&c, FRIDAY + 12 * HOUR, "+4711111111").await;
        book(&c, FRIDAY + 15 * HOUR, "+4722222222").await;

        let res = reschedule(&c, &old, FRIDAY + 15 * HOUR).execute(&c.ctx).await;
        assert_eq!(res, Err(UseCaseError::Conflict));

        let stored = c.ctx.repos.appointments.find(&old.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[actix_web::test]
    async fn cancelled_appointments_cannot_be_rescheduled() {
        let c = setup().await;
        let mut old = book(&c, FRIDAY + 12 * HOUR, "+4711111111").await;
        old.status = AppointmentStatus::Cancelled;
        c.ctx
            .repos
            .appointments
            .save(&old, AppointmentStatus::Scheduled)
            .await
            .unwrap();

        let res = reschedule(&c, &old, FRIDAY + 15 * HOUR).execute(&c.ctx).await;
        assert_eq!(res, Err(UseCaseError::NotActive(AppointmentStatus::Cancelled)));
    }

    #[actix_web::test]
    async fn it_moves_to_another_resource_of_the_tenant() {
        let c = setup().await;
        let old = book(&c, FRIDAY + 12 * HOUR, "+4711111111").await;
        let bob = Resource::new(c.tenant.id.clone(), "Bob", vec![]);
        c.ctx.repos.resources.insert(&bob).await.unwrap();
        let other_tenant = Tenant::new("Other");
        c.ctx.repos.tenants.insert(&other_tenant).await.unwrap();
        let foreign = Resource::new(other_tenant.id.clone(), "Carl", vec![]);
        c.ctx.repos.resources.insert(&foreign).await.unwrap();

        let mut usecase = reschedule(&c, &old, FRIDAY + 12 * HOUR);
        usecase.resource_id = Some(foreign.id.clone());
        assert_eq!(
            usecase.execute(&c.ctx).await,
            Err(UseCaseError::ResourceNotFound(foreign.id.clone()))
        );

        let mut usecase = reschedule(&c, &old, FRIDAY + 12 * HOUR);
        usecase.resource_id = Some(bob.id.clone());
        let res = usecase.execute(&c.ctx).await.unwrap();
        assert_eq!(res.appointment.resource_id, bob.id);
    }

    #[actix_web::test]
    async fn it_rejects_start_times_without_room_for_the_service() {
        let c = setup().await;
        let old = book(&c, FRIDAY + 12 * HOUR, "+4711111111").await;

        let res = reschedule(&c, &old, i64::MAX - 1000).execute(&c.ctx).await;
        assert_eq!(res, Err(UseCaseError::InvalidStartTime));

        let stored = c.ctx.repos.appointments.find(&old.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[actix_web::test]
    async fn storage_failures_are_not_reported_as_missing() {
        let mut c = setup().await;
        let old = book(&c, FRIDAY + 12 * HOUR, "+4711111111").await;
        c.ctx.repos.services = Arc::new(UnavailableServiceRepo);

        let res = reschedule(&c, &old, FRIDAY + 15 * HOUR).execute(&c.ctx).await;
        assert_eq!(res, Err(UseCaseError::StorageError));
    }
}
