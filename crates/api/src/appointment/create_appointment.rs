use super::subscribers::CreateRemindersOnAppointmentCreated;
use crate::error::SalonError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::create_appointment::*;
use salon_scheduler_domain::{
    conflict::has_conflict, Appointment, AppointmentStatus, Client, ClientIdentity, ID,
};
use salon_scheduler_infra::{AppointmentWrite, SalonContext};

pub async fn create_appointment_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let body = body.0;
    let usecase = CreateAppointmentUseCase {
        tenant_id: path.tenant_id.clone(),
        resource_id: body.resource_id,
        service_id: body.service_id,
        client: body.client,
        start_ts: body.start_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| HttpResponse::Created().json(APIResponse::new(appointment)))
        .map_err(SalonError::from)
}

/// Books a service with a resource for a client, keeping the appointments
/// of the resource free of overlaps
#[derive(Debug)]
pub struct CreateAppointmentUseCase {
    pub tenant_id: ID,
    pub resource_id: ID,
    pub service_id: ID,
    pub client: ClientIdentity,
    pub start_ts: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    ServiceNotFound(ID),
    ResourceNotFound(ID),
    InvalidClientIdentity,
    InvalidStartTime,
    Conflict,
    StorageError,
}

impl From<UseCaseError> for SalonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", id))
            }
            UseCaseError::ServiceNotFound(id) => {
                Self::NotFound(format!("The service with id: {}, was not found.", id))
            }
            UseCaseError::ResourceNotFound(id) => {
                Self::NotFound(format!("The resource with id: {}, was not found.", id))
            }
            UseCaseError::InvalidClientIdentity => Self::BadClientData(
                "The client must be identified by a phone number or a channel identity".into(),
            ),
            UseCaseError::InvalidStartTime => {
                Self::BadClientData("The start time must be a positive timestamp in millis".into())
            }
            UseCaseError::Conflict => Self::Conflict(
                "The requested time is not available for the resource. Pick another time.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Finds the client of the tenant with the same phone or channel identity,
/// or creates one
pub async fn resolve_client(
    tenant_id: &ID,
    identity: &ClientIdentity,
    ctx: &SalonContext,
) -> anyhow::Result<Client> {
    if let Some(client) = ctx
        .repos
        .clients
        .find_by_identity(tenant_id, identity)
        .await?
    {
        return Ok(client);
    }
    let client = Client::new(tenant_id.clone(), identity);
    ctx.repos.clients.insert(&client).await?;
    Ok(client)
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateAppointmentUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateAppointment";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.tenants.find(&self.tenant_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(UseCaseError::TenantNotFound(self.tenant_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }
        let service = match ctx.repos.services.find(&self.service_id).await {
            Ok(Some(service)) if service.tenant_id == self.tenant_id => service,
            Ok(_) => return Err(UseCaseError::ServiceNotFound(self.service_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let resource = match ctx.repos.resources.find(&self.resource_id).await {
            Ok(Some(resource)) if resource.tenant_id == self.tenant_id => resource,
            Ok(_) => return Err(UseCaseError::ResourceNotFound(self.resource_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        if !self.client.is_valid() {
            return Err(UseCaseError::InvalidClientIdentity);
        }
        if self.start_ts < 0 {
            return Err(UseCaseError::InvalidStartTime);
        }

        let start_ts = self.start_ts;
        let end_ts = service
            .end_of(start_ts)
            .ok_or(UseCaseError::InvalidStartTime)?;

        // Cheap check before creating any client record, the insert below decides
        let existing = ctx
            .repos
            .appointments
            .find_by_resource(&resource.id, start_ts, end_ts)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if has_conflict(start_ts, end_ts, &existing, None) {
            return Err(UseCaseError::Conflict);
        }

        let client = resolve_client(&self.tenant_id, &self.client, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.get_timestamp_millis();
        let appointment = Appointment {
            id: Default::default(),
            tenant_id: self.tenant_id.clone(),
            resource_id: resource.id,
            service_id: service.id,
            client_id: client.id,
            start_ts,
            end_ts,
            status: AppointmentStatus::Scheduled,
            created: now,
            updated: now,
        };

        match ctx.repos.appointments.insert_if_free(&appointment).await {
            Ok(AppointmentWrite::Written) => Ok(appointment),
            Ok(_) => Err(UseCaseError::Conflict),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateRemindersOnAppointmentCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::testing::{
        phone_identity, setup, TestContext, UnavailableServiceRepo, FRIDAY, HOUR,
    };
    use salon_scheduler_domain::{Tenant, MINUTE_MILLIS};
    use std::sync::Arc;

    fn usecase(c: &TestContext, start_ts: i64, phone: &str) -> CreateAppointmentUseCase {
        CreateAppointmentUseCase {
            tenant_id: c.tenant.id.clone(),
            resource_id: c.resource.id.clone(),
            service_id: c.service.id.clone(),
            client: phone_identity(phone),
            start_ts,
        }
    }

    #[actix_web::test]
    async fn it_creates_appointment_and_reuses_client() {
        let c = setup().await;

        let first = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111")
            .execute(&c.ctx)
            .await
            .unwrap();
        assert_eq!(first.end_ts, FRIDAY + 13 * HOUR);
        assert_eq!(first.status, AppointmentStatus::Scheduled);
        assert_eq!(
            c.ctx.repos.appointments.find(&first.id).await.unwrap(),
            Some(first.clone())
        );

        let second = usecase(&c, FRIDAY + 15 * HOUR, " +4711111111 ")
            .execute(&c.ctx)
            .await
            .unwrap();
        assert_eq!(first.client_id, second.client_id);
    }

    #[actix_web::test]
    async fn it_rejects_overlapping_appointment() {
        let c = setup().await;
        usecase(&c, FRIDAY + 12 * HOUR, "+4711111111")
            .execute(&c.ctx)
            .await
            .unwrap();

        let res = usecase(&c, FRIDAY + 12 * HOUR + 30 * MINUTE_MILLIS, "+4722222222")
            .execute(&c.ctx)
            .await;
        assert_eq!(res, Err(UseCaseError::Conflict));

        // Back to back is fine
        assert!(usecase(&c, FRIDAY + 13 * HOUR, "+4722222222")
            .execute(&c.ctx)
            .await
            .is_ok());
    }

    #[actix_web::test]
    async fn only_one_of_two_concurrent_bookings_succeeds() {
        let c = setup().await;
        let first = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111");
        let second = usecase(&c, FRIDAY + 12 * HOUR + 15 * MINUTE_MILLIS, "+4722222222");

        let (a, b) = futures::join!(execute(first, &c.ctx), execute(second, &c.ctx));
        let results = vec![a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(UseCaseError::Conflict))));

        let stored = c
            .ctx
            .repos
            .appointments
            .find_by_resource(&c.resource.id, FRIDAY, FRIDAY + 24 * HOUR)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[actix_web::test]
    async fn it_rejects_foreign_and_missing_entities() {
        let c = setup().await;
        let other = Tenant::new("Other");
        c.ctx.repos.tenants.insert(&other).await.unwrap();

        let mut foreign = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111");
        foreign.tenant_id = other.id.clone();
        assert_eq!(
            foreign.execute(&c.ctx).await,
            Err(UseCaseError::ServiceNotFound(c.service.id.clone()))
        );

        let mut missing_resource = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111");
        missing_resource.resource_id = ID::default();
        assert!(matches!(
            missing_resource.execute(&c.ctx).await,
            Err(UseCaseError::ResourceNotFound(_))
        ));

        let mut missing_tenant = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111");
        missing_tenant.tenant_id = ID::default();
        assert!(matches!(
            missing_tenant.execute(&c.ctx).await,
            Err(UseCaseError::TenantNotFound(_))
        ));
    }

    #[actix_web::test]
    async fn it_requires_a_client_identity() {
        let c = setup().await;
        let mut anonymous = usecase(&c, FRIDAY + 12 * HOUR, "");
        anonymous.client = ClientIdentity {
            name: Some("Kari".into()),
            ..Default::default()
        };
        assert_eq!(
            anonymous.execute(&c.ctx).await,
            Err(UseCaseError::InvalidClientIdentity)
        );
    }

    #[actix_web::test]
    async fn it_schedules_reminders_after_booking() {
        let c = setup().await;
        let appointment = execute(usecase(&c, FRIDAY + 15 * HOUR, "+4711111111"), &c.ctx)
            .await
            .unwrap();

        let jobs = c
            .ctx
            .repos
            .reminder_jobs
            .find_by_appointment(&appointment.id)
            .await
            .unwrap();
        let fire_times = jobs.iter().map(|j| j.fire_at).collect::<Vec<_>>();
        assert_eq!(fire_times, vec![FRIDAY - 9 * HOUR, FRIDAY + 14 * HOUR]);
    }

    #[actix_web::test]
    async fn it_rejects_start_times_without_room_for_the_service() {
        let c = setup().await;
        let res = usecase(&c, i64::MAX - 1000, "+4711111111")
            .execute(&c.ctx)
            .await;
        assert_eq!(res, Err(UseCaseError::InvalidStartTime));
    }

    #[actix_web::test]
    async fn storage_failures_are_not_reported_as_missing() {
        let mut c = setup().await;
        c.ctx.repos.services = Arc::new(UnavailableServiceRepo);

        let res = usecase(&c, FRIDAY + 12 * HOUR, "+4711111111")
            .execute(&c.ctx)
            .await;
        assert_eq!(res, Err(UseCaseError::StorageError));
    }
}
