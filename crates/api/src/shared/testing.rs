use salon_scheduler_domain::{
    ClientIdentity, ReminderJob, ReminderJobStatus, Resource, Service, Tenant, Time, Weekday,
    WorkingHours, ID,
};
use salon_scheduler_infra::{
    IReminderJobRepo, IServiceRepo, InMemoryTransport, SalonContext, StaticTimeSys,
};
use std::sync::Arc;

/// Monday 2024-05-06 08:00 UTC
pub const NOW: i64 = 1714982400000;
/// Friday 2024-05-10 00:00 UTC
pub const FRIDAY: i64 = 1715299200000;
pub const HOUR: i64 = 1000 * 60 * 60;

pub struct TestContext {
    pub ctx: SalonContext,
    pub tenant: Tenant,
    pub resource: Resource,
    pub service: Service,
    pub transport: Arc<InMemoryTransport>,
}

/// A tenant in UTC with one resource working 10:00 - 20:00 on weekdays and
/// a 60 minute service, frozen at `NOW`.
///
/// Always in memory, as the reminder sweep sees every due job in the store.
pub async fn setup() -> TestContext {
    let mut ctx = SalonContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys { timestamp: NOW });
    let transport = Arc::new(InMemoryTransport::new());
    ctx.notifier = transport.clone();

    let tenant = Tenant::new("Studio Nord");
    ctx.repos.tenants.insert(&tenant).await.unwrap();
    let working_hours = vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
    .into_iter()
    .map(|day| WorkingHours::new(day, Time::new(10, 0), Time::new(20, 0)))
    .collect();
    let resource = Resource::new(tenant.id.clone(), "Anna", working_hours);
    ctx.repos.resources.insert(&resource).await.unwrap();
    let service = Service::new(tenant.id.clone(), "Haircut", 60);
    ctx.repos.services.insert(&service).await.unwrap();

    TestContext {
        ctx,
        tenant,
        resource,
        service,
        transport,
    }
}

pub fn phone_identity(phone: &str) -> ClientIdentity {
    ClientIdentity {
        name: Some("Kari".into()),
        phone: Some(phone.into()),
        channel: None,
    }
}

fn unavailable() -> anyhow::Error {
    anyhow::Error::msg("connection refused")
}

/// Service store that fails every call, like a database that went away
pub struct UnavailableServiceRepo;

#[async_trait::async_trait]
impl IServiceRepo for UnavailableServiceRepo {
    async fn insert(&self, _service: &Service) -> anyhow::Result<()> {
        Err(unavailable())
    }

    async fn find(&self, _service_id: &ID) -> anyhow::Result<Option<Service>> {
        Err(unavailable())
    }
}

pub struct UnavailableReminderJobRepo;

#[async_trait::async_trait]
impl IReminderJobRepo for UnavailableReminderJobRepo {
    async fn insert_many(&self, _jobs: &[ReminderJob]) -> anyhow::Result<Vec<ReminderJob>> {
        Err(unavailable())
    }

    async fn find_by_appointment(&self, _appointment_id: &ID) -> anyhow::Result<Vec<ReminderJob>> {
        Err(unavailable())
    }

    async fn delete_by_appointment(&self, _appointment_id: &ID) -> anyhow::Result<usize> {
        Err(unavailable())
    }

    async fn take_due(&self, _before: i64) -> anyhow::Result<Vec<ReminderJob>> {
        Err(unavailable())
    }

    async fn update_status(&self, _job_id: &ID, _status: ReminderJobStatus) -> anyhow::Result<()> {
        Err(unavailable())
    }
}
