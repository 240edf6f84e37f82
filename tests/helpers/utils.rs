use salon_scheduler_domain::{Resource, Service, Tenant, Time, Weekday, WorkingHours};
use salon_scheduler_infra::SalonContext;
use salon_scheduler_sdk::ClientIdentity;

/// Friday 2030-05-10 00:00 UTC
pub const FRIDAY: i64 = 1904601600000;
pub const HOUR: i64 = 1000 * 60 * 60;

pub struct Salon {
    pub tenant: Tenant,
    pub resource: Resource,
    pub service: Service,
}

/// A tenant in UTC with one resource working 10:00 - 20:00 on weekdays and
/// a 60 minute haircut
pub async fn create_salon(ctx: &SalonContext) -> Salon {
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

    Salon {
        tenant,
        resource,
        service,
    }
}

pub fn phone_client(phone: &str) -> ClientIdentity {
    ClientIdentity {
        name: Some("Kari".into()),
        phone: Some(phone.into()),
        channel: None,
    }
}
