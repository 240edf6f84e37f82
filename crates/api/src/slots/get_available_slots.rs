use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_available_slots::*;
use salon_scheduler_domain::{
    booking_slots::get_resource_booking_slots,
    slot_scoring::{rank_slots, ScoredSlot, SlotScoringOptions},
    Day, Resource, Time, Tz, ID, MINUTE_MILLIS,
};
use salon_scheduler_infra::SalonContext;

pub async fn get_available_slots_controller(
    path: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let query_params = query_params.0;
    let usecase = GetAvailableSlotsUseCase {
        tenant_id: path.tenant_id.clone(),
        service_id: path.service_id.clone(),
        resource_id: query_params.resource_id,
        date: query_params.date,
        preferred_ts: query_params.preferred_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.date, res.timezone, res.slots)))
        .map_err(SalonError::from)
}

/// Free slots of one local day for a service, best suggestions first
#[derive(Debug)]
pub struct GetAvailableSlotsUseCase {
    pub tenant_id: ID,
    pub service_id: ID,
    /// All resources of the tenant are considered when missing
    pub resource_id: Option<ID>,
    pub date: String,
    /// Defaults to now
    pub preferred_ts: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub struct AvailableSlots {
    pub date: String,
    pub timezone: Tz,
    pub slots: Vec<ScoredSlot>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    ServiceNotFound(ID),
    ResourceNotFound(ID),
    InvalidDate(String),
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
            UseCaseError::InvalidDate(msg) => Self::BadClientData(format!(
                "Invalid date: {}. It should be of the format YYYY-MM-DD, e.g. 2024-5-10",
                msg
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAvailableSlotsUseCase {
    type Response = AvailableSlots;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAvailableSlots";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::TenantNotFound(self.tenant_id.clone()))?;
        let service = match ctx.repos.services.find(&self.service_id).await {
            Ok(Some(service)) if service.tenant_id == tenant.id => service,
            Ok(_) => return Err(UseCaseError::ServiceNotFound(self.service_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let day = self
            .date
            .parse::<Day>()
            .map_err(|e| UseCaseError::InvalidDate(e.to_string()))?;

        let resources: Vec<Resource> = match &self.resource_id {
            Some(resource_id) => match ctx.repos.resources.find(resource_id).await {
                Ok(Some(resource)) if resource.tenant_id == tenant.id => vec![resource],
                Ok(_) => return Err(UseCaseError::ResourceNotFound(resource_id.clone())),
                Err(_) => return Err(UseCaseError::StorageError),
            },
            None => ctx
                .repos
                .resources
                .find_by_tenant(&tenant.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?,
        };

        let settings = &tenant.settings;
        let tz = settings.timezone;
        let (buffer_before, buffer_after) = service.buffers(settings.buffer_minutes);
        let padding = buffer_before.max(buffer_after) * MINUTE_MILLIS;
        let (day_start, day_end) = match (
            day.at(&Time::new(0, 0), &tz),
            day.at(&Time::new(24, 0), &tz),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(UseCaseError::InvalidDate(self.date.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        let mut slots = Vec::new();
        for resource in &resources {
            let appointments = ctx
                .repos
                .appointments
                .find_by_resource(&resource.id, day_start - padding, day_end + padding)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            slots.extend(get_resource_booking_slots(
                resource,
                &service,
                settings,
                &day,
                &appointments,
                now,
            ));
        }

        let options = SlotScoringOptions {
            preferred_ts: self.preferred_ts.unwrap_or(now),
            timezone: tz,
            grid_minutes: settings.grid_minutes,
            offpeak: settings.offpeak,
        };

        Ok(AvailableSlots {
            date: day.to_string(),
            timezone: tz,
            slots: rank_slots(&slots, &options, settings.suggestion_limit),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::appointment::create_appointment::CreateAppointmentUseCase;
    use crate::shared::testing::{phone_identity, setup, TestContext, FRIDAY, HOUR};
    use salon_scheduler_domain::Tenant;

    fn usecase(c: &TestContext, date: &str, preferred_ts: Option<i64>) -> GetAvailableSlotsUseCase {
        GetAvailableSlotsUseCase {
            tenant_id: c.tenant.id.clone(),
            service_id: c.service.id.clone(),
            resource_id: None,
            date: date.into(),
            preferred_ts,
        }
    }

    #[actix_web::test]
    async fn it_suggests_free_slots_around_bookings() {
        let c = setup().await;
        let booking = CreateAppointmentUseCase {
            tenant_id: c.tenant.id.clone(),
            resource_id: c.resource.id.clone(),
            service_id: c.service.id.clone(),
            client: phone_identity("+4711111111"),
            start_ts: FRIDAY + 12 * HOUR,
        };
        execute(booking, &c.ctx).await.unwrap();

        let res = usecase(&c, "2024-5-10", Some(FRIDAY + 13 * HOUR))
            .execute(&c.ctx)
            .await
            .unwrap();
        assert_eq!(res.date, "2024-5-10");
        assert_eq!(res.slots.len(), 9);
        assert!(res.slots.iter().all(|s| s.slot.start != FRIDAY + 12 * HOUR));
        assert!(res.slots.iter().all(|s| s.slot.resource_id == c.resource.id));

        let starts = res.slots.iter().map(|s| s.slot.start).collect::<Vec<_>>();
        // Preferred time first, then the offpeak slots closest to it
        assert_eq!(
            starts[..3],
            [FRIDAY + 13 * HOUR, FRIDAY + 10 * HOUR, FRIDAY + 19 * HOUR]
        );
        assert_eq!(res.slots[0].reason, "near");
        assert_eq!(res.slots[1].reason, "offpeak");
    }

    #[actix_web::test]
    async fn it_respects_suggestion_limit_and_closed_days() {
        let mut c = setup().await;
        c.tenant.settings.suggestion_limit = 3;
        c.ctx.repos.tenants.save(&c.tenant).await.unwrap();

        let res = usecase(&c, "2024-5-10", None).execute(&c.ctx).await.unwrap();
        assert_eq!(res.slots.len(), 3);

        // Saturday
        let res = usecase(&c, "2024-5-11", None).execute(&c.ctx).await.unwrap();
        assert!(res.slots.is_empty());
    }

    #[actix_web::test]
    async fn it_rejects_invalid_input() {
        let c = setup().await;
        assert!(matches!(
            usecase(&c, "2024-13-10", None).execute(&c.ctx).await,
            Err(UseCaseError::InvalidDate(_))
        ));

        let other = Tenant::new("Other");
        c.ctx.repos.tenants.insert(&other).await.unwrap();
        let mut foreign = usecase(&c, "2024-5-10", None);
        foreign.tenant_id = other.id.clone();
        assert_eq!(
            foreign.execute(&c.ctx).await,
            Err(UseCaseError::ServiceNotFound(c.service.id.clone()))
        );

        let mut unknown_resource = usecase(&c, "2024-5-10", None);
        let resource_id = ID::default();
        unknown_resource.resource_id = Some(resource_id.clone());
        assert_eq!(
            unknown_resource.execute(&c.ctx).await,
            Err(UseCaseError::ResourceNotFound(resource_id))
        );
    }
}
