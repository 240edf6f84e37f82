use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_conversion_stats::*;
use salon_scheduler_domain::{
    conversion_stats::{aggregate_conversion_stats, referenced_appointment_ids, ConversionStatsRow},
    ID,
};
use salon_scheduler_infra::{NotificationLogQuery, SalonContext};

pub async fn get_conversion_stats_controller(
    path: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let query_params = query_params.0;
    let usecase = GetConversionStatsUseCase {
        tenant_id: path.tenant_id.clone(),
        channel: query_params.channel,
        notification_type: query_params.notification_type,
        from_ts: query_params.from_ts,
        to_ts: query_params.to_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.from_ts, res.to_ts, res.rows)))
        .map_err(SalonError::from)
}

/// Delivery and appointment outcome numbers per template variant for the
/// notifications sent in `[from_ts, to_ts)`
#[derive(Debug)]
pub struct GetConversionStatsUseCase {
    pub tenant_id: ID,
    pub channel: String,
    pub notification_type: String,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub struct ConversionStats {
    pub from_ts: i64,
    pub to_ts: i64,
    pub rows: Vec<ConversionStatsRow>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for SalonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", id))
            }
            UseCaseError::InvalidTimespan => {
                Self::BadClientData("The provided start and end is invalid".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetConversionStatsUseCase {
    type Response = ConversionStats;

    type Error = UseCaseError;

    const NAME: &'static str = "GetConversionStats";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.tenants.find(&self.tenant_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(UseCaseError::TenantNotFound(self.tenant_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        let to_ts = self.to_ts.unwrap_or_else(|| ctx.sys.get_timestamp_millis());
        let from_ts = self
            .from_ts
            .unwrap_or(to_ts - ctx.config.stats_default_duration);
        if from_ts >= to_ts || to_ts - from_ts > ctx.config.stats_query_duration_limit {
            return Err(UseCaseError::InvalidTimespan);
        }

        let query = NotificationLogQuery {
            tenant_id: self.tenant_id.clone(),
            channel: self.channel.clone(),
            notification_type: self.notification_type.clone(),
            from_ts,
            to_ts,
        };
        let logs = ctx
            .repos
            .notification_logs
            .find_by_query(&query)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let appointments = ctx
            .repos
            .appointments
            .find_many(&self.tenant_id, &referenced_appointment_ids(&logs))
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(ConversionStats {
            from_ts,
            to_ts,
            rows: aggregate_conversion_stats(&logs, &appointments),
        })
    }
}
