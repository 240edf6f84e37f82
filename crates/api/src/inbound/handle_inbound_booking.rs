use crate::appointment::create_appointment::{self, CreateAppointmentUseCase};
use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::handle_inbound_booking::*;
use salon_scheduler_domain::{
    conflict::has_conflict, Appointment, CanonicalJsonAdapter, ChannelAdapter, InboundBookingRequest,
    InboundError, ID,
};
use salon_scheduler_infra::SalonContext;
use tracing::warn;

pub async fn handle_inbound_booking_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Bytes,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let path = path.into_inner();
    let adapter = CanonicalJsonAdapter::new(&path.channel, &ctx.config.inbound_webhook_secret);
    let signature = http_req
        .headers()
        .get(adapter.signature_header())
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let usecase = HandleInboundBookingUseCase {
        tenant_id: path.tenant_id,
        adapter: Box::new(adapter),
        signature,
        body: body.to_vec(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| match res {
            InboundBooking::Booked(appointment) => {
                HttpResponse::Created().json(APIResponse::booked(appointment))
            }
            InboundBooking::Duplicate => HttpResponse::Ok().json(APIResponse::duplicate()),
        })
        .map_err(SalonError::from)
}

/// Books an appointment from a messaging channel webhook. A webhook that is
/// delivered again with the same idempotency key books nothing.
pub struct HandleInboundBookingUseCase {
    pub tenant_id: ID,
    pub adapter: Box<dyn ChannelAdapter>,
    pub signature: Option<String>,
    pub body: Vec<u8>,
}

impl std::fmt::Debug for HandleInboundBookingUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleInboundBookingUseCase")
            .field("tenant_id", &self.tenant_id)
            .field("channel", &self.adapter.channel())
            .finish()
    }
}

#[derive(Debug, PartialEq)]
pub enum InboundBooking {
    Booked(Appointment),
    Duplicate,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    InvalidSignature,
    InvalidPayload(InboundError),
    NoResourceAvailable,
    Booking(create_appointment::UseCaseError),
    StorageError,
}

impl From<UseCaseError> for SalonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", id))
            }
            UseCaseError::InvalidSignature => {
                Self::Unauthorized("The webhook signature is missing or invalid".into())
            }
            UseCaseError::InvalidPayload(e) => Self::BadClientData(e.to_string()),
            UseCaseError::NoResourceAvailable => Self::Conflict(
                "No resource is available at the requested time. Pick another time.".into(),
            ),
            UseCaseError::Booking(e) => e.into(),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

impl HandleInboundBookingUseCase {
    fn idempotency_key(&self, req: &InboundBookingRequest) -> String {
        format!(
            "inbound:{}:{}:{}",
            self.tenant_id,
            self.adapter.channel(),
            req.idempotency_key.trim()
        )
    }

    /// First resource of the tenant without an active appointment in the
    /// requested interval
    async fn pick_resource(
        &self,
        req: &InboundBookingRequest,
        ctx: &SalonContext,
    ) -> Result<ID, UseCaseError> {
        let service = match ctx.repos.services.find(&req.service_id).await {
            Ok(Some(service)) if service.tenant_id == self.tenant_id => service,
            Ok(_) => {
                return Err(UseCaseError::Booking(
                    create_appointment::UseCaseError::ServiceNotFound(req.service_id.clone()),
                ))
            }
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let end_ts = service.end_of(req.start_ts).ok_or(UseCaseError::Booking(
            create_appointment::UseCaseError::InvalidStartTime,
        ))?;

        let resources = ctx
            .repos
            .resources
            .find_by_tenant(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for resource in resources {
            let existing = ctx
                .repos
                .appointments
                .find_by_resource(&resource.id, req.start_ts, end_ts)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            if !has_conflict(req.start_ts, end_ts, &existing, None) {
                return Ok(resource.id);
            }
        }

        Err(UseCaseError::NoResourceAvailable)
    }

    async fn book(
        &self,
        req: InboundBookingRequest,
        ctx: &SalonContext,
    ) -> Result<Appointment, UseCaseError> {
        let resource_id = match &req.resource_id {
            Some(resource_id) => resource_id.clone(),
            None => self.pick_resource(&req, ctx).await?,
        };
        let create_appointment = CreateAppointmentUseCase {
            tenant_id: self.tenant_id.clone(),
            resource_id,
            service_id: req.service_id,
            client: req.client,
            start_ts: req.start_ts,
        };

        execute(create_appointment, ctx)
            .await
            .map_err(UseCaseError::Booking)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for HandleInboundBookingUseCase {
    type Response = InboundBooking;

    type Error = UseCaseError;

    const NAME: &'static str = "HandleInboundBooking";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        if !self
            .adapter
            .verify_signature(self.signature.as_deref(), &self.body)
        {
            return Err(UseCaseError::InvalidSignature);
        }
        match ctx.repos.tenants.find(&self.tenant_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(UseCaseError::TenantNotFound(self.tenant_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }
        let req = self
            .adapter
            .normalize(&self.body)
            .map_err(UseCaseError::InvalidPayload)?;

        let key = self.idempotency_key(&req);
        let claimed = ctx
            .repos
            .idempotency
            .check_and_set(
                &key,
                ctx.config.inbound_idempotency_ttl,
                ctx.sys.get_timestamp_millis(),
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !claimed {
            return Ok(InboundBooking::Duplicate);
        }

        match self.book(req, ctx).await {
            Ok(appointment) => Ok(InboundBooking::Booked(appointment)),
            Err(e) => {
                // Let the channel retry the same event
                if let Err(remove_err) = ctx.repos.idempotency.remove(&key).await {
                    warn!(
                        "Unable to release the idempotency key: {}. Error: {:?}",
                        key, remove_err
                    );
                }
                Err(e)
            }
        }
    }
}
