use crate::shared::usecase::UseCase;
use salon_scheduler_domain::{
    assign_variant, format_date, render_template, to_local, Appointment, AssignedTemplate, Client,
    NotificationLog, NotificationStatus, ReminderJob, ReminderJobStatus, Tenant, TemplateVariables,
};
use salon_scheduler_infra::{OutgoingNotification, SalonContext};
use tracing::{error, warn};

/// Sends every pending reminder that is due and records the outcome of each
/// delivery as a `NotificationLog`
#[derive(Debug)]
pub struct SendDueRemindersUseCase {}

#[derive(Debug, Default, PartialEq)]
pub struct SentReminders {
    pub sent: usize,
    pub failed: usize,
    /// Jobs of appointments that are gone or no longer active
    pub skipped: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

/// Channel and address to reach the client on. A channel identity wins over
/// the phone number.
fn recipient(client: &Client) -> (String, Option<String>) {
    match &client.channel {
        Some(identity) => (identity.channel.clone(), Some(identity.user_id.clone())),
        None => ("sms".into(), client.phone.clone()),
    }
}

async fn render(
    job: &ReminderJob,
    tenant: &Tenant,
    appointment: &Appointment,
    client: &Client,
    channel: &str,
    ctx: &SalonContext,
) -> anyhow::Result<(AssignedTemplate, String)> {
    let tenant_templates = ctx
        .repos
        .notification_templates
        .find(Some(&tenant.id), channel, &job.kind)
        .await?;
    let default_templates = ctx
        .repos
        .notification_templates
        .find(None, channel, &job.kind)
        .await?;
    let template = assign_variant(
        &tenant_templates,
        &default_templates,
        channel,
        &job.kind,
        client.assignment_key(),
    );

    let service = ctx.repos.services.find(&appointment.service_id).await?;
    let resource = ctx.repos.resources.find(&appointment.resource_id).await?;
    let local_start = to_local(appointment.start_ts, &tenant.settings.timezone);
    let vars = TemplateVariables {
        client_name: client.name.clone(),
        service_name: service.map(|s| s.name),
        resource_name: resource.map(|r| r.name),
        date: local_start.as_ref().map(format_date),
        time: local_start.map(|d| d.format("%H:%M").to_string()),
        business_name: Some(tenant.name.clone()),
    };
    let text = render_template(&template.body, &vars);

    Ok((template, text))
}

impl SendDueRemindersUseCase {
    /// Returns the delivery status, `None` when the job was skipped
    async fn send(
        &self,
        job: &ReminderJob,
        ctx: &SalonContext,
    ) -> anyhow::Result<Option<NotificationStatus>> {
        let appointment = match ctx.repos.appointments.find(&job.appointment_id).await? {
            Some(appointment) if appointment.is_active() => appointment,
            _ => {
                ctx.repos
                    .reminder_jobs
                    .update_status(&job.id, ReminderJobStatus::Cancelled)
                    .await?;
                return Ok(None);
            }
        };
        let (tenant, client) = match (
            ctx.repos.tenants.find(&job.tenant_id).await?,
            ctx.repos.clients.find(&appointment.client_id).await?,
        ) {
            (Some(tenant), Some(client)) => (tenant, client),
            _ => {
                ctx.repos
                    .reminder_jobs
                    .update_status(&job.id, ReminderJobStatus::Cancelled)
                    .await?;
                return Ok(None);
            }
        };

        let (channel, recipient) = recipient(&client);
        let (template, text) = render(job, &tenant, &appointment, &client, &channel, ctx).await?;
        let notification = OutgoingNotification {
            tenant_id: tenant.id.clone(),
            client_id: client.id.clone(),
            appointment_id: Some(appointment.id.clone()),
            channel: channel.clone(),
            recipient: recipient.clone(),
            notification_type: job.kind.clone(),
            title: template.title.clone(),
            text: text.clone(),
        };

        let delivery = match recipient {
            Some(_) => ctx.notifier.send(&notification).await,
            None => Err(anyhow::Error::msg("The client has no reachable address")),
        };
        let (status, error) = match delivery {
            Ok(_) => (NotificationStatus::Sent, None),
            Err(e) => {
                warn!(
                    tenant_id = %tenant.id,
                    appointment_id = %appointment.id,
                    "Unable to deliver reminder {}: {:?}",
                    job.kind,
                    e
                );
                (NotificationStatus::Failed, Some(e.to_string()))
            }
        };

        let log = NotificationLog {
            id: Default::default(),
            tenant_id: tenant.id,
            template_id: template.template_id,
            variant_key: template.variant_key,
            channel,
            notification_type: job.kind.clone(),
            status,
            client_id: client.id,
            appointment_id: Some(appointment.id),
            text,
            error,
            created: ctx.sys.get_timestamp_millis(),
        };
        ctx.repos.notification_logs.insert(&log).await?;

        Ok(Some(status))
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = SentReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let jobs = ctx
            .repos
            .reminder_jobs
            .take_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut res = SentReminders::default();
        for job in &jobs {
            match self.send(job, ctx).await {
                Ok(Some(NotificationStatus::Sent)) => res.sent += 1,
                Ok(Some(NotificationStatus::Failed)) => res.failed += 1,
                Ok(None) => res.skipped += 1,
                Err(e) => {
                    error!("Unable to process reminder job: {}. Error: {:?}", job.id, e);
                    res.failed += 1;
                }
            }
        }

        Ok(res)
    }
}
