use crate::shared::usecase::UseCase;
use salon_scheduler_domain::{plan_reminders, Appointment, ReminderJob, DAY_MILLIS};
use salon_scheduler_infra::SalonContext;
use tracing::{error, warn};

#[derive(Debug)]
pub enum AppointmentOperation {
    /// The appointment was booked, confirmed or is the new half of a reschedule
    Booked,
    /// The appointment was cancelled, rescheduled away or reached a terminal status
    Ended,
}

/// Keeps the `ReminderJob`s of an appointment in line with its status
#[derive(Debug)]
pub struct SyncAppointmentRemindersUseCase<'a> {
    pub appointment: &'a Appointment,
    pub operation: AppointmentOperation,
}

#[derive(Debug, Default, PartialEq)]
pub struct SyncedReminders {
    pub created: Vec<ReminderJob>,
    pub removed: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound,
    StorageError,
}

impl<'a> SyncAppointmentRemindersUseCase<'a> {
    async fn schedule(&self, ctx: &SalonContext) -> Result<SyncedReminders, UseCaseError> {
        let appointment = self.appointment;
        if !appointment.is_active() {
            return Ok(Default::default());
        }
        let tenant = match ctx.repos.tenants.find(&appointment.tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => return Err(UseCaseError::TenantNotFound),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let settings = &tenant.settings;
        let now = ctx.sys.get_timestamp_millis();
        // Remembered at least until the appointment is over
        let ttl = std::cmp::max(
            ctx.config.reminder_idempotency_ttl,
            appointment.end_ts - now + DAY_MILLIS,
        );

        let mut claimed = Vec::new();
        for planned in plan_reminders(
            appointment,
            &settings.reminder_offsets,
            &settings.quiet_hours,
            &settings.timezone,
            now,
        ) {
            let planned = match planned {
                Ok(planned) => planned,
                Err(e) => {
                    warn!(
                        tenant_id = %appointment.tenant_id,
                        appointment_id = %appointment.id,
                        "Skipping reminder: {}",
                        e
                    );
                    continue;
                }
            };
            match ctx
                .repos
                .idempotency
                .check_and_set(&planned.dedupe_key, ttl, now)
                .await
            {
                Ok(true) => claimed.push(ReminderJob::new(appointment, planned, now)),
                // Already scheduled before
                Ok(false) => continue,
                Err(e) => {
                    error!("Unable to claim reminder key: {:?}", e);
                    return Err(UseCaseError::StorageError);
                }
            }
        }

        if claimed.is_empty() {
            return Ok(Default::default());
        }
        match ctx.repos.reminder_jobs.insert_many(&claimed).await {
            Ok(created) => Ok(SyncedReminders {
                created,
                removed: 0,
            }),
            Err(e) => {
                error!(
                    "Unable to store reminders for appointment: {}. Error: {:?}",
                    appointment.id, e
                );
                // Give the keys back so a later sync can schedule them
                for job in &claimed {
                    if let Err(remove_err) = ctx.repos.idempotency.remove(&job.dedupe_key).await {
                        warn!(
                            "Unable to release the reminder key: {}. Error: {:?}",
                            job.dedupe_key, remove_err
                        );
                    }
                }
                Err(UseCaseError::StorageError)
            }
        }
    }

    async fn remove(&self, ctx: &SalonContext) -> Result<SyncedReminders, UseCaseError> {
        let removed = ctx
            .repos
            .reminder_jobs
            .delete_by_appointment(&self.appointment.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(SyncedReminders {
            created: vec![],
            removed,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl<'a> UseCase for SyncAppointmentRemindersUseCase<'a> {
    type Response = SyncedReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncAppointmentReminders";

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        match self.operation {
            AppointmentOperation::Booked => self.schedule(ctx).await,
            AppointmentOperation::Ended => self.remove(ctx).await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::testing::{
        setup, TestContext, UnavailableReminderJobRepo, FRIDAY, HOUR, NOW,
    };
    use std::sync::Arc;
    use salon_scheduler_domain::{AppointmentStatus, QuietHours, ReminderOffset, Time, REMINDER_24H};

    fn appointment(c: &TestContext, start_ts: i64) -> Appointment {
        Appointment {
            id: Default::default(),
            tenant_id: c.tenant.id.clone(),
            resource_id: c.resource.id.clone(),
            service_id: c.service.id.clone(),
            client_id: Default::default(),
            start_ts,
            end_ts: start_ts + HOUR,
            status: AppointmentStatus::Scheduled,
            created: NOW,
            updated: NOW,
        }
    }

    async fn sync(
        ctx: &SalonContext,
        appointment: &Appointment,
        operation: AppointmentOperation,
    ) -> SyncedReminders {
        let mut usecase = SyncAppointmentRemindersUseCase {
            appointment,
            operation,
        };
        usecase.execute(ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn scheduling_twice_creates_one_job_per_offset() {
        let c = setup().await;
        let a = appointment(&c, FRIDAY + 15 * HOUR);

        let first = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert_eq!(first.created.len(), 2);
        let second = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert!(second.created.is_empty());

        let jobs = c.ctx.repos.reminder_jobs.find_by_appointment(&a.id).await.unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[actix_web::test]
    async fn removing_is_repeatable() {
        let c = setup().await;
        let a = appointment(&c, FRIDAY + 15 * HOUR);
        sync(&c.ctx, &a, AppointmentOperation::Booked).await;

        assert_eq!(sync(&c.ctx, &a, AppointmentOperation::Ended).await.removed, 2);
        assert_eq!(sync(&c.ctx, &a, AppointmentOperation::Ended).await.removed, 0);
        assert!(c
            .ctx
            .repos
            .reminder_jobs
            .find_by_appointment(&a.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn it_skips_offsets_in_the_past() {
        let c = setup().await;
        // Starts in 5 hours, only the 1 hour reminder is left
        let a = appointment(&c, NOW + 5 * HOUR);
        let synced = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert_eq!(synced.created.len(), 1);
        assert_eq!(synced.created[0].fire_at, NOW + 4 * HOUR);
    }

    #[actix_web::test]
    async fn it_moves_reminders_out_of_quiet_hours() {
        let mut c = setup().await;
        c.tenant.settings.quiet_hours = QuietHours::new(Time::new(22, 0), Time::new(8, 0));
        c.tenant.settings.reminder_offsets = vec![ReminderOffset::new(REMINDER_24H, 24 * 60)];
        c.ctx.repos.tenants.save(&c.tenant).await.unwrap();

        // Friday 03:00 + 24h is a Saturday 03:00 appointment, reminder at Friday 03:00
        let a = appointment(&c, FRIDAY + 27 * HOUR);
        let synced = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert_eq!(synced.created.len(), 1);
        assert_eq!(synced.created[0].fire_at, FRIDAY + 8 * HOUR);
    }

    #[actix_web::test]
    async fn ended_appointments_get_no_reminders() {
        let c = setup().await;
        let mut a = appointment(&c, FRIDAY + 15 * HOUR);
        a.status = AppointmentStatus::Cancelled;
        let synced = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert_eq!(synced, SyncedReminders::default());
    }

    #[actix_web::test]
    async fn failed_store_gives_the_keys_back() {
        let mut c = setup().await;
        let a = appointment(&c, FRIDAY + 15 * HOUR);
        let jobs = c.ctx.repos.reminder_jobs.clone();
        c.ctx.repos.reminder_jobs = Arc::new(UnavailableReminderJobRepo);

        let mut usecase = SyncAppointmentRemindersUseCase {
            appointment: &a,
            operation: AppointmentOperation::Booked,
        };
        assert_eq!(usecase.execute(&c.ctx).await, Err(UseCaseError::StorageError));

        c.ctx.repos.reminder_jobs = jobs;
        let synced = sync(&c.ctx, &a, AppointmentOperation::Booked).await;
        assert_eq!(synced.created.len(), 2);
    }
}
