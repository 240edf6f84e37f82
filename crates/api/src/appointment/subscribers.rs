use super::{
    cancel_appointment::CancelAppointmentUseCase,
    create_appointment::CreateAppointmentUseCase,
    reschedule_appointment::{RescheduleAppointmentUseCase, RescheduledAppointment},
    update_appointment_status::UpdateAppointmentStatusUseCase,
};
use crate::reminder::sync_appointment_reminders::{
    AppointmentOperation, SyncAppointmentRemindersUseCase,
};
use crate::shared::usecase::{execute, Subscriber};
use salon_scheduler_domain::Appointment;
use salon_scheduler_infra::SalonContext;

pub struct CreateRemindersOnAppointmentCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateAppointmentUseCase> for CreateRemindersOnAppointmentCreated {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        let sync_reminders = SyncAppointmentRemindersUseCase {
            appointment: e,
            operation: AppointmentOperation::Booked,
        };

        // Sideeffect, ignore result
        let _ = execute(sync_reminders, ctx).await;
    }
}

pub struct RemoveRemindersOnAppointmentCancelled;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelAppointmentUseCase> for RemoveRemindersOnAppointmentCancelled {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        let sync_reminders = SyncAppointmentRemindersUseCase {
            appointment: e,
            operation: AppointmentOperation::Ended,
        };

        // Sideeffect, ignore result
        let _ = execute(sync_reminders, ctx).await;
    }
}

pub struct SyncRemindersOnStatusUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateAppointmentStatusUseCase> for SyncRemindersOnStatusUpdated {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        let operation = if e.is_active() {
            AppointmentOperation::Booked
        } else {
            AppointmentOperation::Ended
        };
        let sync_reminders = SyncAppointmentRemindersUseCase {
            appointment: e,
            operation,
        };

        // Sideeffect, ignore result
        let _ = execute(sync_reminders, ctx).await;
    }
}

pub struct MoveRemindersOnAppointmentRescheduled;

#[async_trait::async_trait(?Send)]
impl Subscriber<RescheduleAppointmentUseCase> for MoveRemindersOnAppointmentRescheduled {
    async fn notify(&self, e: &RescheduledAppointment, ctx: &SalonContext) {
        let remove_old = SyncAppointmentRemindersUseCase {
            appointment: &e.cancelled,
            operation: AppointmentOperation::Ended,
        };
        let create_new = SyncAppointmentRemindersUseCase {
            appointment: &e.appointment,
            operation: AppointmentOperation::Booked,
        };

        // Sideeffect, ignore result
        let _ = execute(remove_old, ctx).await;
        let _ = execute(create_new, ctx).await;
    }
}
