pub mod send_due_reminders;
pub mod sync_appointment_reminders;
