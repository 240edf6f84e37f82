use super::{AppointmentWrite, IAppointmentRepo};
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{conflict::has_conflict, Appointment, AppointmentStatus, ID};
use std::sync::Mutex;

pub struct InMemoryAppointmentRepo {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(vec![]),
        }
    }
}

fn resource_appointments(appointments: &[Appointment], resource_id: &ID) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.resource_id == *resource_id)
        .cloned()
        .collect()
}

fn has_status(
    appointments: &[Appointment],
    appointment_id: &ID,
    status: AppointmentStatus,
) -> bool {
    appointments
        .iter()
        .any(|a| a.id == *appointment_id && a.status == status)
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert_if_free(&self, appointment: &Appointment) -> anyhow::Result<AppointmentWrite> {
        // The guard is held from the check until the push
        let mut appointments = self.appointments.lock().unwrap();
        let same_resource = resource_appointments(&appointments, &appointment.resource_id);
        if appointment.is_active()
            && has_conflict(appointment.start_ts, appointment.end_ts, &same_resource, None)
        {
            return Ok(AppointmentWrite::Conflict);
        }
        appointments.push(appointment.clone());
        Ok(AppointmentWrite::Written)
    }

    async fn reschedule(
        &self,
        cancelled: &Appointment,
        previous_status: AppointmentStatus,
        replacement: &Appointment,
    ) -> anyhow::Result<AppointmentWrite> {
        let mut appointments = self.appointments.lock().unwrap();
        if !has_status(&appointments, &cancelled.id, previous_status) {
            return Ok(AppointmentWrite::Stale);
        }
        let same_resource = resource_appointments(&appointments, &replacement.resource_id);
        if has_conflict(
            replacement.start_ts,
            replacement.end_ts,
            &same_resource,
            Some(&cancelled.id),
        ) {
            return Ok(AppointmentWrite::Conflict);
        }
        if let Some(existing) = appointments.iter_mut().find(|a| a.id == cancelled.id) {
            *existing = cancelled.clone();
        }
        appointments.push(replacement.clone());
        Ok(AppointmentWrite::Written)
    }

    async fn save(
        &self,
        appointment: &Appointment,
        previous_status: AppointmentStatus,
    ) -> anyhow::Result<AppointmentWrite> {
        let mut appointments = self.appointments.lock().unwrap();
        match appointments
            .iter_mut()
            .find(|a| a.id == appointment.id && a.status == previous_status)
        {
            Some(existing) => {
                *existing = appointment.clone();
                Ok(AppointmentWrite::Written)
            }
            None => Ok(AppointmentWrite::Stale),
        }
    }

    async fn find(&self, appointment_id: &ID) -> anyhow::Result<Option<Appointment>> {
        Ok(find(appointment_id, &self.appointments))
    }

    async fn find_many(&self, tenant_id: &ID, appointment_ids: &[ID]) -> anyhow::Result<Vec<Appointment>> {
        Ok(find_by(&self.appointments, |a| {
            a.tenant_id == *tenant_id && appointment_ids.contains(&a.id)
        }))
    }

    async fn find_by_resource(
        &self,
        resource_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let mut appointments = find_by(&self.appointments, |a| {
            a.resource_id == *resource_id && a.start_ts < end_ts && a.end_ts > start_ts
        });
        appointments.sort_by_key(|a| a.start_ts);
        Ok(appointments)
    }
}
