use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Active appointments occupy their resource and have reminders
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Setting the current status again is allowed and changes nothing
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            Self::Scheduled => true,
            Self::Confirmed => next != Self::Scheduled,
            _ => false,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown appointment status: {0}")]
pub struct InvalidStatusError(pub String);

impl FromStr for AppointmentStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Appointment can not go from {from} to {to}")]
pub struct InvalidTransition {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

/// A booked interval `[start_ts, end_ts)` of a `Resource` for a `Client`.
///
/// `end_ts` is derived from the `Service` duration when the appointment
/// is created and only changes through a reschedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: ID,
    pub tenant_id: ID,
    pub resource_id: ID,
    pub service_id: ID,
    pub client_id: ID,
    pub start_ts: i64,
    pub end_ts: i64,
    pub status: AppointmentStatus,
    pub created: i64,
    pub updated: i64,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn set_status(&mut self, status: AppointmentStatus, now: i64) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(status) {
            return Err(InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.updated = now;
        Ok(())
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}
