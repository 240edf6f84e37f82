mod appointment;
mod inbound;
mod notification;
mod slots;
mod status;

pub mod dtos {
    pub use crate::appointment::dtos::*;
}

pub use crate::appointment::api::*;
pub use crate::inbound::api::*;
pub use crate::notification::api::*;
pub use crate::slots::api::*;
pub use crate::status::api::*;
