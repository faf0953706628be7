use crate::config::SalonConfig;
use crate::error::{Result, SalonError};
use crate::ids::TechnicianId;
use crate::manager::AppointmentDetail;
use crate::model::{Client, Slot, Technician};

pub mod booking;
pub mod clients;
pub mod config;
pub mod doctor;
pub mod init;
pub mod technicians;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An open slot with the technician's name resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotListing {
    pub technician: TechnicianId,
    pub technician_name: String,
    pub slot: Slot,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub clients: Vec<Client>,
    pub technicians: Vec<Technician>,
    pub appointments: Vec<AppointmentDetail>,
    pub open_slots: Vec<SlotListing>,
    pub config: Option<SalonConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_technicians(mut self, technicians: Vec<Technician>) -> Self {
        self.technicians = technicians;
        self
    }

    pub fn with_appointments(mut self, appointments: Vec<AppointmentDetail>) -> Self {
        self.appointments = appointments;
        self
    }

    pub fn with_open_slots(mut self, open_slots: Vec<SlotListing>) -> Self {
        self.open_slots = open_slots;
        self
    }

    pub fn with_config(mut self, config: SalonConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SalonError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}
