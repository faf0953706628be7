use crate::ids::TechnicianId;
use crate::model::Slot;
use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Client,
    Technician,
    Appointment,
    Service,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Client => "Client",
            EntityKind::Technician => "Technician",
            EntityKind::Appointment => "Appointment",
            EntityKind::Service => "Service",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SalonError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("{technician} is not available on {slot}: {reason}")]
    Conflict {
        technician: TechnicianId,
        slot: Slot,
        reason: String,
    },

    #[error("Invalid state for {id}: {reason}")]
    InvalidState { id: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl SalonError {
    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        SalonError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(technician: TechnicianId, slot: Slot, reason: impl Into<String>) -> Self {
        SalonError::Conflict {
            technician,
            slot,
            reason: reason.into(),
        }
    }

    pub fn invalid_state(id: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        SalonError::InvalidState {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SalonError>;
