//! # Identifiers
//!
//! Every record carries a numeric id handed out by the booking manager. Ids are
//! shown to users with a one-letter prefix so they can't be confused with each
//! other on the command line:
//!
//! - `C101`: a client
//! - `T201`: a technician
//! - `A3001`: an appointment
//!
//! Parsing accepts the prefixed form (either case) or the bare number, so
//! `C101`, `c101` and `101` all name the same client.
//!
//! Ids are never reused. [`IdCounters`] is persisted alongside the records and
//! only ever moves forward, even after a client is removed.

use crate::error::{Result, SalonError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const PREFIX: char = $prefix;

            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = SalonError;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(Self::PREFIX)
                    .or_else(|| trimmed.strip_prefix(Self::PREFIX.to_ascii_lowercase()))
                    .unwrap_or(trimmed);
                digits.parse::<u32>().map($name).map_err(|_| {
                    SalonError::InvalidInput(format!("'{}' is not a valid {} id", s, $label))
                })
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Client`](crate::model::Client).
    ClientId,
    'C',
    "client"
);
entity_id!(
    /// Identifies a [`Technician`](crate::model::Technician).
    TechnicianId,
    'T',
    "technician"
);
entity_id!(
    /// Identifies an [`Appointment`](crate::model::Appointment).
    AppointmentId,
    'A',
    "appointment"
);

const FIRST_CLIENT_ID: u32 = 101;
const FIRST_TECHNICIAN_ID: u32 = 201;
const FIRST_APPOINTMENT_ID: u32 = 3001;

/// Monotonic id allocators, one per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub next_client: u32,
    pub next_technician: u32,
    pub next_appointment: u32,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_client: FIRST_CLIENT_ID,
            next_technician: FIRST_TECHNICIAN_ID,
            next_appointment: FIRST_APPOINTMENT_ID,
        }
    }
}

impl IdCounters {
    pub fn allocate_client(&mut self) -> Result<ClientId> {
        advance(&mut self.next_client, "client").map(ClientId)
    }

    pub fn allocate_technician(&mut self) -> Result<TechnicianId> {
        advance(&mut self.next_technician, "technician").map(TechnicianId)
    }

    pub fn allocate_appointment(&mut self) -> Result<AppointmentId> {
        advance(&mut self.next_appointment, "appointment").map(AppointmentId)
    }

    /// Moves the counters past ids that already exist (e.g. after loading).
    ///
    /// Returns `false` for an id with no successor; such a record can't be
    /// kept without the allocator handing its id out again.
    pub fn observe_client(&mut self, id: ClientId) -> bool {
        observe(&mut self.next_client, id.0)
    }

    pub fn observe_technician(&mut self, id: TechnicianId) -> bool {
        observe(&mut self.next_technician, id.0)
    }

    pub fn observe_appointment(&mut self, id: AppointmentId) -> bool {
        observe(&mut self.next_appointment, id.0)
    }
}

fn advance(next: &mut u32, label: &str) -> Result<u32> {
    let id = *next;
    *next = id
        .checked_add(1)
        .ok_or_else(|| SalonError::Store(format!("no {} ids left to hand out", label)))?;
    Ok(id)
}

fn observe(next: &mut u32, seen: u32) -> bool {
    match seen.checked_add(1) {
        Some(after) => {
            *next = (*next).max(after);
            true
        }
        None => false,
    }
}
