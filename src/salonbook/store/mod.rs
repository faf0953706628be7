//! # Storage Layer
//!
//! The booking core never touches the disk. It hands its state to a
//! [`BookingStore`] at session boundaries: once when the session opens
//! ([`BookingStore::load`]) and once when it closes ([`BookingStore::save`]).
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, a single JSON document
//! - [`memory::InMemoryStore`]: no persistence, for tests
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── salon.json      # Records: id counters, clients, technicians, appointments
//! └── config.json     # Salon configuration (services catalogue)
//! ```
//!
//! Technicians are stored with their open slots only. Which slots are held by
//! appointments is derived from the appointments themselves when the records
//! are loaded, so the two can never disagree on disk.

use crate::error::Result;
use crate::ids::IdCounters;
use crate::model::{Appointment, Client, Technician};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

/// Everything a session needs to rebuild the booking manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub counters: IdCounters,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub technicians: Vec<Technician>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

/// Abstract interface for salon storage.
pub trait BookingStore {
    /// Load all records. A store that has never been saved loads as empty.
    fn load(&self) -> Result<Records>;

    /// Replace the stored records.
    fn save(&mut self, records: &Records) -> Result<()>;
}
