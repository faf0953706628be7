//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every salon operation, whichever UI is driving it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Parses user-facing strings** (`C101`, `2025-11-21`, `10:00`, `45.00`)
//!   into typed values
//! - **Dispatches** to the appropriate command function
//! - **Owns the session**: loads records when opened, saves them on
//!   [`SalonApi::flush`] if anything changed
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `manager.rs` and `commands/*.rs`
//! - **Presentation**: returns [`CmdResult`] values, not strings
//!
//! ## Generic Over BookingStore
//!
//! `SalonApi<S: BookingStore>` is generic over the storage backend:
//! - Production: `SalonApi<FileStore>`
//! - Testing: `SalonApi<InMemoryStore>`

use crate::commands;
use crate::config::SalonConfig;
use crate::error::{Result, SalonError};
use crate::ids::AppointmentId;
use crate::manager::{BookingManager, LoadReport};
use crate::model::{parse_date, Price, Slot};
use crate::store::BookingStore;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// The main API facade for salon operations.
pub struct SalonApi<S: BookingStore> {
    store: S,
    manager: BookingManager,
    config: SalonConfig,
    config_dir: PathBuf,
    load_report: LoadReport,
    dirty: bool,
}

impl<S: BookingStore> SalonApi<S> {
    /// Starts a session: loads every record from `store`.
    pub fn open(store: S, config: SalonConfig, config_dir: PathBuf) -> Result<Self> {
        let records = store.load()?;
        let (manager, load_report) = BookingManager::from_records(records);
        if !load_report.is_clean() {
            warn!(
                skipped = load_report.skipped(),
                closed = load_report.closed_slots,
                "stored records needed repairs, run `doctor` to review"
            );
        }
        Ok(Self {
            store,
            manager,
            config,
            config_dir,
            load_report,
            dirty: false,
        })
    }

    // --- Clients ---

    pub fn register_client(&mut self, name: &str, phone: &str) -> Result<CmdResult> {
        self.mutate(|manager| commands::clients::register(manager, name, phone))
    }

    pub fn update_client(
        &mut self,
        id: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<CmdResult> {
        let id = id.parse()?;
        self.mutate(|manager| commands::clients::update(manager, id, name, phone))
    }

    pub fn remove_client(&mut self, id: &str) -> Result<CmdResult> {
        let id = id.parse()?;
        self.mutate(|manager| commands::clients::remove(manager, id))
    }

    pub fn list_clients(&self) -> Result<CmdResult> {
        commands::clients::list(&self.manager)
    }

    pub fn show_client(&self, id: &str) -> Result<CmdResult> {
        commands::clients::show(&self.manager, id.parse()?)
    }

    // --- Technicians ---

    pub fn register_technician<I: AsRef<str>>(
        &mut self,
        name: &str,
        slots: &[I],
    ) -> Result<CmdResult> {
        let slots = parse_all::<Slot, I>(slots)?;
        self.mutate(|manager| commands::technicians::register(manager, name, &slots))
    }

    pub fn open_slots_for<I: AsRef<str>>(
        &mut self,
        technician: &str,
        slots: &[I],
    ) -> Result<CmdResult> {
        let technician = technician.parse()?;
        let slots = parse_all::<Slot, I>(slots)?;
        self.mutate(|manager| commands::technicians::open(manager, technician, &slots))
    }

    pub fn close_slots_for<I: AsRef<str>>(
        &mut self,
        technician: &str,
        slots: &[I],
    ) -> Result<CmdResult> {
        let technician = technician.parse()?;
        let slots = parse_all::<Slot, I>(slots)?;
        self.mutate(|manager| commands::technicians::close(manager, technician, &slots))
    }

    pub fn list_technicians(&self) -> Result<CmdResult> {
        commands::technicians::list(&self.manager)
    }

    pub fn technician_schedule(&self, id: &str) -> Result<CmdResult> {
        commands::technicians::schedule(&self.manager, id.parse()?)
    }

    // --- Appointments ---

    pub fn book(
        &mut self,
        client: &str,
        technician: &str,
        date: &str,
        time: &str,
        service: &str,
        price: Option<&str>,
    ) -> Result<CmdResult> {
        let request = BookingRequest {
            client: client.parse()?,
            technician: technician.parse()?,
            slot: Slot::parse(date, time)?,
            service: service.to_string(),
            price: price.map(Price::from_str).transpose()?,
        };
        let config = &self.config;
        let result = commands::booking::book(&mut self.manager, config, request)?;
        self.dirty = true;
        Ok(result)
    }

    pub fn cancel<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids: Vec<AppointmentId> = parse_all(ids)?;
        self.mutate(|manager| commands::booking::cancel(manager, &ids))
    }

    pub fn complete<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids: Vec<AppointmentId> = parse_all(ids)?;
        self.mutate(|manager| commands::booking::complete(manager, &ids))
    }

    pub fn open_slots(&self, date: &str) -> Result<CmdResult> {
        commands::booking::open_slots(&self.manager, parse_date(date)?)
    }

    pub fn list_appointments(&self, query: &AppointmentQuery) -> Result<CmdResult> {
        let filter = AppointmentFilter {
            client: query.client.as_deref().map(str::parse).transpose()?,
            technician: query.technician.as_deref().map(str::parse).transpose()?,
            status: query.status.as_deref().map(str::parse).transpose()?,
            date: query.date.as_deref().map(parse_date).transpose()?,
        };
        commands::booking::list(&self.manager, &filter)
    }

    // --- Misc ---

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, &mut self.config, action)
    }

    pub fn init(&mut self, demo: bool, demo_date: NaiveDate) -> Result<CmdResult> {
        let (result, changed) =
            commands::init::run(&self.config_dir, &mut self.manager, demo, demo_date)?;
        self.dirty |= changed;
        Ok(result)
    }

    /// Reviews load-time repairs and marks them for saving.
    pub fn doctor(&mut self) -> Result<CmdResult> {
        let (result, save) = commands::doctor::run(&self.manager, &self.load_report)?;
        self.dirty |= save;
        Ok(result)
    }

    /// Ends the session's pending work: saves if anything changed since the
    /// last flush. Returns whether a save happened.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.store.save(&self.manager.to_records())?;
        self.dirty = false;
        debug!("session changes saved");
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn manager(&self) -> &BookingManager {
        &self.manager
    }

    pub fn salon_config(&self) -> &SalonConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn mutate<F>(&mut self, op: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut BookingManager) -> Result<CmdResult>,
    {
        let result = op(&mut self.manager)?;
        self.dirty = true;
        Ok(result)
    }
}

/// Raw appointment filters, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
    pub client: Option<String>,
    pub technician: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

fn parse_all<T, I>(inputs: &[I]) -> Result<Vec<T>>
where
    T: FromStr<Err = SalonError>,
    I: AsRef<str>,
{
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

pub use crate::commands::booking::{AppointmentFilter, BookingRequest};
pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, SlotListing};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn api() -> SalonApi<InMemoryStore> {
        let store = StoreFixture::new()
            .with_client("Cathy Smith", "555-1234")
            .with_technician("Alice", &[("2025-11-21", "10:00"), ("2025-11-21", "11:00")])
            .build();
        SalonApi::open(store, SalonConfig::default(), PathBuf::from("/nonexistent")).unwrap()
    }

    #[test]
    fn book_parses_and_dispatches() {
        let mut api = api();
        let result = api
            .book("C101", "t201", "2025-11-21", "10:00", "manicure", None)
            .unwrap();
        assert_eq!(result.appointments[0].appointment.id, AppointmentId(3001));
        assert!(api.is_dirty());
    }

    #[test]
    fn bad_input_is_rejected_before_dispatch() {
        let mut api = api();
        assert!(matches!(
            api.book("C101", "T201", "21/11/2025", "10:00", "Manicure", None)
                .unwrap_err(),
            SalonError::InvalidInput(_)
        ));
        assert!(matches!(
            api.book("C101", "T201", "2025-11-21", "10:00", "Manicure", Some("ten"))
                .unwrap_err(),
            SalonError::InvalidInput(_)
        ));
        assert!(!api.is_dirty());
    }

    #[test]
    fn failed_command_leaves_session_clean() {
        let mut api = api();
        let err = api
            .book("C999", "T201", "2025-11-21", "10:00", "Manicure", None)
            .unwrap_err();
        assert!(matches!(
            err,
            SalonError::NotFound {
                kind: EntityKind::Client,
                ..
            }
        ));
        assert!(!api.flush().unwrap());
        assert_eq!(api.store().save_count(), 0);
    }

    #[test]
    fn flush_saves_once() {
        let mut api = api();
        api.register_client("Dana", "555-0000").unwrap();
        assert!(api.flush().unwrap());
        assert!(!api.flush().unwrap());
        assert_eq!(api.store().save_count(), 1);
        assert_eq!(api.store().records().clients.len(), 2);
    }

    #[test]
    fn queries_do_not_dirty_the_session() {
        let api = api();
        api.list_clients().unwrap();
        api.list_technicians().unwrap();
        api.open_slots("2025-11-21").unwrap();
        api.list_appointments(&AppointmentQuery::default()).unwrap();
        assert!(!api.is_dirty());
    }

    #[test]
    fn list_appointments_parses_filters() {
        let mut api = api();
        api.book("C101", "T201", "2025-11-21", "10:00", "Manicure", None)
            .unwrap();

        let query = AppointmentQuery {
            status: Some("booked".into()),
            date: Some("2025-11-21".into()),
            ..Default::default()
        };
        assert_eq!(api.list_appointments(&query).unwrap().appointments.len(), 1);

        let query = AppointmentQuery {
            status: Some("whenever".into()),
            ..Default::default()
        };
        assert!(api.list_appointments(&query).is_err());
    }

    #[test]
    fn slot_batches_parse_every_entry() {
        let mut api = api();
        let err = api
            .open_slots_for("T201", &["2025-11-22 09:00", "tomorrow"])
            .unwrap_err();
        assert!(matches!(err, SalonError::InvalidInput(_)));

        api.open_slots_for("T201", &["2025-11-22 09:00"]).unwrap();
        assert_eq!(api.open_slots("2025-11-22").unwrap().open_slots.len(), 1);
    }
}
