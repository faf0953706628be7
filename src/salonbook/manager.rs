//! # Booking Manager
//!
//! [`BookingManager`] is the scheduling core. It owns every client, technician
//! and appointment, hands out ids, and is the only code allowed to move a slot
//! between a technician's availability and schedule.
//!
//! ## Slot Lifecycle
//!
//! ```text
//!            add_slot                book_appointment
//!   (none) ───────────▶ availability ─────────────────▶ schedule ──▶ Completed (kept)
//!            ◀───────────            ◀─────────────────
//!            remove_slot             cancel_appointment
//! ```
//!
//! A slot is in at most one of the two calendars at any time. Completed
//! appointments keep their slot in the schedule as history, so it is never
//! offered again.
//!
//! ## Failure Semantics
//!
//! Every operation validates first and mutates after, so an error never leaves
//! a half-applied change behind. Requests for the same slot are resolved in
//! call order: the first booking closes the slot and the second fails with
//! [`SalonError::Conflict`].
//!
//! ## References
//!
//! Appointments refer to their client and technician by id. Names for display
//! are resolved through the manager ([`BookingManager::detail`]), never by
//! holding on to the records themselves.

use crate::error::{EntityKind, Result, SalonError};
use crate::ids::{AppointmentId, ClientId, IdCounters, TechnicianId};
use crate::model::{Appointment, AppointmentStatus, Client, Price, Slot, Technician};
use crate::store::Records;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const OUT_OF_RANGE: &str = "id is too large to keep";

/// A slot a technician has left open for booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSlot {
    pub technician: TechnicianId,
    pub slot: Slot,
}

/// An appointment together with the names of the people it links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetail {
    pub appointment: Appointment,
    pub client_name: String,
    pub technician_name: String,
}

/// What had to be repaired while rebuilding a manager from stored records.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Clients whose id the allocator can't move past.
    pub skipped_clients: Vec<(ClientId, String)>,
    /// Technicians whose id the allocator can't move past.
    pub skipped_technicians: Vec<(TechnicianId, String)>,
    /// Appointments that could not be restored, with the reason.
    pub skipped_appointments: Vec<(AppointmentId, String)>,
    /// Availability entries dropped because an appointment already holds them.
    pub closed_slots: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.closed_slots == 0
    }

    /// How many stored records were dropped.
    pub fn skipped(&self) -> usize {
        self.skipped_clients.len()
            + self.skipped_technicians.len()
            + self.skipped_appointments.len()
    }
}

#[derive(Debug, Default)]
pub struct BookingManager {
    clients: BTreeMap<ClientId, Client>,
    technicians: BTreeMap<TechnicianId, Technician>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    counters: IdCounters,
}

impl BookingManager {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Clients ---

    pub fn register_client(&mut self, name: String, phone: String) -> Result<Client> {
        let id = self.counters.allocate_client()?;
        let client = Client { id, name, phone };
        debug!(client = %id, "registered client");
        self.clients.insert(id, client.clone());
        Ok(client)
    }

    /// Updates contact fields. The id never changes.
    pub fn update_client(
        &mut self,
        id: ClientId,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<Client> {
        let client = self
            .clients
            .get_mut(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Client, id))?;
        if let Some(name) = name {
            client.name = name;
        }
        if let Some(phone) = phone {
            client.phone = phone;
        }
        debug!(client = %id, "updated client contact");
        Ok(client.clone())
    }

    /// Removes a client that no appointment refers to.
    ///
    /// Appointments are kept forever, so a client with any booking history
    /// stays on file.
    pub fn remove_client(&mut self, id: ClientId) -> Result<Client> {
        if !self.clients.contains_key(&id) {
            return Err(SalonError::not_found(EntityKind::Client, id));
        }
        let references = self
            .appointments
            .values()
            .filter(|appt| appt.client == id)
            .count();
        if references > 0 {
            return Err(SalonError::invalid_state(
                id,
                format!("{} appointment(s) still reference this client", references),
            ));
        }
        let client = self
            .clients
            .remove(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Client, id))?;
        debug!(client = %id, "removed client");
        Ok(client)
    }

    // --- Technicians ---

    /// Registers a technician. Repeated entries in `availability` collapse
    /// into one open slot.
    pub fn register_technician(
        &mut self,
        name: String,
        availability: impl IntoIterator<Item = Slot>,
    ) -> Result<Technician> {
        let id = self.counters.allocate_technician()?;
        let mut technician = Technician::new(id, name);
        for slot in availability {
            technician.open(slot);
        }
        debug!(technician = %id, "registered technician");
        self.technicians.insert(id, technician.clone());
        Ok(technician)
    }

    pub fn add_slot(&mut self, technician: TechnicianId, slot: Slot) -> Result<()> {
        let tech = self
            .technicians
            .get_mut(&technician)
            .ok_or_else(|| SalonError::not_found(EntityKind::Technician, technician))?;
        if let Some(holder) = tech.booking_at(&slot) {
            return Err(SalonError::conflict(
                technician,
                slot,
                format!("already taken by {}", holder),
            ));
        }
        if !tech.open(slot) {
            return Err(SalonError::conflict(technician, slot, "slot is already open"));
        }
        debug!(technician = %technician, %slot, "opened slot");
        Ok(())
    }

    pub fn remove_slot(&mut self, technician: TechnicianId, slot: Slot) -> Result<()> {
        let tech = self
            .technicians
            .get_mut(&technician)
            .ok_or_else(|| SalonError::not_found(EntityKind::Technician, technician))?;
        if let Some(holder) = tech.booking_at(&slot) {
            return Err(SalonError::conflict(
                technician,
                slot,
                format!("taken by {}, cancel it instead", holder),
            ));
        }
        if !tech.close(&slot) {
            return Err(SalonError::conflict(technician, slot, "slot is not open"));
        }
        debug!(technician = %technician, %slot, "closed slot");
        Ok(())
    }

    // --- Appointments ---

    /// Books `slot` with `technician` for `client`.
    ///
    /// Only an exact match against the technician's open slots is accepted.
    pub fn book_appointment(
        &mut self,
        client: ClientId,
        technician: TechnicianId,
        slot: Slot,
        service: String,
        price: Price,
    ) -> Result<Appointment> {
        if !self.clients.contains_key(&client) {
            return Err(SalonError::not_found(EntityKind::Client, client));
        }
        let tech = self
            .technicians
            .get_mut(&technician)
            .ok_or_else(|| SalonError::not_found(EntityKind::Technician, technician))?;
        if !tech.is_open(&slot) {
            let reason = match tech.booking_at(&slot) {
                Some(holder) => format!("already booked ({})", holder),
                None => "slot is not open".to_string(),
            };
            return Err(SalonError::conflict(technician, slot, reason));
        }

        let id = self.counters.allocate_appointment()?;
        tech.close(&slot);
        tech.book(slot, id);

        let appointment = Appointment {
            id,
            slot,
            client,
            technician,
            service,
            price,
            status: AppointmentStatus::Scheduled,
            booked_at: Utc::now(),
            closed_at: None,
        };
        debug!(appointment = %id, client = %client, technician = %technician, %slot, "booked");
        self.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    /// Cancels a scheduled appointment and re-opens its slot.
    pub fn cancel_appointment(&mut self, id: AppointmentId) -> Result<Appointment> {
        let appointment = self
            .appointments
            .get_mut(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Appointment, id))?;
        ensure_scheduled(appointment, "cancel")?;
        let tech = self
            .technicians
            .get_mut(&appointment.technician)
            .ok_or_else(|| SalonError::not_found(EntityKind::Technician, appointment.technician))?;

        tech.release(&appointment.slot);
        tech.open(appointment.slot);
        appointment.status = AppointmentStatus::Cancelled;
        appointment.closed_at = Some(Utc::now());
        debug!(appointment = %id, slot = %appointment.slot, "cancelled, slot re-opened");
        Ok(appointment.clone())
    }

    /// Marks a scheduled appointment as done. Its slot is not re-offered.
    pub fn complete_appointment(&mut self, id: AppointmentId) -> Result<Appointment> {
        let appointment = self
            .appointments
            .get_mut(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Appointment, id))?;
        ensure_scheduled(appointment, "complete")?;

        appointment.status = AppointmentStatus::Completed;
        appointment.closed_at = Some(Utc::now());
        debug!(appointment = %id, "completed");
        Ok(appointment.clone())
    }

    // --- Queries ---

    pub fn client(&self, id: ClientId) -> Result<&Client> {
        self.clients
            .get(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Client, id))
    }

    pub fn technician(&self, id: TechnicianId) -> Result<&Technician> {
        self.technicians
            .get(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Technician, id))
    }

    pub fn appointment(&self, id: AppointmentId) -> Result<&Appointment> {
        self.appointments
            .get(&id)
            .ok_or_else(|| SalonError::not_found(EntityKind::Appointment, id))
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn technicians(&self) -> impl Iterator<Item = &Technician> {
        self.technicians.values()
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.technicians.is_empty() && self.appointments.is_empty()
    }

    /// Every open slot on `date`, by technician then time.
    pub fn open_slots(&self, date: NaiveDate) -> Vec<OpenSlot> {
        self.technicians
            .values()
            .flat_map(|tech| {
                tech.open_on(date).map(move |time| OpenSlot {
                    technician: tech.id,
                    slot: Slot::new(date, time),
                })
            })
            .collect()
    }

    pub fn appointments_for_client(&self, id: ClientId) -> Result<Vec<&Appointment>> {
        self.client(id)?;
        Ok(self.sorted_appointments(|appt| appt.client == id))
    }

    pub fn appointments_for_technician(&self, id: TechnicianId) -> Result<Vec<&Appointment>> {
        self.technician(id)?;
        Ok(self.sorted_appointments(|appt| appt.technician == id))
    }

    fn sorted_appointments<F>(&self, keep: F) -> Vec<&Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut found: Vec<&Appointment> =
            self.appointments.values().filter(|appt| keep(*appt)).collect();
        found.sort_by_key(|appt| (appt.slot, appt.id));
        found
    }

    pub fn detail(&self, appointment: &Appointment) -> AppointmentDetail {
        let client_name = self
            .clients
            .get(&appointment.client)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| appointment.client.to_string());
        let technician_name = self
            .technicians
            .get(&appointment.technician)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| appointment.technician.to_string());
        AppointmentDetail {
            appointment: appointment.clone(),
            client_name,
            technician_name,
        }
    }

    // --- Persistence boundary ---

    /// Rebuilds a manager from stored records.
    ///
    /// Schedules are derived from the appointments rather than trusted from
    /// disk. Records that would break an invariant are dropped and listed in
    /// the returned [`LoadReport`].
    pub fn from_records(records: Records) -> (Self, LoadReport) {
        let mut manager = BookingManager {
            counters: records.counters,
            ..Default::default()
        };
        let mut report = LoadReport::default();

        for client in records.clients {
            if !manager.counters.observe_client(client.id) {
                warn!(client = %client.id, "skipping stored client, id out of range");
                report
                    .skipped_clients
                    .push((client.id, OUT_OF_RANGE.to_string()));
                continue;
            }
            manager.clients.insert(client.id, client);
        }
        for mut tech in records.technicians {
            if !manager.counters.observe_technician(tech.id) {
                warn!(technician = %tech.id, "skipping stored technician, id out of range");
                report
                    .skipped_technicians
                    .push((tech.id, OUT_OF_RANGE.to_string()));
                continue;
            }
            tech.clear_schedule();
            manager.technicians.insert(tech.id, tech);
        }

        let mut appointments = records.appointments;
        appointments.sort_by_key(|appt| appt.id);
        for appt in appointments {
            // Skipped ids are still burned so they are never handed out again
            let restored = if manager.counters.observe_appointment(appt.id) {
                manager.restore_appointment(&appt, &mut report)
            } else {
                Err(OUT_OF_RANGE.to_string())
            };
            if let Err(reason) = restored {
                warn!(appointment = %appt.id, %reason, "skipping stored appointment");
                report.skipped_appointments.push((appt.id, reason));
                continue;
            }
            manager.appointments.insert(appt.id, appt);
        }

        (manager, report)
    }

    fn restore_appointment(
        &mut self,
        appt: &Appointment,
        report: &mut LoadReport,
    ) -> std::result::Result<(), String> {
        if self.appointments.contains_key(&appt.id) {
            return Err("duplicate appointment id".to_string());
        }
        if !self.clients.contains_key(&appt.client) {
            return Err(format!("unknown client {}", appt.client));
        }
        let tech = self
            .technicians
            .get_mut(&appt.technician)
            .ok_or_else(|| format!("unknown technician {}", appt.technician))?;
        if !appt.holds_slot() {
            return Ok(());
        }
        if let Some(holder) = tech.booking_at(&appt.slot) {
            return Err(format!("{} is already held by {}", appt.slot, holder));
        }
        if tech.close(&appt.slot) {
            warn!(technician = %tech.id, slot = %appt.slot, "closing slot held by a stored appointment");
            report.closed_slots += 1;
        }
        tech.book(appt.slot, appt.id);
        Ok(())
    }

    pub fn to_records(&self) -> Records {
        Records {
            counters: self.counters,
            clients: self.clients.values().cloned().collect(),
            technicians: self.technicians.values().cloned().collect(),
            appointments: self.appointments.values().cloned().collect(),
        }
    }

    /// Lists every broken invariant. An empty list means the state is sound.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for tech in self.technicians.values() {
            for (slot, holder) in tech.scheduled_slots() {
                if tech.is_open(&slot) {
                    problems.push(format!(
                        "{}: {} is both open and held by {}",
                        tech.id, slot, holder
                    ));
                }
                match self.appointments.get(&holder) {
                    None => problems.push(format!(
                        "{}: {} is held by missing appointment {}",
                        tech.id, slot, holder
                    )),
                    Some(appt)
                        if appt.technician != tech.id
                            || appt.slot != slot
                            || !appt.holds_slot() =>
                    {
                        problems.push(format!(
                            "{}: {} does not match appointment {}",
                            tech.id, slot, holder
                        ))
                    }
                    Some(_) => {}
                }
            }
        }

        for appt in self.appointments.values() {
            if !self.clients.contains_key(&appt.client) {
                problems.push(format!("{}: unknown client {}", appt.id, appt.client));
            }
            match self.technicians.get(&appt.technician) {
                None => problems.push(format!(
                    "{}: unknown technician {}",
                    appt.id, appt.technician
                )),
                Some(tech) if appt.holds_slot() && tech.booking_at(&appt.slot) != Some(appt.id) => {
                    problems.push(format!(
                        "{}: missing from {}'s schedule at {}",
                        appt.id, tech.id, appt.slot
                    ))
                }
                Some(_) => {}
            }
            if appt.id.value() >= self.counters.next_appointment {
                problems.push(format!("{}: id is ahead of the allocator", appt.id));
            }
        }

        problems
    }
}

fn ensure_scheduled(appointment: &Appointment, action: &str) -> Result<()> {
    if appointment.is_scheduled() {
        return Ok(());
    }
    Err(SalonError::invalid_state(
        appointment.id,
        format!(
            "cannot {} an appointment that is {}",
            action,
            appointment.status.to_string().to_lowercase()
        ),
    ))
}
