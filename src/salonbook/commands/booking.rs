use super::{require_text, CmdMessage, CmdResult, SlotListing};
use crate::config::SalonConfig;
use crate::error::{Result, SalonError};
use crate::ids::{AppointmentId, ClientId, TechnicianId};
use crate::manager::BookingManager;
use crate::model::{AppointmentStatus, Price, Slot};
use chrono::NaiveDate;

/// A booking as the user asked for it, before the catalogue is consulted.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub client: ClientId,
    pub technician: TechnicianId,
    pub slot: Slot,
    pub service: String,
    /// Overrides the catalogue price. Required for unlisted services.
    pub price: Option<Price>,
}

/// Narrows an appointment listing. Empty filter lists everything.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub client: Option<ClientId>,
    pub technician: Option<TechnicianId>,
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
}

pub fn book(
    manager: &mut BookingManager,
    config: &SalonConfig,
    request: BookingRequest,
) -> Result<CmdResult> {
    let requested = require_text("Service", &request.service)?;
    let (service, price) = match (config.find_service(&requested), request.price) {
        (Some(offer), Some(price)) => (offer.name.clone(), price),
        (Some(offer), None) => (offer.name.clone(), offer.price),
        (None, Some(price)) => (requested, price),
        (None, None) => {
            return Err(SalonError::InvalidInput(format!(
                "'{}' is not on the service menu, give a price for it",
                requested
            )))
        }
    };

    let appointment = manager.book_appointment(
        request.client,
        request.technician,
        request.slot,
        service,
        price,
    )?;
    let detail = manager.detail(&appointment);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Booked {}: {} with {} on {} ({})",
        appointment.id, appointment.service, detail.technician_name, appointment.slot, appointment.price
    )));
    Ok(result.with_appointments(vec![detail]))
}

/// Cancels each appointment, re-opening its slot. Nothing changes unless every
/// id is a scheduled appointment.
pub fn cancel(manager: &mut BookingManager, ids: &[AppointmentId]) -> Result<CmdResult> {
    transition_all(manager, ids, Transition::Cancel)
}

/// Completes each appointment. Nothing changes unless every id is a scheduled
/// appointment.
pub fn complete(manager: &mut BookingManager, ids: &[AppointmentId]) -> Result<CmdResult> {
    transition_all(manager, ids, Transition::Complete)
}

#[derive(Clone, Copy)]
enum Transition {
    Cancel,
    Complete,
}

fn transition_all(
    manager: &mut BookingManager,
    ids: &[AppointmentId],
    transition: Transition,
) -> Result<CmdResult> {
    if ids.is_empty() {
        return Err(SalonError::InvalidInput("no appointments given".into()));
    }
    let mut unique = ids.to_vec();
    unique.sort();
    unique.dedup();

    for id in &unique {
        let appointment = manager.appointment(*id)?;
        if !appointment.is_scheduled() {
            return Err(SalonError::invalid_state(
                id,
                format!("appointment is already {}", appointment.status.to_string().to_lowercase()),
            ));
        }
    }

    let mut result = CmdResult::default();
    let mut details = Vec::with_capacity(unique.len());
    for id in unique {
        let appointment = match transition {
            Transition::Cancel => manager.cancel_appointment(id)?,
            Transition::Complete => manager.complete_appointment(id)?,
        };
        let detail = manager.detail(&appointment);
        let message = match transition {
            Transition::Cancel => format!(
                "Appointment {} cancelled. {}'s slot on {} is open again.",
                id, detail.technician_name, appointment.slot
            ),
            Transition::Complete => format!("Appointment {} completed.", id),
        };
        result.add_message(CmdMessage::success(message));
        details.push(detail);
    }
    Ok(result.with_appointments(details))
}

pub fn open_slots(manager: &BookingManager, date: NaiveDate) -> Result<CmdResult> {
    let listings: Vec<SlotListing> = manager
        .open_slots(date)
        .into_iter()
        .map(|open| SlotListing {
            technician: open.technician,
            technician_name: manager
                .technician(open.technician)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            slot: open.slot,
        })
        .collect();

    let mut result = CmdResult::default();
    if listings.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No open slots on {}.",
            date.format(crate::model::DATE_FORMAT)
        )));
    }
    Ok(result.with_open_slots(listings))
}

pub fn list(manager: &BookingManager, filter: &AppointmentFilter) -> Result<CmdResult> {
    if let Some(client) = filter.client {
        manager.client(client)?;
    }
    if let Some(technician) = filter.technician {
        manager.technician(technician)?;
    }

    let mut found: Vec<_> = manager
        .appointments()
        .filter(|appt| filter.client.map_or(true, |c| appt.client == c))
        .filter(|appt| filter.technician.map_or(true, |t| appt.technician == t))
        .filter(|appt| filter.status.map_or(true, |s| appt.status == s))
        .filter(|appt| filter.date.map_or(true, |d| appt.slot.date == d))
        .collect();
    found.sort_by_key(|appt| (appt.slot, appt.id));

    let details: Vec<_> = found.into_iter().map(|appt| manager.detail(appt)).collect();
    let mut result = CmdResult::default();
    if details.is_empty() {
        result.add_message(CmdMessage::info("No appointments found."));
    }
    Ok(result.with_appointments(details))
}
