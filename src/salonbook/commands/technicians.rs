use super::{require_text, CmdMessage, CmdResult};
use crate::error::{Result, SalonError};
use crate::ids::TechnicianId;
use crate::manager::BookingManager;
use crate::model::Slot;
use std::collections::BTreeSet;
use tracing::warn;

pub fn register(manager: &mut BookingManager, name: &str, slots: &[Slot]) -> Result<CmdResult> {
    let name = require_text("Name", name)?;
    let technician = manager.register_technician(name, slots.iter().copied())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Technician registered: {} ({}) with {} open slot(s)",
        technician.name,
        technician.id,
        technician.open_slots().count()
    )));
    Ok(result.with_technicians(vec![technician]))
}

/// Opens every slot or none of them.
pub fn open(
    manager: &mut BookingManager,
    technician: TechnicianId,
    slots: &[Slot],
) -> Result<CmdResult> {
    apply_all(manager, technician, slots, SlotChange::Open)
}

/// Closes every slot or none of them.
pub fn close(
    manager: &mut BookingManager,
    technician: TechnicianId,
    slots: &[Slot],
) -> Result<CmdResult> {
    apply_all(manager, technician, slots, SlotChange::Close)
}

#[derive(Clone, Copy)]
enum SlotChange {
    Open,
    Close,
}

impl SlotChange {
    fn apply(self, manager: &mut BookingManager, technician: TechnicianId, slot: Slot) -> Result<()> {
        match self {
            SlotChange::Open => manager.add_slot(technician, slot),
            SlotChange::Close => manager.remove_slot(technician, slot),
        }
    }

    fn undo(self, manager: &mut BookingManager, technician: TechnicianId, slot: Slot) -> Result<()> {
        match self {
            SlotChange::Open => manager.remove_slot(technician, slot),
            SlotChange::Close => manager.add_slot(technician, slot),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            SlotChange::Open => "opened",
            SlotChange::Close => "closed",
        }
    }
}

fn apply_all(
    manager: &mut BookingManager,
    technician: TechnicianId,
    slots: &[Slot],
    change: SlotChange,
) -> Result<CmdResult> {
    if slots.is_empty() {
        return Err(SalonError::InvalidInput("no slots given".into()));
    }
    let name = manager.technician(technician)?.name.clone();
    let slots: BTreeSet<Slot> = slots.iter().copied().collect();

    let mut applied = Vec::with_capacity(slots.len());
    for slot in &slots {
        if let Err(e) = change.apply(manager, technician, *slot) {
            for done in applied.iter().rev() {
                if let Err(undo_err) = change.undo(manager, technician, *done) {
                    warn!(
                        technician = %technician,
                        slot = %done,
                        error = %undo_err,
                        "could not roll back slot change"
                    );
                }
            }
            return Err(e);
        }
        applied.push(*slot);
    }

    let mut result = CmdResult::default();
    for slot in &applied {
        result.add_message(CmdMessage::success(format!(
            "Slot {} {} for {}.",
            slot,
            change.verb(),
            name
        )));
    }
    let technician = manager.technician(technician)?.clone();
    Ok(result.with_technicians(vec![technician]))
}

pub fn list(manager: &BookingManager) -> Result<CmdResult> {
    let technicians: Vec<_> = manager.technicians().cloned().collect();
    let mut result = CmdResult::default();
    if technicians.is_empty() {
        result.add_message(CmdMessage::info("No technicians registered yet."));
    }
    Ok(result.with_technicians(technicians))
}

/// A technician's open slots and every appointment they have held.
pub fn schedule(manager: &BookingManager, id: TechnicianId) -> Result<CmdResult> {
    let technician = manager.technician(id)?.clone();
    let appointments: Vec<_> = manager
        .appointments_for_technician(id)?
        .into_iter()
        .map(|appt| manager.detail(appt))
        .collect();

    let mut result = CmdResult::default();
    if !technician.has_open_slots() {
        result.add_message(CmdMessage::info("No availability set."));
    }
    if appointments.is_empty() {
        result.add_message(CmdMessage::info("No appointments booked."));
    }
    Ok(result
        .with_technicians(vec![technician])
        .with_appointments(appointments))
}
