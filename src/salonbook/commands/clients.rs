use super::{require_text, CmdMessage, CmdResult};
use crate::error::{Result, SalonError};
use crate::ids::ClientId;
use crate::manager::BookingManager;

pub fn register(manager: &mut BookingManager, name: &str, phone: &str) -> Result<CmdResult> {
    let name = require_text("Name", name)?;
    let phone = require_text("Phone", phone)?;

    let client = manager.register_client(name, phone)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client registered: {} ({})",
        client.name, client.id
    )));
    Ok(result.with_clients(vec![client]))
}

pub fn update(
    manager: &mut BookingManager,
    id: ClientId,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<CmdResult> {
    if name.is_none() && phone.is_none() {
        return Err(SalonError::InvalidInput(
            "nothing to update (give a name or a phone)".into(),
        ));
    }
    let name = name.map(|n| require_text("Name", n)).transpose()?;
    let phone = phone.map(|p| require_text("Phone", p)).transpose()?;

    let client = manager.update_client(id, name, phone)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client updated: {} ({})",
        client.name, client.id
    )));
    Ok(result.with_clients(vec![client]))
}

pub fn remove(manager: &mut BookingManager, id: ClientId) -> Result<CmdResult> {
    let client = manager.remove_client(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client removed: {} ({})",
        client.name, client.id
    )));
    Ok(result)
}

pub fn list(manager: &BookingManager) -> Result<CmdResult> {
    let clients: Vec<_> = manager.clients().cloned().collect();
    let mut result = CmdResult::default();
    if clients.is_empty() {
        result.add_message(CmdMessage::info("No clients registered yet."));
    }
    Ok(result.with_clients(clients))
}

/// A client with their full appointment history.
pub fn show(manager: &BookingManager, id: ClientId) -> Result<CmdResult> {
    let client = manager.client(id)?.clone();
    let appointments: Vec<_> = manager
        .appointments_for_client(id)?
        .into_iter()
        .map(|appt| manager.detail(appt))
        .collect();

    let mut result = CmdResult::default();
    if appointments.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} has no appointments booked.",
            client.name
        )));
    }
    Ok(result
        .with_clients(vec![client])
        .with_appointments(appointments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Price, Slot};

    #[test]
    fn register_trims_and_reports() {
        let mut manager = BookingManager::new();
        let result = register(&mut manager, "  Cathy Smith ", "555-1234").unwrap();
        assert_eq!(result.clients[0].name, "Cathy Smith");
        assert!(result.messages[0].content.contains("C101"));
    }

    #[test]
    fn register_rejects_blank_fields() {
        let mut manager = BookingManager::new();
        assert!(register(&mut manager, "", "555").is_err());
        assert!(register(&mut manager, "Cathy", " ").is_err());
        assert_eq!(manager.clients().count(), 0);
    }

    #[test]
    fn update_requires_a_field() {
        let mut manager = BookingManager::new();
        let id = manager.register_client("Cathy".into(), "1".into()).unwrap().id;
        assert!(update(&mut manager, id, None, None).is_err());

        let result = update(&mut manager, id, Some("Cat"), None).unwrap();
        assert_eq!(result.clients[0].name, "Cat");
        assert_eq!(result.clients[0].phone, "1");
    }

    #[test]
    fn show_lists_history() {
        let mut manager = BookingManager::new();
        let client = manager.register_client("Cathy".into(), "1".into()).unwrap();
        let slot = Slot::parse("2025-11-21", "10:00").unwrap();
        let tech = manager.register_technician("Alice".into(), [slot]).unwrap();
        manager
            .book_appointment(client.id, tech.id, slot, "Manicure".into(), Price::dollars(45))
            .unwrap();

        let result = show(&manager, client.id).unwrap();
        assert_eq!(result.appointments.len(), 1);
        assert_eq!(result.appointments[0].technician_name, "Alice");
        assert!(result.messages.is_empty());
    }

    #[test]
    fn list_empty_has_hint() {
        let manager = BookingManager::new();
        let result = list(&manager).unwrap();
        assert!(result.clients.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
