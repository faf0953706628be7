use super::{CmdMessage, CmdResult};
use crate::config::SalonConfig;
use crate::error::Result;
use crate::manager::BookingManager;
use crate::model::{parse_time, Slot};
use chrono::NaiveDate;
use std::path::Path;

const DEMO_TECHNICIANS: &[(&str, &[&str])] = &[
    ("Alice", &["10:00", "11:00", "15:00"]),
    ("Bob", &["14:00", "16:00"]),
];
const DEMO_CLIENT: (&str, &str) = ("Cathy Smith", "555-1234");

/// Writes the default configuration and, with `demo`, seeds an empty salon
/// with two technicians open on `demo_date` and one client.
///
/// Returns whether the manager was changed.
pub fn run(
    config_dir: &Path,
    manager: &mut BookingManager,
    demo: bool,
    demo_date: NaiveDate,
) -> Result<(CmdResult, bool)> {
    let mut result = CmdResult::default();

    if SalonConfig::exists(config_dir) {
        result.add_message(CmdMessage::info(format!(
            "Configuration already present in {}",
            config_dir.display()
        )));
    } else {
        SalonConfig::default().save(config_dir)?;
        result.add_message(CmdMessage::success(format!(
            "Initialized salon in {}",
            config_dir.display()
        )));
    }

    if !demo {
        return Ok((result, false));
    }
    if !manager.is_empty() {
        result.add_message(CmdMessage::warning(
            "Salon already has records, demo data not added.",
        ));
        return Ok((result, false));
    }

    for (name, times) in DEMO_TECHNICIANS {
        let slots = times
            .iter()
            .map(|time| parse_time(time).map(|t| Slot::new(demo_date, t)))
            .collect::<Result<Vec<_>>>()?;
        let tech = manager.register_technician(name.to_string(), slots)?;
        result.add_message(CmdMessage::success(format!(
            "Added technician {} ({})",
            tech.name, tech.id
        )));
    }
    let client = manager.register_client(DEMO_CLIENT.0.to_string(), DEMO_CLIENT.1.to_string())?;
    result.add_message(CmdMessage::success(format!(
        "Added client {} ({})",
        client.name, client.id
    )));

    Ok((result, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 21).unwrap()
    }

    #[test]
    fn writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = BookingManager::new();

        let (_, changed) = run(dir.path(), &mut manager, false, date()).unwrap();
        assert!(!changed);
        assert!(SalonConfig::exists(dir.path()));

        let (result, _) = run(dir.path(), &mut manager, false, date()).unwrap();
        assert!(result.messages[0].content.contains("already present"));
    }

    #[test]
    fn demo_seeds_empty_salon() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = BookingManager::new();

        let (_, changed) = run(dir.path(), &mut manager, true, date()).unwrap();
        assert!(changed);
        assert_eq!(manager.technicians().count(), 2);
        assert_eq!(manager.clients().count(), 1);
        assert_eq!(manager.open_slots(date()).len(), 5);
    }

    #[test]
    fn demo_skips_populated_salon() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = BookingManager::new();
        manager.register_client("Someone".into(), "1".into()).unwrap();

        let (_, changed) = run(dir.path(), &mut manager, true, date()).unwrap();
        assert!(!changed);
        assert_eq!(manager.technicians().count(), 0);
    }
}
