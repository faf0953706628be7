use chrono::NaiveDate;
use salonbook::api::{AppointmentQuery, SalonApi};
use salonbook::config::SalonConfig;
use salonbook::error::SalonError;
use salonbook::model::AppointmentStatus;
use salonbook::store::fs::FileStore;
use std::path::Path;

fn open(dir: &Path) -> SalonApi<FileStore> {
    let config = SalonConfig::load(dir).unwrap();
    SalonApi::open(FileStore::new(dir), config, dir.to_path_buf()).unwrap()
}

fn demo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 21).unwrap()
}

#[test]
fn sessions_share_state_through_the_data_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut api = open(dir.path());
    api.init(true, demo_date()).unwrap();
    let booked = api
        .book("C101", "T201", "2025-11-21", "10:00", "Manicure", None)
        .unwrap();
    assert_eq!(booked.appointments[0].appointment.id.to_string(), "A3001");
    assert!(api.flush().unwrap());

    let mut api = open(dir.path());
    assert!(api.load_report().is_clean());
    let slots = api.open_slots("2025-11-21").unwrap();
    let alice_times: Vec<_> = slots
        .open_slots
        .iter()
        .filter(|s| s.technician_name == "Alice")
        .map(|s| s.slot.time.to_string())
        .collect();
    assert_eq!(alice_times, vec!["11:00:00", "15:00:00"]);

    let err = api
        .book("C101", "T201", "2025-11-21", "10:00", "Pedicure", None)
        .unwrap_err();
    assert!(matches!(err, SalonError::Conflict { .. }));

    api.cancel(&["A3001"]).unwrap();
    api.flush().unwrap();

    let mut api = open(dir.path());
    let rebooked = api
        .book("C101", "T201", "2025-11-21", "10:00", "Pedicure", None)
        .unwrap();
    assert_eq!(rebooked.appointments[0].appointment.id.to_string(), "A3002");
    api.flush().unwrap();

    let api = open(dir.path());
    let cancelled = api
        .list_appointments(&AppointmentQuery {
            status: Some("cancelled".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(cancelled.appointments.len(), 1);
    assert_eq!(
        cancelled.appointments[0].appointment.status,
        AppointmentStatus::Cancelled
    );
    assert!(api.manager().check_invariants().is_empty());
}

#[test]
fn ids_survive_removal_and_reload() {
    let dir = tempfile::tempdir().unwrap();

    let mut api = open(dir.path());
    api.register_client("Dana", "555-0000").unwrap();
    api.remove_client("C101").unwrap();
    api.flush().unwrap();

    let mut api = open(dir.path());
    let result = api.register_client("Eve", "555-0001").unwrap();
    assert_eq!(result.clients[0].id.to_string(), "C102");
}

#[test]
fn catalogue_edits_apply_to_later_sessions() {
    let dir = tempfile::tempdir().unwrap();

    let mut api = open(dir.path());
    api.config(salonbook::api::ConfigAction::SetService {
        name: "Nail Art".into(),
        price: "12.50".parse().unwrap(),
    })
    .unwrap();
    api.register_client("Cathy", "1").unwrap();
    api.register_technician("Alice", &["2025-11-21 10:00"])
        .unwrap();
    api.flush().unwrap();

    let mut api = open(dir.path());
    let result = api
        .book("C101", "T201", "2025-11-21", "10:00", "nail art", None)
        .unwrap();
    assert_eq!(result.appointments[0].appointment.price.to_string(), "$12.50");
}

#[test]
fn corrupt_data_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("salon.json"), "{ not json").unwrap();

    let config = SalonConfig::default();
    let err = SalonApi::open(FileStore::new(dir.path()), config, dir.path().to_path_buf())
        .err()
        .unwrap();
    assert!(matches!(err, SalonError::Serialization(_)));
}
