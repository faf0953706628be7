use super::{BookingStore, Records};
use crate::error::{Result, SalonError};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_FILENAME: &str = "salon.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(SalonError::Io)?;
        }
        Ok(())
    }
}

impl BookingStore for FileStore {
    fn load(&self) -> Result<Records> {
        let data_file = self.data_file();
        if !data_file.exists() {
            debug!(path = %data_file.display(), "no data file, starting empty");
            return Ok(Records::default());
        }
        let content = fs::read_to_string(&data_file).map_err(SalonError::Io)?;
        if content.trim().is_empty() {
            return Ok(Records::default());
        }
        let records: Records =
            serde_json::from_str(&content).map_err(SalonError::Serialization)?;
        debug!(
            clients = records.clients.len(),
            technicians = records.technicians.len(),
            appointments = records.appointments.len(),
            "loaded records"
        );
        Ok(records)
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        self.ensure_dir()?;
        let data_file = self.data_file();
        let content = serde_json::to_string_pretty(records).map_err(SalonError::Serialization)?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp_file = data_file.with_extension("json.tmp");
        fs::write(&tmp_file, content).map_err(SalonError::Io)?;
        fs::rename(&tmp_file, &data_file).map_err(SalonError::Io)?;
        debug!(path = %data_file.display(), "saved records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::BookingManager;
    use crate::model::{Price, Slot};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), Records::default());
    }

    #[test]
    fn save_creates_directory_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("salon"));

        let mut manager = BookingManager::new();
        let client = manager.register_client("Cathy".into(), "555-1234".into()).unwrap();
        let slot = Slot::parse("2025-11-21", "10:00").unwrap();
        let tech = manager.register_technician("Alice".into(), [slot]).unwrap();
        let appt = manager
            .book_appointment(client.id, tech.id, slot, "Manicure".into(), Price::dollars(45))
            .unwrap();

        let records = manager.to_records();
        store.save(&records).unwrap();
        assert!(store.data_file().exists());
        assert!(!store.data_file().with_extension("json.tmp").exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, records);

        let (restored, report) = BookingManager::from_records(loaded);
        assert!(report.is_clean());
        assert!(restored.check_invariants().is_empty());
        assert_eq!(restored.technician(tech.id).unwrap().booking_at(&slot), Some(appt.id));
        assert!(!restored.technician(tech.id).unwrap().is_open(&slot));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.data_file(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, SalonError::Serialization(_)));
    }
}
