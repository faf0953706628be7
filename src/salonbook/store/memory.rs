use super::{BookingStore, Records};
use crate::error::Result;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    records: Records,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Records) -> Self {
        Self { records, saves: 0 }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn records(&self) -> &Records {
        &self.records
    }
}

impl BookingStore for InMemoryStore {
    fn load(&self) -> Result<Records> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        self.records = records.clone();
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::manager::BookingManager;
    use crate::model::Slot;

    pub struct StoreFixture {
        manager: BookingManager,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                manager: BookingManager::new(),
            }
        }

        pub fn with_client(mut self, name: &str, phone: &str) -> Self {
            self.manager
                .register_client(name.to_string(), phone.to_string())
                .unwrap();
            self
        }

        /// Adds a technician open at each `(date, time)` pair.
        pub fn with_technician(mut self, name: &str, slots: &[(&str, &str)]) -> Self {
            let slots = slots
                .iter()
                .map(|(date, time)| Slot::parse(date, time).unwrap());
            self.manager
                .register_technician(name.to_string(), slots)
                .unwrap();
            self
        }

        pub fn build(self) -> InMemoryStore {
            InMemoryStore::with_records(self.manager.to_records())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn save_replaces_records_and_counts() {
        let mut store = InMemoryStore::new();
        let records = StoreFixture::new().with_client("Cathy", "1").build().load().unwrap();

        store.save(&records).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().clients.len(), 1);
    }

    #[test]
    fn fixture_builds_technicians_with_slots() {
        let store = StoreFixture::new()
            .with_technician("Alice", &[("2025-11-21", "10:00"), ("2025-11-21", "11:00")])
            .build();
        let records = store.records();
        assert_eq!(records.technicians.len(), 1);
        assert_eq!(records.technicians[0].open_slots().count(), 2);
    }
}
