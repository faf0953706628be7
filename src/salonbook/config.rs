use crate::error::{Result, SalonError};
use crate::model::Price;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// A service on the salon's menu with its list price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceOffer {
    pub name: String,
    pub price: Price,
}

impl ServiceOffer {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Configuration for the salon, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalonConfig {
    /// Services offered, in menu order. Bookings may still name other services.
    #[serde(default = "default_services")]
    pub services: Vec<ServiceOffer>,
}

fn default_services() -> Vec<ServiceOffer> {
    vec![
        ServiceOffer::new("Manicure", Price::dollars(45)),
        ServiceOffer::new("Pedicure", Price::dollars(45)),
        ServiceOffer::new("Gel Manicure", Price::dollars(55)),
        ServiceOffer::new("Gel Pedicure", Price::dollars(55)),
    ]
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            services: default_services(),
        }
    }
}

impl SalonConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SalonError::Io)?;
        let config: SalonConfig =
            serde_json::from_str(&content).map_err(SalonError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SalonError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SalonError::Serialization)?;
        fs::write(config_path, content).map_err(SalonError::Io)?;
        Ok(())
    }

    pub fn exists<P: AsRef<Path>>(config_dir: P) -> bool {
        config_dir.as_ref().join(CONFIG_FILENAME).exists()
    }

    /// Case-insensitive lookup by service name.
    pub fn find_service(&self, name: &str) -> Option<&ServiceOffer> {
        let name = name.trim();
        self.services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Adds a service or updates the price of an existing one.
    pub fn set_service(&mut self, name: &str, price: Price) {
        let name = name.trim();
        match self
            .services
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.price = price,
            None => self.services.push(ServiceOffer::new(name, price)),
        }
    }

    /// Returns the removed service, if it was listed.
    pub fn remove_service(&mut self, name: &str) -> Option<ServiceOffer> {
        let name = name.trim();
        let position = self
            .services
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))?;
        Some(self.services.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue() {
        let config = SalonConfig::default();
        assert_eq!(config.services.len(), 4);
        assert_eq!(
            config.find_service("gel manicure").unwrap().price,
            Price::dollars(55)
        );
    }

    #[test]
    fn test_set_service_updates_in_place() {
        let mut config = SalonConfig::default();
        config.set_service("MANICURE", Price::dollars(50));
        assert_eq!(config.services.len(), 4);
        assert_eq!(config.services[0].name, "Manicure");
        assert_eq!(config.services[0].price, Price::dollars(50));
    }

    #[test]
    fn test_set_service_appends_new() {
        let mut config = SalonConfig::default();
        config.set_service(" Nail Art ", Price::from_cents(1250));
        assert_eq!(config.services.last().unwrap().name, "Nail Art");
    }

    #[test]
    fn test_remove_service() {
        let mut config = SalonConfig::default();
        assert!(config.remove_service("pedicure").is_some());
        assert!(config.remove_service("pedicure").is_none());
        assert!(config.find_service("Pedicure").is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SalonConfig::load(dir.path()).unwrap();
        assert_eq!(config, SalonConfig::default());
        assert!(!SalonConfig::exists(dir.path()));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("salon");

        let mut config = SalonConfig::default();
        config.set_service("Polish Change", Price::dollars(20));
        config.save(&config_dir).unwrap();

        let loaded = SalonConfig::load(&config_dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_services_key_uses_defaults() {
        let parsed: SalonConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, SalonConfig::default());
    }
}
