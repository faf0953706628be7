use super::{require_text, CmdMessage, CmdResult};
use crate::config::SalonConfig;
use crate::error::{EntityKind, Result, SalonError};
use crate::model::Price;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    SetService { name: String, price: Price },
    RemoveService(String),
}

/// Applies `action` to `config`, saving it into `config_dir` when it changed.
pub fn run(config_dir: &Path, config: &mut SalonConfig, action: ConfigAction) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {}
        ConfigAction::SetService { name, price } => {
            let name = require_text("Service name", &name)?;
            config.set_service(&name, price);
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!(
                "Service '{}' set to {}",
                name, price
            )));
        }
        ConfigAction::RemoveService(name) => {
            let removed = config
                .remove_service(&name)
                .ok_or_else(|| SalonError::not_found(EntityKind::Service, &name))?;
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!(
                "Service '{}' removed",
                removed.name
            )));
        }
    }

    Ok(result.with_config(config.clone()))
}
