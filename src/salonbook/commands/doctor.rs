use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::manager::{BookingManager, LoadReport};

/// Reports what loading had to repair and re-checks every invariant.
///
/// Returns whether the repaired state should be saved.
pub fn run(manager: &BookingManager, report: &LoadReport) -> Result<(CmdResult, bool)> {
    let mut result = CmdResult::default();

    for (id, reason) in &report.skipped_clients {
        result.add_message(CmdMessage::warning(format!("Dropped client {}: {}", id, reason)));
    }
    for (id, reason) in &report.skipped_technicians {
        result.add_message(CmdMessage::warning(format!(
            "Dropped technician {}: {}",
            id, reason
        )));
    }
    for (id, reason) in &report.skipped_appointments {
        result.add_message(CmdMessage::warning(format!(
            "Dropped appointment {}: {}",
            id, reason
        )));
    }
    if report.closed_slots > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Closed {} open slot(s) already held by appointments",
            report.closed_slots
        )));
    }

    let problems = manager.check_invariants();
    for problem in &problems {
        result.add_message(CmdMessage::error(problem.clone()));
    }

    if report.is_clean() && problems.is_empty() {
        result.add_message(CmdMessage::success("No problems found."));
    } else if problems.is_empty() {
        result.add_message(CmdMessage::success("Repairs will be saved."));
    }

    Ok((result, !report.is_clean()))
}
