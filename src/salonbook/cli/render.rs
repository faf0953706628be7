//! Terminal output for `CmdResult` values.
//!
//! Each `render_*` function builds a plain string so it can be tested without a
//! terminal; `print_*` adds color and writes to stdout.

use chrono::{DateTime, Utc};
use colored::Colorize;
use salonbook::api::{CmdMessage, CmdResult, MessageLevel, SlotListing};
use salonbook::config::SalonConfig;
use salonbook::manager::AppointmentDetail;
use salonbook::model::{AppointmentStatus, Client, Technician, DATE_FORMAT, TIME_FORMAT};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 20;
const SERVICE_WIDTH: usize = 16;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Prints every non-empty part of a result, messages last.
pub fn print_result(result: &CmdResult) {
    if !result.clients.is_empty() {
        print!("{}", render_clients(&result.clients));
    }
    if !result.technicians.is_empty() {
        print!("{}", render_technicians(&result.technicians));
    }
    if !result.open_slots.is_empty() {
        print!("{}", render_open_slots(&result.open_slots));
    }
    for line in render_appointments(&result.appointments).lines() {
        println!("{}", colorize_status(line));
    }
    if let Some(config) = &result.config {
        print!("{}", render_config(config));
    }
    print_messages(&result.messages);
}

fn colorize_status(line: &str) -> String {
    if line.ends_with(&AppointmentStatus::Cancelled.to_string()) {
        line.dimmed().to_string()
    } else if line.ends_with(&AppointmentStatus::Completed.to_string()) {
        line.green().to_string()
    } else {
        line.to_string()
    }
}

pub fn render_clients(clients: &[Client]) -> String {
    let mut out = String::new();
    for client in clients {
        out.push_str(&format!(
            "  {:<6} {} {}\n",
            client.id.to_string(),
            pad_to_width(&client.name, NAME_WIDTH),
            client.phone
        ));
    }
    out
}

/// One line per technician, then their open slots grouped by date.
pub fn render_technicians(technicians: &[Technician]) -> String {
    let mut out = String::new();
    for tech in technicians {
        let booked = tech.scheduled_slots().count();
        out.push_str(&format!(
            "  {:<6} {} {} booked\n",
            tech.id.to_string(),
            pad_to_width(&tech.name, NAME_WIDTH),
            booked
        ));

        let mut current = None;
        let mut times: Vec<String> = Vec::new();
        for slot in tech.open_slots() {
            if current != Some(slot.date) {
                if let Some(date) = current {
                    out.push_str(&date_line(date, &times));
                }
                current = Some(slot.date);
                times.clear();
            }
            times.push(slot.time.format(TIME_FORMAT).to_string());
        }
        if let Some(date) = current {
            out.push_str(&date_line(date, &times));
        }
    }
    out
}

fn date_line(date: chrono::NaiveDate, times: &[String]) -> String {
    format!("         {}: {}\n", date.format(DATE_FORMAT), times.join(", "))
}

pub fn render_open_slots(slots: &[SlotListing]) -> String {
    let mut out = String::new();
    for listing in slots {
        out.push_str(&format!(
            "  {}  {} ({})\n",
            listing.slot.time.format(TIME_FORMAT),
            listing.technician_name,
            listing.technician
        ));
    }
    out
}

pub fn render_appointments(appointments: &[AppointmentDetail]) -> String {
    let mut out = String::new();
    for detail in appointments {
        let appt = &detail.appointment;
        out.push_str(&format!(
            "  {:<6} {}  {} {} {} {:>8}  {:>14}  {}\n",
            appt.id.to_string(),
            appt.slot,
            pad_to_width(&detail.client_name, NAME_WIDTH),
            pad_to_width(&detail.technician_name, NAME_WIDTH),
            pad_to_width(&appt.service, SERVICE_WIDTH),
            appt.price.to_string(),
            format_time_ago(appt.booked_at),
            appt.status
        ));
    }
    out
}

pub fn render_config(config: &SalonConfig) -> String {
    let mut out = String::from("Services:\n");
    if config.services.is_empty() {
        out.push_str("  (none)\n");
    }
    for offer in &config.services {
        out.push_str(&format!(
            "  {} {:>8}\n",
            pad_to_width(&offer.name, NAME_WIDTH),
            offer.price.to_string()
        ));
    }
    out
}

/// Truncates or pads `s` so it occupies exactly `width` terminal columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > width.saturating_sub(1) && s.width() > width {
            result.push('…');
            current += 1;
            break;
        }
        result.push(c);
        current += w;
    }
    result.push_str(&" ".repeat(width.saturating_sub(current)));
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salonbook::ids::{ClientId, TechnicianId};
    use salonbook::manager::BookingManager;
    use salonbook::model::{Price, Slot};

    fn slot(date: &str, time: &str) -> Slot {
        Slot::parse(date, time).unwrap()
    }

    #[test]
    fn pad_to_width_pads_and_truncates() {
        assert_eq!(pad_to_width("Ann", 6), "Ann   ");
        assert_eq!(pad_to_width("Alexandria", 6), "Alexa…");
        assert_eq!(pad_to_width("Zoë", 4).width(), 4);
    }

    #[test]
    fn clients_render_one_per_line() {
        let clients = vec![Client {
            id: ClientId(101),
            name: "Cathy Smith".into(),
            phone: "555-1234".into(),
        }];
        let out = render_clients(&clients);
        assert!(out.contains("C101"));
        assert!(out.contains("555-1234"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn technicians_group_open_slots_by_date() {
        let mut manager = BookingManager::new();
        let tech = manager.register_technician(
            "Alice".into(),
            [
                slot("2025-11-21", "10:00"),
                slot("2025-11-21", "11:00"),
                slot("2025-11-22", "09:00"),
            ],
        )
        .unwrap();
        let out = render_technicians(&[tech]);
        assert!(out.contains("T201"));
        assert!(out.contains("2025-11-21: 10:00, 11:00"));
        assert!(out.contains("2025-11-22: 09:00"));
    }

    #[test]
    fn appointments_show_names_and_status() {
        let mut manager = BookingManager::new();
        let client = manager.register_client("Cathy".into(), "1".into()).unwrap();
        let s = slot("2025-11-21", "10:00");
        let tech = manager.register_technician("Alice".into(), [s]).unwrap();
        let appt = manager
            .book_appointment(client.id, tech.id, s, "Manicure".into(), Price::dollars(45))
            .unwrap();
        let out = render_appointments(&[manager.detail(&appt)]);
        assert!(out.contains("A3001"));
        assert!(out.contains("2025-11-21 10:00"));
        assert!(out.contains("Cathy"));
        assert!(out.contains("$45.00"));
        assert!(out.trim_end().ends_with(&AppointmentStatus::Scheduled.to_string()));
    }

    #[test]
    fn open_slots_show_technician() {
        let listings = vec![SlotListing {
            technician: TechnicianId(201),
            technician_name: "Alice".into(),
            slot: slot("2025-11-21", "10:00"),
        }];
        assert_eq!(render_open_slots(&listings), "  10:00  Alice (T201)\n");
    }

    #[test]
    fn config_lists_services() {
        let out = render_config(&SalonConfig::default());
        assert!(out.contains("Gel Pedicure"));
        assert!(out.contains("$55.00"));
    }
}
