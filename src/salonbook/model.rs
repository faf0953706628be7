use crate::error::{Result, SalonError};
use crate::ids::{AppointmentId, ClientId, TechnicianId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| SalonError::InvalidInput(format!("invalid date '{}' (use YYYY-MM-DD)", s)))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| SalonError::InvalidInput(format!("invalid time '{}' (use HH:MM)", s)))
}

/// One bookable unit of a technician's calendar.
///
/// Slots order by date, then time, which is also the order every listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    pub fn parse(date: &str, time: &str) -> Result<Self> {
        Ok(Self::new(parse_date(date)?, parse_time(time)?))
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.format(DATE_FORMAT),
            self.time.format(TIME_FORMAT)
        )
    }
}

/// Parses `YYYY-MM-DD HH:MM`; a `T` separator is accepted as well.
impl FromStr for Slot {
    type Err = SalonError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.split_once([' ', 'T']) {
            Some((date, time)) => Slot::parse(date, time),
            None => Err(SalonError::InvalidInput(format!(
                "invalid slot '{}' (use YYYY-MM-DD HH:MM)",
                s
            ))),
        }
    }
}

/// An amount of money, kept in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    cents: u32,
}

impl Price {
    pub fn from_cents(cents: u32) -> Self {
        Self { cents }
    }

    pub fn dollars(dollars: u32) -> Self {
        Self {
            cents: dollars * 100,
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Price {
    type Err = SalonError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SalonError::InvalidInput(format!("invalid price '{}'", s));
        let trimmed = s.trim();
        let amount = trimmed.strip_prefix('$').unwrap_or(trimmed);

        let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let fraction: u32 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .map(Price::from_cents)
            .ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
}

/// A technician with their open and committed slots.
///
/// The two calendars are disjoint: a slot is either open for booking
/// (`availability`) or held by an appointment (`schedule`), never both. Only
/// the booking manager mutates them.
///
/// `schedule` is not persisted; it is rebuilt from the appointments on load.
/// Equality compares the persisted fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    #[serde(default)]
    availability: BTreeMap<NaiveDate, BTreeSet<NaiveTime>>,
    #[serde(skip)]
    schedule: BTreeMap<NaiveDate, BTreeMap<NaiveTime, AppointmentId>>,
}

impl PartialEq for Technician {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.availability == other.availability
    }
}

impl Eq for Technician {}

impl Technician {
    pub fn new(id: TechnicianId, name: String) -> Self {
        Self {
            id,
            name,
            availability: BTreeMap::new(),
            schedule: BTreeMap::new(),
        }
    }

    pub fn is_open(&self, slot: &Slot) -> bool {
        self.availability
            .get(&slot.date)
            .is_some_and(|times| times.contains(&slot.time))
    }

    /// The appointment holding `slot`, if any.
    pub fn booking_at(&self, slot: &Slot) -> Option<AppointmentId> {
        self.schedule
            .get(&slot.date)
            .and_then(|times| times.get(&slot.time))
            .copied()
    }

    pub fn open_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.availability
            .iter()
            .flat_map(|(date, times)| times.iter().map(move |time| Slot::new(*date, *time)))
    }

    pub fn open_on(&self, date: NaiveDate) -> impl Iterator<Item = NaiveTime> + '_ {
        self.availability
            .get(&date)
            .into_iter()
            .flat_map(|times| times.iter().copied())
    }

    pub fn scheduled_slots(&self) -> impl Iterator<Item = (Slot, AppointmentId)> + '_ {
        self.schedule.iter().flat_map(|(date, times)| {
            times
                .iter()
                .map(move |(time, appt)| (Slot::new(*date, *time), *appt))
        })
    }

    pub fn has_open_slots(&self) -> bool {
        !self.availability.is_empty()
    }

    pub(crate) fn open(&mut self, slot: Slot) -> bool {
        self.availability
            .entry(slot.date)
            .or_default()
            .insert(slot.time)
    }

    pub(crate) fn close(&mut self, slot: &Slot) -> bool {
        let Some(times) = self.availability.get_mut(&slot.date) else {
            return false;
        };
        let removed = times.remove(&slot.time);
        if times.is_empty() {
            self.availability.remove(&slot.date);
        }
        removed
    }

    pub(crate) fn book(&mut self, slot: Slot, appointment: AppointmentId) {
        self.schedule
            .entry(slot.date)
            .or_default()
            .insert(slot.time, appointment);
    }

    pub(crate) fn release(&mut self, slot: &Slot) -> Option<AppointmentId> {
        let times = self.schedule.get_mut(&slot.date)?;
        let released = times.remove(&slot.time);
        if times.is_empty() {
            self.schedule.remove(&slot.date);
        }
        released
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.schedule.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

impl FromStr for AppointmentStatus {
    type Err = SalonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" | "booked" => Ok(AppointmentStatus::Scheduled),
            "completed" | "done" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(SalonError::InvalidInput(format!(
                "unknown appointment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub slot: Slot,
    pub client: ClientId,
    pub technician: TechnicianId,
    pub service: String,
    pub price: Price,
    pub status: AppointmentStatus,
    pub booked_at: DateTime<Utc>,
    // Set when the appointment is completed or cancelled
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    /// Whether the appointment still occupies its technician's slot.
    pub fn holds_slot(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, time: &str) -> Slot {
        Slot::parse(date, time).unwrap()
    }

    #[test]
    fn slot_display_and_parse() {
        let s = slot("2024-06-01", "10:00");
        assert_eq!(s.to_string(), "2024-06-01 10:00");
        assert_eq!("2024-06-01 10:00".parse::<Slot>().unwrap(), s);
        assert_eq!("2024-06-01T10:00".parse::<Slot>().unwrap(), s);
    }

    #[test]
    fn slot_rejects_bad_input() {
        assert!(Slot::parse("2024-13-01", "10:00").is_err());
        assert!(Slot::parse("2024-06-01", "25:00").is_err());
        assert!("2024-06-01".parse::<Slot>().is_err());
    }

    #[test]
    fn slots_order_by_date_then_time() {
        let a = slot("2024-06-01", "15:00");
        let b = slot("2024-06-02", "09:00");
        let c = slot("2024-06-01", "09:00");
        let mut slots = vec![a, b, c];
        slots.sort();
        assert_eq!(slots, vec![c, a, b]);
    }

    #[test]
    fn price_parsing() {
        assert_eq!("45".parse::<Price>().unwrap(), Price::dollars(45));
        assert_eq!("$45.00".parse::<Price>().unwrap(), Price::dollars(45));
        assert_eq!("45.5".parse::<Price>().unwrap(), Price::from_cents(4550));
        assert_eq!("0.05".parse::<Price>().unwrap(), Price::from_cents(5));
        assert!("45.555".parse::<Price>().is_err());
        assert!("-3".parse::<Price>().is_err());
        assert!("".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn price_display() {
        assert_eq!(Price::dollars(30).to_string(), "$30.00");
        assert_eq!(Price::from_cents(4550).to_string(), "$45.50");
    }

    #[test]
    fn technician_open_and_close_prune_empty_dates() {
        let mut tech = Technician::new(TechnicianId(201), "Alice".into());
        let s = slot("2024-06-01", "10:00");
        assert!(tech.open(s));
        assert!(!tech.open(s));
        assert!(tech.is_open(&s));
        assert!(tech.close(&s));
        assert!(!tech.close(&s));
        assert!(!tech.has_open_slots());
    }

    #[test]
    fn technician_schedule_roundtrip() {
        let mut tech = Technician::new(TechnicianId(201), "Alice".into());
        let s = slot("2024-06-01", "10:00");
        tech.book(s, AppointmentId(3001));
        assert_eq!(tech.booking_at(&s), Some(AppointmentId(3001)));
        assert_eq!(tech.release(&s), Some(AppointmentId(3001)));
        assert_eq!(tech.booking_at(&s), None);
        assert_eq!(tech.scheduled_slots().count(), 0);
    }

    #[test]
    fn schedule_is_not_serialized() {
        let mut tech = Technician::new(TechnicianId(201), "Alice".into());
        tech.open(slot("2024-06-01", "10:00"));
        tech.book(slot("2024-06-01", "11:00"), AppointmentId(3001));

        let json = serde_json::to_string(&tech).unwrap();
        let parsed: Technician = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_open(&slot("2024-06-01", "10:00")));
        assert_eq!(parsed.scheduled_slots().count(), 0);
    }

    #[test]
    fn status_parsing_accepts_legacy_spellings() {
        assert_eq!(
            "Booked".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            "canceled".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
        assert!("pending".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn technician_equality_ignores_schedule() {
        let s = slot("2024-06-01", "10:00");
        let mut booked = Technician::new(TechnicianId(201), "Alice".into());
        booked.book(s, AppointmentId(3001));
        let stored = Technician::new(TechnicianId(201), "Alice".into());
        assert_eq!(booked, stored);

        let mut open = stored.clone();
        open.open(s);
        assert_ne!(open, stored);
    }
}
