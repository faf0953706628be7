//! Interactive menu, the default when no subcommand is given.
//!
//! A client or technician logs in (or registers) and then works from their
//! own menu. Failed operations are printed and the menu carries on; changes
//! are saved after every action. Esc goes back one level, Ctrl-C leaves.

use super::commands::{tomorrow, AppContext};
use super::render::{print_messages, print_result};
use colored::Colorize;
use inquire::{Confirm, InquireError, Select, Text};
use salonbook::api::CmdMessage;
use salonbook::error::{Result, SalonError};
use salonbook::ids::{ClientId, TechnicianId};
use salonbook::model::{DATE_FORMAT, TIME_FORMAT};
use std::fmt;

enum MenuExit {
    /// Esc: return to the enclosing menu
    Back,
    /// Ctrl-C: leave the menu entirely
    Quit,
    /// A salon operation failed; report it and keep going
    Failed(SalonError),
    /// The terminal or the store failed; stop
    Abort(SalonError),
}

type Step<T> = std::result::Result<T, MenuExit>;

impl From<InquireError> for MenuExit {
    fn from(err: InquireError) -> Self {
        match err {
            InquireError::OperationCanceled => MenuExit::Back,
            InquireError::OperationInterrupted => MenuExit::Quit,
            InquireError::NotTTY => MenuExit::Abort(SalonError::InvalidInput(
                "the interactive menu needs a terminal, see `salonbook help`".into(),
            )),
            InquireError::IO(e) => MenuExit::Abort(SalonError::Io(e)),
            other => MenuExit::Abort(SalonError::InvalidInput(other.to_string())),
        }
    }
}

impl From<SalonError> for MenuExit {
    fn from(err: SalonError) -> Self {
        MenuExit::Failed(err)
    }
}

/// A labelled value for `Select` prompts.
struct Choice<T> {
    label: String,
    value: T,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn choices<T>(items: impl IntoIterator<Item = (String, T)>) -> Vec<Choice<T>> {
    items
        .into_iter()
        .map(|(label, value)| Choice { label, value })
        .collect()
}

#[derive(Clone, Copy)]
enum MainItem {
    Client,
    Technician,
    Exit,
}

#[derive(Clone, Copy)]
enum EntryItem {
    LogIn,
    Register,
    Back,
}

#[derive(Clone, Copy)]
enum ClientItem {
    Book,
    Appointments,
    Cancel,
    Back,
}

#[derive(Clone, Copy)]
enum TechItem {
    Schedule,
    AddSlot,
    RemoveSlot,
    Back,
}

pub fn run(ctx: &mut AppContext) -> Result<()> {
    println!("{}", "Salon booking".bold());
    loop {
        let outcome = pick(
            "Main menu",
            choices([
                ("I'm a client".to_string(), MainItem::Client),
                ("I'm a technician".to_string(), MainItem::Technician),
                ("Exit".to_string(), MainItem::Exit),
            ]),
        )
        .and_then(|choice| match choice {
            MainItem::Client => client_entry(ctx),
            MainItem::Technician => tech_entry(ctx),
            MainItem::Exit => Err(MenuExit::Quit),
        });
        match settle(ctx, outcome) {
            Ok(()) | Err(MenuExit::Back) => {}
            Err(MenuExit::Quit) => return Ok(()),
            Err(MenuExit::Abort(e)) | Err(MenuExit::Failed(e)) => return Err(e),
        }
    }
}

/// Reports a failed operation and saves whatever changed.
fn settle(ctx: &mut AppContext, outcome: Step<()>) -> Step<()> {
    let outcome = match outcome {
        Err(MenuExit::Failed(e)) => {
            eprintln!("{} {}", "Error:".red(), e);
            Ok(())
        }
        other => other,
    };
    ctx.api.flush().map_err(MenuExit::Abort)?;
    outcome
}

fn client_entry(ctx: &mut AppContext) -> Step<()> {
    let id = match pick(
        "Client",
        choices([
            ("Log in".to_string(), EntryItem::LogIn),
            ("Create a new client account".to_string(), EntryItem::Register),
            ("Back".to_string(), EntryItem::Back),
        ]),
    )? {
        EntryItem::LogIn => {
            let clients = choices(ctx.api.manager().clients().map(|c| {
                (format!("{}  {} ({})", c.id, c.name, c.phone), c.id)
            }));
            if clients.is_empty() {
                print_messages(&[CmdMessage::info("No clients registered yet.")]);
                return Ok(());
            }
            pick("Who are you?", clients)?
        }
        EntryItem::Register => {
            let name = Text::new("Name:").prompt()?;
            let phone = Text::new("Phone number:").prompt()?;
            let result = ctx.api.register_client(&name, &phone)?;
            print_messages(&result.messages);
            match result.clients.first() {
                Some(client) => client.id,
                None => return Ok(()),
            }
        }
        EntryItem::Back => return Ok(()),
    };
    settle(ctx, Ok(()))?;
    client_menu(ctx, id)
}

fn client_menu(ctx: &mut AppContext, id: ClientId) -> Step<()> {
    loop {
        let name = ctx.api.manager().client(id)?.name.clone();
        let choice = pick(
            &format!("Welcome, {}", name),
            choices([
                ("Book a new appointment".to_string(), ClientItem::Book),
                ("View my appointments".to_string(), ClientItem::Appointments),
                ("Cancel an appointment".to_string(), ClientItem::Cancel),
                ("Back to main menu".to_string(), ClientItem::Back),
            ]),
        )?;
        let outcome = match choice {
            ClientItem::Book => book_for(ctx, id),
            ClientItem::Appointments => ctx
                .api
                .show_client(&id.to_string())
                .map(|result| print_result(&result))
                .map_err(MenuExit::from),
            ClientItem::Cancel => cancel_for(ctx, id),
            ClientItem::Back => return Ok(()),
        };
        match settle(ctx, outcome) {
            Ok(()) | Err(MenuExit::Back) => {}
            Err(other) => return Err(other),
        }
    }
}

fn book_for(ctx: &mut AppContext, client: ClientId) -> Step<()> {
    let services = choices(
        ctx.api
            .salon_config()
            .services
            .iter()
            .map(|offer| (format!("{} ({})", offer.name, offer.price), offer.name.clone())),
    );
    if services.is_empty() {
        print_messages(&[CmdMessage::warning(
            "The service menu is empty, add one with `salonbook config set-service`.",
        )]);
        return Ok(());
    }
    let service = pick("Service", services)?;

    let default_date = tomorrow().format(DATE_FORMAT).to_string();
    let date = Text::new("Date (YYYY-MM-DD):")
        .with_default(&default_date)
        .prompt()?;
    let open = ctx.api.open_slots(&date)?;
    if open.open_slots.is_empty() {
        print_messages(&open.messages);
        return Ok(());
    }

    let slots = choices(open.open_slots.iter().map(|listing| {
        (
            format!(
                "{}  {} ({})",
                listing.slot.time.format(TIME_FORMAT),
                listing.technician_name,
                listing.technician
            ),
            (listing.technician, listing.slot.time),
        )
    }));
    let (technician, time) = pick("Open slot", slots)?;

    let result = ctx.api.book(
        &client.to_string(),
        &technician.to_string(),
        &date,
        &time.format(TIME_FORMAT).to_string(),
        &service,
        None,
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn cancel_for(ctx: &mut AppContext, client: ClientId) -> Step<()> {
    let manager = ctx.api.manager();
    let scheduled = choices(
        manager
            .appointments_for_client(client)?
            .into_iter()
            .filter(|appt| appt.is_scheduled())
            .map(|appt| {
                (
                    format!("{}  {}  {}", appt.id, appt.slot, appt.service),
                    appt.id,
                )
            }),
    );
    if scheduled.is_empty() {
        print_messages(&[CmdMessage::info(
            "You have no upcoming appointments.",
        )]);
        return Ok(());
    }
    let appointment = pick("Appointment to cancel", scheduled)?;
    if !Confirm::new(&format!("Cancel {}?", appointment))
        .with_default(false)
        .prompt()?
    {
        return Ok(());
    }
    let result = ctx.api.cancel(&[appointment.to_string()])?;
    print_messages(&result.messages);
    Ok(())
}

fn tech_entry(ctx: &mut AppContext) -> Step<()> {
    let id = match pick(
        "Technician",
        choices([
            ("Log in".to_string(), EntryItem::LogIn),
            ("Create a new technician profile".to_string(), EntryItem::Register),
            ("Back".to_string(), EntryItem::Back),
        ]),
    )? {
        EntryItem::LogIn => {
            let technicians = choices(
                ctx.api
                    .manager()
                    .technicians()
                    .map(|t| (format!("{}  {}", t.id, t.name), t.id)),
            );
            if technicians.is_empty() {
                print_messages(&[CmdMessage::info(
                    "No technicians registered yet.",
                )]);
                return Ok(());
            }
            pick("Who are you?", technicians)?
        }
        EntryItem::Register => {
            let name = Text::new("Name:").prompt()?;
            let result = ctx.api.register_technician::<&str>(&name, &[])?;
            print_messages(&result.messages);
            match result.technicians.first() {
                Some(tech) => tech.id,
                None => return Ok(()),
            }
        }
        EntryItem::Back => return Ok(()),
    };
    settle(ctx, Ok(()))?;
    tech_menu(ctx, id)
}

fn tech_menu(ctx: &mut AppContext, id: TechnicianId) -> Step<()> {
    loop {
        let name = ctx.api.manager().technician(id)?.name.clone();
        let choice = pick(
            &format!("Welcome, {}", name),
            choices([
                ("View my schedule".to_string(), TechItem::Schedule),
                ("Add an availability slot".to_string(), TechItem::AddSlot),
                ("Remove an availability slot".to_string(), TechItem::RemoveSlot),
                ("Back to main menu".to_string(), TechItem::Back),
            ]),
        )?;
        let outcome = match choice {
            TechItem::Schedule => ctx
                .api
                .technician_schedule(&id.to_string())
                .map(|result| print_result(&result))
                .map_err(MenuExit::from),
            TechItem::AddSlot => add_slot_for(ctx, id),
            TechItem::RemoveSlot => remove_slot_for(ctx, id),
            TechItem::Back => return Ok(()),
        };
        match settle(ctx, outcome) {
            Ok(()) | Err(MenuExit::Back) => {}
            Err(other) => return Err(other),
        }
    }
}

fn add_slot_for(ctx: &mut AppContext, technician: TechnicianId) -> Step<()> {
    let default_date = tomorrow().format(DATE_FORMAT).to_string();
    let date = Text::new("Date (YYYY-MM-DD):")
        .with_default(&default_date)
        .prompt()?;
    let time = Text::new("Time (HH:MM):").prompt()?;
    let result = ctx
        .api
        .open_slots_for(&technician.to_string(), &[format!("{} {}", date, time)])?;
    print_messages(&result.messages);
    Ok(())
}

fn remove_slot_for(ctx: &mut AppContext, technician: TechnicianId) -> Step<()> {
    let open = choices(
        ctx.api
            .manager()
            .technician(technician)?
            .open_slots()
            .map(|slot| (slot.to_string(), slot.to_string())),
    );
    if open.is_empty() {
        print_messages(&[CmdMessage::info("No availability set.")]);
        return Ok(());
    }
    let slot = pick("Slot to remove", open)?;
    let result = ctx.api.close_slots_for(&technician.to_string(), &[slot])?;
    print_messages(&result.messages);
    Ok(())
}

fn pick<T>(message: &str, items: Vec<Choice<T>>) -> Step<T> {
    Ok(Select::new(message, items).prompt()?.value)
}
