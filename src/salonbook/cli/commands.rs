//! # CLI Layer
//!
//! This module is **one UI client** for salonbook. It is the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Installs the tracing subscriber
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory and opens the API session
//! - `handle_*()`: Per-command handlers that call the API and print the result
//!
//! Every invocation is one session: records load when the context is built and
//! are saved once, after the handler succeeds.

use super::menu;
use super::render::{print_messages, print_result};
use super::setup::{
    command_name, print_grouped_help, print_help_for_command, BookingCommands, Cli,
    ClientCommands, Commands, ConfigCommands, DirectoryCommands, MiscCommands, TechCommands,
};
use chrono::{Days, Local};
use clap::Parser;
use directories::ProjectDirs;
use salonbook::api::{AppointmentQuery, ConfigAction, SalonApi};
use salonbook::config::SalonConfig;
use salonbook::error::{Result, SalonError};
use salonbook::store::fs::FileStore;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SALONBOOK_LOG";

pub struct AppContext {
    pub api: SalonApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            None => print_grouped_help(),
            Some(command) => print_help_for_command(command_name(command)),
        }
        return Ok(());
    }
    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    init_tracing(cli.verbose);
    let mut ctx = init_context(&cli)?;

    let outcome = match cli.command {
        Some(Commands::Booking(cmd)) => match cmd {
            BookingCommands::Book {
                client,
                technician,
                date,
                time,
                service,
                price,
            } => handle_book(
                &mut ctx,
                &client,
                &technician,
                &date,
                &time,
                &service.join(" "),
                price.as_deref(),
            ),
            BookingCommands::Cancel { ids } => handle_cancel(&mut ctx, &ids),
            BookingCommands::Complete { ids } => handle_complete(&mut ctx, &ids),
            BookingCommands::List {
                client,
                tech,
                status,
                date,
            } => handle_list(
                &ctx,
                AppointmentQuery {
                    client,
                    technician: tech,
                    status,
                    date,
                },
            ),
            BookingCommands::Slots { date } => handle_slots(&ctx, &date),
        },
        Some(Commands::Directory(cmd)) => match cmd {
            DirectoryCommands::Client { action } => handle_client(&mut ctx, action),
            DirectoryCommands::Tech { action } => handle_tech(&mut ctx, action),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Menu => menu::run(&mut ctx),
            MiscCommands::Config { action } => handle_config(&mut ctx, action),
            MiscCommands::Init { demo } => handle_init(&mut ctx, demo),
            MiscCommands::Doctor => handle_doctor(&mut ctx),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => menu::run(&mut ctx),
    };
    outcome?;

    if ctx.api.flush()? {
        debug!(dir = %ctx.api.config_dir().display(), "salon saved");
    }
    Ok(())
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "salonbook=debug"
    } else {
        "salonbook=warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    debug!(dir = %data_dir.display(), "opening salon");

    let config = SalonConfig::load(&data_dir)?;
    let store = FileStore::new(&data_dir);
    let api = SalonApi::open(store, config, data_dir)?;
    Ok(AppContext { api })
}

/// `--data-dir` (or `SALONBOOK_HOME`, read by clap) wins over the platform
/// data directory.
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("com", "salonbook", "salonbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SalonError::Store("could not determine a data directory".into()))
}

pub fn tomorrow() -> chrono::NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

fn handle_book(
    ctx: &mut AppContext,
    client: &str,
    technician: &str,
    date: &str,
    time: &str,
    service: &str,
    price: Option<&str>,
) -> Result<()> {
    let result = ctx.api.book(client, technician, date, time, service, price)?;
    print_result(&result);
    Ok(())
}

fn handle_cancel(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let result = ctx.api.cancel(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_complete(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let result = ctx.api.complete(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, query: AppointmentQuery) -> Result<()> {
    let result = ctx.api.list_appointments(&query)?;
    print_result(&result);
    Ok(())
}

fn handle_slots(ctx: &AppContext, date: &str) -> Result<()> {
    let result = ctx.api.open_slots(date)?;
    print_result(&result);
    Ok(())
}

fn handle_client(ctx: &mut AppContext, action: ClientCommands) -> Result<()> {
    let result = match action {
        ClientCommands::Add { name, phone } => ctx.api.register_client(&name, &phone)?,
        ClientCommands::List => ctx.api.list_clients()?,
        ClientCommands::Show { id } => ctx.api.show_client(&id)?,
        ClientCommands::Update { id, name, phone } => {
            ctx.api
                .update_client(&id, name.as_deref(), phone.as_deref())?
        }
        ClientCommands::Remove { id } => ctx.api.remove_client(&id)?,
    };
    print_result(&result);
    Ok(())
}

fn handle_tech(ctx: &mut AppContext, action: TechCommands) -> Result<()> {
    let result = match action {
        TechCommands::Add { name, slots } => ctx.api.register_technician(&name, &slots)?,
        TechCommands::List => ctx.api.list_technicians()?,
        TechCommands::Schedule { id } => ctx.api.technician_schedule(&id)?,
        TechCommands::Open { id, slots } => {
            let result = ctx.api.open_slots_for(&id, &slots)?;
            print_messages(&result.messages);
            return Ok(());
        }
        TechCommands::Close { id, slots } => {
            let result = ctx.api.close_slots_for(&id, &slots)?;
            print_messages(&result.messages);
            return Ok(());
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, action: Option<ConfigCommands>) -> Result<()> {
    let action = match action {
        None | Some(ConfigCommands::Show) => ConfigAction::ShowAll,
        Some(ConfigCommands::SetService { name, price }) => ConfigAction::SetService {
            name,
            price: price.parse()?,
        },
        Some(ConfigCommands::RemoveService { name }) => ConfigAction::RemoveService(name),
    };
    let result = ctx.api.config(action)?;
    print_result(&result);
    Ok(())
}

fn handle_init(ctx: &mut AppContext, demo: bool) -> Result<()> {
    let result = ctx.api.init(demo, tomorrow())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}
