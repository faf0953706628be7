use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "SALONBOOK_HOME";

#[derive(Parser, Debug)]
#[command(
    name = "salonbook",
    bin_name = "salonbook",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Appointment booking for a small nail salon", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding salon.json and config.json
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "PATH", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Booking,
    Directory,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Booking => "Booking Commands:",
            CommandGroup::Directory => "Directory Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "book" | "cancel" | "complete" | "list" | "slots" => Some(CommandGroup::Booking),
            "client" | "tech" => Some(CommandGroup::Directory),
            "menu" | "config" | "init" | "doctor" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Booking,
            CommandGroup::Directory,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("salonbook {version}\n"));
    output.push_str("Appointment booking for a small nail salon\n");
    output.push('\n');
    output.push_str("Usage: salonbook [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --data-dir <PATH>  Directory holding the salon data [env: SALONBOOK_HOME]\n");
    output.push_str("  -v, --verbose          Verbose output\n");
    output.push_str("  -h, --help             Print help\n");
    output.push_str("  -V, --version          Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Name of the top-level subcommand, for `--help` dispatch.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Booking(c) => match c {
            BookingCommands::Book { .. } => "book",
            BookingCommands::Cancel { .. } => "cancel",
            BookingCommands::Complete { .. } => "complete",
            BookingCommands::List { .. } => "list",
            BookingCommands::Slots { .. } => "slots",
        },
        Commands::Directory(c) => match c {
            DirectoryCommands::Client { .. } => "client",
            DirectoryCommands::Tech { .. } => "tech",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Menu => "menu",
            MiscCommands::Config { .. } => "config",
            MiscCommands::Init { .. } => "init",
            MiscCommands::Doctor => "doctor",
            MiscCommands::Help { .. } => "help",
        },
    }
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Booking(BookingCommands),

    #[command(flatten)]
    Directory(DirectoryCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// Book an open slot for a client
    #[command(alias = "b", display_order = 1)]
    Book {
        /// Client id (e.g. C101)
        client: String,
        /// Technician id (e.g. T201)
        technician: String,
        /// Date, YYYY-MM-DD
        date: String,
        /// Time, HH:MM
        time: String,
        /// Service name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        service: Vec<String>,
        /// Price in dollars, overrides the service menu
        #[arg(long)]
        price: Option<String>,
    },

    /// Cancel appointments, re-opening their slots
    #[command(display_order = 2)]
    Cancel {
        /// Appointment ids (e.g. A3001)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Mark appointments as completed
    #[command(alias = "done", display_order = 3)]
    Complete {
        /// Appointment ids (e.g. A3001)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// List appointments
    #[command(alias = "ls", display_order = 4)]
    List {
        /// Only this client's appointments
        #[arg(long)]
        client: Option<String>,
        /// Only this technician's appointments
        #[arg(long)]
        tech: Option<String>,
        /// scheduled, completed or cancelled
        #[arg(long)]
        status: Option<String>,
        /// Only appointments on this date
        #[arg(long)]
        date: Option<String>,
    },

    /// Show open slots on a date
    #[command(display_order = 5)]
    Slots {
        /// Date, YYYY-MM-DD
        date: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DirectoryCommands {
    /// Manage clients
    #[command(display_order = 10)]
    Client {
        #[command(subcommand)]
        action: ClientCommands,
    },

    /// Manage technicians and their availability
    #[command(display_order = 11)]
    Tech {
        #[command(subcommand)]
        action: TechCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Register a client
    Add { name: String, phone: String },

    /// List clients
    #[command(alias = "ls")]
    List,

    /// Show a client and their appointments
    Show { id: String },

    /// Change a client's name or phone
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove a client with no appointments
    #[command(alias = "rm")]
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TechCommands {
    /// Register a technician
    Add {
        name: String,
        /// Initial open slots ("YYYY-MM-DD HH:MM")
        #[arg(long = "slot", value_name = "SLOT")]
        slots: Vec<String>,
    },

    /// List technicians
    #[command(alias = "ls")]
    List,

    /// Show a technician's availability and appointments
    Schedule { id: String },

    /// Open slots for booking
    Open {
        id: String,
        /// Slots ("YYYY-MM-DD HH:MM")
        #[arg(required = true, num_args = 1..)]
        slots: Vec<String>,
    },

    /// Close open slots
    Close {
        id: String,
        /// Slots ("YYYY-MM-DD HH:MM")
        #[arg(required = true, num_args = 1..)]
        slots: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Interactive menu (the default)
    #[command(display_order = 30)]
    Menu,

    /// Show or edit the service menu
    #[command(display_order = 31)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Write the default configuration
    #[command(display_order = 32)]
    Init {
        /// Seed two technicians open tomorrow and one client
        #[arg(long)]
        demo: bool,
    },

    /// Check stored records and save any repairs
    #[command(display_order = 33)]
    Doctor,

    /// Print help for salonbook or a subcommand
    #[command(display_order = 34)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the service menu
    Show,

    /// Add a service or change its price
    SetService {
        name: String,
        price: String,
    },

    /// Remove a service
    RemoveService { name: String },
}
