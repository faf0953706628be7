//! # Salonbook Architecture
//!
//! Salonbook is an **appointment-booking library** for a small nail salon, with a
//! terminal client on top. The booking rules live in the library; the binary only
//! parses arguments, prompts, and prints.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Subcommands, interactive menu, tables on the terminal    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Parses ids, dates, times and prices typed by users       │
//! │  - Owns the session: load on open, save on flush            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per user operation, returns `CmdResult`     │
//! │  - Batch semantics, catalogue lookups, messages             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Scheduling Core (manager.rs, model.rs, ids.rs)             │
//! │  - BookingManager: clients, technicians, appointments       │
//! │  - Keeps every slot either open, booked, or neither         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - BookingStore trait                                       │
//! │  - FileStore (salon.json), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifiers
//!
//! Records carry short prefixed ids (`C101`, `T201`, `A3001`). Counters are
//! persisted with the data, so an id is never handed out twice, even after
//! the record it named is gone. See `ids.rs`.
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward, code never prints and never exits. Everything comes
//! back as `Result<CmdResult>`, and the caller decides how to show it.
//!
//! ## Testing Strategy
//!
//! 1. **Scheduling core** (`manager.rs`): the booking rules and their invariants.
//! 2. **Commands** (`commands/*.rs`): batches, catalogue pricing, messages.
//! 3. **API** (`api.rs`): input parsing and session bookkeeping, against
//!    `InMemoryStore`.
//! 4. **Binary** (`tests/`): the full CLI against a temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per command family
//! - [`manager`]: The `BookingManager` scheduling core
//! - [`model`]: Clients, technicians, appointments, slots and prices
//! - [`ids`]: Prefixed identifiers and their counters
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Service catalogue
//! - [`error`]: Error types
//! - `cli`: Argument parsing, menu and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod manager;
pub mod model;
pub mod store;
