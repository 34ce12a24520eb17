//! # Core Application Logic
//!
//! This module contains Tabula's business logic.
//! It knows nothing about any specific UI technology or the network.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Vec<Effect>
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  effects   │
//!     │  Adapter   │ ◄──────── Action ─────── │ (api calls)│
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`chat`]: chat session state machine and transcript
//! - [`upload`]: pending-file validation
//! - [`confirm`]: the single confirmation slot
//! - [`notify`]: transient notifications
//! - [`history`]: labels for stored conversation turns
//! - [`config`]: `~/.tabula/config.toml` loading and resolution

pub mod action;
pub mod chat;
pub mod config;
pub mod confirm;
pub mod history;
pub mod notify;
pub mod state;
pub mod upload;
