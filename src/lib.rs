//! dockhand - persistent panels over per-workspace host windows
//!
//! This crate provides the core types and logic for keeping panels
//! (terminals, file trees, notes) alive across workspaces, implementing
//! the Elm Architecture pattern: host events and panel commands are
//! messages, [`update::update`] applies them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod debug_dump;
pub mod error;
pub mod host;
pub mod messages;
pub mod orchestrator;
pub mod panel;
pub mod scenario;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::DockhandConfig;
pub use error::{PanelError, PanelResult};
pub use host::{Host, MemoryHost};
pub use messages::{HostEvent, Msg, PanelMsg};
pub use orchestrator::{Orchestrator, StartupOrder};
pub use panel::{PanelConfig, PanelHooks, PanelId, Position};
