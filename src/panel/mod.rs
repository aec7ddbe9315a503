//! Panel system - persistent panels over per-workspace host windows
//!
//! A panel is one logical window (terminal, file tree, notes, …) that keeps
//! its identity, size and content across workspaces, even though the host
//! creates and destroys the real windows per workspace.
//!
//! ## Architecture
//!
//! - `PanelConfig`: immutable configuration (position, size, float geometry, policies)
//! - `geometry`: pure placement computation from config, screen and zoom
//! - `PanelState`: mutable state shared by all workspaces (size, registry, bindings)
//! - `PanelInstance`: open/close/toggle/go/zoom/claim operations
//! - `ownership`: resolver deciding which windows and contents belong to a panel
//! - `hooks`: lifecycle callbacks and ownership predicates
//!
//! The [`crate::orchestrator::Orchestrator`] owns every instance and routes
//! host lifecycle events to them.

mod config;
mod geometry;
mod hooks;
mod instance;
mod ownership;
mod state;

use serde::Serialize;

pub use config::{Dimension, PanelConfig, Position, WindowConfig};
pub use geometry::{
    compute_window_placement, parse_percentage, Anchor, Edge, FloatPlacement, HorizontalAnchor,
    Placement, VerticalAnchor,
};
pub use hooks::{
    Hook, HookKind, OwnershipPredicate, OwnershipQuery, OwnershipReason, PanelEvent, PanelHooks,
};
pub use instance::{CloseOptions, OpenMode, OpenOptions, PanelInstance};
pub use state::PanelState;

/// Registry index of a panel, assigned in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PanelId(pub usize);

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "panel:{}", self.0)
    }
}
