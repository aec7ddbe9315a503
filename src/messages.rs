//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types: lifecycle events
//! announced by the host, and panel operations requested by the user.

use crate::host::{ContentId, ScreenSize, WindowId, WorkspaceId};
use crate::panel::{CloseOptions, OpenOptions, PanelId};

/// Lifecycle events delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished starting up
    Startup,
    /// A workspace was created (it will be entered next)
    WorkspaceNew(WorkspaceId),
    /// The user switched into a workspace
    WorkspaceEntered(WorkspaceId),
    /// The user is leaving a workspace
    WorkspaceLeft(WorkspaceId),
    /// The whole display changed size
    Resized(ScreenSize),
    /// A content was destroyed by the host
    ContentDestroyed(ContentId),
    /// A window became visible showing some content
    WindowSurfaced {
        window: WindowId,
        content: Option<ContentId>,
    },
    /// A window was closed
    WindowClosed {
        window: WindowId,
        workspace: WorkspaceId,
    },
}

/// Operations on a single panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMsg {
    Open(OpenOptions),
    Close(CloseOptions),
    Toggle(OpenOptions),
    /// Open and focus, refocus when elsewhere, close when already focused
    FocusOrToggle,
    /// Rotate displayed content through the panel's registry
    Go(i64),
    ToggleZoom,
    Focus,
    Claim(WindowId),
    SetExtent(u32),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host lifecycle events
    Host(HostEvent),
    /// Panel operations
    Panel { panel: PanelId, msg: PanelMsg },
    /// The host's next event-loop turn (runs deferred reconciliation)
    Tick,
}

// Convenience constructors for common messages
impl Msg {
    pub fn toggle(panel: PanelId) -> Self {
        Msg::Panel {
            panel,
            msg: PanelMsg::Toggle(OpenOptions::default()),
        }
    }

    pub fn open(panel: PanelId) -> Self {
        Msg::Panel {
            panel,
            msg: PanelMsg::Open(OpenOptions::default()),
        }
    }

    pub fn go(panel: PanelId, distance: i64) -> Self {
        Msg::Panel {
            panel,
            msg: PanelMsg::Go(distance),
        }
    }
}

impl From<HostEvent> for Msg {
    fn from(event: HostEvent) -> Self {
        Msg::Host(event)
    }
}
