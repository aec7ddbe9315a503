//! Host boundary
//!
//! The host owns the real windows, contents (buffers) and workspaces (tabs).
//! Panels never create or destroy anything directly; every primitive goes
//! through the [`Host`] trait so the core stays independent of any particular
//! window system.
//!
//! ## Identifiers
//!
//! Window, content and workspace handles are opaque newtypes. A window id is
//! only meaningful inside the workspace that owns it, and may be invalidated
//! by the host at any time; callers check [`Host::is_window_valid`] before
//! trusting a stored id.

mod memory;

pub use memory::MemoryHost;

use serde::{Deserialize, Serialize};

use crate::panel::Placement;

// ============================================================================
// Identifiers
// ============================================================================

/// Host handle for a window inside one workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

/// Host handle for a unit of displayable content (a buffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub u64);

/// Host handle for a workspace (an independent view-tree, e.g. a tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win:{}", self.0)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "content:{}", self.0)
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ws:{}", self.0)
    }
}

// ============================================================================
// Screen and window attributes
// ============================================================================

/// Dimensions of the whole display, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub columns: u32,
    pub lines: u32,
    /// Rows reserved at the bottom for the command line
    #[serde(default = "default_cmdline_height")]
    pub cmdline_height: u32,
}

fn default_cmdline_height() -> u32 {
    1
}

impl ScreenSize {
    pub fn new(columns: u32, lines: u32, cmdline_height: u32) -> Self {
        Self {
            columns,
            lines,
            cmdline_height,
        }
    }

    /// Lines available to windows (screen minus the command line)
    pub fn editor_lines(&self) -> u32 {
        self.lines.saturating_sub(self.cmdline_height)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(120, 40, 1)
    }
}

/// Direction along which a window's extent is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Width (columns)
    Horizontal,
    /// Height (lines)
    Vertical,
}

/// Host-level display flags applied to every panel window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowFlags {
    /// Content stays alive (hidden) when its last window closes
    pub hide_on_close: bool,
    /// Content is excluded from the host's content list
    pub unlisted: bool,
    /// Width is not changed when neighbouring splits resize
    pub fixed_width: bool,
    /// Height is not changed when neighbouring splits resize
    pub fixed_height: bool,
}

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by a host primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    /// Primitive that failed (e.g. "open_window")
    pub operation: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "host {} failed: {}", self.operation, self.message)
    }
}

impl std::error::Error for HostError {}

// ============================================================================
// Host trait
// ============================================================================

/// Primitive operations the panel core needs from the window host
///
/// Queries never fail; they return `None`/`false`/empty for dead handles.
/// Mutating primitives return `HostError` when the host refuses.
pub trait Host {
    /// Workspace the user is currently looking at
    fn current_workspace(&self) -> WorkspaceId;

    /// All live workspaces, in host order
    fn workspaces(&self) -> Vec<WorkspaceId>;

    /// Live windows of a workspace, in layout order
    fn workspace_windows(&self, workspace: WorkspaceId) -> Vec<WindowId>;

    /// Workspace owning a window, if the window is live
    fn window_workspace(&self, window: WindowId) -> Option<WorkspaceId>;

    fn is_window_valid(&self, window: WindowId) -> bool;

    fn is_content_valid(&self, content: ContentId) -> bool;

    /// Content currently displayed in a window
    fn window_content(&self, window: WindowId) -> Option<ContentId>;

    /// Host-assigned name of a content (file path, `term://…`, …)
    fn content_name(&self, content: ContentId) -> Option<String>;

    fn focused_window(&self) -> Option<WindowId>;

    fn screen_size(&self) -> ScreenSize;

    /// Current on-screen extent of a window along an axis
    fn window_extent(&self, window: WindowId, axis: Axis) -> Option<u32>;

    /// Allocate a new, empty content
    fn create_content(&mut self) -> Result<ContentId, HostError>;

    /// Create a window in the current workspace showing `content`
    fn open_window(
        &mut self,
        content: ContentId,
        placement: &Placement,
    ) -> Result<WindowId, HostError>;

    fn set_window_content(&mut self, window: WindowId, content: ContentId)
        -> Result<(), HostError>;

    /// Move/resize an existing window to match a placement
    fn apply_placement(&mut self, window: WindowId, placement: &Placement)
        -> Result<(), HostError>;

    fn set_window_flags(&mut self, window: WindowId, flags: WindowFlags)
        -> Result<(), HostError>;

    fn set_window_extent(&mut self, window: WindowId, axis: Axis, extent: u32)
        -> Result<(), HostError>;

    fn focus_window(&mut self, window: WindowId) -> Result<(), HostError>;

    fn close_window(&mut self, window: WindowId) -> Result<(), HostError>;

    /// Split a new window with fresh empty content next to `window`
    fn split_blank(&mut self, window: WindowId) -> Result<WindowId, HostError>;

    fn close_workspace(&mut self, workspace: WorkspaceId) -> Result<(), HostError>;

    /// Exit the host process
    fn quit(&mut self);
}
