//! In-memory host
//!
//! A complete `Host` implementation that keeps workspaces, windows and
//! contents in plain collections. It backs the integration tests and the
//! scenario runner.
//!
//! Actions that a real host would announce push `HostEvent`s onto an outbox
//! instead of calling back into the panels. The embedding loop drains the
//! outbox with [`MemoryHost::take_events`] once the action has finished, so
//! event delivery is never re-entrant.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{
    Axis, ContentId, Host, HostError, ScreenSize, WindowFlags, WindowId, WorkspaceId,
};
use crate::messages::HostEvent;
use crate::panel::{Edge, Placement};

#[derive(Debug, Clone, Serialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub workspace: WorkspaceId,
    pub content: ContentId,
    pub width: u32,
    pub height: u32,
    /// Edge for panel splits, `None` for ordinary windows and floats
    pub edge: Option<Edge>,
    /// Row/column for floating windows
    pub float_origin: Option<(u32, u32)>,
    pub flags: WindowFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceRecord {
    pub id: WorkspaceId,
    /// Windows in layout order
    pub windows: Vec<WindowId>,
    pub focused: Option<WindowId>,
}

/// In-memory window host
#[derive(Debug, Clone)]
pub struct MemoryHost {
    screen: ScreenSize,
    workspaces: Vec<WorkspaceRecord>,
    current: WorkspaceId,
    windows: HashMap<WindowId, WindowRecord>,
    contents: BTreeMap<ContentId, ContentRecord>,
    events: Vec<HostEvent>,
    has_quit: bool,
    fail_next: Option<&'static str>,
    next_window_id: u64,
    next_content_id: u64,
    next_workspace_id: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(ScreenSize::default())
    }
}

impl MemoryHost {
    /// Create a host with one workspace holding one blank window
    pub fn new(screen: ScreenSize) -> Self {
        let mut host = Self {
            screen,
            workspaces: Vec::new(),
            current: WorkspaceId(0),
            windows: HashMap::new(),
            contents: BTreeMap::new(),
            events: Vec::new(),
            has_quit: false,
            fail_next: None,
            next_window_id: 1000,
            next_content_id: 1,
            next_workspace_id: 1,
        };
        let workspace = host.add_workspace();
        host.current = workspace;
        let content = host.add_content(None);
        let window = host.add_window(workspace, content);
        host.set_focus(workspace, window);
        host
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Drain announced events in the order they happened
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn has_quit(&self) -> bool {
        self.has_quit
    }

    pub fn window_record(&self, window: WindowId) -> Option<&WindowRecord> {
        self.windows.get(&window)
    }

    pub fn workspace_records(&self) -> &[WorkspaceRecord] {
        &self.workspaces
    }

    pub fn content_records(&self) -> impl Iterator<Item = &ContentRecord> {
        self.contents.values()
    }

    pub fn window_size(&self, window: WindowId) -> Option<(u32, u32)> {
        self.windows.get(&window).map(|w| (w.width, w.height))
    }

    /// Make the next call to a primitive (e.g. "open_window") fail
    pub fn fail_next(&mut self, operation: &'static str) {
        self.fail_next = Some(operation);
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Open a new workspace with a blank window and enter it
    pub fn new_workspace(&mut self) -> WorkspaceId {
        let content = self.add_content(None);
        self.new_workspace_with(content)
    }

    /// Open a named content (a file) in a new workspace and enter it
    pub fn open_in_new_workspace(&mut self, name: &str) -> WorkspaceId {
        let content = self.add_content(Some(name.to_string()));
        self.new_workspace_with(content)
    }

    fn new_workspace_with(&mut self, content: ContentId) -> WorkspaceId {
        let previous = self.current;
        let workspace = self.add_workspace();
        let window = self.add_window(workspace, content);
        self.set_focus(workspace, window);

        self.events.push(HostEvent::WorkspaceLeft(previous));
        self.current = workspace;
        self.events.push(HostEvent::WorkspaceNew(workspace));
        self.events.push(HostEvent::WorkspaceEntered(workspace));
        self.events.push(HostEvent::WindowSurfaced {
            window,
            content: Some(content),
        });
        workspace
    }

    pub fn switch_workspace(&mut self, workspace: WorkspaceId) -> bool {
        if workspace == self.current || self.workspace(workspace).is_none() {
            return false;
        }
        self.events.push(HostEvent::WorkspaceLeft(self.current));
        self.current = workspace;
        self.events.push(HostEvent::WorkspaceEntered(workspace));
        true
    }

    /// Split the focused window, showing a new blank content
    pub fn split(&mut self) -> WindowId {
        let content = self.add_content(None);
        self.split_showing(content)
    }

    /// Split the focused window, showing a new named content
    pub fn split_named(&mut self, name: &str) -> WindowId {
        let content = self.add_content(Some(name.to_string()));
        self.split_showing(content)
    }

    /// Split the focused window, showing an existing content
    pub fn split_showing(&mut self, content: ContentId) -> WindowId {
        let workspace = self.current;
        let window = self.add_window(workspace, content);
        self.set_focus(workspace, window);
        self.events.push(HostEvent::WindowSurfaced {
            window,
            content: Some(content),
        });
        window
    }

    /// Show a content in a window, as a user `:edit` would
    pub fn show_content(&mut self, window: WindowId, content: ContentId) -> bool {
        let valid = self.contents.contains_key(&content);
        let Some(record) = self.windows.get_mut(&window).filter(|_| valid) else {
            return false;
        };
        record.content = content;
        self.events.push(HostEvent::WindowSurfaced {
            window,
            content: Some(content),
        });
        true
    }

    /// Re-announce a window, as when the user re-enters it
    pub fn surface_window(&mut self, window: WindowId) -> bool {
        let Some(content) = self.window_content(window) else {
            return false;
        };
        self.events.push(HostEvent::WindowSurfaced {
            window,
            content: Some(content),
        });
        true
    }

    /// Close a window as the user would
    pub fn user_close_window(&mut self, window: WindowId) -> bool {
        self.remove_window(window).is_some()
    }

    /// Wipe a content; windows showing it fall back to a blank content
    pub fn delete_content(&mut self, content: ContentId) -> bool {
        if self.contents.remove(&content).is_none() {
            return false;
        }
        let showing: Vec<WindowId> = self
            .windows
            .values()
            .filter(|w| w.content == content)
            .map(|w| w.id)
            .collect();
        for window in showing {
            let blank = self.add_content(None);
            if let Some(record) = self.windows.get_mut(&window) {
                record.content = blank;
            }
        }
        self.events.push(HostEvent::ContentDestroyed(content));
        true
    }

    pub fn create_named_content(&mut self, name: &str) -> ContentId {
        self.add_content(Some(name.to_string()))
    }

    pub fn resize_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
        for record in self.windows.values_mut() {
            match record.edge {
                Some(Edge::Left | Edge::Right) => record.height = screen.editor_lines(),
                Some(Edge::Above | Edge::Below) => record.width = screen.columns,
                None if record.float_origin.is_none() => {
                    record.width = screen.columns;
                    record.height = screen.editor_lines();
                }
                None => {}
            }
        }
        self.events.push(HostEvent::Resized(screen));
    }

    /// Announce host startup
    pub fn start(&mut self) {
        self.events.push(HostEvent::Startup);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_failure(&mut self, operation: &'static str) -> Result<(), HostError> {
        if self.fail_next == Some(operation) {
            self.fail_next = None;
            return Err(HostError::new(operation, "injected failure"));
        }
        Ok(())
    }

    fn workspace(&self, workspace: WorkspaceId) -> Option<&WorkspaceRecord> {
        self.workspaces.iter().find(|ws| ws.id == workspace)
    }

    fn workspace_mut(&mut self, workspace: WorkspaceId) -> Option<&mut WorkspaceRecord> {
        self.workspaces.iter_mut().find(|ws| ws.id == workspace)
    }

    fn set_focus(&mut self, workspace: WorkspaceId, window: WindowId) {
        if let Some(ws) = self.workspace_mut(workspace) {
            ws.focused = Some(window);
        }
    }

    fn add_workspace(&mut self) -> WorkspaceId {
        let id = WorkspaceId(self.next_workspace_id);
        self.next_workspace_id += 1;
        self.workspaces.push(WorkspaceRecord {
            id,
            windows: Vec::new(),
            focused: None,
        });
        id
    }

    fn add_content(&mut self, name: Option<String>) -> ContentId {
        let id = ContentId(self.next_content_id);
        self.next_content_id += 1;
        self.contents.insert(id, ContentRecord { id, name });
        id
    }

    fn add_window(&mut self, workspace: WorkspaceId, content: ContentId) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        self.windows.insert(
            id,
            WindowRecord {
                id,
                workspace,
                content,
                width: self.screen.columns,
                height: self.screen.editor_lines(),
                edge: None,
                float_origin: None,
                flags: WindowFlags::default(),
            },
        );
        if let Some(ws) = self.workspace_mut(workspace) {
            ws.windows.push(id);
        }
        id
    }

    fn place(&mut self, window: WindowId, placement: &Placement) {
        let screen = self.screen;
        let Some(record) = self.windows.get_mut(&window) else {
            return;
        };
        match placement {
            Placement::Split { edge, size } => {
                record.edge = Some(*edge);
                record.float_origin = None;
                match edge {
                    Edge::Left | Edge::Right => {
                        record.width = *size;
                        record.height = screen.editor_lines();
                    }
                    Edge::Above | Edge::Below => {
                        record.width = screen.columns;
                        record.height = *size;
                    }
                }
            }
            Placement::Float(float) => {
                record.edge = None;
                record.float_origin = Some((float.row, float.col));
                record.width = float.width;
                record.height = float.height;
            }
        }
    }

    /// Remove a window, closing its workspace when it was the last one
    fn remove_window(&mut self, window: WindowId) -> Option<WindowRecord> {
        let record = self.windows.remove(&window)?;
        let workspace = record.workspace;

        let mut now_empty = false;
        if let Some(ws) = self.workspace_mut(workspace) {
            ws.windows.retain(|w| *w != window);
            if ws.focused == Some(window) {
                ws.focused = ws.windows.last().copied();
            }
            now_empty = ws.windows.is_empty();
        }

        self.events.push(HostEvent::WindowClosed { window, workspace });
        if now_empty {
            self.drop_workspace(workspace);
        }
        Some(record)
    }

    fn drop_workspace(&mut self, workspace: WorkspaceId) {
        let Some(index) = self.workspaces.iter().position(|ws| ws.id == workspace) else {
            return;
        };
        self.workspaces.remove(index);

        if self.workspaces.is_empty() {
            self.has_quit = true;
            return;
        }
        if self.current == workspace {
            let next = self.workspaces[index.min(self.workspaces.len() - 1)].id;
            self.current = next;
            self.events.push(HostEvent::WorkspaceEntered(next));
        }
    }
}

impl Host for MemoryHost {
    fn current_workspace(&self) -> WorkspaceId {
        self.current
    }

    fn workspaces(&self) -> Vec<WorkspaceId> {
        self.workspaces.iter().map(|ws| ws.id).collect()
    }

    fn workspace_windows(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        self.workspace(workspace)
            .map(|ws| ws.windows.clone())
            .unwrap_or_default()
    }

    fn window_workspace(&self, window: WindowId) -> Option<WorkspaceId> {
        self.windows.get(&window).map(|w| w.workspace)
    }

    fn is_window_valid(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    fn is_content_valid(&self, content: ContentId) -> bool {
        self.contents.contains_key(&content)
    }

    fn window_content(&self, window: WindowId) -> Option<ContentId> {
        self.windows.get(&window).map(|w| w.content)
    }

    fn content_name(&self, content: ContentId) -> Option<String> {
        self.contents.get(&content).and_then(|c| c.name.clone())
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.workspace(self.current).and_then(|ws| ws.focused)
    }

    fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    fn window_extent(&self, window: WindowId, axis: Axis) -> Option<u32> {
        self.windows.get(&window).map(|w| match axis {
            Axis::Horizontal => w.width,
            Axis::Vertical => w.height,
        })
    }

    fn create_content(&mut self) -> Result<ContentId, HostError> {
        self.check_failure("create_content")?;
        Ok(self.add_content(None))
    }

    fn open_window(
        &mut self,
        content: ContentId,
        placement: &Placement,
    ) -> Result<WindowId, HostError> {
        self.check_failure("open_window")?;
        if !self.contents.contains_key(&content) {
            return Err(HostError::new("open_window", format!("{} is not valid", content)));
        }
        let window = self.add_window(self.current, content);
        self.place(window, placement);
        self.events.push(HostEvent::WindowSurfaced {
            window,
            content: Some(content),
        });
        Ok(window)
    }

    fn set_window_content(
        &mut self,
        window: WindowId,
        content: ContentId,
    ) -> Result<(), HostError> {
        self.check_failure("set_window_content")?;
        if self.show_content(window, content) {
            Ok(())
        } else {
            Err(HostError::new(
                "set_window_content",
                format!("cannot show {} in {}", content, window),
            ))
        }
    }

    fn apply_placement(
        &mut self,
        window: WindowId,
        placement: &Placement,
    ) -> Result<(), HostError> {
        self.check_failure("apply_placement")?;
        if !self.windows.contains_key(&window) {
            return Err(HostError::new("apply_placement", format!("{} is not valid", window)));
        }
        self.place(window, placement);
        Ok(())
    }

    fn set_window_flags(&mut self, window: WindowId, flags: WindowFlags) -> Result<(), HostError> {
        let record = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| HostError::new("set_window_flags", format!("{} is not valid", window)))?;
        record.flags = flags;
        Ok(())
    }

    fn set_window_extent(
        &mut self,
        window: WindowId,
        axis: Axis,
        extent: u32,
    ) -> Result<(), HostError> {
        let record = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| HostError::new("set_window_extent", format!("{} is not valid", window)))?;
        match axis {
            Axis::Horizontal => record.width = extent,
            Axis::Vertical => record.height = extent,
        }
        Ok(())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<(), HostError> {
        self.check_failure("focus_window")?;
        let workspace = self
            .window_workspace(window)
            .ok_or_else(|| HostError::new("focus_window", format!("{} is not valid", window)))?;
        if workspace != self.current {
            self.switch_workspace(workspace);
        }
        self.set_focus(workspace, window);
        Ok(())
    }

    fn close_window(&mut self, window: WindowId) -> Result<(), HostError> {
        self.check_failure("close_window")?;
        self.remove_window(window)
            .map(|_| ())
            .ok_or_else(|| HostError::new("close_window", format!("{} is not valid", window)))
    }

    fn split_blank(&mut self, window: WindowId) -> Result<WindowId, HostError> {
        self.check_failure("split_blank")?;
        let workspace = self
            .window_workspace(window)
            .ok_or_else(|| HostError::new("split_blank", format!("{} is not valid", window)))?;
        let content = self.add_content(None);
        let blank = self.add_window(workspace, content);
        self.events.push(HostEvent::WindowSurfaced {
            window: blank,
            content: Some(content),
        });
        Ok(blank)
    }

    fn close_workspace(&mut self, workspace: WorkspaceId) -> Result<(), HostError> {
        self.check_failure("close_workspace")?;
        if self.workspace(workspace).is_none() {
            return Err(HostError::new("close_workspace", format!("{} is not valid", workspace)));
        }
        if self.workspaces.len() == 1 {
            return Err(HostError::new("close_workspace", "cannot close the last workspace"));
        }
        for window in self.workspace_windows(workspace) {
            if self.windows.remove(&window).is_some() {
                self.events.push(HostEvent::WindowClosed { window, workspace });
            }
        }
        self.drop_workspace(workspace);
        Ok(())
    }

    fn quit(&mut self) {
        self.has_quit = true;
    }
}
