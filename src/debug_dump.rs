//! State dump for diagnostics
//!
//! Serializes a snapshot of the host and every panel to JSON. The scenario
//! runner prints one after the last step.

use serde::Serialize;

use crate::host::{ContentId, Host, MemoryHost, ScreenSize, WindowFlags, WindowId, WorkspaceId};
use crate::orchestrator::Orchestrator;
use crate::panel::{Edge, OwnershipReason, Position};

#[derive(Debug, Serialize)]
pub struct StateDump {
    pub screen: ScreenSize,
    pub current_workspace: WorkspaceId,
    pub has_quit: bool,
    pub workspaces: Vec<WorkspaceDump>,
    pub panels: Vec<PanelDump>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceDump {
    pub id: WorkspaceId,
    pub focused: Option<WindowId>,
    pub windows: Vec<WindowDump>,
}

#[derive(Debug, Serialize)]
pub struct WindowDump {
    pub id: WindowId,
    pub content: ContentId,
    pub content_name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub edge: Option<Edge>,
    pub float_origin: Option<(u32, u32)>,
    pub flags: WindowFlags,
    /// Name of the owning panel, if any
    pub panel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PanelDump {
    pub name: String,
    pub position: Position,
    pub is_open: bool,
    pub is_zoomed: bool,
    pub size: u32,
    pub extent: Option<u32>,
    pub previous: Option<ContentId>,
    pub registry: Vec<ContentId>,
    /// (window, content) pairs sorted by window
    pub bindings: Vec<(WindowId, ContentId)>,
}

impl StateDump {
    pub fn capture(orchestrator: &Orchestrator, host: &MemoryHost) -> Self {
        let workspaces = host
            .workspace_records()
            .iter()
            .map(|ws| WorkspaceDump {
                id: ws.id,
                focused: ws.focused,
                windows: ws
                    .windows
                    .iter()
                    .filter_map(|w| host.window_record(*w))
                    .map(|record| WindowDump {
                        id: record.id,
                        content: record.content,
                        content_name: host.content_name(record.content),
                        width: record.width,
                        height: record.height,
                        edge: record.edge,
                        float_origin: record.float_origin,
                        flags: record.flags,
                        panel: orchestrator
                            .resolve_window(host, record.id, OwnershipReason::Lookup)
                            .and_then(|id| orchestrator.panel(id))
                            .map(|p| p.name().to_string()),
                    })
                    .collect(),
            })
            .collect();

        let panels = orchestrator
            .panels()
            .iter()
            .map(|panel| {
                let state = panel.state();
                let mut bindings: Vec<(WindowId, ContentId)> =
                    state.bindings().iter().map(|(w, c)| (*w, *c)).collect();
                bindings.sort();
                PanelDump {
                    name: panel.name().to_string(),
                    position: panel.config().position,
                    is_open: state.is_open,
                    is_zoomed: state.is_zoomed,
                    size: state.size,
                    extent: panel.get_extent(host),
                    previous: state.previous,
                    registry: state.registry().to_vec(),
                    bindings,
                }
            })
            .collect();

        Self {
            screen: host.screen_size(),
            current_workspace: host.current_workspace(),
            has_quit: host.has_quit(),
            workspaces,
            panels,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Short human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "screen {}x{}, {} workspace(s), current {}{}",
            self.screen.columns,
            self.screen.lines,
            self.workspaces.len(),
            self.current_workspace,
            if self.has_quit { ", quit" } else { "" }
        )];
        for panel in &self.panels {
            let status = match (panel.is_open, panel.is_zoomed) {
                (true, true) => "open (zoomed)",
                (true, false) => "open",
                (false, _) => "closed",
            };
            lines.push(format!(
                "  {:<12} {:<6} {:<14} size {:>3}  contents {}  windows {}",
                panel.name,
                format!("{:?}", panel.position).to_lowercase(),
                status,
                panel.size,
                panel.registry.len(),
                panel.bindings.len()
            ));
        }
        lines.join("\n")
    }
}
