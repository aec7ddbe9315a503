//! Lifecycle orchestrator
//!
//! Owns every panel instance, in registration order, and reacts to host
//! lifecycle events. Constructed once by the embedding application and
//! passed to whatever needs to enumerate or resolve panels.
//!
//! Ownership questions are answered first-match-wins in registration order,
//! so catch-all panels should be registered last or use narrow predicates.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};
use crate::host::{ContentId, Host, WindowId, WorkspaceId};
use crate::messages::{HostEvent, PanelMsg};
use crate::panel::{
    CloseOptions, OwnershipReason, PanelConfig, PanelHooks, PanelId, PanelInstance,
};

/// Order in which panels receive the startup hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupOrder {
    /// Registration order
    #[default]
    Registration,
    /// Left, right, above, below, float; registration order within a position
    Position,
}

/// Work deferred to the host's next event-loop turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Bring every panel in line with its open intent in the current workspace
    Reconcile { skip_close: bool },
}

/// Registry of panels and host event reactions
#[derive(Debug, Default)]
pub struct Orchestrator {
    panels: Vec<PanelInstance>,
    startup_order: StartupOrder,
    pending: VecDeque<Deferred>,
    /// Set by `WorkspaceNew`, consumed by the next `WorkspaceEntered`
    workspace_created: bool,
}

impl Orchestrator {
    pub fn new(startup_order: StartupOrder) -> Self {
        Self {
            startup_order,
            ..Self::default()
        }
    }

    /// Add a panel; it lives for as long as the orchestrator
    pub fn register(&mut self, config: PanelConfig, hooks: PanelHooks) -> PanelId {
        let id = PanelId(self.panels.len());
        tracing::debug!(panel = %config.name, %id, position = ?config.position, "registered panel");
        self.panels.push(PanelInstance::new(id, config, hooks));
        id
    }

    pub fn panels(&self) -> &[PanelInstance] {
        &self.panels
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelInstance> {
        self.panels.get(id.0)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut PanelInstance> {
        self.panels.get_mut(id.0)
    }

    /// Look a panel up by configured name
    pub fn find(&self, name: &str) -> Option<PanelId> {
        self.panels.iter().find(|p| p.name() == name).map(|p| p.id())
    }

    pub fn startup_order(&self) -> StartupOrder {
        self.startup_order
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    // ========================================================================
    // Ownership resolution
    // ========================================================================

    /// First panel (in registration order) owning a window
    pub fn resolve_window(
        &self,
        host: &dyn Host,
        window: WindowId,
        reason: OwnershipReason,
    ) -> Option<PanelId> {
        self.panels
            .iter()
            .find(|p| p.is_owned_window(host, window, reason))
            .map(|p| p.id())
    }

    /// First panel (in registration order) owning a content
    pub fn resolve_content(
        &self,
        host: &dyn Host,
        content: ContentId,
        reason: OwnershipReason,
    ) -> Option<PanelId> {
        self.panels
            .iter()
            .find(|p| p.is_owned_content(host, content, reason))
            .map(|p| p.id())
    }

    // ========================================================================
    // Panel operations
    // ========================================================================

    pub fn dispatch(&mut self, host: &mut dyn Host, id: PanelId, msg: PanelMsg) -> PanelResult<()> {
        let panel = self
            .panels
            .get_mut(id.0)
            .ok_or_else(|| PanelError::UnknownPanel(id.to_string()))?;

        match msg {
            PanelMsg::Open(options) => panel.open(host, options),
            PanelMsg::Close(options) => panel.close(host, options),
            PanelMsg::Toggle(options) => panel.toggle(host, options),
            PanelMsg::FocusOrToggle => panel.focus_or_toggle(host),
            PanelMsg::Go(distance) => panel.go(host, distance),
            PanelMsg::ToggleZoom => panel.toggle_zoom(host),
            PanelMsg::Focus => panel.focus(host),
            PanelMsg::Claim(window) => panel.claim(host, window),
            PanelMsg::SetExtent(extent) => panel.set_extent(host, extent),
        }
    }

    // ========================================================================
    // Host events
    // ========================================================================

    pub fn handle_event(&mut self, host: &mut dyn Host, event: HostEvent) -> PanelResult<()> {
        tracing::debug!(?event, "host event");
        match event {
            HostEvent::Startup => self.on_startup(host),
            HostEvent::WorkspaceNew(_) => {
                self.workspace_created = true;
                Ok(())
            }
            HostEvent::WorkspaceEntered(_) => {
                // Content names of the new workspace settle only after this
                // event, so reconciliation waits for the next loop turn
                let skip_close = std::mem::take(&mut self.workspace_created);
                self.pending.push_back(Deferred::Reconcile { skip_close });
                Ok(())
            }
            HostEvent::WorkspaceLeft(workspace) => {
                self.on_workspace_left(&*host, workspace);
                Ok(())
            }
            HostEvent::Resized(_) => self.on_resized(host),
            HostEvent::ContentDestroyed(content) => {
                self.on_content_destroyed(&*host, content);
                Ok(())
            }
            HostEvent::WindowSurfaced { window, .. } => self.on_window_surfaced(host, window),
            HostEvent::WindowClosed { window, workspace } => {
                self.on_window_closed(host, window, workspace)
            }
        }
    }

    /// Run work deferred to this loop turn
    pub fn tick(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        let mut first_error = None;
        while let Some(task) = self.pending.pop_front() {
            match task {
                Deferred::Reconcile { skip_close } => {
                    if let Err(e) = self.reconcile(host, skip_close) {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn on_startup(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        let mut order: Vec<usize> = (0..self.panels.len()).collect();
        if self.startup_order == StartupOrder::Position {
            order.sort_by_key(|&i| self.panels[i].config().position.startup_rank());
        }

        let mut first_error = None;
        for index in order {
            let panel = &mut self.panels[index];
            if let Err(e) = panel.host_ready(host) {
                tracing::warn!(panel = %panel.name(), "startup failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn reconcile(&mut self, host: &mut dyn Host, skip_close: bool) -> PanelResult<()> {
        let workspace = host.current_workspace();
        tracing::debug!(%workspace, skip_close, "reconciling panels");

        let mut first_error = None;
        for panel in &mut self.panels {
            let result = if panel.is_open() {
                panel.open(host, Default::default())
            } else if skip_close {
                Ok(())
            } else {
                panel.close(host, CloseOptions::default())
            };
            if let Err(e) = result {
                tracing::warn!(panel = %panel.name(), "reconcile failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn on_workspace_left(&mut self, host: &dyn Host, workspace: WorkspaceId) {
        for panel in self.panels.iter_mut().filter(|p| p.is_open()) {
            panel.snapshot_workspace(host, workspace);
        }
    }

    fn on_resized(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        let mut first_error = None;
        for panel in self.panels.iter_mut().filter(|p| p.is_float()) {
            if let Err(e) = panel.reapply_geometry(host) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn on_content_destroyed(&mut self, host: &dyn Host, content: ContentId) {
        for panel in &mut self.panels {
            if panel.is_owned_content(host, content, OwnershipReason::ContentDestroyed) {
                tracing::debug!(panel = %panel.name(), %content, "content destroyed");
                panel.forget_content(content);
            }
        }
    }

    fn on_window_surfaced(&mut self, host: &mut dyn Host, window: WindowId) -> PanelResult<()> {
        if !host.is_window_valid(window) || self.panels.iter().any(|p| p.state().is_tracked(window))
        {
            return Ok(());
        }

        let claimant = self.panels.iter().position(|p| {
            p.config().claim_new_window
                && p.is_owned_window(&*host, window, OwnershipReason::WorkspaceWindowEntered)
        });
        match claimant {
            Some(index) => self.panels[index].claim(host, window),
            None => Ok(()),
        }
    }

    fn on_window_closed(
        &mut self,
        host: &mut dyn Host,
        window: WindowId,
        workspace: WorkspaceId,
    ) -> PanelResult<()> {
        let mut was_panel = false;
        for panel in &mut self.panels {
            was_panel |= panel.forget_window(window);
        }
        if was_panel {
            return Ok(());
        }

        let remaining: Vec<WindowId> = host
            .workspace_windows(workspace)
            .into_iter()
            .filter(|w| *w != window)
            .collect();
        let only_panels = !remaining.is_empty()
            && remaining
                .iter()
                .all(|w| self.resolve_window(&*host, *w, OwnershipReason::Lookup).is_some());
        if !only_panels {
            return Ok(());
        }

        // Nothing left to interact with in this workspace
        if host.workspaces().len() > 1 {
            tracing::debug!(%workspace, "only panels remain, closing workspace");
            host.close_workspace(workspace)?;
        } else {
            tracing::debug!(%workspace, "only panels remain in last workspace, quitting");
            host.quit();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::panel::{OpenOptions, Position};

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut orchestrator = Orchestrator::default();
        let a = orchestrator.register(PanelConfig::new("a", Position::Left, 20), PanelHooks::new());
        let b = orchestrator.register(PanelConfig::new("b", Position::Below, 10), PanelHooks::new());
        assert_eq!(a, PanelId(0));
        assert_eq!(b, PanelId(1));
        assert_eq!(orchestrator.find("b"), Some(b));
        assert_eq!(orchestrator.find("c"), None);
    }

    #[test]
    fn test_dispatch_unknown_panel() {
        let mut orchestrator = Orchestrator::default();
        let mut host = MemoryHost::default();
        let result = orchestrator.dispatch(&mut host, PanelId(3), PanelMsg::ToggleZoom);
        assert!(matches!(result, Err(PanelError::UnknownPanel(_))));
    }

    #[test]
    fn test_workspace_entered_defers_reconcile() {
        let mut orchestrator = Orchestrator::default();
        let mut host = MemoryHost::default();
        let id = orchestrator.register(PanelConfig::new("term", Position::Below, 10), PanelHooks::new());
        orchestrator
            .dispatch(&mut host, id, PanelMsg::Open(OpenOptions::default()))
            .unwrap();

        let workspace = host.new_workspace();
        host.take_events();
        orchestrator
            .handle_event(&mut host, HostEvent::WorkspaceEntered(workspace))
            .unwrap();
        assert!(orchestrator.has_pending());
        assert!(orchestrator.panel(id).unwrap().window(&host).is_none());

        orchestrator.tick(&mut host).unwrap();
        assert!(!orchestrator.has_pending());
        assert!(orchestrator.panel(id).unwrap().window(&host).is_some());
    }

    #[test]
    fn test_resolve_is_first_match() {
        let mut orchestrator = Orchestrator::default();
        let host = MemoryHost::default();
        let window = host.workspace_windows(host.current_workspace())[0];
        let first = orchestrator.register(
            PanelConfig::new("first", Position::Left, 20),
            PanelHooks::new().owns_window(|_, _| true),
        );
        orchestrator.register(
            PanelConfig::new("second", Position::Right, 20),
            PanelHooks::new().owns_window(|_, _| true),
        );
        assert_eq!(
            orchestrator.resolve_window(&host, window, OwnershipReason::Lookup),
            Some(first)
        );
    }
}
