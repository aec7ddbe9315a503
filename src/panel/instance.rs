//! Panel instance operations
//!
//! A `PanelInstance` is one persistent panel. The host only hands out
//! per-workspace windows, so every operation first resolves "the panel's
//! window in this workspace" from the tracked bindings, then decides whether
//! to reuse, create or rotate content.
//!
//! Stale handles are soft failures: operating on a window the host already
//! destroyed is a no-op, never an error.

use super::config::{PanelConfig, Position};
use super::geometry::{compute_window_placement, Placement};
use super::hooks::{OwnershipReason, PanelEvent, PanelHooks};
use super::state::PanelState;
use super::PanelId;
use crate::error::PanelResult;
use crate::host::{ContentId, Host, WindowId, WorkspaceId};

/// Which content `open` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// The reopen default if still valid, otherwise a new content
    #[default]
    ReuseOrNew,
    /// Always allocate a new content
    New,
    /// A specific content (used by `go`)
    Content(ContentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    pub focus: bool,
    pub mode: OpenMode,
}

impl OpenOptions {
    pub fn focused() -> Self {
        Self {
            focus: true,
            mode: OpenMode::ReuseOrNew,
        }
    }

    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseOptions {
    /// Capture the on-screen extent into the panel size before closing
    pub save_size: bool,
}

impl CloseOptions {
    pub fn saving_size() -> Self {
        Self { save_size: true }
    }
}

/// One persistent panel
#[derive(Debug)]
pub struct PanelInstance {
    pub(super) id: PanelId,
    pub(super) config: PanelConfig,
    pub(super) state: PanelState,
    pub(super) hooks: PanelHooks,
}

impl PanelInstance {
    pub fn new(id: PanelId, config: PanelConfig, hooks: PanelHooks) -> Self {
        let state = PanelState::new(config.size);
        Self {
            id,
            config,
            state,
            hooks,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.is_zoomed
    }

    // ========================================================================
    // Window lookup
    // ========================================================================

    /// The panel's live window in a workspace
    ///
    /// Panels keep at most one window per workspace; if a host race ever
    /// leaves two, the lowest id wins so lookups stay deterministic.
    pub fn window_in(&self, host: &dyn Host, workspace: WorkspaceId) -> Option<WindowId> {
        self.state
            .bindings()
            .keys()
            .copied()
            .filter(|w| host.is_window_valid(*w) && host.window_workspace(*w) == Some(workspace))
            .min()
    }

    /// The panel's live window in the current workspace
    pub fn window(&self, host: &dyn Host) -> Option<WindowId> {
        self.window_in(host, host.current_workspace())
    }

    /// Live windows tracked in any workspace
    pub fn live_windows(&self, host: &dyn Host) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self
            .state
            .bindings()
            .keys()
            .copied()
            .filter(|w| host.is_window_valid(*w))
            .collect();
        windows.sort();
        windows
    }

    /// Drop bindings for windows the host has invalidated
    pub fn prune_windows(&mut self, host: &dyn Host) {
        self.state.retain_windows(|w| host.is_window_valid(w));
    }

    /// Forget a window (closed by the host); true when it was ours
    pub fn forget_window(&mut self, window: WindowId) -> bool {
        self.state.release(window)
    }

    /// Forget a destroyed content
    pub fn forget_content(&mut self, content: ContentId) {
        self.state.forget_content(content);
    }

    /// Placement for the current screen, size and zoom state
    pub fn placement(&self, host: &dyn Host) -> PanelResult<Placement> {
        compute_window_placement(
            &self.config,
            self.state.size,
            host.screen_size(),
            self.state.is_zoomed,
        )
    }

    // ========================================================================
    // Open / close
    // ========================================================================

    /// Show the panel in the current workspace
    ///
    /// The open intent is recorded before any window exists. If geometry or
    /// a host primitive fails, the intent is rolled back to what it was.
    ///
    /// An existing window takes the stored size; its own extent may be stale
    /// from an earlier visit to this workspace.
    pub fn open(&mut self, host: &mut dyn Host, options: OpenOptions) -> PanelResult<()> {
        let was_open = self.state.is_open;
        self.state.is_open = true;

        let result = self.open_in_current_workspace(host, options);
        if let Err(e) = &result {
            tracing::warn!(panel = %self.config.name, "open failed: {}", e);
            self.state.is_open = was_open;
        }
        result
    }

    fn open_in_current_workspace(
        &mut self,
        host: &mut dyn Host,
        options: OpenOptions,
    ) -> PanelResult<()> {
        self.prune_windows(&*host);
        let panel = self.id;
        let existing = self.window(&*host);

        let target = self.resolve_target(&*host, existing, options.mode);
        // Geometry first: configuration errors abort before any side effect
        let placement = self.placement(&*host)?;

        let (window, content) = match existing {
            None => {
                let (content, created) = self.obtain_content(host, target)?;
                self.hooks.emit(PanelEvent::WillOpenWindow { panel }, host);
                self.hooks
                    .emit(PanelEvent::WillOpenContent { panel, content }, host);

                let window = host.open_window(content, &placement)?;
                host.set_window_flags(window, self.config.window_flags())?;

                // Embedded applications need an attached window to start
                if created {
                    self.hooks.emit(
                        PanelEvent::DidCreateContent {
                            panel,
                            window,
                            content,
                        },
                        host,
                    );
                }
                self.hooks.emit(
                    PanelEvent::DidOpenWindow {
                        panel,
                        window,
                        content,
                    },
                    host,
                );
                self.hooks.emit(
                    PanelEvent::DidOpenContent {
                        panel,
                        window,
                        content,
                    },
                    host,
                );
                (window, content)
            }
            Some(window) => {
                let (content, created) = self.obtain_content(host, target)?;
                self.hooks
                    .emit(PanelEvent::WillOpenContent { panel, content }, host);

                if host.window_content(window) != Some(content) {
                    host.set_window_content(window, content)?;
                }
                host.apply_placement(window, &placement)?;

                if created {
                    self.hooks.emit(
                        PanelEvent::DidCreateContent {
                            panel,
                            window,
                            content,
                        },
                        host,
                    );
                }
                self.hooks.emit(
                    PanelEvent::DidOpenContent {
                        panel,
                        window,
                        content,
                    },
                    host,
                );
                (window, content)
            }
        };

        if options.focus {
            host.focus_window(window)?;
        }

        self.hooks.emit(
            PanelEvent::DidOpenOperationComplete {
                panel,
                window,
                content,
            },
            host,
        );
        self.state.bind(window, content);

        tracing::debug!(
            panel = %self.config.name,
            %window,
            %content,
            reused_window = existing.is_some(),
            "panel opened"
        );
        Ok(())
    }

    /// Pick the content to show; `None` means allocate a new one
    fn resolve_target(
        &self,
        host: &dyn Host,
        window: Option<WindowId>,
        mode: OpenMode,
    ) -> Option<ContentId> {
        let candidate = match mode {
            OpenMode::New => None,
            OpenMode::Content(content) => Some(content),
            OpenMode::ReuseOrNew if self.config.reuse_previous_buffer => self.state.previous,
            OpenMode::ReuseOrNew => window.and_then(|w| self.state.bound_content(w)),
        };
        candidate.filter(|c| host.is_content_valid(*c))
    }

    /// Return the target content, creating one when needed
    fn obtain_content(
        &mut self,
        host: &mut dyn Host,
        target: Option<ContentId>,
    ) -> PanelResult<(ContentId, bool)> {
        if let Some(content) = target {
            return Ok((content, false));
        }

        self.hooks
            .emit(PanelEvent::WillCreateContent { panel: self.id }, host);
        let content = host.create_content()?;
        // Registered right away so a failed window open does not orphan it
        self.state.register(content);
        self.state.previous = Some(content);
        tracing::debug!(panel = %self.config.name, %content, "created content");
        Ok((content, true))
    }

    /// Hide the panel in the current workspace
    ///
    /// `WillClose` fires even when nothing is open. Content is never
    /// destroyed here; it stays in the registry for the next open.
    pub fn close(&mut self, host: &mut dyn Host, options: CloseOptions) -> PanelResult<()> {
        self.hooks
            .emit(PanelEvent::WillClose { panel: self.id }, host);
        self.state.is_open = false;

        self.prune_windows(&*host);
        let Some(window) = self.window(&*host) else {
            return Ok(());
        };

        if options.save_size {
            self.sync_size(&*host, window);
        }
        self.persist_binding(&*host, window);
        self.state.is_zoomed = false;

        host.close_window(window)?;
        self.state.retire(window);
        self.hooks.emit(PanelEvent::DidClose { panel: self.id }, host);

        tracing::debug!(panel = %self.config.name, %window, size = self.state.size, "panel closed");
        Ok(())
    }

    /// Close when visible in the current workspace, open otherwise
    pub fn toggle(&mut self, host: &mut dyn Host, options: OpenOptions) -> PanelResult<()> {
        if self.window(&*host).is_some() {
            self.close(host, CloseOptions::saving_size())
        } else {
            self.open(host, options)
        }
    }

    /// One shortcut to open-and-focus, refocus, or close when focused
    pub fn focus_or_toggle(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        match self.window(&*host) {
            None => self.open(host, OpenOptions::focused()),
            Some(window) if host.focused_window() == Some(window) => {
                self.close(host, CloseOptions::saving_size())
            }
            Some(window) => {
                host.focus_window(window)?;
                Ok(())
            }
        }
    }

    /// Move input focus to the panel window, if it is visible
    pub fn focus(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        if let Some(window) = self.window(&*host) {
            host.focus_window(window)?;
        }
        Ok(())
    }

    // ========================================================================
    // Navigation and zoom
    // ========================================================================

    /// Rotate the displayed content `distance` steps through the registry
    pub fn go(&mut self, host: &mut dyn Host, distance: i64) -> PanelResult<()> {
        if self.window(&*host).is_none() {
            return Ok(());
        }
        let Some(target) = self.state.rotate(distance) else {
            tracing::debug!(panel = %self.config.name, "go: no anchor content in registry");
            return Ok(());
        };
        self.open(
            host,
            OpenOptions::default().with_mode(OpenMode::Content(target)),
        )
    }

    /// Expand to fill the screen, or restore the saved placement
    pub fn toggle_zoom(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        let Some(window) = self.window(&*host) else {
            return Ok(());
        };

        if !self.state.is_zoomed {
            self.sync_size(&*host, window);
        }
        self.state.is_zoomed = !self.state.is_zoomed;

        let placement = match self.placement(&*host) {
            Ok(placement) => placement,
            Err(e) => {
                self.state.is_zoomed = !self.state.is_zoomed;
                return Err(e);
            }
        };
        host.apply_placement(window, &placement)?;
        tracing::debug!(panel = %self.config.name, zoomed = self.state.is_zoomed, "toggled zoom");
        Ok(())
    }

    // ========================================================================
    // Claiming foreign windows
    // ========================================================================

    /// Adopt a window the host created outside the panel API
    pub fn claim(&mut self, host: &mut dyn Host, window: WindowId) -> PanelResult<()> {
        let (Some(workspace), Some(content)) =
            (host.window_workspace(window), host.window_content(window))
        else {
            return Ok(());
        };

        // Never leave the workspace showing only the panel; our own window
        // there is about to close, so it does not count
        let others = host
            .workspace_windows(workspace)
            .into_iter()
            .filter(|w| *w != window && !self.state.is_tracked(*w))
            .count();
        if others == 0 {
            let blank = host.split_blank(window)?;
            tracing::debug!(panel = %self.config.name, %blank, "split blank window before claim");
        }

        if let Some(existing) = self.window_in(&*host, workspace).filter(|w| *w != window) {
            self.persist_binding(&*host, existing);
            host.close_window(existing)?;
            self.state.retire(existing);
        }

        self.state.bind(window, content);
        host.set_window_flags(window, self.config.window_flags())?;
        tracing::debug!(panel = %self.config.name, %window, %content, "claimed window");

        // The adopted window takes the panel's geometry, not the other way round
        if workspace == host.current_workspace() {
            self.open(host, OpenOptions::default())
        } else {
            self.state.is_open = true;
            Ok(())
        }
    }

    // ========================================================================
    // Extent
    // ========================================================================

    /// Extent of the panel window along its split axis
    ///
    /// Zoomed panels report the saved pre-zoom size; floating panels report
    /// the stored size since their geometry comes from configuration.
    pub fn get_extent(&self, host: &dyn Host) -> Option<u32> {
        let window = self.window(host)?;
        self.extent_of(host, window)
    }

    fn extent_of(&self, host: &dyn Host, window: WindowId) -> Option<u32> {
        if self.state.is_zoomed {
            return Some(self.state.size);
        }
        match self.config.position.axis() {
            Some(axis) => host.window_extent(window, axis),
            None => Some(self.state.size),
        }
    }

    /// Set the panel size, resizing the visible window when not zoomed
    pub fn set_extent(&mut self, host: &mut dyn Host, extent: u32) -> PanelResult<()> {
        self.state.size = extent;
        if self.state.is_zoomed {
            return Ok(());
        }
        if let (Some(window), Some(axis)) = (self.window(&*host), self.config.position.axis()) {
            host.set_window_extent(window, axis, extent)?;
        }
        Ok(())
    }

    fn sync_size(&mut self, host: &dyn Host, window: WindowId) {
        if let Some(extent) = self.extent_of(host, window) {
            self.state.size = extent;
        }
    }

    /// Record what a window shows right now, if the content is ours
    fn persist_binding(&mut self, host: &dyn Host, window: WindowId) {
        if let Some(content) = host.window_content(window) {
            if self.is_owned_content(host, content, OwnershipReason::Lookup) {
                self.state.bind(window, content);
            }
        }
    }

    // ========================================================================
    // Host event reactions
    // ========================================================================

    /// Save size and binding of the window in a workspace being left
    pub fn snapshot_workspace(&mut self, host: &dyn Host, workspace: WorkspaceId) {
        if let Some(window) = self.window_in(host, workspace) {
            self.sync_size(host, window);
            self.persist_binding(host, window);
        }
    }

    /// Re-apply geometry to every live window (floating panels on resize)
    pub fn reapply_geometry(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        self.prune_windows(&*host);
        let windows = self.live_windows(&*host);
        if windows.is_empty() {
            return Ok(());
        }
        let placement = self.placement(&*host)?;
        for window in windows {
            host.apply_placement(window, &placement)?;
        }
        Ok(())
    }

    /// Run the startup hook, then open if configured to
    pub fn host_ready(&mut self, host: &mut dyn Host) -> PanelResult<()> {
        self.hooks
            .emit(PanelEvent::HostReady { panel: self.id }, host);
        if self.config.open_on_startup {
            self.open(host, OpenOptions::default())?;
        }
        Ok(())
    }

    pub fn is_float(&self) -> bool {
        self.config.position == Position::Float
    }
}
