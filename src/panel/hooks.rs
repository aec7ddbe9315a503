//! Lifecycle hooks and ownership predicates
//!
//! Hooks are side-effecting callbacks the core invokes at fixed points of an
//! operation. Each timing has its own `PanelEvent` variant carrying only the
//! fields valid at that moment: "outside" events fire before a window exists
//! (or after it is gone) and carry no window id.

use std::collections::HashMap;

use super::PanelId;
use crate::host::{ContentId, Host, WindowId};

/// Payload handed to hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Once, at host startup
    HostReady { panel: PanelId },
    /// Before a new content is allocated
    WillCreateContent { panel: PanelId },
    /// After a new content is shown in its first window
    DidCreateContent {
        panel: PanelId,
        window: WindowId,
        content: ContentId,
    },
    /// Before a panel window is created
    WillOpenWindow { panel: PanelId },
    DidOpenWindow {
        panel: PanelId,
        window: WindowId,
        content: ContentId,
    },
    /// Before `content` is bound to the panel window
    WillOpenContent { panel: PanelId, content: ContentId },
    DidOpenContent {
        panel: PanelId,
        window: WindowId,
        content: ContentId,
    },
    /// Before every close request, even when nothing is open
    WillClose { panel: PanelId },
    /// After the panel window is destroyed
    DidClose { panel: PanelId },
    /// End of every open request
    DidOpenOperationComplete {
        panel: PanelId,
        window: WindowId,
        content: ContentId,
    },
}

/// Hook slot identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    HostReady,
    WillCreateContent,
    DidCreateContent,
    WillOpenWindow,
    DidOpenWindow,
    WillOpenContent,
    DidOpenContent,
    WillClose,
    DidClose,
    DidOpenOperationComplete,
}

impl PanelEvent {
    pub fn kind(&self) -> HookKind {
        match self {
            PanelEvent::HostReady { .. } => HookKind::HostReady,
            PanelEvent::WillCreateContent { .. } => HookKind::WillCreateContent,
            PanelEvent::DidCreateContent { .. } => HookKind::DidCreateContent,
            PanelEvent::WillOpenWindow { .. } => HookKind::WillOpenWindow,
            PanelEvent::DidOpenWindow { .. } => HookKind::DidOpenWindow,
            PanelEvent::WillOpenContent { .. } => HookKind::WillOpenContent,
            PanelEvent::DidOpenContent { .. } => HookKind::DidOpenContent,
            PanelEvent::WillClose { .. } => HookKind::WillClose,
            PanelEvent::DidClose { .. } => HookKind::DidClose,
            PanelEvent::DidOpenOperationComplete { .. } => HookKind::DidOpenOperationComplete,
        }
    }

    pub fn panel(&self) -> PanelId {
        match *self {
            PanelEvent::HostReady { panel }
            | PanelEvent::WillCreateContent { panel }
            | PanelEvent::DidCreateContent { panel, .. }
            | PanelEvent::WillOpenWindow { panel }
            | PanelEvent::DidOpenWindow { panel, .. }
            | PanelEvent::WillOpenContent { panel, .. }
            | PanelEvent::DidOpenContent { panel, .. }
            | PanelEvent::WillClose { panel }
            | PanelEvent::DidClose { panel }
            | PanelEvent::DidOpenOperationComplete { panel, .. } => panel,
        }
    }

    /// Window the hook runs inside, for "inside" timings
    pub fn window(&self) -> Option<WindowId> {
        match *self {
            PanelEvent::DidCreateContent { window, .. }
            | PanelEvent::DidOpenWindow { window, .. }
            | PanelEvent::DidOpenContent { window, .. }
            | PanelEvent::DidOpenOperationComplete { window, .. } => Some(window),
            _ => None,
        }
    }
}

/// Why the resolver is being asked about ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipReason {
    /// Ordinary lookup (commands, bookkeeping)
    Lookup,
    /// A window surfaced in the current workspace and may be claimed
    WorkspaceWindowEntered,
    /// A content is being torn down
    ContentDestroyed,
}

/// Context handed to ownership predicates
#[derive(Debug, Clone, Copy)]
pub struct OwnershipQuery<'a> {
    pub panel: PanelId,
    pub panel_name: &'a str,
    pub window: Option<WindowId>,
    pub content: Option<ContentId>,
    /// Whether `content` is already in the panel's registry
    pub content_tracked: bool,
    pub reason: OwnershipReason,
}

pub type Hook = Box<dyn FnMut(&PanelEvent, &mut dyn Host)>;
pub type OwnershipPredicate = Box<dyn Fn(&OwnershipQuery<'_>, &dyn Host) -> bool>;

/// Callbacks attached to a panel at registration time
#[derive(Default)]
pub struct PanelHooks {
    hooks: HashMap<HookKind, Vec<Hook>>,
    pub(crate) owns_window: Option<OwnershipPredicate>,
    pub(crate) owns_content: Option<OwnershipPredicate>,
}

impl std::fmt::Debug for PanelHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<String> = self
            .hooks
            .iter()
            .map(|(kind, list)| format!("{:?}x{}", kind, list.len()))
            .collect();
        kinds.sort();
        f.debug_struct("PanelHooks")
            .field("hooks", &kinds)
            .field("owns_window", &self.owns_window.is_some())
            .field("owns_content", &self.owns_content.is_some())
            .finish()
    }
}

impl PanelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one hook timing
    pub fn on(
        mut self,
        kind: HookKind,
        hook: impl FnMut(&PanelEvent, &mut dyn Host) + 'static,
    ) -> Self {
        self.hooks.entry(kind).or_default().push(Box::new(hook));
        self
    }

    /// Extend window ownership beyond the panel's own bindings
    pub fn owns_window(
        mut self,
        predicate: impl Fn(&OwnershipQuery<'_>, &dyn Host) -> bool + 'static,
    ) -> Self {
        self.owns_window = Some(Box::new(predicate));
        self
    }

    /// Extend content ownership beyond the panel's own registry
    pub fn owns_content(
        mut self,
        predicate: impl Fn(&OwnershipQuery<'_>, &dyn Host) -> bool + 'static,
    ) -> Self {
        self.owns_content = Some(Box::new(predicate));
        self
    }

    /// Invoke every callback registered for the event's timing
    pub fn emit(&mut self, event: PanelEvent, host: &mut dyn Host) {
        if let Some(list) = self.hooks.get_mut(&event.kind()) {
            tracing::trace!(?event, listeners = list.len(), "emit hook");
            for hook in list.iter_mut() {
                hook(&event, &mut *host);
            }
        }
    }
}
