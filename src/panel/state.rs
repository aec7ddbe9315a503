//! Mutable panel state
//!
//! One record per panel, shared by every workspace: a panel is one logical
//! object, so its size and content registry are global while its window
//! bindings are per-workspace host windows.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::host::{ContentId, WindowId};

/// State of a single panel
#[derive(Debug, Clone, Serialize)]
pub struct PanelState {
    /// Intended open/closed status, independent of any workspace
    pub is_open: bool,

    /// Last known extent along the split axis
    pub size: u32,

    /// Temporarily expanded to fill the screen
    pub is_zoomed: bool,

    /// Content shown last; the default on reopen
    pub previous: Option<ContentId>,

    /// Every content created for this panel, in creation order
    registry: Vec<ContentId>,

    /// Live panel windows and the content each displays
    bindings: HashMap<WindowId, ContentId>,

    /// Panel windows already gone whose close event has not arrived yet
    #[serde(skip)]
    retired: HashSet<WindowId>,
}

impl PanelState {
    pub fn new(size: u32) -> Self {
        Self {
            is_open: false,
            size,
            is_zoomed: false,
            previous: None,
            registry: Vec::new(),
            bindings: HashMap::new(),
            retired: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &[ContentId] {
        &self.registry
    }

    pub fn bindings(&self) -> &HashMap<WindowId, ContentId> {
        &self.bindings
    }

    pub fn is_registered(&self, content: ContentId) -> bool {
        self.registry.contains(&content)
    }

    pub fn is_tracked(&self, window: WindowId) -> bool {
        self.bindings.contains_key(&window)
    }

    pub fn bound_content(&self, window: WindowId) -> Option<ContentId> {
        self.bindings.get(&window).copied()
    }

    /// Whether any window currently displays `content`
    pub fn is_displayed(&self, content: ContentId) -> bool {
        self.bindings.values().any(|c| *c == content)
    }

    /// Add a content to the registry (no-op when already present)
    pub fn register(&mut self, content: ContentId) {
        if !self.registry.contains(&content) {
            self.registry.push(content);
        }
    }

    /// Record that `window` shows `content` and make it the reopen default
    pub fn bind(&mut self, window: WindowId, content: ContentId) {
        self.register(content);
        self.bindings.insert(window, content);
        self.previous = Some(content);
    }

    /// Stop tracking a window the panel closed itself
    ///
    /// It stays recognisable as a panel window until the host reports the
    /// close through [`PanelState::release`].
    pub fn retire(&mut self, window: WindowId) -> Option<ContentId> {
        self.retired.insert(window);
        self.bindings.remove(&window)
    }

    /// Forget a window the host closed; true when it was a panel window
    pub fn release(&mut self, window: WindowId) -> bool {
        let retired = self.retired.remove(&window);
        self.bindings.remove(&window).is_some() || retired
    }

    /// Retire bindings whose window the host no longer reports as valid
    pub fn retain_windows(&mut self, mut is_valid: impl FnMut(WindowId) -> bool) {
        let retired = &mut self.retired;
        self.bindings.retain(|window, _| {
            let keep = is_valid(*window);
            if !keep {
                retired.insert(*window);
            }
            keep
        });
    }

    /// Forget a destroyed content
    ///
    /// When the destroyed content was registered or was the reopen default,
    /// the default falls back to the newest remaining content.
    pub fn forget_content(&mut self, content: ContentId) {
        let registered = self.registry.contains(&content);
        self.registry.retain(|c| *c != content);
        self.bindings.retain(|_, c| *c != content);
        if registered || self.previous == Some(content) {
            self.previous = self.registry.last().copied();
        }
    }

    /// Content `distance` steps away from `previous`, wrapping around
    pub fn rotate(&self, distance: i64) -> Option<ContentId> {
        let previous = self.previous?;
        let index = self.registry.iter().position(|c| *c == previous)?;
        let len = self.registry.len() as i64;
        let target = (index as i64 + distance).rem_euclid(len);
        self.registry.get(target as usize).copied()
    }
}
