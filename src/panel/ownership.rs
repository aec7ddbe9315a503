//! Ownership resolver
//!
//! Decides whether a window or content belongs to a panel. Tracked bindings
//! and the content registry answer first; the user predicates registered on
//! `PanelHooks` only extend that set.
//!
//! A window is never owned by inference: showing a panel content does not
//! make a window a panel window unless it is tracked or a predicate says so.
//! Predicates get `content_tracked` so they can opt into that rule.

use super::hooks::{OwnershipQuery, OwnershipReason};
use super::instance::PanelInstance;
use crate::host::{ContentId, Host, WindowId};

impl PanelInstance {
    pub fn is_owned_window(
        &self,
        host: &dyn Host,
        window: WindowId,
        reason: OwnershipReason,
    ) -> bool {
        if self.state.is_tracked(window) {
            return true;
        }
        let Some(predicate) = &self.hooks.owns_window else {
            return false;
        };

        let content = host.window_content(window);
        let query = OwnershipQuery {
            panel: self.id,
            panel_name: &self.config.name,
            window: Some(window),
            content,
            content_tracked: content.map_or(false, |c| self.state.is_registered(c)),
            reason,
        };
        predicate(&query, host)
    }

    pub fn is_owned_content(
        &self,
        host: &dyn Host,
        content: ContentId,
        reason: OwnershipReason,
    ) -> bool {
        if self.state.is_registered(content) || self.state.is_displayed(content) {
            return true;
        }
        let Some(predicate) = &self.hooks.owns_content else {
            return false;
        };

        let query = OwnershipQuery {
            panel: self.id,
            panel_name: &self.config.name,
            window: None,
            content: Some(content),
            content_tracked: false,
            reason,
        };
        predicate(&query, host)
    }
}
