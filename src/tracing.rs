//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! panel lifecycle and workspace transition issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=dockhand::orchestrator=debug` - module-level filtering
//! - `RUST_LOG=dockhand::update=trace` - per-message panel state diffs
//!
//! # Log Files
//!
//! Logs are written to `~/.config/dockhand/logs/dockhand.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::host::{ContentId, WindowId};
use crate::panel::PanelInstance;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. File logging
/// writes to `~/.config/dockhand/logs/dockhand.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so scenario dumps on stdout stay parseable
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "dockhand.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of one panel's state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub name: String,
    pub is_open: bool,
    pub is_zoomed: bool,
    pub size: u32,
    pub previous: Option<ContentId>,
    pub registry_len: usize,
    pub windows: Vec<WindowId>,
}

impl PanelSnapshot {
    pub fn from_instance(panel: &PanelInstance) -> Self {
        let state = panel.state();
        let mut windows: Vec<WindowId> = state.bindings().keys().copied().collect();
        windows.sort();
        Self {
            name: panel.name().to_string(),
            is_open: state.is_open,
            is_zoomed: state.is_zoomed,
            size: state.size,
            previous: state.previous,
            registry_len: state.registry().len(),
            windows,
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &PanelSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.is_open != other.is_open {
            changes.push(format!("open: {} → {}", self.is_open, other.is_open));
        }
        if self.is_zoomed != other.is_zoomed {
            changes.push(format!("zoomed: {} → {}", self.is_zoomed, other.is_zoomed));
        }
        if self.size != other.size {
            changes.push(format!("size: {} → {}", self.size, other.size));
        }
        if self.previous != other.previous {
            changes.push(format!(
                "previous: {} → {}",
                describe(self.previous),
                describe(other.previous)
            ));
        }
        if self.registry_len != other.registry_len {
            changes.push(format!(
                "registry: {} → {}",
                self.registry_len, other.registry_len
            ));
        }
        if self.windows != other.windows {
            changes.push(format!(
                "windows: {} → {}",
                self.windows.len(),
                other.windows.len()
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe(content: Option<ContentId>) -> String {
    content.map_or_else(|| "none".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PanelConfig, PanelHooks, PanelId, Position};

    #[test]
    fn test_snapshot_diff_reports_changes() {
        let panel = PanelInstance::new(
            PanelId(0),
            PanelConfig::new("term", Position::Below, 10),
            PanelHooks::new(),
        );
        let before = PanelSnapshot::from_instance(&panel);
        assert_eq!(before.diff(&before.clone()), None);

        let mut after = before.clone();
        after.is_open = true;
        after.size = 14;
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("open: false → true; size: 10 → 14")
        );
    }
}
