//! Scripted scenarios replayed against the in-memory host
//!
//! A scenario is a YAML file with an optional screen size, optional inline
//! panel definitions and a list of steps:
//!
//! ```yaml
//! screen: { columns: 120, lines: 40 }
//! panels:
//!   - name: term
//!     position: left
//!     size: 20
//! steps:
//!   - startup
//!   - open: { panel: term, focus: true }
//!   - zoom: { panel: term }
//!   - new_workspace: {}
//! ```
//!
//! After each step, queued host events and deferred ticks are pumped until
//! the system settles. Panels with `claim_new_window` claim windows whose
//! content name starts with `<panel name>://`.

use serde::Deserialize;

use crate::config::DockhandConfig;
use crate::debug_dump::StateDump;
use crate::error::{PanelError, PanelResult};
use crate::host::{ContentId, Host, MemoryHost, ScreenSize, WindowId, WorkspaceId};
use crate::messages::{Msg, PanelMsg};
use crate::orchestrator::Orchestrator;
use crate::panel::{CloseOptions, OpenMode, OpenOptions, PanelConfig, PanelHooks, PanelId};
use crate::update::{pump, update};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub screen: ScreenSize,
    /// Inline panel definitions, used when no config file is given
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Panel definitions from the scenario itself
    pub fn inline_config(&self) -> DockhandConfig {
        DockhandConfig {
            panels: self.panels.clone(),
            ..DockhandConfig::default()
        }
    }
}

/// One scripted action
///
/// Windows default to the focused one when `window` is omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Startup,
    Open {
        panel: String,
        #[serde(default)]
        focus: bool,
        #[serde(default)]
        new: bool,
    },
    Close {
        panel: String,
        #[serde(default)]
        save_size: bool,
    },
    Toggle {
        panel: String,
    },
    FocusOrToggle {
        panel: String,
    },
    Go {
        panel: String,
        distance: i64,
    },
    Zoom {
        panel: String,
    },
    Claim {
        panel: String,
        #[serde(default)]
        window: Option<u64>,
    },
    SetExtent {
        panel: String,
        extent: u32,
    },
    NewWorkspace {
        /// Open a named content (a file) instead of a blank one
        #[serde(default)]
        file: Option<String>,
    },
    SwitchWorkspace {
        workspace: u64,
    },
    Split {
        #[serde(default)]
        name: Option<String>,
    },
    CloseWindow {
        #[serde(default)]
        window: Option<u64>,
    },
    DeleteContent {
        /// Content id; defaults to the focused window's content
        #[serde(default)]
        content: Option<u64>,
        /// Delete this panel's reopen default instead
        #[serde(default)]
        panel: Option<String>,
    },
    Resize {
        columns: u32,
        lines: u32,
    },
    SurfaceWindow {
        #[serde(default)]
        window: Option<u64>,
    },
}

/// Drives an orchestrator and a `MemoryHost` through scenario steps
pub struct ScenarioRunner {
    orchestrator: Orchestrator,
    host: MemoryHost,
}

impl ScenarioRunner {
    pub fn new(config: &DockhandConfig, screen: ScreenSize) -> Self {
        let mut orchestrator = Orchestrator::new(config.startup_order);
        for panel in &config.panels {
            orchestrator.register(panel.clone(), hooks_for(panel));
        }
        Self {
            orchestrator,
            host: MemoryHost::new(screen),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn host(&self) -> &MemoryHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut MemoryHost {
        &mut self.host
    }

    /// Run every step, stopping at the first failure
    ///
    /// The error carries the zero-based index of the failing step.
    pub fn run(&mut self, steps: &[Step]) -> Result<(), (usize, PanelError)> {
        for (index, step) in steps.iter().enumerate() {
            self.step(step).map_err(|e| (index, e))?;
        }
        Ok(())
    }

    /// Apply one step and let the system settle
    pub fn step(&mut self, step: &Step) -> PanelResult<()> {
        tracing::debug!(?step, "scenario step");
        let result = self.apply(step);
        let settled = pump(&mut self.orchestrator, &mut self.host);
        result.and(settled.map(|_| ()))
    }

    pub fn dump(&self) -> StateDump {
        StateDump::capture(&self.orchestrator, &self.host)
    }

    fn apply(&mut self, step: &Step) -> PanelResult<()> {
        match step {
            Step::Startup => {
                self.host.start();
                Ok(())
            }
            Step::Open { panel, focus, new } => {
                let mode = if *new {
                    OpenMode::New
                } else {
                    OpenMode::ReuseOrNew
                };
                let options = OpenOptions {
                    focus: *focus,
                    mode,
                };
                self.send(panel, PanelMsg::Open(options))
            }
            Step::Close { panel, save_size } => self.send(
                panel,
                PanelMsg::Close(CloseOptions {
                    save_size: *save_size,
                }),
            ),
            Step::Toggle { panel } => self.send(panel, PanelMsg::Toggle(OpenOptions::default())),
            Step::FocusOrToggle { panel } => self.send(panel, PanelMsg::FocusOrToggle),
            Step::Go { panel, distance } => self.send(panel, PanelMsg::Go(*distance)),
            Step::Zoom { panel } => self.send(panel, PanelMsg::ToggleZoom),
            Step::Claim { panel, window } => match self.window_or_focused(*window) {
                Some(window) => self.send(panel, PanelMsg::Claim(window)),
                None => Ok(()),
            },
            Step::SetExtent { panel, extent } => self.send(panel, PanelMsg::SetExtent(*extent)),
            Step::NewWorkspace { file } => {
                match file {
                    Some(name) => self.host.open_in_new_workspace(name),
                    None => self.host.new_workspace(),
                };
                Ok(())
            }
            Step::SwitchWorkspace { workspace } => {
                if !self.host.switch_workspace(WorkspaceId(*workspace)) {
                    tracing::warn!(workspace, "switch_workspace: no such workspace");
                }
                Ok(())
            }
            Step::Split { name } => {
                match name {
                    Some(name) => self.host.split_named(name),
                    None => self.host.split(),
                };
                Ok(())
            }
            Step::CloseWindow { window } => {
                if let Some(window) = self.window_or_focused(*window) {
                    self.host.user_close_window(window);
                }
                Ok(())
            }
            Step::DeleteContent { content, panel } => {
                let target = match (panel, content) {
                    (Some(name), _) => {
                        let id = self.panel_id(name)?;
                        self.orchestrator.panel(id).and_then(|p| p.state().previous)
                    }
                    (None, Some(id)) => Some(ContentId(*id)),
                    (None, None) => self
                        .host
                        .focused_window()
                        .and_then(|w| self.host.window_content(w)),
                };
                match target {
                    Some(content) if self.host.delete_content(content) => {}
                    _ => tracing::warn!(?target, "delete_content: nothing to delete"),
                }
                Ok(())
            }
            Step::Resize { columns, lines } => {
                let cmdline = self.host.screen_size().cmdline_height;
                self.host
                    .resize_screen(ScreenSize::new(*columns, *lines, cmdline));
                Ok(())
            }
            Step::SurfaceWindow { window } => {
                if let Some(window) = self.window_or_focused(*window) {
                    self.host.surface_window(window);
                }
                Ok(())
            }
        }
    }

    fn send(&mut self, name: &str, msg: PanelMsg) -> PanelResult<()> {
        let panel = self.panel_id(name)?;
        update(
            &mut self.orchestrator,
            &mut self.host,
            Msg::Panel { panel, msg },
        )?;
        Ok(())
    }

    fn panel_id(&self, name: &str) -> PanelResult<PanelId> {
        self.orchestrator
            .find(name)
            .ok_or_else(|| PanelError::UnknownPanel(name.to_string()))
    }

    fn window_or_focused(&self, window: Option<u64>) -> Option<WindowId> {
        match window {
            Some(id) => Some(WindowId(id)).filter(|w| self.host.is_window_valid(*w)),
            None => self.host.focused_window(),
        }
    }
}

/// Default hooks for panels defined in configuration files
fn hooks_for(config: &PanelConfig) -> PanelHooks {
    if !config.claim_new_window {
        return PanelHooks::new();
    }
    let prefix = format!("{}://", config.name);
    PanelHooks::new().owns_window(move |query, host| {
        query
            .content
            .and_then(|c| host.content_name(c))
            .map_or(false, |name| name.starts_with(&prefix))
    })
}
