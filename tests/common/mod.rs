//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use dockhand::host::{ContentId, Host, MemoryHost, ScreenSize, WindowId};
use dockhand::messages::{Msg, PanelMsg};
use dockhand::orchestrator::Orchestrator;
use dockhand::panel::{
    CloseOptions, HookKind, OpenMode, OpenOptions, PanelConfig, PanelEvent, PanelHooks, PanelId,
    PanelInstance, Position,
};
use dockhand::update::{pump, update};

/// 120 columns, 40 lines, 1-line command area (39 editor lines)
pub fn test_screen() -> ScreenSize {
    ScreenSize::new(120, 40, 1)
}

pub fn test_host() -> MemoryHost {
    MemoryHost::new(test_screen())
}

/// Orchestrator with a single panel registered
pub fn single_panel(config: PanelConfig) -> (Orchestrator, PanelId) {
    let mut orchestrator = Orchestrator::default();
    let id = orchestrator.register(config, PanelHooks::new());
    (orchestrator, id)
}

pub fn left_panel(size: u32) -> PanelConfig {
    PanelConfig::new("tree", Position::Left, size)
}

pub fn below_panel(size: u32) -> PanelConfig {
    PanelConfig::new("term", Position::Below, size)
}

/// Deliver every queued event and deferred tick
pub fn settle(orchestrator: &mut Orchestrator, host: &mut MemoryHost) {
    pump(orchestrator, host).expect("pump should settle without errors");
}

/// Send a panel message, then let the system settle
pub fn send(orchestrator: &mut Orchestrator, host: &mut MemoryHost, panel: PanelId, msg: PanelMsg) {
    update(orchestrator, host, Msg::Panel { panel, msg }).expect("panel message failed");
    settle(orchestrator, host);
}

pub fn open(orchestrator: &mut Orchestrator, host: &mut MemoryHost, panel: PanelId) {
    send(orchestrator, host, panel, PanelMsg::Open(OpenOptions::default()));
}

pub fn open_new(orchestrator: &mut Orchestrator, host: &mut MemoryHost, panel: PanelId) {
    let options = OpenOptions::default().with_mode(OpenMode::New);
    send(orchestrator, host, panel, PanelMsg::Open(options));
}

pub fn close(orchestrator: &mut Orchestrator, host: &mut MemoryHost, panel: PanelId) {
    send(orchestrator, host, panel, PanelMsg::Close(CloseOptions::default()));
}

pub fn instance(orchestrator: &Orchestrator, panel: PanelId) -> &PanelInstance {
    orchestrator.panel(panel).expect("panel registered")
}

/// The panel's window in the current workspace
pub fn panel_window(orchestrator: &Orchestrator, host: &MemoryHost, panel: PanelId) -> Option<WindowId> {
    instance(orchestrator, panel).window(host)
}

/// Content shown in the panel's window in the current workspace
pub fn shown_content(orchestrator: &Orchestrator, host: &MemoryHost, panel: PanelId) -> Option<ContentId> {
    panel_window(orchestrator, host, panel).and_then(|w| host.window_content(w))
}

pub const ALL_HOOKS: [HookKind; 10] = [
    HookKind::HostReady,
    HookKind::WillCreateContent,
    HookKind::DidCreateContent,
    HookKind::WillOpenWindow,
    HookKind::DidOpenWindow,
    HookKind::WillOpenContent,
    HookKind::DidOpenContent,
    HookKind::WillClose,
    HookKind::DidClose,
    HookKind::DidOpenOperationComplete,
];

/// Hooks that record every event they see
pub fn recording_hooks() -> (PanelHooks, Rc<RefCell<Vec<PanelEvent>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut hooks = PanelHooks::new();
    for kind in ALL_HOOKS {
        let log = Rc::clone(&log);
        hooks = hooks.on(kind, move |event, _| log.borrow_mut().push(*event));
    }
    (hooks, log)
}

/// Kinds of the recorded events, in order
pub fn kinds(log: &Rc<RefCell<Vec<PanelEvent>>>) -> Vec<HookKind> {
    log.borrow().iter().map(|e| e.kind()).collect()
}
