//! Lifecycle orchestrator tests
//!
//! Workspace transitions, startup ordering, resize, content destruction,
//! claim-on-surface and the "only panels remain" teardown rule, all driven
//! through the in-memory host's event outbox.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{
    below_panel, close, instance, kinds, left_panel, open, open_new, panel_window,
    recording_hooks, settle, shown_content, single_panel, test_host,
};
use dockhand::host::{Axis, Host, ScreenSize};
use dockhand::orchestrator::{Orchestrator, StartupOrder};
use dockhand::panel::{
    HookKind, PanelConfig, PanelEvent, PanelHooks, Placement, Position, WindowConfig,
};

// ========================================================================
// Workspace transitions
// ========================================================================

#[test]
fn test_open_panel_follows_into_new_workspace() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let first = shown_content(&orchestrator, &host, id).unwrap();

    host.new_workspace();
    settle(&mut orchestrator, &mut host);

    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_workspace(window), Some(host.current_workspace()));
    // Reuse policy: same content in every workspace
    assert_eq!(host.window_content(window), Some(first));
    assert_eq!(instance(&orchestrator, id).live_windows(&host).len(), 2);
}

#[test]
fn test_without_reuse_each_workspace_keeps_its_content() {
    let (mut orchestrator, id) = single_panel(below_panel(10).with_reuse(false));
    let mut host = test_host();
    let ws1 = host.current_workspace();

    open(&mut orchestrator, &mut host, id);
    let c1 = shown_content(&orchestrator, &host, id).unwrap();

    let ws2 = host.new_workspace();
    settle(&mut orchestrator, &mut host);
    let c2 = shown_content(&orchestrator, &host, id).unwrap();
    assert_ne!(c1, c2);

    host.switch_workspace(ws1);
    settle(&mut orchestrator, &mut host);
    assert_eq!(shown_content(&orchestrator, &host, id), Some(c1));

    host.switch_workspace(ws2);
    settle(&mut orchestrator, &mut host);
    assert_eq!(shown_content(&orchestrator, &host, id), Some(c2));
}

#[test]
fn test_closed_panel_is_closed_on_workspace_enter() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    let ws1 = host.current_workspace();

    open(&mut orchestrator, &mut host, id);
    host.new_workspace();
    settle(&mut orchestrator, &mut host);
    close(&mut orchestrator, &mut host, id);

    // The ws1 window is still there until we go back
    assert_eq!(instance(&orchestrator, id).live_windows(&host).len(), 1);

    host.switch_workspace(ws1);
    settle(&mut orchestrator, &mut host);
    assert!(panel_window(&orchestrator, &host, id).is_none());
    assert!(instance(&orchestrator, id).live_windows(&host).is_empty());
}

#[test]
fn test_new_workspace_skips_forced_close_once() {
    let (hooks, log) = recording_hooks();
    let mut orchestrator = Orchestrator::default();
    orchestrator.register(below_panel(10), hooks);
    let mut host = test_host();
    let ws1 = host.current_workspace();

    host.open_in_new_workspace("notes.md");
    settle(&mut orchestrator, &mut host);
    assert!(!kinds(&log).contains(&HookKind::WillClose));

    host.switch_workspace(ws1);
    settle(&mut orchestrator, &mut host);
    assert_eq!(kinds(&log), vec![HookKind::WillClose]);
}

#[test]
fn test_leaving_workspace_captures_size() {
    let (mut orchestrator, id) = single_panel(left_panel(20));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);

    let window = panel_window(&orchestrator, &host, id).unwrap();
    host.set_window_extent(window, Axis::Horizontal, 30).unwrap();

    host.new_workspace();
    settle(&mut orchestrator, &mut host);
    assert_eq!(instance(&orchestrator, id).state().size, 30);
    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((30, 39)));
}

/// Left panel open in two workspaces, currently in the first one
fn panel_in_two_workspaces() -> (
    Orchestrator,
    dockhand::PanelId,
    dockhand::MemoryHost,
    dockhand::host::WorkspaceId,
    dockhand::host::WorkspaceId,
) {
    let (mut orchestrator, id) = single_panel(left_panel(20));
    let mut host = test_host();
    let ws1 = host.current_workspace();
    open(&mut orchestrator, &mut host, id);

    let ws2 = host.new_workspace();
    settle(&mut orchestrator, &mut host);
    host.switch_workspace(ws1);
    settle(&mut orchestrator, &mut host);
    (orchestrator, id, host, ws1, ws2)
}

#[test]
fn test_resize_carries_into_workspace_with_existing_window() {
    let (mut orchestrator, id, mut host, _, ws2) = panel_in_two_workspaces();
    let window = panel_window(&orchestrator, &host, id).unwrap();
    host.set_window_extent(window, Axis::Horizontal, 30).unwrap();

    host.switch_workspace(ws2);
    settle(&mut orchestrator, &mut host);

    // The second workspace's window still had the old width
    assert_eq!(instance(&orchestrator, id).state().size, 30);
    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((30, 39)));
}

#[test]
fn test_set_extent_carries_into_workspace_with_existing_window() {
    let (mut orchestrator, id, mut host, ws1, ws2) = panel_in_two_workspaces();
    common::send(
        &mut orchestrator,
        &mut host,
        id,
        dockhand::messages::PanelMsg::SetExtent(30),
    );

    host.switch_workspace(ws2);
    settle(&mut orchestrator, &mut host);
    assert_eq!(instance(&orchestrator, id).state().size, 30);
    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((30, 39)));

    // And back again
    host.switch_workspace(ws1);
    settle(&mut orchestrator, &mut host);
    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((30, 39)));
}

#[test]
fn test_zoom_survives_workspace_switch() {
    let (mut orchestrator, id) = single_panel(left_panel(20));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    common::send(
        &mut orchestrator,
        &mut host,
        id,
        dockhand::messages::PanelMsg::ToggleZoom,
    );

    host.new_workspace();
    settle(&mut orchestrator, &mut host);

    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert!(instance(&orchestrator, id).is_zoomed());
    assert_eq!(host.window_size(window), Some((120, 39)));
    // The pre-zoom size is kept
    assert_eq!(instance(&orchestrator, id).state().size, 20);
}

// ========================================================================
// Teardown when only panels remain
// ========================================================================

#[test]
fn test_closing_last_editor_window_closes_workspace() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    let ws1 = host.current_workspace();
    open(&mut orchestrator, &mut host, id);

    let ws2 = host.new_workspace();
    settle(&mut orchestrator, &mut host);
    let editor = host
        .workspace_windows(ws2)
        .into_iter()
        .find(|w| panel_window(&orchestrator, &host, id) != Some(*w))
        .unwrap();

    host.user_close_window(editor);
    settle(&mut orchestrator, &mut host);

    assert_eq!(host.workspaces(), vec![ws1]);
    assert_eq!(host.current_workspace(), ws1);
    assert!(!host.has_quit());
    assert!(panel_window(&orchestrator, &host, id).is_some());
}

#[test]
fn test_closing_last_editor_window_of_last_workspace_quits() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    let workspace = host.current_workspace();
    let editor = host.workspace_windows(workspace)[0];
    open(&mut orchestrator, &mut host, id);

    host.user_close_window(editor);
    settle(&mut orchestrator, &mut host);
    assert!(host.has_quit());
}

#[test]
fn test_closing_panel_window_keeps_workspace() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let window = panel_window(&orchestrator, &host, id).unwrap();

    host.user_close_window(window);
    settle(&mut orchestrator, &mut host);

    assert!(!host.has_quit());
    assert_eq!(host.workspaces().len(), 1);
    assert!(instance(&orchestrator, id).state().bindings().is_empty());
    // Intent is unchanged; the next workspace entry reopens it
    assert!(instance(&orchestrator, id).is_open());
}

#[test]
fn test_two_editor_windows_keep_workspace() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let extra = host.split();
    settle(&mut orchestrator, &mut host);

    host.user_close_window(extra);
    settle(&mut orchestrator, &mut host);
    assert!(!host.has_quit());
    assert_eq!(host.workspace_windows(host.current_workspace()).len(), 2);
}

// ========================================================================
// Content destruction
// ========================================================================

#[test]
fn test_destroying_displayed_content_falls_back() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    open_new(&mut orchestrator, &mut host, id);
    open_new(&mut orchestrator, &mut host, id);
    let registry = instance(&orchestrator, id).state().registry().to_vec();

    host.delete_content(registry[2]);
    settle(&mut orchestrator, &mut host);

    let state = instance(&orchestrator, id).state();
    assert_eq!(state.registry(), &registry[..2]);
    assert_eq!(state.previous, Some(registry[1]));
    assert!(!state.bindings().values().any(|c| *c == registry[2]));
}

#[test]
fn test_destroying_last_content_clears_previous() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let content = shown_content(&orchestrator, &host, id).unwrap();
    close(&mut orchestrator, &mut host, id);

    host.delete_content(content);
    settle(&mut orchestrator, &mut host);
    assert!(instance(&orchestrator, id).state().registry().is_empty());
    assert_eq!(instance(&orchestrator, id).state().previous, None);

    // Next open allocates a fresh content
    open(&mut orchestrator, &mut host, id);
    let fresh = shown_content(&orchestrator, &host, id).unwrap();
    assert_ne!(fresh, content);
}

#[test]
fn test_destroyed_content_claimed_by_predicate_keeps_previous() {
    let mut orchestrator = Orchestrator::default();
    // Lenient during teardown: every destroyed content counts as ours
    let hooks = PanelHooks::new().owns_content(|query, _| {
        query.reason == dockhand::panel::OwnershipReason::ContentDestroyed
    });
    let id = orchestrator.register(below_panel(10), hooks);
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    open_new(&mut orchestrator, &mut host, id);
    open_new(&mut orchestrator, &mut host, id);
    common::send(
        &mut orchestrator,
        &mut host,
        id,
        dockhand::messages::PanelMsg::Go(-1),
    );
    let registry = instance(&orchestrator, id).state().registry().to_vec();
    assert_eq!(instance(&orchestrator, id).state().previous, Some(registry[1]));

    let foreign = host.create_named_content("scratch.txt");
    host.delete_content(foreign);
    settle(&mut orchestrator, &mut host);

    let state = instance(&orchestrator, id).state();
    assert_eq!(state.registry(), &registry[..]);
    assert_eq!(state.previous, Some(registry[1]));
}

#[test]
fn test_foreign_content_destruction_is_ignored() {
    let (mut orchestrator, id) = single_panel(below_panel(10));
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let foreign = host.create_named_content("scratch.txt");

    host.delete_content(foreign);
    settle(&mut orchestrator, &mut host);
    assert_eq!(instance(&orchestrator, id).state().registry().len(), 1);
}

// ========================================================================
// Startup and resize
// ========================================================================

#[test]
fn test_startup_position_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut orchestrator = Orchestrator::new(StartupOrder::Position);
    for (name, position) in [
        ("float", Position::Float),
        ("below", Position::Below),
        ("left", Position::Left),
        ("right", Position::Right),
    ] {
        let order = Rc::clone(&order);
        let hooks = PanelHooks::new().on(HookKind::HostReady, move |_, _| {
            order.borrow_mut().push(name);
        });
        orchestrator.register(PanelConfig::new(name, position, 10), hooks);
    }
    let mut host = test_host();

    host.start();
    settle(&mut orchestrator, &mut host);
    assert_eq!(*order.borrow(), vec!["left", "right", "below", "float"]);
}

#[test]
fn test_startup_registration_order() {
    let (hooks_a, log_a) = recording_hooks();
    let (hooks_b, log_b) = recording_hooks();
    let mut orchestrator = Orchestrator::default();
    let a = orchestrator.register(PanelConfig::new("a", Position::Float, 10), hooks_a);
    let b = orchestrator.register(PanelConfig::new("b", Position::Left, 10), hooks_b);
    let mut host = test_host();

    host.start();
    settle(&mut orchestrator, &mut host);
    assert_eq!(*log_a.borrow(), vec![PanelEvent::HostReady { panel: a }]);
    assert_eq!(*log_b.borrow(), vec![PanelEvent::HostReady { panel: b }]);
}

#[test]
fn test_open_on_startup() {
    let (mut orchestrator, id) = single_panel(left_panel(25).with_open_on_startup(true));
    let mut host = test_host();
    let workspace = host.current_workspace();
    let editor = host.workspace_windows(workspace)[0];

    host.start();
    settle(&mut orchestrator, &mut host);

    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((25, 39)));
    // Opened without stealing focus
    assert_eq!(host.focused_window(), Some(editor));
}

#[test]
fn test_resize_reflows_floating_panel() {
    let window = WindowConfig {
        anchor: Some("NE".to_string()),
        ..WindowConfig::default()
    };
    let config = PanelConfig::new("notes", Position::Float, 10).with_window(window);
    let (mut orchestrator, id) = single_panel(config);
    let mut host = test_host();
    open(&mut orchestrator, &mut host, id);
    let window = panel_window(&orchestrator, &host, id).unwrap();
    assert_eq!(host.window_size(window), Some((60, 19)));

    host.resize_screen(ScreenSize::new(80, 25, 1));
    settle(&mut orchestrator, &mut host);

    let record = host.window_record(window).unwrap();
    assert_eq!((record.width, record.height), (40, 12));
    assert_eq!(record.float_origin, Some((0, 40)));
    assert!(matches!(
        instance(&orchestrator, id).placement(&host).unwrap(),
        Placement::Float(_)
    ));
}

// ========================================================================
// Claim on surface
// ========================================================================

fn claiming_panel(name: &str, prefix: &'static str) -> (PanelConfig, PanelHooks) {
    let config = PanelConfig::new(name, Position::Below, 12).with_claim(true);
    let hooks = PanelHooks::new().owns_window(move |query, host| {
        query
            .content
            .and_then(|c| host.content_name(c))
            .map_or(false, |n| n.starts_with(prefix))
    });
    (config, hooks)
}

#[test]
fn test_surfaced_window_is_claimed() {
    let mut orchestrator = Orchestrator::default();
    let (config, hooks) = claiming_panel("term", "term://");
    let id = orchestrator.register(config, hooks);
    let mut host = test_host();

    let window = host.split_named("term://zsh");
    settle(&mut orchestrator, &mut host);

    assert!(instance(&orchestrator, id).is_open());
    assert_eq!(panel_window(&orchestrator, &host, id), Some(window));
    assert_eq!(host.window_size(window), Some((120, 12)));
}

#[test]
fn test_unrecognized_window_is_not_claimed() {
    let mut orchestrator = Orchestrator::default();
    let (config, hooks) = claiming_panel("term", "term://");
    let id = orchestrator.register(config, hooks);
    let mut host = test_host();

    host.split_named("main.rs");
    settle(&mut orchestrator, &mut host);
    assert!(!instance(&orchestrator, id).is_open());
    assert!(panel_window(&orchestrator, &host, id).is_none());
}

#[test]
fn test_claim_without_policy_is_ignored() {
    let mut orchestrator = Orchestrator::default();
    let (config, hooks) = claiming_panel("term", "term://");
    let id = orchestrator.register(config.with_claim(false), hooks);
    let mut host = test_host();

    host.split_named("term://zsh");
    settle(&mut orchestrator, &mut host);
    assert!(panel_window(&orchestrator, &host, id).is_none());
}

#[test]
fn test_first_registered_claimer_wins() {
    let mut orchestrator = Orchestrator::default();
    let (first_config, first_hooks) = claiming_panel("first", "term://");
    let (second_config, second_hooks) = claiming_panel("second", "term://");
    let first = orchestrator.register(first_config, first_hooks);
    let second = orchestrator.register(second_config, second_hooks);
    let mut host = test_host();

    let window = host.split_named("term://zsh");
    settle(&mut orchestrator, &mut host);

    assert_eq!(panel_window(&orchestrator, &host, first), Some(window));
    assert!(panel_window(&orchestrator, &host, second).is_none());
}
