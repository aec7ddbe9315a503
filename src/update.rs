//! Update functions for the Elm-style architecture
//!
//! All panel state transformations flow through [`update`]. Host events,
//! user panel commands and deferred ticks are all messages; the returned
//! command tells the loop whether another turn is needed.

use crate::commands::Cmd;
use crate::error::PanelResult;
use crate::host::{Host, MemoryHost};
use crate::messages::Msg;
use crate::orchestrator::Orchestrator;
use crate::tracing::PanelSnapshot;

/// Upper bound on loop turns in [`pump`] before giving up on a runaway cascade
const MAX_PUMP_TURNS: usize = 1024;

/// Main update function - dispatches to the orchestrator
pub fn update(
    orchestrator: &mut Orchestrator,
    host: &mut dyn Host,
    msg: Msg,
) -> PanelResult<Option<Cmd>> {
    let before = tracing::enabled!(tracing::Level::TRACE).then(|| snapshots(orchestrator));
    let label = tracing::enabled!(tracing::Level::TRACE).then(|| format!("{:?}", msg));

    let result = match msg {
        Msg::Host(event) => orchestrator.handle_event(host, event),
        Msg::Panel { panel, msg } => orchestrator.dispatch(host, panel, msg),
        Msg::Tick => orchestrator.tick(host),
    };

    if let (Some(before), Some(label)) = (before, label) {
        for (old, new) in before.iter().zip(snapshots(orchestrator)) {
            if let Some(diff) = old.diff(&new) {
                tracing::trace!(panel = %new.name, msg = %label, "{}", diff);
            }
        }
    }

    result?;
    Ok(orchestrator.has_pending().then_some(Cmd::ScheduleTick))
}

fn snapshots(orchestrator: &Orchestrator) -> Vec<PanelSnapshot> {
    orchestrator
        .panels()
        .iter()
        .map(PanelSnapshot::from_instance)
        .collect()
}

/// Deliver queued host events and deferred ticks until both are drained
///
/// Events announced while handling an event join the back of the queue,
/// and a tick only runs once no events are waiting, matching a host that
/// defers work to its next loop turn. Every message is delivered even if
/// an earlier one fails; the first error is returned.
pub fn pump(orchestrator: &mut Orchestrator, host: &mut MemoryHost) -> PanelResult<usize> {
    let mut delivered = 0;
    let mut first_error = None;

    for _ in 0..MAX_PUMP_TURNS {
        let events = host.take_events();
        let msgs: Vec<Msg> = if !events.is_empty() {
            events.into_iter().map(Msg::from).collect()
        } else if orchestrator.has_pending() {
            vec![Msg::Tick]
        } else {
            return first_error.map_or(Ok(delivered), Err);
        };

        for msg in msgs {
            delivered += 1;
            if let Err(e) = update(orchestrator, host, msg) {
                tracing::warn!("message failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    tracing::warn!("event pump did not settle after {} turns", MAX_PUMP_TURNS);
    first_error.map_or(Ok(delivered), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::HostEvent;
    use crate::panel::{PanelConfig, PanelHooks, Position};

    #[test]
    fn test_update_schedules_tick_on_workspace_enter() {
        let mut orchestrator = Orchestrator::default();
        let mut host = MemoryHost::default();
        orchestrator.register(PanelConfig::new("term", Position::Below, 10), PanelHooks::new());

        let workspace = host.current_workspace();
        let cmd = update(
            &mut orchestrator,
            &mut host,
            Msg::Host(HostEvent::WorkspaceEntered(workspace)),
        )
        .unwrap();
        assert_eq!(cmd, Some(Cmd::ScheduleTick));

        let cmd = update(&mut orchestrator, &mut host, Msg::Tick).unwrap();
        assert_eq!(cmd, None);
    }

    #[test]
    fn test_pump_drains_events_and_ticks() {
        let mut orchestrator = Orchestrator::default();
        let mut host = MemoryHost::default();
        let id = orchestrator.register(PanelConfig::new("term", Position::Below, 10), PanelHooks::new());

        update(&mut orchestrator, &mut host, Msg::open(id)).unwrap();
        host.new_workspace();
        let delivered = pump(&mut orchestrator, &mut host).unwrap();

        assert!(delivered >= 5);
        assert!(!host.has_pending_events());
        assert!(!orchestrator.has_pending());
        assert!(orchestrator.panel(id).unwrap().window(&host).is_some());
    }
}
