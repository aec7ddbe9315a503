//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that the embedding event loop should
//! perform after an update.

/// Side effects requested by `update()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Deferred work is queued: deliver `Msg::Tick` on the next loop turn
    ScheduleTick,
}
