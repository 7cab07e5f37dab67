//! The list session state machine.
//!
//! `reduce` folds one event into a [`ListSession`] and returns the side effects the
//! runtime must perform. It performs no I/O itself: fetches, timers and lifecycle
//! commands come back as later events.

use std::time::Duration;

use tracing::debug;

use crate::command::{LifecycleAction, LifecycleCommand};
use crate::engine::EngineError;
use crate::keymap::{self, Action, Key};
use crate::model::ListEntry;
use crate::state::{CommandFailure, ListSession, Viewport};

#[derive(Debug)]
pub enum SessionEvent<E> {
    /// Session start: first fetch and first timer.
    Init,
    Tick,
    Resize { width: u16, height: u16 },
    Key(Key),
    RefreshCompleted {
        seq: u64,
        result: Result<Vec<E>, EngineError>,
    },
    CommandCompleted {
        command: LifecycleCommand,
        result: Result<(), EngineError>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// List the resources in the background and report `RefreshCompleted { seq, .. }`.
    Fetch { seq: u64 },
    /// Deliver `Tick` after the delay.
    ScheduleTick(Duration),
    /// Run the command in the background and report `CommandCompleted`.
    Dispatch(LifecycleCommand),
}

pub fn reduce<E: ListEntry>(session: &mut ListSession<E>, event: SessionEvent<E>) -> Vec<Effect> {
    match event {
        // Every tick re-arms the timer, whatever the fetch later returns.
        SessionEvent::Init | SessionEvent::Tick => vec![
            request_refresh(session),
            Effect::ScheduleTick(session.refresh_interval),
        ],
        SessionEvent::Resize { width, height } => {
            session.viewport = Viewport { width, height };
            session.relayout();
            vec![request_refresh(session)]
        }
        SessionEvent::Key(key) => on_key(session, key),
        SessionEvent::RefreshCompleted { seq, result } => {
            if !session.refresh.accept(seq) {
                debug!(seq, applied = session.refresh.applied, "discarding stale refresh");
                return Vec::new();
            }
            session.loaded = true;
            match result {
                Ok(entries) => {
                    session.last_refresh_error = None;
                    session.replace_entries(entries);
                }
                Err(error) => session.last_refresh_error = Some(error),
            }
            Vec::new()
        }
        SessionEvent::CommandCompleted { command, result } => {
            match result {
                Ok(()) => session.last_command_failure = None,
                Err(error) => {
                    session.last_command_failure = Some(CommandFailure { command, error });
                }
            }
            Vec::new()
        }
    }
}

impl<E: ListEntry> ListSession<E> {
    /// Convenience wrapper around [`reduce`].
    pub fn handle(&mut self, event: SessionEvent<E>) -> Vec<Effect> {
        reduce(self, event)
    }

    /// Start the session on a `width` x `height` terminal: `Init`, then the resize that
    /// sizes the layout. Every effect of both is returned for the runtime to perform.
    pub fn start(&mut self, width: u16, height: u16) -> Vec<Effect> {
        let mut effects = self.handle(SessionEvent::Init);
        effects.extend(self.handle(SessionEvent::Resize { width, height }));
        effects
    }
}

fn request_refresh<E: ListEntry>(session: &mut ListSession<E>) -> Effect {
    Effect::Fetch {
        seq: session.refresh.issue(),
    }
}

fn on_key<E: ListEntry>(session: &mut ListSession<E>, key: Key) -> Vec<Effect> {
    let Some(action) = keymap::resolve(key, &session.commands) else {
        return Vec::new();
    };

    match action {
        Action::CursorUp => {
            session.cursor = session.cursor.saturating_sub(1);
        }
        Action::CursorDown => {
            let items = session.paginator.items_on_page();
            if session.cursor + 1 < items {
                session.cursor += 1;
            }
        }
        Action::PrevPage => {
            session.paginator.prev_page();
            session.clamp_cursor();
        }
        Action::NextPage => {
            session.paginator.next_page();
            session.clamp_cursor();
        }
        Action::ToggleHelp => {
            session.help_expanded = !session.help_expanded;
            session.relayout();
        }
        Action::Lifecycle(action) => return dispatch(session, action).into_iter().collect(),
    }
    Vec::new()
}

fn dispatch<E: ListEntry>(session: &ListSession<E>, action: LifecycleAction) -> Option<Effect> {
    let Some(entry) = session.selected() else {
        debug!(action = action.label(), cursor = session.cursor, "no entry under cursor");
        return None;
    };
    session
        .commands
        .command_for(action, entry.key())
        .map(Effect::Dispatch)
}
