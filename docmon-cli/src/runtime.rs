//! Executes reducer effects as background tasks.
//!
//! Every task reports back by sending a `SessionEvent` on the channel the UI loop
//! drains, so the session only ever changes on the UI loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use docmon_core::engine::{Engine, SnapshotSource};
use docmon_core::reducer::{Effect, SessionEvent};

pub struct EffectRunner<E> {
    source: Arc<dyn SnapshotSource<E>>,
    engine: Arc<dyn Engine>,
    events: mpsc::Sender<SessionEvent<E>>,
}

impl<E: Send + 'static> EffectRunner<E> {
    pub fn new(
        source: Arc<dyn SnapshotSource<E>>,
        engine: Arc<dyn Engine>,
        events: mpsc::Sender<SessionEvent<E>>,
    ) -> Self {
        Self {
            source,
            engine,
            events,
        }
    }

    pub fn run_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    /// Spawn the task for `effect`. Never blocks.
    pub fn run(&self, effect: Effect) {
        let tx = self.events.clone();
        match effect {
            Effect::Fetch { seq } => {
                let source = self.source.clone();
                tokio::spawn(async move {
                    let result = source.fetch().await;
                    if let Err(e) = &result {
                        warn!(seq, "refresh failed, keeping previous list: {e}");
                    }
                    let _ = tx.send(SessionEvent::RefreshCompleted { seq, result }).await;
                });
            }
            Effect::ScheduleTick(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(SessionEvent::Tick).await;
                });
            }
            Effect::Dispatch(command) => {
                let engine = self.engine.clone();
                tokio::spawn(async move {
                    debug!(engine = engine.name(), "dispatching {command}");
                    let result = engine.execute(&command).await;
                    if let Err(e) = &result {
                        warn!("{command} failed: {e}");
                    }
                    let _ = tx.send(SessionEvent::CommandCompleted { command, result }).await;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use docmon_core::command::{LifecycleCommand, LifecycleOp};
    use docmon_core::engine::{ContainerSource, EngineError};
    use docmon_core::model::{Container, ContainerState};

    use super::*;
    use crate::engines::FakeEngine;

    fn runner(
        engine: Arc<FakeEngine>,
    ) -> (EffectRunner<Container>, mpsc::Receiver<SessionEvent<Container>>) {
        let (tx, rx) = mpsc::channel(16);
        let source = Arc::new(ContainerSource::new(engine.clone(), true));
        (EffectRunner::new(source, engine, tx), rx)
    }

    fn engine() -> Arc<FakeEngine> {
        Arc::new(FakeEngine::new().with_containers(vec![
            Container::new("a", "/a", "alpine").with_status(ContainerState::Running, "Up"),
        ]))
    }

    #[tokio::test]
    async fn test_fetch_reports_completion_with_seq() {
        let (runner, mut rx) = runner(engine());
        runner.run(Effect::Fetch { seq: 7 });
        match rx.recv().await {
            Some(SessionEvent::RefreshCompleted { seq, result }) => {
                assert_eq!(seq, 7);
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_not_dropped() {
        let engine = engine();
        engine.set_unreachable(true);
        let (runner, mut rx) = runner(engine);
        runner.run(Effect::Fetch { seq: 1 });
        assert!(matches!(
            rx.recv().await,
            Some(SessionEvent::RefreshCompleted {
                result: Err(EngineError::Unreachable(_)),
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_tick_fires_after_delay() {
        let (runner, mut rx) = runner(engine());
        runner.run(Effect::ScheduleTick(Duration::from_secs(1)));
        assert!(rx.try_recv().is_err());
        assert!(matches!(rx.recv().await, Some(SessionEvent::Tick)));
    }

    #[tokio::test]
    async fn test_dispatch_executes_and_reports() {
        let engine = engine();
        let (runner, mut rx) = runner(engine.clone());
        let command = LifecycleCommand {
            target: "a".into(),
            op: LifecycleOp::Kill {
                signal: "SIGKILL".into(),
            },
        };
        runner.run(Effect::Dispatch(command.clone()));
        match rx.recv().await {
            Some(SessionEvent::CommandCompleted {
                command: done,
                result,
            }) => {
                assert_eq!(done, command);
                assert!(result.is_ok());
            }
            other => panic!("unexpected {other:?}"),
        }
        let listed = engine.list_containers(true).await.unwrap();
        assert_eq!(listed[0].state, ContainerState::Exited);

        // Killing a stopped container is rejected and the failure comes back.
        runner.run(Effect::Dispatch(command));
        assert!(matches!(
            rx.recv().await,
            Some(SessionEvent::CommandCompleted {
                result: Err(EngineError::Rejected { .. }),
                ..
            })
        ));
    }
}
