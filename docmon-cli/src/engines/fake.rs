use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use docmon_core::command::RemoveOptions;
use docmon_core::engine::{Engine, EngineError};
use docmon_core::model::{Container, ContainerState, Volume};

/// In-memory engine used by `--demo` and by tests.
///
/// Lifecycle calls take effect immediately and follow the daemon's rules closely enough
/// for the dashboard: killing a stopped container or removing a running one without
/// `force` is rejected.
pub struct FakeEngine {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    containers: Vec<Container>,
    volumes: Vec<Volume>,
    unreachable: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn demo() -> Self {
        let containers = [
            ("web", "nginx:1.27", true),
            ("api", "ghcr.io/acme/api:2.4.1", true),
            ("worker", "ghcr.io/acme/worker:2.4.1", true),
            ("postgres", "postgres:16", true),
            ("redis", "redis:7-alpine", true),
            ("migrate", "ghcr.io/acme/api:2.4.1", false),
            ("mailhog", "mailhog/mailhog", true),
            ("grafana", "grafana/grafana:11.0.0", false),
            ("prometheus", "prom/prometheus:v2.53.0", true),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, image, running))| {
            let container = Container::new(demo_id(i), format!("/{name}"), image);
            if running {
                container.with_status(ContainerState::Running, format!("Up {} minutes", 3 + i * 7))
            } else {
                container.with_status(ContainerState::Exited, "Exited (0) 2 hours ago")
            }
        })
        .collect();

        let volumes = ["pgdata", "redis-data", "grafana-storage"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| Volume {
                name: name.to_string(),
                created_at: format!("2024-06-0{}T09:30:00Z", i + 1),
                scope: "local".into(),
                status: String::new(),
            })
            .collect();

        Self::new().with_containers(containers).with_volumes(volumes)
    }

    pub fn with_containers(self, containers: Vec<Container>) -> Self {
        self.lock().containers = containers;
        self
    }

    pub fn with_volumes(self, volumes: Vec<Volume>) -> Self {
        self.lock().volumes = volumes;
        self
    }

    /// Make every call fail as if the daemon went away.
    #[cfg(test)]
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_container<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Container) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut state = self.lock();
        if state.unreachable {
            return Err(unreachable());
        }
        let container = state
            .containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
        f(container)
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_id(i: usize) -> String {
    format!("{:016x}{:048x}", 0x9e37_79b9_7f4a_7c15_u64.wrapping_mul(i as u64 + 1), i)
}

fn unreachable() -> EngineError {
    EngineError::Unreachable("fake engine offline".into())
}

fn mark_running(c: &mut Container) {
    c.state = ContainerState::Running;
    c.status = "Up Less than a second".into();
}

fn mark_exited(c: &mut Container, code: i32) {
    c.state = ContainerState::Exited;
    c.status = format!("Exited ({code}) Less than a second ago");
}

#[async_trait]
impl Engine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<Container>, EngineError> {
        let state = self.lock();
        if state.unreachable {
            return Err(unreachable());
        }
        Ok(state
            .containers
            .iter()
            .filter(|c| include_stopped || c.state == ContainerState::Running)
            .cloned()
            .collect())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>, EngineError> {
        let state = self.lock();
        if state.unreachable {
            return Err(unreachable());
        }
        Ok(state.volumes.clone())
    }

    async fn start(&self, id: &str) -> Result<(), EngineError> {
        self.with_container(id, |c| {
            mark_running(c);
            Ok(())
        })
    }

    async fn stop(&self, id: &str) -> Result<(), EngineError> {
        self.with_container(id, |c| {
            if c.state == ContainerState::Running {
                mark_exited(c, 0);
            }
            Ok(())
        })
    }

    async fn restart(&self, id: &str) -> Result<(), EngineError> {
        self.with_container(id, |c| {
            mark_running(c);
            Ok(())
        })
    }

    async fn kill(&self, id: &str, signal: &str) -> Result<(), EngineError> {
        self.with_container(id, |c| {
            if c.state != ContainerState::Running {
                return Err(EngineError::Rejected {
                    operation: "kill",
                    id: c.id.clone(),
                    message: "container is not running".into(),
                });
            }
            let code = if signal == "SIGKILL" { 137 } else { 143 };
            mark_exited(c, code);
            Ok(())
        })
    }

    async fn remove(&self, id: &str, options: RemoveOptions) -> Result<(), EngineError> {
        self.with_container(id, |c| {
            if c.state == ContainerState::Running && !options.force {
                return Err(EngineError::Rejected {
                    operation: "remove",
                    id: c.id.clone(),
                    message: "stop the container before removing or force remove".into(),
                });
            }
            Ok(())
        })?;
        self.lock().containers.retain(|c| c.id != id);
        Ok(())
    }
}
