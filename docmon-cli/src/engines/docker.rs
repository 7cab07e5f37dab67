#![cfg(feature = "docker")]

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    KillContainerOptions, ListContainersOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerSummary, VolumeScopeEnum};
use bollard::volume::ListVolumesOptions;

use docmon_core::command::RemoveOptions;
use docmon_core::engine::{Engine, EngineError};
use docmon_core::model::{Container, ContainerState, Volume};

/// Engine backed by the local Docker daemon.
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect with the local defaults (`DOCKER_HOST` or the platform socket) and ping.
    pub async fn connect() -> Result<Self, EngineError> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| EngineError::Unreachable(format!("failed to connect to Docker: {e}")))?;

        client
            .ping()
            .await
            .map_err(|e| EngineError::Unreachable(format!("Docker ping failed: {e}")))?;

        Ok(Self { client })
    }
}

fn map_err(operation: &'static str, id: &str, err: BollardError) -> EngineError {
    match err {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => EngineError::NotFound { id: id.to_string() },
        BollardError::DockerResponseServerError { message, .. } => EngineError::Rejected {
            operation,
            id: id.to_string(),
            message,
        },
        other => EngineError::Unreachable(other.to_string()),
    }
}

fn container_from_summary(summary: ContainerSummary) -> Container {
    let name = summary
        .names
        .and_then(|names| names.into_iter().next())
        .unwrap_or_default();
    let state = summary
        .state
        .as_deref()
        .map(ContainerState::parse)
        .unwrap_or_default();

    Container::new(
        summary.id.unwrap_or_default(),
        name,
        summary.image.unwrap_or_default(),
    )
    .with_status(state, summary.status.unwrap_or_default())
}

fn scope_label(scope: Option<VolumeScopeEnum>) -> &'static str {
    match scope {
        Some(VolumeScopeEnum::LOCAL) => "local",
        Some(VolumeScopeEnum::GLOBAL) => "global",
        _ => "",
    }
}

#[async_trait]
impl Engine for DockerEngine {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<Container>, EngineError> {
        let options = ListContainersOptions::<String> {
            all: include_stopped,
            ..Default::default()
        };
        let summaries = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(|e| map_err("list", "containers", e))?;

        Ok(summaries.into_iter().map(container_from_summary).collect())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>, EngineError> {
        let response = self
            .client
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await
            .map_err(|e| map_err("list", "volumes", e))?;

        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| Volume {
                status: v
                    .status
                    .map(|s| {
                        let mut keys: Vec<String> = s.into_keys().collect();
                        keys.sort();
                        keys.join(",")
                    })
                    .unwrap_or_default(),
                scope: scope_label(v.scope).to_string(),
                created_at: v.created_at.unwrap_or_default(),
                name: v.name,
            })
            .collect())
    }

    async fn start(&self, id: &str) -> Result<(), EngineError> {
        self.client
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| map_err("start", id, e))
    }

    async fn stop(&self, id: &str) -> Result<(), EngineError> {
        self.client
            .stop_container(id, None)
            .await
            .map_err(|e| map_err("stop", id, e))
    }

    async fn restart(&self, id: &str) -> Result<(), EngineError> {
        self.client
            .restart_container(id, None)
            .await
            .map_err(|e| map_err("restart", id, e))
    }

    async fn kill(&self, id: &str, signal: &str) -> Result<(), EngineError> {
        let options = KillContainerOptions { signal };
        self.client
            .kill_container(id, Some(options))
            .await
            .map_err(|e| map_err("kill", id, e))
    }

    async fn remove(&self, id: &str, options: RemoveOptions) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            v: options.remove_volumes,
            force: options.force,
            ..Default::default()
        };
        self.client
            .remove_container(id, Some(options))
            .await
            .map_err(|e| map_err("remove", id, e))
    }
}
