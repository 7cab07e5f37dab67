use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::command::{LifecycleCommand, LifecycleOp, RemoveOptions};
use crate::model::{Container, Volume};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine unreachable: {0}")]
    Unreachable(String),
    #[error("no such resource: {id}")]
    NotFound { id: String },
    #[error("{operation} {id} rejected: {message}")]
    Rejected {
        operation: &'static str,
        id: String,
        message: String,
    },
    #[error("operation not supported: {operation}")]
    NotSupported { operation: &'static str },
}

/// The orchestration engine as seen by the dashboard.
///
/// Implementations:
/// - `DockerEngine`: talks to the local Docker daemon
/// - `FakeEngine`: in-memory containers and volumes for demos and tests
#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<Container>, EngineError>;

    async fn list_volumes(&self) -> Result<Vec<Volume>, EngineError>;

    async fn start(&self, id: &str) -> Result<(), EngineError>;

    async fn stop(&self, id: &str) -> Result<(), EngineError>;

    async fn restart(&self, id: &str) -> Result<(), EngineError>;

    async fn kill(&self, id: &str, signal: &str) -> Result<(), EngineError>;

    async fn remove(&self, id: &str, options: RemoveOptions) -> Result<(), EngineError>;

    /// Route a lifecycle command to the matching operation.
    async fn execute(&self, command: &LifecycleCommand) -> Result<(), EngineError> {
        let id = command.target.as_str();
        match &command.op {
            LifecycleOp::Start => self.start(id).await,
            LifecycleOp::Stop => self.stop(id).await,
            LifecycleOp::Restart => self.restart(id).await,
            LifecycleOp::Kill { signal } => self.kill(id, signal).await,
            LifecycleOp::Remove(options) => self.remove(id, *options).await,
        }
    }
}

/// Where a list session gets its snapshot from.
#[async_trait]
pub trait SnapshotSource<E>: Send + Sync {
    async fn fetch(&self) -> Result<Vec<E>, EngineError>;
}

pub struct ContainerSource {
    engine: Arc<dyn Engine>,
    include_stopped: bool,
}

impl ContainerSource {
    pub fn new(engine: Arc<dyn Engine>, include_stopped: bool) -> Self {
        Self {
            engine,
            include_stopped,
        }
    }
}

#[async_trait]
impl SnapshotSource<Container> for ContainerSource {
    async fn fetch(&self) -> Result<Vec<Container>, EngineError> {
        self.engine.list_containers(self.include_stopped).await
    }
}

pub struct VolumeSource {
    engine: Arc<dyn Engine>,
}

impl VolumeSource {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SnapshotSource<Volume> for VolumeSource {
    async fn fetch(&self) -> Result<Vec<Volume>, EngineError> {
        self.engine.list_volumes().await
    }
}
