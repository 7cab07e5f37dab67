mod fake;

#[cfg(feature = "docker")]
mod docker;

pub use fake::FakeEngine;

#[cfg(feature = "docker")]
pub use docker::DockerEngine;
