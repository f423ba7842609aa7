use crate::error::ConnectionError;
use crate::types::ContainerRecord;
use async_trait::async_trait;

pub mod docker;

pub use docker::DockerSource;

/// Where the dashboard gets its containers from. Queried once per page request.
#[async_trait]
pub trait ContainerSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ContainerRecord>, ConnectionError>;

    /// Endpoint description for logs
    fn endpoint(&self) -> &str;
}
