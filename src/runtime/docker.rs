use super::ContainerSource;
use crate::error::ConnectionError;
use crate::types::ContainerRecord;
use async_trait::async_trait;
use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::models::ContainerSummary;
use tracing::{debug, info};

/// Seconds the Docker client waits on a request before giving up
const CLIENT_TIMEOUT_SECS: u64 = 120;

/// How an endpoint string is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(String),
    Http(String),
}

impl Endpoint {
    /// Accepts `unix://`, `tcp://`, `http://` and bare absolute socket paths
    pub fn parse(endpoint: &str) -> Result<Self, ConnectionError> {
        let endpoint = endpoint.trim();
        if let Some(path) = endpoint.strip_prefix("unix://") {
            if !path.is_empty() {
                return Ok(Endpoint::Unix(path.to_string()));
            }
        } else if endpoint.starts_with('/') {
            return Ok(Endpoint::Unix(endpoint.to_string()));
        } else if let Some(addr) = endpoint.strip_prefix("tcp://") {
            if !addr.is_empty() {
                return Ok(Endpoint::Http(format!("http://{addr}")));
            }
        } else if endpoint
            .strip_prefix("http://")
            .is_some_and(|addr| !addr.is_empty())
        {
            return Ok(Endpoint::Http(endpoint.to_string()));
        }

        Err(ConnectionError::UnsupportedEndpoint {
            endpoint: endpoint.to_string(),
        })
    }
}

/// Docker Engine API backed container source
pub struct DockerSource {
    docker: Docker,
    endpoint: String,
}

impl DockerSource {
    /// Build the client for `endpoint`. Nothing is listed until [`ContainerSource::fetch`].
    pub fn connect(endpoint: &str) -> Result<Self, ConnectionError> {
        let docker = match Endpoint::parse(endpoint)? {
            Endpoint::Unix(path) => {
                Docker::connect_with_unix(&path, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            Endpoint::Http(addr) => {
                Docker::connect_with_http(&addr, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
        }
        .map_err(|source| ConnectionError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })?;

        info!("🐳 Docker endpoint configured: {}", endpoint);
        Ok(Self {
            docker,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl ContainerSource for DockerSource {
    async fn fetch(&self) -> Result<Vec<ContainerRecord>, ConnectionError> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(ConnectionError::List)?;

        debug!("runtime reported {} containers", containers.len());
        Ok(containers.into_iter().map(ContainerRecord::from).collect())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(value: ContainerSummary) -> Self {
        ContainerRecord {
            id: value.id.unwrap_or_default(),
            labels: value.labels.unwrap_or_default(),
        }
    }
}
