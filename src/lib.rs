//! Lander - a minimal dashboard of the applications running in Docker containers
//!
//! Containers opt in with a `lander.enable` label. Their `lander.name` and
//! Traefik frontend rule become a link, grouped by `lander.group`, and the
//! page is rebuilt from the runtime on every request.

pub mod config;
pub mod error;
pub mod extract;
pub mod monitoring;
pub mod render;
pub mod runtime;
pub mod server;
pub mod types;

pub use error::{LanderError, Result};
pub use extract::{ExtractConfig, LabelKeys, RoutingMode, RuleSegment, extract_and_group};
pub use runtime::{ContainerSource, DockerSource};
pub use types::{ContainerRecord, GroupedLinks, LinkEntry};
