//! Label extraction and grouping.
//!
//! Turns the container list of one request into [`GroupedLinks`]. Containers
//! that do not opt in, or whose labels cannot be used, are skipped; nothing in
//! here fails the request.

pub mod traefik;

use crate::error::ExtractError;
use crate::types::{ContainerRecord, GroupedLinks, LinkEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ENABLE_LABEL: &str = "lander.enable";
pub const NAME_LABEL: &str = "lander.name";
pub const GROUP_LABEL: &str = "lander.group";
pub const TRAEFIK_RULE_LABEL: &str = "traefik.frontend.rule";

/// Label keys consulted on every container
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelKeys {
    /// Presence of this key opts a container in; its value is ignored
    pub enable: String,
    pub name: String,
    pub group: String,
    pub rule: String,
}

impl Default for LabelKeys {
    fn default() -> Self {
        Self {
            enable: ENABLE_LABEL.to_string(),
            name: NAME_LABEL.to_string(),
            group: GROUP_LABEL.to_string(),
            rule: TRAEFIK_RULE_LABEL.to_string(),
        }
    }
}

/// Where the URL starts relative to the last colon of a routing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSegment {
    /// Keep the colon as the first character (`Host:a:8080` -> `:8080`)
    #[default]
    WithColon,
    /// Drop the colon (`Host:a:8080` -> `8080`)
    AfterColon,
}

/// How a name and URL are derived from a container's labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// `lander.name` plus the last segment of `traefik.frontend.rule`
    #[default]
    Traefik,
}

impl RoutingMode {
    pub fn name(&self) -> &'static str {
        match self {
            RoutingMode::Traefik => traefik::MODE_NAME,
        }
    }
}

/// Immutable extraction settings, fixed at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub labels: LabelKeys,
    pub traefik_enabled: bool,
    pub rule_segment: RuleSegment,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            labels: LabelKeys::default(),
            traefik_enabled: true,
            rule_segment: RuleSegment::default(),
        }
    }
}

/// Outcome counters for one grouping pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub seen: usize,
    pub opted_in: usize,
    pub linked: usize,
    pub mode_disabled: usize,
    pub malformed: usize,
}

/// Extract the link for a single opted-in container
pub fn extract_link(
    record: &ContainerRecord,
    mode: RoutingMode,
    config: &ExtractConfig,
) -> Result<LinkEntry, ExtractError> {
    match mode {
        RoutingMode::Traefik => traefik::extract(record, config),
    }
}

/// Build the grouped links for a container list
pub fn extract_and_group(
    records: &[ContainerRecord],
    mode: RoutingMode,
    config: &ExtractConfig,
) -> GroupedLinks {
    extract_and_group_with_stats(records, mode, config).0
}

/// Same as [`extract_and_group`], also reporting how many containers were skipped and why
pub fn extract_and_group_with_stats(
    records: &[ContainerRecord],
    mode: RoutingMode,
    config: &ExtractConfig,
) -> (GroupedLinks, ExtractStats) {
    let mut links = GroupedLinks::new();
    let mut stats = ExtractStats {
        seen: records.len(),
        ..Default::default()
    };

    for record in records {
        if !record.has_label(&config.labels.enable) {
            continue;
        }
        stats.opted_in += 1;
        debug!("found lander labels on container: {}", record.id);

        let entry = match extract_link(record, mode, config) {
            Ok(entry) => entry,
            Err(e) if e.is_mode_disabled() => {
                stats.mode_disabled += 1;
                debug!(container_id = %record.id, mode = mode.name(), "skipping container: {}", e);
                continue;
            }
            Err(e) => {
                stats.malformed += 1;
                debug!(container_id = %record.id, "skipping container with unusable labels: {}", e);
                continue;
            }
        };

        let group = record.label(&config.labels.group).unwrap_or_default();
        links.push(group, entry);
        stats.linked += 1;
    }

    (links, stats)
}
