use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One container as reported by the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: HashMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }
}

/// A discovered application: display name and target URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub name: String,
    pub url: String,
}

/// Links keyed by group name. The empty string is the ungrouped bucket.
///
/// Groups iterate in key order; entries keep the order containers were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedLinks {
    groups: BTreeMap<String, Vec<LinkEntry>>,
}

impl GroupedLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to `group`, creating the group on first use
    pub fn push(&mut self, group: impl Into<String>, entry: LinkEntry) {
        self.groups.entry(group.into()).or_default().push(entry);
    }

    pub fn get(&self, group: &str) -> Option<&[LinkEntry]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LinkEntry])> {
        self.groups
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Number of links across all groups
    pub fn link_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
