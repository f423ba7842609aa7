use crate::error::{ConfigError, LanderError, RenderError};
use crate::types::GroupedLinks;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html.hbs");
const TEMPLATE_NAME: &str = "index";

/// One link as the template sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub name: String,
    pub url: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub name: String,
    pub links: Vec<LinkView>,
}

/// Everything the dashboard template is rendered from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub title: String,
    pub groups: Vec<GroupView>,
}

impl PageView {
    pub fn new(title: &str, hostname: &str, links: &GroupedLinks) -> Self {
        let groups = links
            .iter()
            .map(|(name, entries)| GroupView {
                name: name.to_string(),
                links: entries
                    .iter()
                    .map(|entry| LinkView {
                        name: entry.name.clone(),
                        url: entry.url.clone(),
                        href: href(hostname, &entry.url),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: title.to_string(),
            groups,
        }
    }
}

/// Hyperlink target for an extracted URL.
///
/// What follows the rule colon decides the shape of the link:
///
/// * a path (`:/grafana`) is appended to the hostname, or used as-is
///   when no hostname is configured;
/// * a port (`:8080`) is joined to the hostname as `host:port`; without a
///   hostname the segment is returned unchanged;
/// * anything else (`:app.example.org`) names a host and becomes
///   `http://app.example.org`, whatever the configured hostname.
pub fn href(hostname: &str, url: &str) -> String {
    let segment = url.strip_prefix(':').unwrap_or(url);

    if segment.is_empty() || segment.starts_with('/') {
        return if hostname.is_empty() {
            segment.to_string()
        } else {
            format!("http://{hostname}{segment}")
        };
    }

    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return if hostname.is_empty() {
            url.to_string()
        } else {
            format!("http://{hostname}:{segment}")
        };
    }

    format!("http://{segment}")
}

/// Compiled dashboard template
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Renderer using the built-in template
    pub fn new() -> Result<Self, RenderError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    pub fn from_source(source: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| RenderError::Template(Box::new(e)))?;
        Ok(Self { registry })
    }

    /// Compile a template file once, at start-up
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LanderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let renderer = Self::from_source(&source)?;
        info!("📄 Using dashboard template: {}", path.display());
        Ok(renderer)
    }

    /// Built-in template, or the given file when one is configured
    pub fn load(path: Option<&Path>) -> Result<Self, LanderError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::new()?),
        }
    }

    pub fn render(&self, page: &PageView) -> Result<String, RenderError> {
        Ok(self.registry.render(TEMPLATE_NAME, page)?)
    }
}
