//! Traefik (v1 frontend rule) label extraction

use super::{ExtractConfig, RuleSegment};
use crate::error::ExtractError;
use crate::types::{ContainerRecord, LinkEntry};

pub const MODE_NAME: &str = "traefik";

/// Build a link from the name label and the routing rule label
pub fn extract(record: &ContainerRecord, config: &ExtractConfig) -> Result<LinkEntry, ExtractError> {
    if !config.traefik_enabled {
        return Err(ExtractError::ModeDisabled { mode: MODE_NAME });
    }

    let name = required_label(record, &config.labels.name)?;
    let rule = required_label(record, &config.labels.rule)?;
    let url = rule_segment(rule, config.rule_segment)?;

    Ok(LinkEntry {
        name: name.to_string(),
        url: url.to_string(),
    })
}

/// The rightmost colon-delimited segment of a routing rule.
///
/// `Host:example.com:8080` yields `:8080` with [`RuleSegment::WithColon`]
/// and `8080` with [`RuleSegment::AfterColon`].
pub fn rule_segment(rule: &str, segment: RuleSegment) -> Result<&str, ExtractError> {
    let position = rule.rfind(':').ok_or_else(|| ExtractError::MalformedRule {
        rule: rule.to_string(),
    })?;

    // ':' is one byte, so both offsets sit on char boundaries
    Ok(match segment {
        RuleSegment::WithColon => &rule[position..],
        RuleSegment::AfterColon => &rule[position + 1..],
    })
}

fn required_label<'a>(record: &'a ContainerRecord, key: &str) -> Result<&'a str, ExtractError> {
    record.label(key).ok_or_else(|| ExtractError::MissingLabel {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Host:example.com:8080", ":8080" ; "last colon wins")]
    #[test_case("PathPrefix:/grafana", ":/grafana" ; "path prefix")]
    #[test_case("Host:app.example.org", ":app.example.org" ; "host rule")]
    #[test_case("PathPrefixStrip:/a:b/c", ":b/c" ; "colon inside path")]
    #[test_case("trailing:", ":" ; "nothing after colon")]
    #[test_case(":", ":" ; "colon only")]
    fn test_rule_segment_with_colon(rule: &str, expected: &str) {
        assert_eq!(rule_segment(rule, RuleSegment::WithColon).unwrap(), expected);
    }

    #[test_case("Host:example.com:8080", "8080" ; "last colon wins")]
    #[test_case("PathPrefix:/grafana", "/grafana" ; "path prefix")]
    #[test_case("trailing:", "" ; "nothing after colon")]
    fn test_rule_segment_after_colon(rule: &str, expected: &str) {
        assert_eq!(rule_segment(rule, RuleSegment::AfterColon).unwrap(), expected);
    }

    #[test]
    fn test_rule_without_colon_is_malformed() {
        assert_eq!(
            rule_segment("Host=example.com", RuleSegment::WithColon),
            Err(ExtractError::MalformedRule {
                rule: "Host=example.com".to_string()
            })
        );
        assert!(rule_segment("", RuleSegment::AfterColon).is_err());
    }

    #[test]
    fn test_multibyte_rule() {
        assert_eq!(
            rule_segment("Host:häuser.example:/straße", RuleSegment::WithColon).unwrap(),
            ":/straße"
        );
    }

    #[test]
    fn test_extract_reports_missing_labels() {
        let config = ExtractConfig::default();
        let record = ContainerRecord::new("abc").with_label("traefik.frontend.rule", "Host:x");
        assert_eq!(
            extract(&record, &config),
            Err(ExtractError::MissingLabel {
                key: "lander.name".to_string()
            })
        );

        let record = ContainerRecord::new("abc").with_label("lander.name", "App");
        assert_eq!(
            extract(&record, &config),
            Err(ExtractError::MissingLabel {
                key: "traefik.frontend.rule".to_string()
            })
        );
    }

    #[test]
    fn test_extract_disabled() {
        let config = ExtractConfig {
            traefik_enabled: false,
            ..Default::default()
        };
        let record = ContainerRecord::new("abc")
            .with_label("lander.name", "App")
            .with_label("traefik.frontend.rule", "PathPrefix:/app");

        let err = extract(&record, &config).unwrap_err();
        assert!(err.is_mode_disabled());
    }
}
