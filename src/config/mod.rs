use crate::error::ConfigError;
use crate::extract::{ExtractConfig, LabelKeys, RuleSegment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_LISTEN: &str = ":8080";
pub const DEFAULT_TITLE: &str = "LANDER";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings as they appear in an optional `lander.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub docker: Option<String>,
    pub traefik: Option<bool>,
    pub exposed: Option<bool>,
    pub listen: Option<String>,
    pub title: Option<String>,
    pub hostname: Option<String>,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
    pub template: Option<PathBuf>,
    pub keep_rule_colon: Option<bool>,
    #[serde(default)]
    pub labels: LabelKeys,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat {
            reason: e.to_string(),
        })
    }
}

/// Values taken from the command line or the environment. Unset fields fall
/// back to the config file, then to built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub docker: Option<String>,
    pub traefik: Option<bool>,
    pub exposed: Option<bool>,
    pub listen: Option<String>,
    pub title: Option<String>,
    pub hostname: Option<String>,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
    pub template: Option<PathBuf>,
}

/// A default that was filled in because nothing set the value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultApplied {
    pub env: &'static str,
    pub value: String,
    pub warn: bool,
}

/// Validated, immutable runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub docker: String,
    pub traefik: bool,
    pub exposed: bool,
    pub listen: SocketAddr,
    pub title: String,
    pub hostname: String,
    pub log_level: String,
    pub json_logs: bool,
    pub template: Option<PathBuf>,
    pub keep_rule_colon: bool,
    pub labels: LabelKeys,
}

impl Settings {
    /// Merge overrides over the file config and validate the result.
    ///
    /// Returns the settings together with the defaults that had to be
    /// applied, so they can be reported once logging is up.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
    ) -> Result<(Self, Vec<DefaultApplied>), ConfigError> {
        let mut defaults = Vec::new();

        let docker = overrides
            .docker
            .or(file.docker)
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "docker".to_string(),
                env: "LANDER_DOCKER".to_string(),
            })?;

        let traefik = pick(overrides.traefik, file.traefik, true, "LANDER_TRAEFIK", &mut defaults);
        let exposed = pick(overrides.exposed, file.exposed, false, "LANDER_EXPOSED", &mut defaults);

        let listen_raw = pick(
            overrides.listen,
            file.listen,
            DEFAULT_LISTEN.to_string(),
            "LANDER_LISTEN",
            &mut defaults,
        );
        let listen = parse_listen(&listen_raw)?;

        let title = pick(
            overrides.title,
            file.title,
            DEFAULT_TITLE.to_string(),
            "LANDER_TITLE",
            &mut defaults,
        );

        let hostname = match overrides.hostname.or(file.hostname) {
            Some(hostname) => hostname,
            None => {
                defaults.push(DefaultApplied {
                    env: "LANDER_HOSTNAME",
                    value: String::new(),
                    warn: true,
                });
                String::new()
            }
        };

        let log_level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        crate::monitoring::tracing_setup::normalize_level(&log_level)?;

        let settings = Self {
            docker,
            traefik,
            exposed,
            listen,
            title,
            hostname,
            log_level,
            json_logs: overrides.json_logs.or(file.json_logs).unwrap_or(false),
            template: overrides.template.or(file.template),
            keep_rule_colon: file.keep_rule_colon.unwrap_or(true),
            labels: file.labels,
        };

        Ok((settings, defaults))
    }

    /// The immutable configuration handed to the extractor on every request
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            labels: self.labels.clone(),
            traefik_enabled: self.traefik,
            rule_segment: if self.keep_rule_colon {
                RuleSegment::WithColon
            } else {
                RuleSegment::AfterColon
            },
        }
    }

    /// Log the defaults that were applied and settings worth a warning
    pub fn report(&self, defaults: &[DefaultApplied]) {
        for applied in defaults {
            if applied.warn {
                warn!(
                    "environment variable {} not set! We might not be able to generate valid hyperlinks!",
                    applied.env
                );
            } else {
                info!(
                    "environment variable {} not set, assuming: {:?}",
                    applied.env, applied.value
                );
            }
        }

        if self.exposed {
            warn!("LANDER_EXPOSED is set but exposed-port discovery is not supported; ignoring");
        }
        if !self.traefik {
            warn!("LANDER_TRAEFIK is false: no routing mode is active, the dashboard will be empty");
        }
    }
}

fn pick<T: ToString>(
    cli: Option<T>,
    file: Option<T>,
    default: T,
    env: &'static str,
    defaults: &mut Vec<DefaultApplied>,
) -> T {
    match cli.or(file) {
        Some(value) => value,
        None => {
            defaults.push(DefaultApplied {
                env,
                value: default.to_string(),
                warn: false,
            });
            default
        }
    }
}

/// Parse an on/off setting. `true`/`false` in any case and `1`/`0` are
/// accepted; an empty value means unset.
pub fn parse_flag(value: &str, env: &str) -> Result<Option<bool>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFlag {
            env: env.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse `<IP>:PORT`. A bare `:PORT` binds every interface.
pub fn parse_listen(listen: &str) -> Result<SocketAddr, ConfigError> {
    let listen = listen.trim();
    let candidate = if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    };

    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidListen {
            address: listen.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_docker() -> Overrides {
        Overrides {
            docker: Some("unix:///var/run/docker.sock".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_docker_is_an_error() {
        let err = Settings::resolve(FileConfig::default(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "docker"));
    }

    #[test]
    fn test_blank_docker_is_an_error() {
        let overrides = Overrides {
            docker: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(FileConfig::default(), overrides).is_err());
    }

    #[test]
    fn test_defaults() {
        let (settings, defaults) = Settings::resolve(FileConfig::default(), with_docker()).unwrap();

        assert!(settings.traefik);
        assert!(!settings.exposed);
        assert_eq!(settings.listen, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.title, "LANDER");
        assert_eq!(settings.hostname, "");
        assert_eq!(settings.log_level, "info");
        assert!(settings.keep_rule_colon);
        assert_eq!(settings.labels, LabelKeys::default());

        let envs: Vec<_> = defaults.iter().map(|d| d.env).collect();
        assert_eq!(
            envs,
            vec![
                "LANDER_TRAEFIK",
                "LANDER_EXPOSED",
                "LANDER_LISTEN",
                "LANDER_TITLE",
                "LANDER_HOSTNAME"
            ]
        );
        assert!(defaults.iter().find(|d| d.env == "LANDER_HOSTNAME").unwrap().warn);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = FileConfig::parse(
            r#"
            docker = "tcp://10.0.0.1:2375"
            title = "From file"
            listen = "127.0.0.1:9000"
            traefik = false
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            title: Some("From env".to_string()),
            ..Default::default()
        };

        let (settings, _) = Settings::resolve(file, overrides).unwrap();
        assert_eq!(settings.docker, "tcp://10.0.0.1:2375");
        assert_eq!(settings.title, "From env");
        assert_eq!(settings.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(!settings.traefik);
    }

    #[test]
    fn test_file_label_keys() {
        let file = FileConfig::parse(
            r#"
            keep_rule_colon = false

            [labels]
            enable = "dash.enable"
            name = "dash.name"
            "#,
        )
        .unwrap();

        let (settings, _) = Settings::resolve(file, with_docker()).unwrap();
        let config = settings.extract_config();
        assert_eq!(config.labels.enable, "dash.enable");
        assert_eq!(config.labels.name, "dash.name");
        assert_eq!(config.labels.group, "lander.group");
        assert_eq!(config.labels.rule, "traefik.frontend.rule");
        assert_eq!(config.rule_segment, RuleSegment::AfterColon);
        assert!(config.traefik_enabled);
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        let err = FileConfig::parse("dockr = \"oops\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { .. }));
    }

    #[test]
    fn test_parse_listen() {
        assert_eq!(parse_listen(":8080").unwrap(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(
            parse_listen("192.168.1.10:80").unwrap(),
            "192.168.1.10:80".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_listen("8080").is_err());
        assert!(parse_listen("nowhere").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("", "LANDER_TRAEFIK").unwrap(), None);
        assert_eq!(parse_flag("true", "LANDER_TRAEFIK").unwrap(), Some(true));
        assert_eq!(parse_flag("FALSE", "LANDER_TRAEFIK").unwrap(), Some(false));
        assert!(matches!(
            parse_flag("yes please", "LANDER_TRAEFIK"),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let overrides = Overrides {
            log_level: Some("loud".to_string()),
            ..with_docker()
        };
        let err = Settings::resolve(FileConfig::default(), overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { .. }));
    }
}
