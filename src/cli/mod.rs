use clap::Parser;
use lander::config::{Overrides, parse_flag};
use lander::error::ConfigError;
use std::path::{Path, PathBuf};

// An environment variable that is set but empty counts as unset, so every
// value is taken as a string here and filtered in `overrides`.
#[derive(Parser, Debug)]
#[command(name = "lander")]
#[command(about = "Dashboard of the applications running in your Docker containers")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Docker API endpoint (e.g. unix:///var/run/docker.sock)
    #[arg(long, env = "LANDER_DOCKER")]
    pub docker: Option<String>,

    /// Look for Traefik routing labels: true or false (also 1/0, any case).
    /// Any other non-empty value stops start-up [default: true]
    #[arg(long, env = "LANDER_TRAEFIK")]
    pub traefik: Option<String>,

    /// Look for exposed ports (not supported yet): true or false [default: false]
    #[arg(long, env = "LANDER_EXPOSED")]
    pub exposed: Option<String>,

    /// Address to listen on, as <IP>:PORT or :PORT [default: :8080]
    #[arg(short, long, env = "LANDER_LISTEN")]
    pub listen: Option<String>,

    /// Title shown on top of the page [default: LANDER]
    #[arg(short, long, env = "LANDER_TITLE")]
    pub title: Option<String>,

    /// Hostname used to build hyperlinks
    #[arg(long, env = "LANDER_HOSTNAME")]
    pub hostname: Option<String>,

    /// Log level: trace, debug, info, warn, error [default: info]
    #[arg(long, env = "LANDER_LOGLEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON: true or false [default: false]
    #[arg(long, env = "LANDER_JSON_LOGS")]
    pub json_logs: Option<String>,

    /// Handlebars template used instead of the built-in page
    #[arg(long, env = "LANDER_TEMPLATE")]
    pub template: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "LANDER_CONFIG")]
    pub config: Option<String>,
}

impl Cli {
    /// Values that were actually given. Empty strings are dropped so the
    /// config file or the built-in default applies.
    pub fn overrides(&self) -> Result<Overrides, ConfigError> {
        Ok(Overrides {
            docker: non_empty(&self.docker),
            traefik: flag(&self.traefik, "LANDER_TRAEFIK")?,
            exposed: flag(&self.exposed, "LANDER_EXPOSED")?,
            listen: non_empty(&self.listen),
            title: non_empty(&self.title),
            hostname: non_empty(&self.hostname),
            log_level: non_empty(&self.log_level),
            json_logs: flag(&self.json_logs, "LANDER_JSON_LOGS")?,
            template: non_empty(&self.template).map(PathBuf::from),
        })
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(Path::new)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn flag(value: &Option<String>, env: &str) -> Result<Option<bool>, ConfigError> {
    match value {
        Some(raw) => parse_flag(raw, env),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lander::config::{FileConfig, Settings};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "lander",
            "--docker",
            "unix:///var/run/docker.sock",
            "--traefik",
            "false",
            "--listen",
            ":9090",
            "--title",
            "Home",
        ])
        .unwrap();

        let overrides = cli.overrides().unwrap();
        assert_eq!(overrides.docker.as_deref(), Some("unix:///var/run/docker.sock"));
        assert_eq!(overrides.traefik, Some(false));
        assert_eq!(overrides.listen.as_deref(), Some(":9090"));
        assert_eq!(overrides.title.as_deref(), Some("Home"));
        assert_eq!(overrides.exposed, None);
    }

    #[test]
    fn test_unrecognised_flag_value_is_rejected() {
        let cli = Cli::try_parse_from(["lander", "--traefik", "maybe"]).unwrap();
        let err = cli.overrides().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { ref env, .. } if env == "LANDER_TRAEFIK"));
    }

    #[test]
    fn test_flag_spellings() {
        for (raw, expected) in [("TRUE", true), ("1", true), ("False", false), ("0", false)] {
            let cli = Cli::try_parse_from(["lander", "--traefik", raw]).unwrap();
            assert_eq!(cli.overrides().unwrap().traefik, Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let cli = Cli::try_parse_from([
            "lander",
            "--docker",
            "unix:///var/run/docker.sock",
            "--traefik",
            "",
            "--exposed",
            "",
            "--listen",
            "",
            "--title",
            "",
            "--hostname",
            "",
            "--log-level",
            "",
            "--json-logs",
            "",
            "--template",
            "",
            "--config",
            "",
        ])
        .unwrap();

        assert_eq!(cli.config_file(), None);
        let overrides = cli.overrides().unwrap();
        assert_eq!(overrides.traefik, None);
        assert_eq!(overrides.template, None);

        let (settings, defaults) = Settings::resolve(FileConfig::default(), overrides).unwrap();
        assert!(settings.traefik);
        assert!(!settings.exposed);
        assert_eq!(settings.listen.to_string(), "0.0.0.0:8080");
        assert_eq!(settings.title, "LANDER");
        assert_eq!(settings.hostname, "");
        assert_eq!(settings.log_level, "info");
        assert!(!settings.json_logs);
        assert_eq!(settings.template, None);

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
    }
}
