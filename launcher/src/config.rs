use anyhow::{anyhow, Context, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "launcher")]
#[command(about = "Grid arcade launcher")]
#[command(long_about = "Launcher that selects a game from the registry by name and drives it.

Inputs come from a seeded random policy on a fixed interval; timed games also
receive ticks at their advertised cadence. Each episode ends when the game
reaches a terminal status, the step cap is hit, or Ctrl-C is pressed.")]
pub struct Config {
    /// Game to run (see --list)
    #[arg(long, env = "LAUNCHER_ENV_ID", default_value = "serpent")]
    pub env_id: String,

    /// Base seed; episode N uses seed + N. Random when unset
    #[arg(long, env = "LAUNCHER_SEED")]
    pub seed: Option<u64>,

    /// Number of episodes to run
    #[arg(long, env = "LAUNCHER_EPISODES", default_value = "1")]
    pub episodes: u32,

    /// Maximum transitions (inputs plus ticks) per episode
    #[arg(long, env = "LAUNCHER_MAX_STEPS", default_value = "10000")]
    pub max_steps: u64,

    /// Override the game's tick interval in milliseconds
    #[arg(long, env = "LAUNCHER_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Interval between policy inputs in milliseconds
    #[arg(long, env = "LAUNCHER_INPUT_MS", default_value = "50")]
    pub input_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LAUNCHER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// List registered games and exit
    #[arg(long)]
    pub list: bool,

    /// TOML file with defaults; flags and environment variables take precedence
    #[arg(long, env = "LAUNCHER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Values accepted in the `--config` file
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub env_id: Option<String>,
    pub seed: Option<u64>,
    pub episodes: Option<u32>,
    pub max_steps: Option<u64>,
    pub tick_ms: Option<u64>,
    pub input_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid launcher config file")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text)
    }
}

impl Config {
    /// Parse the process arguments, layer the config file under them and validate
    pub fn load() -> Result<Self> {
        let matches = Self::command().get_matches();
        Self::from_matches(&matches)
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = Self::from_arg_matches(matches)?;
        if let Some(path) = config.config.clone() {
            let file = FileConfig::read(&path)?;
            config.merge_file(file, |id| explicitly_set(matches, id));
        }
        config.validate()?;
        Ok(config)
    }

    /// Take each file value unless `explicit` reports the field was set on the
    /// command line or through the environment
    pub fn merge_file(&mut self, file: FileConfig, explicit: impl Fn(&str) -> bool) {
        if let Some(env_id) = file.env_id.filter(|_| !explicit("env_id")) {
            self.env_id = env_id;
        }
        if let Some(seed) = file.seed.filter(|_| !explicit("seed")) {
            self.seed = Some(seed);
        }
        if let Some(episodes) = file.episodes.filter(|_| !explicit("episodes")) {
            self.episodes = episodes;
        }
        if let Some(max_steps) = file.max_steps.filter(|_| !explicit("max_steps")) {
            self.max_steps = max_steps;
        }
        if let Some(tick_ms) = file.tick_ms.filter(|_| !explicit("tick_ms")) {
            self.tick_ms = Some(tick_ms);
        }
        if let Some(input_ms) = file.input_ms.filter(|_| !explicit("input_ms")) {
            self.input_ms = input_ms;
        }
        if let Some(log_level) = file.log_level.filter(|_| !explicit("log_level")) {
            self.log_level = log_level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.env_id.is_empty() {
            return Err(anyhow!("env_id cannot be empty"));
        }

        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }

        if self.max_steps == 0 {
            return Err(anyhow!("max_steps must be greater than 0"));
        }

        if self.input_ms == 0 {
            return Err(anyhow!("input_ms must be greater than 0"));
        }

        if self.tick_ms == Some(0) {
            return Err(anyhow!("tick_ms must be greater than 0"));
        }

        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("invalid log_level: {}", self.log_level))
    }

    pub fn input_interval(&self) -> Duration {
        Duration::from_millis(self.input_ms)
    }

    /// Tick cadence for a game advertising `advertised`; untimed games stay untimed
    pub fn tick_interval(&self, advertised: Option<Duration>) -> Option<Duration> {
        advertised.map(|interval| self.tick_ms.map_or(interval, Duration::from_millis))
    }
}

fn explicitly_set(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["launcher"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        let config = parse(&[]);
        assert_eq!(config.env_id, "serpent");
        assert_eq!(config.episodes, 1);
        assert_eq!(config.input_interval(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse(&["--episodes", "0"]).validate().is_err());
        assert!(parse(&["--tick-ms", "0"]).validate().is_err());
        assert!(parse(&["--log-level", "loud"]).validate().is_err());
        assert!(parse(&["--env-id", ""]).validate().is_err());
    }

    #[test]
    fn test_tick_interval_override() {
        let config = parse(&["--tick-ms", "5"]);
        assert_eq!(
            config.tick_interval(Some(Duration::from_millis(100))),
            Some(Duration::from_millis(5))
        );
        assert_eq!(config.tick_interval(None), None);

        let config = parse(&[]);
        assert_eq!(
            config.tick_interval(Some(Duration::from_millis(500))),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_file_values_fill_unset_fields() {
        let file = FileConfig::parse(
            r#"
            env_id = "block_stack"
            episodes = 3
            log_level = "debug"
            "#,
        )
        .unwrap();

        let mut config = parse(&["--episodes", "7"]);
        config.merge_file(file, |id| id == "episodes");

        assert_eq!(config.env_id, "block_stack");
        assert_eq!(config.episodes, 7);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_file_rejects_unknown_keys() {
        assert!(FileConfig::parse("speed = 3").is_err());
        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
    }
}
