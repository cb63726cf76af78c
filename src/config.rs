use anyhow::Result;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;

pub type Number = f64;

pub const EPSILON: Number = 1e-12;

pub const MAX_TOP_N: usize = 10;

#[derive(Deserialize)]
pub struct ForkcastConfig {
    pub path: Option<String>,
    pub top_n: Option<usize>,
    pub leaderboard_size: Option<usize>,
    pub highlight_size: Option<usize>,
    pub top_cuisines: Option<usize>,
    pub vector_cache_capacity: Option<usize>,
    pub verbose: Option<bool>,
}

impl ForkcastConfig {
    pub fn try_from(config: &Config) -> Result<Self, ConfigError> {
        Ok(ForkcastConfig {
            path: config.get("path").ok(),
            top_n: config.get("top_n").ok(),
            leaderboard_size: config.get("leaderboard_size").ok(),
            highlight_size: config.get("highlight_size").ok(),
            top_cuisines: config.get("top_cuisines").ok(),
            vector_cache_capacity: config.get("vector_cache_capacity").ok(),
            verbose: config.get("verbose").ok(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct State {
    pub path: String,
    pub top_n: usize,
    pub leaderboard_size: usize,
    pub highlight_size: usize,
    pub top_cuisines: usize,
    pub vector_cache_capacity: usize,
    pub verbose: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            path: "zomato.csv".to_string(),
            top_n: 5,
            leaderboard_size: 10,
            highlight_size: 3,
            top_cuisines: 10,
            vector_cache_capacity: 8,
            verbose: false,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl State {
    pub fn new() -> Result<Self> {
        let mut config = Config::default();
        #[allow(deprecated)]
        {
            config.merge(ConfigFile::with_name("forkcast_config").required(false))?;
            config.merge(Environment::with_prefix("FORKCAST"))?;
        }

        let forkcast_config = ForkcastConfig::try_from(&config)?;
        let defaults = State::default();

        let path = forkcast_config
            .path
            .or_else(|| env::var("FORKCAST_PATH").ok())
            .unwrap_or(defaults.path);

        let top_n = forkcast_config
            .top_n
            .or_else(|| env_parsed("FORKCAST_TOP_N"))
            .unwrap_or(defaults.top_n);

        let leaderboard_size = forkcast_config
            .leaderboard_size
            .or_else(|| env_parsed("FORKCAST_LEADERBOARD_SIZE"))
            .unwrap_or(defaults.leaderboard_size);

        let highlight_size = forkcast_config
            .highlight_size
            .or_else(|| env_parsed("FORKCAST_HIGHLIGHT_SIZE"))
            .unwrap_or(defaults.highlight_size);

        let top_cuisines = forkcast_config
            .top_cuisines
            .or_else(|| env_parsed("FORKCAST_TOP_CUISINES"))
            .unwrap_or(defaults.top_cuisines);

        let vector_cache_capacity = forkcast_config
            .vector_cache_capacity
            .or_else(|| env_parsed("FORKCAST_VECTOR_CACHE_CAPACITY"))
            .unwrap_or(defaults.vector_cache_capacity);

        let verbose = forkcast_config
            .verbose
            .or_else(|| env_parsed("FORKCAST_VERBOSE"))
            .unwrap_or(defaults.verbose);

        let state = Self {
            path,
            top_n,
            leaderboard_size,
            highlight_size,
            top_cuisines,
            vector_cache_capacity,
            verbose,
        };
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 || self.top_n > MAX_TOP_N {
            anyhow::bail!("FORKCAST_TOP_N must be between 1 and {}.", MAX_TOP_N);
        }
        if self.vector_cache_capacity == 0 {
            anyhow::bail!("FORKCAST_VECTOR_CACHE_CAPACITY must be at least 1.");
        }
        if self.path.trim().is_empty() {
            anyhow::bail!("FORKCAST_PATH must not be empty.");
        }
        Ok(())
    }

    pub fn print_config(&self) {
        println!("path={}", self.path);
        println!("top_n={}", self.top_n);
        println!("leaderboard_size={}", self.leaderboard_size);
        println!("highlight_size={}", self.highlight_size);
        println!("top_cuisines={}", self.top_cuisines);
        println!("vector_cache_capacity={}", self.vector_cache_capacity);
        println!("verbose={}", self.verbose);
    }
}
