use rand::Rng;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::BufReader;
use sybilsim::model::{CostPolicy, UserParams};
use thiserror::Error;

pub static CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open config: {0}")]
    Io(#[from] std::io::Error),

    #[error("error while reading yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub struct Config {
    #[serde(default)]
    pub initial_reputation: f64,

    #[serde(default)]
    pub cost: CostPolicy,

    pub population: Vec<PopulationConfig>,

    #[serde(default)]
    pub steps: usize,

    #[serde(default)]
    pub debug: bool,

    // As written in config.yaml, if at all
    #[serde(default, rename = "SEED")]
    file_seed: Option<u64>,

    // Resolved by load_config
    #[serde(skip)]
    pub seed: u64,
}

// A group of Users that behave alike
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub struct PopulationConfig {
    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(flatten)]
    pub params: UserParams,

    // Videos each User uploads before the run,
    // spread across their identities
    #[serde(default)]
    pub uploads: usize,
}

fn default_count() -> usize {
    1
}

fn parse_env<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { name: name, value: value }),
        Err(_) => Ok(None),
    }
}

// Env beats the config file; with neither, draw one
fn pick_seed<R: Rng>(from_env: Option<u64>, from_file: Option<u64>, rng: &mut R) -> u64 {
    from_env.or(from_file).unwrap_or_else(|| rng.gen())
}

pub fn load_config() -> Result<Config, ConfigError> {
    let file = File::open(CONFIG_PATH)?;
    let reader = BufReader::new(file);
    let mut conf: Config = serde_yaml::from_reader(reader)?;

    conf.steps = match parse_env("STEPS")? {
        Some(steps) => steps,
        None if conf.steps > 0 => conf.steps,
        None => 100,
    };

    conf.debug = match env::var("DEBUG") {
        Ok(debug) => debug == "1",
        Err(_) => conf.debug,
    };

    let mut rng = rand::thread_rng();
    conf.seed = pick_seed(parse_env("SEED")?, conf.file_seed, &mut rng);

    log::info!("{:?}", conf);

    Ok(conf)
}
