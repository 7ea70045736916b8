use std::{
    collections::HashMap, env, fs, ops::Deref, path::Path, sync::Arc,
};

use url::Url;

use crate::{
    dao::AprFile, error::Error, farms::FarmRegistry, provider::Subgraph,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub subgraph: Arc<dyn Subgraph>,
    pub farms: FarmRegistry,
    pub apr_file: AprFile,
}

impl State {
    pub fn new(config: Config, subgraph: Arc<dyn Subgraph>) -> State {
        Self::with_registry(config, subgraph, FarmRegistry::default())
    }

    pub fn with_registry(
        config: Config,
        subgraph: Arc<dyn Subgraph>,
        farms: FarmRegistry,
    ) -> State {
        let apr_file = AprFile::new(config.output_dir.to_owned());

        Self {
            config,
            subgraph,
            farms,
            apr_file,
        }
    }
}

/// Subgraph endpoints serving one chain.
#[derive(Debug, Clone)]
pub struct ChainEndpoints {
    pub chain_id: u64,
    pub blocks: Option<String>,
    pub info: String,
    pub stable_swap: Option<String>,
}

impl ChainEndpoints {
    pub fn blocks(&self) -> Result<&str, Error> {
        self.blocks
            .as_deref()
            .ok_or(Error::MissingEndpoint("blocks", self.chain_id))
    }

    pub fn stable_swap(&self) -> Result<&str, Error> {
        self.stable_swap
            .as_deref()
            .ok_or(Error::MissingEndpoint("stable swap", self.chain_id))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supported_chains: Vec<u64>,
    pub output_dir: String,
    pub timeout: u64,
    pub endpoints: HashMap<u64, ChainEndpoints>,
}

impl Config {
    pub fn get_endpoints(
        &self,
        chain_id: u64,
    ) -> Result<&ChainEndpoints, Error> {
        self.endpoints
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let supported_chains = parse_chain_list(&env::var("SUPPORTED_CHAINS")?)?;
    let output_dir = resolve_output_dir(
        env!("CARGO_MANIFEST_DIR"),
        &env::var("OUTPUT_DIRECTORY")?,
    );
    let timeout: u64 = env::var("TIMEOUT")?.parse()?;

    let mut endpoints = HashMap::new();

    for chain_id in &supported_chains {
        let chain_id = *chain_id;
        let info = required_url(&format!("INFO_SUBGRAPH_{}", chain_id))?;
        let blocks = optional_url(&format!("BLOCKS_SUBGRAPH_{}", chain_id))?;
        let stable_swap =
            optional_url(&format!("STABLESWAP_SUBGRAPH_{}", chain_id))?;

        endpoints.insert(
            chain_id,
            ChainEndpoints {
                chain_id,
                blocks,
                info,
                stable_swap,
            },
        );
    }

    let config = Config {
        supported_chains,
        output_dir,
        timeout,
        endpoints,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = "lp_aprs.conf";
    let local_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);
    let local_path = format!("{}/{}", directory, local_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(&config_string);

    if Path::new(&local_path).exists() {
        let local_string = fs::read_to_string(local_path)?;
        parse_config_string(&local_string);
    }

    Ok(())
}

fn parse_config_string(config: &str) {
    for (key, value) in parse_config_lines(config) {
        env::set_var(key, value);
    }
}

pub fn parse_config_lines(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let index = line.find('=')?;
            let (key, value) = line.split_at(index);
            Some((key.trim(), value[1..].trim()))
        })
        .collect()
}

pub fn parse_chain_list(value: &str) -> Result<Vec<u64>, Error> {
    let mut chains = Vec::new();

    for item in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let chain_id: u64 = item.parse()?;
        if !chains.contains(&chain_id) {
            chains.push(chain_id);
        }
    }

    if chains.is_empty() {
        return Err(Error::ConfigurationError(String::from(
            "SUPPORTED_CHAINS is empty",
        )));
    }

    Ok(chains)
}

fn resolve_output_dir(manifest_dir: &str, value: &str) -> String {
    if Path::new(value).is_absolute() {
        value.to_owned()
    } else {
        format!("{}/{}", manifest_dir, value)
    }
}

fn required_url(key: &str) -> Result<String, Error> {
    let value = env::var(key).map_err(|_| {
        Error::ConfigurationError(format!("missing {}", key))
    })?;
    Url::parse(&value)?;

    Ok(value)
}

fn optional_url(key: &str) -> Result<Option<String>, Error> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => {
            Url::parse(&value)?;
            Ok(Some(value))
        },
        _ => Ok(None),
    }
}
